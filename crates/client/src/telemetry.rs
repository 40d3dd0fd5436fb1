//! Telemetry collaborators for the wallet provider.
//!
//! [`ConsoleTelemetry`] only logs. On the web, [`WindowAnalytics`] and
//! [`WindowApm`] forward to the analytics and Elastic APM agents loaded on the
//! page. Every call is best effort; the wallet provider logs and drops errors.

use std::rc::Rc;

use govern_shared::{ApmContext, Telemetry, TelemetryError, TelemetrySink};

/// Logs identify and APM updates through the platform logger.
#[derive(Debug, Clone, Copy, Default)]
pub struct ConsoleTelemetry;

impl ConsoleTelemetry {
    pub fn pair() -> Telemetry {
        Telemetry::new(Rc::new(ConsoleTelemetry), Rc::new(ConsoleTelemetry))
    }
}

impl TelemetrySink for ConsoleTelemetry {
    fn identify(
        &self,
        user_id: &str,
        network_name: &str,
        connector_id: &str,
    ) -> Result<(), TelemetryError> {
        crate::log_info!("identify {} on {} via {}", user_id, network_name, connector_id);
        Ok(())
    }
}

impl ApmContext for ConsoleTelemetry {
    fn update(&self, network_name: Option<&str>) -> Result<(), TelemetryError> {
        crate::log_debug!("apm network context: {:?}", network_name);
        Ok(())
    }
}

#[cfg(target_arch = "wasm32")]
pub use web::{WindowAnalytics, WindowApm};

/// Collaborators backed by the page's analytics and APM agents.
#[cfg(target_arch = "wasm32")]
pub fn window_telemetry() -> Telemetry {
    Telemetry::new(Rc::new(WindowAnalytics), Rc::new(WindowApm))
}

#[cfg(target_arch = "wasm32")]
mod web {
    use govern_shared::{ApmContext, TelemetryError, TelemetrySink};
    use wasm_bindgen::{JsCast, JsValue};
    use web_sys::js_sys::{self, Reflect};

    /// `window[global][method](...args)`
    fn call_global(global: &str, method: &str, args: &[JsValue]) -> Result<(), TelemetryError> {
        let window = web_sys::window().ok_or_else(|| TelemetryError::new("no window"))?;
        let target = Reflect::get(&window, &JsValue::from_str(global))
            .ok()
            .filter(|t| !t.is_undefined() && !t.is_null())
            .ok_or_else(|| TelemetryError::new(format!("window.{global} is not loaded")))?;
        let function = Reflect::get(&target, &JsValue::from_str(method))
            .ok()
            .and_then(|f| f.dyn_into::<js_sys::Function>().ok())
            .ok_or_else(|| TelemetryError::new(format!("window.{global}.{method} is not a function")))?;
        let args: js_sys::Array = args.iter().collect();
        function
            .apply(&target, &args)
            .map(|_| ())
            .map_err(|e| TelemetryError::new(format!("{global}.{method} threw: {e:?}")))
    }

    fn object(entries: &[(&str, &str)]) -> Result<JsValue, TelemetryError> {
        let obj = js_sys::Object::new();
        for (key, value) in entries {
            Reflect::set(&obj, &JsValue::from_str(key), &JsValue::from_str(value))
                .map_err(|e| TelemetryError::new(format!("{e:?}")))?;
        }
        Ok(obj.into())
    }

    /// `window.analytics.identify(userId, { network, connector })`
    #[derive(Debug, Clone, Copy, Default)]
    pub struct WindowAnalytics;

    impl TelemetrySink for WindowAnalytics {
        fn identify(
            &self,
            user_id: &str,
            network_name: &str,
            connector_id: &str,
        ) -> Result<(), TelemetryError> {
            let traits = object(&[("network", network_name), ("connector", connector_id)])?;
            call_global("analytics", "identify", &[JsValue::from_str(user_id), traits])
        }
    }

    /// `window.elasticApm.addLabels({ network })`
    #[derive(Debug, Clone, Copy, Default)]
    pub struct WindowApm;

    impl ApmContext for WindowApm {
        fn update(&self, network_name: Option<&str>) -> Result<(), TelemetryError> {
            let labels = object(&[("network", network_name.unwrap_or("none"))])?;
            call_global("elasticApm", "addLabels", &[labels])
        }
    }
}
