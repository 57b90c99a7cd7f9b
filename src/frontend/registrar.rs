use js_sys::Reflect;
use serde_json::json;
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::{spawn_local, JsFuture};
use web_sys::{window, Document, HtmlScriptElement};

use crate::config::BehaviorConfig;
use crate::error::BehaviorError;
use crate::externals::ExternalRegistrar;
use crate::logging::{log_event, LogLevel};

/// Registers the service worker and injects script polyfills.
pub struct WebRegistrar {
    document: Document,
    config: BehaviorConfig,
}

impl WebRegistrar {
    pub fn new(document: Document, config: BehaviorConfig) -> Self {
        Self { document, config }
    }

    fn append_script(&self, src: &str) -> Result<(), BehaviorError> {
        let script: HtmlScriptElement = self.document.create_element("script")?.unchecked_into();
        script.set_src(src);
        let head = self
            .document
            .head()
            .ok_or(BehaviorError::MissingElement("head"))?;
        head.append_child(&script)?;
        Ok(())
    }
}

impl ExternalRegistrar for WebRegistrar {
    fn register_worker(&self, script_url: &str) {
        let Some(win) = window() else {
            return;
        };

        let promise = win.navigator().service_worker().register(script_url);
        let config = self.config.clone();
        let script_url = script_url.to_string();
        spawn_local(async move {
            match JsFuture::from(promise).await {
                Ok(registration) => {
                    let scope = Reflect::get(&registration, &JsValue::from_str("scope"))
                        .ok()
                        .and_then(|scope| scope.as_string())
                        .unwrap_or_default();
                    log_event(
                        &config,
                        LogLevel::Info,
                        "service_worker.registered",
                        json!({ "script": script_url, "scope": scope }),
                    );
                }
                Err(error) => log_event(
                    &config,
                    LogLevel::Warn,
                    "service_worker.failed",
                    json!({ "script": script_url, "error": BehaviorError::from(error).to_string() }),
                ),
            }
        });
    }

    fn load_polyfill(&self, src: &str) {
        if let Err(error) = self.append_script(src) {
            log_event(
                &self.config,
                LogLevel::Warn,
                "polyfill.failed",
                json!({ "src": src, "error": error.to_string() }),
            );
        }
    }
}
