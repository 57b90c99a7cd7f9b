use serde_json::json;

use crate::config::{BehaviorConfig, SERVICE_WORKER_URL, SMOOTH_SCROLL_POLYFILL_URL};
use crate::logging::{log_event, LogLevel};

/// Fire-and-forget registrations with outside resources. Implementations
/// log their own failures and never retry.
pub trait ExternalRegistrar {
    fn register_worker(&self, script_url: &str);
    fn load_polyfill(&self, src: &str);
}

#[derive(Clone, Copy, Debug, Default)]
pub struct NoopRegistrar;

impl ExternalRegistrar for NoopRegistrar {
    fn register_worker(&self, _script_url: &str) {}

    fn load_polyfill(&self, _src: &str) {}
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct HostCapabilities {
    pub service_worker: bool,
    pub native_smooth_scroll: bool,
}

/// Registers the worker and polyfill the host actually needs.
pub fn register_externals(
    config: &BehaviorConfig,
    capabilities: HostCapabilities,
    registrar: &impl ExternalRegistrar,
) {
    load_polyfills(config, capabilities, registrar);
    register_service_worker(config, capabilities, registrar);
}

/// Runs as soon as the document is parsed.
pub fn load_polyfills(
    config: &BehaviorConfig,
    capabilities: HostCapabilities,
    registrar: &impl ExternalRegistrar,
) {
    if capabilities.native_smooth_scroll {
        return;
    }

    log_event(
        config,
        LogLevel::Debug,
        "polyfill.load",
        json!({ "src": SMOOTH_SCROLL_POLYFILL_URL }),
    );
    registrar.load_polyfill(SMOOTH_SCROLL_POLYFILL_URL);
}

/// Runs once the page has fully loaded.
pub fn register_service_worker(
    config: &BehaviorConfig,
    capabilities: HostCapabilities,
    registrar: &impl ExternalRegistrar,
) {
    if capabilities.service_worker {
        registrar.register_worker(SERVICE_WORKER_URL);
    } else {
        log_event(config, LogLevel::Debug, "service_worker.unsupported", json!({}));
    }
}
