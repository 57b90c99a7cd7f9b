use gloo_events::{EventListener, EventListenerOptions};
use js_sys::{Array, Function, Object, Reflect};
use serde_json::json;
use wasm_bindgen::{closure::Closure, JsCast, JsValue};
use web_sys::{Document, Element, ErrorEvent, KeyboardEvent, PromiseRejectionEvent, ScrollRestoration, Window};

use super::dom::{now_ms, query_all};
use crate::config::BehaviorConfig;
use crate::effects::{activates_on_key, skill_aria_label};
use crate::error::BehaviorError;
use crate::logging::{log_event, LogLevel};

const FOCUSABLE_CARDS: &str = ".tech-icon, .quality-item, .project-card";
const INTERACTIVE: &str = "button, a, .nav-link";

fn describe(value: &JsValue) -> String {
    BehaviorError::from(value.clone()).to_string()
}

fn call_method(target: &JsValue, name: &str, args: &Array) -> Result<JsValue, JsValue> {
    let method: Function = Reflect::get(target, &JsValue::from_str(name))?.dyn_into()?;
    Reflect::apply(&method, target, args)
}

pub fn install_error_handlers(window: &Window, config: &BehaviorConfig) {
    let error_config = config.clone();
    EventListener::new(window, "error", move |event| {
        let Some(event) = event.dyn_ref::<ErrorEvent>() else {
            return;
        };
        log_event(
            &error_config,
            LogLevel::Error,
            "page.error",
            json!({
                "message": event.message(),
                "source": event.filename(),
                "line": event.lineno(),
                "error": describe(&event.error()),
            }),
        );
    })
    .forget();

    let rejection_config = config.clone();
    EventListener::new(window, "unhandledrejection", move |event| {
        let Some(event) = event.dyn_ref::<PromiseRejectionEvent>() else {
            return;
        };
        log_event(
            &rejection_config,
            LogLevel::Error,
            "page.unhandled_rejection",
            json!({ "reason": describe(&event.reason()) }),
        );
    })
    .forget();
}

/// Always starts the page at the top, including after a refresh.
pub fn preserve_scroll_position(window: &Window) -> Result<(), BehaviorError> {
    let history = window.history()?;
    if Reflect::has(history.as_ref(), &JsValue::from_str("scrollRestoration"))? {
        history.set_scroll_restoration(ScrollRestoration::Manual)?;
    }

    let unload_window = window.clone();
    EventListener::new(window, "beforeunload", move |_| {
        unload_window.scroll_to_with_x_and_y(0.0, 0.0);
    })
    .forget();

    window.scroll_to_with_x_and_y(0.0, 0.0);
    Ok(())
}

/// Logs load time and, where supported, largest contentful paint.
pub fn install_performance_monitor(window: &Window, config: &BehaviorConfig) -> Result<(), BehaviorError> {
    let lcp_supported = Reflect::has(window.as_ref(), &JsValue::from_str("LargestContentfulPaint"))?;
    let load_window = window.clone();
    let config = config.clone();

    EventListener::once(window, "load", move |_| {
        log_event(
            &config,
            LogLevel::Info,
            "page.loaded",
            json!({ "load_ms": (now_ms() * 100.0).round() / 100.0 }),
        );

        if lcp_supported {
            if let Err(error) = observe_largest_paint(&load_window, &config) {
                log_event(
                    &config,
                    LogLevel::Warn,
                    "performance.lcp_unavailable",
                    json!({ "error": error.to_string() }),
                );
            }
        }
    })
    .forget();
    Ok(())
}

fn observe_largest_paint(window: &Window, config: &BehaviorConfig) -> Result<(), BehaviorError> {
    let constructor: Function = Reflect::get(window.as_ref(), &JsValue::from_str("PerformanceObserver"))?.dyn_into()?;

    let config = config.clone();
    let callback = Closure::<dyn FnMut(JsValue)>::new(move |entry_list: JsValue| {
        let Ok(entries) = call_method(&entry_list, "getEntries", &Array::new()) else {
            return;
        };
        let entries: Array = entries.unchecked_into();
        let Some(last) = entries.iter().last() else {
            return;
        };
        let start = Reflect::get(&last, &JsValue::from_str("startTime"))
            .ok()
            .and_then(|value| value.as_f64())
            .unwrap_or(0.0);
        log_event(
            &config,
            LogLevel::Info,
            "performance.lcp",
            json!({ "start_ms": (start * 100.0).round() / 100.0 }),
        );
    });

    let observer = Reflect::construct(&constructor, &Array::of1(callback.as_ref()))?;
    callback.forget();

    let options = Object::new();
    Reflect::set(
        &options,
        &JsValue::from_str("entryTypes"),
        &Array::of1(&JsValue::from_str("largest-contentful-paint")),
    )?;
    call_method(&observer, "observe", &Array::of1(&options))?;
    Ok(())
}

pub fn track_interactions(document: &Document, config: &BehaviorConfig) -> Result<(), BehaviorError> {
    for element in query_all(document, INTERACTIVE) {
        let config = config.clone();
        EventListener::new(&element, "click", move |event| {
            let Some(target) = event.target().and_then(|target| target.dyn_into::<Element>().ok()) else {
                return;
            };
            let label = target
                .text_content()
                .filter(|text| !text.trim().is_empty())
                .unwrap_or_else(|| target.class_name());
            log_event(
                &config,
                LogLevel::Debug,
                "interaction",
                json!({ "target": label.trim() }),
            );
        })
        .forget();
    }
    Ok(())
}

/// Keyboard activation for cards and labels for skill bars and social links.
pub fn enhance_accessibility(document: &Document) -> Result<(), BehaviorError> {
    for element in query_all(document, FOCUSABLE_CARDS) {
        if !element.has_attribute("tabindex") {
            element.set_attribute("tabindex", "0")?;
        }

        let card = element.clone();
        EventListener::new_with_options(
            &element,
            "keydown",
            EventListenerOptions::enable_prevent_default(),
            move |event| {
                let Some(key_event) = event.dyn_ref::<KeyboardEvent>() else {
                    return;
                };
                if activates_on_key(&key_event.key()) {
                    event.prevent_default();
                    card.click();
                }
            },
        )
        .forget();
    }

    for bar in query_all(document, ".skill-progress") {
        let width = bar.get_attribute("data-width").unwrap_or_default();
        bar.set_attribute("aria-label", &skill_aria_label(width.trim_end_matches('%')))?;
    }

    for link in query_all(document, ".social-link") {
        if let Some(title) = link.get_attribute("title").filter(|title| !title.is_empty()) {
            link.set_attribute("aria-label", &title)?;
        }
    }
    Ok(())
}

pub fn log_color_scheme(window: &Window, config: &BehaviorConfig) {
    let prefers_light = window
        .match_media("(prefers-color-scheme: light)")
        .ok()
        .flatten()
        .is_some_and(|query| query.matches());

    if prefers_light {
        log_event(
            config,
            LogLevel::Info,
            "theme.light_preference",
            json!({ "applied": "dark" }),
        );
    }
}
