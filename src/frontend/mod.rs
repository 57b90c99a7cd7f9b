use std::cell::{Cell, RefCell};
use std::rc::Rc;

use gloo_events::{EventListener, EventListenerOptions};
use gloo_timers::callback::Timeout;
use js_sys::Reflect;
use serde_json::json;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{window, Document, DocumentReadyState, HtmlElement, KeyboardEvent, Window};

use crate::behavior::PortfolioBehavior;
use crate::config::BehaviorConfig;
use crate::effects::parse_parallax_speed;
use crate::error::BehaviorError;
use crate::externals::{load_polyfills, register_service_worker, HostCapabilities};
use crate::logging::{log_event, LogLevel};
use crate::navigation::fragment_target;
use crate::throttle::FrameThrottler;
use crate::viewport::ViewportSignal;

mod decor;
mod diagnostics;
pub mod dom;
mod observers;
mod registrar;

use dom::{bounding_rect, now_ms, AnimationFrames, DomSurface, DomViewport};
use registrar::WebRegistrar;

/// Document-lifetime state shared by every listener.
pub(crate) struct Page {
    window: Window,
    document: Document,
    config: BehaviorConfig,
    behavior: RefCell<PortfolioBehavior<HtmlElement>>,
    surface: RefCell<DomSurface>,
    viewport: DomViewport,
    frames: AnimationFrames,
    scroll_throttle: FrameThrottler,
    floating_throttle: FrameThrottler,
    armed_deadline: Cell<Option<f64>>,
    observer_supported: bool,
}

impl Page {
    fn mount(window: Window, document: Document, config: BehaviorConfig) -> Rc<Self> {
        let surface = DomSurface::collect(&document);
        let nav_ids: Vec<String> = surface
            .nav_links()
            .iter()
            .map(|link| {
                link.get_attribute("href")
                    .as_deref()
                    .and_then(fragment_target)
                    .unwrap_or_default()
                    .to_string()
            })
            .collect();

        let mut behavior = PortfolioBehavior::new(config.clone(), nav_ids);
        behavior.set_parallax_layers(
            surface
                .floating()
                .iter()
                .map(|element| {
                    parse_parallax_speed(
                        element.get_attribute("data-speed").as_deref(),
                        config.default_parallax_speed,
                    )
                })
                .collect(),
        );

        Rc::new(Self {
            observer_supported: observers::intersection_observer_supported(&window),
            viewport: DomViewport::new(&document),
            window,
            document,
            config,
            behavior: RefCell::new(behavior),
            surface: RefCell::new(surface),
            frames: AnimationFrames,
            scroll_throttle: FrameThrottler::new("scroll"),
            floating_throttle: FrameThrottler::new("floating"),
            armed_deadline: Cell::new(None),
        })
    }

    fn scroll_frame(&self) {
        let metrics = self.viewport.metrics();
        let sections = self.viewport.sections();
        self.behavior
            .borrow_mut()
            .on_scroll_frame(&metrics, &sections, &mut *self.surface.borrow_mut());
    }

    fn parallax_frame(&self) {
        let scroll_top = self.viewport.metrics().scroll_top;
        self.behavior
            .borrow_mut()
            .on_parallax_frame(scroll_top, &mut *self.surface.borrow_mut());
    }

    /// Measures pending reveal targets directly when no observer is available.
    fn sweep_reveals(self: &Rc<Self>) {
        let viewport = self.viewport.metrics().viewport_rect();
        self.behavior.borrow_mut().sweep_reveals(
            viewport,
            |element| Some(bounding_rect(element)),
            now_ms(),
            &mut *self.surface.borrow_mut(),
        );
        self.arm_timers();
    }

    fn on_scroll(self: &Rc<Self>) {
        let page = Rc::clone(self);
        self.scroll_throttle.schedule(&self.frames, move || {
            page.scroll_frame();
            if !page.observer_supported {
                page.sweep_reveals();
            }
        });

        if !self.surface.borrow().floating().is_empty() {
            let page = Rc::clone(self);
            self.floating_throttle
                .schedule(&self.frames, move || page.parallax_frame());
        }
    }

    /// Keeps one timeout armed for the earliest pending task.
    fn arm_timers(self: &Rc<Self>) {
        let Some(deadline) = self.behavior.borrow().timers().next_deadline() else {
            return;
        };
        if self.armed_deadline.get().is_some_and(|armed| armed <= deadline) {
            return;
        }

        self.armed_deadline.set(Some(deadline));
        let delay_ms = (deadline - now_ms()).max(0.0).ceil() as u32;
        let page = Rc::clone(self);
        Timeout::new(delay_ms, move || {
            if page.armed_deadline.get() == Some(deadline) {
                page.armed_deadline.set(None);
            }
            page.pump_timers(deadline.max(now_ms()));
        })
        .forget();
    }

    fn pump_timers(self: &Rc<Self>, now: f64) {
        self.behavior
            .borrow_mut()
            .advance_timers(now, &mut *self.surface.borrow_mut());
        self.arm_timers();
    }
}

/// Entry point: waits for the document, then wires every feature.
pub fn run() {
    console_error_panic_hook::set_once();

    let Some(window) = window() else {
        return;
    };
    let Some(document) = window.document() else {
        return;
    };

    let config = BehaviorConfig::from_attributes(|name| {
        document.body().and_then(|body| body.get_attribute(name))
    });
    diagnostics::install_error_handlers(&window, &config);

    if document.ready_state() == DocumentReadyState::Loading {
        let target = document.clone();
        EventListener::once(&target, "DOMContentLoaded", move |_| {
            start(window, document, config);
        })
        .forget();
    } else {
        start(window, document, config);
    }
}

fn start(window: Window, document: Document, config: BehaviorConfig) {
    log_event(
        &config,
        LogLevel::Debug,
        "config.resolved",
        serde_json::to_value(&config).unwrap_or_default(),
    );

    let page = Page::mount(window, document, config);

    report(&page.config, "drawer", install_drawer(&page));
    report(&page.config, "navigation", install_navigation(&page));
    report(&page.config, "scroll", install_scroll(&page));
    report(&page.config, "back_to_top", install_back_to_top(&page));
    report(&page.config, "theme_toggle", install_theme_toggle(&page));
    report(&page.config, "resize", install_resize(&page));
    report(&page.config, "email_links", decor::install_email_links(&page.document));
    report(&page.config, "keyboard", install_keyboard(&page));
    report(&page.config, "reveal", observers::install(&page));
    report(&page.config, "typing", install_typing(&page));
    report(&page.config, "profile_hover", decor::install_profile_hover(&page.document));
    report(&page.config, "scroll_restoration", diagnostics::preserve_scroll_position(&page.window));
    report(&page.config, "hover_effects", decor::install_card_hover(&page.document));
    report(
        &page.config,
        "particles",
        decor::create_particles(&page.document, page.config.particle_count),
    );
    report(&page.config, "performance", diagnostics::install_performance_monitor(&page.window, &page.config));
    report(&page.config, "interactions", diagnostics::track_interactions(&page.document, &page.config));
    report(&page.config, "accessibility", diagnostics::enhance_accessibility(&page.document));
    report(&page.config, "externals", install_externals(&page));

    diagnostics::log_color_scheme(&page.window, &page.config);
    page.scroll_frame();
    log_event(&page.config, LogLevel::Info, "page.initialized", json!({}));
}

/// Logs a feature that could not be installed; other features carry on.
fn report(config: &BehaviorConfig, feature: &str, result: Result<(), BehaviorError>) {
    match result {
        Ok(()) => {}
        Err(BehaviorError::MissingElement(role)) => log_event(
            config,
            LogLevel::Debug,
            "feature.skipped",
            json!({ "feature": feature, "missing": role }),
        ),
        Err(error) => log_event(
            config,
            LogLevel::Error,
            "feature.failed",
            json!({ "feature": feature, "error": error.to_string() }),
        ),
    }
}

fn install_drawer(page: &Rc<Page>) -> Result<(), BehaviorError> {
    let toggle = page
        .surface
        .borrow()
        .menu_toggle()
        .cloned()
        .ok_or(BehaviorError::MissingElement("#mobileMenuToggle"))?;

    let page = Rc::clone(page);
    EventListener::new(&toggle, "click", move |_| {
        page.behavior
            .borrow_mut()
            .on_menu_toggle(&mut *page.surface.borrow_mut());
    })
    .forget();
    Ok(())
}

fn install_navigation(page: &Rc<Page>) -> Result<(), BehaviorError> {
    let links = page.surface.borrow().nav_links().to_vec();
    if links.is_empty() {
        return Err(BehaviorError::MissingElement(".nav-link"));
    }

    for link in links {
        let page = Rc::clone(page);
        let target = link.clone();
        EventListener::new_with_options(
            &target,
            "click",
            EventListenerOptions::enable_prevent_default(),
            move |event| {
                event.prevent_default();
                let href = link.get_attribute("href").unwrap_or_default();
                let sections = page.viewport.sections();
                page.behavior
                    .borrow_mut()
                    .on_nav_click(&href, &sections, &mut *page.surface.borrow_mut());
            },
        )
        .forget();
    }
    Ok(())
}

fn install_scroll(page: &Rc<Page>) -> Result<(), BehaviorError> {
    let listener_page = Rc::clone(page);
    EventListener::new(&page.window, "scroll", move |_| listener_page.on_scroll()).forget();
    Ok(())
}

fn install_back_to_top(page: &Rc<Page>) -> Result<(), BehaviorError> {
    let button = page
        .surface
        .borrow()
        .back_to_top()
        .cloned()
        .ok_or(BehaviorError::MissingElement("#backToTop"))?;

    let page = Rc::clone(page);
    EventListener::new(&button, "click", move |_| {
        page.behavior
            .borrow_mut()
            .on_back_to_top(&mut *page.surface.borrow_mut());
    })
    .forget();
    Ok(())
}

fn install_theme_toggle(page: &Rc<Page>) -> Result<(), BehaviorError> {
    let toggle = page
        .surface
        .borrow()
        .theme_toggle()
        .cloned()
        .ok_or(BehaviorError::MissingElement("#themeToggle"))?;

    let page = Rc::clone(page);
    EventListener::new(&toggle, "click", move |_| {
        page.behavior
            .borrow_mut()
            .on_theme_toggle(now_ms(), &mut *page.surface.borrow_mut());
        page.arm_timers();
    })
    .forget();
    Ok(())
}

fn install_resize(page: &Rc<Page>) -> Result<(), BehaviorError> {
    let listener_page = Rc::clone(page);
    EventListener::new(&page.window, "resize", move |_| {
        let width = listener_page.viewport.metrics().viewport_width;
        listener_page
            .behavior
            .borrow_mut()
            .on_resize(width, &mut *listener_page.surface.borrow_mut());
    })
    .forget();
    Ok(())
}

fn install_keyboard(page: &Rc<Page>) -> Result<(), BehaviorError> {
    let listener_page = Rc::clone(page);
    EventListener::new(&page.document, "keydown", move |event| {
        let Some(event) = event.dyn_ref::<KeyboardEvent>() else {
            return;
        };
        listener_page
            .behavior
            .borrow_mut()
            .on_key(&event.key(), &mut *listener_page.surface.borrow_mut());
    })
    .forget();
    Ok(())
}

fn install_typing(page: &Rc<Page>) -> Result<(), BehaviorError> {
    let text = page
        .surface
        .borrow()
        .hero_title()
        .ok_or(BehaviorError::MissingElement(".hero-title .gradient-text"))?
        .text_content()
        .unwrap_or_default();

    page.behavior
        .borrow_mut()
        .start_typing(&text, now_ms(), &mut *page.surface.borrow_mut());
    page.arm_timers();
    Ok(())
}

fn install_externals(page: &Rc<Page>) -> Result<(), BehaviorError> {
    let capabilities = HostCapabilities {
        service_worker: Reflect::has(
            page.window.navigator().as_ref(),
            &JsValue::from_str("serviceWorker"),
        )?,
        native_smooth_scroll: match page.document.document_element() {
            Some(root) => match root.dyn_into::<HtmlElement>() {
                Ok(root) => Reflect::has(root.style().as_ref(), &JsValue::from_str("scrollBehavior"))?,
                Err(_) => true,
            },
            None => true,
        },
    };

    let config = page.config.clone();
    let registrar = WebRegistrar::new(page.document.clone(), config.clone());
    load_polyfills(&config, capabilities, &registrar);

    if page.document.ready_state() == DocumentReadyState::Complete {
        register_service_worker(&config, capabilities, &registrar);
    } else {
        EventListener::once(&page.window, "load", move |_| {
            register_service_worker(&config, capabilities, &registrar);
        })
        .forget();
    }
    Ok(())
}
