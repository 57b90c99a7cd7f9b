use std::rc::Rc;

use js_sys::{Array, Reflect};
use wasm_bindgen::{closure::Closure, JsCast, JsValue};
use web_sys::{HtmlElement, IntersectionObserver, IntersectionObserverEntry, IntersectionObserverInit};

use super::dom::{now_ms, query_all};
use super::Page;
use crate::error::BehaviorError;
use crate::visibility::TriggerOptions;

const FADE_SELECTOR: &str =
    ".timeline-item, .education-card, .project-card, .contact-card, .quality-item, .tech-icon";
const SKILL_BAR_SELECTOR: &str = ".skill-progress";

#[derive(Clone, Copy)]
enum RevealKind {
    Fade,
    SkillBar,
}

pub fn intersection_observer_supported(window: &web_sys::Window) -> bool {
    Reflect::has(window.as_ref(), &JsValue::from_str("IntersectionObserver")).unwrap_or(false)
}

/// Registers fade-in elements and skill bars, then attaches one observer per kind.
pub fn install(page: &Rc<Page>) -> Result<(), BehaviorError> {
    let fades = query_all(&page.document, FADE_SELECTOR);
    let bars = query_all(&page.document, SKILL_BAR_SELECTOR);

    let (fade_options, bar_options) = {
        let mut behavior = page.behavior.borrow_mut();
        let mut surface = page.surface.borrow_mut();
        for element in &fades {
            behavior.register_fade(element.clone(), &mut *surface);
        }
        for bar in &bars {
            behavior.register_skill_bar(bar.clone());
        }
        (behavior.reveal().fade_options(), behavior.reveal().skill_bar_options())
    };

    if !page.observer_supported {
        page.sweep_reveals();
        return Ok(());
    }

    if !bars.is_empty() {
        attach(page, RevealKind::SkillBar, bar_options, &bars)?;
    }
    if !fades.is_empty() {
        attach(page, RevealKind::Fade, fade_options, &fades)?;
    }
    Ok(())
}

fn attach(
    page: &Rc<Page>,
    kind: RevealKind,
    options: TriggerOptions,
    elements: &[HtmlElement],
) -> Result<(), BehaviorError> {
    let callback_page = Rc::clone(page);
    let callback = Closure::<dyn FnMut(Array, IntersectionObserver)>::new(
        move |entries: Array, observer: IntersectionObserver| {
            for entry in entries.iter() {
                let entry: IntersectionObserverEntry = entry.unchecked_into();
                let Ok(target) = entry.target().dyn_into::<HtmlElement>() else {
                    continue;
                };
                let ratio = if entry.is_intersecting() {
                    entry.intersection_ratio()
                } else {
                    0.0
                };

                if callback_page.report_visibility(kind, &target, ratio) {
                    observer.unobserve(&target);
                }
            }
            callback_page.arm_timers();
        },
    );

    let init = IntersectionObserverInit::new();
    init.set_threshold(&JsValue::from_f64(options.threshold));
    init.set_root_margin(&options.margin.to_string());

    let observer = IntersectionObserver::new_with_options(callback.as_ref().unchecked_ref(), &init)?;
    callback.forget();

    for element in elements {
        observer.observe(element);
    }
    Ok(())
}

impl Page {
    fn report_visibility(&self, kind: RevealKind, target: &HtmlElement, ratio: f64) -> bool {
        let mut behavior = self.behavior.borrow_mut();
        match kind {
            RevealKind::Fade => behavior.on_fade_visible(target, ratio, &mut *self.surface.borrow_mut()),
            RevealKind::SkillBar => {
                behavior.on_skill_bar_visible(target, ratio, now_ms(), &*self.surface.borrow())
            }
        }
    }
}
