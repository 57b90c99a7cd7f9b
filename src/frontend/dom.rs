use std::cell::RefCell;
use std::rc::Rc;

use wasm_bindgen::{closure::Closure, JsCast, JsValue};
use web_sys::{window, Document, HtmlElement, ScrollBehavior, ScrollToOptions};

use crate::chrome::ChromeView;
use crate::drawer::DrawerView;
use crate::effects::{scale, translate_y, EffectsView, TYPING_CARET};
use crate::navigation::{NavView, NavigationEntry, Section, SmoothScroll};
use crate::reveal::{parse_fill_percent, RevealView};
use crate::throttle::FrameHost;
use crate::viewport::{Rect, ViewportMetrics, ViewportSignal};

pub fn by_id(document: &Document, id: &str) -> Option<HtmlElement> {
    document
        .get_element_by_id(id)
        .and_then(|element| element.dyn_into::<HtmlElement>().ok())
}

pub fn query(document: &Document, selector: &str) -> Option<HtmlElement> {
    document
        .query_selector(selector)
        .ok()
        .flatten()
        .and_then(|element| element.dyn_into::<HtmlElement>().ok())
}

pub fn query_all(document: &Document, selector: &str) -> Vec<HtmlElement> {
    let Ok(list) = document.query_selector_all(selector) else {
        return Vec::new();
    };

    (0..list.length())
        .filter_map(|index| list.item(index))
        .filter_map(|node| node.dyn_into::<HtmlElement>().ok())
        .collect()
}

pub fn set_style(element: &HtmlElement, property: &str, value: &str) {
    let _ = element.style().set_property(property, value);
}

pub fn clear_style(element: &HtmlElement, property: &str) {
    let _ = element.style().remove_property(property);
}

pub fn toggle_class(element: &HtmlElement, class: &str, on: bool) {
    let _ = element.class_list().toggle_with_force(class, on);
}

pub fn bounding_rect(element: &HtmlElement) -> Rect {
    let rect = element.get_bounding_client_rect();
    Rect::new(rect.top(), rect.left(), rect.width(), rect.height())
}

/// Milliseconds on the page clock used for every scheduled task.
pub fn now_ms() -> f64 {
    window()
        .and_then(|w| w.performance())
        .map(|performance| performance.now())
        .unwrap_or_else(js_sys::Date::now)
}

/// Live window and section measurements.
pub struct DomViewport {
    document: Document,
    sections: Vec<HtmlElement>,
}

impl DomViewport {
    pub fn new(document: &Document) -> Self {
        Self {
            document: document.clone(),
            sections: query_all(document, ".section"),
        }
    }
}

impl ViewportSignal for DomViewport {
    fn metrics(&self) -> ViewportMetrics {
        let Some(win) = window() else {
            return ViewportMetrics::default();
        };

        let read = |value: Result<JsValue, JsValue>| value.ok().and_then(|value| value.as_f64()).unwrap_or(0.0);
        let document_height = self
            .document
            .document_element()
            .map(|root| f64::from(root.scroll_height()))
            .unwrap_or(0.0);

        ViewportMetrics {
            scroll_top: win.scroll_y().unwrap_or(0.0),
            viewport_width: read(win.inner_width()),
            viewport_height: read(win.inner_height()),
            document_height,
        }
    }

    fn sections(&self) -> Vec<Section> {
        self.sections
            .iter()
            .filter(|section| !section.id().is_empty())
            .map(|section| {
                Section::new(
                    section.id(),
                    f64::from(section.offset_top()),
                    f64::from(section.offset_height()),
                )
            })
            .collect()
    }
}

/// `requestAnimationFrame`; runs the callback inline if the request fails.
pub struct AnimationFrames;

impl FrameHost for AnimationFrames {
    fn request_frame(&self, callback: Box<dyn FnOnce()>) {
        let slot = Rc::new(RefCell::new(Some(callback)));

        let Some(win) = window() else {
            run_slot(&slot);
            return;
        };

        let pending = Rc::clone(&slot);
        let frame = Closure::once_into_js(move || run_slot(&pending));
        if win.request_animation_frame(frame.unchecked_ref()).is_err() {
            run_slot(&slot);
        }
    }
}

fn run_slot(slot: &Rc<RefCell<Option<Box<dyn FnOnce()>>>>) {
    let callback = slot.borrow_mut().take();
    if let Some(callback) = callback {
        callback();
    }
}

/// Every element the behavior writes to. Absent roles are `None` and the
/// matching updates are skipped.
pub struct DomSurface {
    body: Option<HtmlElement>,
    sidebar: Option<HtmlElement>,
    menu_toggle: Option<HtmlElement>,
    progress_bar: Option<HtmlElement>,
    progress_container: Option<HtmlElement>,
    back_to_top: Option<HtmlElement>,
    theme_toggle: Option<HtmlElement>,
    hero_title: Option<HtmlElement>,
    nav_links: Vec<HtmlElement>,
    floating: Vec<HtmlElement>,
}

impl DomSurface {
    pub fn collect(document: &Document) -> Self {
        Self {
            body: document.body(),
            sidebar: by_id(document, "sidebar"),
            menu_toggle: by_id(document, "mobileMenuToggle"),
            progress_bar: by_id(document, "scrollProgress"),
            progress_container: query(document, ".scroll-progress"),
            back_to_top: by_id(document, "backToTop"),
            theme_toggle: by_id(document, "themeToggle"),
            hero_title: query(document, ".hero-title .gradient-text"),
            nav_links: query_all(document, ".nav-link"),
            floating: query_all(document, ".floating-element"),
        }
    }

    pub fn menu_toggle(&self) -> Option<&HtmlElement> {
        self.menu_toggle.as_ref()
    }

    pub fn back_to_top(&self) -> Option<&HtmlElement> {
        self.back_to_top.as_ref()
    }

    pub fn theme_toggle(&self) -> Option<&HtmlElement> {
        self.theme_toggle.as_ref()
    }

    pub fn hero_title(&self) -> Option<&HtmlElement> {
        self.hero_title.as_ref()
    }

    pub fn nav_links(&self) -> &[HtmlElement] {
        &self.nav_links
    }

    pub fn floating(&self) -> &[HtmlElement] {
        &self.floating
    }
}

impl NavView for DomSurface {
    fn render_active(&mut self, entries: &[NavigationEntry]) {
        for (link, entry) in self.nav_links.iter().zip(entries) {
            toggle_class(link, "active", entry.active);
        }
    }
}

impl DrawerView for DomSurface {
    fn render_drawer(&mut self, open: bool) {
        if let Some(sidebar) = &self.sidebar {
            toggle_class(sidebar, "open", open);
        }
        if let Some(toggle) = &self.menu_toggle {
            toggle_class(toggle, "active", open);
        }
        if let Some(body) = &self.body {
            if open {
                set_style(body, "overflow", "hidden");
            } else {
                clear_style(body, "overflow");
            }
        }
    }
}

impl ChromeView for DomSurface {
    fn render_progress(&mut self, percent: f64, container_visible: bool) {
        let Some(bar) = &self.progress_bar else {
            return;
        };

        if let Some(container) = &self.progress_container {
            toggle_class(container, "visible", container_visible);
        }
        set_style(bar, "width", &format!("{percent}%"));
    }

    fn render_back_to_top(&mut self, visible: bool) {
        if let Some(button) = &self.back_to_top {
            toggle_class(button, "visible", visible);
        }
    }
}

impl SmoothScroll for DomSurface {
    fn smooth_scroll_to(&mut self, top: f64) {
        let Some(win) = window() else {
            return;
        };

        let options = ScrollToOptions::new();
        options.set_top(top);
        options.set_behavior(ScrollBehavior::Smooth);
        win.scroll_to_with_scroll_to_options(&options);
    }
}

impl RevealView<HtmlElement> for DomSurface {
    fn prepare_fade(&mut self, element: &HtmlElement) {
        let _ = element.class_list().add_1("fade-in");
    }

    fn mark_revealed(&mut self, element: &HtmlElement) {
        let _ = element.class_list().add_2("fade-in", "visible");
    }

    fn fill_target(&self, element: &HtmlElement) -> Option<f64> {
        parse_fill_percent(&element.get_attribute("data-width")?)
    }

    fn set_fill(&mut self, element: &HtmlElement, percent: f64) {
        set_style(element, "width", &format!("{percent}%"));
    }
}

impl EffectsView for DomSurface {
    fn set_parallax(&mut self, layer: usize, offset_px: f64) {
        if let Some(element) = self.floating.get(layer) {
            set_style(element, "transform", &translate_y(offset_px));
        }
    }

    fn set_typed_text(&mut self, text: &str) {
        if let Some(title) = &self.hero_title {
            title.set_text_content(Some(text));
        }
    }

    fn set_typing_caret(&mut self, visible: bool) {
        if let Some(title) = &self.hero_title {
            set_style(title, "border-right", if visible { TYPING_CARET } else { "none" });
        }
    }

    fn set_theme_toggle_scale(&mut self, value: f64) {
        if let Some(toggle) = &self.theme_toggle {
            set_style(toggle, "transform", &scale(value));
        }
    }
}
