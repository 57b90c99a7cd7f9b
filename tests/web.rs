#![cfg(target_arch = "wasm32")]

use portfolio_behavior::chrome::ChromeView;
use portfolio_behavior::drawer::DrawerState;
use portfolio_behavior::effects::EffectsView;
use portfolio_behavior::frontend::dom::{query_all, DomSurface};
use portfolio_behavior::navigation::{NavView, NavigationEntry};
use portfolio_behavior::reveal::RevealView;
use portfolio_behavior::{BehaviorConfig, PortfolioBehavior};
use wasm_bindgen::JsCast;
use wasm_bindgen_test::*;
use web_sys::{Document, HtmlElement};

wasm_bindgen_test_configure!(run_in_browser);

const PAGE: &str = r##"
<div class="scroll-progress"><div id="scrollProgress"></div></div>
<button id="mobileMenuToggle"></button>
<nav id="sidebar">
  <a class="nav-link" href="#home">Home</a>
  <a class="nav-link" href="#about">About</a>
</nav>
<button id="backToTop"></button>
<button id="themeToggle"></button>
<h1 class="hero-title"><span class="gradient-text">Hello</span></h1>
<div class="floating-element" data-speed="0.2"></div>
<div class="skill-progress" data-width="85%"></div>
<div class="project-card"></div>
"##;

/// Mounts the page markup for one test and removes it afterwards.
struct Fixture {
    document: Document,
    root: HtmlElement,
}

impl Fixture {
    fn mount() -> Self {
        let document = web_sys::window().unwrap().document().unwrap();
        let root: HtmlElement = document.create_element("div").unwrap().unchecked_into();
        root.set_inner_html(PAGE);
        document.body().unwrap().append_child(&root).unwrap();
        Self { document, root }
    }

    fn surface(&self) -> DomSurface {
        DomSurface::collect(&self.document)
    }

    fn one(&self, selector: &str) -> HtmlElement {
        query_all(&self.document, selector).into_iter().next().unwrap()
    }

    fn style(&self, selector: &str, property: &str) -> String {
        self.one(selector).style().get_property_value(property).unwrap()
    }

    fn has_class(&self, selector: &str, class: &str) -> bool {
        self.one(selector).class_list().contains(class)
    }
}

impl Drop for Fixture {
    fn drop(&mut self) {
        self.root.remove();
        if let Some(body) = self.document.body() {
            let _ = body.style().remove_property("overflow");
        }
    }
}

#[wasm_bindgen_test]
fn drawer_toggle_locks_body_and_marks_sidebar() {
    let fixture = Fixture::mount();
    let mut surface = fixture.surface();
    let mut behavior: PortfolioBehavior<HtmlElement> =
        PortfolioBehavior::new(BehaviorConfig::default(), ["home", "about"]);

    behavior.on_menu_toggle(&mut surface);
    assert_eq!(behavior.drawer().state(), DrawerState::Open);
    assert!(fixture.has_class("#sidebar", "open"));
    assert!(fixture.has_class("#mobileMenuToggle", "active"));
    assert_eq!(fixture.style("body", "overflow"), "hidden");

    assert!(behavior.on_key("Escape", &mut surface));
    assert!(!fixture.has_class("#sidebar", "open"));
    assert!(!fixture.has_class("#mobileMenuToggle", "active"));
    assert_eq!(fixture.style("body", "overflow"), "");
}

#[wasm_bindgen_test]
fn chrome_renders_progress_and_back_to_top() {
    let fixture = Fixture::mount();
    let mut surface = fixture.surface();

    surface.render_progress(42.0, true);
    surface.render_back_to_top(true);

    assert_eq!(fixture.style("#scrollProgress", "width"), "42%");
    assert!(fixture.has_class(".scroll-progress", "visible"));
    assert!(fixture.has_class("#backToTop", "visible"));

    surface.render_progress(0.0, false);
    surface.render_back_to_top(false);

    assert!(!fixture.has_class(".scroll-progress", "visible"));
    assert!(!fixture.has_class("#backToTop", "visible"));
}

#[wasm_bindgen_test]
fn nav_links_follow_active_entry() {
    let fixture = Fixture::mount();
    let mut surface = fixture.surface();

    surface.render_active(&[
        NavigationEntry {
            section_id: "home".to_string(),
            active: false,
        },
        NavigationEntry {
            section_id: "about".to_string(),
            active: true,
        },
    ]);

    let links = query_all(&fixture.document, ".nav-link");
    assert!(!links[0].class_list().contains("active"));
    assert!(links[1].class_list().contains("active"));
}

#[wasm_bindgen_test]
fn reveal_classes_and_skill_fill() {
    let fixture = Fixture::mount();
    let mut surface = fixture.surface();
    let card = fixture.one(".project-card");
    let bar = fixture.one(".skill-progress");

    surface.prepare_fade(&card);
    assert!(card.class_list().contains("fade-in"));
    assert!(!card.class_list().contains("visible"));

    surface.mark_revealed(&card);
    assert!(card.class_list().contains("visible"));

    assert_eq!(surface.fill_target(&bar), Some(85.0));
    surface.set_fill(&bar, 85.0);
    assert_eq!(bar.style().get_property_value("width").unwrap(), "85%");
}

#[wasm_bindgen_test]
fn effects_write_title_and_transforms() {
    let fixture = Fixture::mount();
    let mut surface = fixture.surface();

    surface.set_typed_text("He");
    surface.set_typing_caret(true);
    let title = fixture.one(".hero-title .gradient-text");
    assert_eq!(title.text_content().unwrap(), "He");
    assert!(!title.style().get_property_value("border-right").unwrap().is_empty());

    surface.set_typing_caret(false);
    surface.set_parallax(0, -20.0);
    surface.set_theme_toggle_scale(0.9);

    assert_eq!(fixture.style(".floating-element", "transform"), "translateY(-20px)");
    assert_eq!(fixture.style("#themeToggle", "transform"), "scale(0.9)");
}

#[wasm_bindgen_test]
fn config_reads_data_attributes() {
    let fixture = Fixture::mount();
    fixture.root.set_attribute("data-active-offset", "40").unwrap();
    fixture.root.set_attribute("data-particle-count", "not-a-number").unwrap();

    let config = BehaviorConfig::from_attributes(|name| fixture.root.get_attribute(name));

    assert_eq!(config.active_section_offset, 40.0);
    assert_eq!(config.particle_count, BehaviorConfig::default().particle_count);
}

#[wasm_bindgen_test]
fn run_on_parsed_document_wires_menu_toggle() {
    let fixture = Fixture::mount();
    assert_ne!(fixture.document.ready_state(), web_sys::DocumentReadyState::Loading);

    portfolio_behavior::frontend::run();
    fixture.one("#mobileMenuToggle").click();

    assert!(fixture.has_class("#sidebar", "open"));
    assert_eq!(fixture.style("body", "overflow"), "hidden");
}
