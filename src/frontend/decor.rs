use gloo_events::{EventListener, EventListenerOptions};
use wasm_bindgen::JsCast;
use web_sys::{window, Document, Element, HtmlElement};

use super::dom::{clear_style, query, query_all, set_style};
use crate::effects::{
    mailto_href, mentions_contact_email, particle_style, ACCENT_COLOR, CARD_HOVER_TRANSFORM,
    PROFILE_HOVER_TRANSFORM, PROFILE_REST_TRANSFORM,
};
use crate::error::BehaviorError;

const HOVER_CARDS: &str = ".timeline-content, .education-card, .project-card, .contact-card";

fn on_hover(element: &HtmlElement, enter: impl Fn(&HtmlElement) + 'static, leave: impl Fn(&HtmlElement) + 'static) {
    let target = element.clone();
    EventListener::new(element, "mouseenter", move |_| enter(&target)).forget();
    let target = element.clone();
    EventListener::new(element, "mouseleave", move |_| leave(&target)).forget();
}

pub fn create_particles(document: &Document, count: usize) -> Result<(), BehaviorError> {
    let hero = query(document, ".hero").ok_or(BehaviorError::MissingElement(".hero"))?;

    for _ in 0..count {
        let particle: HtmlElement = document.create_element("div")?.unchecked_into();
        particle.set_class_name("particle");
        particle.style().set_css_text(&particle_style(js_sys::Math::random));
        hero.append_child(&particle)?;
    }
    Ok(())
}

pub fn install_card_hover(document: &Document) -> Result<(), BehaviorError> {
    for card in query_all(document, HOVER_CARDS) {
        on_hover(
            &card,
            |card| set_style(card, "transform", CARD_HOVER_TRANSFORM),
            |card| clear_style(card, "transform"),
        );
    }
    Ok(())
}

pub fn install_profile_hover(document: &Document) -> Result<(), BehaviorError> {
    let image = query(document, ".profile-img").ok_or(BehaviorError::MissingElement(".profile-img"))?;
    on_hover(
        &image,
        |image| set_style(image, "transform", PROFILE_HOVER_TRANSFORM),
        |image| set_style(image, "transform", PROFILE_REST_TRANSFORM),
    );
    Ok(())
}

/// Text that mentions the contact address opens a mail draft when clicked.
/// Real anchors keep their own behavior.
pub fn install_email_links(document: &Document) -> Result<(), BehaviorError> {
    let candidates = query_all(document, "p, span, a")
        .into_iter()
        .filter(|element| mentions_contact_email(&element.text_content().unwrap_or_default()));

    for element in candidates {
        set_style(&element, "cursor", "pointer");

        EventListener::new_with_options(
            &element,
            "click",
            EventListenerOptions::enable_prevent_default(),
            |event| {
                let is_anchor = event
                    .target()
                    .and_then(|target| target.dyn_into::<Element>().ok())
                    .is_some_and(|target| target.tag_name().eq_ignore_ascii_case("a"));
                if is_anchor {
                    return;
                }

                event.prevent_default();
                if let Some(win) = window() {
                    let _ = win.open_with_url_and_target(&mailto_href(), "_blank");
                }
            },
        )
        .forget();

        if !element.tag_name().eq_ignore_ascii_case("a") {
            on_hover(
                &element,
                |element| {
                    set_style(element, "color", ACCENT_COLOR);
                    set_style(element, "transition", "color 0.2s ease");
                },
                |element| clear_style(element, "color"),
            );
        }
    }
    Ok(())
}
