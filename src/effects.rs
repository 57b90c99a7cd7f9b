//! Decorative flourishes: parallax, typing, particles, hover transforms and
//! the small accessibility and contact-link helpers.

use crate::config::CONTACT_EMAIL;

pub const CARD_HOVER_TRANSFORM: &str = "translateY(-5px) scale(1.02)";
pub const PROFILE_HOVER_TRANSFORM: &str = "scale(1.05) rotate(5deg)";
pub const PROFILE_REST_TRANSFORM: &str = "scale(1) rotate(0deg)";
pub const TYPING_CARET: &str = "2px solid #00d4ff";
pub const ACCENT_COLOR: &str = "#00d4ff";
pub const THEME_TOGGLE_PRESSED_SCALE: f64 = 0.9;

pub trait EffectsView {
    fn set_parallax(&mut self, layer: usize, offset_px: f64);
    fn set_typed_text(&mut self, text: &str);
    fn set_typing_caret(&mut self, visible: bool);
    fn set_theme_toggle_scale(&mut self, scale: f64);
}

pub fn parallax_offset(scroll_top: f64, speed: f64) -> f64 {
    -(scroll_top * speed)
}

/// Reads a `data-speed` value, falling back when absent or unparsable.
pub fn parse_parallax_speed(raw: Option<&str>, default: f64) -> f64 {
    raw.and_then(|value| value.trim().parse::<f64>().ok())
        .filter(|value| value.is_finite())
        .unwrap_or(default)
}

pub fn translate_y(offset_px: f64) -> String {
    format!("translateY({offset_px}px)")
}

pub fn scale(value: f64) -> String {
    format!("scale({value})")
}

/// Floating decorative layers, each moving at its own speed.
#[derive(Clone, Debug, Default)]
pub struct ParallaxField {
    speeds: Vec<f64>,
}

impl ParallaxField {
    pub fn new(speeds: Vec<f64>) -> Self {
        Self { speeds }
    }

    pub fn len(&self) -> usize {
        self.speeds.len()
    }

    pub fn is_empty(&self) -> bool {
        self.speeds.is_empty()
    }

    pub fn update(&self, scroll_top: f64, view: &mut impl EffectsView) {
        for (layer, speed) in self.speeds.iter().enumerate() {
            view.set_parallax(layer, parallax_offset(scroll_top, *speed));
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TypingStep {
    Typed,
    Finished,
}

/// Reveals a title one character at a time.
#[derive(Clone, Debug)]
pub struct TypingEffect {
    chars: Vec<char>,
    typed: usize,
}

impl TypingEffect {
    pub fn new(text: &str) -> Self {
        Self {
            chars: text.chars().collect(),
            typed: 0,
        }
    }

    pub fn typed_text(&self) -> String {
        self.chars[..self.typed].iter().collect()
    }

    pub fn is_complete(&self) -> bool {
        self.typed >= self.chars.len()
    }

    /// Types the next character, or reports that the text is complete.
    pub fn step(&mut self, view: &mut impl EffectsView) -> TypingStep {
        if self.is_complete() {
            return TypingStep::Finished;
        }

        self.typed += 1;
        view.set_typed_text(&self.typed_text());
        TypingStep::Typed
    }
}

/// Inline style for one hero particle. `random` yields values in `[0, 1)`.
pub fn particle_style(mut random: impl FnMut() -> f64) -> String {
    let left = random() * 100.0;
    let top = random() * 100.0;
    let duration = 3.0 + random() * 4.0;
    let delay = random() * 2.0;

    format!(
        "position: absolute; width: 2px; height: 2px; background: {ACCENT_COLOR}; \
         border-radius: 50%; opacity: 0.3; pointer-events: none; \
         left: {left}%; top: {top}%; \
         animation: float {duration}s ease-in-out infinite; animation-delay: {delay}s;"
    )
}

pub fn mentions_contact_email(text: &str) -> bool {
    text.contains(CONTACT_EMAIL)
}

pub fn mailto_href() -> String {
    format!("mailto:{CONTACT_EMAIL}")
}

/// Keys that activate a focusable card.
pub fn activates_on_key(key: &str) -> bool {
    matches!(key, "Enter" | " ")
}

pub fn skill_aria_label(percent: &str) -> String {
    format!("Skill level: {percent}%")
}
