use serde::Serialize;

use crate::logging::LogLevel;
use crate::visibility::RootMargin;

pub const DEFAULT_ACTIVE_SECTION_OFFSET: f64 = 100.0;
pub const DEFAULT_PROGRESS_VISIBLE_AFTER: f64 = 50.0;
pub const DEFAULT_BACK_TO_TOP_VISIBLE_AFTER: f64 = 300.0;
pub const DEFAULT_DRAWER_BREAKPOINT: f64 = 968.0;
pub const DEFAULT_FADE_THRESHOLD: f64 = 0.1;
pub const DEFAULT_FADE_BOTTOM_MARGIN: f64 = -50.0;
pub const DEFAULT_SKILL_BAR_THRESHOLD: f64 = 0.3;
pub const DEFAULT_SKILL_BAR_BOTTOM_MARGIN: f64 = -100.0;
pub const DEFAULT_SKILL_BAR_FILL_DELAY_MS: f64 = 300.0;
pub const DEFAULT_TYPING_START_DELAY_MS: f64 = 1_000.0;
pub const DEFAULT_TYPING_CHAR_INTERVAL_MS: f64 = 100.0;
pub const DEFAULT_TYPING_CARET_HOLD_MS: f64 = 1_000.0;
pub const DEFAULT_THEME_FEEDBACK_MS: f64 = 150.0;
pub const DEFAULT_PARTICLE_COUNT: usize = 20;
pub const DEFAULT_PARALLAX_SPEED: f64 = 0.5;
pub const DEFAULT_LOG_LEVEL: LogLevel = LogLevel::Info;
pub const CONTACT_EMAIL: &str = "mql.stam@gmail.com";
pub const SERVICE_WORKER_URL: &str = "/sw.js";
pub const SMOOTH_SCROLL_POLYFILL_URL: &str =
    "https://cdn.jsdelivr.net/gh/iamdustan/smoothscroll@master/src/smoothscroll.js";

const OFFSET_BOUNDS: (f64, f64) = (0.0, 1_000.0);
const VISIBILITY_SCROLL_BOUNDS: (f64, f64) = (0.0, 10_000.0);
const BREAKPOINT_BOUNDS: (f64, f64) = (320.0, 4_096.0);
const THRESHOLD_BOUNDS: (f64, f64) = (0.0, 1.0);
const MARGIN_BOUNDS: (f64, f64) = (-1_000.0, 1_000.0);
const DELAY_MS_BOUNDS: (f64, f64) = (0.0, 10_000.0);
const PARTICLE_COUNT_BOUNDS: (usize, usize) = (0, 200);

/// Presentation tuning values. Overrides come from `data-*` attributes on `<body>`.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BehaviorConfig {
    pub active_section_offset: f64,
    pub progress_visible_after: f64,
    pub back_to_top_visible_after: f64,
    pub drawer_breakpoint: f64,
    pub fade_threshold: f64,
    pub fade_margin: RootMargin,
    pub skill_bar_threshold: f64,
    pub skill_bar_margin: RootMargin,
    pub skill_bar_fill_delay_ms: f64,
    pub typing_start_delay_ms: f64,
    pub typing_char_interval_ms: f64,
    pub typing_caret_hold_ms: f64,
    pub theme_feedback_ms: f64,
    pub particle_count: usize,
    pub default_parallax_speed: f64,
    pub log_level: LogLevel,
}

impl Default for BehaviorConfig {
    fn default() -> Self {
        Self {
            active_section_offset: DEFAULT_ACTIVE_SECTION_OFFSET,
            progress_visible_after: DEFAULT_PROGRESS_VISIBLE_AFTER,
            back_to_top_visible_after: DEFAULT_BACK_TO_TOP_VISIBLE_AFTER,
            drawer_breakpoint: DEFAULT_DRAWER_BREAKPOINT,
            fade_threshold: DEFAULT_FADE_THRESHOLD,
            fade_margin: RootMargin::bottom(DEFAULT_FADE_BOTTOM_MARGIN),
            skill_bar_threshold: DEFAULT_SKILL_BAR_THRESHOLD,
            skill_bar_margin: RootMargin::bottom(DEFAULT_SKILL_BAR_BOTTOM_MARGIN),
            skill_bar_fill_delay_ms: DEFAULT_SKILL_BAR_FILL_DELAY_MS,
            typing_start_delay_ms: DEFAULT_TYPING_START_DELAY_MS,
            typing_char_interval_ms: DEFAULT_TYPING_CHAR_INTERVAL_MS,
            typing_caret_hold_ms: DEFAULT_TYPING_CARET_HOLD_MS,
            theme_feedback_ms: DEFAULT_THEME_FEEDBACK_MS,
            particle_count: DEFAULT_PARTICLE_COUNT,
            default_parallax_speed: DEFAULT_PARALLAX_SPEED,
            log_level: DEFAULT_LOG_LEVEL,
        }
    }
}

impl BehaviorConfig {
    /// Builds a config from attribute lookups such as `body.getAttribute(name)`.
    pub fn from_attributes(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();

        let fade_bottom = parse_attr_f64_with_bounds(
            &lookup,
            "data-fade-margin",
            DEFAULT_FADE_BOTTOM_MARGIN,
            MARGIN_BOUNDS,
        );
        let skill_bar_bottom = parse_attr_f64_with_bounds(
            &lookup,
            "data-skill-bar-margin",
            DEFAULT_SKILL_BAR_BOTTOM_MARGIN,
            MARGIN_BOUNDS,
        );

        Self {
            active_section_offset: parse_attr_f64_with_bounds(
                &lookup,
                "data-active-offset",
                defaults.active_section_offset,
                OFFSET_BOUNDS,
            ),
            progress_visible_after: parse_attr_f64_with_bounds(
                &lookup,
                "data-progress-visible-after",
                defaults.progress_visible_after,
                VISIBILITY_SCROLL_BOUNDS,
            ),
            back_to_top_visible_after: parse_attr_f64_with_bounds(
                &lookup,
                "data-back-to-top-after",
                defaults.back_to_top_visible_after,
                VISIBILITY_SCROLL_BOUNDS,
            ),
            drawer_breakpoint: parse_attr_f64_with_bounds(
                &lookup,
                "data-drawer-breakpoint",
                defaults.drawer_breakpoint,
                BREAKPOINT_BOUNDS,
            ),
            fade_threshold: parse_attr_f64_with_bounds(
                &lookup,
                "data-fade-threshold",
                defaults.fade_threshold,
                THRESHOLD_BOUNDS,
            ),
            fade_margin: RootMargin::bottom(fade_bottom),
            skill_bar_threshold: parse_attr_f64_with_bounds(
                &lookup,
                "data-skill-bar-threshold",
                defaults.skill_bar_threshold,
                THRESHOLD_BOUNDS,
            ),
            skill_bar_margin: RootMargin::bottom(skill_bar_bottom),
            skill_bar_fill_delay_ms: parse_attr_f64_with_bounds(
                &lookup,
                "data-skill-bar-delay-ms",
                defaults.skill_bar_fill_delay_ms,
                DELAY_MS_BOUNDS,
            ),
            typing_start_delay_ms: defaults.typing_start_delay_ms,
            typing_char_interval_ms: parse_attr_f64_with_bounds(
                &lookup,
                "data-typing-interval-ms",
                defaults.typing_char_interval_ms,
                DELAY_MS_BOUNDS,
            ),
            typing_caret_hold_ms: defaults.typing_caret_hold_ms,
            theme_feedback_ms: defaults.theme_feedback_ms,
            particle_count: parse_attr_usize_with_bounds(
                &lookup,
                "data-particle-count",
                defaults.particle_count,
                PARTICLE_COUNT_BOUNDS,
            ),
            default_parallax_speed: defaults.default_parallax_speed,
            log_level: parse_attr_non_empty_string(&lookup, "data-log-level")
                .and_then(|value| LogLevel::parse(&value))
                .unwrap_or(defaults.log_level),
        }
    }
}

fn parse_attr_non_empty_string(lookup: &impl Fn(&str) -> Option<String>, name: &str) -> Option<String> {
    lookup(name)
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

fn parse_attr_f64_with_bounds(
    lookup: &impl Fn(&str) -> Option<String>,
    name: &str,
    default: f64,
    bounds: (f64, f64),
) -> f64 {
    parse_attr_non_empty_string(lookup, name)
        .and_then(|value| value.parse::<f64>().ok())
        .filter(|value| value.is_finite() && (bounds.0..=bounds.1).contains(value))
        .unwrap_or(default)
}

fn parse_attr_usize_with_bounds(
    lookup: &impl Fn(&str) -> Option<String>,
    name: &str,
    default: usize,
    bounds: (usize, usize),
) -> usize {
    parse_attr_non_empty_string(lookup, name)
        .and_then(|value| value.parse::<usize>().ok())
        .filter(|value| (bounds.0..=bounds.1).contains(value))
        .unwrap_or(default)
}
