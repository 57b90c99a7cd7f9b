use serde_json::json;

use crate::chrome::{ChromeView, ScrollChrome};
use crate::config::BehaviorConfig;
use crate::drawer::{DrawerController, DrawerState, DrawerView};
use crate::effects::{
    EffectsView, ParallaxField, TypingEffect, TypingStep, THEME_TOGGLE_PRESSED_SCALE,
};
use crate::logging::{log_event, LogLevel};
use crate::navigation::{NavView, NavigationCoordinator, Section, SmoothScroll};
use crate::reveal::{RevealAnimator, RevealView, SkillBarFill, SkillBarReveal};
use crate::timers::TimerQueue;
use crate::viewport::{Rect, ViewportMetrics};
use crate::visibility::TriggerOptions;

/// Deferred work processed by [`PortfolioBehavior::advance_timers`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Task {
    FillSkillBar(SkillBarFill),
    TypeNextChar,
    HideTypingCaret,
    ResetThemeToggle,
}

/// Owns all document-scoped UI state. Every host event goes through one of
/// the `on_*` methods; side effects are applied through the view traits.
pub struct PortfolioBehavior<E> {
    config: BehaviorConfig,
    navigation: NavigationCoordinator,
    drawer: DrawerController,
    chrome: ScrollChrome,
    reveal: RevealAnimator<E>,
    parallax: ParallaxField,
    typing: Option<TypingEffect>,
    timers: TimerQueue<Task>,
}

impl<E: PartialEq> PortfolioBehavior<E> {
    pub fn new<I, S>(config: BehaviorConfig, nav_section_ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let navigation = NavigationCoordinator::new(nav_section_ids, config.active_section_offset);
        let chrome = ScrollChrome::new(config.progress_visible_after, config.back_to_top_visible_after);
        let reveal = RevealAnimator::new(
            TriggerOptions::new(config.fade_threshold, config.fade_margin),
            TriggerOptions::new(config.skill_bar_threshold, config.skill_bar_margin),
        );

        Self {
            config,
            navigation,
            drawer: DrawerController::new(),
            chrome,
            reveal,
            parallax: ParallaxField::default(),
            typing: None,
            timers: TimerQueue::new(),
        }
    }

    pub fn config(&self) -> &BehaviorConfig {
        &self.config
    }

    pub fn navigation(&self) -> &NavigationCoordinator {
        &self.navigation
    }

    pub fn drawer(&self) -> &DrawerController {
        &self.drawer
    }

    pub fn chrome(&self) -> &ScrollChrome {
        &self.chrome
    }

    pub fn reveal(&self) -> &RevealAnimator<E> {
        &self.reveal
    }

    pub fn timers(&self) -> &TimerQueue<Task> {
        &self.timers
    }

    /// Per-frame scroll work, always in this order: progress, back-to-top, active section.
    pub fn on_scroll_frame<V>(&mut self, metrics: &ViewportMetrics, sections: &[Section], view: &mut V)
    where
        V: ChromeView + NavView,
    {
        self.chrome
            .update_progress(metrics.scroll_top, metrics.scrollable_height(), view);
        self.chrome.update_back_to_top(metrics.scroll_top, view);
        self.navigation.sync_to_scroll(metrics.scroll_top, sections, view);
    }

    pub fn on_nav_click<V>(&mut self, href: &str, sections: &[Section], view: &mut V) -> bool
    where
        V: NavView + DrawerView + SmoothScroll,
    {
        let navigated = self
            .navigation
            .handle_nav_click(href, sections, &mut self.drawer, view);

        if !navigated {
            log_event(
                &self.config,
                LogLevel::Debug,
                "nav.missing_target",
                json!({ "href": href }),
            );
        }
        navigated
    }

    pub fn on_menu_toggle(&mut self, view: &mut impl DrawerView) {
        let state = self.drawer.toggle(view);
        log_event(
            &self.config,
            LogLevel::Debug,
            "drawer.toggle",
            json!({ "open": state == DrawerState::Open }),
        );
    }

    pub fn on_resize(&mut self, viewport_width: f64, view: &mut impl DrawerView) -> bool {
        self.drawer
            .handle_resize(viewport_width, self.config.drawer_breakpoint, view)
    }

    pub fn on_key(&mut self, key: &str, view: &mut impl DrawerView) -> bool {
        self.drawer.handle_key(key, view)
    }

    pub fn on_back_to_top(&mut self, view: &mut impl SmoothScroll) {
        self.chrome.scroll_to_top(view);
    }

    /// The theme is pinned to dark; the control only plays a press animation.
    pub fn on_theme_toggle(&mut self, now_ms: f64, view: &mut impl EffectsView) {
        log_event(
            &self.config,
            LogLevel::Info,
            "theme.toggle",
            json!({ "note": "theme switching not available; dark theme stays active" }),
        );
        view.set_theme_toggle_scale(THEME_TOGGLE_PRESSED_SCALE);
        self.timers
            .schedule_after(now_ms, self.config.theme_feedback_ms, Task::ResetThemeToggle);
    }

    pub fn set_parallax_layers(&mut self, speeds: Vec<f64>) {
        self.parallax = ParallaxField::new(speeds);
    }

    pub fn on_parallax_frame(&mut self, scroll_top: f64, view: &mut impl EffectsView) {
        self.parallax.update(scroll_top, view);
    }

    /// Clears the title and schedules it to be typed back in.
    pub fn start_typing(&mut self, text: &str, now_ms: f64, view: &mut impl EffectsView) {
        view.set_typed_text("");
        view.set_typing_caret(true);
        self.typing = Some(TypingEffect::new(text));
        self.timers
            .schedule_after(now_ms, self.config.typing_start_delay_ms, Task::TypeNextChar);
    }

    pub fn register_fade(&mut self, element: E, view: &mut impl RevealView<E>) {
        self.reveal.register_fade(element, view);
    }

    pub fn register_skill_bar(&mut self, element: E) {
        self.reveal.register_skill_bar(element);
    }

    pub fn on_fade_visible(&mut self, element: &E, ratio: f64, view: &mut impl RevealView<E>) -> bool {
        self.reveal.on_fade_visible(element, ratio, view)
    }

    /// Returns true the one time the bar is revealed. The fill is scheduled
    /// only when the bar has a target width.
    pub fn on_skill_bar_visible(
        &mut self,
        element: &E,
        ratio: f64,
        now_ms: f64,
        view: &impl RevealView<E>,
    ) -> bool {
        let SkillBarReveal::Revealed(fill) = self.reveal.on_skill_bar_visible(element, ratio, view) else {
            return false;
        };

        if let Some(fill) = fill {
            self.schedule_fill(fill, now_ms);
        }
        true
    }

    /// Geometric reveal pass for hosts without an intersection observer.
    pub fn sweep_reveals<V>(
        &mut self,
        viewport: Rect,
        rect_of: impl FnMut(&E) -> Option<Rect>,
        now_ms: f64,
        view: &mut V,
    ) where
        V: RevealView<E>,
    {
        for fill in self.reveal.sweep(viewport, rect_of, view) {
            self.schedule_fill(fill, now_ms);
        }
    }

    /// Runs every task due at `now_ms`, including tasks those tasks schedule.
    pub fn advance_timers<V>(&mut self, now_ms: f64, view: &mut V) -> usize
    where
        V: RevealView<E> + EffectsView,
    {
        let mut ran = 0;

        while let Some(task) = self.timers.pop_due(now_ms) {
            ran += 1;
            match task.payload {
                Task::FillSkillBar(fill) => {
                    self.reveal.fill_skill_bar(fill, view);
                }
                Task::TypeNextChar => self.type_next_char(task.fire_at_ms, view),
                Task::HideTypingCaret => view.set_typing_caret(false),
                Task::ResetThemeToggle => view.set_theme_toggle_scale(1.0),
            }
        }

        ran
    }

    fn schedule_fill(&mut self, fill: SkillBarFill, now_ms: f64) {
        self.timers.schedule_after(
            now_ms,
            self.config.skill_bar_fill_delay_ms,
            Task::FillSkillBar(fill),
        );
    }

    fn type_next_char(&mut self, fired_at_ms: f64, view: &mut impl EffectsView) {
        let Some(typing) = self.typing.as_mut() else {
            return;
        };

        match typing.step(view) {
            TypingStep::Typed => {
                self.timers.schedule_after(
                    fired_at_ms,
                    self.config.typing_char_interval_ms,
                    Task::TypeNextChar,
                );
            }
            TypingStep::Finished => {
                self.typing = None;
                self.timers.schedule_after(
                    fired_at_ms,
                    self.config.typing_caret_hold_ms,
                    Task::HideTypingCaret,
                );
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::navigation::NavigationEntry;
    use std::collections::HashMap;

    #[derive(Default)]
    struct RecordingView {
        log: Vec<String>,
        active: Vec<bool>,
        drawer_open: bool,
        scrolls: Vec<f64>,
        targets: HashMap<&'static str, f64>,
        fills: Vec<(&'static str, f64)>,
        revealed: Vec<&'static str>,
        typed: String,
        caret: bool,
        toggle_scale: f64,
        parallax: Vec<f64>,
    }

    impl ChromeView for RecordingView {
        fn render_progress(&mut self, percent: f64, container_visible: bool) {
            self.log.push(format!("progress {percent} {container_visible}"));
        }

        fn render_back_to_top(&mut self, visible: bool) {
            self.log.push(format!("back-to-top {visible}"));
        }
    }

    impl NavView for RecordingView {
        fn render_active(&mut self, entries: &[NavigationEntry]) {
            self.log.push("nav".to_string());
            self.active = entries.iter().map(|entry| entry.active).collect();
        }
    }

    impl DrawerView for RecordingView {
        fn render_drawer(&mut self, open: bool) {
            self.drawer_open = open;
        }
    }

    impl SmoothScroll for RecordingView {
        fn smooth_scroll_to(&mut self, top: f64) {
            self.scrolls.push(top);
        }
    }

    impl RevealView<&'static str> for RecordingView {
        fn prepare_fade(&mut self, _element: &&'static str) {}

        fn mark_revealed(&mut self, element: &&'static str) {
            self.revealed.push(*element);
        }

        fn fill_target(&self, element: &&'static str) -> Option<f64> {
            self.targets.get(element).copied()
        }

        fn set_fill(&mut self, element: &&'static str, percent: f64) {
            self.fills.push((*element, percent));
        }
    }

    impl EffectsView for RecordingView {
        fn set_parallax(&mut self, _layer: usize, offset_px: f64) {
            self.parallax.push(offset_px);
        }

        fn set_typed_text(&mut self, text: &str) {
            self.typed = text.to_string();
        }

        fn set_typing_caret(&mut self, visible: bool) {
            self.caret = visible;
        }

        fn set_theme_toggle_scale(&mut self, scale: f64) {
            self.toggle_scale = scale;
        }
    }

    fn behavior() -> PortfolioBehavior<&'static str> {
        PortfolioBehavior::new(BehaviorConfig::default(), ["home", "about", "contact"])
    }

    fn sections() -> Vec<Section> {
        vec![
            Section::new("home", 0.0, 500.0),
            Section::new("about", 500.0, 800.0),
            Section::new("contact", 1_300.0, 900.0),
        ]
    }

    fn metrics(scroll_top: f64) -> ViewportMetrics {
        ViewportMetrics {
            scroll_top,
            viewport_width: 1_280.0,
            viewport_height: 800.0,
            document_height: 2_800.0,
        }
    }

    #[test]
    fn scroll_frame_updates_in_fixed_order() {
        let mut page = behavior();
        let mut view = RecordingView::default();

        page.on_scroll_frame(&metrics(400.0), &sections(), &mut view);

        assert_eq!(view.log, vec!["progress 20 true", "back-to-top true", "nav"]);
        assert_eq!(view.active, vec![false, true, false]);
    }

    #[test]
    fn top_of_page_hides_chrome() {
        let mut page = behavior();
        let mut view = RecordingView::default();

        page.on_scroll_frame(&metrics(0.0), &sections(), &mut view);

        assert!(!page.chrome().state().progress_visible);
        assert!(!page.chrome().state().back_to_top_visible);
        assert_eq!(page.navigation().active_id(), Some("home"));
    }

    #[test]
    fn resize_above_breakpoint_closes_open_drawer() {
        let mut page = behavior();
        let mut view = RecordingView::default();
        page.on_menu_toggle(&mut view);
        assert!(!page.on_resize(500.0, &mut view));

        assert!(page.on_resize(1_200.0, &mut view));
        assert_eq!(page.drawer().state(), DrawerState::Closed);
        assert!(!page.drawer().body_scroll_locked());
        assert!(!view.drawer_open);
    }

    #[test]
    fn missing_nav_target_is_silent() {
        let mut page = behavior();
        let mut view = RecordingView::default();
        let sections = vec![Section::new("home", 0.0, 500.0)];

        assert!(!page.on_nav_click("#contact", &sections, &mut view));
        assert!(view.scrolls.is_empty());
        assert_eq!(page.navigation().active_id(), None);
    }

    #[test]
    fn escape_key_closes_drawer() {
        let mut page = behavior();
        let mut view = RecordingView::default();
        page.on_menu_toggle(&mut view);

        assert!(page.on_key("Escape", &mut view));
        assert!(!page.on_key("Escape", &mut view));
        assert!(!page.drawer().is_open());
    }

    #[test]
    fn back_to_top_scrolls_to_origin() {
        let mut page = behavior();
        let mut view = RecordingView::default();

        page.on_back_to_top(&mut view);

        assert_eq!(view.scrolls, vec![0.0]);
    }

    #[test]
    fn skill_bar_fills_after_fixed_delay() {
        let mut page = behavior();
        let mut view = RecordingView::default();
        view.targets.insert("rust", 85.0);
        page.register_skill_bar("rust");

        assert!(page.on_skill_bar_visible(&"rust", 0.5, 1_000.0, &view));
        assert!(!page.on_skill_bar_visible(&"rust", 0.9, 1_050.0, &view));

        assert_eq!(page.advance_timers(1_299.0, &mut view), 0);
        assert!(view.fills.is_empty());

        assert_eq!(page.advance_timers(1_300.0, &mut view), 1);
        assert_eq!(view.fills, vec![("rust", 85.0)]);
        assert!(page.timers().is_empty());
    }

    #[test]
    fn skill_bar_without_width_reports_reveal_once() {
        let mut page = behavior();
        let mut view = RecordingView::default();
        page.register_skill_bar("mystery");

        assert!(page.on_skill_bar_visible(&"mystery", 1.0, 1_000.0, &view));
        assert!(!page.on_skill_bar_visible(&"mystery", 1.0, 1_100.0, &view));

        assert_eq!(page.reveal().pending_skill_bars(), 0);
        assert!(page.timers().is_empty());
        assert_eq!(page.advance_timers(2_000.0, &mut view), 0);
        assert!(view.fills.is_empty());
    }

    #[test]
    fn fade_reveal_is_immediate() {
        let mut page = behavior();
        let mut view = RecordingView::default();
        page.register_fade("card", &mut view);

        assert!(page.on_fade_visible(&"card", 0.2, &mut view));
        assert_eq!(view.revealed, vec!["card"]);
        assert!(page.timers().is_empty());
    }

    #[test]
    fn sweep_schedules_fills_like_observer_path() {
        let mut page = behavior();
        let mut view = RecordingView::default();
        view.targets.insert("go", 40.0);
        page.register_skill_bar("go");

        page.sweep_reveals(
            metrics(0.0).viewport_rect(),
            |_| Some(Rect::new(100.0, 0.0, 300.0, 20.0)),
            0.0,
            &mut view,
        );
        page.advance_timers(300.0, &mut view);

        assert_eq!(view.fills, vec![("go", 40.0)]);
    }

    #[test]
    fn typing_runs_on_virtual_time() {
        let mut page = behavior();
        let mut view = RecordingView::default();

        page.start_typing("Hi", 0.0, &mut view);
        assert_eq!(view.typed, "");
        assert!(view.caret);

        page.advance_timers(999.0, &mut view);
        assert_eq!(view.typed, "");

        page.advance_timers(1_000.0, &mut view);
        assert_eq!(view.typed, "H");

        page.advance_timers(1_100.0, &mut view);
        assert_eq!(view.typed, "Hi");

        // Completion is noticed on the next tick, then the caret holds for a second.
        page.advance_timers(2_199.0, &mut view);
        assert!(view.caret);
        page.advance_timers(2_200.0, &mut view);
        assert!(!view.caret);
        assert!(page.timers().is_empty());
    }

    #[test]
    fn late_pump_catches_up_in_one_pass() {
        let mut page = behavior();
        let mut view = RecordingView::default();

        page.start_typing("abc", 0.0, &mut view);
        let ran = page.advance_timers(10_000.0, &mut view);

        assert_eq!(ran, 5);
        assert_eq!(view.typed, "abc");
        assert!(!view.caret);
    }

    #[test]
    fn theme_toggle_presses_then_resets() {
        let mut page = behavior();
        let mut view = RecordingView::default();

        page.on_theme_toggle(0.0, &mut view);
        assert_eq!(view.toggle_scale, 0.9);

        page.advance_timers(150.0, &mut view);
        assert_eq!(view.toggle_scale, 1.0);
    }

    #[test]
    fn parallax_layers_follow_scroll() {
        let mut page = behavior();
        let mut view = RecordingView::default();
        page.set_parallax_layers(vec![0.5, 1.0]);

        page.on_parallax_frame(100.0, &mut view);

        assert_eq!(view.parallax, vec![-50.0, -100.0]);
    }
}
