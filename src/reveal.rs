use crate::viewport::Rect;
use crate::visibility::{TriggerOptions, VisibilityTrigger};

pub trait RevealView<E> {
    /// Puts a fade-in element into its hidden starting state.
    fn prepare_fade(&mut self, element: &E);
    fn mark_revealed(&mut self, element: &E);
    /// Target fill for a skill bar, read when the bar is revealed.
    fn fill_target(&self, element: &E) -> Option<f64>;
    fn set_fill(&mut self, element: &E, percent: f64);
}

/// Parses a `data-width` style percentage such as `"85"` or `"85%"`.
pub fn parse_fill_percent(raw: &str) -> Option<f64> {
    let trimmed = raw.trim();
    let number = trimmed.strip_suffix('%').unwrap_or(trimmed).trim();

    number
        .parse::<f64>()
        .ok()
        .filter(|value| value.is_finite())
        .map(|value| value.clamp(0.0, 100.0))
}

/// A skill bar that became visible and is waiting for its delayed fill.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SkillBarFill {
    pub bar: usize,
    pub percent: f64,
}

/// Outcome of reporting a skill bar's visibility.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum SkillBarReveal {
    /// Below threshold, or already revealed earlier.
    Unchanged,
    /// First reveal. `None` when the bar has no usable target width.
    Revealed(Option<SkillBarFill>),
}

impl SkillBarReveal {
    pub fn is_revealed(&self) -> bool {
        matches!(self, Self::Revealed(_))
    }
}

/// One-shot reveal of fade-in elements and skill-bar fills.
pub struct RevealAnimator<E> {
    fade_options: TriggerOptions,
    skill_bar_options: TriggerOptions,
    fades: VisibilityTrigger<E, ()>,
    skill_bars: VisibilityTrigger<E, usize>,
    filled: Vec<bool>,
}

impl<E: PartialEq> RevealAnimator<E> {
    pub fn new(fade_options: TriggerOptions, skill_bar_options: TriggerOptions) -> Self {
        Self {
            fade_options,
            skill_bar_options,
            fades: VisibilityTrigger::new(),
            skill_bars: VisibilityTrigger::new(),
            filled: Vec::new(),
        }
    }

    pub fn fade_options(&self) -> TriggerOptions {
        self.fade_options
    }

    pub fn skill_bar_options(&self) -> TriggerOptions {
        self.skill_bar_options
    }

    pub fn register_fade(&mut self, element: E, view: &mut impl RevealView<E>) {
        view.prepare_fade(&element);
        self.fades.observe(element, (), self.fade_options);
    }

    pub fn register_skill_bar(&mut self, element: E) {
        let bar = self.skill_bars.len();
        if self.skill_bars.has_element(&element) {
            return;
        }

        self.skill_bars.observe(element, bar, self.skill_bar_options);
        self.filled.push(false);
    }

    /// Returns true the one time `element` is revealed.
    pub fn on_fade_visible(&mut self, element: &E, ratio: f64, view: &mut impl RevealView<E>) -> bool {
        if self.fades.report(element, ratio).is_none() {
            return false;
        }

        view.mark_revealed(element);
        true
    }

    /// Reports `Revealed` the one time `element` becomes visible, carrying
    /// the pending fill when the bar has a target.
    pub fn on_skill_bar_visible(
        &mut self,
        element: &E,
        ratio: f64,
        view: &impl RevealView<E>,
    ) -> SkillBarReveal {
        match self.skill_bars.report(element, ratio) {
            Some(bar) => SkillBarReveal::Revealed(self.pending_fill(bar, view)),
            None => SkillBarReveal::Unchanged,
        }
    }

    /// Geometric pass for hosts without an intersection observer.
    pub fn sweep<V>(
        &mut self,
        viewport: Rect,
        mut rect_of: impl FnMut(&E) -> Option<Rect>,
        view: &mut V,
    ) -> Vec<SkillBarFill>
    where
        V: RevealView<E>,
    {
        for (index, ()) in self.fades.evaluate(viewport, &mut rect_of) {
            if let Some(element) = self.fades.element(index) {
                view.mark_revealed(element);
            }
        }

        self.skill_bars
            .evaluate(viewport, &mut rect_of)
            .into_iter()
            .filter_map(|(_, bar)| self.pending_fill(bar, &*view))
            .collect()
    }

    /// Applies a delayed fill. Each bar animates at most once.
    pub fn fill_skill_bar(&mut self, fill: SkillBarFill, view: &mut impl RevealView<E>) -> bool {
        let Some(element) = self.skill_bars.element(fill.bar) else {
            return false;
        };

        match self.filled.get_mut(fill.bar) {
            Some(filled) if !*filled => {
                *filled = true;
                view.set_fill(element, fill.percent);
                true
            }
            _ => false,
        }
    }

    pub fn pending_fades(&self) -> usize {
        self.fades.pending()
    }

    pub fn pending_skill_bars(&self) -> usize {
        self.skill_bars.pending()
    }

    fn pending_fill(&self, bar: usize, view: &impl RevealView<E>) -> Option<SkillBarFill> {
        let element = self.skill_bars.element(bar)?;
        let percent = view.fill_target(element)?;
        Some(SkillBarFill { bar, percent })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::visibility::RootMargin;
    use std::collections::HashMap;

    #[derive(Default)]
    struct RecordingView {
        prepared: Vec<&'static str>,
        revealed: Vec<&'static str>,
        targets: HashMap<&'static str, f64>,
        fills: Vec<(&'static str, f64)>,
    }

    impl RevealView<&'static str> for RecordingView {
        fn prepare_fade(&mut self, element: &&'static str) {
            self.prepared.push(*element);
        }

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

    fn animator() -> RevealAnimator<&'static str> {
        RevealAnimator::new(
            TriggerOptions::new(0.1, RootMargin::bottom(-50.0)),
            TriggerOptions::new(0.3, RootMargin::bottom(-100.0)),
        )
    }

    #[test]
    fn fill_percent_parsing() {
        assert_eq!(parse_fill_percent("85"), Some(85.0));
        assert_eq!(parse_fill_percent(" 70% "), Some(70.0));
        assert_eq!(parse_fill_percent("140"), Some(100.0));
        assert_eq!(parse_fill_percent("lots"), None);
    }

    #[test]
    fn fade_elements_are_prepared_then_revealed_once() {
        let mut reveal = animator();
        let mut view = RecordingView::default();
        reveal.register_fade("card", &mut view);

        assert!(!reveal.on_fade_visible(&"card", 0.05, &mut view));
        assert!(reveal.on_fade_visible(&"card", 0.5, &mut view));
        assert!(!reveal.on_fade_visible(&"card", 0.9, &mut view));

        assert_eq!(view.prepared, vec!["card"]);
        assert_eq!(view.revealed, vec!["card"]);
        assert_eq!(reveal.pending_fades(), 0);
    }

    #[test]
    fn skill_bar_reads_target_at_reveal_and_fills_once() {
        let mut reveal = animator();
        let mut view = RecordingView::default();
        reveal.register_skill_bar("rust");
        reveal.register_skill_bar("rust");
        view.targets.insert("rust", 90.0);

        assert_eq!(reveal.on_skill_bar_visible(&"rust", 0.2, &view), SkillBarReveal::Unchanged);
        let SkillBarReveal::Revealed(Some(fill)) = reveal.on_skill_bar_visible(&"rust", 0.4, &view) else {
            panic!("bar crossed its threshold");
        };
        assert_eq!(fill, SkillBarFill { bar: 0, percent: 90.0 });
        assert_eq!(reveal.on_skill_bar_visible(&"rust", 1.0, &view), SkillBarReveal::Unchanged);

        assert!(reveal.fill_skill_bar(fill, &mut view));
        assert!(!reveal.fill_skill_bar(fill, &mut view));
        assert_eq!(view.fills, vec![("rust", 90.0)]);
    }

    #[test]
    fn bar_without_target_never_fills() {
        let mut reveal = animator();
        let view = RecordingView::default();
        reveal.register_skill_bar("mystery");

        let first = reveal.on_skill_bar_visible(&"mystery", 1.0, &view);
        assert_eq!(first, SkillBarReveal::Revealed(None));
        assert!(first.is_revealed());
        assert_eq!(reveal.on_skill_bar_visible(&"mystery", 1.0, &view), SkillBarReveal::Unchanged);
        assert_eq!(reveal.pending_skill_bars(), 0);
    }

    #[test]
    fn sweep_uses_geometry_and_margins() {
        let mut reveal = animator();
        let mut view = RecordingView::default();
        view.targets.insert("bar", 60.0);
        reveal.register_fade("near", &mut view);
        reveal.register_fade("far", &mut view);
        reveal.register_skill_bar("bar");

        let viewport = Rect::new(0.0, 0.0, 1_024.0, 768.0);
        let fills = reveal.sweep(
            viewport,
            |element| match *element {
                "near" => Some(Rect::new(600.0, 0.0, 300.0, 100.0)),
                "far" => Some(Rect::new(740.0, 0.0, 300.0, 100.0)),
                // 68px visible of 100, but the -100px margin hides it
                "bar" => Some(Rect::new(700.0, 0.0, 300.0, 100.0)),
                _ => None,
            },
            &mut view,
        );

        assert_eq!(view.revealed, vec!["near"]);
        assert!(fills.is_empty());

        let fills = reveal.sweep(viewport, |_| Some(Rect::new(100.0, 0.0, 300.0, 100.0)), &mut view);
        assert_eq!(view.revealed, vec!["near", "far"]);
        assert_eq!(fills, vec![SkillBarFill { bar: 0, percent: 60.0 }]);
    }
}
