use crate::navigation::SmoothScroll;

pub trait ChromeView {
    fn render_progress(&mut self, percent: f64, container_visible: bool);
    fn render_back_to_top(&mut self, visible: bool);
}

/// Percentage of the scrollable distance covered, clamped to `0..=100`.
pub fn progress_percent(scroll_top: f64, scrollable_height: f64) -> f64 {
    if scrollable_height.is_nan() || scrollable_height <= 0.0 || !scroll_top.is_finite() {
        return 0.0;
    }

    (100.0 * scroll_top / scrollable_height).clamp(0.0, 100.0)
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct ChromeState {
    pub progress_percent: f64,
    pub progress_visible: bool,
    pub back_to_top_visible: bool,
}

/// Scroll progress indicator and back-to-top control.
#[derive(Clone, Debug)]
pub struct ScrollChrome {
    progress_visible_after: f64,
    back_to_top_visible_after: f64,
    state: ChromeState,
}

impl ScrollChrome {
    pub fn new(progress_visible_after: f64, back_to_top_visible_after: f64) -> Self {
        Self {
            progress_visible_after,
            back_to_top_visible_after,
            state: ChromeState::default(),
        }
    }

    pub fn state(&self) -> ChromeState {
        self.state
    }

    pub fn update_progress(&mut self, scroll_top: f64, scrollable_height: f64, view: &mut impl ChromeView) {
        self.state.progress_percent = progress_percent(scroll_top, scrollable_height);
        self.state.progress_visible = scroll_top > self.progress_visible_after;
        view.render_progress(self.state.progress_percent, self.state.progress_visible);
    }

    pub fn update_back_to_top(&mut self, scroll_top: f64, view: &mut impl ChromeView) {
        self.state.back_to_top_visible = scroll_top > self.back_to_top_visible_after;
        view.render_back_to_top(self.state.back_to_top_visible);
    }

    pub fn scroll_to_top(&self, view: &mut impl SmoothScroll) {
        view.smooth_scroll_to(0.0);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct RecordingView {
        progress: Vec<(f64, bool)>,
        back_to_top: Vec<bool>,
        scrolls: Vec<f64>,
    }

    impl ChromeView for RecordingView {
        fn render_progress(&mut self, percent: f64, container_visible: bool) {
            self.progress.push((percent, container_visible));
        }

        fn render_back_to_top(&mut self, visible: bool) {
            self.back_to_top.push(visible);
        }
    }

    impl SmoothScroll for RecordingView {
        fn smooth_scroll_to(&mut self, top: f64) {
            self.scrolls.push(top);
        }
    }

    #[test]
    fn top_of_page_hides_everything() {
        let mut chrome = ScrollChrome::new(50.0, 300.0);
        let mut view = RecordingView::default();

        chrome.update_progress(0.0, 2_000.0, &mut view);
        chrome.update_back_to_top(0.0, &mut view);

        assert_eq!(view.progress, vec![(0.0, false)]);
        assert_eq!(view.back_to_top, vec![false]);
    }

    #[test]
    fn mid_page_shows_progress_and_back_to_top() {
        let mut chrome = ScrollChrome::new(50.0, 300.0);
        let mut view = RecordingView::default();

        chrome.update_progress(400.0, 2_000.0, &mut view);
        chrome.update_back_to_top(400.0, &mut view);

        assert_eq!(
            chrome.state(),
            ChromeState {
                progress_percent: 20.0,
                progress_visible: true,
                back_to_top_visible: true,
            }
        );
    }

    #[test]
    fn thresholds_are_exclusive() {
        let mut chrome = ScrollChrome::new(50.0, 300.0);
        let mut view = RecordingView::default();

        chrome.update_progress(50.0, 2_000.0, &mut view);
        chrome.update_back_to_top(300.0, &mut view);

        assert!(!chrome.state().progress_visible);
        assert!(!chrome.state().back_to_top_visible);
    }

    #[test]
    fn percent_is_clamped_and_safe_on_short_pages() {
        assert_eq!(progress_percent(-30.0, 1_000.0), 0.0);
        assert_eq!(progress_percent(1_200.0, 1_000.0), 100.0);
        assert_eq!(progress_percent(0.0, 0.0), 0.0);
        assert_eq!(progress_percent(f64::NAN, 1_000.0), 0.0);
    }

    #[test]
    fn scroll_to_top_targets_origin() {
        let chrome = ScrollChrome::new(50.0, 300.0);
        let mut view = RecordingView::default();

        chrome.scroll_to_top(&mut view);

        assert_eq!(view.scrolls, vec![0.0]);
    }
}
