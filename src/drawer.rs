pub const ESCAPE_KEY: &str = "Escape";

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum DrawerState {
    #[default]
    Closed,
    Open,
}

pub trait DrawerView {
    /// Shows or hides the panel and locks body scroll to match, in one step.
    fn render_drawer(&mut self, open: bool);
}

/// Mobile navigation panel. Body scroll is locked exactly while the panel is open.
#[derive(Clone, Debug, Default)]
pub struct DrawerController {
    state: DrawerState,
    body_scroll_locked: bool,
}

impl DrawerController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> DrawerState {
        self.state
    }

    pub fn is_open(&self) -> bool {
        self.state == DrawerState::Open
    }

    pub fn body_scroll_locked(&self) -> bool {
        self.body_scroll_locked
    }

    pub fn toggle(&mut self, view: &mut impl DrawerView) -> DrawerState {
        let next = match self.state {
            DrawerState::Closed => DrawerState::Open,
            DrawerState::Open => DrawerState::Closed,
        };
        self.transition(next, view);
        next
    }

    /// Forces the panel closed. Returns false when it was already closed.
    pub fn close(&mut self, view: &mut impl DrawerView) -> bool {
        if self.state == DrawerState::Closed {
            return false;
        }

        self.transition(DrawerState::Closed, view);
        true
    }

    /// Closes once the viewport is wider than the breakpoint.
    pub fn handle_resize(&mut self, viewport_width: f64, breakpoint: f64, view: &mut impl DrawerView) -> bool {
        viewport_width > breakpoint && self.close(view)
    }

    pub fn handle_key(&mut self, key: &str, view: &mut impl DrawerView) -> bool {
        key == ESCAPE_KEY && self.close(view)
    }

    fn transition(&mut self, next: DrawerState, view: &mut impl DrawerView) {
        self.state = next;
        self.body_scroll_locked = next == DrawerState::Open;
        view.render_drawer(self.body_scroll_locked);
    }
}
