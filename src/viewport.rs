use crate::navigation::Section;

/// Axis-aligned box in viewport coordinates (CSS pixels).
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Rect {
    pub top: f64,
    pub left: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub fn new(top: f64, left: f64, width: f64, height: f64) -> Self {
        Self {
            top,
            left,
            width,
            height,
        }
    }

    pub fn bottom(&self) -> f64 {
        self.top + self.height
    }

    pub fn right(&self) -> f64 {
        self.left + self.width
    }

    pub fn area(&self) -> f64 {
        self.width.max(0.0) * self.height.max(0.0)
    }
}

/// Scroll and size readings taken from the window for one frame.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct ViewportMetrics {
    pub scroll_top: f64,
    pub viewport_width: f64,
    pub viewport_height: f64,
    pub document_height: f64,
}

impl ViewportMetrics {
    /// Distance the document can scroll; zero when the page fits.
    pub fn scrollable_height(&self) -> f64 {
        (self.document_height - self.viewport_height).max(0.0)
    }

    pub fn viewport_rect(&self) -> Rect {
        Rect::new(0.0, 0.0, self.viewport_width, self.viewport_height)
    }
}

pub trait ViewportSignal {
    fn metrics(&self) -> ViewportMetrics;

    /// Sections in document order with their current offsets.
    fn sections(&self) -> Vec<Section>;
}
