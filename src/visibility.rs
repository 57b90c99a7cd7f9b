use serde::Serialize;
use std::fmt;
use std::str::FromStr;

use crate::error::BehaviorError;
use crate::viewport::Rect;

/// Browsers report ratios at a threshold crossing rounded just below it.
const RATIO_TOLERANCE: f64 = 1e-3;

/// Per-edge viewport adjustment in px; negative values shrink the viewport.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize)]
pub struct RootMargin {
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
    pub left: f64,
}

impl RootMargin {
    pub fn bottom(px: f64) -> Self {
        Self {
            bottom: px,
            ..Self::default()
        }
    }

    /// Applies the margin to the viewport box.
    pub fn apply(&self, viewport: Rect) -> Rect {
        Rect::new(
            viewport.top - self.top,
            viewport.left - self.left,
            viewport.width + self.left + self.right,
            viewport.height + self.top + self.bottom,
        )
    }
}

impl fmt::Display for RootMargin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}px {}px {}px {}px",
            self.top, self.right, self.bottom, self.left
        )
    }
}

impl FromStr for RootMargin {
    type Err = BehaviorError;

    /// Parses the CSS shorthand form: one to four pixel lengths.
    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let invalid = || BehaviorError::InvalidRootMargin(value.to_string());

        let lengths = value
            .split_whitespace()
            .map(|part| {
                let number = part.strip_suffix("px").unwrap_or(part);
                match number.parse::<f64>() {
                    Ok(px) if px.is_finite() && (part.ends_with("px") || px == 0.0) => Ok(px),
                    _ => Err(invalid()),
                }
            })
            .collect::<Result<Vec<_>, _>>()?;

        let (top, right, bottom, left) = match lengths.as_slice() {
            [all] => (*all, *all, *all, *all),
            [vertical, horizontal] => (*vertical, *horizontal, *vertical, *horizontal),
            [top, horizontal, bottom] => (*top, *horizontal, *bottom, *horizontal),
            [top, right, bottom, left] => (*top, *right, *bottom, *left),
            _ => return Err(invalid()),
        };

        Ok(Self {
            top,
            right,
            bottom,
            left,
        })
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TriggerOptions {
    pub threshold: f64,
    pub margin: RootMargin,
}

impl TriggerOptions {
    pub fn new(threshold: f64, margin: RootMargin) -> Self {
        Self {
            threshold: threshold.clamp(0.0, 1.0),
            margin,
        }
    }
}

/// Fraction of `element` inside `root`, following the intersection-observer rules.
pub fn intersection_ratio(element: Rect, root: Rect) -> f64 {
    let overlap_width = element.right().min(root.right()) - element.left.max(root.left);
    let overlap_height = element.bottom().min(root.bottom()) - element.top.max(root.top);

    if overlap_width < 0.0 || overlap_height < 0.0 {
        return 0.0;
    }

    let area = element.area();
    if area == 0.0 {
        return 1.0;
    }

    (overlap_width * overlap_height / area).clamp(0.0, 1.0)
}

struct Observation<E, T> {
    element: E,
    tag: T,
    options: TriggerOptions,
    fired: bool,
}

/// Fire-once visibility dispatch over a set of elements.
///
/// Each element carries its own `fired` flag, checked before dispatch, so an
/// element whose ratio oscillates around the threshold is reported only once.
pub struct VisibilityTrigger<E, T> {
    observations: Vec<Observation<E, T>>,
}

impl<E, T> Default for VisibilityTrigger<E, T> {
    fn default() -> Self {
        Self {
            observations: Vec::new(),
        }
    }
}

impl<E: PartialEq, T: Clone> VisibilityTrigger<E, T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `element`; observing an already-registered element is ignored.
    pub fn observe(&mut self, element: E, tag: T, options: TriggerOptions) {
        if self.has_element(&element) {
            return;
        }

        self.observations.push(Observation {
            element,
            tag,
            options,
            fired: false,
        });
    }

    /// Feeds a measured ratio; returns the element's tag the first time it qualifies.
    pub fn report(&mut self, element: &E, ratio: f64) -> Option<T> {
        let index = self.position(element)?;
        let observation = &mut self.observations[index];

        if observation.fired || ratio <= 0.0 || ratio + RATIO_TOLERANCE < observation.options.threshold {
            return None;
        }

        observation.fired = true;
        Some(observation.tag.clone())
    }

    /// Measures every element still waiting and dispatches those that qualify.
    pub fn evaluate(
        &mut self,
        viewport: Rect,
        mut rect_of: impl FnMut(&E) -> Option<Rect>,
    ) -> Vec<(usize, T)> {
        let mut fired = Vec::new();

        for (index, observation) in self.observations.iter_mut().enumerate() {
            if observation.fired {
                continue;
            }

            let Some(rect) = rect_of(&observation.element) else {
                continue;
            };

            let ratio = intersection_ratio(rect, observation.options.margin.apply(viewport));
            if ratio > 0.0 && ratio + RATIO_TOLERANCE >= observation.options.threshold {
                observation.fired = true;
                fired.push((index, observation.tag.clone()));
            }
        }

        fired
    }

    pub fn element(&self, index: usize) -> Option<&E> {
        self.observations.get(index).map(|observation| &observation.element)
    }

    pub fn has_element(&self, element: &E) -> bool {
        self.position(element).is_some()
    }

    pub fn has_fired(&self, element: &E) -> bool {
        self.position(element)
            .is_some_and(|index| self.observations[index].fired)
    }

    pub fn len(&self) -> usize {
        self.observations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.observations.is_empty()
    }

    /// Number of elements that have not fired yet.
    pub fn pending(&self) -> usize {
        self.observations
            .iter()
            .filter(|observation| !observation.fired)
            .count()
    }

    fn position(&self, element: &E) -> Option<usize> {
        self.observations
            .iter()
            .position(|observation| observation.element == *element)
    }
}
