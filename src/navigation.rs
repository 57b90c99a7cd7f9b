use crate::drawer::{DrawerController, DrawerView};

/// A vertically bounded page region reachable from the navigation.
#[derive(Clone, Debug, PartialEq)]
pub struct Section {
    pub id: String,
    pub start: f64,
    pub height: f64,
}

impl Section {
    pub fn new(id: impl Into<String>, start: f64, height: f64) -> Self {
        Self {
            id: id.into(),
            start,
            height,
        }
    }

    pub fn contains(&self, position: f64) -> bool {
        position >= self.start && position < self.start + self.height
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NavigationEntry {
    pub section_id: String,
    pub active: bool,
}

pub trait NavView {
    /// Mirrors every entry's active flag onto its link, in entry order.
    fn render_active(&mut self, entries: &[NavigationEntry]);
}

pub trait SmoothScroll {
    fn smooth_scroll_to(&mut self, top: f64);
}

/// Returns the first section (document order) whose span holds `scroll_position + offset`.
pub fn compute_active_section(scroll_position: f64, sections: &[Section], offset: f64) -> Option<&Section> {
    let probe = scroll_position + offset;
    sections.iter().find(|section| section.contains(probe))
}

/// Extracts the section id from a same-page link such as `#about`.
pub fn fragment_target(href: &str) -> Option<&str> {
    href.trim()
        .strip_prefix('#')
        .filter(|id| !id.is_empty())
}

/// Keeps at most one navigation entry active, tracking the section in view.
#[derive(Clone, Debug)]
pub struct NavigationCoordinator {
    entries: Vec<NavigationEntry>,
    offset: f64,
}

impl NavigationCoordinator {
    pub fn new<I, S>(section_ids: I, offset: f64) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            entries: section_ids
                .into_iter()
                .map(|id| NavigationEntry {
                    section_id: id.into(),
                    active: false,
                })
                .collect(),
            offset,
        }
    }

    pub fn entries(&self) -> &[NavigationEntry] {
        &self.entries
    }

    pub fn active_id(&self) -> Option<&str> {
        self.entries
            .iter()
            .find(|entry| entry.active)
            .map(|entry| entry.section_id.as_str())
    }

    /// Activates the entry for `section_id` and clears the rest. Returns
    /// whether anything changed; an already-active id leaves the view untouched.
    pub fn set_active(&mut self, section_id: &str, view: &mut impl NavView) -> bool {
        self.apply(Some(section_id), view)
    }

    pub fn clear_active(&mut self, view: &mut impl NavView) -> bool {
        self.apply(None, view)
    }

    /// Tracks the section under the scroll position.
    ///
    /// Above every section nothing is active; in gaps or past the last
    /// section the previous entry stays active.
    pub fn sync_to_scroll(&mut self, scroll_position: f64, sections: &[Section], view: &mut impl NavView) -> bool {
        if let Some(section) = compute_active_section(scroll_position, sections, self.offset) {
            let id = section.id.clone();
            return self.set_active(&id, view);
        }

        let above_all = sections
            .iter()
            .map(|section| section.start)
            .min_by(f64::total_cmp)
            .is_some_and(|first_start| scroll_position + self.offset < first_start);

        if above_all {
            self.clear_active(view)
        } else {
            false
        }
    }

    /// Handles a navigation link click. Broken anchors are ignored; otherwise
    /// the drawer closes, the target scrolls to the top and its entry activates.
    pub fn handle_nav_click<V>(
        &mut self,
        href: &str,
        sections: &[Section],
        drawer: &mut DrawerController,
        view: &mut V,
    ) -> bool
    where
        V: NavView + DrawerView + SmoothScroll,
    {
        let Some(target) = fragment_target(href)
            .and_then(|id| sections.iter().find(|section| section.id == id))
        else {
            return false;
        };

        drawer.close(view);
        view.smooth_scroll_to(target.start);
        self.set_active(&target.id, view);
        true
    }

    fn apply(&mut self, section_id: Option<&str>, view: &mut impl NavView) -> bool {
        let changed = self
            .entries
            .iter()
            .any(|entry| entry.active != (Some(entry.section_id.as_str()) == section_id));

        if !changed {
            return false;
        }

        for entry in &mut self.entries {
            entry.active = Some(entry.section_id.as_str()) == section_id;
        }
        view.render_active(&self.entries);
        true
    }
}
