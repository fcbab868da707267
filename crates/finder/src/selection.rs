//! Which feature is selected, and keeping the highlight and detail panel in step.

use crate::error::{FinderError, Result};
use crate::feature::FeatureId;
use crate::surface::{MapSurface, MarkerRegistry};
use serde::Serialize;
use tracing::debug;

/// Selection state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum SelectionState {
    /// Nothing selected; detail panel shows the prompt
    #[default]
    Unselected,
    /// One feature highlighted and shown in the detail panel
    Selected(FeatureId),
}

/// State machine over [`SelectionState`]
///
/// Every transition leaves at most one marker highlighted and never leaves
/// the detail panel pointing at a feature missing from the registry.
#[derive(Debug, Default)]
pub struct SelectionController {
    state: SelectionState,
}

impl SelectionController {
    /// Starts `Unselected`
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Current state
    #[must_use]
    pub fn state(&self) -> SelectionState {
        self.state
    }

    /// Selected id, if any
    #[must_use]
    pub fn selected(&self) -> Option<FeatureId> {
        match self.state {
            SelectionState::Selected(id) => Some(id),
            SelectionState::Unselected => None,
        }
    }

    /// Select `id`, moving the highlight from the previous selection
    ///
    /// Fails with `UnknownFeature` if `id` is not on the map; the state is
    /// left as it was.
    pub fn select<S: MapSurface>(
        &mut self,
        id: FeatureId,
        markers: &MarkerRegistry<S::Marker>,
        surface: &mut S,
    ) -> Result<()> {
        let entry = markers.get(&id).ok_or(FinderError::UnknownFeature(id))?;

        match self.state {
            SelectionState::Selected(current) if current == id => {}
            SelectionState::Selected(previous) => {
                let off = markers.get(&previous).map(|e| &e.marker);
                surface.highlight(off, Some(&entry.marker));
            }
            SelectionState::Unselected => surface.highlight(None, Some(&entry.marker)),
        }
        surface.show_detail(Some(&entry.feature));

        debug!(feature = %id, "Feature selected");
        self.state = SelectionState::Selected(id);
        Ok(())
    }

    /// Deselect and reset the detail panel
    pub fn clear<S: MapSurface>(&mut self, markers: &MarkerRegistry<S::Marker>, surface: &mut S) {
        if let SelectionState::Selected(previous) = self.state {
            if let Some(entry) = markers.get(&previous) {
                surface.highlight(Some(&entry.marker), None);
            }
            debug!(feature = %previous, "Selection cleared");
        }
        surface.show_detail(None);
        self.state = SelectionState::Unselected;
    }

    /// The feature set was swapped out; any selection is stale
    ///
    /// The old markers are already gone, so only the detail panel is reset.
    pub fn features_replaced<S: MapSurface>(&mut self, surface: &mut S) {
        surface.show_detail(None);
        self.state = SelectionState::Unselected;
    }
}
