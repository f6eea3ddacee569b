//! Origin and destination selection.

use tracing::warn;

use crate::domain::StationId;

use super::directory::StationDirectory;

/// Which selector an action targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Slot {
    Origin,
    Destination,
}

/// One entry of a selector's choice list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Choice {
    pub id: StationId,
    pub label: String,
}

/// A selection list with its current value.
#[derive(Debug, Clone, Default)]
pub struct Selector {
    choices: Vec<Choice>,
    selected: Option<StationId>,
}

impl Selector {
    pub fn choices(&self) -> &[Choice] {
        &self.choices
    }

    pub fn selected(&self) -> Option<&StationId> {
        self.selected.as_ref()
    }

    fn has(&self, id: &StationId) -> bool {
        self.choices.iter().any(|c| &c.id == id)
    }
}

/// The origin/destination selectors and the derived action gate.
#[derive(Debug, Clone, Default)]
pub struct SelectorBinding {
    origin: Selector,
    destination: Selector,
    can_compute: bool,
}

impl SelectorBinding {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn selector(&self, slot: Slot) -> &Selector {
        match slot {
            Slot::Origin => &self.origin,
            Slot::Destination => &self.destination,
        }
    }

    fn selector_mut(&mut self, slot: Slot) -> &mut Selector {
        match slot {
            Slot::Origin => &mut self.origin,
            Slot::Destination => &mut self.destination,
        }
    }

    /// Rebuild both choice lists from the directory.
    ///
    /// Current selections survive even if the directory no longer has them;
    /// the gate is recomputed from the selections alone.
    pub fn populate(&mut self, directory: &StationDirectory) {
        let choices: Vec<Choice> = directory
            .iter()
            .map(|s| Choice {
                id: s.id.clone(),
                label: s.label(),
            })
            .collect();
        self.origin.choices = choices.clone();
        self.destination.choices = choices;
        self.recompute();
    }

    /// Add `id` to the slot's list if absent, then select it.
    pub fn set(&mut self, slot: Slot, id: StationId, label: impl Into<String>) {
        let selector = self.selector_mut(slot);
        if !selector.has(&id) {
            selector.choices.push(Choice {
                id: id.clone(),
                label: label.into(),
            });
        }
        selector.selected = Some(id);
        self.recompute();
    }

    pub fn set_origin(&mut self, id: StationId, label: impl Into<String>) {
        self.set(Slot::Origin, id, label);
    }

    pub fn set_destination(&mut self, id: StationId, label: impl Into<String>) {
        self.set(Slot::Destination, id, label);
    }

    /// Plain selection change to an id already in the list.
    pub fn select(&mut self, slot: Slot, id: StationId) {
        let selector = self.selector_mut(slot);
        if !selector.has(&id) {
            warn!(?slot, %id, "selection of unlisted station ignored");
            return;
        }
        selector.selected = Some(id);
        self.recompute();
    }

    pub fn clear(&mut self, slot: Slot) {
        self.selector_mut(slot).selected = None;
        self.recompute();
    }

    fn recompute(&mut self) {
        self.can_compute = match (&self.origin.selected, &self.destination.selected) {
            (Some(o), Some(d)) => o != d,
            _ => false,
        };
    }

    /// Whether path, max-flow and congestion actions are enabled.
    pub fn can_compute(&self) -> bool {
        self.can_compute
    }

    /// Both selections, if the actions are enabled.
    pub fn selection(&self) -> Option<(StationId, StationId)> {
        if !self.can_compute {
            return None;
        }
        Some((
            self.origin.selected.clone()?,
            self.destination.selected.clone()?,
        ))
    }
}
