//! Per-action-class generation counters.
//!
//! In-flight requests cannot be cancelled. Instead every request is tagged
//! with the generation current when it was issued, and its response is
//! applied only if no newer request of the same class has been issued since.

/// Kinds of user action whose responses compete for the same panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ActionClass {
    Search,
    Path,
    MaxFlow,
    Congestion,
    Network,
    Coloring,
}

impl ActionClass {
    const COUNT: usize = 6;

    fn index(self) -> usize {
        match self {
            ActionClass::Search => 0,
            ActionClass::Path => 1,
            ActionClass::MaxFlow => 2,
            ActionClass::Congestion => 3,
            ActionClass::Network => 4,
            ActionClass::Coloring => 5,
        }
    }
}

/// Tag carried by a request and its response.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Generation(u64);

/// Latest issued generation per action class.
#[derive(Debug, Clone, Default)]
pub struct Generations {
    latest: [u64; ActionClass::COUNT],
}

impl Generations {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a new request of `class`, superseding every earlier one.
    pub fn issue(&mut self, class: ActionClass) -> Generation {
        let slot = &mut self.latest[class.index()];
        *slot += 1;
        Generation(*slot)
    }

    /// Whether a response tagged `generation` may still be applied.
    pub fn is_current(&self, class: ActionClass, generation: Generation) -> bool {
        self.latest[class.index()] == generation.0
    }

    /// Supersede any in-flight request of `class` without issuing a new one.
    pub fn invalidate(&mut self, class: ActionClass) {
        self.latest[class.index()] += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn newer_issue_supersedes() {
        let mut gens = Generations::new();
        let first = gens.issue(ActionClass::Path);
        let second = gens.issue(ActionClass::Path);

        assert!(!gens.is_current(ActionClass::Path, first));
        assert!(gens.is_current(ActionClass::Path, second));
    }

    #[test]
    fn classes_are_independent() {
        let mut gens = Generations::new();
        let path = gens.issue(ActionClass::Path);
        gens.issue(ActionClass::Search);
        gens.issue(ActionClass::Congestion);

        assert!(gens.is_current(ActionClass::Path, path));
    }

    #[test]
    fn invalidate_discards_in_flight() {
        let mut gens = Generations::new();
        let search = gens.issue(ActionClass::Search);
        gens.invalidate(ActionClass::Search);
        assert!(!gens.is_current(ActionClass::Search, search));

        let next = gens.issue(ActionClass::Search);
        assert!(gens.is_current(ActionClass::Search, next));
    }
}
