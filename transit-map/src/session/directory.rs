//! Authoritative in-memory station set.

use std::collections::HashMap;

use tracing::{debug, trace};

use crate::domain::{Station, StationId};

/// Errors from directory lookups.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DirectoryError {
    #[error("station not found: {0}")]
    NotFound(StationId),
}

/// Every station known to the session.
///
/// Iteration follows load order, with adopted stations appended.
#[derive(Debug, Clone, Default)]
pub struct StationDirectory {
    stations: Vec<Station>,
    index: HashMap<StationId, usize>,
}

impl StationDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the whole station set.
    ///
    /// Later entries win when the input repeats an id.
    pub fn load(&mut self, stations: Vec<Station>) {
        self.stations.clear();
        self.index.clear();
        for station in stations {
            self.upsert(station);
        }
        debug!(count = self.stations.len(), "directory loaded");
    }

    /// Insert a station referenced by a search hit or result payload.
    ///
    /// Returns `true` if the id was not known before. Known stations are
    /// left untouched.
    pub fn adopt(&mut self, station: Station) -> bool {
        if self.index.contains_key(&station.id) {
            return false;
        }
        trace!(id = %station.id, "adopted station");
        self.upsert(station);
        true
    }

    fn upsert(&mut self, station: Station) {
        match self.index.get(&station.id) {
            Some(&i) => self.stations[i] = station,
            None => {
                self.index.insert(station.id.clone(), self.stations.len());
                self.stations.push(station);
            }
        }
    }

    pub fn get(&self, id: &StationId) -> Result<&Station, DirectoryError> {
        self.index
            .get(id)
            .map(|&i| &self.stations[i])
            .ok_or_else(|| DirectoryError::NotFound(id.clone()))
    }

    pub fn contains(&self, id: &StationId) -> bool {
        self.index.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.stations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stations.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Station> {
        self.stations.iter()
    }
}
