//! Transit network map client core.
//!
//! Keeps an interactive station map in sync with a remote analysis
//! backend: station search and selection, route drawing with road-following
//! enrichment, and the display of path, capacity, network and congestion
//! analyses.

pub mod api;
pub mod controller;
pub mod directions;
pub mod domain;
pub mod map;
pub mod present;
pub mod route;
pub mod session;
