use std::process;

use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use transit_map::api::{ApiConfig, HttpTransitApi};
use transit_map::controller::{Controller, UiEvent};
use transit_map::directions::{
    CacheConfig, CachedDirections, Directions, DirectionsConfig, NoDirections, OsrmDirections,
};
use transit_map::domain::StationId;
use transit_map::map::{LayerKind, RecordingMap};
use transit_map::session::{PanelState, SessionConfig, Slot};

/// Log filter used when `RUST_LOG` is unset.
const DEFAULT_FILTER: &str = "transit_map=info";

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let api_config = match std::env::var("TRANSIT_API_URL") {
        Ok(url) => ApiConfig::new(url),
        Err(_) => ApiConfig::default(),
    };
    info!(base_url = %api_config.base_url, "analysis backend");
    let api = match HttpTransitApi::new(api_config) {
        Ok(api) => api,
        Err(e) => {
            error!(error = %e, "failed to create backend client");
            process::exit(1);
        }
    };

    match std::env::var("DIRECTIONS_URL") {
        Ok(url) => {
            let directions = match OsrmDirections::new(DirectionsConfig::new(url)) {
                Ok(d) => d,
                Err(e) => {
                    error!(error = %e, "failed to create directions client");
                    process::exit(1);
                }
            };
            let cached = CachedDirections::new(directions, &CacheConfig::default());
            run(api, cached).await;
        }
        Err(_) => {
            warn!("DIRECTIONS_URL not set, routes will be drawn as straight lines");
            run(api, NoDirections).await;
        }
    }
}

/// Bootstrap one session and, if `TRANSIT_ORIGIN` and `TRANSIT_DESTINATION`
/// are set, compute and draw the path between them.
async fn run<D: Directions + 'static>(api: HttpTransitApi, directions: D) {
    let mut controller =
        Controller::new(api, directions, RecordingMap::new(), SessionConfig::default());
    controller.bootstrap().await;

    let session = controller.session();
    if let Some(notice) = &session.notice {
        error!(message = %notice.message, "bootstrap failed");
        process::exit(1);
    }
    if let Some(stats) = session.panels.stats.ready() {
        info!(
            stations = stats.total_stations,
            routes = stats.total_routes,
            lines = stats.total_lines,
            capacity = %stats.capacity_label,
            "network statistics"
        );
    }
    info!(
        stations = session.directory.len(),
        markers = session.layers.map().markers().count(),
        "directory ready"
    );

    let (Some(origin), Some(destination)) = (
        station_from_env("TRANSIT_ORIGIN"),
        station_from_env("TRANSIT_DESTINATION"),
    ) else {
        return;
    };
    controller.handle(UiEvent::SelectionChanged {
        slot: Slot::Origin,
        id: origin,
    });
    controller.handle(UiEvent::SelectionChanged {
        slot: Slot::Destination,
        id: destination,
    });
    controller.handle(UiEvent::ComputePath);
    controller.settle().await;

    let session = controller.session();
    match &session.panels.path {
        PanelState::Ready(view) => {
            info!(
                time = %view.total_time_label(),
                stations = view.station_count,
                transfers = view.transfer_count,
                segments = session.layers.map().polylines(LayerKind::Route).len(),
                "path drawn"
            );
            for stop in &view.stops {
                info!(position = stop.position, name = %stop.name, category = %stop.category, "stop");
            }
        }
        PanelState::Empty(message) | PanelState::Failed(message) => {
            warn!(%message, "no path");
        }
        PanelState::Idle | PanelState::Loading => {
            warn!("path not computed, check that both stations are known");
        }
    }
}

fn station_from_env(var: &str) -> Option<StationId> {
    let raw = std::env::var(var).ok()?;
    match StationId::parse(&raw) {
        Ok(id) => Some(id),
        Err(e) => {
            warn!(var, error = %e, "ignoring station id");
            None
        }
    }
}
