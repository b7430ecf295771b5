use std::collections::HashMap;
use std::sync::Arc;

use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use super::resolver::Geocoder;
use crate::models::{Coordinate, Position};

/// Result of geocoding a list of positions
#[derive(Debug, Default, Clone, PartialEq)]
pub struct BatchOutcome {
    /// Position id and its coordinate, in input order
    pub located: Vec<(String, Coordinate)>,
    /// Ids that could not be resolved
    pub missing: Vec<String>,
    pub remote_calls: usize,
    /// True when the run stopped early
    pub cancelled: bool,
}

impl BatchOutcome {
    pub fn coordinates(&self) -> HashMap<String, Coordinate> {
        self.located.iter().cloned().collect()
    }
}

/// Resolves positions one after another so the geocoder's request spacing
/// applies across the whole run.
pub struct BatchGeocoder {
    geocoder: Arc<Geocoder>,
}

impl BatchGeocoder {
    pub fn new(geocoder: Arc<Geocoder>) -> Self {
        Self { geocoder }
    }

    pub async fn run(&self, positions: &[Position], cancel: &CancellationToken) -> BatchOutcome {
        let mut outcome = BatchOutcome::default();
        info!("Geocoding {} positions", positions.len());

        for position in positions {
            if cancel.is_cancelled() {
                outcome.cancelled = true;
                break;
            }

            let lookup = tokio::select! {
                biased;
                _ = cancel.cancelled() => {
                    outcome.cancelled = true;
                    break;
                }
                lookup = self.geocoder.lookup(&position.location.city, position.address()) => lookup,
            };

            outcome.remote_calls += usize::from(lookup.remote_calls);
            match lookup.resolved {
                Some(resolved) => {
                    debug!("{} -> {:?} via {:?}", position.id, resolved.coordinate, resolved.source);
                    outcome.located.push((position.id.clone(), resolved.coordinate));
                }
                None => {
                    warn!(
                        "Skipping position {} ({}): no coordinates for {:?}",
                        position.id,
                        position.title,
                        position.location.city
                    );
                    outcome.missing.push(position.id.clone());
                }
            }
        }

        info!(
            "Geocoded {} positions, {} missing, {} remote calls{}",
            outcome.located.len(),
            outcome.missing.len(),
            outcome.remote_calls,
            if outcome.cancelled { " (cancelled)" } else { "" }
        );
        outcome
    }
}
