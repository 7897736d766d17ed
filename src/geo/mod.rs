//! Location capture for the general-case step.
//!
//! The platform position device and the geocoding services are external
//! collaborators; this module owns the refine loop, the response parsing,
//! and the stale-response guard.

pub mod geocode;
pub mod watch;

pub use geocode::{GeocodeClient, Place, Suggestion};
pub use watch::{refine_position, PositionFix, RefineOptions, WatchHandle};

use std::sync::atomic::{AtomicU64, Ordering};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum GeoError {
    #[error("no position fix obtained before timeout")]
    NoFix,

    #[error("geocoding request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("geocoding response carried no address details")]
    NoAddress,
}

/// Token for one in-flight geocode or search request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RequestToken(u64);

/// Monotonically increasing request tokens.
///
/// Issue a token when a request starts; when its response arrives, apply
/// it only if the token is still current. A response for anything but the
/// latest issued request is stale and must be discarded.
#[derive(Debug, Default)]
pub struct RequestSequencer {
    latest: AtomicU64,
}

impl RequestSequencer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn issue(&self) -> RequestToken {
        RequestToken(self.latest.fetch_add(1, Ordering::Relaxed) + 1)
    }

    pub fn is_current(&self, token: RequestToken) -> bool {
        self.latest.load(Ordering::Relaxed) == token.0
    }
}
