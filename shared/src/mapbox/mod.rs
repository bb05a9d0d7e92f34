//! Client for the Mapbox Directions-Matrix API.
//!
//! One request carries a single origin (source index 0) and up to
//! [`matrix::DESTINATIONS_PER_CHUNK`] destinations. Larger destination sets
//! are split into chunks, one request per chunk, and the per-chunk rows are
//! concatenated back in request order so the output lines up with the input
//! destinations.

pub mod matrix;

use crate::MapboxConfig;
use crate::geo::{Coordinate, meters_to_miles, seconds_to_minutes};
use matrix::{
    DEFAULT_MATRIX_BASE_URL, DESTINATIONS_PER_CHUNK, MatrixResponse, RouteLeg, TravelProfile,
    coordinates_path,
};
use std::time::Duration;
use thiserror::Error;
use tracing::warn;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, Error)]
pub enum MatrixError {
    #[error("matrix request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("provider returned code {0:?}")]
    ProviderCode(String),
    #[error("matrix row is missing entries for {expected} destinations")]
    IncompleteMatrix { expected: usize },
}

/// Handle to the routing provider. Construct once at startup and share;
/// clones reuse the same connection pool.
#[derive(Debug, Clone)]
pub struct MatrixClient {
    http: reqwest::Client,
    base_url: String,
    access_token: String,
}

impl MatrixClient {
    pub fn new(config: &MapboxConfig) -> Result<Self, MatrixError> {
        let http = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()?;
        Ok(Self {
            http,
            base_url: config
                .base_url
                .clone()
                .unwrap_or_else(|| DEFAULT_MATRIX_BASE_URL.to_string()),
            access_token: config.access_token.clone(),
        })
    }

    /// One provider call for a chunk of destinations.
    async fn route_chunk(
        &self,
        origin: Coordinate,
        destinations: &[Coordinate],
        profile: TravelProfile,
    ) -> Result<Vec<RouteLeg>, MatrixError> {
        let url = format!(
            "{}/{}/{}?sources=0&annotations=distance,duration&access_token={}",
            self.base_url,
            profile.as_path_segment(),
            coordinates_path(origin, destinations),
            self.access_token,
        );

        let response = self
            .http
            .get(url)
            .send()
            .await?
            .error_for_status()?
            .json::<MatrixResponse>()
            .await?;

        legs_from_response(&response, destinations.len())
    }

    /// Resolves a route leg for every destination, in input order. The first
    /// failed chunk fails the whole call; no retries at this layer.
    pub async fn resolve_routes(
        &self,
        origin: Coordinate,
        destinations: &[Coordinate],
        profile: TravelProfile,
    ) -> Result<Vec<RouteLeg>, MatrixError> {
        let mut legs = Vec::with_capacity(destinations.len());
        for chunk in destinations.chunks(DESTINATIONS_PER_CHUNK) {
            legs.extend(self.route_chunk(origin, chunk, profile).await?);
        }
        Ok(legs)
    }

    /// Like [`resolve_routes`](Self::resolve_routes), but a failed chunk
    /// yields `None` for that chunk's destinations instead of failing the
    /// set. The caller chooses the fallback for unresolved destinations.
    pub async fn resolve_routes_lenient(
        &self,
        origin: Coordinate,
        destinations: &[Coordinate],
        profile: TravelProfile,
    ) -> Vec<Option<RouteLeg>> {
        let mut legs = Vec::with_capacity(destinations.len());
        for chunk in destinations.chunks(DESTINATIONS_PER_CHUNK) {
            match self.route_chunk(origin, chunk, profile).await {
                Ok(resolved) => legs.extend(resolved.into_iter().map(Some)),
                Err(e) => {
                    warn!(
                        error = ?e,
                        destinations = chunk.len(),
                        "matrix chunk failed, leaving its destinations unresolved"
                    );
                    legs.extend(std::iter::repeat_n(None, chunk.len()));
                }
            }
        }
        legs
    }
}

/// Maps a single-source response back to the request's destinations.
///
/// Entry 0 of each row is the origin self distance and is discarded; the
/// remainder is converted to miles and minutes. A missing row, a short row,
/// or a null entry is a provider failure for the whole chunk.
pub fn legs_from_response(
    response: &MatrixResponse,
    destination_count: usize,
) -> Result<Vec<RouteLeg>, MatrixError> {
    if response.code != "Ok" {
        return Err(MatrixError::ProviderCode(response.code.clone()));
    }

    let incomplete = || MatrixError::IncompleteMatrix {
        expected: destination_count,
    };
    let distances = response.distances.first().ok_or_else(incomplete)?;
    let durations = response.durations.first().ok_or_else(incomplete)?;
    if distances.len() != destination_count + 1 || durations.len() != destination_count + 1 {
        return Err(incomplete());
    }

    distances[1..]
        .iter()
        .zip(&durations[1..])
        .map(|(distance, duration)| match (distance, duration) {
            (Some(meters), Some(seconds)) => Ok(RouteLeg {
                distance_miles: meters_to_miles(*meters),
                duration_minutes: seconds_to_minutes(*seconds),
            }),
            _ => Err(incomplete()),
        })
        .collect()
}
