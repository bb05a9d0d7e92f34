mod error;
mod model;

use crate::error::UpdaterError;
use crate::model::{BuildingSite, LotPoint};
use shared::error::InitializationError;
use shared::geo::Coordinate;
use shared::mapbox::MatrixClient;
use shared::mapbox::matrix::{RouteLeg, TravelProfile};
use shared::{initialize_db, load_config};
use sqlx::{Pool, Postgres};
use std::time::Duration;
use tokio::time::sleep;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;
use uuid::Uuid;

/// Pause between buildings to stay inside the provider's rate limits.
const INTER_BUILDING_DELAY: Duration = Duration::from_secs(1);

#[tokio::main]
async fn main() -> Result<(), UpdaterError> {
    let subscriber = tracing_subscriber::fmt()
        .compact()
        .with_file(true)
        .with_line_number(true)
        .with_env_filter(EnvFilter::from_default_env())
        .finish();

    tracing::subscriber::set_global_default(subscriber).map_err(InitializationError::Tracing)?;

    let config = load_config().map_err(InitializationError::from)?;
    let mapbox = config
        .mapbox
        .clone()
        .ok_or(InitializationError::MissingConfigSection("mapbox"))?;
    let matrix = MatrixClient::new(&mapbox)?;
    let pool = initialize_db(&config.postgres, true).await?;

    let buildings = sqlx::query_as::<_, BuildingSite>(
        "SELECT id, nickname, latitude, longitude FROM buildings ORDER BY nickname",
    )
    .fetch_all(&pool)
    .await?;

    let lots = sqlx::query_as::<_, LotPoint>(
        r"
        SELECT id, latitude, longitude
        FROM parking_lots
        WHERE latitude IS NOT NULL AND longitude IS NOT NULL
        ORDER BY name
        ",
    )
    .fetch_all(&pool)
    .await?;

    if lots.is_empty() {
        info!("no parking lots with coordinates, nothing to refresh");
        return Ok(());
    }

    info!(
        buildings = buildings.len(),
        lots = lots.len(),
        pairs = buildings.len() * lots.len(),
        "refreshing precomputed distances"
    );

    let destinations: Vec<Coordinate> = lots
        .iter()
        .map(|lot| Coordinate::new(lot.latitude, lot.longitude))
        .collect();

    let mut failed: Vec<String> = Vec::new();
    for building in &buildings {
        let origin = Coordinate::new(building.latitude, building.longitude);

        // Walking profile: these rows serve building-to-lot estimates for
        // people leaving a class.
        let legs = match matrix
            .resolve_routes(origin, &destinations, TravelProfile::Walking)
            .await
        {
            Ok(legs) => legs,
            Err(e) => {
                warn!(
                    error = ?e,
                    building = building.nickname,
                    "matrix lookup failed, skipping building"
                );
                failed.push(building.nickname.clone());
                continue;
            }
        };

        store_building_distances(&pool, building.id, &lots, &legs).await?;
        info!(
            building = building.nickname,
            distances = legs.len(),
            "saved distances"
        );

        sleep(INTER_BUILDING_DELAY).await;
    }

    if failed.is_empty() {
        info!("distance refresh complete");
    } else {
        warn!(buildings = ?failed, "distance refresh complete with failed buildings");
    }

    Ok(())
}

async fn store_building_distances(
    pool: &Pool<Postgres>,
    building_id: Uuid,
    lots: &[LotPoint],
    legs: &[RouteLeg],
) -> Result<(), UpdaterError> {
    let mut tx = pool.begin().await?;
    for (lot, leg) in lots.iter().zip(legs) {
        sqlx::query(
            r"
            INSERT INTO lot_building_distances (id, lot_id, building_id, distance_miles, duration_minutes)
            VALUES ($1, $2, $3, $4, $5)
            ON CONFLICT (lot_id, building_id) DO UPDATE
            SET distance_miles = EXCLUDED.distance_miles,
                duration_minutes = EXCLUDED.duration_minutes,
                updated_at = now()
            ",
        )
        .bind(Uuid::now_v7())
        .bind(lot.id)
        .bind(building_id)
        .bind(round3(leg.distance_miles))
        .bind(leg.duration_minutes)
        .execute(tx.as_mut())
        .await?;
    }
    tx.commit().await?;
    Ok(())
}

/// Storage precision for the distance column.
fn round3(value: f64) -> f64 {
    (value * 1000.0).round() / 1000.0
}
