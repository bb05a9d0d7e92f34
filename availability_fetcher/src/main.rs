mod error;
mod feed;

use crate::error::{CollectError, FetchError, MainError};
use crate::feed::LotStatus;
use axum::Router;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::get;
use chrono::{DateTime, TimeDelta, Utc};
use parking_lot::RwLock;
use shared::error::InitializationError;
use shared::geo::round2;
use shared::{AvailabilityConfig, initialize_db, load_config, shutdown_listener};
use sqlx::{Pool, Postgres};
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tokio::time::sleep;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};
use tracing_subscriber::EnvFilter;
use uuid::Uuid;

#[tokio::main]
async fn main() -> Result<(), MainError> {
    let subscriber = tracing_subscriber::fmt()
        .compact()
        .with_file(true)
        .with_line_number(true)
        .with_env_filter(EnvFilter::from_default_env())
        .finish();

    tracing::subscriber::set_global_default(subscriber).map_err(InitializationError::Tracing)?;

    // Set up config
    let config = load_config().unwrap_or_else(|e| {
        error!(error = ?e, "configuration could not be initialized");
        panic!("configuration could not be initialized");
    });
    let availability = config
        .availability
        .clone()
        .ok_or(InitializationError::MissingConfigSection("availability"))?;

    let db_pool = initialize_db(&config.postgres, true).await?;

    let last_attempted_update = Arc::new(RwLock::new(None));
    let last_successful_update = Arc::new(RwLock::new(None));
    let last_error = Arc::new(RwLock::new(None));

    // Cancellation token shared across tasks; listener cancels on SIGINT/SIGTERM.
    let shutdown_token = CancellationToken::new();
    let signal_handle = tokio::spawn(shutdown_listener(Some(shutdown_token.clone())));

    let axum_handle = tokio::spawn(run_health_server(
        Arc::clone(&last_attempted_update),
        Arc::clone(&last_successful_update),
        Arc::clone(&last_error),
        TimeDelta::seconds(2 * availability.interval_seconds as i64),
        shutdown_token.clone(),
    ));

    let collector_handle = tokio::spawn(collector_loop(
        db_pool,
        availability,
        last_attempted_update,
        last_successful_update,
        last_error,
        shutdown_token.clone(),
    ));

    tokio::select! {
        res = axum_handle => {
            shutdown_token.cancel();
            res??;
        }
        res = collector_handle => {
            shutdown_token.cancel();
            res??;
        }
        res = signal_handle => {
            shutdown_token.cancel();
            res?;
        }
    }

    Ok(())
}

async fn collector_loop(
    db_pool: Pool<Postgres>,
    config: AvailabilityConfig,
    last_attempted_update: Arc<RwLock<Option<DateTime<Utc>>>>,
    last_successful_update: Arc<RwLock<Option<DateTime<Utc>>>>,
    last_error: Arc<RwLock<Option<CollectError>>>,
    shutdown: CancellationToken,
) -> Result<(), CollectError> {
    let http_client = reqwest::Client::builder()
        .timeout(Duration::from_secs(60))
        .build()
        .map_err(FetchError::from)?;

    info!("initialized availability fetcher");
    let mut initial_loop = true;
    loop {
        if initial_loop {
            initial_loop = false;
        } else {
            tokio::select! {
                _ = sleep(Duration::from_secs(config.interval_seconds)) => {},
                _ = shutdown.cancelled() => {
                    info!("shutdown requested, exiting collector loop");
                    break;
                }
            }
        }

        let now = Utc::now();
        *last_attempted_update.write() = Some(now);
        let statuses = match fetch_feed(&http_client, &config.feed_url).await {
            Ok(statuses) => statuses,
            Err(e) => {
                warn!(error = ?e, "failed to fetch and deserialize availability feed");
                *last_error.write() = Some(e.into());
                continue;
            }
        };

        match store_feed(&db_pool, &statuses, now).await {
            Ok((lots_changed, snapshots_created)) => {
                *last_successful_update.write() = Some(now);
                info!(lots_changed, snapshots_created, "collection complete");
                debug!(entries = statuses.len(), "processed availability feed");
            }
            Err(e) => {
                warn!(error = ?e, "could not store availability data");
                *last_error.write() = Some(e);
                continue;
            }
        }

        // If shutdown was requested during processing, break after finishing the iteration.
        if shutdown.is_cancelled() {
            info!("shutdown requested, collector loop exiting after current iteration");
            break;
        }
    }

    Ok(())
}

#[derive(Clone)]
struct AxumState {
    last_attempted_update: Arc<RwLock<Option<DateTime<Utc>>>>,
    last_successful_update: Arc<RwLock<Option<DateTime<Utc>>>>,
    last_error: Arc<RwLock<Option<CollectError>>>,
    stale_after: TimeDelta,
}

async fn run_health_server(
    last_attempted_update: Arc<RwLock<Option<DateTime<Utc>>>>,
    last_successful_update: Arc<RwLock<Option<DateTime<Utc>>>>,
    last_error: Arc<RwLock<Option<CollectError>>>,
    stale_after: TimeDelta,
    shutdown: CancellationToken,
) -> Result<(), std::io::Error> {
    info!("starting axum health server");
    let app = Router::new()
        .route("/health", get(health_check))
        .with_state(AxumState {
            last_successful_update,
            last_attempted_update,
            last_error,
            stale_after,
        });
    let listener = TcpListener::bind("127.0.0.1:3000").await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            shutdown.cancelled().await;
        })
        .await?;
    Ok(())
}

async fn health_check(State(state): State<AxumState>) -> impl IntoResponse {
    let last_attempted_update = *state.last_attempted_update.read();
    let last_successful_update = *state.last_successful_update.read();
    let last_error = if let Some(e) = state.last_error.read().as_ref() {
        format!("{e:?}")
    } else {
        "unknown".to_string()
    };

    let Some(last_successful_update) = last_successful_update else {
        if let Some(last_attempted_update) = last_attempted_update {
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                format!(
                    "Feed has not been successfully collected. Last attempted collection: {last_attempted_update}. Last error: {last_error}"
                ),
            );
        }
        return (
            StatusCode::INTERNAL_SERVER_ERROR,
            "No attempted or successful collections".to_string(),
        );
    };

    if (Utc::now() - last_successful_update) > state.stale_after {
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            format!(
                "Feed not collected within the last two intervals. Last successful collection: {last_successful_update}. Last error: {last_error}"
            ),
        )
    } else {
        (
            StatusCode::OK,
            format!("Feed last successfully collected: {last_successful_update}"),
        )
    }
}

async fn fetch_feed(client: &reqwest::Client, url: &str) -> Result<Vec<LotStatus>, FetchError> {
    Ok(client
        .get(url)
        .send()
        .await?
        .error_for_status()?
        .json::<Vec<LotStatus>>()
        .await?)
}

#[derive(sqlx::FromRow)]
struct LotRow {
    id: Uuid,
    address: Option<String>,
    total_spaces: Option<i32>,
}

/// Upserts lots by feed name and records one snapshot per entry that carries
/// a free-space count. Returns (lots created or changed, snapshots created).
async fn store_feed(
    pool: &Pool<Postgres>,
    statuses: &[LotStatus],
    collected_at: DateTime<Utc>,
) -> Result<(u64, u64), CollectError> {
    let mut tx = pool.begin().await?;
    let mut lots_changed = 0u64;
    let mut snapshots_created = 0u64;

    for status in statuses {
        let Some(name) = status.location_name.as_deref() else {
            continue;
        };

        let existing = sqlx::query_as::<_, LotRow>(
            "SELECT id, address, total_spaces FROM parking_lots WHERE name = $1",
        )
        .bind(name)
        .fetch_optional(tx.as_mut())
        .await?;

        let lot_id = match existing {
            Some(lot) => {
                if lot.address != status.location_address || lot.total_spaces != status.total_spaces
                {
                    sqlx::query(
                        r"
                        UPDATE parking_lots
                        SET address = $2, total_spaces = $3, updated_at = now()
                        WHERE id = $1
                        ",
                    )
                    .bind(lot.id)
                    .bind(&status.location_address)
                    .bind(status.total_spaces)
                    .execute(tx.as_mut())
                    .await?;
                    lots_changed += 1;
                }
                lot.id
            }
            None => {
                let id = Uuid::now_v7();
                sqlx::query(
                    "INSERT INTO parking_lots (id, name, address, total_spaces) VALUES ($1, $2, $3, $4)",
                )
                .bind(id)
                .bind(name)
                .bind(&status.location_address)
                .bind(status.total_spaces)
                .execute(tx.as_mut())
                .await?;
                lots_changed += 1;
                id
            }
        };

        if let Some(free_spaces) = status.free_spaces {
            let occupancy_pct = status
                .total_spaces
                .filter(|total| *total > 0)
                .map(|total| round2(f64::from(total - free_spaces) / f64::from(total) * 100.0));

            sqlx::query(
                r"
                INSERT INTO parking_snapshots (id, lot_id, free_spaces, occupancy_pct, collected_at)
                VALUES ($1, $2, $3, $4, $5)
                ",
            )
            .bind(Uuid::now_v7())
            .bind(lot_id)
            .bind(free_spaces)
            .bind(occupancy_pct)
            .bind(collected_at)
            .execute(tx.as_mut())
            .await?;
            snapshots_created += 1;
        }
    }

    tx.commit().await?;
    Ok((lots_changed, snapshots_created))
}
