use crate::v1::db::models::{
    Building, Classroom, LotAccessRule, LotBuildingDistance, LotWithAvailability, ParkingLot,
    ParkingSnapshot, PermitType, ScheduleEvent, UserSchedule,
};
use shared::schedule::NormalizedScheduleEvent;
use sqlx::{Executor, Pool, Postgres};
use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum QueryError {
    #[error("database error: {0}")]
    Db(#[from] sqlx::Error),
}

pub async fn list_lots_with_availability(
    pool: &Pool<Postgres>,
) -> Result<Vec<LotWithAvailability>, QueryError> {
    sqlx::query_as::<_, LotWithAvailability>(
        r"
        SELECT l.id, l.name, l.address, l.total_spaces, l.latitude, l.longitude,
               l.created_at, l.updated_at,
               s.free_spaces, s.occupancy_pct, s.collected_at AS availability_updated_at
        FROM parking_lots l
        LEFT JOIN LATERAL (
            SELECT free_spaces, occupancy_pct, collected_at
            FROM parking_snapshots
            WHERE lot_id = l.id
            ORDER BY collected_at DESC
            LIMIT 1
        ) s ON TRUE
        ORDER BY l.name
        ",
    )
    .fetch_all(pool)
    .await
    .map_err(QueryError::from)
}

pub async fn get_lot_with_availability(
    pool: &Pool<Postgres>,
    lot_id: Uuid,
) -> Result<Option<LotWithAvailability>, QueryError> {
    sqlx::query_as::<_, LotWithAvailability>(
        r"
        SELECT l.id, l.name, l.address, l.total_spaces, l.latitude, l.longitude,
               l.created_at, l.updated_at,
               s.free_spaces, s.occupancy_pct, s.collected_at AS availability_updated_at
        FROM parking_lots l
        LEFT JOIN LATERAL (
            SELECT free_spaces, occupancy_pct, collected_at
            FROM parking_snapshots
            WHERE lot_id = l.id
            ORDER BY collected_at DESC
            LIMIT 1
        ) s ON TRUE
        WHERE l.id = $1
        ",
    )
    .bind(lot_id)
    .fetch_optional(pool)
    .await
    .map_err(QueryError::from)
}

pub async fn lot_exists(pool: &Pool<Postgres>, lot_id: Uuid) -> Result<bool, QueryError> {
    sqlx::query_scalar::<_, bool>("SELECT EXISTS (SELECT 1 FROM parking_lots WHERE id = $1)")
        .bind(lot_id)
        .fetch_one(pool)
        .await
        .map_err(QueryError::from)
}

pub async fn count_lot_snapshots(pool: &Pool<Postgres>, lot_id: Uuid) -> Result<i64, QueryError> {
    sqlx::query_scalar::<_, i64>("SELECT count(*) FROM parking_snapshots WHERE lot_id = $1")
        .bind(lot_id)
        .fetch_one(pool)
        .await
        .map_err(QueryError::from)
}

pub async fn get_lot_snapshots(
    pool: &Pool<Postgres>,
    lot_id: Uuid,
    limit: i64,
    offset: i64,
) -> Result<Vec<ParkingSnapshot>, QueryError> {
    sqlx::query_as::<_, ParkingSnapshot>(
        r"
        SELECT id, lot_id, free_spaces, occupancy_pct, collected_at
        FROM parking_snapshots
        WHERE lot_id = $1
        ORDER BY collected_at DESC
        LIMIT $2 OFFSET $3
        ",
    )
    .bind(lot_id)
    .bind(limit)
    .bind(offset)
    .fetch_all(pool)
    .await
    .map_err(QueryError::from)
}

pub async fn list_lots(pool: &Pool<Postgres>) -> Result<Vec<ParkingLot>, QueryError> {
    sqlx::query_as::<_, ParkingLot>(
        r"
        SELECT id, name, address, total_spaces, latitude, longitude, created_at, updated_at
        FROM parking_lots
        ORDER BY name
        ",
    )
    .fetch_all(pool)
    .await
    .map_err(QueryError::from)
}

pub async fn get_lots_by_ids(
    pool: &Pool<Postgres>,
    ids: &[Uuid],
) -> Result<Vec<ParkingLot>, QueryError> {
    sqlx::query_as::<_, ParkingLot>(
        r"
        SELECT id, name, address, total_spaces, latitude, longitude, created_at, updated_at
        FROM parking_lots
        WHERE id = ANY($1)
        ORDER BY name
        ",
    )
    .bind(ids)
    .fetch_all(pool)
    .await
    .map_err(QueryError::from)
}

pub async fn list_permits(pool: &Pool<Postgres>) -> Result<Vec<PermitType>, QueryError> {
    sqlx::query_as::<_, PermitType>("SELECT id, name, description FROM permit_types ORDER BY name")
        .fetch_all(pool)
        .await
        .map_err(QueryError::from)
}

pub async fn get_permit(
    pool: &Pool<Postgres>,
    permit_id: Uuid,
) -> Result<Option<PermitType>, QueryError> {
    sqlx::query_as::<_, PermitType>("SELECT id, name, description FROM permit_types WHERE id = $1")
        .bind(permit_id)
        .fetch_optional(pool)
        .await
        .map_err(QueryError::from)
}

pub async fn get_access_rules(
    pool: &Pool<Postgres>,
    permit_id: Uuid,
) -> Result<Vec<LotAccessRule>, QueryError> {
    sqlx::query_as::<_, LotAccessRule>(
        r"
        SELECT lot_id, permit_id, days_of_week, access_start, access_end
        FROM lot_permit_access
        WHERE permit_id = $1
        ",
    )
    .bind(permit_id)
    .fetch_all(pool)
    .await
    .map_err(QueryError::from)
}

pub async fn get_classroom(
    pool: &Pool<Postgres>,
    classroom_id: Uuid,
) -> Result<Option<Classroom>, QueryError> {
    sqlx::query_as::<_, Classroom>(
        "SELECT id, location_string, building_id FROM classrooms WHERE id = $1",
    )
    .bind(classroom_id)
    .fetch_optional(pool)
    .await
    .map_err(QueryError::from)
}

pub async fn get_building(
    pool: &Pool<Postgres>,
    building_id: Uuid,
) -> Result<Option<Building>, QueryError> {
    sqlx::query_as::<_, Building>(
        "SELECT id, name, nickname, latitude, longitude FROM buildings WHERE id = $1",
    )
    .bind(building_id)
    .fetch_optional(pool)
    .await
    .map_err(QueryError::from)
}

pub async fn get_cached_distances(
    pool: &Pool<Postgres>,
    building_id: Uuid,
    lot_ids: &[Uuid],
) -> Result<Vec<LotBuildingDistance>, QueryError> {
    sqlx::query_as::<_, LotBuildingDistance>(
        r"
        SELECT lot_id, building_id, distance_miles, duration_minutes
        FROM lot_building_distances
        WHERE building_id = $1 AND lot_id = ANY($2)
        ",
    )
    .bind(building_id)
    .bind(lot_ids)
    .fetch_all(pool)
    .await
    .map_err(QueryError::from)
}

pub async fn get_schedule_by_user(
    pool: &Pool<Postgres>,
    user_id: Uuid,
) -> Result<Option<UserSchedule>, QueryError> {
    sqlx::query_as::<_, UserSchedule>(
        "SELECT id, user_id, name, created_at, updated_at FROM user_schedules WHERE user_id = $1",
    )
    .bind(user_id)
    .fetch_optional(pool)
    .await
    .map_err(QueryError::from)
}

pub async fn get_schedule_events(
    pool: &Pool<Postgres>,
    schedule_id: Uuid,
) -> Result<Vec<ScheduleEvent>, QueryError> {
    sqlx::query_as::<_, ScheduleEvent>(
        r"
        SELECT id, schedule_id, event_name, classroom_id, start_time, end_time,
               days_of_week, valid_from, valid_until
        FROM schedule_events
        WHERE schedule_id = $1
        ORDER BY start_time
        ",
    )
    .bind(schedule_id)
    .fetch_all(pool)
    .await
    .map_err(QueryError::from)
}

pub async fn delete_schedule_by_user<'e, E>(executor: E, user_id: Uuid) -> Result<u64, QueryError>
where
    E: Executor<'e, Database = Postgres>,
{
    sqlx::query("DELETE FROM user_schedules WHERE user_id = $1")
        .bind(user_id)
        .execute(executor)
        .await
        .map(|result| result.rows_affected())
        .map_err(QueryError::from)
}

pub async fn insert_schedule<'e, E>(
    executor: E,
    user_id: Uuid,
    name: Option<&str>,
) -> Result<Uuid, QueryError>
where
    E: Executor<'e, Database = Postgres>,
{
    let id = Uuid::now_v7();
    sqlx::query("INSERT INTO user_schedules (id, user_id, name) VALUES ($1, $2, $3)")
        .bind(id)
        .bind(user_id)
        .bind(name)
        .execute(executor)
        .await?;
    Ok(id)
}

pub async fn insert_schedule_event<'e, E>(
    executor: E,
    schedule_id: Uuid,
    event: &NormalizedScheduleEvent,
    classroom_id: Option<Uuid>,
) -> Result<(), QueryError>
where
    E: Executor<'e, Database = Postgres>,
{
    let days: Option<Vec<i32>> = event
        .days
        .map(|set| set.days().into_iter().map(i32::from).collect());

    sqlx::query(
        r"
        INSERT INTO schedule_events
            (id, schedule_id, event_name, classroom_id, start_time, end_time,
             days_of_week, valid_from, valid_until)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
        ",
    )
    .bind(Uuid::now_v7())
    .bind(schedule_id)
    .bind(&event.name)
    .bind(classroom_id)
    .bind(event.start_time)
    .bind(event.end_time)
    .bind(days)
    .bind(event.valid_from)
    .bind(event.valid_until)
    .execute(executor)
    .await
    .map(|_| ())
    .map_err(QueryError::from)
}

pub async fn get_classroom_by_location<'e, E>(
    executor: E,
    location: &str,
) -> Result<Option<Classroom>, QueryError>
where
    E: Executor<'e, Database = Postgres>,
{
    sqlx::query_as::<_, Classroom>(
        "SELECT id, location_string, building_id FROM classrooms WHERE location_string = $1",
    )
    .bind(location)
    .fetch_optional(executor)
    .await
    .map_err(QueryError::from)
}

pub async fn find_building_id_by_name<'e, E>(
    executor: E,
    name: &str,
) -> Result<Option<Uuid>, QueryError>
where
    E: Executor<'e, Database = Postgres>,
{
    sqlx::query_scalar::<_, Uuid>("SELECT id FROM buildings WHERE name = $1")
        .bind(name)
        .fetch_optional(executor)
        .await
        .map_err(QueryError::from)
}

pub async fn insert_classroom<'e, E>(
    executor: E,
    location: &str,
    building_id: Option<Uuid>,
) -> Result<Uuid, QueryError>
where
    E: Executor<'e, Database = Postgres>,
{
    let id = Uuid::now_v7();
    sqlx::query("INSERT INTO classrooms (id, location_string, building_id) VALUES ($1, $2, $3)")
        .bind(id)
        .bind(location)
        .bind(building_id)
        .execute(executor)
        .await?;
    Ok(id)
}
