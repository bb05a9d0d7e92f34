use crate::v1::db::models::{
    Building, Classroom, LotWithAvailability, ParkingLot, ParkingSnapshot, PermitType,
    ScheduleEvent, UserSchedule,
};
use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use shared::mapbox::matrix::TravelProfile;
use shared::proximity::ResolvedDistance;
use shared::schedule::RawScheduleEvent;
use uuid::Uuid;

#[derive(Serialize)]
pub struct LotResponse {
    pub id: Uuid,
    pub name: String,
    pub address: Option<String>,
    pub total_spaces: Option<i32>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<ParkingLot> for LotResponse {
    fn from(lot: ParkingLot) -> Self {
        Self {
            id: lot.id,
            name: lot.name,
            address: lot.address,
            total_spaces: lot.total_spaces,
            latitude: lot.latitude,
            longitude: lot.longitude,
            created_at: lot.created_at,
            updated_at: lot.updated_at,
        }
    }
}

#[derive(Serialize)]
pub struct LotAvailabilityResponse {
    pub id: Uuid,
    pub name: String,
    pub address: Option<String>,
    pub total_spaces: Option<i32>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub free_spaces: Option<i32>,
    pub occupancy_pct: Option<f64>,
    pub availability_updated_at: Option<DateTime<Utc>>,
}

impl From<LotWithAvailability> for LotAvailabilityResponse {
    fn from(lot: LotWithAvailability) -> Self {
        Self {
            id: lot.id,
            name: lot.name,
            address: lot.address,
            total_spaces: lot.total_spaces,
            latitude: lot.latitude,
            longitude: lot.longitude,
            created_at: lot.created_at,
            updated_at: lot.updated_at,
            free_spaces: lot.free_spaces,
            occupancy_pct: lot.occupancy_pct,
            availability_updated_at: lot.availability_updated_at,
        }
    }
}

#[derive(Serialize)]
pub struct SnapshotResponse {
    pub id: Uuid,
    pub lot_id: Uuid,
    pub free_spaces: i32,
    pub occupancy_pct: Option<f64>,
    pub collected_at: DateTime<Utc>,
}

impl From<ParkingSnapshot> for SnapshotResponse {
    fn from(snapshot: ParkingSnapshot) -> Self {
        Self {
            id: snapshot.id,
            lot_id: snapshot.lot_id,
            free_spaces: snapshot.free_spaces,
            occupancy_pct: snapshot.occupancy_pct,
            collected_at: snapshot.collected_at,
        }
    }
}

#[derive(Serialize)]
pub struct PaginatedSnapshots {
    pub items: Vec<SnapshotResponse>,
    pub total: i64,
    pub page: i64,
    pub per_page: i64,
    pub pages: i64,
}

#[derive(Deserialize)]
pub struct PageParams {
    pub page: Option<i64>,
    pub per_page: Option<i64>,
}

#[derive(Serialize)]
pub struct PermitResponse {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
}

impl From<PermitType> for PermitResponse {
    fn from(permit: PermitType) -> Self {
        Self {
            id: permit.id,
            name: permit.name,
            description: permit.description,
        }
    }
}

/// Optional evaluation instant for access matching; defaults to the server's
/// current local time.
#[derive(Deserialize)]
pub struct AccessQuery {
    pub at: Option<NaiveDateTime>,
}

#[derive(Serialize)]
pub struct BuildingResponse {
    pub id: Uuid,
    pub name: String,
    pub nickname: String,
    pub latitude: f64,
    pub longitude: f64,
}

impl From<Building> for BuildingResponse {
    fn from(building: Building) -> Self {
        Self {
            id: building.id,
            name: building.name,
            nickname: building.nickname,
            latitude: building.latitude,
            longitude: building.longitude,
        }
    }
}

#[derive(Serialize)]
pub struct ClassroomResponse {
    pub id: Uuid,
    pub location_string: String,
    pub building: Option<BuildingResponse>,
}

impl ClassroomResponse {
    pub fn new(classroom: Classroom, building: Option<Building>) -> Self {
        Self {
            id: classroom.id,
            location_string: classroom.location_string,
            building: building.map(BuildingResponse::from),
        }
    }
}

/// A lot with its resolved travel distance. Duration is display-only and is
/// absent when the distance came from a great-circle estimate.
#[derive(Serialize)]
pub struct RankedLotResponse {
    pub lot: LotResponse,
    pub distance_miles: f64,
    pub duration_minutes: Option<f64>,
}

impl From<ResolvedDistance<ParkingLot>> for RankedLotResponse {
    fn from(resolved: ResolvedDistance<ParkingLot>) -> Self {
        Self {
            lot: resolved.lot.into(),
            distance_miles: resolved.distance_miles,
            duration_minutes: resolved.duration_minutes,
        }
    }
}

#[derive(Serialize)]
pub struct ClassroomLotsResponse {
    pub classroom: ClassroomResponse,
    pub lots: Vec<RankedLotResponse>,
}

#[derive(Deserialize)]
pub struct NearestLotsQuery {
    pub latitude: f64,
    pub longitude: f64,
    pub profile: Option<ProfileParam>,
}

#[derive(Deserialize, Clone, Copy)]
#[serde(rename_all = "lowercase")]
pub enum ProfileParam {
    Driving,
    Walking,
}

impl From<ProfileParam> for TravelProfile {
    fn from(profile: ProfileParam) -> Self {
        match profile {
            ProfileParam::Driving => TravelProfile::Driving,
            ProfileParam::Walking => TravelProfile::Walking,
        }
    }
}

/// Full-replace schedule upload: the already-parsed events from the external
/// calendar parser.
#[derive(Deserialize)]
pub struct ScheduleUpload {
    pub name: Option<String>,
    #[serde(default)]
    pub events: Vec<RawScheduleEvent>,
}

#[derive(Serialize)]
pub struct ScheduleEventResponse {
    pub id: Uuid,
    pub event_name: String,
    pub classroom_id: Option<Uuid>,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    pub days_of_week: Option<Vec<i32>>,
    pub valid_from: Option<NaiveDate>,
    pub valid_until: Option<NaiveDate>,
}

impl From<ScheduleEvent> for ScheduleEventResponse {
    fn from(event: ScheduleEvent) -> Self {
        Self {
            id: event.id,
            event_name: event.event_name,
            classroom_id: event.classroom_id,
            start_time: event.start_time,
            end_time: event.end_time,
            days_of_week: event.days_of_week,
            valid_from: event.valid_from,
            valid_until: event.valid_until,
        }
    }
}

#[derive(Serialize)]
pub struct ScheduleResponse {
    pub id: Uuid,
    pub user_id: Uuid,
    pub name: Option<String>,
    pub events: Vec<ScheduleEventResponse>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl ScheduleResponse {
    pub fn new(schedule: UserSchedule, events: Vec<ScheduleEvent>) -> Self {
        Self {
            id: schedule.id,
            user_id: schedule.user_id,
            name: schedule.name,
            events: events.into_iter().map(ScheduleEventResponse::from).collect(),
            created_at: schedule.created_at,
            updated_at: schedule.updated_at,
        }
    }
}
