use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use shared::access::{AccessRule, TimeWindow};
use shared::geo::Coordinate;
use shared::proximity::LotSite;
use shared::week::DayFilter;
use uuid::Uuid;

#[derive(Debug, sqlx::FromRow, Clone)]
pub struct ParkingLot {
    pub id: Uuid,
    pub name: String,
    pub address: Option<String>,
    pub total_spaces: Option<i32>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl LotSite for ParkingLot {
    fn id(&self) -> Uuid {
        self.id
    }

    fn coordinate(&self) -> Option<Coordinate> {
        match (self.latitude, self.longitude) {
            (Some(latitude), Some(longitude)) => Some(Coordinate::new(latitude, longitude)),
            _ => None,
        }
    }
}

/// A lot joined with its most recent snapshot, if any.
#[derive(Debug, sqlx::FromRow, Clone)]
pub struct LotWithAvailability {
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

#[derive(Debug, sqlx::FromRow, Clone)]
pub struct ParkingSnapshot {
    pub id: Uuid,
    pub lot_id: Uuid,
    pub free_spaces: i32,
    pub occupancy_pct: Option<f64>,
    pub collected_at: DateTime<Utc>,
}

#[derive(Debug, sqlx::FromRow, Clone)]
pub struct Building {
    pub id: Uuid,
    pub name: String,
    pub nickname: String,
    pub latitude: f64,
    pub longitude: f64,
}

impl Building {
    pub fn coordinate(&self) -> Coordinate {
        Coordinate::new(self.latitude, self.longitude)
    }
}

#[derive(Debug, sqlx::FromRow, Clone)]
pub struct Classroom {
    pub id: Uuid,
    pub location_string: String,
    pub building_id: Option<Uuid>,
}

#[derive(Debug, sqlx::FromRow, Clone)]
pub struct PermitType {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
}

#[derive(Debug, sqlx::FromRow, Clone)]
pub struct LotAccessRule {
    pub lot_id: Uuid,
    pub permit_id: Uuid,
    pub days_of_week: Option<Vec<i32>>,
    pub access_start: Option<NaiveTime>,
    pub access_end: Option<NaiveTime>,
}

impl LotAccessRule {
    /// The stored row as a core access rule, with NULL columns mapped to
    /// their unrestricted variants.
    pub fn rule(&self) -> AccessRule {
        AccessRule {
            days: DayFilter::from_stored(self.days_of_week.as_deref()),
            window: TimeWindow {
                start: self.access_start,
                end: self.access_end,
            },
        }
    }
}

#[derive(Debug, sqlx::FromRow, Clone)]
pub struct LotBuildingDistance {
    pub lot_id: Uuid,
    pub building_id: Uuid,
    pub distance_miles: f64,
    pub duration_minutes: f64,
}

#[derive(Debug, sqlx::FromRow, Clone)]
pub struct UserSchedule {
    pub id: Uuid,
    pub user_id: Uuid,
    pub name: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, sqlx::FromRow, Clone)]
pub struct ScheduleEvent {
    pub id: Uuid,
    pub schedule_id: Uuid,
    pub event_name: String,
    pub classroom_id: Option<Uuid>,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    pub days_of_week: Option<Vec<i32>>,
    pub valid_from: Option<NaiveDate>,
    pub valid_until: Option<NaiveDate>,
}
