use uuid::Uuid;

#[derive(Debug, sqlx::FromRow)]
pub struct BuildingSite {
    pub id: Uuid,
    pub nickname: String,
    pub latitude: f64,
    pub longitude: f64,
}

#[derive(Debug, sqlx::FromRow)]
pub struct LotPoint {
    pub id: Uuid,
    pub latitude: f64,
    pub longitude: f64,
}
