//! PostgreSQL gateway for the location cache

use crate::location::error::LocationError;
use crate::location::record::{Building, City, Street};
use async_trait::async_trait;
use sqlx::PgPool;

use super::rows::{BuildingRow, CityRow, StreetRow};
use super::LocationStore;

// Columns are cast so that narrower integer and numeric column types decode
// into the row structs unchanged.
const CITY_COLUMNS: &str = "CAST(id AS BIGINT) AS id, CAST(ident AS TEXT) AS ident, CAST(cityid AS BIGINT) AS cityid";
const STREET_COLUMNS: &str = "CAST(id AS BIGINT) AS id, CAST(ident AS TEXT) AS ident, CAST(cityid AS BIGINT) AS cityid";
const BUILDING_COLUMNS: &str = r#"
    CAST(id AS BIGINT) AS id,
    CAST(city_id AS BIGINT) AS city_id,
    CAST(street_id AS BIGINT) AS street_id,
    CAST(building_num AS TEXT) AS building_num,
    CAST(longitude AS DOUBLE PRECISION) AS longitude,
    CAST(latitude AS DOUBLE PRECISION) AS latitude
"#;

/// PostgreSQL-backed gateway
///
/// Reads `location_cities`, `location_streets` and `location_buildings`.
/// Intended to share the application's pool; it never writes.
pub struct PgStore {
    pool: PgPool,
}

#[async_trait]
impl LocationStore for PgStore {
    async fn all_cities(&self) -> Result<Vec<City>, LocationError> {
        let sql = format!("SELECT {CITY_COLUMNS} FROM location_cities");
        let rows: Vec<CityRow> = sqlx::query_as(&sql).fetch_all(&self.pool).await?;

        Ok(rows.into_iter().map(|x| x.extract()).collect())
    }

    async fn cities_by_id(&self, id: i64) -> Result<Vec<City>, LocationError> {
        let sql = format!("SELECT {CITY_COLUMNS} FROM location_cities WHERE id = $1");
        let rows: Vec<CityRow> = sqlx::query_as(&sql)
            .bind(id)
            .fetch_all(&self.pool)
            .await?;

        Ok(rows.into_iter().map(|x| x.extract()).collect())
    }

    async fn cities_by_ident(&self, ident: &str) -> Result<Vec<City>, LocationError> {
        let sql = format!("SELECT {CITY_COLUMNS} FROM location_cities WHERE ident = $1");
        let rows: Vec<CityRow> = sqlx::query_as(&sql)
            .bind(ident)
            .fetch_all(&self.pool)
            .await?;

        Ok(rows.into_iter().map(|x| x.extract()).collect())
    }

    async fn all_streets(&self) -> Result<Vec<Street>, LocationError> {
        let sql = format!("SELECT {STREET_COLUMNS} FROM location_streets");
        let rows: Vec<StreetRow> = sqlx::query_as(&sql).fetch_all(&self.pool).await?;

        Ok(rows.into_iter().map(|x| x.extract()).collect())
    }

    async fn streets_in_city(&self, city_id: i64) -> Result<Vec<Street>, LocationError> {
        let sql = format!("SELECT {STREET_COLUMNS} FROM location_streets WHERE cityid = $1");
        let rows: Vec<StreetRow> = sqlx::query_as(&sql)
            .bind(city_id)
            .fetch_all(&self.pool)
            .await?;

        Ok(rows.into_iter().map(|x| x.extract()).collect())
    }

    async fn buildings_in_city(&self, city_id: i64) -> Result<Vec<Building>, LocationError> {
        let sql = format!("SELECT {BUILDING_COLUMNS} FROM location_buildings WHERE city_id = $1");
        let rows: Vec<BuildingRow> = sqlx::query_as(&sql)
            .bind(city_id)
            .fetch_all(&self.pool)
            .await?;

        Ok(rows.into_iter().map(|x| x.extract()).collect())
    }
}

impl PgStore {
    pub async fn new(database_url: &str) -> Result<Self, LocationError> {
        let pool = PgPool::connect(database_url).await?;

        Ok(Self { pool })
    }

    pub fn from_pool(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}
