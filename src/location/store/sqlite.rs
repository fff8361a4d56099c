//! SQLite gateway for the location cache

use crate::location::error::LocationError;
use crate::location::record::{Building, City, Street};
use async_trait::async_trait;
use sqlx::SqlitePool;

use super::rows::{BuildingRow, CityRow, StreetRow};
use super::LocationStore;

/// SQLite-backed gateway
///
/// Reads three tables:
/// - `location_cities`: `id`, `ident`, `cityid`
/// - `location_streets`: `id`, `ident`, `cityid`
/// - `location_buildings`: `id`, `city_id`, `street_id`, `building_num`,
///   `longitude`, `latitude`
///
/// The schema itself is owned by the application; this gateway only reads.
pub struct SqliteStore {
    pool: SqlitePool,
}

#[async_trait]
impl LocationStore for SqliteStore {
    async fn all_cities(&self) -> Result<Vec<City>, LocationError> {
        let rows: Vec<CityRow> = sqlx::query_as("SELECT id, ident, cityid FROM location_cities")
            .fetch_all(&self.pool)
            .await?;

        Ok(rows.into_iter().map(|x| x.extract()).collect())
    }

    async fn cities_by_id(&self, id: i64) -> Result<Vec<City>, LocationError> {
        let rows: Vec<CityRow> =
            sqlx::query_as("SELECT id, ident, cityid FROM location_cities WHERE id = ?")
                .bind(id)
                .fetch_all(&self.pool)
                .await?;

        Ok(rows.into_iter().map(|x| x.extract()).collect())
    }

    async fn cities_by_ident(&self, ident: &str) -> Result<Vec<City>, LocationError> {
        let rows: Vec<CityRow> =
            sqlx::query_as("SELECT id, ident, cityid FROM location_cities WHERE ident = ?")
                .bind(ident)
                .fetch_all(&self.pool)
                .await?;

        Ok(rows.into_iter().map(|x| x.extract()).collect())
    }

    async fn all_streets(&self) -> Result<Vec<Street>, LocationError> {
        let rows: Vec<StreetRow> =
            sqlx::query_as("SELECT id, ident, cityid FROM location_streets")
                .fetch_all(&self.pool)
                .await?;

        Ok(rows.into_iter().map(|x| x.extract()).collect())
    }

    async fn streets_in_city(&self, city_id: i64) -> Result<Vec<Street>, LocationError> {
        let rows: Vec<StreetRow> =
            sqlx::query_as("SELECT id, ident, cityid FROM location_streets WHERE cityid = ?")
                .bind(city_id)
                .fetch_all(&self.pool)
                .await?;

        Ok(rows.into_iter().map(|x| x.extract()).collect())
    }

    async fn buildings_in_city(&self, city_id: i64) -> Result<Vec<Building>, LocationError> {
        let rows: Vec<BuildingRow> = sqlx::query_as(
            r#"
                SELECT id, city_id, street_id, building_num, longitude, latitude
                FROM location_buildings
                WHERE city_id = ?
            "#,
        )
        .bind(city_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(|x| x.extract()).collect())
    }
}

impl SqliteStore {
    pub async fn new(database_url: &str) -> Result<Self, LocationError> {
        let url = if database_url.starts_with("sqlite:") {
            database_url.to_string()
        } else {
            format!("sqlite:{}?mode=ro", database_url)
        };

        let pool = SqlitePool::connect(&url).await?;

        Ok(Self { pool })
    }

    pub fn from_pool(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sqlx::sqlite::SqlitePoolOptions;

    async fn seeded_store() -> Result<SqliteStore, LocationError> {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await?;

        for statement in [
            "CREATE TABLE location_cities (id INTEGER PRIMARY KEY, ident TEXT NOT NULL, cityid INTEGER)",
            "CREATE TABLE location_streets (id INTEGER PRIMARY KEY, ident TEXT NOT NULL, cityid INTEGER NOT NULL)",
            r#"CREATE TABLE location_buildings (
                id INTEGER PRIMARY KEY,
                city_id INTEGER NOT NULL,
                street_id INTEGER,
                building_num TEXT NOT NULL,
                longitude REAL,
                latitude REAL
            )"#,
            "INSERT INTO location_cities (id, ident, cityid) VALUES (7, 'WAW', 7), (8, 'KRK', NULL)",
            "INSERT INTO location_streets (id, ident, cityid) VALUES (10, '01234', 7), (11, '05678', 8)",
            r#"INSERT INTO location_buildings (id, city_id, street_id, building_num, longitude, latitude)
               VALUES (100, 7, 10, '5', 21.0122, 52.2297), (101, 7, NULL, '12A', NULL, NULL), (102, 8, 11, '1', 19.94, 50.06)"#,
        ] {
            sqlx::query(statement).execute(&pool).await?;
        }

        Ok(SqliteStore::from_pool(pool))
    }

    #[tokio::test]
    async fn test_city_queries() -> Result<(), LocationError> {
        let store = seeded_store().await?;

        let all = store.all_cities().await?;
        assert_eq!(all.len(), 2);

        let by_id = store.cities_by_id(7).await?;
        assert_eq!(
            by_id,
            vec![City {
                id: 7,
                ident: "WAW".to_string(),
                city_id: Some(7)
            }]
        );

        let by_ident = store.cities_by_ident("KRK").await?;
        assert_eq!(by_ident.len(), 1);
        assert_eq!(by_ident[0].city_id, None);

        assert!(store.cities_by_id(999).await?.is_empty());

        Ok(())
    }

    #[tokio::test]
    async fn test_street_queries() -> Result<(), LocationError> {
        let store = seeded_store().await?;

        assert_eq!(store.all_streets().await?.len(), 2);

        let streets = store.streets_in_city(8).await?;
        assert_eq!(streets.len(), 1);
        assert_eq!(streets[0].ident, "05678");

        Ok(())
    }

    #[tokio::test]
    async fn test_building_queries() -> Result<(), LocationError> {
        let store = seeded_store().await?;

        let mut buildings = store.buildings_in_city(7).await?;
        buildings.sort_by_key(|b| b.id);

        assert_eq!(buildings.len(), 2);
        assert_eq!(buildings[0].key().to_string(), "7|10|5");
        assert_eq!(buildings[0].longitude, Some(21.0122));
        assert_eq!(buildings[1].key().to_string(), "7||12A");
        assert_eq!(buildings[1].latitude, None);

        Ok(())
    }

    #[tokio::test]
    async fn test_missing_table_is_a_store_error() -> Result<(), LocationError> {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await?;
        let store = SqliteStore::from_pool(pool);

        match store.all_cities().await {
            Err(LocationError::Database(_)) => (),
            other => panic!("Expected Database error, got {other:?}"),
        }

        Ok(())
    }
}
