//! Backing store gateways for the location cache
//!
//! This module provides the query interface the cache reads through, with
//! several implementations:
//! - In-process rows (via `memory` module), used by tests and demos
//! - SQLite (via `sqlite` module)
//! - PostgreSQL (via `postgres` module)
//!
//! Every method corresponds to exactly one query against the store. Gateways
//! return plain rows; indexing them by a key column is done by the cache with
//! [`key_by`].

use super::error::LocationError;
use super::record::{Building, City, Street};
use async_trait::async_trait;
use std::collections::HashMap;
use std::hash::{BuildHasher, Hash};
use std::sync::Arc;

pub mod memory;

#[cfg(any(feature = "store-sqlite", feature = "store-postgres"))]
mod rows;

#[cfg(feature = "store-sqlite")]
pub mod sqlite;

#[cfg(feature = "store-postgres")]
pub mod postgres;

pub use memory::{MemoryStore, Query};

#[cfg(feature = "store-sqlite")]
pub use sqlite::SqliteStore;

#[cfg(feature = "store-postgres")]
pub use postgres::PgStore;

/// Indexes `rows` by the key produced by `key`.
///
/// Rows sharing a key collapse to the last one, like a keyed result set.
///
/// # Arguments
/// * `rows` - Rows in the order the store returned them
/// * `key` - Extracts the key column from a row
pub fn key_by<K, T, S, F>(rows: impl IntoIterator<Item = T>, key: F) -> HashMap<K, T, S>
where
    K: Eq + Hash,
    S: BuildHasher + Default,
    F: Fn(&T) -> K,
{
    rows.into_iter().map(|row| (key(&row), row)).collect()
}

/// Trait defining the backing store interface
///
/// Implementations must be thread-safe (Send + Sync) as the cache may be
/// shared across async tasks. Store failures are returned as-is; the cache
/// never retries them.
#[async_trait]
pub trait LocationStore: Send + Sync {
    // Cities

    /// Every row of `location_cities`.
    async fn all_cities(&self) -> Result<Vec<City>, LocationError>;

    /// Rows of `location_cities` whose `id` equals `id` (zero or one).
    async fn cities_by_id(&self, id: i64) -> Result<Vec<City>, LocationError>;

    /// Rows of `location_cities` whose `ident` equals `ident`.
    async fn cities_by_ident(&self, ident: &str) -> Result<Vec<City>, LocationError>;

    // Streets

    /// Every row of `location_streets`, regardless of city.
    async fn all_streets(&self) -> Result<Vec<Street>, LocationError>;

    /// Rows of `location_streets` belonging to `city_id`.
    async fn streets_in_city(&self, city_id: i64) -> Result<Vec<Street>, LocationError>;

    // Buildings

    /// Rows of `location_buildings` belonging to `city_id`.
    async fn buildings_in_city(&self, city_id: i64) -> Result<Vec<Building>, LocationError>;
}

macro_rules! forward_location_store {
    ($wrapper:ident) => {
        #[async_trait]
        impl<T: LocationStore + ?Sized> LocationStore for $wrapper<T> {
            async fn all_cities(&self) -> Result<Vec<City>, LocationError> {
                (**self).all_cities().await
            }

            async fn cities_by_id(&self, id: i64) -> Result<Vec<City>, LocationError> {
                (**self).cities_by_id(id).await
            }

            async fn cities_by_ident(&self, ident: &str) -> Result<Vec<City>, LocationError> {
                (**self).cities_by_ident(ident).await
            }

            async fn all_streets(&self) -> Result<Vec<Street>, LocationError> {
                (**self).all_streets().await
            }

            async fn streets_in_city(&self, city_id: i64) -> Result<Vec<Street>, LocationError> {
                (**self).streets_in_city(city_id).await
            }

            async fn buildings_in_city(&self, city_id: i64) -> Result<Vec<Building>, LocationError> {
                (**self).buildings_in_city(city_id).await
            }
        }
    };
}

// Lets a boxed or shared gateway back a cache.
forward_location_store!(Box);
forward_location_store!(Arc);
