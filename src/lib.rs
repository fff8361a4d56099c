pub mod location;

pub use location::config::LocationCacheConfig;
pub use location::error::LocationError;
pub use location::policy::LoadPolicy;
pub use location::record::{Building, BuildingKey, City, Street};
pub use location::stats::CacheStats;
pub use location::store::{key_by, LocationStore, MemoryStore};
pub use location::LocationCache;

#[cfg(feature = "store-sqlite")]
pub use location::store::SqliteStore;

#[cfg(feature = "store-postgres")]
pub use location::store::PgStore;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("location error")]
    LocationError(#[from] LocationError),
}

/// A building together with the city and street it was resolved through.
#[derive(Debug, Clone, PartialEq)]
pub struct Address {
    pub city: City,
    pub street: Option<Street>,
    pub building: Building,
}

/// Resolves a textual address into its rows, going city, then street, then
/// building.
///
/// `street_ident` is `None` for buildings addressed directly on the city.
/// Returns `Ok(None)` as soon as one of the links does not exist.
pub async fn resolve_address<S>(
    cache: &LocationCache<S>,
    city_ident: &str,
    street_ident: Option<&str>,
    building_num: &str,
) -> Result<Option<Address>, Error>
where
    S: LocationStore,
{
    let Some(city) = cache.get_city_by_ident(city_ident).await? else {
        return Ok(None);
    };

    let street = match street_ident {
        Some(ident) => match cache.get_street_by_ident(city.id, ident).await? {
            Some(street) => Some(street),
            None => return Ok(None),
        },
        None => None,
    };

    let street_id = street.as_ref().map(|s| s.id);
    let Some(building) = cache.building_exists(city.id, street_id, building_num).await? else {
        return Ok(None);
    };

    Ok(Some(Address {
        city,
        street,
        building,
    }))
}
