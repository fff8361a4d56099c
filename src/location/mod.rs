pub mod config;
pub mod error;
pub mod policy;
pub mod record;
pub mod scope;
pub mod stats;
pub mod store;

use config::LocationCacheConfig;
use error::LocationError;
use nohash_hasher::BuildNoHashHasher;
use policy::LoadPolicy;
use record::{Building, BuildingKey, City, Street};
use scope::ScopedSlots;
use stats::CacheStats;
use std::borrow::Borrow;
use std::collections::hash_map::RandomState;
use std::collections::HashMap;
use std::hash::{BuildHasher, Hash};
use store::{key_by, LocationStore};
use tokio::sync::Mutex;

/// One access path into the city rows.
///
/// `complete` is only ever set by a full-table load, so an index populated
/// key by key is never mistaken for the whole relation.
struct CityIndex<K, S = RandomState> {
    entries: HashMap<K, City, S>,
    complete: bool,
    key: fn(&City) -> K,
}

impl<K, S> CityIndex<K, S>
where
    K: Eq + Hash,
    S: BuildHasher + Default,
{
    fn new(key: fn(&City) -> K) -> Self {
        Self {
            entries: HashMap::default(),
            complete: false,
            key,
        }
    }

    fn get<Q>(&self, key: &Q) -> Option<&City>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.entries.get(key)
    }

    /// All rows of the relation, if this index holds all of them.
    fn complete_rows(&self) -> Option<Vec<City>> {
        self.complete
            .then(|| self.entries.values().cloned().collect())
    }

    fn load_complete(&mut self, rows: Vec<City>) {
        self.entries = key_by(rows, self.key);
        self.complete = true;
    }

    fn merge(&mut self, rows: Vec<City>) {
        for row in rows {
            self.entries.insert((self.key)(&row), row);
        }
    }

    fn clear(&mut self) {
        self.entries.clear();
        self.complete = false;
    }
}

/// The city relation, indexed two ways.
struct CityTable {
    by_id: CityIndex<i64, BuildNoHashHasher<i64>>,
    by_ident: CityIndex<String>,
}

impl CityTable {
    fn new() -> Self {
        Self {
            by_id: CityIndex::new(|city| city.id),
            by_ident: CityIndex::new(|city| city.ident.clone()),
        }
    }
}

struct CacheState {
    policy: LoadPolicy,
    cities: CityTable,
    /// Every street keyed by ident, once loaded under [`LoadPolicy::Full`].
    all_streets: Option<HashMap<String, Street>>,
    streets: ScopedSlots<HashMap<String, Street>>,
    /// Buildings of each resident city keyed by the rendered [`BuildingKey`].
    buildings: ScopedSlots<HashMap<String, Building>>,
    stats: CacheStats,
}

/// Read-through cache over cities, streets and buildings.
///
/// Lookups either return from memory or make exactly one call to the store.
/// All views live behind a single lock held for the whole
/// check-query-populate sequence, so concurrent first accesses never issue
/// duplicate loads and never interleave replacements.
///
/// # Example
///
/// ```ignore
/// let cache = LocationCache::new(store, LocationCacheConfig::new().with_policy(LoadPolicy::Full));
///
/// let city = cache.get_city_by_ident("0918123").await?;
/// let street = cache.get_street_by_ident(city.id, "12345").await?;
/// ```
pub struct LocationCache<S> {
    store: S,
    state: Mutex<CacheState>,
}

impl<S: LocationStore> LocationCache<S> {
    pub fn new(store: S, config: LocationCacheConfig) -> Self {
        let state = CacheState {
            policy: config.load_policy,
            cities: CityTable::new(),
            all_streets: None,
            streets: ScopedSlots::new(config.street_scopes),
            buildings: ScopedSlots::new(config.building_scopes),
            stats: CacheStats::default(),
        };

        Self {
            store,
            state: Mutex::new(state),
        }
    }

    /// Creates a cache with default settings and the named load policy.
    pub fn with_policy(store: S, policy: &str) -> Result<Self, LocationError> {
        let policy = policy.parse()?;
        Ok(Self::new(store, LocationCacheConfig::new().with_policy(policy)))
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub async fn policy(&self) -> LoadPolicy {
        self.state.lock().await.policy
    }

    /// Sets the load policy from its name (see [`LoadPolicy::from_str`]).
    ///
    /// On error the current policy stays in place. Cached data is kept either
    /// way.
    pub async fn set_load_policy(&self, policy: &str) -> Result<(), LocationError> {
        let policy = policy.parse()?;
        self.set_policy(policy).await;
        Ok(())
    }

    pub async fn set_policy(&self, policy: LoadPolicy) {
        let mut state = self.state.lock().await;
        if state.policy != policy {
            log::debug!("load policy changed from {} to {}", state.policy, policy);
            state.policy = policy;
        }
    }

    pub async fn stats(&self) -> CacheStats {
        self.state.lock().await.stats.clone()
    }

    /// Cities whose street sets are currently resident, most recent first.
    pub async fn resident_street_scopes(&self) -> Vec<i64> {
        self.state.lock().await.streets.scopes()
    }

    /// Cities whose buildings are currently resident, most recent first.
    pub async fn resident_building_scopes(&self) -> Vec<i64> {
        self.state.lock().await.buildings.scopes()
    }

    /// Drops every cached row. The next lookup of each view loads it again.
    pub async fn clear(&self) {
        let mut state = self.state.lock().await;
        state.cities.by_id.clear();
        state.cities.by_ident.clear();
        state.all_streets = None;
        state.streets.clear();
        state.buildings.clear();
    }

    /// Returns the `location_cities` row with the given `id`.
    pub async fn get_city_by_id(&self, id: i64) -> Result<Option<City>, LocationError> {
        let mut state = self.state.lock().await;
        let CacheState {
            policy,
            cities,
            stats,
            ..
        } = &mut *state;

        match policy {
            LoadPolicy::Full => {
                if !cities.by_id.complete {
                    let seed = cities.by_ident.complete_rows();
                    load_complete(&self.store, &mut cities.by_id, seed, stats).await?;
                } else {
                    stats.record_hit();
                }
            }
            LoadPolicy::OnDemand => {
                if cities.by_id.complete || cities.by_id.get(&id).is_some() {
                    stats.record_hit();
                } else {
                    log::debug!("fetching city id {id}");
                    let rows = self.store.cities_by_id(id).await?;
                    stats.record_fetch();
                    cities.by_id.merge(rows);
                }
            }
        }

        Ok(cities.by_id.get(&id).cloned())
    }

    /// Returns the `location_cities` row with the given `ident`.
    pub async fn get_city_by_ident(&self, ident: &str) -> Result<Option<City>, LocationError> {
        let mut state = self.state.lock().await;
        let CacheState {
            policy,
            cities,
            stats,
            ..
        } = &mut *state;

        match policy {
            LoadPolicy::Full => {
                if !cities.by_ident.complete {
                    let seed = cities.by_id.complete_rows();
                    load_complete(&self.store, &mut cities.by_ident, seed, stats).await?;
                } else {
                    stats.record_hit();
                }
            }
            LoadPolicy::OnDemand => {
                if cities.by_ident.complete || cities.by_ident.get(ident).is_some() {
                    stats.record_hit();
                } else {
                    log::debug!("fetching city ident {ident:?}");
                    let rows = self.store.cities_by_ident(ident).await?;
                    stats.record_fetch();
                    cities.by_ident.merge(rows);
                }
            }
        }

        Ok(cities.by_ident.get(ident).cloned())
    }

    /// Returns the street with the given `ident`.
    ///
    /// Under [`LoadPolicy::Full`] every street is loaded once and `city_id`
    /// plays no part. Under [`LoadPolicy::OnDemand`] the streets of `city_id`
    /// are loaded as a whole whenever `ident` is not resident for that city.
    pub async fn get_street_by_ident(
        &self,
        city_id: i64,
        ident: &str,
    ) -> Result<Option<Street>, LocationError> {
        let mut state = self.state.lock().await;
        let CacheState {
            policy,
            all_streets,
            streets,
            stats,
            ..
        } = &mut *state;

        if let LoadPolicy::Full = policy {
            if all_streets.is_none() {
                log::debug!("loading all streets");
                let rows = self.store.all_streets().await?;
                stats.record_fetch();
                *all_streets = Some(key_by(rows, |s: &Street| s.ident.clone()));
            } else {
                stats.record_hit();
            }

            return Ok(all_streets.as_ref().and_then(|all| all.get(ident)).cloned());
        }

        let from_full = all_streets
            .as_ref()
            .and_then(|all| all.get(ident))
            .filter(|street| street.city_id == city_id)
            .cloned();
        let loaded = match from_full {
            Some(street) => Some(street),
            None => streets
                .get(city_id)
                .and_then(|scope| scope.get(ident))
                .cloned(),
        };

        if loaded.is_some() {
            stats.record_hit();
            return Ok(loaded);
        }

        log::debug!("loading streets of city {city_id}");
        let rows = self.store.streets_in_city(city_id).await?;
        stats.record_fetch();
        let scope: HashMap<String, Street> = key_by(rows, |s| s.ident.clone());
        let found = scope.get(ident).cloned();

        if let Some(evicted) = streets.replace(city_id, scope) {
            log::debug!("evicted streets of city {evicted}");
        }

        Ok(found)
    }

    /// Returns the building at `building_num` on `street_id` in `city_id`, or
    /// `None` if there is no such building.
    ///
    /// The first lookup for a city loads all of its buildings; the city then
    /// stays resident until another city takes its slot.
    pub async fn building_exists(
        &self,
        city_id: i64,
        street_id: Option<i64>,
        building_num: &str,
    ) -> Result<Option<Building>, LocationError> {
        let key = BuildingKey::new(city_id, street_id, building_num).to_string();

        let mut state = self.state.lock().await;
        let CacheState {
            buildings, stats, ..
        } = &mut *state;

        if let Some(scope) = buildings.get(city_id) {
            stats.record_hit();
            return Ok(scope.get(&key).cloned());
        }

        log::debug!("loading buildings of city {city_id}");
        let rows = self.store.buildings_in_city(city_id).await?;
        stats.record_fetch();
        let scope: HashMap<String, Building> = key_by(rows, |b| b.key().to_string());
        let found = scope.get(&key).cloned();

        if let Some(evicted) = buildings.replace(city_id, scope) {
            log::debug!("evicted buildings of city {evicted}");
        }

        Ok(found)
    }
}

/// Fills `index` with the whole city relation, re-indexing `seed` when the
/// sibling index already holds it and querying the store otherwise.
async fn load_complete<St, K, S>(
    store: &St,
    index: &mut CityIndex<K, S>,
    seed: Option<Vec<City>>,
    stats: &mut CacheStats,
) -> Result<(), LocationError>
where
    St: LocationStore,
    K: Eq + Hash,
    S: BuildHasher + Default,
{
    let rows = match seed {
        Some(rows) => {
            stats.record_hit();
            stats.seeded_loads += 1;
            log::debug!("indexing {} cities from the sibling view", rows.len());
            rows
        }
        None => {
            log::debug!("loading all cities");
            let rows = store.all_cities().await?;
            stats.record_fetch();
            rows
        }
    };

    index.load_complete(rows);
    Ok(())
}
