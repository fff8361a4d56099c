//! In-process gateway over fixed rows.
//!
//! Answers every query from vectors held in memory and records each query it
//! receives, so callers can see exactly which round trips the cache made.

use std::sync::{Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;

use super::LocationStore;
use crate::location::error::LocationError;
use crate::location::record::{Building, City, Street};

/// A query received by [`MemoryStore`], with its bind parameter.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Query {
    AllCities,
    CitiesById(i64),
    CitiesByIdent(String),
    AllStreets,
    StreetsInCity(i64),
    BuildingsInCity(i64),
}

#[derive(Debug, Default)]
struct Journal {
    calls: Vec<Query>,
    failures_pending: usize,
}

#[derive(Debug, Default)]
pub struct MemoryStore {
    cities: Vec<City>,
    streets: Vec<Street>,
    buildings: Vec<Building>,
    journal: Mutex<Journal>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_cities(mut self, cities: impl IntoIterator<Item = City>) -> Self {
        self.cities.extend(cities);
        self
    }

    pub fn with_streets(mut self, streets: impl IntoIterator<Item = Street>) -> Self {
        self.streets.extend(streets);
        self
    }

    pub fn with_buildings(mut self, buildings: impl IntoIterator<Item = Building>) -> Self {
        self.buildings.extend(buildings);
        self
    }

    /// Makes the next `count` queries fail with [`LocationError::Store`].
    /// Failed queries are still recorded.
    pub fn fail_next(&self, count: usize) {
        self.journal().failures_pending = count;
    }

    /// Every query received so far, oldest first.
    pub fn calls(&self) -> Vec<Query> {
        self.journal().calls.clone()
    }

    /// Number of times exactly `query` was received.
    pub fn count(&self, query: &Query) -> usize {
        self.journal().calls.iter().filter(|q| *q == query).count()
    }

    /// Number of received queries matching `predicate`.
    pub fn count_where(&self, predicate: impl Fn(&Query) -> bool) -> usize {
        self.journal().calls.iter().filter(|q| predicate(q)).count()
    }

    pub fn total(&self) -> usize {
        self.journal().calls.len()
    }

    fn journal(&self) -> MutexGuard<'_, Journal> {
        self.journal.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn record(&self, query: Query) -> Result<(), LocationError> {
        let mut journal = self.journal();
        let message = format!("injected failure for {query:?}");
        journal.calls.push(query);

        if journal.failures_pending > 0 {
            journal.failures_pending -= 1;
            return Err(LocationError::Store(message));
        }

        Ok(())
    }

    fn select<T: Clone>(rows: &[T], filter: impl Fn(&T) -> bool) -> Vec<T> {
        rows.iter().filter(|row| filter(row)).cloned().collect()
    }
}

#[async_trait]
impl LocationStore for MemoryStore {
    async fn all_cities(&self) -> Result<Vec<City>, LocationError> {
        self.record(Query::AllCities)?;
        Ok(self.cities.clone())
    }

    async fn cities_by_id(&self, id: i64) -> Result<Vec<City>, LocationError> {
        self.record(Query::CitiesById(id))?;
        Ok(Self::select(&self.cities, |c| c.id == id))
    }

    async fn cities_by_ident(&self, ident: &str) -> Result<Vec<City>, LocationError> {
        self.record(Query::CitiesByIdent(ident.to_owned()))?;
        Ok(Self::select(&self.cities, |c| c.ident == ident))
    }

    async fn all_streets(&self) -> Result<Vec<Street>, LocationError> {
        self.record(Query::AllStreets)?;
        Ok(self.streets.clone())
    }

    async fn streets_in_city(&self, city_id: i64) -> Result<Vec<Street>, LocationError> {
        self.record(Query::StreetsInCity(city_id))?;
        Ok(Self::select(&self.streets, |s| s.city_id == city_id))
    }

    async fn buildings_in_city(&self, city_id: i64) -> Result<Vec<Building>, LocationError> {
        self.record(Query::BuildingsInCity(city_id))?;
        Ok(Self::select(&self.buildings, |b| b.city_id == city_id))
    }
}
