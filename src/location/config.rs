//! Cache configuration.

use std::num::NonZeroUsize;

use super::error::LocationError;
use super::policy::LoadPolicy;

pub const POLICY_VAR: &str = "LOCATION_CACHE_POLICY";
pub const STREET_SCOPES_VAR: &str = "LOCATION_CACHE_STREET_SCOPES";
pub const BUILDING_SCOPES_VAR: &str = "LOCATION_CACHE_BUILDING_SCOPES";

/// Settings for a [`LocationCache`](super::LocationCache).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocationCacheConfig {
    /// Policy for the city and street views.
    pub load_policy: LoadPolicy,
    /// Number of cities whose street sets may stay resident under
    /// [`LoadPolicy::OnDemand`].
    pub street_scopes: NonZeroUsize,
    /// Number of cities whose buildings may stay resident.
    pub building_scopes: NonZeroUsize,
}

impl Default for LocationCacheConfig {
    fn default() -> Self {
        Self {
            load_policy: LoadPolicy::default(),
            street_scopes: NonZeroUsize::MIN,
            building_scopes: NonZeroUsize::MIN,
        }
    }
}

impl LocationCacheConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_policy(mut self, policy: LoadPolicy) -> Self {
        self.load_policy = policy;
        self
    }

    pub fn with_street_scopes(mut self, scopes: NonZeroUsize) -> Self {
        self.street_scopes = scopes;
        self
    }

    pub fn with_building_scopes(mut self, scopes: NonZeroUsize) -> Self {
        self.building_scopes = scopes;
        self
    }

    /// Reads the configuration from the environment (and a `.env` file when
    /// present). Unset variables keep their defaults; malformed ones are errors.
    pub fn from_env() -> Result<Self, LocationError> {
        Self::from_lookup(|name| dotenvy::var(name).ok())
    }

    fn from_lookup<F>(lookup: F) -> Result<Self, LocationError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(policy) = lookup(POLICY_VAR) {
            config.load_policy = policy.parse()?;
        }
        if let Some(scopes) = lookup(STREET_SCOPES_VAR) {
            config.street_scopes = parse_scopes(STREET_SCOPES_VAR, &scopes)?;
        }
        if let Some(scopes) = lookup(BUILDING_SCOPES_VAR) {
            config.building_scopes = parse_scopes(BUILDING_SCOPES_VAR, &scopes)?;
        }

        Ok(config)
    }
}

fn parse_scopes(name: &str, value: &str) -> Result<NonZeroUsize, LocationError> {
    value
        .trim()
        .parse::<NonZeroUsize>()
        .map_err(|e| LocationError::Config(format!("{name}={value:?}: {e}")))
}
