//! Load policy governing how each view materializes its rows.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::error::LocationError;

/// Strategy used by the city and street views on first access.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LoadPolicy {
    /// Fetch the whole relation on first use and answer everything from memory,
    /// misses included.
    ///
    /// Use this when many rows are read and the table fits comfortably in memory.
    Full,
    /// Fetch only the requested key (or the enclosing city for streets).
    ///
    /// Use this when the full table could exceed the memory budget.
    #[default]
    OnDemand,
}

impl LoadPolicy {
    pub fn as_str(&self) -> &'static str {
        match self {
            LoadPolicy::Full => "full",
            LoadPolicy::OnDemand => "one",
        }
    }
}

impl FromStr for LoadPolicy {
    type Err = LocationError;

    /// Parses a policy name, ignoring case and surrounding whitespace.
    ///
    /// `one` is the historical name for [`LoadPolicy::OnDemand`].
    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_lowercase().as_str() {
            "full" => Ok(LoadPolicy::Full),
            "one" | "ondemand" | "on_demand" | "on-demand" => Ok(LoadPolicy::OnDemand),
            _ => Err(LocationError::InvalidPolicy(value.to_owned())),
        }
    }
}

impl fmt::Display for LoadPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
