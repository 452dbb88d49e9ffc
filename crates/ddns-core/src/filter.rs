//! Record selection
//!
//! Decides which record names are candidates for an update. Matching is
//! exact, case-sensitive string equality on the record name as published by
//! the provider.

use crate::error::{Error, Result};
use crate::record::DnsRecord;
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

/// How the configured name list is applied
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum SelectionMode {
    /// Only the listed names are candidates
    #[default]
    Include,
    /// Every name except the listed ones is a candidate
    Exclude,
}

impl SelectionMode {
    /// Lenient parse used at the configuration boundary
    ///
    /// Anything other than `INCLUDE` or `EXCLUDE`, including an absent value,
    /// falls back to [`SelectionMode::Include`].
    pub fn from_config_value(value: Option<&str>) -> Self {
        value
            .and_then(|v| v.parse().ok())
            .unwrap_or_default()
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SelectionMode::Include => "INCLUDE",
            SelectionMode::Exclude => "EXCLUDE",
        }
    }
}

impl FromStr for SelectionMode {
    type Err = Error;

    /// Strict parse: unknown modes are a precondition violation
    fn from_str(s: &str) -> Result<Self> {
        match s {
            "INCLUDE" => Ok(SelectionMode::Include),
            "EXCLUDE" => Ok(SelectionMode::Exclude),
            other => Err(Error::invalid_argument(format!(
                "unknown selection mode '{}' (expected INCLUDE or EXCLUDE)",
                other
            ))),
        }
    }
}

/// Deserializes with the same fallback as [`SelectionMode::from_config_value`]
impl<'de> Deserialize<'de> for SelectionMode {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Option::<String>::deserialize(deserializer)?;
        Ok(Self::from_config_value(value.as_deref()))
    }
}

impl fmt::Display for SelectionMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Selection mode plus the configured record names
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectionPolicy {
    #[serde(default)]
    pub mode: SelectionMode,
    #[serde(default)]
    pub names: HashSet<String>,
}

impl SelectionPolicy {
    pub fn new<I, S>(mode: SelectionMode, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            mode,
            names: names.into_iter().map(Into::into).collect(),
        }
    }

    /// Only the given names
    pub fn include<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::new(SelectionMode::Include, names)
    }

    /// Everything but the given names
    pub fn exclude<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::new(SelectionMode::Exclude, names)
    }

    /// Build a policy from an untyped mode string, rejecting unknown modes
    pub fn parse<I, S>(mode: &str, names: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Ok(Self::new(mode.parse()?, names))
    }
}

/// Names of records that are members of `names`
///
/// An empty `names` set selects nothing.
pub fn select_included(records: &[DnsRecord], names: &HashSet<String>) -> HashSet<String> {
    records
        .iter()
        .filter(|record| names.contains(&record.name))
        .map(|record| record.name.clone())
        .collect()
}

/// Names of records that are not members of `names`
///
/// An empty `names` set selects every record.
pub fn select_excluded(records: &[DnsRecord], names: &HashSet<String>) -> HashSet<String> {
    records
        .iter()
        .filter(|record| !names.contains(&record.name))
        .map(|record| record.name.clone())
        .collect()
}

/// Apply `policy` to the fetched record set
pub fn filter_candidates(records: &[DnsRecord], policy: &SelectionPolicy) -> HashSet<String> {
    match policy.mode {
        SelectionMode::Include => select_included(records, &policy.names),
        SelectionMode::Exclude => select_excluded(records, &policy.names),
    }
}
