//! Facility category filters.
//!
//! A [`FacilityTags`] filter is a list of [`TagRule`]s; a facility matches
//! when any of its tags satisfies any rule.  The default filter selects
//! medical facilities:
//!
//! ```text
//! amenity = hospital | clinic | doctors
//! healthcare = *
//! ```

use serde::{Deserialize, Serialize};

/// One `key` (and optionally a set of accepted values) to match.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TagRule {
    pub key: String,
    /// Accepted values.  Empty means any value.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub values: Vec<String>,
}

impl TagRule {
    /// Match `key` with any value.
    pub fn any(key: impl Into<String>) -> Self {
        Self { key: key.into(), values: Vec::new() }
    }

    /// Match `key` with one of `values`.
    pub fn one_of<I, S>(key: impl Into<String>, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self { key: key.into(), values: values.into_iter().map(Into::into).collect() }
    }

    pub fn matches(&self, key: &str, value: &str) -> bool {
        self.key == key && (self.values.is_empty() || self.values.iter().any(|v| v == value))
    }
}

/// Facility category filter.  Serialized as a plain list of rules.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FacilityTags {
    rules: Vec<TagRule>,
}

impl FacilityTags {
    pub fn new(rules: Vec<TagRule>) -> Self {
        Self { rules }
    }

    /// Hospitals, clinics, doctors' practices, and anything tagged
    /// `healthcare=*`.
    pub fn medical() -> Self {
        Self::new(vec![
            TagRule::one_of("amenity", ["hospital", "clinic", "doctors"]),
            TagRule::any("healthcare"),
        ])
    }

    pub fn rules(&self) -> &[TagRule] {
        &self.rules
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// `true` if any tag satisfies any rule.  An empty filter matches
    /// everything.
    pub fn matches<K, V>(&self, tags: &[(K, V)]) -> bool
    where
        K: AsRef<str>,
        V: AsRef<str>,
    {
        self.rules.is_empty()
            || tags
                .iter()
                .any(|(k, v)| self.rules.iter().any(|r| r.matches(k.as_ref(), v.as_ref())))
    }
}

impl Default for FacilityTags {
    fn default() -> Self {
        Self::medical()
    }
}
