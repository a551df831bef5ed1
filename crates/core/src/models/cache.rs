use std::collections::HashMap;

use super::forecast::ForecastResponse;

/// Identifies one forecast request: which part, and whether variant parts
/// are folded in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct QueryKey {
    pub part: u64,
    pub include_variants: bool,
}

impl QueryKey {
    pub fn new(part: u64, include_variants: bool) -> Self {
        Self { part, include_variants }
    }
}

impl std::fmt::Display for QueryKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "part={} include_variants={}", self.part, self.include_variants)
    }
}

/// Last successful response per query key.
///
/// Lets the panel redraw immediately when the variant toggle flips back to
/// a previously fetched setting. Failed fetches are never cached.
#[derive(Debug, Clone, Default)]
pub struct ForecastCache {
    entries: HashMap<QueryKey, ForecastResponse>,
}

impl ForecastCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &QueryKey) -> Option<&ForecastResponse> {
        self.entries.get(key)
    }

    /// Insert or replace the response stored for `key`.
    pub fn insert(&mut self, key: QueryKey, response: ForecastResponse) {
        self.entries.insert(key, response);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}
