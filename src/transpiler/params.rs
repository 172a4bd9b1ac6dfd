//! Bound parameters and the per-compile accumulator.

use std::collections::{HashMap, HashSet};

use serde::Serialize;
use serde::ser::SerializeMap;

use crate::ast::{BindParam, Value};
use crate::error::{ClauseError, ClauseResult};

/// Placeholder keys to values, in the order they were first bound.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Params(Vec<(String, Value)>);

impl Params {
    pub fn new() -> Self {
        Self(Vec::new())
    }

    /// Set `key`, keeping its original position when already present.
    pub fn insert(&mut self, key: impl Into<String>, value: Value) {
        let key = key.into();
        match self.0.iter_mut().find(|(k, _)| *k == key) {
            Some(slot) => slot.1 = value,
            None => self.0.push((key, value)),
        }
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(|(k, _)| k.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn into_vec(self) -> Vec<(String, Value)> {
        self.0
    }
}

impl Serialize for Params {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (k, v) in &self.0 {
            map.serialize_entry(k, v)?;
        }
        map.end()
    }
}

impl<K: Into<String>> FromIterator<(K, Value)> for Params {
    fn from_iter<I: IntoIterator<Item = (K, Value)>>(iter: I) -> Self {
        let mut params = Params::new();
        for (k, v) in iter {
            params.insert(k, v);
        }
        params
    }
}

/// State private to one compile pass: a counter per bind key, every
/// placeholder name handed out so far, and the parameters collected.
#[derive(Debug, Default)]
pub struct BindContext {
    counters: HashMap<String, usize>,
    taken: HashSet<String>,
    params: Params,
}

impl BindContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Assign the next placeholder for `param` and record its value.
    ///
    /// The first use of a key yields `key_1`, the next `key_2`, and so on.
    /// Numbers already taken in this pass (for instance by a column named
    /// `key_1`) are skipped. Returns the placeholder as it appears in SQL
    /// (`:key_n`).
    pub fn bind(&mut self, param: &BindParam) -> String {
        let counter = self.counters.entry(param.key.clone()).or_insert(0);
        let key = loop {
            *counter += 1;
            let key = format!("{}_{}", param.key, counter);
            if !self.taken.contains(&key) {
                break key;
            }
        };
        self.taken.insert(key.clone());
        self.params.insert(key.clone(), param.value.clone());
        format!(":{}", key)
    }

    /// Record a value bound to a fixed `:name` placeholder (INSERT/UPDATE values).
    ///
    /// Fails if `name` was already bound in this pass.
    pub fn record(&mut self, name: &str, value: &Value) -> ClauseResult<String> {
        let placeholder = self.reserve(name)?;
        self.params.insert(name, value.clone());
        Ok(placeholder)
    }

    /// Claim a fixed `:name` placeholder whose value is supplied at execution
    /// time (INSERT/UPDATE without explicit values).
    pub fn reserve(&mut self, name: &str) -> ClauseResult<String> {
        if !self.taken.insert(name.to_string()) {
            return Err(ClauseError::DuplicateParameter(name.to_string()));
        }
        Ok(format!(":{}", name))
    }

    pub fn params(&self) -> &Params {
        &self.params
    }

    pub fn into_params(self) -> Params {
        self.params
    }
}
