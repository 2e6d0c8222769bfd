//! Live parameter store and measurement publication.

use std::collections::HashMap;

use retrotrack_core::ColorRange;
use serde::{Deserialize, Serialize};

use crate::config::ColorRangeKeys;

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    #[error("parameter store unavailable: {reason}")]
    Unavailable { reason: String },
}

/// Read side of the live key-value table.
pub trait ParameterStore {
    /// `Ok(None)` when the key is not set.
    fn number(&self, key: &str) -> Result<Option<f64>, StoreError>;
}

/// Write side of the live key-value table.
pub trait MeasurementSink {
    fn put_number(&mut self, key: &str, value: f64);
    fn put_number_array(&mut self, key: &str, values: &[f64]);
    fn put_bool(&mut self, key: &str, value: bool);
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum StoreValue {
    Bool(bool),
    Number(f64),
    Numbers(Vec<f64>),
}

/// In-process table usable as both store and sink.
#[derive(Clone, Debug)]
pub struct MemoryStore {
    values: HashMap<String, StoreValue>,
    available: bool,
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self {
            values: HashMap::new(),
            available: true,
        }
    }
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_numbers<'a>(entries: impl IntoIterator<Item = (&'a str, f64)>) -> Self {
        let mut store = Self::new();
        for (k, v) in entries {
            store.set_number(k, v);
        }
        store
    }

    pub fn set_number(&mut self, key: &str, value: f64) {
        self.values.insert(key.to_owned(), StoreValue::Number(value));
    }

    pub fn remove(&mut self, key: &str) -> Option<StoreValue> {
        self.values.remove(key)
    }

    /// Make reads fail as if the table could not be reached.
    pub fn set_available(&mut self, available: bool) {
        self.available = available;
    }

    pub fn get(&self, key: &str) -> Option<&StoreValue> {
        self.values.get(key)
    }

    pub fn get_number(&self, key: &str) -> Option<f64> {
        match self.values.get(key) {
            Some(StoreValue::Number(v)) => Some(*v),
            _ => None,
        }
    }

    pub fn get_numbers(&self, key: &str) -> Option<&[f64]> {
        match self.values.get(key) {
            Some(StoreValue::Numbers(v)) => Some(v),
            _ => None,
        }
    }

    pub fn get_bool(&self, key: &str) -> Option<bool> {
        match self.values.get(key) {
            Some(StoreValue::Bool(v)) => Some(*v),
            _ => None,
        }
    }
}

impl ParameterStore for MemoryStore {
    fn number(&self, key: &str) -> Result<Option<f64>, StoreError> {
        if !self.available {
            return Err(StoreError::Unavailable {
                reason: "memory store marked offline".into(),
            });
        }
        Ok(match self.values.get(key) {
            Some(StoreValue::Number(v)) => Some(*v),
            Some(StoreValue::Bool(b)) => Some(if *b { 1.0 } else { 0.0 }),
            _ => None,
        })
    }
}

impl MeasurementSink for MemoryStore {
    fn put_number(&mut self, key: &str, value: f64) {
        self.set_number(key, value);
    }

    fn put_number_array(&mut self, key: &str, values: &[f64]) {
        self.values
            .insert(key.to_owned(), StoreValue::Numbers(values.to_vec()));
    }

    fn put_bool(&mut self, key: &str, value: bool) {
        self.values.insert(key.to_owned(), StoreValue::Bool(value));
    }
}

/// Where the color range of a frame came from.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RangeSource {
    /// All six bounds were read from the store.
    Store,
    /// Some keys were missing and took their default.
    Partial { missing: Vec<String> },
    /// The store was unreachable; every bound is the default.
    Defaults,
}

#[derive(Clone, Debug, PartialEq)]
pub struct ResolvedColorRange {
    pub range: ColorRange,
    pub source: RangeSource,
}

/// Read the six channel bounds, falling back per key to `defaults`.
///
/// Stored values are rounded and clamped into `0..=255`.
pub fn resolve_color_range<S: ParameterStore + ?Sized>(
    store: &S,
    keys: &ColorRangeKeys,
    defaults: &ColorRange,
) -> ResolvedColorRange {
    let slots: [(&str, u8); 6] = [
        (&keys.hue_lower, defaults.lower[0]),
        (&keys.sat_lower, defaults.lower[1]),
        (&keys.val_lower, defaults.lower[2]),
        (&keys.hue_upper, defaults.upper[0]),
        (&keys.sat_upper, defaults.upper[1]),
        (&keys.val_upper, defaults.upper[2]),
    ];

    let mut values = [0u8; 6];
    let mut missing = Vec::new();
    for (i, (key, fallback)) in slots.iter().enumerate() {
        match store.number(key) {
            Ok(Some(v)) if v.is_finite() => values[i] = v.round().clamp(0.0, 255.0) as u8,
            Ok(_) => {
                missing.push((*key).to_owned());
                values[i] = *fallback;
            }
            Err(err) => {
                log::warn!("{err}; using default color range");
                return ResolvedColorRange {
                    range: *defaults,
                    source: RangeSource::Defaults,
                };
            }
        }
    }

    let source = if missing.is_empty() {
        RangeSource::Store
    } else {
        log::debug!("color range keys missing from store: {missing:?}");
        RangeSource::Partial { missing }
    };
    ResolvedColorRange {
        range: ColorRange::new(
            [values[0], values[1], values[2]],
            [values[3], values[4], values[5]],
        ),
        source,
    }
}
