//! Helpers shared by the integration tests

use table_harvest::{Record, Value};

/// Record built from `(key, value)` pairs in order
pub fn record(pairs: &[(&str, Value)]) -> Record {
    pairs
        .iter()
        .map(|(key, value)| ((*key).to_string(), value.clone()))
        .collect()
}
