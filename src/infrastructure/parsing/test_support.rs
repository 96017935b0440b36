//! Shared fixtures for parsing unit tests

use crate::domain::{Record, Value};

pub fn record(pairs: &[(&str, Value)]) -> Record {
    pairs
        .iter()
        .map(|(key, value)| ((*key).to_string(), value.clone()))
        .collect()
}
