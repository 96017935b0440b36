//! Post-extraction validation of records

use tracing::warn;

use super::Validator;
use crate::domain::{Record, TableData, Value};
use crate::infrastructure::parsing_error::{ParsingError, ParsingResult};

/// Every record must carry each listed key with a non-null value
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequiredKeys {
    keys: Vec<String>,
}

impl RequiredKeys {
    #[must_use]
    pub fn new<I, S>(keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            keys: keys.into_iter().map(Into::into).collect(),
        }
    }

    #[must_use]
    pub fn keys(&self) -> &[String] {
        &self.keys
    }

    fn check(&self, record: &Record, row: usize) -> ParsingResult<()> {
        for key in &self.keys {
            match record.get(key) {
                None | Some(Value::Null) => {
                    warn!("Row {} is missing required key '{}'", row, key);
                    return Err(ParsingError::required_field_missing(key, row));
                }
                Some(_) => {}
            }
        }
        Ok(())
    }
}

impl Validator<Record> for RequiredKeys {
    fn validate(&self, data: &Record) -> ParsingResult<()> {
        self.check(data, 0)
    }
}

impl Validator<[Record]> for RequiredKeys {
    fn validate(&self, data: &[Record]) -> ParsingResult<()> {
        data.iter()
            .enumerate()
            .try_for_each(|(row, record)| self.check(record, row))
    }
}

impl Validator<TableData> for RequiredKeys {
    fn validate(&self, data: &TableData) -> ParsingResult<()> {
        self.validate(data.data.as_slice())
    }
}
