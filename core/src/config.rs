use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::table::HashTable;

pub const DEFAULT_VOCABULARY_CAPACITY: usize = 32768;
pub const DEFAULT_DOCUMENT_CAPACITY: usize = 32;

/// Table sizing for a corpus build.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Buckets of the vocabulary table.
    pub vocabulary_capacity: usize,
    /// Buckets of each document and query vector.
    pub document_capacity: usize,
    /// Rehash threshold; `None` keeps every table at its initial capacity.
    pub max_load_factor: Option<f32>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            vocabulary_capacity: DEFAULT_VOCABULARY_CAPACITY,
            document_capacity: DEFAULT_DOCUMENT_CAPACITY,
            max_load_factor: None,
        }
    }
}

impl EngineConfig {
    pub fn validate(&self) -> Result<()> {
        if self.vocabulary_capacity == 0 {
            return Err(Error::InvalidCapacity(self.vocabulary_capacity));
        }
        if self.document_capacity == 0 {
            return Err(Error::InvalidCapacity(self.document_capacity));
        }
        if let Some(f) = self.max_load_factor {
            if !f.is_finite() || f <= 0.0 {
                return Err(Error::InvalidLoadFactor(f));
            }
        }
        Ok(())
    }

    pub fn vocabulary_table(&self) -> Result<HashTable> {
        self.table(self.vocabulary_capacity)
    }

    pub fn document_table(&self) -> Result<HashTable> {
        self.table(self.document_capacity)
    }

    fn table(&self, capacity: usize) -> Result<HashTable> {
        match self.max_load_factor {
            Some(f) => HashTable::with_max_load_factor(capacity, f),
            None => HashTable::new(capacity),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_json_fills_defaults() {
        let cfg: EngineConfig = serde_json::from_str(r#"{"document_capacity": 8}"#).unwrap();
        assert_eq!(cfg.document_capacity, 8);
        assert_eq!(cfg.vocabulary_capacity, DEFAULT_VOCABULARY_CAPACITY);
        assert_eq!(cfg.max_load_factor, None);
        cfg.validate().unwrap();
    }

    #[test]
    fn rejects_bad_values() {
        let cfg = EngineConfig { document_capacity: 0, ..Default::default() };
        assert!(matches!(cfg.validate(), Err(Error::InvalidCapacity(0))));
        let cfg = EngineConfig { max_load_factor: Some(-1.0), ..Default::default() };
        assert!(matches!(cfg.validate(), Err(Error::InvalidLoadFactor(_))));
    }

    #[test]
    fn tables_follow_policy() {
        let cfg = EngineConfig { document_capacity: 1, max_load_factor: Some(2.0), ..Default::default() };
        let mut t = cfg.document_table().unwrap();
        for i in 0..8 {
            t.insert(&i.to_string(), i, 0.0).unwrap();
        }
        assert!(t.capacity() > 1);

        let fixed = EngineConfig::default().vocabulary_table().unwrap();
        assert_eq!(fixed.capacity(), DEFAULT_VOCABULARY_CAPACITY);
    }
}
