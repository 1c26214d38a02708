//! Collection configuration

use serde::{Deserialize, Serialize};

/// Configuration applied when a collection is created.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CollectionConfig {
    /// Fixed dimensionality. When `None` the first insert into an empty
    /// collection decides it, and it is released once the collection empties.
    #[serde(default)]
    pub dimension: Option<usize>,
}

impl CollectionConfig {
    /// Unconstrained configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Pin the collection to `dimension` for its whole lifetime.
    pub fn with_dimension(dimension: usize) -> Self {
        Self {
            dimension: Some(dimension),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_unconstrained() {
        assert_eq!(CollectionConfig::default().dimension, None);
        assert_eq!(CollectionConfig::with_dimension(3).dimension, Some(3));
    }

    #[test]
    fn test_deserialize_missing_dimension() {
        let config: CollectionConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config, CollectionConfig::new());
    }
}
