//! Search configuration.

/// Look-ahead depth used when none is configured.
pub const DEFAULT_DEPTH: u32 = 3;

/// Knobs for the minimax search.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchConfig {
    /// How many plies to look ahead. Must be at least 1.
    pub depth: u32,
}

impl Default for SearchConfig {
    fn default() -> Self {
        SearchConfig {
            depth: DEFAULT_DEPTH,
        }
    }
}

impl SearchConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the look-ahead depth.
    ///
    /// Panics if `depth` is zero; a search must examine at least one move.
    pub fn with_depth(mut self, depth: u32) -> Self {
        assert!(depth >= 1, "search depth must be at least 1");
        self.depth = depth;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = SearchConfig::default();
        assert_eq!(config.depth, DEFAULT_DEPTH);
        assert_eq!(SearchConfig::new(), config);
    }

    #[test]
    fn test_with_depth() {
        let config = SearchConfig::new().with_depth(5);
        assert_eq!(config.depth, 5);
    }

    #[test]
    #[should_panic]
    fn test_zero_depth_rejected() {
        SearchConfig::new().with_depth(0);
    }
}
