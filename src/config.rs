//! Configuration management for the social network analyzer

/// How the loader treats malformed lines
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LoadPolicy {
    /// The first malformed line aborts the whole load
    #[default]
    Strict,

    /// Malformed lines are logged and skipped
    Lenient,
}

/// Default configuration for the social network analyzer
#[derive(Debug, Clone)]
pub struct Config {
    /// Minimum degree for a node to be highlighted
    pub min_degree: usize,

    /// Fraction of the maximum degree centrality a node needs to count as central
    pub centrality_ratio: f64,

    /// Loader behaviour on malformed input
    pub load_policy: LoadPolicy,

    /// Cell size of the spatial index built over layout positions
    pub layout_cell_size: f64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            min_degree: 50,
            centrality_ratio: 0.8,
            load_policy: LoadPolicy::Strict,
            layout_cell_size: 0.25,
        }
    }
}

impl Config {
    /// Create a new configuration with custom values
    pub fn new(
        min_degree: usize,
        centrality_ratio: f64,
        load_policy: LoadPolicy,
        layout_cell_size: f64,
    ) -> Self {
        Self {
            min_degree,
            centrality_ratio,
            load_policy,
            layout_cell_size,
        }
    }
}
