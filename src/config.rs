use crate::error::{Error, Result};

/// Construction-time parameters accepted by the core.
#[derive(Debug, Clone)]
pub struct CompressorConfig {
    /// α: number of edges accumulated before a batch fires.
    pub batch_size: usize,
    /// θ: dictionary size bound. `None` means +∞.
    pub dict_size: Option<usize>,
    /// Whether batch graphs (and therefore patterns) are directed.
    pub directed: bool,
    /// When `false`, subgraph matching ignores labels entirely (diagnostic
    /// mode).
    pub match_strict: bool,
    /// When `true`, an edge referencing an unseen vertex implicitly adds it
    /// using the id-to-label map rather than erroring.
    pub add_implicit_vertices: bool,
    /// When `true`, the id-to-label map is cleared at the end of each file
    /// instead of persisting across the whole process.
    pub label_history_per_file: bool,
}

impl Default for CompressorConfig {
    fn default() -> Self {
        Self {
            batch_size: 10,
            dict_size: None,
            directed: false,
            match_strict: true,
            add_implicit_vertices: true,
            label_history_per_file: false,
        }
    }
}

impl CompressorConfig {
    /// Rejects non-positive `batch_size`/`dict_size`.
    pub fn validate(&self) -> Result<()> {
        if self.batch_size == 0 {
            return Err(Error::Config("batch_size must be positive".into()));
        }
        if self.dict_size == Some(0) {
            return Err(Error::Config("dict_size must be positive".into()));
        }
        Ok(())
    }
}
