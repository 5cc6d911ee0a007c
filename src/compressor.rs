//! The compressor facade: wires a [`CompressorConfig`], a
//! [`PatternDictionary`] and a [`StreamDriver`] together behind a single
//! entry point, and owns the counters that make up the persisted-state
//! tuple (`compress_count`, `lines_read`, `dict_trimmed`).

use std::collections::HashMap;
use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::Path;

use log::info;
use serde::{Deserialize, Serialize};

use crate::config::CompressorConfig;
use crate::dictionary::{PatternDictionary, PatternEntry};
use crate::error::Result;
use crate::graph::{Label, LabeledGraph};
use crate::stream::StreamDriver;

/// Owns the pattern dictionary and running counters across one or more
/// input files. The vertex-id-to-label map persists for the whole process
/// unless the per-file flag is set, in which case [`StreamDriver`] clears
/// it at the end of each `compress_reader`/`compress_file` call.
pub struct Compressor {
    config: CompressorConfig,
    dictionary: PatternDictionary,
    vid_to_label: HashMap<String, Label>,
    compress_count: u64,
    lines_read: u64,
}

impl Compressor {
    /// Validates `config`, rejecting invalid construction parameters,
    /// before constructing.
    pub fn new(config: CompressorConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            dictionary: PatternDictionary::new(config.dict_size),
            config,
            vid_to_label: HashMap::new(),
            compress_count: 0,
            lines_read: 0,
        })
    }

    pub fn dictionary(&self) -> &PatternDictionary {
        &self.dictionary
    }

    pub fn config(&self) -> &CompressorConfig {
        &self.config
    }

    pub fn lines_read(&self) -> u64 {
        self.lines_read
    }

    pub fn dict_trimmed(&self) -> usize {
        self.dictionary.trim_count()
    }

    /// Compresses a single open reader. `source_name` is only used for
    /// logging.
    pub fn compress_reader<R: std::io::BufRead>(&mut self, reader: R, source_name: &str) -> Result<()> {
        let mut driver = StreamDriver::new(&self.config, &mut self.dictionary, &mut self.vid_to_label);
        driver.process_reader(reader, source_name)?;
        self.lines_read += driver.lines_read();
        self.compress_count += 1;
        info!(
            "compressed {source_name}: {} lines total, dictionary has {} entries ({} trims so far)",
            self.lines_read,
            self.dictionary.len(),
            self.dictionary.trim_count()
        );
        Ok(())
    }

    /// Opens and compresses `path`. I/O errors are reported with the
    /// filename attached.
    pub fn compress_file(&mut self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let file = File::open(path)?;
        self.compress_reader(BufReader::new(file), &path.display().to_string())
    }

    /// Writes the persisted-state tuple
    /// (`compress_count`, `lines_read`, `dict_trimmed`, `pattern_entries`)
    /// as JSON.
    pub fn save_state(&self, path: impl AsRef<Path>) -> Result<()> {
        let state = PersistedState::from_compressor(self);
        let file = File::create(path)?;
        serde_json::to_writer(BufWriter::new(file), &state)?;
        Ok(())
    }

    /// Restores a compressor from a previously saved state. `config` is
    /// supplied fresh rather than persisted, since dictionary entries
    /// alone do not fix batch size or matching mode; the caller is
    /// expected to pass the same configuration used when the state was
    /// saved, so that the restored compressor behaves indistinguishably
    /// from the original.
    pub fn load_state(config: CompressorConfig, path: impl AsRef<Path>) -> Result<Self> {
        config.validate()?;
        let file = File::open(path)?;
        let state: PersistedState = serde_json::from_reader(BufReader::new(file))?;

        let mut dictionary = PatternDictionary::new(config.dict_size);
        for (graph, count) in state.pattern_entries {
            dictionary.restore_entry(graph, count);
        }

        Ok(Self {
            config,
            dictionary,
            vid_to_label: HashMap::new(),
            compress_count: state.compress_count,
            lines_read: state.lines_read,
        })
    }
}

#[derive(Serialize, Deserialize)]
struct PersistedState {
    compress_count: u64,
    lines_read: u64,
    dict_trimmed: usize,
    pattern_entries: Vec<(LabeledGraph, usize)>,
}

impl PersistedState {
    fn from_compressor(compressor: &Compressor) -> Self {
        Self {
            compress_count: compressor.compress_count,
            lines_read: compressor.lines_read,
            dict_trimmed: compressor.dictionary.trim_count(),
            pattern_entries: compressor
                .dictionary
                .entries()
                .iter()
                .map(|e: &PatternEntry| (e.graph.clone(), e.count))
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;
    use test_dir::{DirBuilder, TestDir};

    #[test]
    fn compresses_a_single_file_reader() {
        let mut compressor = Compressor::new(CompressorConfig {
            batch_size: 3,
            ..CompressorConfig::default()
        })
        .unwrap();

        let input = "v 1 1\nv 2 1\nv 3 1\ne 1 2 9\ne 2 3 9\ne 1 3 9\n";
        compressor
            .compress_reader(Cursor::new(input.as_bytes()), "mem")
            .unwrap();

        assert_eq!(compressor.dictionary().len(), 1);
        assert_eq!(compressor.lines_read(), 6);
    }

    #[test]
    fn rejects_invalid_configuration() {
        let result = Compressor::new(CompressorConfig {
            batch_size: 0,
            ..CompressorConfig::default()
        });
        assert!(result.is_err());
    }

    #[test]
    fn state_round_trips_through_disk() {
        let dir = TestDir::temp();
        let state_path = dir.path("state.json");

        let mut compressor = Compressor::new(CompressorConfig {
            batch_size: 1,
            ..CompressorConfig::default()
        })
        .unwrap();
        compressor
            .compress_reader(Cursor::new(b"v a 1\nv b 2\ne a b 7\n".as_slice()), "mem")
            .unwrap();
        compressor.save_state(&state_path).unwrap();

        let restored = Compressor::load_state(
            CompressorConfig {
                batch_size: 1,
                ..CompressorConfig::default()
            },
            &state_path,
        )
        .unwrap();

        assert_eq!(restored.lines_read(), compressor.lines_read());
        assert_eq!(restored.dictionary().len(), compressor.dictionary().len());
        assert_eq!(
            restored.dictionary().entries()[0].count,
            compressor.dictionary().entries()[0].count
        );
    }

    /// §3/§4.5: with `label_history_per_file` left at its default `false`,
    /// the vertex-id-to-label map must survive across separate
    /// `compress_reader` calls, the way `examples/original_source/graphzip.py`
    /// relies on when it calls `model.compress_file` once per input file.
    #[test]
    fn vid_to_label_persists_across_files_by_default() {
        let mut compressor = Compressor::new(CompressorConfig {
            batch_size: 1,
            ..CompressorConfig::default()
        })
        .unwrap();

        compressor
            .compress_reader(Cursor::new(b"v a 1\nv b 2\n".as_slice()), "first.graph")
            .unwrap();
        // `a`/`b` are not redeclared here; this only succeeds because the
        // id-to-label map carried over from the previous file.
        compressor
            .compress_reader(Cursor::new(b"e a b 7\n".as_slice()), "second.graph")
            .unwrap();

        assert_eq!(compressor.dictionary().len(), 1);
    }

    #[test]
    fn vid_to_label_is_cleared_per_file_when_configured() {
        let mut compressor = Compressor::new(CompressorConfig {
            batch_size: 1,
            label_history_per_file: true,
            ..CompressorConfig::default()
        })
        .unwrap();

        compressor
            .compress_reader(Cursor::new(b"v a 1\nv b 2\n".as_slice()), "first.graph")
            .unwrap();
        let result = compressor.compress_reader(Cursor::new(b"e a b 7\n".as_slice()), "second.graph");
        assert!(matches!(result, Err(crate::error::Error::Parse { .. })));
    }
}
