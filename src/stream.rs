//! The stream driver: turns a line-oriented `.graph` input into a sequence
//! of batch graphs and drives the batch iterator over each one.

use std::collections::HashMap;
use std::io::BufRead;

use log::{debug, trace};

use crate::batch::process_batch;
use crate::config::CompressorConfig;
use crate::dictionary::PatternDictionary;
use crate::error::{Error, Result};
use crate::graph::{Label, LabeledGraph, VertexId};

/// Drives one or more `.graph` inputs against a shared dictionary, id-to-
/// label map, and batch counter. Construction parameters mirror
/// [`CompressorConfig`]; this type holds the driver's running state (the
/// in-progress batch graph), but not the vertex-id-to-label map itself —
/// that map is owned by the caller ([`crate::compressor::Compressor`]) so
/// that it persists across several `process_reader` calls, per §3 ("The
/// vertex-id-to-label map persists for the whole process unless the
/// per-file flag is set").
pub struct StreamDriver<'a> {
    config: &'a CompressorConfig,
    dictionary: &'a mut PatternDictionary,
    vid_to_label: &'a mut HashMap<String, Label>,
    lines_read: u64,
}

impl<'a> StreamDriver<'a> {
    pub fn new(
        config: &'a CompressorConfig,
        dictionary: &'a mut PatternDictionary,
        vid_to_label: &'a mut HashMap<String, Label>,
    ) -> Self {
        Self {
            config,
            dictionary,
            vid_to_label,
            lines_read: 0,
        }
    }

    pub fn lines_read(&self) -> u64 {
        self.lines_read
    }

    /// Consumes `reader` line by line, accumulating a batch graph and
    /// firing [`process_batch`] every `batch_size` edges, plus once more
    /// at EOF for any leftover edges. Clears the id-to-label map afterwards
    /// if `label_history_per_file` is set.
    pub fn process_reader<R: BufRead>(&mut self, reader: R, source_name: &str) -> Result<()> {
        let mut batch = LabeledGraph::new(self.config.directed);
        let mut batch_vertices: HashMap<String, VertexId> = HashMap::new();
        let mut edge_count: u64 = 0;
        let mut line_no: usize = 0;

        for line in reader.lines() {
            let line = line?;
            line_no += 1;
            self.lines_read += 1;

            if self.lines_read % 1000 == 0 {
                debug!("read {} lines ({edge_count} edges) from {source_name}", self.lines_read);
            }

            let Some(parsed) = parse_line(&line, line_no)? else {
                continue;
            };

            match parsed {
                ParsedLine::Vertex { id, label } => {
                    trace!("vertex {id} -> label {label}");
                    self.vid_to_label.insert(id, label);
                }
                ParsedLine::Edge { src, dst, label } => {
                    trace!("edge {src} -> {dst} [{label}]");
                    self.add_edge(&mut batch, &mut batch_vertices, &src, &dst, label, line_no)?;
                    edge_count += 1;

                    if edge_count % self.config.batch_size as u64 == 0 {
                        process_batch(self.dictionary, &batch, self.config.match_strict);
                        batch = LabeledGraph::new(self.config.directed);
                        batch_vertices.clear();
                    }
                }
            }
        }

        if batch.edge_count() > 0 {
            process_batch(self.dictionary, &batch, self.config.match_strict);
        }

        debug!("read {} lines ({edge_count} edges) from {source_name}", self.lines_read);

        if self.config.label_history_per_file {
            self.vid_to_label.clear();
        }

        Ok(())
    }

    /// Resolves `src`/`dst` against the batch's local vertex set, adding
    /// either endpoint implicitly via `vid_to_label` when missing and
    /// `add_implicit_vertices` is enabled. Skips the edge if it is already
    /// present (duplicate suppression).
    fn add_edge(
        &mut self,
        batch: &mut LabeledGraph,
        batch_vertices: &mut HashMap<String, VertexId>,
        src: &str,
        dst: &str,
        label: Label,
        line_no: usize,
    ) -> Result<()> {
        let source = self.resolve_vertex(batch, batch_vertices, src, line_no)?;
        let target = self.resolve_vertex(batch, batch_vertices, dst, line_no)?;

        if !batch.are_connected(source, target) {
            batch.add_edge(source, target, label);
        }
        Ok(())
    }

    fn resolve_vertex(
        &mut self,
        batch: &mut LabeledGraph,
        batch_vertices: &mut HashMap<String, VertexId>,
        id: &str,
        line_no: usize,
    ) -> Result<VertexId> {
        if let Some(&v) = batch_vertices.get(id) {
            return Ok(v);
        }

        if !self.config.add_implicit_vertices {
            return Err(Error::Parse {
                line: line_no,
                message: format!("vertex '{id}' referenced before being declared in this batch"),
            });
        }

        let label = *self.vid_to_label.get(id).ok_or_else(|| Error::Parse {
            line: line_no,
            message: format!("vertex '{id}' has no known label"),
        })?;

        let v = batch.add_vertex(label);
        batch_vertices.insert(id.to_string(), v);
        Ok(v)
    }
}

enum ParsedLine {
    Vertex { id: String, label: Label },
    Edge { src: String, dst: String, label: Label },
}

/// Parses one `.graph` line. `d`/`u`/`e` are all folded into the same edge
/// path; they only exist so the file's author can document intent, and do
/// not change parsing behavior.
fn parse_line(line: &str, line_no: usize) -> Result<Option<ParsedLine>> {
    let trimmed = line.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }

    let fields: Vec<&str> = trimmed.split_whitespace().collect();
    match fields.first().copied() {
        // A comment only when the first whitespace-delimited token is
        // exactly "%"; a token merely starting with '%' (e.g. "%nospace")
        // is not a comment and falls through to the unrecognized-line error.
        Some("%") => Ok(None),
        Some("v") => {
            let [_, id, label] = require_fields(&fields, line_no)?;
            let label = parse_label(label, line_no)?;
            Ok(Some(ParsedLine::Vertex {
                id: id.to_string(),
                label,
            }))
        }
        Some("e") | Some("d") | Some("u") => {
            let fields = require_edge_fields(&fields, line_no)?;
            let label = parse_label(fields[3], line_no)?;
            Ok(Some(ParsedLine::Edge {
                src: fields[1].to_string(),
                dst: fields[2].to_string(),
                label,
            }))
        }
        _ => Err(Error::Parse {
            line: line_no,
            message: format!("unrecognized line: '{line}'"),
        }),
    }
}

fn require_fields<'a>(fields: &'a [&'a str], line_no: usize) -> Result<[&'a str; 3]> {
    if fields.len() != 3 {
        return Err(Error::Parse {
            line: line_no,
            message: format!("expected 'v <id> <label>', got {} fields", fields.len()),
        });
    }
    Ok([fields[0], fields[1], fields[2]])
}

fn require_edge_fields<'a>(fields: &'a [&'a str], line_no: usize) -> Result<&'a [&'a str]> {
    if fields.len() != 4 {
        return Err(Error::Parse {
            line: line_no,
            message: format!("expected '<e|d|u> <src> <dst> <label>', got {} fields", fields.len()),
        });
    }
    Ok(fields)
}

fn parse_label(field: &str, line_no: usize) -> Result<Label> {
    field.parse().map_err(|_| Error::Parse {
        line: line_no,
        message: format!("'{field}' is not a valid label"),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn driver_test(config: &CompressorConfig, input: &str) -> PatternDictionary {
        let mut dict = PatternDictionary::new(config.dict_size);
        let mut vid_to_label = HashMap::new();
        let mut driver = StreamDriver::new(config, &mut dict, &mut vid_to_label);
        driver
            .process_reader(Cursor::new(input.as_bytes()), "test")
            .unwrap();
        dict
    }

    #[test]
    fn single_triangle_is_covered_as_residue() {
        let config = CompressorConfig {
            batch_size: 3,
            ..CompressorConfig::default()
        };
        let input = "v 1 1\nv 2 1\nv 3 1\ne 1 2 9\ne 2 3 9\ne 1 3 9\n";
        let dict = driver_test(&config, input);
        assert_eq!(dict.len(), 1);
        assert_eq!(dict.entries()[0].count, 3);
    }

    #[test]
    fn comments_and_blank_lines_are_ignored() {
        let config = CompressorConfig {
            batch_size: 1,
            ..CompressorConfig::default()
        };
        let input = "% a comment\n\nv 1 1\nv 2 2\ne 1 2 7\n";
        let dict = driver_test(&config, input);
        assert_eq!(dict.len(), 1);
    }

    #[test]
    fn undeclared_vertex_is_hard_error_without_implicit_vertices() {
        let config = CompressorConfig {
            batch_size: 1,
            add_implicit_vertices: false,
            ..CompressorConfig::default()
        };
        let mut dict = PatternDictionary::new(config.dict_size);
        let mut vid_to_label = HashMap::new();
        let mut driver = StreamDriver::new(&config, &mut dict, &mut vid_to_label);
        let result = driver.process_reader(Cursor::new(b"e a b 7".as_slice()), "test");
        assert!(matches!(result, Err(Error::Parse { .. })));
    }

    #[test]
    fn implicit_vertex_uses_previously_seen_label() {
        let config = CompressorConfig {
            batch_size: 1,
            ..CompressorConfig::default()
        };
        // `a` and `b` are declared in an earlier batch (first edge),
        // then referenced again without a fresh `v` line.
        let input = "v a 1\nv b 2\ne a b 7\ne a b 8\n";
        let dict = driver_test(&config, input);
        assert_eq!(dict.len(), 2);
    }

    #[test]
    fn leftover_partial_batch_is_flushed_at_eof() {
        let config = CompressorConfig {
            batch_size: 10,
            ..CompressorConfig::default()
        };
        let input = "v 1 1\nv 2 1\ne 1 2 9\n";
        let dict = driver_test(&config, input);
        assert_eq!(dict.len(), 1);
    }

    #[test]
    fn vid_to_label_map_survives_across_files_by_default() {
        let config = CompressorConfig {
            batch_size: 1,
            ..CompressorConfig::default()
        };
        let mut dict = PatternDictionary::new(config.dict_size);
        let mut vid_to_label = HashMap::new();

        {
            let mut driver = StreamDriver::new(&config, &mut dict, &mut vid_to_label);
            driver
                .process_reader(Cursor::new(b"v a 1\nv b 2\n".as_slice()), "first")
                .unwrap();
        }

        // `a`/`b` are not redeclared in this second reader; this only
        // succeeds because vid_to_label carried over from the first call.
        let mut driver = StreamDriver::new(&config, &mut dict, &mut vid_to_label);
        driver
            .process_reader(Cursor::new(b"e a b 7\n".as_slice()), "second")
            .unwrap();
        assert_eq!(dict.len(), 1);
    }

    #[test]
    fn comment_requires_percent_as_its_own_token() {
        let config = CompressorConfig {
            batch_size: 1,
            ..CompressorConfig::default()
        };
        let result = driver_test_fallible(&config, "%nospace\n");
        assert!(matches!(result, Err(Error::Parse { .. })));
    }

    fn driver_test_fallible(config: &CompressorConfig, input: &str) -> Result<()> {
        let mut dict = PatternDictionary::new(config.dict_size);
        let mut vid_to_label = HashMap::new();
        let mut driver = StreamDriver::new(config, &mut dict, &mut vid_to_label);
        driver.process_reader(Cursor::new(input.as_bytes()), "test")
    }
}
