//! Labeled (sub)graph isomorphism: a VF2-style state-space search with
//! vertex- and edge-color (label) pruning. Patterns are concrete labeled
//! graphs, so matching collapses to plain label equality rather than
//! predicate evaluation.

mod vf2;

pub use vf2::{enumerate_subisomorphisms, enumerate_subisomorphisms_loose, is_isomorphic};
