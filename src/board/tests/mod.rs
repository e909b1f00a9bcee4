//! Board module tests.
//!
//! Tests are organized into separate files by category:
//! - `perft.rs` - Move generator node counts at shallow depths
//! - `make_unmake.rs` - Make/undo correctness
//! - `edge_cases.rs` - Special positions and edge cases
//! - `eval.rs` - Evaluation anchors and symmetry
//! - `search.rs` - Fixed-depth search behaviour
//! - `proptest.rs` - Property-based tests

mod edge_cases;
mod perft;
mod proptest;
