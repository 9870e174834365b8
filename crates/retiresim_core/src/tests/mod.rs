//! Integration tests for the retirement simulation kernel
//!
//! Tests are organized by topic:
//! - `invariants` - Cross-trial invariants that must hold for every valid config
//! - `boundaries` - Degenerate but valid configs (single trial, single year)
//! - `combined` - Accumulation-then-withdrawal handoff

mod combined;
