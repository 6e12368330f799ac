//! Cross-crate scenario and property tests for Vestry.
//!
//! Scenarios drive grants, liquidation, redemption and clawback through the
//! keepers with in-memory stores and ledgers. Run with `RUST_LOG=debug` to see
//! the protocol logs.

pub mod helpers;
