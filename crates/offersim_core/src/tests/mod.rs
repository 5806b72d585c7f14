//! Integration tests for the offer simulation engine
//!
//! Tests are organized by topic:
//! - `replicates` - Single-path simulation mechanics
//! - `aggregation` - Monte Carlo aggregation and reproducibility
//! - `ladder` - Offer tier ladder generation
//! - `gradients` - Sensitivity analysis
//! - `searching` - Tiered offer search

mod aggregation;
mod gradients;
mod replicates;
