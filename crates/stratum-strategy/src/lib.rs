//! Strategy persistence for the Stratum placement runtime
//!
//! Maps operator names to [`stratum_types::ParallelConfig`] placements and
//! round-trips the mapping through the line-oriented strategy file format.
//! Loads are atomic (no partial store on failure) and saves are canonical
//! (byte-identical for an unchanged store).

pub mod file;
pub mod store;

pub use file::{load, save, serialize};
pub use store::StrategyStore;
