//! Frame-driven simulation.
//!
//! Layout:
//! - `context.rs`: `SimulationContext` ownership, construction, spawning and visual attachment
//! - `step.rs`:    the per-frame entry point and the fixed substep pipeline
//! - `throwing.rs`: charged throws, pool balls and shop purchases
//! - `pending.rs`: spawns and removals deferred to the end of a substep
//!
//! This `mod.rs` only wires modules and re-exports the public entrypoints.

mod context;
mod pending;
mod step;
mod throwing;

pub use context::SimulationContext;
