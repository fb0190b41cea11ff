//! Producer/consumer pipeline
//!
//! The [`Pipeline`] starts the crawl frontier and the [`WorkerPool`]
//! together, connected by a one-slot channel, and waits for both to finish.

mod orchestrator;
mod workers;

#[cfg(test)]
pub(crate) mod testing;

pub use orchestrator::{Pipeline, RunReport};
pub use workers::WorkerPool;
