//! Top-level module for the word-pair Markov chain.
//!
//! This module provides:
//! - The chain itself (`ChainStore`) and its states (`StateKey`,
//!   `SuccessorDistribution`)
//! - Ingestion of token sequences (`Builder`)
//! - Weighted random generation (`Generator`) and its settings
//!   (`GenerationInput`)

/// Weighted random walk producing text from a chain.
pub mod generator;

/// Settings of one generation call and the dead end policy.
pub mod generation_input;

/// Sliding window ingestion of tokens into a chain.
pub mod builder;

/// Transition and start tables, with merging and clearing.
pub mod chain_store;

/// Two-word states and their successor distributions.
///
/// Also hosts the weighted sampling shared by starts and successors.
pub mod state;

pub use builder::{Builder, IngestStats};
pub use chain_store::ChainStore;
pub use generation_input::{DeadEndPolicy, GenerationInput};
pub use generator::Generator;
pub use state::{StateKey, SuccessorDistribution};
