//! Weighted multi-dimension scoring

pub mod composite;

pub use composite::{CompositeScorer, TeamScore};
