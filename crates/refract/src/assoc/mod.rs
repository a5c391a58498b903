//! Cross-column association (correlation) engine.

mod engine;
pub mod methods;

pub use engine::{AssociationConfig, AssociationEngine};
