//! Access guard
//!
//! Requirements are declared per route when it is registered and checked
//! against the resolved identity before the handler runs.

mod evaluator;
mod requirements;


pub use evaluator::{AccessEvaluator, AccessGuard};
pub use requirements::AccessRequirement;

#[cfg(test)]
pub use evaluator::MockAccessEvaluator;
