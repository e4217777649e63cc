//! Error handling for the service
//!
//! One error type flows from the store up to the HTTP boundary, where it is
//! rendered as an [`ErrorEnvelope`].

#![allow(missing_docs)]

mod conversions;
mod helpers;
mod response;
mod types;

pub use response::ErrorEnvelope;
pub use types::{GatekeeperError, Result};
