//! JWT token handling
//!
//! HS256 access and refresh tokens signed with the deployment's shared secret.

pub(crate) mod handler;
pub mod types;


pub use handler::INVALID_TOKEN;
pub use types::{Claims, JwtHandler, TokenPair, TokenType};
