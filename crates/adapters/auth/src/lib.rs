//! # eventhub-adapter-auth
//!
//! Implements the authentication ports of `eventhub-app`.
//!
//! - [`Argon2PasswordHasher`] stores passwords as PHC strings
//!   (`$argon2id$v=19$...`) with a random salt per hash.
//! - [`JwtTokenIssuer`] signs HS256 tokens whose subject is the user id.

pub mod password;
pub mod token;

pub use password::Argon2PasswordHasher;
pub use token::{DEFAULT_TOKEN_TTL, JwtTokenIssuer};
