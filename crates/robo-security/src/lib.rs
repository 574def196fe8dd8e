//! # Robo Security
//!
//! Bearer token issuing and verification.

pub mod jwt;

pub use jwt::{Claims, JwtError, JwtService};
