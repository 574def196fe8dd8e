//! # Robo Core
//! 
//! Domain entities, the sub-group assignment engine, attendance statistics,
//! repository traits, and domain services for the robotics club backend.

pub mod domain;
pub mod engine;
pub mod services;
pub mod repositories;
pub mod error;

// Re-export domain entities
pub use domain::*;
pub use error::DomainError;
