// Services module for the marketplace backend
// Business logic shared across handlers

pub mod jwt;

// Re-export commonly used services
pub use jwt::{JwtConfig, JwtError, JwtService};
