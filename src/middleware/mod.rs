// Request middleware: authentication gate and role checks

pub mod auth;
pub mod auth_middleware;

pub use auth::{require_admin, require_staff, AuthenticatedUser};
pub use auth_middleware::auth_middleware;
