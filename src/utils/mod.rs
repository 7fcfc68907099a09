// Utility modules for the marketplace backend

pub mod api_error;
pub mod password;
pub mod validation;

pub use api_error::{ApiError, ApiErrorResponse};
pub use password::{
    hash_password_async, hash_password_with_config, needs_rehash, verify_password,
    verify_password_async, PasswordConfig, PasswordError,
};
pub use validation::{required_field, trim_optional_field, JsonBody, PathParam};
