// Authenticated request context and role checks

use crate::models::auth::TokenClaims;
use crate::utils::ApiError;

/// Identity attached to a request by the auth gate.
///
/// Only the gate can build one, and only from claims that passed signature and
/// expiry verification. Lives in the request extensions for a single request.
#[derive(Debug, Clone)]
pub struct AuthenticatedUser {
    claims: TokenClaims,
}

impl AuthenticatedUser {
    pub(crate) fn from_verified(claims: TokenClaims) -> Self {
        Self { claims }
    }

    pub fn claims(&self) -> &TokenClaims {
        &self.claims
    }

    pub fn user_id(&self) -> uuid::Uuid {
        self.claims.id
    }

    pub fn email(&self) -> &str {
        &self.claims.email
    }

    pub fn is_admin(&self) -> bool {
        self.claims.is_admin
    }

    pub fn is_employee(&self) -> bool {
        self.claims.is_employee
    }

    /// Admins and employees handle quotes and see every task board
    pub fn is_staff(&self) -> bool {
        self.claims.is_admin || self.claims.is_employee
    }
}

/// Allow only admins. Call before touching the store.
pub fn require_admin(user: &AuthenticatedUser) -> Result<(), ApiError> {
    if user.is_admin() {
        Ok(())
    } else {
        tracing::warn!(user_id = %user.user_id(), "Admin privileges required");
        Err(ApiError::Forbidden)
    }
}

/// Allow admins and employees
pub fn require_staff(user: &AuthenticatedUser) -> Result<(), ApiError> {
    if user.is_staff() {
        Ok(())
    } else {
        tracing::warn!(user_id = %user.user_id(), "Staff privileges required");
        Err(ApiError::Forbidden)
    }
}
