// Token claim set carried by every bearer token

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::user::User;

/// Claims signed into an access token.
/// Field names on the wire are the ones clients already consume.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TokenClaims {
    /// Account ID
    pub id: Uuid,

    pub email: String,

    /// Family name
    #[serde(rename = "nom")]
    pub last_name: String,

    /// Given name
    #[serde(rename = "prenom")]
    pub first_name: String,

    #[serde(rename = "isAdmin")]
    pub is_admin: bool,

    #[serde(rename = "isEmployee")]
    pub is_employee: bool,

    /// Issued at timestamp (Unix epoch seconds)
    pub iat: u64,

    /// Expires at timestamp (Unix epoch seconds)
    pub exp: u64,
}

/// Identity fields an access token is minted from
#[derive(Debug, Clone, PartialEq)]
pub struct TokenSubject {
    pub id: Uuid,
    pub email: String,
    pub last_name: String,
    pub first_name: String,
    pub is_admin: bool,
    pub is_employee: bool,
}

impl From<&User> for TokenSubject {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            email: user.email.clone(),
            last_name: user.last_name.clone(),
            first_name: user.first_name.clone(),
            is_admin: user.is_admin,
            is_employee: user.is_employee,
        }
    }
}

impl TokenClaims {
    pub fn new(subject: TokenSubject, issued_at: u64, expires_at: u64) -> Self {
        Self {
            id: subject.id,
            email: subject.email,
            last_name: subject.last_name,
            first_name: subject.first_name,
            is_admin: subject.is_admin,
            is_employee: subject.is_employee,
            iat: issued_at,
            exp: expires_at,
        }
    }

    /// Check if the token is expired at `now` (expiry is exclusive)
    pub fn is_expired_at(&self, now: u64) -> bool {
        now >= self.exp
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn subject() -> TokenSubject {
        TokenSubject {
            id: Uuid::new_v4(),
            email: "a@b.com".to_string(),
            last_name: "X".to_string(),
            first_name: "Y".to_string(),
            is_admin: false,
            is_employee: true,
        }
    }

    #[test]
    fn test_wire_field_names() {
        let claims = TokenClaims::new(subject(), 100, 200);
        let json = serde_json::to_value(&claims).unwrap();

        assert_eq!(json["email"], "a@b.com");
        assert_eq!(json["nom"], "X");
        assert_eq!(json["prenom"], "Y");
        assert_eq!(json["isAdmin"], false);
        assert_eq!(json["isEmployee"], true);
        assert_eq!(json["iat"], 100);
        assert_eq!(json["exp"], 200);
    }

    #[test]
    fn test_expiry_boundary() {
        let claims = TokenClaims::new(subject(), 100, 200);
        assert!(!claims.is_expired_at(199));
        assert!(claims.is_expired_at(200));
        assert!(claims.is_expired_at(201));
    }
}
