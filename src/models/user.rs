// User (account) database model

use chrono::{DateTime, Utc};
use diesel::prelude::*;
use diesel_async::{AsyncPgConnection, RunQueryDsl};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::schema::users;

/// User database model - queryable from database
#[derive(Debug, Clone, Serialize, Deserialize, Queryable, Selectable, Identifiable)]
#[diesel(table_name = users)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct User {
    pub id: Uuid,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub last_name: String,
    pub first_name: String,
    pub postal_code: String,
    pub city: String,
    pub is_admin: bool,
    pub is_employee: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// New user for insertion. Role flags are never set at signup.
#[derive(Debug, Insertable)]
#[diesel(table_name = users)]
pub struct NewUser {
    pub email: String,
    pub password_hash: String,
    pub last_name: String,
    pub first_name: String,
    pub postal_code: String,
    pub city: String,
}

/// Profile update; `None` leaves a column untouched
#[derive(Debug, Default, AsChangeset)]
#[diesel(table_name = users)]
pub struct UserUpdate {
    pub password_hash: Option<String>,
    pub last_name: Option<String>,
    pub first_name: Option<String>,
    pub postal_code: Option<String>,
    pub city: Option<String>,
    pub updated_at: Option<DateTime<Utc>>,
}

/// Role flags, only writable by an admin
#[derive(Debug, AsChangeset)]
#[diesel(table_name = users)]
pub struct RoleUpdate {
    pub is_admin: Option<bool>,
    pub is_employee: Option<bool>,
    pub updated_at: DateTime<Utc>,
}

/// Errors for user operations
#[derive(thiserror::Error, Debug)]
pub enum UserError {
    #[error("Database error: {0}")]
    Database(#[from] diesel::result::Error),

    #[error("User not found")]
    NotFound,

    #[error("Email already registered")]
    EmailTaken,
}

fn map_not_found(e: diesel::result::Error) -> UserError {
    match e {
        diesel::result::Error::NotFound => UserError::NotFound,
        _ => UserError::Database(e),
    }
}

/// Emails are stored and compared lowercased
pub fn normalize_email(raw: &str) -> String {
    raw.trim().to_lowercase()
}

impl User {
    /// Find user by ID
    pub async fn find_by_id(
        conn: &mut AsyncPgConnection,
        user_id: Uuid,
    ) -> Result<Self, UserError> {
        use crate::schema::users::dsl::*;

        users
            .filter(id.eq(user_id))
            .select(User::as_select())
            .first(conn)
            .await
            .map_err(map_not_found)
    }

    /// Find user by (normalized) email
    pub async fn find_by_email(
        conn: &mut AsyncPgConnection,
        email_str: &str,
    ) -> Result<Self, UserError> {
        use crate::schema::users::dsl::*;

        users
            .filter(email.eq(normalize_email(email_str)))
            .select(User::as_select())
            .first(conn)
            .await
            .map_err(map_not_found)
    }

    /// Create a new user
    pub async fn create(
        conn: &mut AsyncPgConnection,
        new_user: NewUser,
    ) -> Result<Self, UserError> {
        use crate::schema::users::dsl::*;
        use diesel::result::{DatabaseErrorKind, Error};

        diesel::insert_into(users)
            .values(&new_user)
            .returning(User::as_returning())
            .get_result(conn)
            .await
            .map_err(|e| match e {
                Error::DatabaseError(DatabaseErrorKind::UniqueViolation, _) => UserError::EmailTaken,
                _ => UserError::Database(e),
            })
    }

    /// Update user by ID (last write wins)
    pub async fn update(
        conn: &mut AsyncPgConnection,
        user_id: Uuid,
        mut update: UserUpdate,
    ) -> Result<Self, UserError> {
        use crate::schema::users::dsl::*;

        update.updated_at = Some(Utc::now());
        diesel::update(users.filter(id.eq(user_id)))
            .set(&update)
            .returning(User::as_returning())
            .get_result(conn)
            .await
            .map_err(map_not_found)
    }

    /// Replace the stored hash for the account owning `email_str`
    pub async fn update_password_by_email(
        conn: &mut AsyncPgConnection,
        email_str: &str,
        new_hash: &str,
    ) -> Result<(), UserError> {
        use crate::schema::users::dsl::*;

        let affected = diesel::update(users.filter(email.eq(normalize_email(email_str))))
            .set((password_hash.eq(new_hash), updated_at.eq(Utc::now())))
            .execute(conn)
            .await?;

        if affected == 0 {
            return Err(UserError::NotFound);
        }
        Ok(())
    }

    pub async fn set_roles(
        conn: &mut AsyncPgConnection,
        user_id: Uuid,
        roles: RoleUpdate,
    ) -> Result<Self, UserError> {
        use crate::schema::users::dsl::*;

        diesel::update(users.filter(id.eq(user_id)))
            .set(&roles)
            .returning(User::as_returning())
            .get_result(conn)
            .await
            .map_err(map_not_found)
    }

    pub async fn delete(conn: &mut AsyncPgConnection, user_id: Uuid) -> Result<(), UserError> {
        use crate::schema::users::dsl::*;

        let affected = diesel::delete(users.filter(id.eq(user_id)))
            .execute(conn)
            .await?;

        if affected == 0 {
            return Err(UserError::NotFound);
        }
        Ok(())
    }
}

impl From<UserError> for crate::utils::ApiError {
    fn from(error: UserError) -> Self {
        match error {
            UserError::NotFound => crate::utils::ApiError::NotFound("User"),
            UserError::EmailTaken => {
                crate::utils::ApiError::Conflict("Email already registered".to_string())
            },
            UserError::Database(e) => e.into(),
        }
    }
}
