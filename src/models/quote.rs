// Quotes ("devis") requested by customers for a service

use std::fmt;

use chrono::{DateTime, Utc};
use diesel::prelude::*;
use diesel_async::{AsyncPgConnection, RunQueryDsl};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::schema::quotes;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuoteStatus {
    Pending,
    Sent,
    Accepted,
    Rejected,
}

impl QuoteStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            QuoteStatus::Pending => "pending",
            QuoteStatus::Sent => "sent",
            QuoteStatus::Accepted => "accepted",
            QuoteStatus::Rejected => "rejected",
        }
    }
}

impl fmt::Display for QuoteStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Queryable, Selectable, Identifiable, Serialize)]
#[diesel(table_name = quotes)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct Quote {
    pub id: Uuid,
    pub user_id: Uuid,
    pub service_id: Uuid,
    pub message: String,
    pub amount_cents: Option<i32>,
    pub status: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Insertable)]
#[diesel(table_name = quotes)]
pub struct NewQuote {
    pub user_id: Uuid,
    pub service_id: Uuid,
    pub message: String,
    pub status: String,
}

#[derive(Debug, AsChangeset)]
#[diesel(table_name = quotes)]
pub struct QuoteUpdate {
    pub status: Option<String>,
    pub amount_cents: Option<i32>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateQuoteRequest {
    pub service_id: Uuid,

    #[validate(length(max = 5000, message = "Message must be less than 5000 characters"))]
    #[serde(default)]
    pub message: String,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct UpdateQuoteRequest {
    pub status: Option<QuoteStatus>,

    #[validate(range(min = 0, message = "Amount cannot be negative"))]
    pub amount_cents: Option<i32>,
}

impl UpdateQuoteRequest {
    pub fn is_empty(&self) -> bool {
        self.status.is_none() && self.amount_cents.is_none()
    }
}

impl Quote {
    pub async fn create(
        conn: &mut AsyncPgConnection,
        user: Uuid,
        req: CreateQuoteRequest,
    ) -> QueryResult<Self> {
        let new_quote = NewQuote {
            user_id: user,
            service_id: req.service_id,
            message: req.message.trim().to_string(),
            status: QuoteStatus::Pending.to_string(),
        };

        diesel::insert_into(quotes::table)
            .values(&new_quote)
            .returning(Quote::as_returning())
            .get_result(conn)
            .await
    }

    /// All quotes, or only those requested by `owner`
    pub async fn list(conn: &mut AsyncPgConnection, owner: Option<Uuid>) -> QueryResult<Vec<Self>> {
        use crate::schema::quotes::dsl;

        let mut query = dsl::quotes.select(Quote::as_select()).into_boxed();
        if let Some(user) = owner {
            query = query.filter(dsl::user_id.eq(user));
        }

        query
            .order((dsl::created_at.desc(), dsl::id.asc()))
            .load(conn)
            .await
    }

    pub async fn update(
        conn: &mut AsyncPgConnection,
        quote_id: Uuid,
        req: UpdateQuoteRequest,
    ) -> QueryResult<Self> {
        use crate::schema::quotes::dsl::*;

        let changes = QuoteUpdate {
            status: req.status.map(|s| s.to_string()),
            amount_cents: req.amount_cents,
            updated_at: Utc::now(),
        };

        diesel::update(quotes.filter(id.eq(quote_id)))
            .set(&changes)
            .returning(Quote::as_returning())
            .get_result(conn)
            .await
    }

    pub async fn delete(conn: &mut AsyncPgConnection, quote_id: Uuid) -> QueryResult<usize> {
        use crate::schema::quotes::dsl::*;

        diesel::delete(quotes.filter(id.eq(quote_id)))
            .execute(conn)
            .await
    }
}
