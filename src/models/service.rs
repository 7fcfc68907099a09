// Services catalogue model

use std::str::FromStr;

use chrono::{DateTime, Utc};
use diesel::prelude::*;
use diesel_async::{AsyncPgConnection, RunQueryDsl};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::schema::services;

// =============================================================================
// DATABASE MODELS
// =============================================================================

#[derive(Debug, Clone, Queryable, Selectable, Identifiable, Serialize, Deserialize)]
#[diesel(table_name = services)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct Service {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub price_cents: i32,
    pub category: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = services)]
pub struct NewService {
    pub title: String,
    pub description: String,
    pub price_cents: i32,
    pub category: String,
}

#[derive(Debug, Default, AsChangeset)]
#[diesel(table_name = services)]
pub struct ServiceUpdate {
    pub title: Option<String>,
    pub description: Option<String>,
    pub price_cents: Option<i32>,
    pub category: Option<String>,
    pub updated_at: Option<DateTime<Utc>>,
}

// =============================================================================
// REQUEST MODELS
// =============================================================================

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateServiceRequest {
    #[validate(length(min = 1, max = 255, message = "Title must be 1-255 characters"))]
    pub title: String,

    #[validate(length(max = 5000, message = "Description must be less than 5000 characters"))]
    #[serde(default)]
    pub description: String,

    #[validate(range(min = 0, message = "Price cannot be negative"))]
    pub price_cents: i32,

    #[validate(length(min = 1, max = 100, message = "Category must be 1-100 characters"))]
    pub category: String,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct UpdateServiceRequest {
    #[validate(length(min = 1, max = 255, message = "Title must be 1-255 characters"))]
    pub title: Option<String>,

    #[validate(length(max = 5000, message = "Description must be less than 5000 characters"))]
    pub description: Option<String>,

    #[validate(range(min = 0, message = "Price cannot be negative"))]
    pub price_cents: Option<i32>,

    #[validate(length(min = 1, max = 100, message = "Category must be 1-100 characters"))]
    pub category: Option<String>,
}

impl From<CreateServiceRequest> for NewService {
    fn from(req: CreateServiceRequest) -> Self {
        Self {
            title: req.title.trim().to_string(),
            description: req.description.trim().to_string(),
            price_cents: req.price_cents,
            category: req.category.trim().to_string(),
        }
    }
}

impl From<UpdateServiceRequest> for ServiceUpdate {
    fn from(req: UpdateServiceRequest) -> Self {
        Self {
            title: req.title.map(|s| s.trim().to_string()),
            description: req.description.map(|s| s.trim().to_string()),
            price_cents: req.price_cents,
            category: req.category.map(|s| s.trim().to_string()),
            updated_at: None,
        }
    }
}

// =============================================================================
// SORTING
// =============================================================================

/// Columns a client may sort the catalogue by. Anything else is rejected
/// before a query is built.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ServiceSort {
    Title,
    Price,
    Category,
    #[default]
    CreatedAt,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOrder {
    #[default]
    Asc,
    Desc,
}

impl FromStr for ServiceSort {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "title" => Ok(Self::Title),
            "price" => Ok(Self::Price),
            "category" => Ok(Self::Category),
            "created_at" => Ok(Self::CreatedAt),
            other => Err(format!("Unsupported sort column: {}", other)),
        }
    }
}

impl FromStr for SortOrder {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "asc" => Ok(Self::Asc),
            "desc" => Ok(Self::Desc),
            other => Err(format!("Unsupported sort order: {}", other)),
        }
    }
}

/// Raw `?sort=&order=` query string
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ListServicesParams {
    pub sort: Option<String>,
    pub order: Option<String>,
}

impl ListServicesParams {
    pub fn parse(&self) -> Result<(ServiceSort, SortOrder), String> {
        let sort: ServiceSort = self.sort.as_deref().map(str::parse).transpose()?.unwrap_or_default();
        let order: SortOrder = self.order.as_deref().map(str::parse).transpose()?.unwrap_or_default();
        Ok((sort, order))
    }
}

// =============================================================================
// QUERIES
// =============================================================================

impl Service {
    pub async fn list(
        conn: &mut AsyncPgConnection,
        sort: ServiceSort,
        order: SortOrder,
    ) -> QueryResult<Vec<Self>> {
        use crate::schema::services::dsl;

        let query = dsl::services.select(Service::as_select()).into_boxed();

        let query = match (sort, order) {
            (ServiceSort::Title, SortOrder::Asc) => query.order(dsl::title.asc()),
            (ServiceSort::Title, SortOrder::Desc) => query.order(dsl::title.desc()),
            (ServiceSort::Price, SortOrder::Asc) => query.order(dsl::price_cents.asc()),
            (ServiceSort::Price, SortOrder::Desc) => query.order(dsl::price_cents.desc()),
            (ServiceSort::Category, SortOrder::Asc) => query.order(dsl::category.asc()),
            (ServiceSort::Category, SortOrder::Desc) => query.order(dsl::category.desc()),
            (ServiceSort::CreatedAt, SortOrder::Asc) => query.order(dsl::created_at.asc()),
            (ServiceSort::CreatedAt, SortOrder::Desc) => query.order(dsl::created_at.desc()),
        };

        query.then_order_by(dsl::id.asc()).load(conn).await
    }

    pub async fn find_by_id(conn: &mut AsyncPgConnection, service_id: Uuid) -> QueryResult<Self> {
        use crate::schema::services::dsl::*;

        services
            .filter(id.eq(service_id))
            .select(Service::as_select())
            .first(conn)
            .await
    }

    pub async fn create(conn: &mut AsyncPgConnection, new_service: NewService) -> QueryResult<Self> {
        use crate::schema::services::dsl::*;

        diesel::insert_into(services)
            .values(&new_service)
            .returning(Service::as_returning())
            .get_result(conn)
            .await
    }

    pub async fn update(
        conn: &mut AsyncPgConnection,
        service_id: Uuid,
        mut update: ServiceUpdate,
    ) -> QueryResult<Self> {
        use crate::schema::services::dsl::*;

        update.updated_at = Some(Utc::now());
        diesel::update(services.filter(id.eq(service_id)))
            .set(&update)
            .returning(Service::as_returning())
            .get_result(conn)
            .await
    }

    /// Returns the number of rows removed (0 or 1)
    pub async fn delete(conn: &mut AsyncPgConnection, service_id: Uuid) -> QueryResult<usize> {
        use crate::schema::services::dsl::*;

        diesel::delete(services.filter(id.eq(service_id)))
            .execute(conn)
            .await
    }
}
