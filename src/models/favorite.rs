// Favorites: (user, service) pairs

use chrono::{DateTime, Utc};
use diesel::prelude::*;
use diesel_async::{AsyncPgConnection, RunQueryDsl};
use serde::Serialize;
use uuid::Uuid;

use crate::models::service::Service;
use crate::schema::{favorites, services};

#[derive(Debug, Clone, Queryable, Selectable, Serialize)]
#[diesel(table_name = favorites)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct Favorite {
    pub user_id: Uuid,
    pub service_id: Uuid,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Insertable)]
#[diesel(table_name = favorites)]
struct NewFavorite {
    user_id: Uuid,
    service_id: Uuid,
}

impl Favorite {
    /// Services the user has marked, most recent first
    pub async fn list_services(
        conn: &mut AsyncPgConnection,
        user: Uuid,
    ) -> QueryResult<Vec<Service>> {
        favorites::table
            .inner_join(services::table)
            .filter(favorites::user_id.eq(user))
            .order(favorites::created_at.desc())
            .select(Service::as_select())
            .load(conn)
            .await
    }

    /// Adding an existing favorite is a no-op. Returns whether a row was added.
    pub async fn add(conn: &mut AsyncPgConnection, user: Uuid, service: Uuid) -> QueryResult<bool> {
        let inserted = diesel::insert_into(favorites::table)
            .values(&NewFavorite {
                user_id: user,
                service_id: service,
            })
            .on_conflict_do_nothing()
            .execute(conn)
            .await?;
        Ok(inserted > 0)
    }

    /// Returns whether a row was removed
    pub async fn remove(
        conn: &mut AsyncPgConnection,
        user: Uuid,
        service: Uuid,
    ) -> QueryResult<bool> {
        let removed = diesel::delete(
            favorites::table
                .filter(favorites::user_id.eq(user))
                .filter(favorites::service_id.eq(service)),
        )
        .execute(conn)
        .await?;
        Ok(removed > 0)
    }
}
