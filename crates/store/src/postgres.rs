//! Durable backend over the `db` crate.

use async_trait::async_trait;

use db::models::{NewProperty, NewUser, PastReservation, PropertyRow, PropertyWithRating, UserRow};
use db::repository::{properties, reservations, users};
use db::{DbPool, PropertyFilter};

use crate::{RentalStore, StoreError};

/// [`RentalStore`] backed by a Postgres pool.
///
/// Cloning is cheap; clones share the same pool.
#[derive(Debug, Clone)]
pub struct PgStore {
    pool: DbPool,
}

impl PgStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &DbPool {
        &self.pool
    }

    /// Close the underlying pool. Call once at shutdown.
    pub async fn close(&self) {
        db::pool::close_pool(&self.pool).await;
    }
}

#[async_trait]
impl RentalStore for PgStore {
    async fn user_by_email(&self, email: &str) -> Result<Option<UserRow>, StoreError> {
        Ok(users::get_user_by_email(&self.pool, email).await?)
    }

    async fn user_by_id(&self, id: i32) -> Result<Option<UserRow>, StoreError> {
        Ok(users::get_user_by_id(&self.pool, id).await?)
    }

    async fn create_user(&self, user: &NewUser) -> Result<UserRow, StoreError> {
        Ok(users::create_user(&self.pool, user).await?)
    }

    async fn past_reservations(
        &self,
        guest_id: i32,
        limit: i64,
    ) -> Result<Vec<PastReservation>, StoreError> {
        Ok(reservations::list_past_reservations(&self.pool, guest_id, limit).await?)
    }

    async fn list_properties(
        &self,
        filter: &PropertyFilter,
        limit: i64,
    ) -> Result<Vec<PropertyWithRating>, StoreError> {
        Ok(properties::list_properties(&self.pool, filter, limit).await?)
    }

    async fn create_property(&self, property: &NewProperty) -> Result<PropertyRow, StoreError> {
        Ok(properties::create_property(&self.pool, property).await?)
    }
}
