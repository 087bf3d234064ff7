//! The LightBnB query gateway.
//!
//! `QueryGateway` is the one entry point the web layer uses:
//! 1. Applies the default page size and rejects non-positive limits.
//! 2. Dispatches to whichever `RentalStore` backend it was built with.
//! 3. Returns the backend's records or its error unchanged.
//!
//! It holds no state besides the store handle, so one gateway can serve
//! any number of concurrent requests.

use std::sync::Arc;

use tracing::{debug, info, instrument};

use db::models::{NewProperty, NewUser, PastReservation, PropertyRow, PropertyWithRating, UserRow};
use db::{PropertyFilter, DEFAULT_LIMIT};
use store::RentalStore;

use crate::GatewayError;

/// Stateless façade over a [`RentalStore`].
#[derive(Clone)]
pub struct QueryGateway {
    store: Arc<dyn RentalStore>,
}

impl QueryGateway {
    /// Create a gateway over `store`.
    pub fn new(store: Arc<dyn RentalStore>) -> Self {
        Self { store }
    }

    /// Fetch the user registered under `email`.
    ///
    /// Returns `Ok(None)` when no user matches.
    #[instrument(skip_all)]
    pub async fn get_user_by_email(&self, email: &str) -> Result<Option<UserRow>, GatewayError> {
        let user = self.store.user_by_email(email).await?;
        debug!(found = user.is_some(), "user lookup by email");
        Ok(user)
    }

    /// Fetch a user by id. Returns `Ok(None)` when no user matches.
    #[instrument(skip(self))]
    pub async fn get_user_by_id(&self, id: i32) -> Result<Option<UserRow>, GatewayError> {
        Ok(self.store.user_by_id(id).await?)
    }

    /// Register a user. The password must already be hashed.
    #[instrument(skip_all)]
    pub async fn create_user(&self, user: &NewUser) -> Result<UserRow, GatewayError> {
        let created = self.store.create_user(user).await?;
        info!(user_id = created.id, "user created");
        Ok(created)
    }

    /// A guest's finished reservations, oldest first, at most `limit`
    /// (default 10).
    #[instrument(skip(self))]
    pub async fn list_past_reservations_for_guest(
        &self,
        guest_id: i32,
        limit: Option<u32>,
    ) -> Result<Vec<PastReservation>, GatewayError> {
        let limit = resolve_limit(limit)?;
        Ok(self.store.past_reservations(guest_id, limit).await?)
    }

    /// Properties matching `filter`, cheapest first, at most `limit`
    /// (default 10). No match is an empty list.
    #[instrument(skip(self))]
    pub async fn list_properties(
        &self,
        filter: &PropertyFilter,
        limit: Option<u32>,
    ) -> Result<Vec<PropertyWithRating>, GatewayError> {
        let limit = resolve_limit(limit)?;
        let rows = self.store.list_properties(filter, limit).await?;
        debug!(count = rows.len(), "properties listed");
        Ok(rows)
    }

    /// Create a listing. `cost_per_night` is in cents.
    #[instrument(skip_all, fields(owner_id = property.owner_id))]
    pub async fn create_property(&self, property: &NewProperty) -> Result<PropertyRow, GatewayError> {
        let created = self.store.create_property(property).await?;
        info!(property_id = created.id, "property created");
        Ok(created)
    }
}

fn resolve_limit(limit: Option<u32>) -> Result<i64, GatewayError> {
    match limit.unwrap_or(DEFAULT_LIMIT) {
        0 => Err(GatewayError::InvalidLimit(0)),
        n => Ok(i64::from(n)),
    }
}
