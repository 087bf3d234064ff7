//! The `RentalStore` trait — the contract every persistence backend fulfils.

use async_trait::async_trait;

use db::models::{NewProperty, NewUser, PastReservation, PropertyRow, PropertyWithRating, UserRow};
use db::PropertyFilter;

use crate::StoreError;

/// The six LightBnB data operations.
///
/// Every method is a single atomic step: it either returns its result or
/// fails as a whole.
#[async_trait]
pub trait RentalStore: Send + Sync {
    /// Exact-match lookup by email.
    async fn user_by_email(&self, email: &str) -> Result<Option<UserRow>, StoreError>;

    async fn user_by_id(&self, id: i32) -> Result<Option<UserRow>, StoreError>;

    /// Insert a user; the email must not already be registered.
    async fn create_user(&self, user: &NewUser) -> Result<UserRow, StoreError>;

    /// Reservations of `guest_id` that have ended, oldest start first.
    async fn past_reservations(
        &self,
        guest_id: i32,
        limit: i64,
    ) -> Result<Vec<PastReservation>, StoreError>;

    /// Properties matching `filter`, cheapest first.
    async fn list_properties(
        &self,
        filter: &PropertyFilter,
        limit: i64,
    ) -> Result<Vec<PropertyWithRating>, StoreError>;

    /// Insert a property; `owner_id` must reference an existing user.
    async fn create_property(&self, property: &NewProperty) -> Result<PropertyRow, StoreError>;
}
