//! `MemoryStore` — an ephemeral [`RentalStore`].
//!
//! Holds the four tables in process memory behind an async `RwLock` and
//! applies the same rules the Postgres schema enforces: unique email, owner
//! and guest references, cheapest-first ordering, average ratings over a
//! left join. Everything is lost when the store is dropped.

use std::path::Path;

use async_trait::async_trait;
use chrono::{NaiveDate, Utc};
use tokio::sync::RwLock;
use tracing::info;

use db::models::{
    NewProperty, NewUser, PastReservation, PropertyReviewRow, PropertyRow, PropertyWithRating,
    ReservationRow, UserRow,
};
use db::PropertyFilter;

use crate::{fixtures, RentalStore, StoreError};

#[derive(Debug, Default)]
struct Tables {
    users: Vec<UserRow>,
    properties: Vec<PropertyRow>,
    reservations: Vec<ReservationRow>,
    reviews: Vec<PropertyReviewRow>,
}

fn next_id<T>(rows: &[T], id: impl Fn(&T) -> i32) -> i32 {
    rows.iter().map(id).max().unwrap_or(0) + 1
}

impl Tables {
    fn user_exists(&self, id: i32) -> bool {
        self.users.iter().any(|u| u.id == id)
    }

    fn property(&self, id: i32) -> Option<&PropertyRow> {
        self.properties.iter().find(|p| p.id == id)
    }

    fn average_rating(&self, property_id: i32) -> Option<f64> {
        let (sum, count) = self
            .reviews
            .iter()
            .filter(|r| r.property_id == property_id)
            .fold((0i64, 0i64), |(sum, count), r| (sum + i64::from(r.rating), count + 1));
        (count > 0).then(|| sum as f64 / count as f64)
    }

    fn insert_user(&mut self, user: UserRow) -> Result<(), StoreError> {
        if self.users.iter().any(|u| u.email == user.email) {
            return Err(StoreError::Constraint(format!(
                "email '{}' is already registered",
                user.email
            )));
        }
        if self.user_exists(user.id) {
            return Err(StoreError::Constraint(format!("duplicate user id {}", user.id)));
        }
        self.users.push(user);
        Ok(())
    }

    fn insert_property(&mut self, property: PropertyRow) -> Result<(), StoreError> {
        if !self.user_exists(property.owner_id) {
            return Err(StoreError::Constraint(format!(
                "owner_id {} does not reference a user",
                property.owner_id
            )));
        }
        if property.cost_per_night < 0 {
            return Err(StoreError::Constraint("cost_per_night must be non-negative".into()));
        }
        if self.property(property.id).is_some() {
            return Err(StoreError::Constraint(format!(
                "duplicate property id {}",
                property.id
            )));
        }
        self.properties.push(property);
        Ok(())
    }
}

/// In-memory [`RentalStore`].
#[derive(Debug, Default)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
}

impl MemoryStore {
    /// An empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// A store seeded with fixture records. Users are loaded first so
    /// property owners can be checked.
    pub fn with_records(users: Vec<UserRow>, properties: Vec<PropertyRow>) -> Result<Self, StoreError> {
        let mut tables = Tables::default();
        for user in users {
            tables.insert_user(user)?;
        }
        for property in properties {
            tables.insert_property(property)?;
        }
        Ok(Self {
            tables: RwLock::new(tables),
        })
    }

    /// A store seeded from `users.json` and `properties.json` in `dir`.
    pub async fn from_fixture_dir(dir: &Path) -> Result<Self, StoreError> {
        let (users, properties) = fixtures::load_dir(dir).await?;
        info!(
            "Loaded {} users and {} properties from {}",
            users.len(),
            properties.len(),
            dir.display()
        );
        Self::with_records(users, properties)
    }

    /// Record a reservation. Both the property and the guest must exist.
    pub async fn add_reservation(
        &self,
        property_id: i32,
        guest_id: i32,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Result<ReservationRow, StoreError> {
        let mut tables = self.tables.write().await;
        if tables.property(property_id).is_none() {
            return Err(StoreError::Constraint(format!(
                "property_id {property_id} does not reference a property"
            )));
        }
        if !tables.user_exists(guest_id) {
            return Err(StoreError::Constraint(format!(
                "guest_id {guest_id} does not reference a user"
            )));
        }
        if end_date < start_date {
            return Err(StoreError::Constraint("end_date precedes start_date".into()));
        }

        let row = ReservationRow {
            id: next_id(&tables.reservations, |r| r.id),
            property_id,
            guest_id,
            start_date,
            end_date,
        };
        tables.reservations.push(row.clone());
        Ok(row)
    }

    /// Review the property of an existing reservation.
    pub async fn add_review(
        &self,
        reservation_id: i32,
        rating: i16,
        message: impl Into<String>,
    ) -> Result<PropertyReviewRow, StoreError> {
        if rating < 0 {
            return Err(StoreError::Constraint("rating must be non-negative".into()));
        }
        let mut tables = self.tables.write().await;
        let reservation = tables
            .reservations
            .iter()
            .find(|r| r.id == reservation_id)
            .cloned()
            .ok_or_else(|| {
                StoreError::Constraint(format!(
                    "reservation_id {reservation_id} does not reference a reservation"
                ))
            })?;

        let row = PropertyReviewRow {
            id: next_id(&tables.reviews, |r| r.id),
            guest_id: reservation.guest_id,
            property_id: reservation.property_id,
            reservation_id,
            rating,
            message: message.into(),
        };
        tables.reviews.push(row.clone());
        Ok(row)
    }
}

fn limit_to_len(limit: i64) -> usize {
    usize::try_from(limit).unwrap_or(0)
}

#[async_trait]
impl RentalStore for MemoryStore {
    async fn user_by_email(&self, email: &str) -> Result<Option<UserRow>, StoreError> {
        let tables = self.tables.read().await;
        Ok(tables.users.iter().find(|u| u.email == email).cloned())
    }

    async fn user_by_id(&self, id: i32) -> Result<Option<UserRow>, StoreError> {
        let tables = self.tables.read().await;
        Ok(tables.users.iter().find(|u| u.id == id).cloned())
    }

    async fn create_user(&self, user: &NewUser) -> Result<UserRow, StoreError> {
        let mut tables = self.tables.write().await;
        let row = UserRow {
            id: next_id(&tables.users, |u| u.id),
            name: user.name.clone(),
            email: user.email.clone(),
            password: user.password.clone(),
        };
        tables.insert_user(row.clone())?;
        Ok(row)
    }

    async fn past_reservations(
        &self,
        guest_id: i32,
        limit: i64,
    ) -> Result<Vec<PastReservation>, StoreError> {
        // A date compares as its midnight, the same as `date < now()` in UTC.
        let now = Utc::now().naive_utc();
        let tables = self.tables.read().await;

        let mut finished: Vec<&ReservationRow> = tables
            .reservations
            .iter()
            .filter(|r| {
                r.guest_id == guest_id
                    && r.end_date.and_hms_opt(0, 0, 0).is_some_and(|end| end < now)
            })
            .collect();
        finished.sort_by_key(|r| (r.start_date, r.id));

        let rows = finished
            .into_iter()
            .filter_map(|r| {
                let property = tables.property(r.property_id)?;
                Some(PastReservation {
                    reservation_id: r.id,
                    guest_id: r.guest_id,
                    start_date: r.start_date,
                    end_date: r.end_date,
                    property: property.clone(),
                    average_rating: tables.average_rating(property.id),
                })
            })
            .take(limit_to_len(limit))
            .collect();

        Ok(rows)
    }

    async fn list_properties(
        &self,
        filter: &PropertyFilter,
        limit: i64,
    ) -> Result<Vec<PropertyWithRating>, StoreError> {
        let predicates = filter.predicates();
        let tables = self.tables.read().await;

        let mut rows: Vec<PropertyWithRating> = tables
            .properties
            .iter()
            .filter(|p| predicates.iter().all(|pred| pred.matches(p)))
            .map(|p| PropertyWithRating {
                property: p.clone(),
                average_rating: tables.average_rating(p.id),
            })
            .filter(|row| filter.accepts_rating(row.average_rating))
            .collect();

        rows.sort_by_key(|row| (row.property.cost_per_night, row.property.id));
        rows.truncate(limit_to_len(limit));
        Ok(rows)
    }

    async fn create_property(&self, property: &NewProperty) -> Result<PropertyRow, StoreError> {
        let mut tables = self.tables.write().await;
        let row = property.clone().into_row(next_id(&tables.properties, |p| p.id));
        tables.insert_property(row.clone())?;
        Ok(row)
    }
}
