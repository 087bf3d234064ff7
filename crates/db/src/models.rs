//! Row structs that map 1-to-1 onto database tables, plus the two joined
//! shapes returned by the read queries.
//!
//! These are *persistence* models. They carry no behaviour beyond serde and
//! `FromRow`.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

// ---------------------------------------------------------------------------
// users
// ---------------------------------------------------------------------------

/// A persisted user row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct UserRow {
    pub id: i32,
    pub name: String,
    pub email: String,
    /// Password hash. Never written out when a user is serialised.
    #[serde(skip_serializing)]
    pub password: String,
}

/// Fields required to insert a user. `password` must already be hashed.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct NewUser {
    pub name: String,
    pub email: String,
    pub password: String,
}

// ---------------------------------------------------------------------------
// properties
// ---------------------------------------------------------------------------

/// A persisted property row. `cost_per_night` is in cents.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct PropertyRow {
    pub id: i32,
    pub owner_id: i32,
    pub title: String,
    pub description: String,
    pub thumbnail_photo_url: String,
    pub cover_photo_url: String,
    pub cost_per_night: i32,
    pub street: String,
    pub city: String,
    pub province: String,
    pub post_code: String,
    pub country: String,
    pub parking_spaces: i32,
    pub number_of_bathrooms: i32,
    pub number_of_bedrooms: i32,
}

/// Fields required to insert a property. `cost_per_night` is in cents; use
/// [`crate::filter::dollars_to_cents`] when starting from a dollar amount.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct NewProperty {
    pub owner_id: i32,
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub thumbnail_photo_url: String,
    pub cover_photo_url: String,
    pub cost_per_night: i32,
    pub street: String,
    pub city: String,
    pub province: String,
    pub post_code: String,
    pub country: String,
    #[serde(default)]
    pub parking_spaces: i32,
    #[serde(default)]
    pub number_of_bathrooms: i32,
    #[serde(default)]
    pub number_of_bedrooms: i32,
}

impl NewProperty {
    /// Attach a generated id, producing the stored row.
    pub fn into_row(self, id: i32) -> PropertyRow {
        PropertyRow {
            id,
            owner_id: self.owner_id,
            title: self.title,
            description: self.description,
            thumbnail_photo_url: self.thumbnail_photo_url,
            cover_photo_url: self.cover_photo_url,
            cost_per_night: self.cost_per_night,
            street: self.street,
            city: self.city,
            province: self.province,
            post_code: self.post_code,
            country: self.country,
            parking_spaces: self.parking_spaces,
            number_of_bathrooms: self.number_of_bathrooms,
            number_of_bedrooms: self.number_of_bedrooms,
        }
    }
}

/// A property together with the average of its review ratings.
///
/// `average_rating` is `None` for a property nobody has reviewed.
#[derive(Debug, Clone, PartialEq, Serialize, FromRow)]
pub struct PropertyWithRating {
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub property: PropertyRow,
    pub average_rating: Option<f64>,
}

// ---------------------------------------------------------------------------
// reservations
// ---------------------------------------------------------------------------

/// A persisted reservation row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct ReservationRow {
    pub id: i32,
    pub property_id: i32,
    pub guest_id: i32,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
}

/// A finished reservation joined with the property it was for.
#[derive(Debug, Clone, PartialEq, Serialize, FromRow)]
pub struct PastReservation {
    pub reservation_id: i32,
    pub guest_id: i32,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub property: PropertyRow,
    pub average_rating: Option<f64>,
}

// ---------------------------------------------------------------------------
// property_reviews
// ---------------------------------------------------------------------------

/// A persisted review row. Only read in aggregate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct PropertyReviewRow {
    pub id: i32,
    pub guest_id: i32,
    pub property_id: i32,
    pub reservation_id: i32,
    pub rating: i16,
    pub message: String,
}
