//! Property search filter and the SQL it lowers to.
//!
//! A [`PropertyFilter`] is the options bag the web layer hands in. It is
//! first lowered into a list of [`Predicate`]s, each owning the value it
//! binds, and only then rendered onto a [`QueryBuilder`]. Placeholder
//! numbering is left to the builder, and caller text never reaches the SQL
//! string itself.
//!
//! Both price bounds apply independently: a lone minimum is a floor and a
//! lone maximum is a ceiling.

use serde::Deserialize;
use sqlx::query_builder::Separated;
use sqlx::{Postgres, QueryBuilder};

use crate::models::PropertyRow;

/// Page size used when the caller does not pass one.
pub const DEFAULT_LIMIT: u32 = 10;

const PROPERTY_SELECT: &str = "\
SELECT properties.*, avg(property_reviews.rating)::float8 AS average_rating \
FROM properties \
LEFT JOIN property_reviews ON properties.id = property_reviews.property_id";

/// Convert a dollar amount to whole cents, rounding to the nearest cent.
pub fn dollars_to_cents(dollars: f64) -> i32 {
    (dollars * 100.0).round() as i32
}

/// Escape `LIKE` metacharacters so `text` only ever matches literally.
fn escape_like(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        if matches!(c, '\\' | '%' | '_') {
            out.push('\\');
        }
        out.push(c);
    }
    out
}

// ---------------------------------------------------------------------------
// PropertyFilter
// ---------------------------------------------------------------------------

/// Independently optional search options for the property listing.
///
/// Prices are in dollars, as a guest would type them.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct PropertyFilter {
    /// Case-insensitive substring of the city name.
    pub city: Option<String>,
    pub owner_id: Option<i32>,
    /// Lowest acceptable average review rating.
    pub minimum_rating: Option<f64>,
    pub minimum_price_per_night: Option<f64>,
    pub maximum_price_per_night: Option<f64>,
}

impl PropertyFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn city(mut self, city: impl Into<String>) -> Self {
        self.city = Some(city.into());
        self
    }

    pub fn owner(mut self, owner_id: i32) -> Self {
        self.owner_id = Some(owner_id);
        self
    }

    pub fn minimum_rating(mut self, rating: f64) -> Self {
        self.minimum_rating = Some(rating);
        self
    }

    /// Inclusive price range in dollars. Either end may be left open.
    pub fn price_range(mut self, minimum: Option<f64>, maximum: Option<f64>) -> Self {
        self.minimum_price_per_night = minimum;
        self.maximum_price_per_night = maximum;
        self
    }

    /// Row-level predicates in the order they appear in the WHERE clause.
    ///
    /// A blank city is treated as absent. Any other city text is matched
    /// as given, surrounding whitespace included.
    pub fn predicates(&self) -> Vec<Predicate> {
        let mut predicates = Vec::new();

        if let Some(city) = self.city.as_deref().filter(|c| !c.trim().is_empty()) {
            predicates.push(Predicate::CityContains(city.to_string()));
        }
        if let Some(owner_id) = self.owner_id {
            predicates.push(Predicate::OwnerIs(owner_id));
        }
        if let Some(min) = self.minimum_price_per_night {
            predicates.push(Predicate::CostAtLeast(dollars_to_cents(min)));
        }
        if let Some(max) = self.maximum_price_per_night {
            predicates.push(Predicate::CostAtMost(dollars_to_cents(max)));
        }

        predicates
    }

    /// Threshold on the aggregated rating, applied after grouping.
    pub fn rating_floor(&self) -> Option<f64> {
        self.minimum_rating
    }

    /// Whether `average_rating` passes the rating floor. Unreviewed
    /// properties never pass a floor.
    pub fn accepts_rating(&self, average_rating: Option<f64>) -> bool {
        match (self.rating_floor(), average_rating) {
            (None, _) => true,
            (Some(floor), Some(avg)) => avg >= floor,
            (Some(_), None) => false,
        }
    }
}

// ---------------------------------------------------------------------------
// Predicate
// ---------------------------------------------------------------------------

/// One row-level condition together with the value it binds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Predicate {
    CityContains(String),
    OwnerIs(i32),
    /// Inclusive lower bound on `cost_per_night`, in cents.
    CostAtLeast(i32),
    /// Inclusive upper bound on `cost_per_night`, in cents.
    CostAtMost(i32),
}

impl Predicate {
    /// Evaluate against an in-memory row with the same semantics as the SQL.
    pub fn matches(&self, property: &PropertyRow) -> bool {
        match self {
            Self::CityContains(needle) => property
                .city
                .to_lowercase()
                .contains(&needle.to_lowercase()),
            Self::OwnerIs(owner_id) => property.owner_id == *owner_id,
            Self::CostAtLeast(cents) => property.cost_per_night >= *cents,
            Self::CostAtMost(cents) => property.cost_per_night <= *cents,
        }
    }

    fn push_onto(&self, clause: &mut Separated<'_, 'static, Postgres, &'static str>) {
        match self {
            Self::CityContains(needle) => {
                clause.push("properties.city ILIKE ");
                clause.push_bind_unseparated(format!("%{}%", escape_like(needle)));
            }
            Self::OwnerIs(owner_id) => {
                clause.push("properties.owner_id = ");
                clause.push_bind_unseparated(*owner_id);
            }
            Self::CostAtLeast(cents) => {
                clause.push("properties.cost_per_night >= ");
                clause.push_bind_unseparated(*cents);
            }
            Self::CostAtMost(cents) => {
                clause.push("properties.cost_per_night <= ");
                clause.push_bind_unseparated(*cents);
            }
        }
    }
}

// ---------------------------------------------------------------------------
// SQL rendering
// ---------------------------------------------------------------------------

/// Build the property listing statement for `filter`, capped at `limit` rows.
pub fn property_query(filter: &PropertyFilter, limit: i64) -> QueryBuilder<'static, Postgres> {
    let mut builder = QueryBuilder::new(PROPERTY_SELECT);

    let predicates = filter.predicates();
    if !predicates.is_empty() {
        builder.push(" WHERE ");
        let mut clause = builder.separated(" AND ");
        for predicate in &predicates {
            predicate.push_onto(&mut clause);
        }
    }

    builder.push(" GROUP BY properties.id");

    if let Some(floor) = filter.rating_floor() {
        builder.push(" HAVING avg(property_reviews.rating)::float8 >= ");
        builder.push_bind(floor);
    }

    builder.push(" ORDER BY properties.cost_per_night, properties.id LIMIT ");
    builder.push_bind(limit);

    builder
}
