//! Property search and listing creation.

use sqlx::PgPool;
use tracing::debug;

use crate::{
    DbError,
    filter::{property_query, PropertyFilter},
    models::{NewProperty, PropertyRow, PropertyWithRating},
};

/// Search properties matching `filter`, cheapest first, at most `limit` rows.
pub async fn list_properties(
    pool: &PgPool,
    filter: &PropertyFilter,
    limit: i64,
) -> Result<Vec<PropertyWithRating>, DbError> {
    let mut builder = property_query(filter, limit);
    debug!(sql = builder.sql(), ?filter, limit, "listing properties");

    let rows = builder
        .build_query_as::<PropertyWithRating>()
        .fetch_all(pool)
        .await?;

    Ok(rows)
}

/// Insert a property and return the stored row.
///
/// An `owner_id` with no matching user fails with the foreign-key error
/// from Postgres.
pub async fn create_property(pool: &PgPool, property: &NewProperty) -> Result<PropertyRow, DbError> {
    let row = sqlx::query_as::<_, PropertyRow>(
        r#"
        INSERT INTO properties
            (owner_id, title, description, thumbnail_photo_url, cover_photo_url,
             cost_per_night, street, city, province, post_code, country,
             parking_spaces, number_of_bathrooms, number_of_bedrooms)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14)
        RETURNING *
        "#,
    )
    .bind(property.owner_id)
    .bind(&property.title)
    .bind(&property.description)
    .bind(&property.thumbnail_photo_url)
    .bind(&property.cover_photo_url)
    .bind(property.cost_per_night)
    .bind(&property.street)
    .bind(&property.city)
    .bind(&property.province)
    .bind(&property.post_code)
    .bind(&property.country)
    .bind(property.parking_spaces)
    .bind(property.number_of_bathrooms)
    .bind(property.number_of_bedrooms)
    .fetch_one(pool)
    .await?;

    Ok(row)
}
