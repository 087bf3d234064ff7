//! Reservation history.

use sqlx::PgPool;

use crate::{DbError, models::PastReservation};

/// Return up to `limit` reservations of `guest_id` that ended before now,
/// oldest first, each with its property and the property's average rating.
///
/// Reviews are left-joined, so a stay at an unreviewed property is still
/// listed with a `None` rating.
pub async fn list_past_reservations(
    pool: &PgPool,
    guest_id: i32,
    limit: i64,
) -> Result<Vec<PastReservation>, DbError> {
    let rows = sqlx::query_as::<_, PastReservation>(
        r#"
        SELECT reservations.id AS reservation_id,
               reservations.guest_id,
               reservations.start_date,
               reservations.end_date,
               properties.*,
               avg(property_reviews.rating)::float8 AS average_rating
        FROM reservations
        JOIN properties ON reservations.property_id = properties.id
        LEFT JOIN property_reviews ON properties.id = property_reviews.property_id
        WHERE reservations.guest_id = $1
          AND reservations.end_date < now()
        GROUP BY properties.id, reservations.id
        ORDER BY reservations.start_date, reservations.id
        LIMIT $2
        "#,
    )
    .bind(guest_id)
    .bind(limit)
    .fetch_all(pool)
    .await?;

    Ok(rows)
}
