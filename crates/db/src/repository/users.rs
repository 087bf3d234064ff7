//! User lookups and registration.

use sqlx::PgPool;

use crate::{
    DbError,
    models::{NewUser, UserRow},
};

/// Fetch the user registered under `email`, if any. Matching is exact.
pub async fn get_user_by_email(pool: &PgPool, email: &str) -> Result<Option<UserRow>, DbError> {
    let row = sqlx::query_as::<_, UserRow>(
        r#"SELECT id, name, email, password FROM users WHERE email = $1"#,
    )
    .bind(email)
    .fetch_optional(pool)
    .await?;

    Ok(row)
}

/// Fetch a single user by primary key.
pub async fn get_user_by_id(pool: &PgPool, id: i32) -> Result<Option<UserRow>, DbError> {
    let row = sqlx::query_as::<_, UserRow>(
        r#"SELECT id, name, email, password FROM users WHERE id = $1"#,
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;

    Ok(row)
}

/// Insert a new user and return it with its generated id.
///
/// A duplicate email fails with the unique-violation error from Postgres.
pub async fn create_user(pool: &PgPool, user: &NewUser) -> Result<UserRow, DbError> {
    let row = sqlx::query_as::<_, UserRow>(
        r#"
        INSERT INTO users (name, email, password)
        VALUES ($1, $2, $3)
        RETURNING id, name, email, password
        "#,
    )
    .bind(&user.name)
    .bind(&user.email)
    .bind(&user.password)
    .fetch_one(pool)
    .await?;

    Ok(row)
}
