//! Repository tests against a live Postgres.
//!
//! Each test gets a fresh database with the workspace migrations applied.
//! Run with: DATABASE_URL=postgres://... cargo test -p db -- --ignored

use chrono::{Duration, NaiveDate, Utc};
use sqlx::PgPool;

use db::filter::PropertyFilter;
use db::models::{NewProperty, NewUser, PropertyRow, UserRow};
use db::repository::{properties, reservations, users};

fn new_user(name: &str, email: &str) -> NewUser {
    NewUser {
        name: name.into(),
        email: email.into(),
        password: "$2a$10$FB/BOAVhpuLvpOREQVmvmezD4ED/.JBIDRh70tGevYzYzQgFId2u.".into(),
    }
}

fn new_property(owner_id: i32, title: &str, city: &str, cost_per_night: i32) -> NewProperty {
    NewProperty {
        owner_id,
        title: title.into(),
        description: "description".into(),
        thumbnail_photo_url: "https://images.example.org/thumb.jpg".into(),
        cover_photo_url: "https://images.example.org/cover.jpg".into(),
        cost_per_night,
        street: "536 Namsub Highway".into(),
        city: city.into(),
        province: "Quebec".into(),
        post_code: "28142".into(),
        country: "Canada".into(),
        parking_spaces: 6,
        number_of_bathrooms: 4,
        number_of_bedrooms: 8,
    }
}

async fn seed_user(pool: &PgPool, name: &str) -> UserRow {
    users::create_user(pool, &new_user(name, &format!("{name}@example.org")))
        .await
        .expect("create user")
}

async fn seed_property(pool: &PgPool, owner: &UserRow, city: &str, cents: i32) -> PropertyRow {
    properties::create_property(pool, &new_property(owner.id, "Listing", city, cents))
        .await
        .expect("create property")
}

async fn seed_reservation(
    pool: &PgPool,
    property: &PropertyRow,
    guest: &UserRow,
    start: NaiveDate,
    end: NaiveDate,
) -> i32 {
    sqlx::query_scalar(
        "INSERT INTO reservations (start_date, end_date, property_id, guest_id)
         VALUES ($1, $2, $3, $4) RETURNING id",
    )
    .bind(start)
    .bind(end)
    .bind(property.id)
    .bind(guest.id)
    .fetch_one(pool)
    .await
    .expect("create reservation")
}

async fn seed_review(pool: &PgPool, property: &PropertyRow, guest: &UserRow, rating: i16) {
    let today = Utc::now().date_naive();
    let reservation_id = seed_reservation(
        pool,
        property,
        guest,
        today - Duration::days(30),
        today - Duration::days(20),
    )
    .await;

    sqlx::query(
        "INSERT INTO property_reviews (guest_id, property_id, reservation_id, rating, message)
         VALUES ($1, $2, $3, $4, 'ok')",
    )
    .bind(guest.id)
    .bind(property.id)
    .bind(reservation_id)
    .bind(rating)
    .execute(pool)
    .await
    .expect("create review");
}

// ============================================================
// users
// ============================================================

#[sqlx::test(migrations = "../../migrations")]
#[ignore = "requires database"]
async fn unknown_email_is_none(pool: PgPool) {
    let found = users::get_user_by_email(&pool, "nobody@example.org")
        .await
        .expect("lookup should not fail");
    assert!(found.is_none());
}

#[sqlx::test(migrations = "../../migrations")]
#[ignore = "requires database"]
async fn created_user_is_found_by_id_and_email(pool: PgPool) {
    let input = new_user("Devin Sanders", "tristanjacobs@gmail.com");
    let created = users::create_user(&pool, &input).await.unwrap();

    assert_eq!(created.name, input.name);
    assert_eq!(created.email, input.email);
    assert_eq!(created.password, input.password);

    let by_id = users::get_user_by_id(&pool, created.id).await.unwrap();
    assert_eq!(by_id, Some(created.clone()));

    let by_email = users::get_user_by_email(&pool, &input.email).await.unwrap();
    assert_eq!(by_email, Some(created));
}

#[sqlx::test(migrations = "../../migrations")]
#[ignore = "requires database"]
async fn duplicate_email_surfaces_the_database_error(pool: PgPool) {
    let input = new_user("A", "dup@example.org");
    users::create_user(&pool, &input).await.unwrap();

    let err = users::create_user(&pool, &input).await.unwrap_err();
    match err {
        db::DbError::Sqlx(sqlx::Error::Database(e)) => assert!(e.is_unique_violation()),
        other => panic!("expected a unique violation, got {other:?}"),
    }
}

// ============================================================
// reservations
// ============================================================

#[sqlx::test(migrations = "../../migrations")]
#[ignore = "requires database"]
async fn only_finished_reservations_are_listed_in_start_order(pool: PgPool) {
    let owner = seed_user(&pool, "owner").await;
    let guest = seed_user(&pool, "guest").await;
    let cabin = seed_property(&pool, &owner, "Banff", 20_000).await;
    let today = Utc::now().date_naive();

    let later = seed_reservation(&pool, &cabin, &guest, today - Duration::days(10), today - Duration::days(8)).await;
    let earlier = seed_reservation(&pool, &cabin, &guest, today - Duration::days(60), today - Duration::days(55)).await;
    seed_reservation(&pool, &cabin, &guest, today + Duration::days(5), today + Duration::days(9)).await;
    seed_reservation(&pool, &cabin, &guest, today - Duration::days(2), today + Duration::days(2)).await;

    let rows = reservations::list_past_reservations(&pool, guest.id, 10).await.unwrap();
    let ids: Vec<i32> = rows.iter().map(|r| r.reservation_id).collect();
    assert_eq!(ids, vec![earlier, later]);
    assert!(rows.iter().all(|r| r.end_date < today + Duration::days(1)));
    assert!(rows.iter().all(|r| r.property.id == cabin.id));
    assert!(rows.iter().all(|r| r.average_rating.is_none()));
}

#[sqlx::test(migrations = "../../migrations")]
#[ignore = "requires database"]
async fn reservation_ending_today_is_listed(pool: PgPool) {
    let owner = seed_user(&pool, "owner").await;
    let guest = seed_user(&pool, "guest").await;
    let cabin = seed_property(&pool, &owner, "Banff", 20_000).await;
    let today = Utc::now().date_naive();

    let ending_today = seed_reservation(&pool, &cabin, &guest, today - Duration::days(3), today).await;
    seed_reservation(&pool, &cabin, &guest, today - Duration::days(1), today + Duration::days(1)).await;

    let rows = reservations::list_past_reservations(&pool, guest.id, 10).await.unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].reservation_id, ending_today);
    assert_eq!(rows[0].end_date, today);
}

#[sqlx::test(migrations = "../../migrations")]
#[ignore = "requires database"]
async fn past_reservations_respect_the_limit(pool: PgPool) {
    let owner = seed_user(&pool, "owner").await;
    let guest = seed_user(&pool, "guest").await;
    let cabin = seed_property(&pool, &owner, "Banff", 20_000).await;
    let today = Utc::now().date_naive();

    for weeks in 1..=5 {
        let start = today - Duration::weeks(weeks * 2);
        seed_reservation(&pool, &cabin, &guest, start, start + Duration::days(3)).await;
    }

    let rows = reservations::list_past_reservations(&pool, guest.id, 3).await.unwrap();
    assert_eq!(rows.len(), 3);
    assert!(rows.windows(2).all(|w| w[0].start_date <= w[1].start_date));
}

// ============================================================
// properties
// ============================================================

#[sqlx::test(migrations = "../../migrations")]
#[ignore = "requires database"]
async fn unfiltered_listing_is_cheapest_first_and_capped(pool: PgPool) {
    let owner = seed_user(&pool, "owner").await;
    for cents in [30_000, 10_000, 25_000, 5_000] {
        seed_property(&pool, &owner, "Toronto", cents).await;
    }

    let rows = properties::list_properties(&pool, &PropertyFilter::new(), 3).await.unwrap();
    let costs: Vec<i32> = rows.iter().map(|r| r.property.cost_per_night).collect();
    assert_eq!(costs, vec![5_000, 10_000, 25_000]);
}

#[sqlx::test(migrations = "../../migrations")]
#[ignore = "requires database"]
async fn price_range_is_inclusive_in_cents(pool: PgPool) {
    let owner = seed_user(&pool, "owner").await;
    for cents in [9_999, 10_000, 15_000, 20_000, 20_001] {
        seed_property(&pool, &owner, "Toronto", cents).await;
    }

    let filter = PropertyFilter::new().price_range(Some(100.0), Some(200.0));
    let rows = properties::list_properties(&pool, &filter, 10).await.unwrap();
    let costs: Vec<i32> = rows.iter().map(|r| r.property.cost_per_night).collect();
    assert_eq!(costs, vec![10_000, 15_000, 20_000]);

    let floor_only = PropertyFilter::new().price_range(Some(150.0), None);
    let rows = properties::list_properties(&pool, &floor_only, 10).await.unwrap();
    assert!(rows.iter().all(|r| r.property.cost_per_night >= 15_000));
    assert_eq!(rows.len(), 3);

    let ceiling_only = PropertyFilter::new().price_range(None, Some(150.0));
    let rows = properties::list_properties(&pool, &ceiling_only, 10).await.unwrap();
    assert!(rows.iter().all(|r| r.property.cost_per_night <= 15_000));
    assert_eq!(rows.len(), 3);
}

#[sqlx::test(migrations = "../../migrations")]
#[ignore = "requires database"]
async fn city_filter_is_a_case_insensitive_substring(pool: PgPool) {
    let owner = seed_user(&pool, "owner").await;
    seed_property(&pool, &owner, "Vancouver", 10_000).await;
    seed_property(&pool, &owner, "North Vancouver", 11_000).await;
    seed_property(&pool, &owner, "Calgary", 12_000).await;
    seed_property(&pool, &owner, "100%_Town", 13_000).await;

    let rows = properties::list_properties(&pool, &PropertyFilter::new().city("van"), 10)
        .await
        .unwrap();
    assert_eq!(rows.len(), 2);
    assert!(rows.iter().all(|r| r.property.city.to_lowercase().contains("van")));

    // Metacharacters in the search text match literally.
    let rows = properties::list_properties(&pool, &PropertyFilter::new().city("0%_t"), 10)
        .await
        .unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].property.city, "100%_Town");
}

#[sqlx::test(migrations = "../../migrations")]
#[ignore = "requires database"]
async fn minimum_rating_filters_on_the_average(pool: PgPool) {
    let owner = seed_user(&pool, "owner").await;
    let guest = seed_user(&pool, "guest").await;
    let loved = seed_property(&pool, &owner, "Vancouver", 10_000).await;
    let mixed = seed_property(&pool, &owner, "Vancouver", 11_000).await;
    let unreviewed = seed_property(&pool, &owner, "Vancouver", 12_000).await;

    seed_review(&pool, &loved, &guest, 5).await;
    seed_review(&pool, &loved, &guest, 4).await;
    // A single 5 on an otherwise poor listing does not lift the average to 4.
    seed_review(&pool, &mixed, &guest, 5).await;
    seed_review(&pool, &mixed, &guest, 2).await;

    let all = properties::list_properties(&pool, &PropertyFilter::new(), 10).await.unwrap();
    assert_eq!(all.len(), 3);
    let unrated = all.iter().find(|r| r.property.id == unreviewed.id).unwrap();
    assert!(unrated.average_rating.is_none());

    let filter = PropertyFilter::new().city("van").minimum_rating(4.0);
    let rows = properties::list_properties(&pool, &filter, 10).await.unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].property.id, loved.id);
    assert_eq!(rows[0].average_rating, Some(4.5));
}

#[sqlx::test(migrations = "../../migrations")]
#[ignore = "requires database"]
async fn created_property_appears_once_under_its_owner(pool: PgPool) {
    let owner = seed_user(&pool, "owner").await;
    let guest = seed_user(&pool, "guest").await;
    let other = seed_user(&pool, "other").await;
    seed_property(&pool, &other, "Ottawa", 9_000).await;

    let created = seed_property(&pool, &owner, "Ottawa", 18_000).await;
    seed_review(&pool, &created, &guest, 3).await;
    seed_review(&pool, &created, &guest, 4).await;

    let rows = properties::list_properties(&pool, &PropertyFilter::new().owner(owner.id), 10)
        .await
        .unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].property, created);
}

#[sqlx::test(migrations = "../../migrations")]
#[ignore = "requires database"]
async fn unknown_owner_surfaces_the_foreign_key_error(pool: PgPool) {
    let err = properties::create_property(&pool, &new_property(4242, "Ghost", "Nowhere", 100))
        .await
        .unwrap_err();
    match err {
        db::DbError::Sqlx(sqlx::Error::Database(e)) => assert!(e.is_foreign_key_violation()),
        other => panic!("expected a foreign key violation, got {other:?}"),
    }
}

#[sqlx::test(migrations = "../../migrations")]
#[ignore = "requires database"]
async fn concurrent_lookups_each_get_their_own_user(pool: PgPool) {
    let mut expected = Vec::new();
    for i in 0..8 {
        expected.push(seed_user(&pool, &format!("user{i}")).await);
    }

    let handles: Vec<_> = expected
        .iter()
        .map(|user| {
            let pool = pool.clone();
            let email = user.email.clone();
            tokio::spawn(async move { users::get_user_by_email(&pool, &email).await })
        })
        .collect();

    for (user, handle) in expected.into_iter().zip(handles) {
        let found = handle.await.expect("task panicked").expect("lookup failed");
        assert_eq!(found, Some(user));
    }
}
