use sqlx::PgPool;

use crate::{
    error::Result,
    models::{UpdateProfileRequest, User},
};

pub async fn create_user(
    pool: &PgPool,
    first_name: &str,
    last_name: &str,
    email: &str,
    password_hash: &str,
) -> Result<User> {
    let user = sqlx::query_as::<_, User>(
        "INSERT INTO users (first_name, last_name, email, password)
         VALUES ($1, $2, $3, $4)
         RETURNING *",
    )
    .bind(first_name)
    .bind(last_name)
    .bind(email)
    .bind(password_hash)
    .fetch_one(pool)
    .await?;

    Ok(user)
}

pub async fn find_by_email(pool: &PgPool, email: &str) -> Result<Option<User>> {
    let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE email = $1")
        .bind(email)
        .fetch_optional(pool)
        .await?;

    Ok(user)
}

pub async fn find_by_id(pool: &PgPool, id: i32) -> Result<Option<User>> {
    let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = $1")
        .bind(id)
        .fetch_optional(pool)
        .await?;

    Ok(user)
}

pub async fn update_profile(
    pool: &PgPool,
    id: i32,
    req: &UpdateProfileRequest,
    password_hash: &str,
) -> Result<Option<User>> {
    let user = sqlx::query_as::<_, User>(
        "UPDATE users SET
             first_name = $1, last_name = $2, password = $3,
             country = $4, address1 = $5, address2 = $6,
             city = $7, state = $8, zipcode = $9,
             updated_at = NOW()
         WHERE id = $10
         RETURNING *",
    )
    .bind(&req.first_name)
    .bind(&req.last_name)
    .bind(password_hash)
    .bind(&req.country)
    .bind(&req.address1)
    .bind(&req.address2)
    .bind(&req.city)
    .bind(&req.state)
    .bind(&req.zipcode)
    .bind(id)
    .fetch_optional(pool)
    .await?;

    Ok(user)
}
