use sqlx::PgPool;

use crate::{
    error::Result,
    models::{AgeCategory, Category},
};

pub async fn get_all_categories(pool: &PgPool) -> Result<Vec<Category>> {
    let categories = sqlx::query_as::<_, Category>("SELECT * FROM categories ORDER BY name ASC")
        .fetch_all(pool)
        .await?;

    Ok(categories)
}

pub async fn get_all_age_categories(pool: &PgPool) -> Result<Vec<AgeCategory>> {
    let age_categories =
        sqlx::query_as::<_, AgeCategory>("SELECT * FROM age_categories ORDER BY name ASC")
            .fetch_all(pool)
            .await?;

    Ok(age_categories)
}

pub async fn category_exists(pool: &PgPool, id: i32) -> Result<bool> {
    let (exists,): (bool,) =
        sqlx::query_as("SELECT EXISTS(SELECT 1 FROM categories WHERE id = $1)")
            .bind(id)
            .fetch_one(pool)
            .await?;

    Ok(exists)
}

pub async fn age_category_exists(pool: &PgPool, id: i32) -> Result<bool> {
    let (exists,): (bool,) =
        sqlx::query_as("SELECT EXISTS(SELECT 1 FROM age_categories WHERE id = $1)")
            .bind(id)
            .fetch_one(pool)
            .await?;

    Ok(exists)
}
