use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Category {
    pub id: i32,
    pub name: String,
    pub slug: String,
    pub created_at: DateTime<Utc>,
}

/// Reading-age bracket (e.g. "0-2", "3-5"). Same shape as Category but kept
/// as its own table; products reference both independently.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct AgeCategory {
    pub id: i32,
    pub name: String,
    pub slug: String,
    pub created_at: DateTime<Utc>,
}
