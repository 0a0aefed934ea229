use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::FromRow;
use uuid::Uuid;

/// Public prayer request submission, reviewed by staff
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct PrayerRequest {
    pub id: Uuid,
    pub name: String,
    pub email: Option<String>,
    pub request: String,
    pub is_reviewed: bool,
    pub created_at: DateTime<Utc>,
}

/// Public contact form submission
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct ContactMessage {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub subject: String,
    pub message: String,
    pub is_read: bool,
    pub created_at: DateTime<Utc>,
}
