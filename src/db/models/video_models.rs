use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::error::Error;

/// Processing status of a video record
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum VideoStatus {
    /// Freshly registered, not yet processed
    New,
    /// Transcoding pass completed
    Transcoded,
    /// Recognition pass completed
    Recognized,
}

impl VideoStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            VideoStatus::New => "new",
            VideoStatus::Transcoded => "transcoded",
            VideoStatus::Recognized => "recognized",
        }
    }
}

impl std::fmt::Display for VideoStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for VideoStatus {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "new" => Ok(VideoStatus::New),
            "transcoded" => Ok(VideoStatus::Transcoded),
            "recognized" => Ok(VideoStatus::Recognized),
            _ => Err(Error::Validation(
                "Invalid status. Must be one of: new, transcoded, recognized".to_string(),
            )),
        }
    }
}

impl sqlx::Type<sqlx::Postgres> for VideoStatus {
    fn type_info() -> sqlx::postgres::PgTypeInfo {
        sqlx::postgres::PgTypeInfo::with_name("text")
    }
}

// Implement encoding for database storage
impl sqlx::Encode<'_, sqlx::Postgres> for VideoStatus {
    fn encode_by_ref(
        &self,
        buf: &mut sqlx::postgres::PgArgumentBuffer,
    ) -> Result<sqlx::encode::IsNull, Box<dyn std::error::Error + Send + Sync + 'static>> {
        <&str as sqlx::Encode<sqlx::Postgres>>::encode_by_ref(&self.as_str(), buf)
    }
}

// Implement decoding from database. The videos table carries a CHECK
// constraint on status, so an unknown value is a storage fault, not a default.
impl<'r> sqlx::Decode<'r, sqlx::Postgres> for VideoStatus {
    fn decode(
        value: sqlx::postgres::PgValueRef<'r>,
    ) -> Result<Self, Box<dyn std::error::Error + Send + Sync + 'static>> {
        let text = <String as sqlx::Decode<sqlx::Postgres>>::decode(value)?;
        Ok(text.parse::<VideoStatus>()?)
    }
}

/// Video record model
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Video {
    pub id: i32,
    pub video_path: String,
    pub start_time: DateTime<Utc>,
    pub duration: Duration,
    pub camera_number: i32,
    pub location: String,
    pub status: VideoStatus,
    pub created_at: DateTime<Utc>,
}

/// Database row for a video record; duration is kept as a millisecond count
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct VideoDb {
    pub id: i32,
    pub video_path: String,
    pub start_time: DateTime<Utc>,
    pub duration_ms: i64,
    pub camera_number: i32,
    pub location: String,
    pub status: VideoStatus,
    pub created_at: DateTime<Utc>,
}

impl From<VideoDb> for Video {
    fn from(db: VideoDb) -> Self {
        Self {
            id: db.id,
            video_path: db.video_path,
            start_time: db.start_time,
            duration: Duration::milliseconds(db.duration_ms),
            camera_number: db.camera_number,
            location: db.location,
            status: db.status,
            created_at: db.created_at,
        }
    }
}

/// A validated record ready for insertion, produced by the validation layer
#[derive(Debug, Clone)]
pub struct NewVideo {
    pub video_path: String,
    pub start_time: DateTime<Utc>,
    pub duration: Duration,
    pub camera_number: i32,
    pub location: String,
}

/// Search query model; all provided criteria combine with AND
#[derive(Debug, Clone, Default)]
pub struct VideoSearchQuery {
    pub status: Option<Vec<String>>,
    pub camera_number: Option<Vec<i32>>,
    pub location: Option<Vec<String>>,
    pub start_time_from: Option<DateTime<Utc>>,
    pub start_time_to: Option<DateTime<Utc>>,
}
