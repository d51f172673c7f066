use crate::{
    db::models::video_models::{NewVideo, Video, VideoDb, VideoSearchQuery, VideoStatus},
    error::Error,
};
use anyhow::Result;
use chrono::{DateTime, Utc};
use log::info;
use sqlx::PgPool;
use std::sync::Arc;

/// Videos repository for handling video record operations
#[derive(Clone)]
pub struct VideosRepository {
    pub pool: Arc<PgPool>,
}

impl VideosRepository {
    /// Create a new videos repository
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }

    /// Insert a validated record. The database assigns the id; status and
    /// created_at are forced here regardless of client input.
    pub async fn create(&self, video: &NewVideo) -> Result<Video> {
        let result = sqlx::query_as::<_, VideoDb>(
            r#"
            INSERT INTO videos (
                video_path, start_time, duration_ms, camera_number, location, status, created_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING id, video_path, start_time, duration_ms, camera_number, location,
                      status, created_at
            "#,
        )
        .bind(&video.video_path)
        .bind(video.start_time)
        .bind(video.duration.num_milliseconds())
        .bind(video.camera_number)
        .bind(&video.location)
        .bind(VideoStatus::New)
        .bind(Utc::now())
        .fetch_one(&*self.pool)
        .await
        .map_err(|e| Error::Database(format!("Failed to create video: {}", e)))?;

        Ok(Video::from(result))
    }

    /// Get video by ID
    pub async fn get_by_id(&self, id: i32) -> Result<Option<Video>> {
        let result = sqlx::query_as::<_, VideoDb>(
            r#"
            SELECT id, video_path, start_time, duration_ms, camera_number, location,
                   status, created_at
            FROM videos
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&*self.pool)
        .await
        .map_err(|e| Error::Database(format!("Failed to get video by ID: {}", e)))?;

        Ok(result.map(Video::from))
    }

    /// List videos matching the given filters
    pub async fn list(&self, query: &VideoSearchQuery) -> Result<Vec<Video>> {
        // Build dynamic query
        let mut sql = String::from(
            r#"
            SELECT id, video_path, start_time, duration_ms, camera_number, location,
                   status, created_at
            FROM videos
            WHERE 1=1
            "#,
        );

        let mut args: Vec<QueryArg> = Vec::new();
        let mut param_index = 1;

        // Add status filter
        if let Some(statuses) = &query.status {
            if !statuses.is_empty() {
                sql.push_str(&format!(" AND status = ANY(${})", param_index));
                args.push(QueryArg::StringArray(statuses.clone()));
                param_index += 1;
            }
        }

        // Add camera number filter
        if let Some(camera_numbers) = &query.camera_number {
            if !camera_numbers.is_empty() {
                sql.push_str(&format!(" AND camera_number = ANY(${})", param_index));
                args.push(QueryArg::I32Array(camera_numbers.clone()));
                param_index += 1;
            }
        }

        // Add location filter
        if let Some(locations) = &query.location {
            if !locations.is_empty() {
                sql.push_str(&format!(" AND location = ANY(${})", param_index));
                args.push(QueryArg::StringArray(locations.clone()));
                param_index += 1;
            }
        }

        // Add inclusive time range filters
        if let Some(from) = &query.start_time_from {
            sql.push_str(&format!(" AND start_time >= ${}", param_index));
            args.push(QueryArg::DateTime(*from));
            param_index += 1;
        }

        if let Some(to) = &query.start_time_to {
            sql.push_str(&format!(" AND start_time <= ${}", param_index));
            args.push(QueryArg::DateTime(*to));
        }

        // Stable default ordering
        sql.push_str(" ORDER BY id ASC");

        // Execute the query
        let mut query_builder = sqlx::query_as::<_, VideoDb>(&sql);

        for arg in args {
            query_builder = arg.apply_to_query(query_builder);
        }

        let result = query_builder
            .fetch_all(&*self.pool)
            .await
            .map_err(|e| Error::Database(format!("Failed to list videos: {}", e)))?;

        Ok(result.into_iter().map(Video::from).collect())
    }

    /// Update the status of a video, returning the full updated record
    pub async fn update_status(&self, id: i32, status: VideoStatus) -> Result<Video> {
        let result = sqlx::query_as::<_, VideoDb>(
            r#"
            UPDATE videos
            SET status = $1
            WHERE id = $2
            RETURNING id, video_path, start_time, duration_ms, camera_number, location,
                      status, created_at
            "#,
        )
        .bind(status)
        .bind(id)
        .fetch_optional(&*self.pool)
        .await
        .map_err(|e| Error::Database(format!("Failed to update video status: {}", e)))?
        .ok_or_else(|| Error::NotFound("Video not found".to_string()))?;

        info!("Video {} status set to {}", id, status);
        Ok(Video::from(result))
    }
}

/// Helper enum for dynamic query parameters
enum QueryArg {
    DateTime(DateTime<Utc>),
    I32Array(Vec<i32>),
    StringArray(Vec<String>),
}

impl QueryArg {
    // Apply this argument to a query builder
    fn apply_to_query<'a, T>(
        self,
        builder: sqlx::query::QueryAs<'a, sqlx::Postgres, T, sqlx::postgres::PgArguments>,
    ) -> sqlx::query::QueryAs<'a, sqlx::Postgres, T, sqlx::postgres::PgArguments> {
        match self {
            QueryArg::DateTime(dt) => builder.bind(dt),
            QueryArg::I32Array(arr) => builder.bind(arr),
            QueryArg::StringArray(arr) => builder.bind(arr),
        }
    }
}
