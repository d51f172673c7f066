use crate::config::ApiConfig;
use crate::error::Error;
use anyhow::Result;
use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use log::{error, info};
use sqlx::PgPool;
use serde::Serialize;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};

pub mod video_controller;

// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub db_pool: Arc<PgPool>,
}

pub type ApiResult<T> = std::result::Result<T, ApiError>;

#[derive(Debug, Serialize)]
pub struct ApiError {
    pub message: String,
    pub status: u16,
}

impl From<Error> for ApiError {
    fn from(err: Error) -> Self {
        match err {
            Error::Validation(_) => ApiError {
                message: err.to_string(),
                status: StatusCode::UNPROCESSABLE_ENTITY.as_u16(),
            },
            Error::NotFound(_) => ApiError {
                message: err.to_string(),
                status: StatusCode::NOT_FOUND.as_u16(),
            },
            Error::Database(_) => ApiError {
                message: err.to_string(),
                status: StatusCode::INTERNAL_SERVER_ERROR.as_u16(),
            },
        }
    }
}

impl From<anyhow::Error> for ApiError {
    fn from(err: anyhow::Error) -> Self {
        if let Some(err) = err.downcast_ref::<Error>() {
            return (*err).clone().into();
        }

        ApiError {
            message: err.to_string(),
            status: StatusCode::INTERNAL_SERVER_ERROR.as_u16(),
        }
    }
}

/// Implement IntoResponse for ApiError
impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = StatusCode::from_u16(self.status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        let body = Json(self);
        (status, body).into_response()
    }
}

pub struct RestApi {
    config: ApiConfig,
    db_pool: Arc<PgPool>,
}

impl RestApi {
    pub fn new(config: &ApiConfig, db_pool: Arc<PgPool>) -> Result<Self> {
        Ok(Self {
            config: config.clone(),
            db_pool,
        })
    }

    pub async fn run(&self) -> Result<()> {
        let state = AppState {
            db_pool: Arc::clone(&self.db_pool),
        };

        // Create a CORS layer that allows all origins and preflight requests
        use std::time::Duration;
        let cors = CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any)
            .allow_credentials(false)
            .max_age(Duration::from_secs(3600));

        // Build the API router with routes
        let app = Router::new()
            .merge(video_controller::create_router())
            .route("/health", get(health_check))
            .with_state(state)
            .layer(cors);

        // Build the server address
        let addr = self.config.address.clone() + ":" + &self.config.port.to_string();
        let addr: SocketAddr = addr.parse()?;

        info!("API server listening on {}", addr);

        // Create a listener and start the server
        let listener = TcpListener::bind(addr).await?;

        axum::Server::from_tcp(listener.into_std()?)?
            .serve(app.into_make_service())
            .await?;

        Ok(())
    }
}

async fn health_check(State(state): State<AppState>) -> Json<serde_json::Value> {
    let database = match sqlx::query("SELECT 1").execute(&*state.db_pool).await {
        Ok(_) => true,
        Err(e) => {
            error!("Database health check failed: {}", e);
            false
        }
    };

    Json(serde_json::json!({ "database": database }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_status_mapping() {
        let err = ApiError::from(Error::Validation("duration must be positive".to_string()));
        assert_eq!(err.status, 422);
        assert_eq!(err.message, "duration must be positive");

        let err = ApiError::from(Error::NotFound("Video not found".to_string()));
        assert_eq!(err.status, 404);
        assert_eq!(err.message, "Video not found");

        let err = ApiError::from(Error::Database("connection refused".to_string()));
        assert_eq!(err.status, 500);
    }

    #[test]
    fn test_anyhow_error_downcasts_to_api_error() {
        let err: anyhow::Error = Error::NotFound("Video not found".to_string()).into();
        let api_err = ApiError::from(err);
        assert_eq!(api_err.status, 404);
        assert_eq!(api_err.message, "Video not found");

        let opaque = anyhow::anyhow!("storage exploded");
        let api_err = ApiError::from(opaque);
        assert_eq!(api_err.status, 500);
    }
}
