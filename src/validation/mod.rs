use chrono::{DateTime, Duration, Utc};
use serde::Deserialize;

use crate::db::models::video_models::{NewVideo, VideoStatus};
use crate::error::Error;

pub mod duration;

/// Incoming payload for registering a video. The duration arrives either as
/// a number of seconds or as an ISO-8601 string; `validate_create` resolves
/// it to a single canonical span so nothing downstream sees the union.
#[derive(Debug, Clone, Deserialize)]
pub struct VideoCreatePayload {
    pub video_path: String,
    pub start_time: DateTime<Utc>,
    pub duration: DurationInput,
    pub camera_number: i32,
    pub location: String,
}

/// Duration as supplied by the client
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum DurationInput {
    Seconds(i64),
    SecondsFloat(f64),
    Iso8601(String),
}

/// Validate a creation payload, returning a normalized record ready for the
/// persistence layer. Pure; no side effects.
pub fn validate_create(payload: VideoCreatePayload) -> Result<NewVideo, Error> {
    if payload.video_path.trim().is_empty() {
        return Err(Error::Validation("video_path cannot be empty".to_string()));
    }
    if payload.location.trim().is_empty() {
        return Err(Error::Validation("location cannot be empty".to_string()));
    }
    if payload.camera_number <= 0 {
        return Err(Error::Validation(
            "camera_number must be positive".to_string(),
        ));
    }

    let duration = resolve_duration(&payload.duration)?;
    if duration <= Duration::zero() {
        return Err(Error::Validation("duration must be positive".to_string()));
    }

    Ok(NewVideo {
        video_path: payload.video_path,
        start_time: payload.start_time,
        duration,
        camera_number: payload.camera_number,
        location: payload.location,
    })
}

fn resolve_duration(input: &DurationInput) -> Result<Duration, Error> {
    match input {
        DurationInput::Seconds(secs) => Ok(Duration::seconds(*secs)),
        DurationInput::SecondsFloat(secs) => {
            Ok(Duration::milliseconds((secs * 1000.0).round() as i64))
        }
        DurationInput::Iso8601(text) => duration::parse(text).ok_or_else(|| {
            Error::Validation(format!(
                "duration '{}' is not a valid ISO-8601 duration (expected e.g. PT1H or PT30M)",
                text
            ))
        }),
    }
}

/// Validate a status string against the three known processing states.
pub fn validate_status(status: &str) -> Result<VideoStatus, Error> {
    status.parse()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn payload(duration: DurationInput) -> VideoCreatePayload {
        VideoCreatePayload {
            video_path: "cam1.mp4".to_string(),
            start_time: Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap(),
            duration,
            camera_number: 1,
            location: "lobby".to_string(),
        }
    }

    #[test]
    fn test_create_accepts_iso8601_string() {
        let video = validate_create(payload(DurationInput::Iso8601("PT1H".to_string()))).unwrap();
        assert_eq!(video.duration, Duration::hours(1));

        let video = validate_create(payload(DurationInput::Iso8601("PT30M".to_string()))).unwrap();
        assert_eq!(video.duration, Duration::minutes(30));
    }

    #[test]
    fn test_create_accepts_native_seconds() {
        let video = validate_create(payload(DurationInput::Seconds(7200))).unwrap();
        assert_eq!(video.duration, Duration::hours(2));

        let video = validate_create(payload(DurationInput::SecondsFloat(0.5))).unwrap();
        assert_eq!(video.duration, Duration::milliseconds(500));
    }

    #[test]
    fn test_create_rejects_blank_video_path() {
        for path in ["", "   "] {
            let mut p = payload(DurationInput::Seconds(60));
            p.video_path = path.to_string();
            let err = validate_create(p).unwrap_err();
            assert_eq!(err.to_string(), "video_path cannot be empty");
        }
    }

    #[test]
    fn test_create_rejects_blank_location() {
        for location in ["", "  \t"] {
            let mut p = payload(DurationInput::Seconds(60));
            p.location = location.to_string();
            let err = validate_create(p).unwrap_err();
            assert_eq!(err.to_string(), "location cannot be empty");
        }
    }

    #[test]
    fn test_create_rejects_non_positive_camera_number() {
        for camera_number in [0, -3] {
            let mut p = payload(DurationInput::Seconds(60));
            p.camera_number = camera_number;
            let err = validate_create(p).unwrap_err();
            assert_eq!(err.to_string(), "camera_number must be positive");
        }
    }

    #[test]
    fn test_create_rejects_non_positive_durations() {
        let cases = [
            DurationInput::Seconds(0),
            DurationInput::Seconds(-5),
            DurationInput::Iso8601("PT0S".to_string()),
            DurationInput::Iso8601("-PT1H".to_string()),
        ];
        for duration in cases {
            let err = validate_create(payload(duration)).unwrap_err();
            assert_eq!(err.to_string(), "duration must be positive");
        }
    }

    #[test]
    fn test_create_rejects_malformed_duration_strings() {
        for text in ["1 hour", "PT", "P", "PTH", "90s"] {
            let err =
                validate_create(payload(DurationInput::Iso8601(text.to_string()))).unwrap_err();
            assert!(
                err.to_string().contains("ISO-8601"),
                "unexpected message: {}",
                err
            );
        }
    }

    #[test]
    fn test_status_accepts_known_values() {
        assert_eq!(validate_status("new").unwrap(), VideoStatus::New);
        assert_eq!(validate_status("transcoded").unwrap(), VideoStatus::Transcoded);
        assert_eq!(validate_status("recognized").unwrap(), VideoStatus::Recognized);
    }

    #[test]
    fn test_status_rejects_unknown_values() {
        for status in ["processed", "NEW", ""] {
            let err = validate_status(status).unwrap_err();
            assert_eq!(
                err.to_string(),
                "Invalid status. Must be one of: new, transcoded, recognized"
            );
        }
    }
}
