pub mod video_models;
