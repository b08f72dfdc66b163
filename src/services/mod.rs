pub mod analysis_client;
pub mod board;
pub mod frame_service;
pub mod media_service;
pub mod progress;
pub mod transformer;
pub mod upload_session;
pub mod view_model;
