// Infrastructure layer - External dependencies and adapters
pub mod chunked_frames;
pub mod config;
pub mod frame_mapper;
pub mod http_response;
pub mod random_source;
