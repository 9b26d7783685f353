pub mod api_client;
pub mod config;
pub mod errors;
pub mod image_file;
pub mod preview;
pub mod services;
pub mod testing;
