pub mod config;
pub mod draw;
pub mod loader;
pub mod source;
