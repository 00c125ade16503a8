pub mod colors;
pub mod config;
pub mod constants;
pub mod error;
pub mod escape;
pub mod render;
pub mod viewport;
pub mod worker;
