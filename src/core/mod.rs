pub mod config;
pub mod download;
pub mod manifest;
pub mod paths;
pub mod target;
pub mod template;
