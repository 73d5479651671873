pub mod config;
pub mod ranking;
pub mod scoring;
pub mod tool;
