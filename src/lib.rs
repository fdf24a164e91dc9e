pub mod augment;
pub mod config;
pub mod dataset;
pub mod error;
pub mod geometry;
pub mod logging;
pub mod pose;
pub mod render;
