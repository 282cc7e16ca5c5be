// src/core/mod.rs

pub mod commons;
pub mod config;
pub mod env_file;
pub mod forwarder;
pub mod lifecycle;
pub mod paths;
pub mod target;
pub mod xdebug;
