// src/cli/handlers/mod.rs

pub mod clone;
pub mod forward;
pub mod help;
pub mod info;
pub mod stack;
pub mod target;
pub mod xdebug;
