//! # System Interaction Layer
//!
//! Boundary between the core logic and the operating system.
//!
//! ## Modules
//!
//! - **`executor`**: typed backend commands and the `Backend` trait, with a process-spawning
//!   implementation used for `docker-compose` and `git`. Handles attached and captured runs
//!   and maps exit statuses.
//! - **`prompt`**: yes/no confirmation through `dialoguer`, answering with the default when
//!   there is no terminal to ask on.

pub mod executor;
pub mod prompt;
