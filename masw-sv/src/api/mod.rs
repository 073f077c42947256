//! HTTP API handlers for masw-sv
//!
//! Thin 1:1 mappings between routes and the extraction / session /
//! dispersion modules. No business logic lives here.

pub mod extract;
pub mod health;
pub mod process;
pub mod project;
