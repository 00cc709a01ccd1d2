//! services/api/src/lib.rs
//!
//! Library crate for the SkoolMe API service: configuration, the service
//! error type, the concrete port adapters and the web layer.

pub mod adapters;
pub mod config;
pub mod error;
pub mod web;
