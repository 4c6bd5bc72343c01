//! Core use-case services.
//!
//! # Responsibility
//! - Run repository operations on a dedicated background worker.
//! - Keep UI layers decoupled from storage and threading details.

pub mod catalog_service;
