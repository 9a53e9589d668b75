//! Core use-case services.
//!
//! # Responsibility
//! - Compose repository reads into presentation-ready selections.
//! - Keep callers decoupled from storage details.

pub mod author_service;
pub mod selection;
