//! # eventhub-domain
//!
//! Pure domain model for the eventhub event-registration service.
//!
//! ## Responsibilities
//! - Foundational types: typed identifiers, error conventions, timestamps
//! - Define **Users** (login identities holding a password hash)
//! - Define **Events** (things users organise, owned by their creator)
//! - Define **Registrations** (the "user attends event" relationship)
//! - Contain all input validation and invariant enforcement
//!
//! ## Dependency rule
//! This crate has **no internal dependencies**.
//! It must never import anything from `app`, adapters, or external IO crates.
//! All IO boundaries are expressed as traits in the `app` crate (ports).

pub mod error;
pub mod id;
pub mod time;

pub mod event;
pub mod registration;
pub mod user;
