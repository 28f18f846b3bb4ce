//! # eventhub-adapter-http-axum
//!
//! HTTP adapter built on [axum](https://docs.rs/axum).
//!
//! ## Responsibilities
//! - Serve the JSON API (`/api/signup`, `/api/login`, `/api/events`, …)
//! - Resolve bearer tokens into the requesting user ([`auth::AuthUser`])
//! - Map HTTP requests into application service calls (driving adapter)
//! - Map [`EventHubError`](eventhub_domain::error::EventHubError) into status
//!   codes with a `{"error": "..."}` body
//!
//! ## Dependency rule
//! Depends on `eventhub-app` (for port traits and services) and
//! `eventhub-domain` (for domain types used in request/response mapping).
//! Never leaks axum types into the domain.

pub mod api;
pub mod auth;
pub mod error;
pub mod router;
pub mod state;
