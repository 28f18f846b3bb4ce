//! # eventhub-app
//!
//! Application layer — use-cases and **port definitions** (traits).
//!
//! ## Responsibilities
//! - Define **port traits** that adapters must implement (driven/outbound ports):
//!   - `UserRepository` — create and look up users
//!   - `EventRepository` — CRUD for events, with ownership checks
//!   - `RegistrationRepository` — register, unregister, membership test
//!   - `PasswordHasher` — one-way password hashing
//!   - `TokenIssuer` — issue and verify authentication tokens
//! - Define **driving/inbound ports** as use-case structs:
//!   - `UserService` — sign up, log in, authenticate
//!   - `EventService` — create, list, get, update, delete
//!   - `RegistrationService` — register, unregister, check
//! - Orchestrate domain objects without knowing *how* persistence or IO works
//!
//! ## Dependency rule
//! Depends on `eventhub-domain` only.
//! Never imports adapter crates. Adapters depend on *this* crate, not the reverse.

pub mod ports;
pub mod services;
