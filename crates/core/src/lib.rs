//! Pure domain logic for the agency management backend.
//!
//! Nothing in this crate touches the database or the network. Handlers in
//! `agency-api` gather rows through `agency-db` and hand plain values to the
//! functions here.

pub mod allocation;
pub mod calendar;
pub mod cost;
pub mod error;
pub mod metrics;
pub mod project;
pub mod revenue;
pub mod team;
pub mod types;
pub mod validation;
