//! Apartment rental API
//!
//! REST CRUD over apartments, users, bookings, payments, installment plans,
//! inventories and feedback, backed by PostgreSQL or an in-memory store.

pub mod config;
pub mod error;
pub mod models;
pub mod repositories;
pub mod routes;
pub mod services;
pub mod shutdown;
pub mod state;

pub use state::AppState;
