//! Common library for the apartment rental backend
//!
//! This crate provides the persistence plumbing shared by the services:
//! connection pooling, schema migrations and the database error taxonomy.

pub mod database;
pub mod error;
