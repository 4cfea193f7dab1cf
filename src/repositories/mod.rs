//! Repository pattern implementation for data access
//!
//! The repository trait is the seam between the record service and the
//! persistent store: business logic depends on the trait, tests substitute
//! in-memory doubles, and production wires in the SQLite implementation.

pub mod client;

pub use client::{ClientRepository, SqliteClientRepository};
