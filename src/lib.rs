//! Client registry service
//!
//! CRUD record service for client entities with slug-based identity, a
//! best-effort Redis cache in front of the SQLite store, and filesystem
//! blob storage for logo uploads.

pub mod cache;
pub mod config;
pub mod database;
pub mod errors;
pub mod models;
pub mod repositories;
pub mod services;
pub mod storage;
pub mod utils;
pub mod web;
