//! Building construction cost estimator.
//!
//! [`calculator::CostCalculator`] prices a building from its floor area,
//! floor count, material grade and amenities. [`service::ProjectService`]
//! validates inputs, embeds the resulting breakdown in a [`models::Project`]
//! and persists it through any [`store::ProjectStore`]: SQLite
//! ([`db::Database`]) or in-memory ([`store::MemoryStore`]).

pub mod api;
pub mod calculator;
pub mod client;
pub mod config;
pub mod db;
pub mod error;
pub mod format;
pub mod models;
pub mod service;
pub mod store;
pub mod validation;
