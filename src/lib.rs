//! Jornada Engine: working-time tracking for Spanish retail staff
//!
//! This crate keeps employee records, weekly schedules and absences, and
//! derives from them the theoretical annual hours, the ordinary, holiday and
//! leave hour bags, and vacation balances of every employee. It is served as
//! a JSON HTTP API.

#![warn(missing_docs)]

pub mod api;
pub mod calculation;
pub mod config;
pub mod error;
pub mod models;
pub mod services;
pub mod store;
