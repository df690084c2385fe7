//! # STMS Rust Backend
//!
//! Scheduling engine for a school/training-center management system.
//!
//! This crate provides the timetable core of the STMS platform: generation of
//! lesson time slots from configurable school-day parameters, the canonical
//! lesson-number ↔ time mapping, availability/conflict checking for
//! class/teacher/room bookings, and bulk materialization of concrete lessons
//! from recurring weekly templates. The backend exposes a REST API via Axum.
//!
//! ## Features
//!
//! - **Day structure**: Derive the ordered slot sequence of a school day,
//!   lunch break included, from branch settings
//! - **Slot mapping**: Exact lesson-number ↔ time-range lookups plus a
//!   separate nearest-slot lookup for grid rendering
//! - **Availability**: Advisory free-subject/free-room queries with itemized
//!   conflicts; write-time constraint enforcement in the repository
//! - **Generation**: Recurring-template → dated lesson instances over a range
//! - **HTTP API**: RESTful endpoints for the frontend
//!
//! ## Architecture
//!
//! The crate is organized into several logical modules:
//!
//! - [`api`]: Identifier newtypes and domain entities shared across layers
//! - [`models`]: Time-of-day arithmetic, weekday conversions, branch settings
//! - [`timetable`]: Pure scheduling core (slot generation, mapping, grouping)
//! - [`services`]: Repository-backed operations (availability, generation)
//! - [`db`]: Repository pattern and the in-memory persistence backend
//! - [`http`]: Axum-based HTTP server and request handlers

pub mod api;

pub mod db;
pub mod models;

pub mod services;

pub mod timetable;

#[cfg(feature = "http-server")]
pub mod http;
