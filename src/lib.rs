//! # DailyJournal - a calendar-driven personal journal
//!
//! One entry per day (title, text, mood, tags), kept in a flat JSON file
//! behind a small HTTP API. Clients fall back to a device-local store when
//! the API cannot be reached, and push those entries back with an explicit
//! backfill once it can.
//!
//! ## Quick Start
//!
//! ```bash
//! # Run the API server over ./journal.json
//! dailyjournal serve --port 3000
//!
//! # Write today's entry
//! dailyjournal save 2024-03-15 --title "Trip" -c "Went hiking" --mood 4 --tag travel
//!
//! # Show the month with entry markers
//! dailyjournal month 2024 3
//!
//! # Push entries written while offline
//! dailyjournal backfill
//! ```
//!
//! ## Modules
//!
//! - [`cli`]: Command-line interface definitions and handlers
//! - [`config`]: `.journal.toml` discovery and defaults
//! - [`error`]: Error types and result aliases
//! - [`model`]: Data models (Entry, EntryDraft, projections)
//! - [`storage`]: The `EntryStore` trait and its file, local and HTTP backends
//! - [`selector`]: Remote/local routing with offline fallback
//! - [`server`]: The JSON HTTP API
//! - [`validation`]: Input validation utilities

pub mod calendar;

/// Command-line interface definitions using clap.
pub mod cli;

/// Configuration loading and management.
///
/// Handles `.journal.toml` configuration files.
pub mod config;

/// Error types and result aliases.
///
/// Defines `JournalError` enum and `Result<T>` type alias.
pub mod error;

/// Import and export of `{ "entries": [...] }` documents.
pub mod import_export;

pub mod logging;

pub mod model;

/// Query logic shared by every store.
pub mod search;

pub mod selector;

pub mod server;

pub mod storage;

/// Input validation utilities.
///
/// Validates dates, year/month pairs and IDs.
pub mod validation;
