//! # deskmate
//!
//! deskmate fires time-based reminders (work boundaries, hydration) and
//! keeps a local cache of externally sourced data fresh: the daily almanac
//! (huangli), a rolling 3-month holiday window, and a news digest.
//!
//! ## Architecture
//!
//! - [`scheduler`] - trigger compilation and the background job engine
//! - [`sync`] - the sync orchestrator running one pass over all sources
//! - [`sources`] - data-source adapters behind a shared fetch contract
//! - [`cache`] - the durable cache store (`cache.json`)
//! - [`app`] - the assistant context object wiring everything together
//! - [`config`] - JSON configuration with defaults and recovery
//! - [`notify`] - the notification seam (the core never renders UI)
//!
//! Configuration changes recompile the trigger set and swap it atomically;
//! a failing data source never blocks the others, and the cache is written
//! atomically once per sync pass.

pub mod app;
pub mod cache;
pub mod cli;
pub mod config;
pub mod error;
pub mod logging;
pub mod notify;
pub mod scheduler;
pub mod sources;
pub mod sync;
