//! Floodgate - Self-Cleaning Windowed Rate Limiting
//!
//! This crate implements per-client request throttling backed by a
//! timer-free, time-windowed counter store. The store holds two
//! overlapping generations of counters and rotates them lazily on
//! access, so cleanup is amortized O(1) with no background jobs.
//!
//! The crate is transport-agnostic: callers feed it a client
//! identifier (and optionally a timestamp) and receive a
//! [`Decision`](ratelimit::Decision) with the allow/deny verdict and
//! quota metadata. Mapping that decision onto a protocol response
//! (e.g. HTTP 429 plus `RateLimit-*` headers) is the adapter's job.

pub mod config;
pub mod error;
pub mod ratelimit;
pub mod store;
