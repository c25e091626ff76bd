//! Shared test helpers for `batchpush-core` integration tests.
//!
//! The mock transport lets the dual-dispatch tests script per-application
//! responses and inspect exactly what went over the wire.

#![allow(dead_code)]

pub mod transport;
