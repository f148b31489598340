//! Publisher console library
//!
//! Administration surfaces for a publisher catalog REST service: a shared
//! busy signal, the resource gateway and entity clients, and the generic
//! paginated controller each entity screen is built on. The
//! `publisher-console` binary drives these from the command line.
//!
//! Notes
//! - Public items are subject to change before 1.0.
//! - The in-memory catalog under [`infra::testing`] backs demo mode and the
//!   integration tests.

pub mod app;
pub mod domains;
pub mod infra;
