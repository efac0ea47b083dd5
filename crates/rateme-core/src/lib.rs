//! Core types and the aggregation engine for the rateme platform.
//!
//! This crate is free of HTTP and database dependencies. The
//! [`store::EntityStore`] trait is the seam every backend implements; the
//! [`engine::Engine`] owns all derived Person statistics on top of it.

// We intentionally use native `async fn` in traits (stabilised in Rust 1.75).
// Suppress the advisory lint about `Send` bounds on the returned futures.
#![allow(async_fn_in_trait)]

pub mod engine;
pub mod error;
pub mod fact;
pub mod locks;
pub mod memory;
pub mod person;
pub mod store;
pub mod tier;
pub mod validate;
pub mod view;

pub use engine::Engine;
pub use error::{Error, Result};
pub use memory::MemoryStore;
