//! JSON REST API for rateme.
//!
//! Exposes an axum [`Router`] backed by an [`Engine`] over any
//! [`EntityStore`]. TLS and transport concerns are the caller's
//! responsibility.
//!
//! # Mounting
//!
//! ```rust,ignore
//! .nest("/api", rateme_api::api_router(engine.clone()))
//! ```

pub mod comments;
pub mod error;
pub mod extract;
pub mod facemash;
pub mod people;
pub mod ratings;
pub mod search;

use std::sync::Arc;

use axum::{
  Router,
  routing::{get, post},
};
use rateme_core::{Engine, store::EntityStore};

pub use error::ApiError;

/// Build a fully-materialised API router for `engine`.
///
/// The returned `Router<()>` can be nested into any parent router regardless
/// of its own state type.
pub fn api_router<S>(engine: Arc<Engine<S>>) -> Router<()>
where
  S: EntityStore + 'static,
{
  Router::new()
    // People
    .route("/people", get(people::list::<S>).post(people::create::<S>))
    .route("/people/top/{limit}", get(people::top::<S>))
    .route("/people/{id}", get(people::get_one::<S>))
    .route("/people/{id}/comments", get(people::comments::<S>))
    .route("/people/{id}/stats", get(people::stats::<S>))
    .route("/people/{id}/view", post(people::view::<S>))
    // Facts
    .route("/ratings", post(ratings::create::<S>))
    .route("/comments", post(comments::create::<S>))
    // FaceMash
    .route("/facemash/random", get(facemash::random::<S>))
    .route("/facemash/vote", post(facemash::vote::<S>))
    .route("/facemash/leaderboard", get(facemash::leaderboard::<S>))
    // Read-side views
    .route("/search", get(search::handler::<S>))
    .route("/stats", get(search::stats::<S>))
    .with_state(engine)
}
