//! MyAnimeList animelist client.
//!
//! MAL renders a user's public anime list as an HTML page with the actual
//! list embedded as a JSON array in the list table's `data-items` attribute.
//! This crate fetches the page, pulls that attribute out and decodes it.

mod client;
mod error;
pub mod models;

pub use client::MalClient;
pub use error::MalError;
pub use models::{AnimeListEntry, WatchStatus};

pub type Result<T> = std::result::Result<T, MalError>;
