//! Nyaa listing-page client.
//!
//! Fetches the most recent torrent listing and returns the raw release file
//! names. Parsing those names into episodes is the parser crate's job.

mod client;
mod error;

pub use client::NyaaClient;
pub use error::NyaaError;

pub type Result<T> = std::result::Result<T, NyaaError>;
