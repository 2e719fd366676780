//! Release file-name parser.
//!
//! Turns raw torrent release names as they appear on listing sites, e.g.
//! `[SubsPlease] Sousou no Frieren - 28 (1080p) [F02B9CEE].mkv`, into a
//! structured [`Release`] with a match-friendly title and an episode number.

mod models;
mod parser;

pub use models::Release;
pub use parser::Parser;
