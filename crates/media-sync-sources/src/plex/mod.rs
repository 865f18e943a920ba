pub mod api;
pub mod auth;
pub mod client;

pub use auth::PlexAccount;
pub use client::{PlexClient, SectionTitles};
