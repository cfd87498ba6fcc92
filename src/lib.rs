//! # palavra
//!
//! Fetches Priberam's "palavra do dia" RSS feed, scrapes the dictionary
//! markup embedded in each item and serves the result as JSON.
//!
//! - [`feed`]: Feed fetching and the scraping pipeline
//! - [`storage`]: SQLite subscriber store
//! - [`server`]: axum routes for words and subscriptions
//! - [`digest`]: Daily digest email rendering and recipient lookup
//! - [`mailer`]: SMTP delivery of the digest
//! - [`config`]: TOML configuration

pub mod config;
pub mod digest;
pub mod feed;
pub mod mailer;
pub mod server;
pub mod storage;
