//! # aweber-core
//!
//! Export pipeline for `aweber-dump`.
//!
//! This crate provides:
//! - Environment-sourced configuration
//! - Bearer token resolution (cache, explicit refresh, interactive grant)
//! - Account, list and broadcast walking with pagination
//! - Preview and body text extraction from broadcast HTML
//! - The sorted Markdown report

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![forbid(unsafe_code)]

pub mod api;
pub mod auth;
pub mod config;
mod error;
pub mod export;
pub mod extract;
pub mod message;
pub mod report;

pub use api::ApiClient;
pub use auth::{AuthorizationPrompt, resolve_token};
pub use config::Config;
pub use error::{Error, Result};
pub use export::{ExportSummary, export};
pub use extract::{ExtractedContent, clean_html};
pub use message::{BroadcastMessage, BroadcastStatus};
pub use report::{WriteOutcome, write_report};
