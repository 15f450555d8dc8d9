//! # aweber-oauth
//!
//! `OAuth2` authentication for the AWeber API.
//!
//! ## Features
//!
//! - **Authorization Code Flow**: authorization URL with CSRF `state`,
//!   redirect parsing, code exchange with a client secret
//! - **Token management**: explicit refresh, expiration checking
//! - **Token cache**: JSON file reused across runs until the token expires
//!
//! ## Quick Start
//!
//! ```ignore
//! use aweber_oauth::{AuthorizationCodeFlow, OAuthClient, Provider, TokenCache};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let provider = Provider::aweber()?;
//!     let client = OAuthClient::new("your_client_id", provider)
//!         .with_client_secret("your_secret")
//!         .with_redirect_uri("http://localhost");
//!
//!     let flow = AuthorizationCodeFlow::new(client);
//!     println!("Visit: {}", flow.authorization_url()?);
//!
//!     // The operator pastes the URL the browser was redirected to
//!     let redirect = "http://localhost/?code=...&state=...";
//!     let token = flow.exchange_redirect(redirect).await?;
//!
//!     TokenCache::default().save(&token)?;
//!     Ok(())
//! }
//! ```
//!
//! ### Token Refresh
//!
//! ```ignore
//! if token.is_expired() {
//!     let new_token = client.refresh_token(&token).await?;
//!     cache.save(&new_token)?;
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![forbid(unsafe_code)]

mod error;
pub mod flow;
pub mod provider;
pub mod token;

pub use error::{Error, Result};
pub use flow::{AuthorizationCodeFlow, OAuthClient};
pub use provider::Provider;
pub use token::{CachedToken, Token, TokenCache};
