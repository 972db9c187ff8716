//! shakesearch - Multi-strategy search over a fixed text corpus
//!
//! Shared modules for the shakesearch server and CLI.
//!
//! - **`corpus`**: loading and normalizing the immutable text.
//! - **`matcher`**: the five search strategies behind one `Matcher` trait.
//! - **`dispatch`**: the race dispatcher that runs every strategy at once.
//! - **`server`**: the HTTP boundary.
//! - **`config`**: file, environment, and default settings.

pub mod config;
pub mod corpus;
pub mod dispatch;
pub mod errors;
pub mod matcher;
pub mod server;
