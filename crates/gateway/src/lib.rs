//! Retrieval gateway.
//!
//! Routes a query, fans out to the bound source adapters, and concatenates
//! their text in routing order. Assembled responses are cached by query.
//!
//! # Example
//! ```no_run
//! use datagate_core::AppConfig;
//! use datagate_gateway::Gateway;
//!
//! # async fn example() -> datagate_core::AppResult<()> {
//! let config = AppConfig::load()?;
//! let gateway = Gateway::from_config(&config)?;
//! let response = gateway.answer("What is the capital and population of Germany?").await;
//! println!("{}", response.text);
//! # Ok(())
//! # }
//! ```

pub mod gateway;
pub mod types;


pub use gateway::{cache_key, Gateway};
pub use types::{Gathered, GatewayOptions, GatewayResponse, Section};
