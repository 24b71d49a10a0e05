//! Query routing for datagate.
//!
//! The router maps free text to the ordered set of sources worth consulting.
//! It is a pure function of its [`RoutingConfig`]: no adapters, no I/O.
//!
//! # Example
//! ```
//! use datagate_core::{config::RoutingConfig, SourceKey};
//! use datagate_router::Router;
//!
//! let router = Router::new(&RoutingConfig::default());
//! let sources = router.route("What is the capital and population of Germany?");
//! assert_eq!(sources, vec![SourceKey::ExternalCountry]);
//! ```

pub mod router;

pub use router::{RouteDecision, RouteReason, Router};
