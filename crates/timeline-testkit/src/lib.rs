//! Test kit for the Twitter timeline client.
//!
//! - [`MockApiServer`] - wiremock server speaking the v1 REST shapes
//! - [`fixtures`] - status, profile and error bodies as Twitter returns them
//! - Tracing configuration for test output
//!
//! # Example
//!
//! ```rust,ignore
//! use timeline_testkit::{MockApiServer, fixtures};
//!
//! #[tokio::test]
//! async fn test_show_status() {
//!     timeline_testkit::init_test_tracing();
//!
//!     let mock = MockApiServer::start().await;
//!     mock.expect_get("/statuses/show/12345.json", fixtures::status(12345, "Hello", 0))
//!         .await;
//!
//!     // point TwitterConfig::api_url at mock.base_url()
//! }
//! ```

#![forbid(unsafe_code)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions)]

pub mod fixtures;
mod mock_server;
mod tracing_config;

pub use mock_server::*;
pub use tracing_config::*;
