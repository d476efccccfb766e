//! forti-transport: blocking access to the FortiGate REST API
//!
//! This crate provides the trait and request types used to fetch JSON documents from a
//! FortiGate, with feature-gated backends. The default build enables a `mock` backend so
//! that probes can be exercised on any host without a reachable firewall.

mod types;
pub use types::{ApiTarget, Query};

mod error;
pub use error::{Result, TransportError};

mod traits;
pub use traits::ApiClient;

#[cfg(feature = "mock")]
mod mock;

#[cfg(feature = "mock")]
pub use mock::{MockApi, RecordedRequest};

#[cfg(feature = "http")]
mod http;

#[cfg(feature = "http")]
pub use http::HttpApi;
