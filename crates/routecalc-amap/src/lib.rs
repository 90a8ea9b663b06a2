//! AMap (Gaode) Web Service adapter.
//!
//! Builds mode-specific route requests, resolves city names to city-codes for
//! transit queries, and reduces the three response schemas (v3 distance, v5
//! path-finding, v5 transit) to a single [`DistanceResult`].
//!
//! [`DistanceResult`]: routecalc_core::DistanceResult

pub mod calculator;
pub mod citycode;
pub mod client;
pub mod error;
pub mod normalize;
pub mod request;
pub mod types;

pub use calculator::{DistanceCalculator, DistanceSource};
pub use citycode::CitycodeResolver;
pub use client::AmapClient;
pub use error::AmapError;
pub use normalize::{normalize, ModeResponse, NO_ROUTE_INFOCODE, OK_INFOCODE, SUCCESS_STATUS};
pub use request::{build_request, RequestDescriptor, RouteQuery};
