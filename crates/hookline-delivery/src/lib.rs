//! Hookline Delivery: one destination, one payload, bounded retries.
//!
//! `DeliveryClient` applies the per-attempt timeout and retry policy on top
//! of an `HttpTransport`. Failures are reported, never raised.

pub mod client;
pub mod policy;
pub mod reqwest_transport;

pub use client::{DeliveryClient, DeliveryReport};
pub use policy::DeliveryPolicy;
pub use reqwest_transport::ReqwestTransport;
