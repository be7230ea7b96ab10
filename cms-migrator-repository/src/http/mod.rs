//! HTTP implementations of the source and target collaborators.
//!
//! Both instances speak the same REST dialect, so they share one
//! request/response layer in [`client`].

mod client;
mod legacy;
mod target;

pub use client::HttpApi;
pub use legacy::HttpLegacySource;
pub use target::HttpTargetSink;
