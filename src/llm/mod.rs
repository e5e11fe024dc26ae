//! Chat-completion client and wire types for the upstream model gateway.

mod client;
mod types;

#[cfg(test)]
#[path = "types_tests.rs"]
mod types_tests;

pub use client::ChatClient;
pub use types::*;
