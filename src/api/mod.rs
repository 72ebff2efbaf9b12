//! Backend integrations.

pub mod client;

pub use client::*;
