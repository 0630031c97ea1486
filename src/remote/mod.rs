//! HTTP retrieval of dumps published by a running collector.

pub mod client;

pub use client::DumpClient;
