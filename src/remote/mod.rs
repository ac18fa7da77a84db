//! Resilient client for the CRM's GraphQL endpoint.

pub mod client;

pub use client::{Operation, RemoteClient};
