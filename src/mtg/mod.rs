//! Client for the magicthegathering.io card API.

pub mod api;
pub mod error;
pub mod models;
pub mod query;
pub mod status;
