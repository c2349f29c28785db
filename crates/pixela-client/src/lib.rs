//! Pixela HTTP client
//!
//! A [`GraphApi`](pixela_interfaces::GraphApi) implementation that talks to
//! the Pixela REST API with `reqwest`.

pub mod client;
pub mod config;

pub use client::{create_pixela_client, PixelaClient, USER_TOKEN_HEADER};
pub use config::{PixelaClientConfig, DEFAULT_BASE_URL};
