//! Test doubles for the Graph API

pub mod fake_api;
pub use fake_api::FakeGraphApi;
