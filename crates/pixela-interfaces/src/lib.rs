//! Pixela Interfaces
//!
//! This crate provides the wire types of the Pixela Graph API and the
//! [`GraphApi`] trait shared by the HTTP client and the resource provider.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

/// Graph API interfaces
pub mod graph;

/// Re-export key types for convenient usage
pub use graph::{
    ApiResult, GraphApi, GraphCreateInput, GraphDefinition, GraphList, GraphUpdateInput,
    PixelaError, PixelaResult,
};
