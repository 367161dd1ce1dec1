//! OpenAI text completion SDK for Rust.
//!
//! This crate provides a small client for the OpenAI `/completions` endpoint.

mod client;
mod completion;
mod error;
pub mod http;
mod models;

pub use client::{Client, ClientBuilder, DEFAULT_BASE_URL};
pub use completion::{CompletionChoice, CompletionRequest, CompletionResponse, CompletionService, Usage};
pub use error::{Error, ErrorKind, Result};
pub use http::{encode_latin1, is_latin1};
pub use models::*;

#[cfg(test)]
mod tests;
