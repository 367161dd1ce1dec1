//! Stable Diffusion web UI API SDK for Rust.
//!
//! This crate provides a client for the `/sdapi/v1` endpoints exposed by a
//! locally running Stable Diffusion web UI.

mod client;
mod error;
pub mod http;
mod image;
mod options;

pub use client::{Client, ClientBuilder, DEFAULT_BASE_URL};
pub use error::{Error, Result};
pub use image::{decode_image, ImageService, PngInfoRequest, PngInfoResponse, Txt2ImgRequest, Txt2ImgResponse};
pub use options::{OptionsRequest, OptionsService, CHECKPOINT_TEXTURE_DIFFUSION};

#[cfg(test)]
mod tests;
