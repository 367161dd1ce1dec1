//! Image generation service.

use std::sync::Arc;

use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use serde::{Deserialize, Serialize};

use super::{error::Result, http::HttpClient};

/// Image generation service.
pub struct ImageService {
    http: Arc<HttpClient>,
}

impl ImageService {
    pub(crate) fn new(http: Arc<HttpClient>) -> Self {
        Self { http }
    }

    /// Generates images from a text prompt.
    ///
    /// Each entry of [`Txt2ImgResponse::images`] is a base64-encoded image.
    pub async fn txt2img(&self, request: &Txt2ImgRequest) -> Result<Txt2ImgResponse> {
        self.http.post("/sdapi/v1/txt2img", request).await
    }

    /// Reads the generation parameters embedded in an image.
    pub async fn png_info(&self, request: &PngInfoRequest) -> Result<PngInfoResponse> {
        self.http.post("/sdapi/v1/png-info", request).await
    }
}

// ==================== Request/Response Types ====================

/// Request for text-to-image generation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Txt2ImgRequest {
    /// Positive prompt.
    pub prompt: String,

    /// Negative prompt.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub negative_prompt: String,

    /// Seed, -1 picks one at random.
    pub seed: i64,

    /// Images per batch.
    pub batch_size: u32,

    /// Number of batches.
    pub n_iter: u32,

    /// Sampling steps.
    pub steps: u32,

    /// Classifier-free guidance scale.
    pub cfg_scale: f32,

    pub width: u32,
    pub height: u32,

    /// Produce output that wraps seamlessly at the edges.
    pub tiling: bool,
}

impl Txt2ImgRequest {
    /// Creates a request with the default tileable 512x512 parameter set.
    pub fn new(prompt: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            negative_prompt: String::new(),
            seed: -1,
            batch_size: 1,
            n_iter: 1,
            steps: 20,
            cfg_scale: 7.0,
            width: 512,
            height: 512,
            tiling: true,
        }
    }
}

/// Response from text-to-image generation.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Txt2ImgResponse {
    /// Base64-encoded images.
    #[serde(default)]
    pub images: Vec<String>,

    /// Echo of the request parameters.
    #[serde(default)]
    pub parameters: serde_json::Value,

    /// JSON-encoded generation info.
    #[serde(default)]
    pub info: String,
}

/// Request for reading image generation parameters.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PngInfoRequest {
    /// Image as a `data:` URL.
    pub image: String,
}

impl PngInfoRequest {
    /// Wraps a bare base64 PNG payload as a `data:` URL.
    pub fn from_base64(payload: &str) -> Self {
        if payload.starts_with("data:") {
            return Self {
                image: payload.to_string(),
            };
        }
        Self {
            image: format!("data:image/png;base64,{}", payload),
        }
    }
}

/// Response from reading image generation parameters.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PngInfoResponse {
    /// Generation parameters as written by the web UI.
    #[serde(default)]
    pub info: String,

    /// Other metadata found in the image.
    #[serde(default)]
    pub items: serde_json::Value,
}

/// Decodes a base64 image payload, with or without a `data:<mime>;base64,` prefix.
pub fn decode_image(payload: &str) -> Result<Vec<u8>> {
    let data = match payload.strip_prefix("data:") {
        Some(rest) => rest.split_once(',').map(|(_, d)| d).unwrap_or(rest),
        None => payload,
    };
    Ok(BASE64.decode(data.trim())?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_txt2img_defaults() {
        let req = Txt2ImgRequest::new("PBR, brick");
        let v = serde_json::to_value(&req).unwrap();
        assert_eq!(v["prompt"], "PBR, brick");
        assert_eq!(v["seed"], -1);
        assert_eq!(v["batch_size"], 1);
        assert_eq!(v["n_iter"], 1);
        assert_eq!(v["steps"], 20);
        assert_eq!(v["cfg_scale"], 7.0);
        assert_eq!(v["width"], 512);
        assert_eq!(v["height"], 512);
        assert_eq!(v["tiling"], true);
        assert!(v.get("negative_prompt").is_none());
    }

    #[test]
    fn test_png_info_request_prefix() {
        assert_eq!(
            PngInfoRequest::from_base64("iVBORw0KGgo=").image,
            "data:image/png;base64,iVBORw0KGgo="
        );
        assert_eq!(
            PngInfoRequest::from_base64("data:image/png;base64,AAAA").image,
            "data:image/png;base64,AAAA"
        );
    }

    #[test]
    fn test_decode_image() {
        let raw = b"\x89PNG\r\n\x1a\nrest".to_vec();
        let encoded = BASE64.encode(&raw);

        assert_eq!(decode_image(&encoded).unwrap(), raw);
        assert_eq!(
            decode_image(&format!("data:image/png;base64,{}", encoded)).unwrap(),
            raw
        );
        assert_eq!(BASE64.encode(decode_image(&encoded).unwrap()), encoded);
    }

    #[test]
    fn test_decode_image_invalid() {
        assert!(matches!(
            decode_image("not base64!!"),
            Err(crate::Error::Base64(_))
        ));
    }

    #[test]
    fn test_txt2img_response_info_defaults() {
        let resp: Txt2ImgResponse = serde_json::from_str(r#"{"images":["AAAA"]}"#).unwrap();
        assert_eq!(resp.images, vec!["AAAA".to_string()]);
        assert!(resp.info.is_empty());
    }
}
