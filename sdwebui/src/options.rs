//! Web UI options service.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use super::{error::Result, http::HttpClient};

/// Checkpoint trained on seamless material textures.
pub const CHECKPOINT_TEXTURE_DIFFUSION: &str = "TextureDiffusion_10.ckpt [ded387e0f3]";

/// Options service.
pub struct OptionsService {
    http: Arc<HttpClient>,
}

impl OptionsService {
    pub(crate) fn new(http: Arc<HttpClient>) -> Self {
        Self { http }
    }

    /// Updates web UI options. Only the fields that are set are sent.
    pub async fn set(&self, request: &OptionsRequest) -> Result<()> {
        self.http.post_discard("/sdapi/v1/options", request).await
    }

    /// Selects the model checkpoint used for subsequent generations.
    pub async fn set_checkpoint(&self, checkpoint: &str) -> Result<()> {
        self.set(&OptionsRequest {
            sd_model_checkpoint: Some(checkpoint.to_string()),
        })
        .await
    }
}

/// Request for updating options.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OptionsRequest {
    /// Checkpoint title, e.g. `TextureDiffusion_10.ckpt [ded387e0f3]`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sd_model_checkpoint: Option<String>,
}
