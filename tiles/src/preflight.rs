//! Checks run once before a generation run starts.

use std::fmt;

use smarttile_openai::{is_latin1, ErrorKind};

use crate::backend::{ImageBackend, TextCompleter};
use crate::request::GenerationRequest;

/// Page with setup instructions for the web UI and the API key.
pub const HELP_URL: &str =
    "https://cubic-plier-2dd.notion.site/Help-f53d1d8bd1064b90bbf6a86ee3768d25?pvs=4";

/// Prompt of the completion that checks the key.
const KEY_CHECK_PROMPT: &str = "test";

/// Result of the preflight checks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValidationOutcome {
    Ok,
    FolderMissing,
    ServiceUnreachable,
    InvalidKeyEncoding,
    AuthenticationFailed,
    RateLimited,
    ApiError,
    ApiConnectionError,
}

impl ValidationOutcome {
    pub fn is_ok(&self) -> bool {
        matches!(self, ValidationOutcome::Ok)
    }

    /// Short machine-friendly name.
    pub fn code(&self) -> &'static str {
        match self {
            ValidationOutcome::Ok => "ok",
            ValidationOutcome::FolderMissing => "folder_missing",
            ValidationOutcome::ServiceUnreachable => "service_unreachable",
            ValidationOutcome::InvalidKeyEncoding => "invalid_key_encoding",
            ValidationOutcome::AuthenticationFailed => "authentication_failed",
            ValidationOutcome::RateLimited => "rate_limited",
            ValidationOutcome::ApiError => "api_error",
            ValidationOutcome::ApiConnectionError => "api_connection_error",
        }
    }

    /// Remediation text shown to the user.
    pub fn message(&self) -> &'static str {
        match self {
            ValidationOutcome::Ok => "All checks passed.",
            ValidationOutcome::FolderMissing => {
                "The output folder does not exist. Choose an existing folder or create it first."
            }
            ValidationOutcome::ServiceUnreachable => {
                "Could not reach Stable Diffusion. Make sure the web UI is running with the --api flag."
            }
            ValidationOutcome::InvalidKeyEncoding => {
                "The OpenAI key contains characters that cannot be sent. Paste the key again."
            }
            ValidationOutcome::AuthenticationFailed => {
                "OpenAI rejected the key. Check that you entered a valid OpenAI key."
            }
            ValidationOutcome::RateLimited => {
                "OpenAI rate limit or quota reached. Wait a moment or check your plan and billing."
            }
            ValidationOutcome::ApiError => "OpenAI returned an error. Try again later.",
            ValidationOutcome::ApiConnectionError => {
                "Could not connect to OpenAI. Check your internet connection."
            }
        }
    }
}

impl fmt::Display for ValidationOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.message())
    }
}

impl From<ErrorKind> for ValidationOutcome {
    fn from(kind: ErrorKind) -> Self {
        match kind {
            ErrorKind::Authentication => ValidationOutcome::AuthenticationFailed,
            ErrorKind::RateLimit => ValidationOutcome::RateLimited,
            ErrorKind::Api => ValidationOutcome::ApiError,
            ErrorKind::Connection => ValidationOutcome::ApiConnectionError,
        }
    }
}

/// Runs the four preflight checks in order and stops at the first failure:
/// output folder, image service reachability, key encoding, key validity.
pub struct PreflightValidator<'a> {
    completer: &'a dyn TextCompleter,
    backend: &'a dyn ImageBackend,
    temperature: f32,
    max_tokens: u32,
}

impl<'a> PreflightValidator<'a> {
    pub fn new(
        completer: &'a dyn TextCompleter,
        backend: &'a dyn ImageBackend,
        temperature: f32,
        max_tokens: u32,
    ) -> Self {
        Self {
            completer,
            backend,
            temperature,
            max_tokens,
        }
    }

    pub async fn validate(&self, request: &GenerationRequest) -> ValidationOutcome {
        if !request.output_dir().is_dir() {
            tracing::warn!(dir = %request.output_dir().display(), "output folder missing");
            return ValidationOutcome::FolderMissing;
        }

        if let Err(e) = self.backend.ping().await {
            tracing::warn!(error = %e, "image service unreachable");
            return ValidationOutcome::ServiceUnreachable;
        }

        if !is_latin1(request.credential()) {
            tracing::warn!("api key is not latin-1");
            return ValidationOutcome::InvalidKeyEncoding;
        }

        if let Err(e) = self
            .completer
            .complete(KEY_CHECK_PROMPT, self.temperature, self.max_tokens)
            .await
        {
            tracing::warn!(error = %e, "key check completion failed");
            return e.kind.into();
        }

        tracing::debug!("preflight passed");
        ValidationOutcome::Ok
    }
}
