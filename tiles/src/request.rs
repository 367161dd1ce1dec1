//! Run requests and credential resolution.

use std::fmt;
use std::path::{Path, PathBuf};

/// Environment variable that supplies the completion API key.
pub const CREDENTIAL_ENV: &str = "OPENAI_API_KEY";

/// Longest theme accepted, in characters.
pub const MAX_THEME_CHARS: usize = 150;

/// Inputs of one generation run. Immutable once created.
#[derive(Clone)]
pub struct GenerationRequest {
    theme: String,
    credential: String,
    output_dir: PathBuf,
}

impl GenerationRequest {
    /// Creates a request. Themes longer than [`MAX_THEME_CHARS`] are cut to that length.
    ///
    /// An empty theme is kept as-is and yields generic materials.
    pub fn new(
        theme: impl Into<String>,
        credential: impl Into<String>,
        output_dir: impl Into<PathBuf>,
    ) -> Self {
        let mut theme = theme.into();
        if let Some((cut, _)) = theme.char_indices().nth(MAX_THEME_CHARS) {
            theme.truncate(cut);
        }
        Self {
            theme,
            credential: credential.into(),
            output_dir: output_dir.into(),
        }
    }

    pub fn theme(&self) -> &str {
        &self.theme
    }

    /// The key checked by preflight. It must be the key the pipeline's
    /// completer was built with; the completer never sees this value.
    pub fn credential(&self) -> &str {
        &self.credential
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }
}

impl fmt::Debug for GenerationRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GenerationRequest")
            .field("theme", &self.theme)
            .field("credential", &mask_credential(&self.credential))
            .field("output_dir", &self.output_dir)
            .finish()
    }
}

/// Where a credential came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CredentialSource {
    /// The `OPENAI_API_KEY` environment variable.
    Environment,
    /// Typed by the user or read from saved configuration.
    Input,
}

/// A resolved API credential.
#[derive(Clone, PartialEq, Eq)]
pub struct Credential {
    value: String,
    source: CredentialSource,
}

impl Credential {
    /// Picks the credential to use. The environment value wins over user
    /// input; empty values count as absent.
    pub fn resolve(env: Option<String>, input: Option<String>) -> Option<Self> {
        if let Some(value) = env.filter(|v| !v.is_empty()) {
            return Some(Self {
                value,
                source: CredentialSource::Environment,
            });
        }
        input.filter(|v| !v.is_empty()).map(|value| Self {
            value,
            source: CredentialSource::Input,
        })
    }

    /// Resolves against the process environment.
    pub fn from_env_or(input: Option<String>) -> Option<Self> {
        Self::resolve(std::env::var(CREDENTIAL_ENV).ok(), input)
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    pub fn source(&self) -> CredentialSource {
        self.source
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credential")
            .field("value", &mask_credential(&self.value))
            .field("source", &self.source)
            .finish()
    }
}

/// Masks a key for display, keeping the first and last four characters of
/// keys longer than eight.
pub fn mask_credential(key: &str) -> String {
    let chars: Vec<char> = key.chars().collect();
    if chars.len() <= 8 {
        return "*".repeat(chars.len());
    }
    let head: String = chars[..4].iter().collect();
    let tail: String = chars[chars.len() - 4..].iter().collect();
    format!("{}{}{}", head, "*".repeat(chars.len() - 8), tail)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_theme_truncated_to_max() {
        let long = "x".repeat(200);
        let req = GenerationRequest::new(long, "sk", "/tmp");
        assert_eq!(req.theme().chars().count(), MAX_THEME_CHARS);

        let multibyte = "é".repeat(151);
        let req = GenerationRequest::new(multibyte, "sk", "/tmp");
        assert_eq!(req.theme().chars().count(), MAX_THEME_CHARS);
    }

    #[test]
    fn test_empty_theme_kept() {
        let req = GenerationRequest::new("", "sk", "/tmp");
        assert_eq!(req.theme(), "");
    }

    #[test]
    fn test_environment_takes_priority() {
        let c = Credential::resolve(Some("sk-env".into()), Some("sk-typed".into())).unwrap();
        assert_eq!(c.value(), "sk-env");
        assert_eq!(c.source(), CredentialSource::Environment);
    }

    #[test]
    fn test_input_used_without_environment() {
        let c = Credential::resolve(None, Some("sk-typed".into())).unwrap();
        assert_eq!(c.value(), "sk-typed");
        assert_eq!(c.source(), CredentialSource::Input);

        let c = Credential::resolve(Some(String::new()), Some("sk-typed".into())).unwrap();
        assert_eq!(c.source(), CredentialSource::Input);

        assert!(Credential::resolve(None, Some(String::new())).is_none());
    }

    #[test]
    fn test_debug_masks_key() {
        let req = GenerationRequest::new("space ship", "sk-1234567890abcd", "/tmp");
        let s = format!("{:?}", req);
        assert!(!s.contains("1234567890"));
        assert!(s.contains("sk-1"));
    }

    #[test]
    fn test_mask_credential() {
        assert_eq!(mask_credential("short"), "*****");
        assert_eq!(mask_credential("sk-abcdefghijkl"), "sk-a*******ijkl");
        assert_eq!(mask_credential("sk-ééééééééé"), "sk-é****éééé");
    }
}
