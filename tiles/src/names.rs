//! Material name generation.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::backend::TextCompleter;
use crate::error::{Result, TilesError};

/// A material name returned by the completion model.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MaterialName(String);

impl MaterialName {
    /// Builds a name from raw completion text, dropping surrounding
    /// whitespace and a matching pair of quotes.
    pub fn from_completion(raw: &str) -> Self {
        let trimmed = raw.trim();
        let unquoted = ['"', '\'']
            .iter()
            .find_map(|q| {
                trimmed
                    .strip_prefix(*q)
                    .and_then(|s| s.strip_suffix(*q))
            })
            .unwrap_or(trimmed);
        Self(unquoted.trim().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for MaterialName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for MaterialName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Builds the prompt for the next name, excluding every name produced so far.
///
/// The exclusion list is rendered as a bracketed, quoted list, e.g.
/// `other than these ['Concrete', 'Rebar']`.
pub fn name_prompt(theme: &str, previous: &[MaterialName]) -> String {
    let mut prompt = format!(
        "only reply with a one word answer. Name a single material used in {}",
        theme
    );
    if !previous.is_empty() {
        prompt.push_str(" other than these ");
        prompt.push_str(&format_list(previous));
    }
    prompt
}

fn format_list(names: &[MaterialName]) -> String {
    let items: Vec<String> = names.iter().map(|n| quote(n.as_str())).collect();
    format!("[{}]", items.join(", "))
}

/// Quotes a name the way a Python list literal shows it. Single quotes are
/// used unless the name contains a single quote and no double quote. The
/// chosen quote, backslashes and ASCII control characters are escaped;
/// non-ASCII text is left as-is.
fn quote(s: &str) -> String {
    let q = if s.contains('\'') && !s.contains('"') { '"' } else { '\'' };
    let mut out = String::with_capacity(s.len() + 2);
    out.push(q);
    for c in s.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c if c == q => {
                out.push('\\');
                out.push(c);
            }
            c if c.is_ascii_control() => out.push_str(&format!("\\x{:02x}", c as u32)),
            c => out.push(c),
        }
    }
    out.push(q);
    out
}

/// Rejects a run that would produce no names.
pub(crate) fn check_name_count(count: usize) -> Result<()> {
    if count == 0 {
        return Err(TilesError::Config("name_count must be at least 1".to_string()));
    }
    Ok(())
}

/// Produces an ordered list of material names, one completion call at a time.
///
/// Each call sees every name produced before it, so the calls cannot run
/// concurrently. Duplicates are discouraged through the prompt only.
pub struct NameSequencer<'a> {
    completer: &'a dyn TextCompleter,
    temperature: f32,
    max_tokens: u32,
    count: usize,
}

impl<'a> NameSequencer<'a> {
    pub fn new(completer: &'a dyn TextCompleter, temperature: f32, max_tokens: u32, count: usize) -> Self {
        Self {
            completer,
            temperature,
            max_tokens,
            count,
        }
    }

    /// Generates the names. Any completion error aborts the sequence.
    ///
    /// A count of zero is rejected before any call is made.
    pub async fn generate_names(&self, theme: &str) -> Result<Vec<MaterialName>> {
        check_name_count(self.count)?;
        let mut names: Vec<MaterialName> = Vec::with_capacity(self.count);

        for i in 0..self.count {
            let prompt = name_prompt(theme, &names);
            tracing::debug!(index = i, %prompt, "requesting material name");

            let raw = self
                .completer
                .complete(&prompt, self.temperature, self.max_tokens)
                .await?;
            let name = MaterialName::from_completion(&raw);

            if names.contains(&name) {
                tracing::warn!(index = i, name = %name, "completion repeated an earlier name");
            }
            tracing::info!(index = i, name = %name, "material name");
            names.push(name);
        }

        Ok(names)
    }
}
