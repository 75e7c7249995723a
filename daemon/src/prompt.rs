//! Interactive signer: asks on the terminal before signing with a local key.

use async_trait::async_trait;
use datafutures_authorization::{KeypairSigner, SignError, SignedChallenge, Signer};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};

/// Shown instead of the full 2000-character session key.
const KEY_PREVIEW_CHARS: usize = 18;

pub struct PromptSigner {
    inner: KeypairSigner,
    assume_yes: bool,
}

impl PromptSigner {
    pub fn new(inner: KeypairSigner, assume_yes: bool) -> Self {
        Self { inner, assume_yes }
    }
}

/// The challenge with each long value shortened for display.
fn preview(message: &str) -> String {
    message
        .lines()
        .map(|line| match line.split_once(':') {
            Some((field, value)) if value.chars().count() > KEY_PREVIEW_CHARS => {
                let head: String = value.chars().take(KEY_PREVIEW_CHARS).collect();
                format!("  {field}: {head}…")
            }
            Some((field, value)) => format!("  {field}: {value}"),
            None => format!("  {line}"),
        })
        .collect::<Vec<_>>()
        .join("\n")
}

#[async_trait]
impl Signer for PromptSigner {
    async fn sign(&self, message: &str) -> Result<SignedChallenge, SignError> {
        if !self.assume_yes {
            let mut stderr = tokio::io::stderr();
            let text = format!(
                "Sign reveal authorization with {}?\n{}\n[y/N] ",
                self.inner.public_key(),
                preview(message)
            );
            stderr
                .write_all(text.as_bytes())
                .await
                .map_err(|e| SignError::Unavailable(e.to_string()))?;
            stderr
                .flush()
                .await
                .map_err(|e| SignError::Unavailable(e.to_string()))?;

            let mut answer = String::new();
            BufReader::new(tokio::io::stdin())
                .read_line(&mut answer)
                .await
                .map_err(|e| SignError::Unavailable(e.to_string()))?;
            if !matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes") {
                return Err(SignError::Declined);
            }
        }
        self.inner.sign(message).await
    }
}
