//! Narration gateway: plain-language explanations of each step.
//!
//! The gateway sends the latest step message and a JSON copy of the
//! snapshot to a text generator and always resolves to some text. It
//! never feeds anything back into the machine, so callers fire it off and
//! keep stepping.
//!
//! # Example
//!
//! ```rust
//! use algostep::core::{AlgorithmKind, SearchTargets};
//! use algostep::machine::{advance, reset};
//! use algostep::narration::{MockNarrationClient, MockReply, NarrationGateway, NarrationRequest};
//! use std::sync::Arc;
//!
//! # tokio_test_block_on(async {
//! let client = Arc::new(MockNarrationClient::scripted(vec![MockReply::text("Hai số đang được so sánh.")]));
//! let gateway = NarrationGateway::new(client);
//!
//! let snapshot = advance(&reset(AlgorithmKind::Bubble, &SearchTargets::default()));
//! let request = NarrationRequest::from_snapshot(&snapshot);
//! assert_eq!(gateway.explain(&request).await, "Hai số đang được so sánh.");
//! # });
//! # fn tokio_test_block_on<F: std::future::Future>(f: F) -> F::Output {
//! #     tokio::runtime::Builder::new_current_thread().enable_all().build().unwrap().block_on(f)
//! # }
//! ```

pub mod error;
mod gemini;
mod mock;

pub use error::NarrationError;
pub use gemini::{GeminiClient, GenerationSettings, DEFAULT_BASE_URL, DEFAULT_MODEL};
pub use mock::{MockNarrationClient, MockReply};

use crate::core::AlgorithmKind;
use crate::machine::TraceSnapshot;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use tracing::warn;

/// Shown when the generator fails for any reason.
pub const FALLBACK_NARRATION: &str = "Hãy quan sát sự thay đổi của các con số nhé!";

/// Shown when the generator answers with no text.
pub const EMPTY_NARRATION: &str = "Đang phân tích bước này...";

/// Shown after a reset, before any narration was requested.
pub const READY_NARRATION: &str = "Nhấn 'Tiếp Theo' để bắt đầu.";

/// Text generator backend.
#[async_trait]
pub trait NarrationClient: Send + Sync {
    /// Generate text for `prompt`. An empty string is a valid answer.
    async fn generate(&self, prompt: &str) -> Result<String, NarrationError>;
}

/// What the gateway sends: algorithm, step message and a JSON snapshot.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct NarrationRequest {
    pub algorithm: AlgorithmKind,
    pub message: String,
    pub state: serde_json::Value,
}

impl NarrationRequest {
    pub fn new(algorithm: AlgorithmKind, message: impl Into<String>, state: serde_json::Value) -> Self {
        Self {
            algorithm,
            message: message.into(),
            state,
        }
    }

    pub fn from_snapshot(snapshot: &TraceSnapshot) -> Self {
        let state = serde_json::to_value(snapshot).unwrap_or_default();
        Self::new(snapshot.kind(), snapshot.message.clone(), state)
    }

    /// The prompt text handed to the generator.
    pub fn prompt(&self) -> String {
        format!(
            "You are a friendly computer science teacher for middle school students.\n\
             Explain this step of the {algorithm} algorithm in a fun, simple way.\n\
             Current step: \"{message}\".\n\
             Context: {state}.\n\
             Keep the explanation very short (at most 2 sentences) and encouraging.\n\
             Answer in Vietnamese if possible, otherwise English.",
            algorithm = self.algorithm,
            message = self.message,
            state = self.state,
        )
    }
}

/// When to ask for narration after a step.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NarrationPolicy {
    Never,
    EveryStep,
    /// Narrate steps `n`, `2n`, `3n`, ...
    EveryNth(u32),
}

impl NarrationPolicy {
    /// Whether the `step`-th transition (1-based) should be narrated.
    pub fn should_narrate(&self, step: u64) -> bool {
        match *self {
            Self::Never => false,
            Self::EveryStep => true,
            Self::EveryNth(n) => n > 0 && step % u64::from(n) == 0,
        }
    }
}

/// Turns narration requests into text, swallowing every failure.
#[derive(Clone)]
pub struct NarrationGateway {
    client: Arc<dyn NarrationClient>,
    timeout: Option<Duration>,
}

impl NarrationGateway {
    pub fn new(client: Arc<dyn NarrationClient>) -> Self {
        Self {
            client,
            timeout: None,
        }
    }

    /// Give up on the generator after `timeout` and use the fallback.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Ask for an explanation. Always resolves; a single attempt is made.
    pub async fn explain(&self, request: &NarrationRequest) -> String {
        let prompt = request.prompt();
        let outcome = match self.timeout {
            Some(limit) => tokio::time::timeout(limit, self.client.generate(&prompt))
                .await
                .unwrap_or(Err(NarrationError::Timeout(limit))),
            None => self.client.generate(&prompt).await,
        };

        match outcome {
            Ok(text) if text.trim().is_empty() => EMPTY_NARRATION.to_string(),
            Ok(text) => text.trim().to_string(),
            Err(err) => {
                warn!(algorithm = %request.algorithm, error = %err, "narration failed, using fallback");
                FALLBACK_NARRATION.to_string()
            }
        }
    }
}
