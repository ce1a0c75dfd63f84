//! Scripted narration client (no network).
//!
//! Replies are consumed in order; once the script runs out every call gets
//! the default reply. Prompts are recorded so tests can inspect them.

use super::{NarrationClient, NarrationError};
use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::{Mutex, MutexGuard};
use std::time::Duration;

const DEFAULT_TEXT: &str = "Quan sát thật kỹ bước này nhé!";

/// One scripted answer.
#[derive(Clone, Debug, PartialEq)]
pub enum MockReply {
    Text(String),
    Empty,
    Fail(String),
    /// Wait, then answer with the inner reply
    Delayed(Duration, Box<MockReply>),
}

impl MockReply {
    pub fn text(text: impl Into<String>) -> Self {
        Self::Text(text.into())
    }

    pub fn fail(reason: impl Into<String>) -> Self {
        Self::Fail(reason.into())
    }

    pub fn delayed(delay: Duration, reply: MockReply) -> Self {
        Self::Delayed(delay, Box::new(reply))
    }

    /// Total delay and the final reply underneath any nesting.
    fn flatten(self) -> (Duration, MockReply) {
        let mut delay = Duration::ZERO;
        let mut reply = self;
        loop {
            match reply {
                MockReply::Delayed(extra, inner) => {
                    delay += extra;
                    reply = *inner;
                }
                other => return (delay, other),
            }
        }
    }
}

#[derive(Debug)]
pub struct MockNarrationClient {
    script: Mutex<VecDeque<MockReply>>,
    default_reply: MockReply,
    prompts: Mutex<Vec<String>>,
}

impl MockNarrationClient {
    pub fn new() -> Self {
        Self::scripted(Vec::new())
    }

    pub fn scripted(replies: Vec<MockReply>) -> Self {
        Self {
            script: Mutex::new(replies.into()),
            default_reply: MockReply::text(DEFAULT_TEXT),
            prompts: Mutex::new(Vec::new()),
        }
    }

    /// Reply used once the script is exhausted.
    pub fn with_default(mut self, reply: MockReply) -> Self {
        self.default_reply = reply;
        self
    }

    /// Every prompt received so far.
    pub fn prompts(&self) -> Vec<String> {
        lock(&self.prompts).clone()
    }

    pub fn calls(&self) -> usize {
        lock(&self.prompts).len()
    }
}

impl Default for MockNarrationClient {
    fn default() -> Self {
        Self::new()
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

#[async_trait]
impl NarrationClient for MockNarrationClient {
    async fn generate(&self, prompt: &str) -> Result<String, NarrationError> {
        lock(&self.prompts).push(prompt.to_string());
        let next = lock(&self.script).pop_front();
        let (delay, reply) = next.unwrap_or_else(|| self.default_reply.clone()).flatten();

        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }

        match reply {
            MockReply::Text(text) => Ok(text),
            MockReply::Empty => Ok(String::new()),
            MockReply::Fail(reason) => Err(NarrationError::Generator(reason)),
            MockReply::Delayed(..) => Err(NarrationError::Generator(
                "nested delay left after flatten".to_string(),
            )),
        }
    }
}
