//! Registrar doubles shared by the unit tests.

use std::time::Duration;

use async_trait::async_trait;
use parking_lot::Mutex;

use sankofa_core::error::{Result, SankofaError};
use sankofa_core::traits::{RegistrarReader, RegistrarWriter};
use sankofa_core::types::{Node, TextRecord};

pub const WALLET: &str = "0x1234567890abcdef1234567890abcdef1234abcd";

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum WriteCall {
    Basic(String),
    Full(String, Vec<TextRecord>),
}

#[derive(Default)]
pub struct MockWriter {
    failure: Mutex<Option<String>>,
    delay: Option<Duration>,
    calls: Mutex<Vec<WriteCall>>,
}

impl MockWriter {
    pub fn failing(message: &str) -> Self {
        Self {
            failure: Mutex::new(Some(message.to_string())),
            ..Default::default()
        }
    }

    pub fn slow(delay: Duration) -> Self {
        Self {
            delay: Some(delay),
            ..Default::default()
        }
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn succeed(&self) {
        *self.failure.lock() = None;
    }

    pub fn calls(&self) -> Vec<WriteCall> {
        self.calls.lock().clone()
    }

    async fn outcome(&self, label: &str, call: WriteCall) -> Result<Node> {
        self.calls.lock().push(call);
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        let failure = self.failure.lock().clone();
        match failure {
            Some(message) => Err(SankofaError::TransactionFailed(message)),
            None => Ok(Node::new(format!("node:{}", label))),
        }
    }
}

#[async_trait]
impl RegistrarWriter for MockWriter {
    async fn register_basic(&self, label: &str) -> Result<Node> {
        self.outcome(label, WriteCall::Basic(label.to_string())).await
    }

    async fn register(&self, label: &str, records: &[TextRecord]) -> Result<Node> {
        self.outcome(label, WriteCall::Full(label.to_string(), records.to_vec()))
            .await
    }
}

/// Every label is free except the listed ones.
#[derive(Default)]
pub struct MockReader {
    pub taken: Vec<&'static str>,
}

#[async_trait]
impl RegistrarReader for MockReader {
    async fn available(&self, label: &str) -> Result<bool> {
        Ok(!self.taken.contains(&label))
    }
}
