//! Scripted inference backend for tests

use async_trait::async_trait;
use serde_json::Value;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use super::bedrock::{BackendError, InferenceBackend};
use crate::schemas::converse::{ConverseReply, ConverseRequest};

/// What the mock answers with
#[derive(Debug, Clone)]
pub enum Scripted {
    /// `InvokeModel` succeeds with this JSON body
    Invoke(Value),
    /// `InvokeModel` succeeds with these raw bytes
    InvokeRaw(Vec<u8>),
    /// `Converse` succeeds with this reply
    Converse(ConverseReply),
    /// Every call fails with this error
    Fail(BackendError),
}

/// Backend that replays a scripted answer and records what it was sent
#[derive(Debug)]
pub struct MockBackend {
    script: Scripted,
    calls: AtomicUsize,
    invoked: Mutex<Vec<(String, Value)>>,
    conversed: Mutex<Vec<ConverseRequest>>,
}

impl MockBackend {
    pub fn new(script: Scripted) -> Self {
        Self {
            script,
            calls: AtomicUsize::new(0),
            invoked: Mutex::new(Vec::new()),
            conversed: Mutex::new(Vec::new()),
        }
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Model id and decoded JSON body of the last `InvokeModel` call
    pub fn last_invoke(&self) -> Option<(String, Value)> {
        self.invoked.lock().unwrap().last().cloned()
    }

    pub fn last_converse(&self) -> Option<ConverseRequest> {
        self.conversed.lock().unwrap().last().cloned()
    }
}

#[async_trait]
impl InferenceBackend for MockBackend {
    async fn invoke_model(&self, model_id: &str, body: Vec<u8>) -> Result<Vec<u8>, BackendError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let sent: Value = serde_json::from_slice(&body).expect("invoke body is JSON");
        self.invoked.lock().unwrap().push((model_id.to_string(), sent));

        match &self.script {
            Scripted::Invoke(value) => Ok(serde_json::to_vec(value).unwrap()),
            Scripted::InvokeRaw(bytes) => Ok(bytes.clone()),
            Scripted::Fail(err) => Err(err.clone()),
            Scripted::Converse(_) => Err(BackendError::Client(
                "InvokeModel called on a Converse script".to_string(),
            )),
        }
    }

    async fn converse(&self, request: ConverseRequest) -> Result<ConverseReply, BackendError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.conversed.lock().unwrap().push(request);

        match &self.script {
            Scripted::Converse(reply) => Ok(reply.clone()),
            Scripted::Fail(err) => Err(err.clone()),
            Scripted::Invoke(_) | Scripted::InvokeRaw(_) => Err(BackendError::Client(
                "Converse called on an InvokeModel script".to_string(),
            )),
        }
    }
}
