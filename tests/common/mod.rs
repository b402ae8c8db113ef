#![allow(dead_code)]

use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use anyhow::{Result, anyhow};
use async_trait::async_trait;
use courseforms::CreateService;
use serde_json::{Value, json};

#[derive(Debug, Clone, Copy)]
pub enum Reply {
    Created,
    Empty,
    Fail,
}

/// Create service that records every payload it receives.
pub struct Recorder<P> {
    pub calls: Mutex<Vec<P>>,
    reply: Reply,
}

impl<P> Recorder<P> {
    pub fn new(reply: Reply) -> Arc<Self> {
        Arc::new(Self {
            calls: Mutex::new(Vec::new()),
            reply,
        })
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }
}

impl<P: Clone> Recorder<P> {
    pub fn last(&self) -> Option<P> {
        self.calls.lock().unwrap().last().cloned()
    }
}

#[async_trait]
impl<P: Send + 'static> CreateService<P> for Recorder<P> {
    async fn create(&self, payload: P) -> Result<Option<Value>> {
        self.calls.lock().unwrap().push(payload);
        match self.reply {
            Reply::Created => Ok(Some(json!({"id": "created-1"}))),
            Reply::Empty => Ok(None),
            Reply::Fail => Err(anyhow!("503 Service Unavailable")),
        }
    }
}

/// Counter handed to `on_success`.
pub fn success_counter() -> (Arc<AtomicUsize>, impl FnMut() + Send + 'static) {
    let counter = Arc::new(AtomicUsize::new(0));
    let handle = Arc::clone(&counter);
    (counter, move || {
        handle.fetch_add(1, Ordering::SeqCst);
    })
}

pub fn count(counter: &AtomicUsize) -> usize {
    counter.load(Ordering::SeqCst)
}
