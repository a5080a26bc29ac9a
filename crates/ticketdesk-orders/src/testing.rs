//! In-memory order source for unit tests.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::Mutex;
use ticketdesk_core::OrderRecord;

use crate::error::OrderSourceError;
use crate::source::OrderSource;

enum Step {
    Delayed(Duration, Vec<OrderRecord>),
    Fail,
}

/// Replays queued steps, then keeps returning the fallback records.
pub(crate) struct ScriptedSource {
    fallback: Option<Vec<OrderRecord>>,
    script: Mutex<VecDeque<Step>>,
    calls: AtomicUsize,
}

impl ScriptedSource {
    pub(crate) fn returning(records: Vec<OrderRecord>) -> Self {
        Self {
            fallback: Some(records),
            script: Mutex::new(VecDeque::new()),
            calls: AtomicUsize::new(0),
        }
    }

    pub(crate) fn failing() -> Self {
        Self {
            fallback: None,
            script: Mutex::new(VecDeque::new()),
            calls: AtomicUsize::new(0),
        }
    }

    pub(crate) fn fail_next(&self) {
        self.script.lock().push_back(Step::Fail);
    }

    pub(crate) fn push_delayed(&self, delay: Duration, records: Vec<OrderRecord>) {
        self.script.lock().push_back(Step::Delayed(delay, records));
    }

    pub(crate) fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl OrderSource for ScriptedSource {
    async fn fetch_orders(&self) -> Result<Vec<OrderRecord>, OrderSourceError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let step = self.script.lock().pop_front();

        match step {
            Some(Step::Delayed(delay, records)) => {
                tokio::time::sleep(delay).await;
                Ok(records)
            },
            Some(Step::Fail) => Err(OrderSourceError::unavailable("scripted failure")),
            None => self
                .fallback
                .clone()
                .ok_or_else(|| OrderSourceError::unavailable("scripted failure")),
        }
    }

    async fn health_check(&self) -> Result<(), OrderSourceError> {
        match self.fallback {
            Some(_) => Ok(()),
            None => Err(OrderSourceError::unavailable("scripted source is down")),
        }
    }

    fn name(&self) -> &str {
        "scripted"
    }
}
