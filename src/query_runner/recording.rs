//! RecordingQueryRunner: in-process runner with canned results
//!
//! Records every query it receives and answers from a queue of prepared
//! results. No network needed.

use async_trait::async_trait;
use serde_json::Value;
use std::collections::VecDeque;
use std::sync::Mutex;
use tracing::debug;

use super::{Params, QueryResult, QueryRunner};
use crate::error::{GdsError, GdsResult};

/// A query as the runner received it
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedQuery {
    pub query: String,
    pub params: Option<Params>,
}

impl RecordedQuery {
    /// Bound parameter by name
    pub fn param(&self, name: &str) -> Option<&Value> {
        self.params.as_ref().and_then(|p| p.get(name))
    }
}

#[derive(Default)]
struct State {
    responses: VecDeque<Result<QueryResult, String>>,
    recorded: Vec<RecordedQuery>,
}

/// In-process runner that replays prepared results in FIFO order.
///
/// Once the queue is drained every query returns an empty result.
#[derive(Default)]
pub struct RecordingQueryRunner {
    state: Mutex<State>,
}

impl RecordingQueryRunner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a result for the next unanswered query
    pub fn push_result(&self, result: QueryResult) {
        self.lock().responses.push_back(Ok(result));
    }

    /// Queue a result given as a JSON array of row objects
    pub fn push_json(&self, rows: Value) -> GdsResult<()> {
        let result = QueryResult::from_json(rows)?;
        self.push_result(result);
        Ok(())
    }

    /// Queue a server-side failure
    pub fn push_error(&self, message: impl Into<String>) {
        self.lock().responses.push_back(Err(message.into()));
    }

    /// All queries received so far, oldest first
    pub fn queries(&self) -> Vec<RecordedQuery> {
        self.lock().recorded.clone()
    }

    pub fn last_query(&self) -> Option<RecordedQuery> {
        self.lock().recorded.last().cloned()
    }

    pub fn query_count(&self) -> usize {
        self.lock().recorded.len()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, State> {
        // Every mutation is a single push/pop, so a poisoned State is still consistent.
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

#[async_trait]
impl QueryRunner for RecordingQueryRunner {
    async fn run_query(&self, query: &str, params: Option<Params>) -> GdsResult<QueryResult> {
        debug!(query = query.trim(), "recording query");

        let mut state = self.lock();
        state.recorded.push(RecordedQuery {
            query: query.to_string(),
            params,
        });

        match state.responses.pop_front() {
            Some(Ok(result)) => Ok(result),
            Some(Err(message)) => Err(GdsError::QueryError(message)),
            None => Ok(QueryResult::default()),
        }
    }
}
