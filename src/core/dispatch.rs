use std::sync::Arc;

use tokio::sync::mpsc;
use tracing::debug;

use crate::core::query::{Answer, QueryService};

/// Result of one dispatched query, reported back to the event loop together
/// with the id it was issued under so stale results can be discarded.
#[derive(Debug, Clone)]
pub enum QueryOutcome {
    Completed(Answer),
    Failed(String),
}

/// Everything a spawned query task needs.
#[derive(Debug, Clone)]
pub struct QueryParams {
    pub query_id: u64,
    pub text: String,
}

/// Runs queries on their own tasks and reports outcomes over a channel.
/// There is no cancellation: a dispatched query always runs to completion
/// and the receiving side decides whether the outcome is still current.
#[derive(Clone)]
pub struct QueryDispatcher {
    service: Arc<dyn QueryService>,
    tx: mpsc::UnboundedSender<(QueryOutcome, u64)>,
}

impl QueryDispatcher {
    pub fn new(
        service: Arc<dyn QueryService>,
    ) -> (Self, mpsc::UnboundedReceiver<(QueryOutcome, u64)>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { service, tx }, rx)
    }

    pub fn spawn_query(&self, params: QueryParams) {
        let QueryParams { query_id, text } = params;
        let service = Arc::clone(&self.service);
        let tx = self.tx.clone();

        tokio::spawn(async move {
            debug!(query_id, "query dispatched");
            let outcome = match service.submit(&text).await {
                Ok(answer) => QueryOutcome::Completed(answer),
                Err(e) => {
                    debug!(query_id, error = %e, "query failed");
                    QueryOutcome::Failed(e.to_string())
                }
            };
            // A send failure means the UI is gone; nothing left to do.
            let _ = tx.send((outcome, query_id));
        });
    }

    #[cfg(test)]
    pub fn send_for_test(&self, outcome: QueryOutcome, query_id: u64) {
        let _ = self.tx.send((outcome, query_id));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::query::{QueryError, SimulatedQueryService};
    use async_trait::async_trait;

    struct FailingService;

    #[async_trait]
    impl QueryService for FailingService {
        async fn submit(&self, _query: &str) -> Result<Answer, QueryError> {
            Err(QueryError::Backend("boom".to_string()))
        }
    }

    #[tokio::test(start_paused = true)]
    async fn outcomes_carry_the_dispatched_query_id() {
        let (dispatcher, mut rx) = QueryDispatcher::new(Arc::new(SimulatedQueryService));
        dispatcher.spawn_query(QueryParams {
            query_id: 7,
            text: "What is a VLA model?".to_string(),
        });

        let (outcome, query_id) = rx.recv().await.unwrap();
        assert_eq!(query_id, 7);
        match outcome {
            QueryOutcome::Completed(answer) => {
                assert!(answer.text.contains("What is a VLA model?"));
            }
            QueryOutcome::Failed(_) => panic!("simulated query should succeed"),
        }
    }

    #[tokio::test]
    async fn failures_are_reported_as_failed_outcomes() {
        let (dispatcher, mut rx) = QueryDispatcher::new(Arc::new(FailingService));
        dispatcher.spawn_query(QueryParams {
            query_id: 1,
            text: "anything".to_string(),
        });

        let (outcome, query_id) = rx.recv().await.unwrap();
        assert_eq!(query_id, 1);
        assert!(matches!(outcome, QueryOutcome::Failed(_)));
    }
}
