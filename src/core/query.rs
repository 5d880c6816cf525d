use std::fmt;
use std::time::Duration;

use async_trait::async_trait;

use crate::api::client::post_query;
use crate::api::{QueryRequest, QueryResponse, SourceRef};

/// Answer produced by a query backend.
#[derive(Debug, Clone, PartialEq)]
pub struct Answer {
    pub text: String,
    pub sources: Vec<SourceRef>,
}

impl From<QueryResponse> for Answer {
    fn from(response: QueryResponse) -> Self {
        Self {
            text: response.response_text,
            sources: response.sources,
        }
    }
}

/// Failure reported by a query backend. The transcript renders a single
/// generic error message regardless of the cause; the cause only feeds
/// diagnostics.
#[derive(Debug)]
pub enum QueryError {
    Backend(String),
}

impl fmt::Display for QueryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QueryError::Backend(message) => write!(f, "query backend error: {message}"),
        }
    }
}

impl std::error::Error for QueryError {}

/// Capability seam between the chat widget and whatever answers questions.
/// The widget never cares which implementation it is talking to.
#[async_trait]
pub trait QueryService: Send + Sync {
    async fn submit(&self, query: &str) -> Result<Answer, QueryError>;
}

/// Fixed delay applied by the simulated backend.
pub const SIMULATED_DELAY: Duration = Duration::from_secs(1);

/// In-process stand-in for the retrieval backend. Waits a fixed second,
/// then answers with a deterministic template plus two fixed citations.
pub struct SimulatedQueryService;

#[async_trait]
impl QueryService for SimulatedQueryService {
    async fn submit(&self, query: &str) -> Result<Answer, QueryError> {
        tokio::time::sleep(SIMULATED_DELAY).await;

        Ok(Answer {
            text: format!(
                "This is a simulated response to your query: \"{query}\". In a real \
                 implementation, this would come from the RAG system based on the \
                 Physical AI & Humanoid Robotics book content."
            ),
            sources: vec![
                SourceRef {
                    title: "Introduction to Physical AI & Humanoid Robotics".to_string(),
                    section: "intro".to_string(),
                },
                SourceRef {
                    title: "The Robotic Nervous System (ROS 2)".to_string(),
                    section: "chapter-1".to_string(),
                },
            ],
        })
    }
}

/// Talks to a real backend over HTTP using the wire contract in [`crate::api`].
pub struct HttpQueryService {
    client: reqwest::Client,
    base_url: String,
}

impl HttpQueryService {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.into(),
        }
    }
}

#[async_trait]
impl QueryService for HttpQueryService {
    async fn submit(&self, query: &str) -> Result<Answer, QueryError> {
        let request = QueryRequest {
            query_text: query.to_string(),
            session_id: None,
            robotics_topic: None,
        };

        let response = post_query(&self.client, &self.base_url, &request)
            .await
            .map_err(|e| QueryError::Backend(e.to_string()))?;

        Ok(Answer::from(response))
    }
}
