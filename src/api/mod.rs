use serde::{Deserialize, Serialize};

/// Request body for the backend query endpoint.
#[derive(Debug, Clone, Serialize)]
pub struct QueryRequest {
    pub query_text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub session_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub robotics_topic: Option<String>,
}

/// Response body returned by the backend query endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct QueryResponse {
    pub response_text: String,
    #[serde(default)]
    pub confidence_score: f64,
    #[serde(default)]
    pub sources: Vec<SourceRef>,
}

/// One citation attached to an answer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceRef {
    pub title: String,
    pub section: String,
}

pub mod client;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn query_request_omits_unset_optionals() {
        let request = QueryRequest {
            query_text: "What is a digital twin?".to_string(),
            session_id: None,
            robotics_topic: None,
        };
        let json = serde_json::to_string(&request).unwrap();
        assert_eq!(json, r#"{"query_text":"What is a digital twin?"}"#);
    }

    #[test]
    fn query_response_parses_backend_payload() {
        // Extra fields (ids, timestamps, payload metadata) must be tolerated.
        let json = r#"{
            "id": "7a6e9a1e-0000-0000-0000-000000000000",
            "query_id": "7a6e9a1e-0000-0000-0000-000000000001",
            "response_text": "ROS 2 is the robot middleware covered in chapter 1.",
            "confidence_score": 0.87,
            "sources": [
                {"title": "The Robotic Nervous System (ROS 2)", "section": "chapter-1", "order": 3}
            ],
            "created_at": "2025-11-02T10:00:00Z"
        }"#;
        let response: QueryResponse = serde_json::from_str(json).unwrap();
        assert_eq!(
            response.response_text,
            "ROS 2 is the robot middleware covered in chapter 1."
        );
        assert_eq!(response.sources.len(), 1);
        assert_eq!(response.sources[0].section, "chapter-1");
    }

    #[test]
    fn query_response_defaults_missing_sources() {
        let response: QueryResponse =
            serde_json::from_str(r#"{"response_text": "no citations"}"#).unwrap();
        assert!(response.sources.is_empty());
        assert_eq!(response.confidence_score, 0.0);
    }
}
