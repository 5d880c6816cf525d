use tracing::debug;

use crate::api::{QueryRequest, QueryResponse};
use crate::utils::url::construct_api_url;

/// Path of the query endpoint, relative to the configured base URL.
pub const QUERY_ENDPOINT: &str = "api/v1/robotics/query";

pub async fn post_query(
    client: &reqwest::Client,
    base_url: &str,
    request: &QueryRequest,
) -> Result<QueryResponse, Box<dyn std::error::Error + Send + Sync>> {
    let query_url = construct_api_url(base_url, QUERY_ENDPOINT);
    debug!(url = %query_url, "posting query");

    let response = client
        .post(query_url)
        .header("Content-Type", "application/json")
        .json(request)
        .send()
        .await?;

    if !response.status().is_success() {
        let status = response.status();
        let error_text = response
            .text()
            .await
            .unwrap_or_else(|_| "<no body>".to_string());
        return Err(format!("query request failed with status {status}: {error_text}").into());
    }

    let query_response = response.json::<QueryResponse>().await?;
    Ok(query_response)
}
