//! URL helpers for building backend endpoints without doubled slashes.

/// Strip trailing slashes from a base URL.
pub fn normalize_base_url(base_url: &str) -> String {
    base_url.trim_end_matches('/').to_string()
}

/// Join a base URL and an endpoint path with exactly one slash between them.
pub fn construct_api_url(base_url: &str, endpoint: &str) -> String {
    let normalized_base = normalize_base_url(base_url);
    let endpoint = endpoint.trim_start_matches('/');
    format!("{normalized_base}/{endpoint}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trailing_slashes_are_stripped() {
        assert_eq!(normalize_base_url("http://localhost:8000"), "http://localhost:8000");
        assert_eq!(normalize_base_url("http://localhost:8000/"), "http://localhost:8000");
        assert_eq!(normalize_base_url("http://localhost:8000///"), "http://localhost:8000");
    }

    #[test]
    fn joins_produce_exactly_one_separator() {
        assert_eq!(
            construct_api_url("http://localhost:8000", "api/v1/robotics/query"),
            "http://localhost:8000/api/v1/robotics/query"
        );
        assert_eq!(
            construct_api_url("http://localhost:8000/", "/api/v1/robotics/query"),
            "http://localhost:8000/api/v1/robotics/query"
        );
    }
}
