//! Cross-origin policy applied to every API response.

/// Allowed browser origins, parsed from a comma-separated list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CorsPolicy {
    origins: Vec<String>,
}

impl Default for CorsPolicy {
    fn default() -> Self {
        Self::parse("*")
    }
}

impl CorsPolicy {
    /// Parses `"*"` or `"https://a.example,https://b.example"`.
    ///
    /// Empty entries are ignored; an empty list allows no origin.
    pub fn parse(list: &str) -> Self {
        let origins = list
            .split(',')
            .map(str::trim)
            .filter(|origin| !origin.is_empty())
            .map(|origin| origin.trim_end_matches('/').to_string())
            .collect();
        Self { origins }
    }

    /// Value for `Access-Control-Allow-Origin`, if the request may read the response.
    pub fn allow_origin(&self, request_origin: Option<&str>) -> Option<String> {
        if self.origins.iter().any(|origin| origin == "*") {
            return Some("*".to_string());
        }
        let request_origin = request_origin?.trim_end_matches('/');
        self.origins
            .iter()
            .find(|origin| origin.as_str() == request_origin)
            .cloned()
    }
}
