use reqwest::StatusCode;

/// Everything that can go wrong between issuing a fetch and holding a snapshot.
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    /// Transport-level failure: DNS, connect, TLS, timeout, reading the body.
    #[error("{0}")]
    Network(#[from] reqwest::Error),

    /// The provider answered with a non-2xx status (e.g. 404 for an unknown city).
    #[error("request failed with status {status}: {body}")]
    HttpStatus { status: StatusCode, body: String },

    /// The body did not match the current-weather schema.
    #[error("malformed weather payload: {0}")]
    Deserialization(#[from] serde_json::Error),

    #[error("Please enter a city name")]
    EmptyCity,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchErrorKind {
    Network,
    HttpStatus,
    Deserialization,
    InvalidInput,
}

impl FetchErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            FetchErrorKind::Network => "network",
            FetchErrorKind::HttpStatus => "http_status",
            FetchErrorKind::Deserialization => "deserialization",
            FetchErrorKind::InvalidInput => "invalid_input",
        }
    }
}

impl std::fmt::Display for FetchErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FetchError {
    pub fn kind(&self) -> FetchErrorKind {
        match self {
            FetchError::Network(_) => FetchErrorKind::Network,
            FetchError::HttpStatus { .. } => FetchErrorKind::HttpStatus,
            FetchError::Deserialization(_) => FetchErrorKind::Deserialization,
            FetchError::EmptyCity => FetchErrorKind::InvalidInput,
        }
    }

    pub(crate) fn http_status(status: StatusCode, body: &str) -> Self {
        FetchError::HttpStatus {
            status,
            body: truncate_body(body),
        }
    }
}

fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    if body.len() <= MAX {
        return body.to_string();
    }

    // Never split a UTF-8 sequence.
    let mut end = MAX;
    while !body.is_char_boundary(end) {
        end -= 1;
    }
    format!("{}...", &body[..end])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_bodies_are_kept_verbatim() {
        let err = FetchError::http_status(StatusCode::NOT_FOUND, r#"{"cod":"404","message":"city not found"}"#);

        assert_eq!(err.kind(), FetchErrorKind::HttpStatus);
        assert_eq!(
            err.to_string(),
            r#"request failed with status 404 Not Found: {"cod":"404","message":"city not found"}"#
        );
    }

    #[test]
    fn long_bodies_are_truncated_on_char_boundary() {
        let body = "é".repeat(150);
        let truncated = truncate_body(&body);

        assert!(truncated.ends_with("..."));
        assert!(truncated.len() <= 203);
    }

    #[test]
    fn deserialization_errors_are_classified() {
        let err: FetchError = serde_json::from_str::<u8>("\"nope\"").unwrap_err().into();
        assert_eq!(err.kind(), FetchErrorKind::Deserialization);
        assert!(err.to_string().starts_with("malformed weather payload"));
    }
}
