use thiserror::Error;

/// Everything that can go wrong while serving a single weather request.
#[derive(Debug, Error)]
pub enum WeatherError {
    /// Required process configuration is missing (e.g. no API key).
    #[error("{0}")]
    Configuration(String),

    /// Client supplied malformed input.
    #[error("{0}")]
    Validation(String),

    /// Network failure, non-2xx response or unparsable body from the provider.
    #[error("{message}")]
    Upstream {
        status: Option<u16>,
        message: String,
    },

    /// A field the shaper needs is missing or has the wrong type.
    #[error("{0}")]
    Shaping(String),

    #[error("Cannot summarize an empty temperature series")]
    EmptySeries,
}

impl WeatherError {
    pub fn upstream_status(status: u16) -> Self {
        Self::Upstream {
            status: Some(status),
            message: format!("Request failed with status code {status}"),
        }
    }

    pub fn upstream_transport(message: impl Into<String>) -> Self {
        Self::Upstream {
            status: None,
            message: message.into(),
        }
    }

    pub fn missing_field(path: &str) -> Self {
        Self::Shaping(format!("missing or invalid field `{path}`"))
    }

    /// True when the caller, not the server or provider, is at fault.
    pub fn is_client_error(&self) -> bool {
        matches!(self, Self::Validation(_))
    }
}
