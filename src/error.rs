use thiserror::Error;

#[derive(Debug, Error)]
pub enum BidStackError {
    #[error("Config error: {0}")]
    Config(String),

    #[error("Gateway error: {0}")]
    Gateway(#[from] GatewayFailure),

    #[error("Template error: {0}")]
    Template(String),

    #[error("Export error: {0}")]
    Export(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("{0}")]
    Other(#[from] anyhow::Error),
}

impl From<tera::Error> for BidStackError {
    fn from(err: tera::Error) -> Self {
        BidStackError::Template(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, BidStackError>;

/// Why a remote operation did not produce a usable payload.
///
/// Local validation gaps (nothing selected, malformed form input) never
/// reach the gateway, so they are not represented here.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GatewayFailure {
    /// The API answered with an explicit failure payload.
    #[error("request rejected: {}", .0.as_deref().unwrap_or("no reason given"))]
    RemoteRejection(Option<String>),

    /// Connection, status or decode failure before any payload was read.
    #[error("transport failure: {0}")]
    TransportFailure(String),
}

impl GatewayFailure {
    pub fn rejected(message: impl Into<String>) -> Self {
        GatewayFailure::RemoteRejection(Some(message.into()))
    }

    pub fn transport(message: impl Into<String>) -> Self {
        GatewayFailure::TransportFailure(message.into())
    }

    /// The text shown to the user: the server's own message for a
    /// rejection, otherwise the caller-supplied fallback.
    pub fn user_message(&self, rejection_fallback: &str, transport_fallback: &str) -> String {
        match self {
            GatewayFailure::RemoteRejection(Some(msg)) if !msg.trim().is_empty() => msg.clone(),
            GatewayFailure::RemoteRejection(_) => rejection_fallback.to_string(),
            GatewayFailure::TransportFailure(_) => transport_fallback.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_message_prefers_server_text() {
        let failure = GatewayFailure::rejected("기간이 잘못되었습니다.");
        assert_eq!(failure.user_message("fallback", "server"), "기간이 잘못되었습니다.");
    }

    #[test]
    fn test_user_message_fallbacks() {
        assert_eq!(
            GatewayFailure::RemoteRejection(None).user_message("fallback", "server"),
            "fallback"
        );
        assert_eq!(
            GatewayFailure::rejected("  ").user_message("fallback", "server"),
            "fallback"
        );
        assert_eq!(
            GatewayFailure::transport("connection refused").user_message("fallback", "server"),
            "server"
        );
    }
}
