use thiserror::Error;

/// Binance error codes that indicate a transient condition worth retrying:
/// -1001 DISCONNECTED, -1021 timestamp outside recvWindow, -1105 busy.
const TRANSIENT_CODES: [i32; 3] = [-1001, -1021, -1105];

/// Lowercase substrings of error messages that indicate a transient
/// network condition even when no known code is attached.
const TRANSIENT_MARKERS: [&str; 4] = [
    "timed out",
    "timeout",
    "temporarily unavailable",
    "connection error",
];

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("HTTP transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Binance API error {code}: {message}")]
    Exchange { code: i32, message: String },

    #[error("Failed to deserialize the API response: {0}")]
    Deserialization(String),

    #[error("Failed to encode the request parameters: {0}")]
    Encoding(String),
}

impl ApiError {
    /// Whether this failure is worth retrying. Transport timeouts and
    /// connection failures are transient, as are the Binance error codes
    /// in [`TRANSIENT_CODES`]. Everything else (rejections like
    /// insufficient margin, bad symbols) is terminal.
    pub fn is_transient(&self) -> bool {
        match self {
            ApiError::Transport(e) => {
                e.is_timeout() || e.is_connect() || has_transient_marker(&e.to_string())
            }
            ApiError::Exchange { code, message } => {
                TRANSIENT_CODES.contains(code) || has_transient_marker(message)
            }
            _ => false,
        }
    }
}

fn has_transient_marker(message: &str) -> bool {
    let lowered = message.to_lowercase();
    TRANSIENT_MARKERS.iter().any(|marker| lowered.contains(marker))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_exchange_codes_are_transient() {
        for code in [-1001, -1021, -1105] {
            let err = ApiError::Exchange {
                code,
                message: "try again".to_string(),
            };
            assert!(err.is_transient(), "code {code} should be transient");
        }
    }

    #[test]
    fn rejections_are_terminal() {
        let err = ApiError::Exchange {
            code: -2019,
            message: "Margin is insufficient.".to_string(),
        };
        assert!(!err.is_transient());
    }

    #[test]
    fn message_markers_are_matched_case_insensitively() {
        let err = ApiError::Exchange {
            code: -9999,
            message: "Service Temporarily Unavailable".to_string(),
        };
        assert!(err.is_transient());
    }

    #[test]
    fn deserialization_failures_are_terminal() {
        let err = ApiError::Deserialization("missing field `orderId`".to_string());
        assert!(!err.is_transient());
    }
}
