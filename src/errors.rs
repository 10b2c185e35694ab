use std::fmt;

/// Failure of one acquisition round trip. The `Display` text is exactly what
/// the failure banner shows, so it stays short and never carries a raw
/// error object.
#[derive(Debug)]
pub enum FetchError {
    Transport(String),
    Status(u16),
    Decode(String),
}

impl fmt::Display for FetchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FetchError::Transport(message) => write!(f, "{message}"),
            FetchError::Status(code) => write!(f, "HTTP error! status: {code}"),
            FetchError::Decode(message) => write!(f, "{message}"),
        }
    }
}

impl std::error::Error for FetchError {}

impl From<reqwest::Error> for FetchError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            FetchError::Decode(err.to_string())
        } else {
            FetchError::Transport(err.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_errors_carry_the_code_in_the_reason() {
        assert_eq!(FetchError::Status(500).to_string(), "HTTP error! status: 500");
        assert_eq!(FetchError::Status(404).to_string(), "HTTP error! status: 404");
    }
}
