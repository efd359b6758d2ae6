use thiserror::Error;

/// Failure returned by every `DiskApi` call. Nothing past the client boundary
/// ever sees a raw `reqwest::Error` or a panic.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Network error: {0}")]
    Transport(String),

    #[error("HTTP {status}: {body}")]
    Http { status: u16, body: String },

    #[error("Unexpected response: {0}")]
    InvalidResponse(String),

    #[error("Invalid token: {0}")]
    InvalidToken(String),

    #[error("Local file error: {0}")]
    LocalIo(#[from] std::io::Error),
}

impl ApiError {
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Http { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Expired token or missing `cloud_api:disk.*` scope.
    pub fn is_permission_denied(&self) -> bool {
        matches!(self.status(), Some(401) | Some(403))
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(e: reqwest::Error) -> Self {
        if let Some(status) = e.status() {
            ApiError::Http {
                status: status.as_u16(),
                body: String::new(),
            }
        } else if e.is_decode() {
            ApiError::InvalidResponse(e.to_string())
        } else {
            ApiError::Transport(e.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn forbidden_and_unauthorized_are_permission_errors() {
        let forbidden = ApiError::Http {
            status: 403,
            body: "Forbidden".into(),
        };
        let unauthorized = ApiError::Http {
            status: 401,
            body: String::new(),
        };
        assert!(forbidden.is_permission_denied());
        assert!(unauthorized.is_permission_denied());
    }

    #[test]
    fn other_failures_are_not_permission_errors() {
        let not_found = ApiError::Http {
            status: 404,
            body: "DiskNotFoundError".into(),
        };
        assert!(!not_found.is_permission_denied());
        assert!(!ApiError::Transport("dns".into()).is_permission_denied());
        assert_eq!(not_found.status(), Some(404));
        assert_eq!(ApiError::InvalidResponse("x".into()).status(), None);
    }

    #[test]
    fn http_error_message_carries_status_and_body() {
        let err = ApiError::Http {
            status: 409,
            body: "DiskPathPointsToExistentDirectoryError".into(),
        };
        assert_eq!(
            err.to_string(),
            "HTTP 409: DiskPathPointsToExistentDirectoryError"
        );
    }
}
