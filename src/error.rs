/// Error types for the background worker

/// Failures reported by the browser host (storage, alarms, windows).
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum HostError {
    /// The referenced window no longer exists.
    #[error("window not found")]
    NotFound,

    /// Any other failure raised by a browser API.
    #[error("{0}")]
    Js(String),
}

/// Errors returned by the coordinator, scheduler and entry store.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum TomatohError {
    /// Bad user input; the message is shown as-is.
    #[error("{0}")]
    Validation(String),

    /// A browser API call failed.
    #[error(transparent)]
    Host(#[from] HostError),

    /// A persisted value could not be encoded or decoded.
    #[error("storage error: {0}")]
    Storage(String),
}

impl From<serde_json::Error> for TomatohError {
    fn from(err: serde_json::Error) -> Self {
        TomatohError::Storage(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages() {
        let err = TomatohError::Validation("please add at least one accomplishment.".to_string());
        assert_eq!(err.to_string(), "please add at least one accomplishment.");

        let err: TomatohError = HostError::Js("quota exceeded".to_string()).into();
        assert_eq!(err.to_string(), "quota exceeded");
        assert_eq!(TomatohError::from(HostError::NotFound).to_string(), "window not found");
    }
}
