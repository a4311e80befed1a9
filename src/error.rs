use err_derive::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error(display = "Failed to find config dir")]
    FindConfigDir(#[error(from)] std::env::VarError),

    #[error(display = "Failed to read config file")]
    ReadConfigFile(#[error(source, no_from)] std::io::Error),

    #[error(display = "Failed to parse config file: {}", _0)]
    ParseConfigFile(#[error(from)] toml::de::Error),

    #[error(display = "Failed to create config directory")]
    CreateConfigDir(#[error(source, no_from)] std::io::Error),

    #[error(display = "Failed to create/truncate config file")]
    CreateConfigFile(#[error(source, no_from)] std::io::Error),

    #[error(display = "Failed to serialize config")]
    SerializeConfig(#[error(from)] toml::ser::Error),

    #[error(display = "Failed to write to config file")]
    WriteConfigFile(#[error(source, no_from)] std::io::Error),

    #[error(display = "Failed to open log file")]
    OpenLogFile(#[error(source, no_from)] std::io::Error),

    #[error(display = "No API key configured, set api_key in {}", _0)]
    MissingApiKey(String),

    #[error(display = "No channels configured, add channel_ids to {}", _0)]
    NoChannels(String),

    #[error(display = "page_size must be between 1 and 50, got {} in {}", _0, _1)]
    InvalidPageSize(u32, String),
}

#[derive(Debug, Error)]
pub enum FetchError {
    #[error(display = "YouTube request failed: {}", _0)]
    Request(#[error(from)] reqwest::Error),

    #[error(display = "YouTube responded with status {} for {}", status, resource)]
    Status { status: u16, resource: String },

    #[error(display = "Failed to parse published date {:?}", _0)]
    ParseDate(String),
}

#[derive(Debug, Error)]
pub enum SessionError {
    #[error(display = "None of the configured channels has an uploads playlist")]
    NoPlaylists,

    #[error(display = "Failed to load {} of {}, {}: {}", failed, total, id, error)]
    Partial {
        failed: usize,
        total: usize,
        id: String,
        error: FetchError,
    },

    #[error(display = "{}; also {}", _0, _1)]
    Both(Box<SessionError>, Box<SessionError>),
}

impl SessionError {
    /// Folds per-source failures of one round into a single reportable error.
    pub fn from_failures(failures: Vec<(String, FetchError)>, total: usize) -> Option<Self> {
        let failed = failures.len();
        let (id, error) = failures.into_iter().next()?;
        Some(Self::Partial {
            failed,
            total,
            id,
            error,
        })
    }

    /// Reports an earlier failure together with the result of a later step.
    pub fn and_then_result(first: Option<Self>, then: Result<(), Self>) -> Result<(), Self> {
        match (first, then) {
            (None, then) => then,
            (Some(first), Ok(())) => Err(first),
            (Some(first), Err(then)) => Err(Self::Both(Box::new(first), Box::new(then))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn partial(id: &str, resource: &str) -> SessionError {
        SessionError::from_failures(
            vec![(
                id.to_owned(),
                FetchError::Status {
                    status: 503,
                    resource: resource.to_owned(),
                },
            )],
            2,
        )
        .unwrap()
    }

    #[test]
    fn no_failures_is_no_error() {
        assert!(SessionError::from_failures(Vec::new(), 3).is_none());
    }

    #[test]
    fn earlier_failure_is_kept_when_later_step_succeeds() {
        let result = SessionError::and_then_result(Some(partial("UC1", "channels")), Ok(()));

        assert!(matches!(result, Err(SessionError::Partial { .. })));
    }

    #[test]
    fn both_failures_are_reported() {
        let result = SessionError::and_then_result(
            Some(partial("UC1", "channels")),
            Err(partial("UU2", "playlistItems")),
        );

        let message = result.unwrap_err().to_string();
        assert!(message.contains("UC1"));
        assert!(message.contains("channels"));
        assert!(message.contains("UU2"));
        assert!(message.contains("playlistItems"));
    }

    #[test]
    fn later_failure_alone_is_reported() {
        let result = SessionError::and_then_result(None, Err(partial("UU2", "playlistItems")));

        assert!(matches!(
            result,
            Err(SessionError::Partial { ref id, .. }) if id == "UU2"
        ));
    }
}
