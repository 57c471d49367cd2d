/// Result alias that carries the custom [`LyricError`] type.
pub type Result<T> = std::result::Result<T, LyricError>;

/// Common error type for the core crate.
///
/// Lyric parsing, registry lookups and the timing engine never fail on bad
/// input; these variants cover the surrounding plumbing (files, config,
/// catalogue construction).
#[derive(Debug, thiserror::Error)]
pub enum LyricError {
    /// Free-form message surfaced to the command line.
    #[error("{0}")]
    Message(String),
    /// Wrapper around standard IO errors.
    #[error("{0}")]
    Io(#[from] std::io::Error),
    /// Configuration or cue sheet (de)serialisation failure.
    #[error("{0}")]
    Json(#[from] serde_json::Error),
    /// Two catalogue entries share the same identifier.
    #[error("duplicate {kind} id `{id}`")]
    DuplicateId { kind: &'static str, id: String },
}

impl LyricError {
    /// Creates a new error that simply wraps the provided message.
    pub fn msg<T: Into<String>>(msg: T) -> Self {
        Self::Message(msg.into())
    }
}

impl From<&str> for LyricError {
    fn from(value: &str) -> Self {
        Self::msg(value)
    }
}

impl From<String> for LyricError {
    fn from(value: String) -> Self {
        Self::Message(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strings_become_messages() {
        let from_str: LyricError = "bad tick".into();
        let from_string: LyricError = format!("bad {}", "duration").into();

        assert_eq!(from_str.to_string(), "bad tick");
        assert!(matches!(from_string, LyricError::Message(ref msg) if msg == "bad duration"));
    }

    #[test]
    fn duplicate_ids_name_their_kind() {
        let err = LyricError::DuplicateId {
            kind: "effect",
            id: "train".to_string(),
        };
        assert_eq!(err.to_string(), "duplicate effect id `train`");
    }
}
