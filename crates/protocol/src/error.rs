//! Protocol error types

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ProtocolError {
    /// A reply lacked fields required to rebuild the entity. `missing`
    /// names every absent field, comma-joined in the entity's documented
    /// order; all presence checks run before this is raised.
    #[error("{command} reply is missing required fields: {missing}")]
    MalformedReply {
        command: &'static str,
        missing: String,
    },

    /// An enum reverse lookup received an unrecognized wire token.
    #[error("unknown {kind} token {token:?}")]
    UnknownToken { kind: &'static str, token: String },
}

impl ProtocolError {
    pub fn malformed(command: &'static str, missing: &[&str]) -> Self {
        Self::MalformedReply {
            command,
            missing: missing.join(","),
        }
    }
}

pub type Result<T> = std::result::Result<T, ProtocolError>;
