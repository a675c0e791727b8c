//! Flat reply values and label/value pair iteration.

use crate::error::Result;

/// One element of a service reply: a status line, an integer, a byte
/// string, a nested sequence, or nil. Metadata-query replies arrive as an
/// `Array` of alternating label/value elements.
#[derive(Debug, Clone, PartialEq)]
pub enum Reply {
    Nil,
    Status(String),
    Integer(i64),
    Data(Vec<u8>),
    Array(Vec<Reply>),
}

impl Reply {
    /// Textual view of a scalar reply element. Byte strings must be valid
    /// UTF-8 to qualify.
    pub fn as_text(&self) -> Option<String> {
        match self {
            Reply::Status(s) => Some(s.clone()),
            Reply::Data(b) => String::from_utf8(b.clone()).ok(),
            Reply::Integer(n) => Some(n.to_string()),
            Reply::Nil | Reply::Array(_) => None,
        }
    }

    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            Reply::Data(b) => Some(b),
            Reply::Status(s) => Some(s.as_bytes()),
            Reply::Integer(_) | Reply::Nil | Reply::Array(_) => None,
        }
    }

    pub fn as_u64(&self) -> Option<u64> {
        match self {
            Reply::Integer(n) => u64::try_from(*n).ok(),
            Reply::Status(_) | Reply::Data(_) => {
                self.as_text().and_then(|t| t.parse().ok())
            }
            Reply::Nil | Reply::Array(_) => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Reply::Integer(n) => Some(*n as f64),
            Reply::Status(_) | Reply::Data(_) => {
                self.as_text().and_then(|t| t.parse().ok())
            }
            Reply::Nil | Reply::Array(_) => None,
        }
    }

    pub fn as_array(&self) -> Option<&[Reply]> {
        match self {
            Reply::Array(items) => Some(items),
            _ => None,
        }
    }
}

/// Iterate a flat alternating label/value reply as `(label, value)` pairs.
/// Labels that are not text are skipped; a trailing odd element is
/// ignored. Callers ignore labels they do not recognize.
pub fn reply_pairs(reply: &[Reply]) -> impl Iterator<Item = (String, &Reply)> {
    reply
        .chunks_exact(2)
        .filter_map(|pair| pair[0].as_text().map(|label| (label, &pair[1])))
}

/// Entities reconstructible from a metadata-query reply.
pub trait FromReply: Sized {
    /// Command whose reply this decodes; named in malformed-reply errors.
    const COMMAND: &'static str;

    /// Decode the flat label/value sequence. Presence of every required
    /// field is checked eagerly so the error can name all misses at once.
    fn from_reply(reply: &[Reply]) -> Result<Self>;
}
