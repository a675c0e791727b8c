//! Flat command arguments and the optional/variadic argument helpers.

/// One positional argument of a service command: either a text token or a
/// raw binary payload. Tokens carry keywords, keys, counts and stringified
/// numbers; blobs carry serialized models and tensor payloads.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandArg {
    Token(String),
    Blob(Vec<u8>),
}

impl CommandArg {
    pub fn token(s: impl Into<String>) -> Self {
        CommandArg::Token(s.into())
    }

    pub fn as_token(&self) -> Option<&str> {
        match self {
            CommandArg::Token(s) => Some(s),
            CommandArg::Blob(_) => None,
        }
    }

    pub fn as_blob(&self) -> Option<&[u8]> {
        match self {
            CommandArg::Blob(b) => Some(b),
            CommandArg::Token(_) => None,
        }
    }
}

impl From<&str> for CommandArg {
    fn from(s: &str) -> Self {
        CommandArg::Token(s.to_owned())
    }
}

impl From<String> for CommandArg {
    fn from(s: String) -> Self {
        CommandArg::Token(s)
    }
}

impl From<Vec<u8>> for CommandArg {
    fn from(b: Vec<u8>) -> Self {
        CommandArg::Blob(b)
    }
}

/// Variable-length keyword section: empty when `values` is empty,
/// otherwise `[name, count, values...]`. The explicit count lets the
/// service parse the section even when more arguments follow it.
pub fn variadic_argument(name: &str, values: &[String]) -> Vec<CommandArg> {
    if values.is_empty() {
        return Vec::new();
    }

    let mut args = Vec::with_capacity(values.len() + 2);
    args.push(CommandArg::token(name));
    args.push(CommandArg::token(values.len().to_string()));
    args.extend(values.iter().map(CommandArg::token));
    args
}

/// Optional keyword argument: empty only when `value` is unset. Zero is a
/// real value here (a zero timeout still reaches the wire).
pub fn optional_argument(name: &str, value: Option<u64>) -> Vec<CommandArg> {
    match value {
        None => Vec::new(),
        Some(v) => vec![CommandArg::token(name), CommandArg::token(v.to_string())],
    }
}
