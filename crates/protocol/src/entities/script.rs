//! Script entity and codec.

use crate::args::{optional_argument, variadic_argument, CommandArg};
use crate::constants::CMD_SCRIPT_GET;
use crate::error::{ProtocolError, Result};
use crate::reply::{reply_pairs, FromReply, Reply};

/// A stored source-code entity executed by a scripting backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Script {
    device: String,
    tag: Option<String>,
    source: String,
}

/// Keyword sections of a script-execute command. `keys` is only valid on
/// the standalone command; the DAG variant drops it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScriptExecuteOptions {
    pub keys: Vec<String>,
    pub inputs: Vec<String>,
    pub args: Vec<String>,
    pub outputs: Vec<String>,
    pub timeout_ms: Option<u64>,
}

impl Script {
    pub fn new(device: impl Into<String>, source: impl Into<String>) -> Self {
        Self {
            device: device.into(),
            tag: None,
            source: source.into(),
        }
    }

    /// Tag the script with a version string or any opaque identifier.
    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tag = Some(tag.into());
        self
    }

    pub fn device(&self) -> &str {
        &self.device
    }

    pub fn tag(&self) -> Option<&str> {
        self.tag.as_deref()
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    /// Flat arguments for a script-set command:
    /// `key device [TAG t] SOURCE text`.
    pub fn set_args(&self, key: &str) -> Vec<CommandArg> {
        let mut args: Vec<CommandArg> = vec![key.into(), self.device.as_str().into()];
        if let Some(tag) = &self.tag {
            args.push("TAG".into());
            args.push(tag.as_str().into());
        }
        args.push("SOURCE".into());
        args.push(self.source.as_str().into());
        args
    }

    /// Legacy run grammar: bare input/output name lists, no counts.
    pub fn run_args(
        key: &str,
        function: &str,
        inputs: &[String],
        outputs: &[String],
    ) -> Vec<CommandArg> {
        let mut args: Vec<CommandArg> = vec![key.into(), function.into(), "INPUTS".into()];
        args.extend(inputs.iter().map(CommandArg::token));
        args.push("OUTPUTS".into());
        args.extend(outputs.iter().map(CommandArg::token));
        args
    }

    /// Execute grammar:
    /// `key fn [KEYS n k...] [INPUTS n ...] [ARGS n ...] [OUTPUTS n ...]
    /// [TIMEOUT t]`.
    pub fn execute_args(
        key: &str,
        function: &str,
        options: &ScriptExecuteOptions,
    ) -> Vec<CommandArg> {
        let mut args: Vec<CommandArg> = vec![key.into(), function.into()];
        args.extend(variadic_argument("KEYS", &options.keys));
        args.extend(variadic_argument("INPUTS", &options.inputs));
        args.extend(variadic_argument("ARGS", &options.args));
        args.extend(variadic_argument("OUTPUTS", &options.outputs));
        args.extend(optional_argument("TIMEOUT", options.timeout_ms));
        args
    }

    /// Execute grammar inside a DAG pipeline, where KEYS is not accepted.
    pub fn dag_execute_args(
        key: &str,
        function: &str,
        options: &ScriptExecuteOptions,
    ) -> Vec<CommandArg> {
        let mut args: Vec<CommandArg> = vec![key.into(), function.into()];
        args.extend(variadic_argument("INPUTS", &options.inputs));
        args.extend(variadic_argument("ARGS", &options.args));
        args.extend(variadic_argument("OUTPUTS", &options.outputs));
        args.extend(optional_argument("TIMEOUT", options.timeout_ms));
        args
    }

    /// Flat arguments for a script-get command.
    pub fn get_args(key: &str) -> Vec<CommandArg> {
        vec![key.into(), "META".into(), "SOURCE".into()]
    }
}

impl FromReply for Script {
    const COMMAND: &'static str = CMD_SCRIPT_GET;

    fn from_reply(reply: &[Reply]) -> Result<Self> {
        let mut device = None;
        let mut tag = None;
        let mut source = None;

        for (label, value) in reply_pairs(reply) {
            match label.as_str() {
                "device" => device = value.as_text(),
                "tag" => tag = value.as_text(),
                "source" => source = value.as_text(),
                _ => {}
            }
        }

        match (device, source) {
            (Some(device), Some(source)) => Ok(Self {
                device,
                tag,
                source,
            }),
            (device, source) => {
                let mut missing = Vec::new();
                if device.is_none() {
                    missing.push("device");
                }
                if source.is_none() {
                    missing.push("source");
                }
                Err(ProtocolError::malformed(Self::COMMAND, &missing))
            }
        }
    }
}
