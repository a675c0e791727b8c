//! Model entity and codec.

use crate::args::{optional_argument, variadic_argument, CommandArg};
use crate::constants::{Backend, CMD_MODEL_GET, DEFAULT_PROTO_MAX_PAYLOAD_LENGTH};
use crate::error::{ProtocolError, Result};
use crate::reply::{reply_pairs, FromReply, Reply};

/// A stored, backend-specific executable graph or module.
///
/// Built once and transformed, never mutated in place. Input/output node
/// names matter only for graph-based backends. Batching keywords nest on
/// the wire (`MINBATCHSIZE` only under a non-zero `BATCHSIZE`,
/// `MINBATCHTIMEOUT` only under a non-zero `MINBATCHSIZE`), which the
/// encoder enforces structurally.
#[derive(Debug, Clone, PartialEq)]
pub struct Model {
    backend: Backend,
    device: String,
    tag: Option<String>,
    batch_size: u64,
    min_batch_size: u64,
    min_batch_timeout_ms: u64,
    inputs: Vec<String>,
    outputs: Vec<String>,
    blob: Vec<u8>,
    proto_max_payload_length: usize,
}

impl Model {
    pub fn new(backend: Backend, device: impl Into<String>, blob: Vec<u8>) -> Self {
        Self {
            backend,
            device: device.into(),
            tag: None,
            batch_size: 0,
            min_batch_size: 0,
            min_batch_timeout_ms: 0,
            inputs: Vec::new(),
            outputs: Vec::new(),
            blob,
            proto_max_payload_length: DEFAULT_PROTO_MAX_PAYLOAD_LENGTH,
        }
    }

    /// Tag the model with a version string or any opaque identifier.
    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tag = Some(tag.into());
        self
    }

    pub fn with_inputs(mut self, inputs: Vec<String>) -> Self {
        self.inputs = inputs;
        self
    }

    pub fn with_outputs(mut self, outputs: Vec<String>) -> Self {
        self.outputs = outputs;
        self
    }

    /// Server-side batching parameters, all zero-disabled. A non-zero
    /// `min_batch_size` without `batch_size` (and likewise
    /// `min_batch_timeout_ms` without `min_batch_size`) never reaches the
    /// wire.
    pub fn with_batching(
        mut self,
        batch_size: u64,
        min_batch_size: u64,
        min_batch_timeout_ms: u64,
    ) -> Self {
        self.batch_size = batch_size;
        self.min_batch_size = min_batch_size;
        self.min_batch_timeout_ms = min_batch_timeout_ms;
        self
    }

    /// Ceiling on a single blob argument; larger payloads are chunked.
    /// Must be non-zero.
    pub fn with_proto_max_payload_length(mut self, length: usize) -> Self {
        assert!(length > 0, "payload length ceiling must be non-zero");
        self.proto_max_payload_length = length;
        self
    }

    pub fn backend(&self) -> Backend {
        self.backend
    }

    pub fn device(&self) -> &str {
        &self.device
    }

    pub fn tag(&self) -> Option<&str> {
        self.tag.as_deref()
    }

    pub fn batch_size(&self) -> u64 {
        self.batch_size
    }

    pub fn min_batch_size(&self) -> u64 {
        self.min_batch_size
    }

    pub fn min_batch_timeout_ms(&self) -> u64 {
        self.min_batch_timeout_ms
    }

    pub fn inputs(&self) -> &[String] {
        &self.inputs
    }

    pub fn outputs(&self) -> &[String] {
        &self.outputs
    }

    pub fn blob(&self) -> &[u8] {
        &self.blob
    }

    /// Flat arguments for the store command (the legacy set command shares
    /// this grammar):
    /// `key backend device [TAG t] [BATCHSIZE b [MINBATCHSIZE m
    /// [MINBATCHTIMEOUT t]]] [INPUTS n ...] [OUTPUTS n ...] BLOB chunk...`
    pub fn store_args(&self, key: &str) -> Vec<CommandArg> {
        let mut args: Vec<CommandArg> = vec![
            key.into(),
            self.backend.wire_token().into(),
            self.device.as_str().into(),
        ];
        if let Some(tag) = &self.tag {
            args.push("TAG".into());
            args.push(tag.as_str().into());
        }
        if self.batch_size > 0 {
            args.push("BATCHSIZE".into());
            args.push(self.batch_size.to_string().into());
            if self.min_batch_size > 0 {
                args.push("MINBATCHSIZE".into());
                args.push(self.min_batch_size.to_string().into());
                if self.min_batch_timeout_ms > 0 {
                    args.push("MINBATCHTIMEOUT".into());
                    args.push(self.min_batch_timeout_ms.to_string().into());
                }
            }
        }
        args.extend(variadic_argument("INPUTS", &self.inputs));
        args.extend(variadic_argument("OUTPUTS", &self.outputs));
        args.push("BLOB".into());
        for chunk in self.blob.chunks(self.proto_max_payload_length) {
            args.push(CommandArg::Blob(chunk.to_vec()));
        }
        args
    }

    /// Legacy run grammar: bare input/output name lists, no counts.
    pub fn run_args(key: &str, inputs: &[String], outputs: &[String]) -> Vec<CommandArg> {
        let mut args: Vec<CommandArg> = vec![key.into(), "INPUTS".into()];
        args.extend(inputs.iter().map(CommandArg::token));
        args.push("OUTPUTS".into());
        args.extend(outputs.iter().map(CommandArg::token));
        args
    }

    /// Execute grammar: counted lists plus an optional timeout. Operates
    /// on an already-stored model, so no backend/device/blob here.
    pub fn execute_args(
        key: &str,
        inputs: &[String],
        outputs: &[String],
        timeout_ms: Option<u64>,
    ) -> Vec<CommandArg> {
        let mut args: Vec<CommandArg> = vec![key.into()];
        args.extend(variadic_argument("INPUTS", inputs));
        args.extend(variadic_argument("OUTPUTS", outputs));
        args.extend(optional_argument("TIMEOUT", timeout_ms));
        args
    }

    /// Flat arguments for a model-get command.
    pub fn get_args(key: &str) -> Vec<CommandArg> {
        vec![key.into(), "META".into(), "BLOB".into()]
    }
}

impl FromReply for Model {
    const COMMAND: &'static str = CMD_MODEL_GET;

    fn from_reply(reply: &[Reply]) -> Result<Self> {
        let mut backend = None;
        let mut device = None;
        let mut blob = None;
        let mut tag = None;
        let mut batch_size = 0;
        let mut min_batch_size = 0;
        let mut min_batch_timeout_ms = 0;
        let mut inputs = Vec::new();
        let mut outputs = Vec::new();

        for (label, value) in reply_pairs(reply) {
            match label.as_str() {
                "backend" => {
                    if let Some(token) = value.as_text() {
                        backend = Some(Backend::from_wire_token(&token)?);
                    }
                }
                "device" => device = value.as_text(),
                "tag" => tag = value.as_text(),
                "blob" => blob = value.as_bytes().map(<[u8]>::to_vec),
                "batchsize" => batch_size = value.as_u64().unwrap_or(0),
                "minbatchsize" => min_batch_size = value.as_u64().unwrap_or(0),
                "minbatchtimeout" => min_batch_timeout_ms = value.as_u64().unwrap_or(0),
                "inputs" => {
                    if let Some(names) = value.as_array() {
                        inputs = names.iter().filter_map(Reply::as_text).collect();
                    }
                }
                "outputs" => {
                    if let Some(names) = value.as_array() {
                        outputs = names.iter().filter_map(Reply::as_text).collect();
                    }
                }
                _ => {}
            }
        }

        match (backend, device, blob) {
            (Some(backend), Some(device), Some(blob)) => Ok(Self {
                backend,
                device,
                tag,
                batch_size,
                min_batch_size,
                min_batch_timeout_ms,
                inputs,
                outputs,
                blob,
                proto_max_payload_length: DEFAULT_PROTO_MAX_PAYLOAD_LENGTH,
            }),
            (backend, device, blob) => {
                let mut missing = Vec::new();
                if backend.is_none() {
                    missing.push("backend");
                }
                if device.is_none() {
                    missing.push("device");
                }
                if blob.is_none() {
                    missing.push("blob");
                }
                Err(ProtocolError::malformed(Self::COMMAND, &missing))
            }
        }
    }
}
