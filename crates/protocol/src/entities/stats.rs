//! Execution statistics decoded from an info reply.

use crate::constants::{Backend, CMD_INFO};
use crate::error::{ProtocolError, Result};
use crate::reply::{reply_pairs, FromReply, Reply};

/// Per-key execution statistics reported by the service. `kind` is the
/// entity kind the key holds, e.g. `"model"` or `"script"`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Stats {
    pub key: String,
    pub kind: String,
    pub backend: Backend,
    pub device: String,
    pub tag: Option<String>,
    pub duration_us: u64,
    pub samples: u64,
    pub calls: u64,
    pub errors: u64,
}

impl FromReply for Stats {
    const COMMAND: &'static str = CMD_INFO;

    fn from_reply(reply: &[Reply]) -> Result<Self> {
        let mut key = None;
        let mut kind = None;
        let mut backend = None;
        let mut device = None;
        let mut tag = None;
        let mut duration_us = 0;
        let mut samples = 0;
        let mut calls = 0;
        let mut errors = 0;

        for (label, value) in reply_pairs(reply) {
            match label.as_str() {
                "key" => key = value.as_text(),
                "type" => kind = value.as_text(),
                "backend" => {
                    if let Some(token) = value.as_text() {
                        backend = Some(Backend::from_wire_token(&token)?);
                    }
                }
                "device" => device = value.as_text(),
                "tag" => tag = value.as_text(),
                "duration" => duration_us = value.as_u64().unwrap_or(0),
                "samples" => samples = value.as_u64().unwrap_or(0),
                "calls" => calls = value.as_u64().unwrap_or(0),
                "errors" => errors = value.as_u64().unwrap_or(0),
                _ => {}
            }
        }

        match (key, kind, backend, device) {
            (Some(key), Some(kind), Some(backend), Some(device)) => Ok(Self {
                key,
                kind,
                backend,
                device,
                tag,
                duration_us,
                samples,
                calls,
                errors,
            }),
            (key, kind, backend, device) => {
                let mut missing = Vec::new();
                if key.is_none() {
                    missing.push("key");
                }
                if kind.is_none() {
                    missing.push("type");
                }
                if backend.is_none() {
                    missing.push("backend");
                }
                if device.is_none() {
                    missing.push("device");
                }
                Err(ProtocolError::malformed(Self::COMMAND, &missing))
            }
        }
    }
}
