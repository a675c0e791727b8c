//! Protocol constants: command names, the pipeline separator, and the
//! scalar wire enums with their token tables.

use crate::error::{ProtocolError, Result};

pub const CMD_TENSOR_SET: &str = "AI.TENSORSET";
pub const CMD_TENSOR_GET: &str = "AI.TENSORGET";
pub const CMD_MODEL_SET: &str = "AI.MODELSET";
pub const CMD_MODEL_STORE: &str = "AI.MODELSTORE";
pub const CMD_MODEL_RUN: &str = "AI.MODELRUN";
pub const CMD_MODEL_EXECUTE: &str = "AI.MODELEXECUTE";
pub const CMD_MODEL_GET: &str = "AI.MODELGET";
pub const CMD_MODEL_DEL: &str = "AI.MODELDEL";
pub const CMD_SCRIPT_SET: &str = "AI.SCRIPTSET";
pub const CMD_SCRIPT_RUN: &str = "AI.SCRIPTRUN";
pub const CMD_SCRIPT_EXECUTE: &str = "AI.SCRIPTEXECUTE";
pub const CMD_SCRIPT_GET: &str = "AI.SCRIPTGET";
pub const CMD_SCRIPT_DEL: &str = "AI.SCRIPTDEL";
pub const CMD_INFO: &str = "AI.INFO";
pub const CMD_DAG_RUN: &str = "AI.DAGRUN";
pub const CMD_DAG_EXECUTE: &str = "AI.DAGEXECUTE";
pub const CMD_DAG_EXECUTE_RO: &str = "AI.DAGEXECUTE_RO";

/// Separator token between sub-commands in a DAG pipeline.
pub const PIPELINE_SEPARATOR: &str = "|>";

/// Default ceiling on a single binary argument; larger model blobs are
/// split into consecutive chunks of at most this many bytes.
pub const DEFAULT_PROTO_MAX_PAYLOAD_LENGTH: usize = 512 * 1024 * 1024;

/// Tensor element types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DType {
    Float,
    Double,
    Int8,
    Int16,
    Int32,
    Int64,
    Uint8,
    Uint16,
}

impl DType {
    /// Canonical wire token for this dtype.
    pub fn wire_token(self) -> &'static str {
        match self {
            DType::Float => "FLOAT",
            DType::Double => "DOUBLE",
            DType::Int8 => "INT8",
            DType::Int16 => "INT16",
            DType::Int32 => "INT32",
            DType::Int64 => "INT64",
            DType::Uint8 => "UINT8",
            DType::Uint16 => "UINT16",
        }
    }

    /// Reverse lookup from a received wire token.
    pub fn from_wire_token(token: &str) -> Result<Self> {
        match token {
            "FLOAT" => Ok(DType::Float),
            "DOUBLE" => Ok(DType::Double),
            "INT8" => Ok(DType::Int8),
            "INT16" => Ok(DType::Int16),
            "INT32" => Ok(DType::Int32),
            "INT64" => Ok(DType::Int64),
            "UINT8" => Ok(DType::Uint8),
            "UINT16" => Ok(DType::Uint16),
            _ => Err(ProtocolError::UnknownToken {
                kind: "dtype",
                token: token.to_owned(),
            }),
        }
    }
}

/// Execution engine identifiers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Backend {
    /// TensorFlow graph backend
    Tf,
    /// Torch backend
    Torch,
    /// ONNX runtime backend
    Onnx,
    /// TensorFlow Lite backend
    TfLite,
}

impl Backend {
    /// Canonical wire token for this backend.
    ///
    /// The ONNX backend emits `ONNX`; see `from_wire_token` for the
    /// historical `ORT` spelling some service versions reply with.
    pub fn wire_token(self) -> &'static str {
        match self {
            Backend::Tf => "TF",
            Backend::Torch => "TORCH",
            Backend::Onnx => "ONNX",
            Backend::TfLite => "TFLITE",
        }
    }

    /// Reverse lookup from a received wire token. Accepts every token a
    /// deployed service version has been observed to emit, which is a
    /// superset of what `wire_token` produces.
    pub fn from_wire_token(token: &str) -> Result<Self> {
        match token {
            "TF" => Ok(Backend::Tf),
            "TORCH" => Ok(Backend::Torch),
            "ONNX" | "ORT" => Ok(Backend::Onnx),
            "TFLITE" => Ok(Backend::TfLite),
            _ => Err(ProtocolError::UnknownToken {
                kind: "backend",
                token: token.to_owned(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dtype_token_roundtrip() {
        for dtype in [
            DType::Float,
            DType::Double,
            DType::Int8,
            DType::Int16,
            DType::Int32,
            DType::Int64,
            DType::Uint8,
            DType::Uint16,
        ] {
            assert_eq!(DType::from_wire_token(dtype.wire_token()).unwrap(), dtype);
        }
    }

    #[test]
    fn test_dtype_unknown_token() {
        let err = DType::from_wire_token("COMPLEX128").unwrap_err();
        assert!(matches!(err, ProtocolError::UnknownToken { kind: "dtype", .. }));
    }

    #[test]
    fn test_backend_token_roundtrip() {
        for backend in [Backend::Tf, Backend::Torch, Backend::Onnx, Backend::TfLite] {
            assert_eq!(
                Backend::from_wire_token(backend.wire_token()).unwrap(),
                backend
            );
        }
    }

    #[test]
    fn test_backend_accepts_historical_ort_token() {
        assert_eq!(Backend::from_wire_token("ORT").unwrap(), Backend::Onnx);
        assert_eq!(Backend::Onnx.wire_token(), "ONNX");
    }

    #[test]
    fn test_backend_unknown_token() {
        let err = Backend::from_wire_token("CAFFE").unwrap_err();
        assert!(matches!(
            err,
            ProtocolError::UnknownToken { kind: "backend", .. }
        ));
    }
}
