//! Tensor entity and codec.

use crate::args::CommandArg;
use crate::constants::{CMD_TENSOR_GET, DType};
use crate::error::{ProtocolError, Result};
use crate::reply::{reply_pairs, FromReply, Reply};

/// Payload carried by a tensor on a set operation.
#[derive(Debug, Clone, PartialEq)]
pub enum TensorData {
    /// Inline numeric values, sent as decimal tokens.
    Values(Vec<f64>),
    /// Raw binary payload, sent as a single blob argument.
    Blob(Vec<u8>),
}

/// An n-dimensional array exchanged with the service. Immutable once
/// built; the decoder produces a fresh value for every get reply.
#[derive(Debug, Clone, PartialEq)]
pub struct Tensor {
    dtype: DType,
    shape: Vec<usize>,
    data: Option<TensorData>,
}

impl Tensor {
    /// A tensor without data; the service zero-fills it on set.
    pub fn new(dtype: DType, shape: Vec<usize>) -> Self {
        Self {
            dtype,
            shape,
            data: None,
        }
    }

    pub fn with_values(dtype: DType, shape: Vec<usize>, values: Vec<f64>) -> Self {
        Self {
            dtype,
            shape,
            data: Some(TensorData::Values(values)),
        }
    }

    pub fn with_blob(dtype: DType, shape: Vec<usize>, blob: Vec<u8>) -> Self {
        Self {
            dtype,
            shape,
            data: Some(TensorData::Blob(blob)),
        }
    }

    pub fn dtype(&self) -> DType {
        self.dtype
    }

    pub fn shape(&self) -> &[usize] {
        &self.shape
    }

    pub fn data(&self) -> Option<&TensorData> {
        self.data.as_ref()
    }

    /// Inline numeric values, if this tensor holds them.
    pub fn values(&self) -> Option<&[f64]> {
        match &self.data {
            Some(TensorData::Values(values)) => Some(values),
            _ => None,
        }
    }

    /// Flat arguments for a tensor-set command:
    /// `key dtype dim... [BLOB bytes | VALUES v...]`.
    pub fn set_args(&self, key: &str) -> Vec<CommandArg> {
        let mut args: Vec<CommandArg> = vec![key.into(), self.dtype.wire_token().into()];
        args.extend(self.shape.iter().map(|dim| CommandArg::token(dim.to_string())));
        match &self.data {
            Some(TensorData::Blob(blob)) => {
                args.push("BLOB".into());
                args.push(CommandArg::Blob(blob.clone()));
            }
            Some(TensorData::Values(values)) => {
                args.push("VALUES".into());
                args.extend(values.iter().map(|v| CommandArg::token(v.to_string())));
            }
            None => {}
        }
        args
    }

    /// Flat arguments for a tensor-get command. Always requests metadata
    /// plus decoded values, never the raw blob.
    pub fn get_args(key: &str) -> Vec<CommandArg> {
        vec![key.into(), "META".into(), "VALUES".into()]
    }
}

impl FromReply for Tensor {
    const COMMAND: &'static str = CMD_TENSOR_GET;

    fn from_reply(reply: &[Reply]) -> Result<Self> {
        let mut dtype = None;
        let mut shape: Option<Vec<usize>> = None;
        let mut values: Option<Vec<f64>> = None;

        for (label, value) in reply_pairs(reply) {
            match label.as_str() {
                "dtype" => {
                    if let Some(token) = value.as_text() {
                        dtype = Some(DType::from_wire_token(&token)?);
                    }
                }
                "shape" => {
                    shape = value.as_array().and_then(|dims| {
                        dims.iter()
                            .map(|d| d.as_u64().map(|d| d as usize))
                            .collect()
                    });
                }
                "values" => {
                    values = value
                        .as_array()
                        .and_then(|vals| vals.iter().map(Reply::as_f64).collect());
                }
                _ => {}
            }
        }

        match (dtype, shape, values) {
            (Some(dtype), Some(shape), Some(values)) => Ok(Self {
                dtype,
                shape,
                data: Some(TensorData::Values(values)),
            }),
            (dtype, shape, values) => {
                let mut missing = Vec::new();
                if dtype.is_none() {
                    missing.push("dtype");
                }
                if shape.is_none() {
                    missing.push("shape");
                }
                if values.is_none() {
                    missing.push("values");
                }
                Err(ProtocolError::malformed(Self::COMMAND, &missing))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tokens(args: &[CommandArg]) -> Vec<&str> {
        args.iter().filter_map(CommandArg::as_token).collect()
    }

    #[test]
    fn test_set_args_with_values() {
        let tensor = Tensor::with_values(DType::Float, vec![1, 2], vec![3.0, 5.0]);
        let args = tensor.set_args("t1");
        assert_eq!(tokens(&args), ["t1", "FLOAT", "1", "2", "VALUES", "3", "5"]);
    }

    #[test]
    fn test_set_args_with_blob() {
        let tensor = Tensor::with_blob(DType::Uint8, vec![4], vec![1, 2, 3, 4]);
        let args = tensor.set_args("t1");
        assert_eq!(args[3].as_token(), Some("BLOB"));
        assert_eq!(args[4].as_blob(), Some(&[1u8, 2, 3, 4][..]));
    }

    #[test]
    fn test_set_args_without_data() {
        let tensor = Tensor::new(DType::Float, vec![1, 1]);
        let args = tensor.set_args("t1");
        assert_eq!(tokens(&args), ["t1", "FLOAT", "1", "1"]);
    }

    #[test]
    fn test_get_args() {
        assert_eq!(
            tokens(&Tensor::get_args("t1")),
            ["t1", "META", "VALUES"]
        );
    }

    #[test]
    fn test_from_reply_decodes_summation_result() {
        // Service-side elementwise sum of [2,3] and [4,12].
        let reply = vec![
            Reply::Data(b"dtype".to_vec()),
            Reply::Data(b"FLOAT".to_vec()),
            Reply::Data(b"shape".to_vec()),
            Reply::Array(vec![Reply::Integer(1), Reply::Integer(2)]),
            Reply::Data(b"values".to_vec()),
            Reply::Array(vec![
                Reply::Data(b"6".to_vec()),
                Reply::Data(b"15".to_vec()),
            ]),
        ];
        let tensor = Tensor::from_reply(&reply).unwrap();
        assert_eq!(tensor.dtype(), DType::Float);
        assert_eq!(tensor.shape(), [1, 2]);
        assert_eq!(tensor.values(), Some(&[6.0, 15.0][..]));
    }

    #[test]
    fn test_from_reply_roundtrips_set_values() {
        let sent = Tensor::with_values(DType::Double, vec![2, 2], vec![1.5, 2.0, -3.0, 0.0]);
        let reply = vec![
            Reply::Data(b"dtype".to_vec()),
            Reply::Data(sent.dtype().wire_token().as_bytes().to_vec()),
            Reply::Data(b"shape".to_vec()),
            Reply::Array(sent.shape().iter().map(|d| Reply::Integer(*d as i64)).collect()),
            Reply::Data(b"values".to_vec()),
            Reply::Array(
                sent.values()
                    .unwrap()
                    .iter()
                    .map(|v| Reply::Data(v.to_string().into_bytes()))
                    .collect(),
            ),
        ];
        let decoded = Tensor::from_reply(&reply).unwrap();
        assert_eq!(decoded, sent);
    }

    #[test]
    fn test_from_reply_empty_lists_all_required_fields() {
        let err = Tensor::from_reply(&[]).unwrap_err();
        assert_eq!(
            err,
            ProtocolError::MalformedReply {
                command: CMD_TENSOR_GET,
                missing: "dtype,shape,values".into(),
            }
        );
    }

    #[test]
    fn test_from_reply_reports_only_absent_fields() {
        let reply = vec![
            Reply::Data(b"dtype".to_vec()),
            Reply::Data(b"FLOAT".to_vec()),
            Reply::Data(b"shape".to_vec()),
            Reply::Array(vec![Reply::Integer(2)]),
        ];
        let err = Tensor::from_reply(&reply).unwrap_err();
        assert_eq!(
            err,
            ProtocolError::MalformedReply {
                command: CMD_TENSOR_GET,
                missing: "values".into(),
            }
        );
    }

    #[test]
    fn test_from_reply_rejects_unknown_dtype_token() {
        let reply = vec![
            Reply::Data(b"dtype".to_vec()),
            Reply::Data(b"FLOAT128".to_vec()),
        ];
        let err = Tensor::from_reply(&reply).unwrap_err();
        assert!(matches!(err, ProtocolError::UnknownToken { kind: "dtype", .. }));
    }

    #[test]
    fn test_from_reply_ignores_unknown_labels() {
        let reply = vec![
            Reply::Data(b"dtype".to_vec()),
            Reply::Data(b"INT32".to_vec()),
            Reply::Data(b"refcount".to_vec()),
            Reply::Integer(1),
            Reply::Data(b"shape".to_vec()),
            Reply::Array(vec![Reply::Integer(1)]),
            Reply::Data(b"values".to_vec()),
            Reply::Array(vec![Reply::Integer(9)]),
        ];
        let tensor = Tensor::from_reply(&reply).unwrap();
        assert_eq!(tensor.values(), Some(&[9.0][..]));
    }
}
