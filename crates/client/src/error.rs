//! Client error types

use modelkv_protocol::ProtocolError;
use thiserror::Error;

use crate::transport::TransportError;

#[derive(Error, Debug)]
pub enum ClientError {
    /// A reply could not be decoded into its entity.
    #[error(transparent)]
    Protocol(#[from] ProtocolError),

    /// The transport call failed. The original fault surfaces unchanged;
    /// there is no retry and no wrapping of the message.
    #[error(transparent)]
    Transport(#[from] TransportError),
}

pub type Result<T> = std::result::Result<T, ClientError>;
