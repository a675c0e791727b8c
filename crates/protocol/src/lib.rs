//! modelkv Protocol Crate
//!
//! Wire marshaling for the modelkv command protocol: flattening tensors,
//! models and scripts into positional command arguments, parsing flat
//! label/value replies back into typed entities, and building `|>`-piped
//! DAG batches. Everything here is pure and synchronous; the network
//! boundary lives in the client crate.

mod args;
mod constants;
mod dag;
mod entities;
mod error;
mod reply;

pub use args::{optional_argument, variadic_argument, CommandArg};
pub use constants::*;
pub use dag::{Dag, DagExecuteOptions, DagExecuteReadOnlyOptions, DagReply};
pub use entities::{
    Model, Script, ScriptExecuteOptions, Stats, Tensor, TensorData,
};
pub use error::{ProtocolError, Result};
pub use reply::{reply_pairs, FromReply, Reply};
