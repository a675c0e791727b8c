//! modelkv Client
//!
//! Thin async client for the modelkv tensor/model execution service. Every
//! method is a pure encode, one awaited transport call, and a pure decode;
//! ordering of multiple calls is caller-determined.
//!
//! # Example
//!
//! ```no_run
//! use modelkv_client::{Client, Transport};
//! use modelkv_protocol::{DType, Tensor};
//!
//! async fn run(transport: impl Transport) -> modelkv_client::Result<()> {
//!     let client = Client::new(transport);
//!
//!     let tensor = Tensor::with_values(DType::Float, vec![1, 2], vec![2.0, 3.0]);
//!     client.tensor_set("t1", &tensor).await?;
//!     let fetched = client.tensor_get("t1").await?;
//!     assert_eq!(fetched.values(), Some(&[2.0, 3.0][..]));
//!     Ok(())
//! }
//! ```

mod error;
mod transport;
pub mod util;

pub use error::{ClientError, Result};
pub use transport::{Transport, TransportError};

use modelkv_protocol::{
    CommandArg, Dag, DagExecuteOptions, DagExecuteReadOnlyOptions, DagReply, FromReply, Model,
    Reply, Script, ScriptExecuteOptions, Stats, Tensor, CMD_DAG_EXECUTE, CMD_DAG_EXECUTE_RO,
    CMD_DAG_RUN, CMD_INFO, CMD_MODEL_DEL, CMD_MODEL_EXECUTE, CMD_MODEL_GET, CMD_MODEL_RUN,
    CMD_MODEL_SET, CMD_MODEL_STORE, CMD_SCRIPT_DEL, CMD_SCRIPT_EXECUTE, CMD_SCRIPT_GET,
    CMD_SCRIPT_RUN, CMD_SCRIPT_SET, CMD_TENSOR_GET, CMD_TENSOR_SET,
};
use tracing::debug;

/// Client over an abstract transport. Pure marshaling on both sides of a
/// single awaited `send_command`; no caching, pooling or retry here.
pub struct Client<T: Transport> {
    transport: T,
}

impl<T: Transport> Client<T> {
    pub fn new(transport: T) -> Self {
        Self { transport }
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn into_transport(self) -> T {
        self.transport
    }

    async fn send(&self, command: &str, args: Vec<CommandArg>) -> Result<Reply> {
        debug!(command, args = args.len(), "sending command");
        Ok(self.transport.send_command(command, args).await?)
    }

    /// Decode a metadata-query reply; non-array replies decode as empty
    /// and so report every required field missing.
    fn decode<E: FromReply>(reply: &Reply) -> Result<E> {
        Ok(E::from_reply(reply.as_array().unwrap_or(&[]))?)
    }

    fn sub_replies(reply: Reply) -> Vec<Reply> {
        match reply {
            Reply::Array(entries) => entries,
            other => vec![other],
        }
    }

    /// Store a tensor under `key`. The service zero-fills tensors sent
    /// without data.
    pub async fn tensor_set(&self, key: &str, tensor: &Tensor) -> Result<Reply> {
        self.send(CMD_TENSOR_SET, tensor.set_args(key)).await
    }

    /// Fetch the tensor stored under `key`, with its values decoded.
    pub async fn tensor_get(&self, key: &str) -> Result<Tensor> {
        let reply = self.send(CMD_TENSOR_GET, Tensor::get_args(key)).await?;
        Self::decode(&reply)
    }

    /// Store a model via the legacy set command.
    pub async fn model_set(&self, key: &str, model: &Model) -> Result<Reply> {
        self.send(CMD_MODEL_SET, model.store_args(key)).await
    }

    /// Store a model, chunking its blob when it exceeds the model's
    /// payload-length ceiling.
    pub async fn model_store(&self, key: &str, model: &Model) -> Result<Reply> {
        self.send(CMD_MODEL_STORE, model.store_args(key)).await
    }

    /// Run a stored model (legacy grammar).
    pub async fn model_run(
        &self,
        key: &str,
        inputs: &[String],
        outputs: &[String],
    ) -> Result<Reply> {
        self.send(CMD_MODEL_RUN, Model::run_args(key, inputs, outputs))
            .await
    }

    /// Execute a stored model.
    pub async fn model_execute(
        &self,
        key: &str,
        inputs: &[String],
        outputs: &[String],
        timeout_ms: Option<u64>,
    ) -> Result<Reply> {
        self.send(
            CMD_MODEL_EXECUTE,
            Model::execute_args(key, inputs, outputs, timeout_ms),
        )
        .await
    }

    /// Fetch a stored model, blob included.
    pub async fn model_get(&self, key: &str) -> Result<Model> {
        let reply = self.send(CMD_MODEL_GET, Model::get_args(key)).await?;
        Self::decode(&reply)
    }

    pub async fn model_del(&self, key: &str) -> Result<Reply> {
        self.send(CMD_MODEL_DEL, vec![key.into()]).await
    }

    pub async fn script_set(&self, key: &str, script: &Script) -> Result<Reply> {
        self.send(CMD_SCRIPT_SET, script.set_args(key)).await
    }

    /// Run a function of a stored script (legacy grammar).
    pub async fn script_run(
        &self,
        key: &str,
        function: &str,
        inputs: &[String],
        outputs: &[String],
    ) -> Result<Reply> {
        self.send(CMD_SCRIPT_RUN, Script::run_args(key, function, inputs, outputs))
            .await
    }

    /// Execute a function of a stored script.
    pub async fn script_execute(
        &self,
        key: &str,
        function: &str,
        options: &ScriptExecuteOptions,
    ) -> Result<Reply> {
        self.send(
            CMD_SCRIPT_EXECUTE,
            Script::execute_args(key, function, options),
        )
        .await
    }

    pub async fn script_get(&self, key: &str) -> Result<Script> {
        let reply = self.send(CMD_SCRIPT_GET, Script::get_args(key)).await?;
        Self::decode(&reply)
    }

    pub async fn script_del(&self, key: &str) -> Result<Reply> {
        self.send(CMD_SCRIPT_DEL, vec![key.into()]).await
    }

    /// Execution statistics for the model or script stored under `key`.
    pub async fn info(&self, key: &str) -> Result<Stats> {
        let reply = self.send(CMD_INFO, vec![key.into()]).await?;
        Self::decode(&reply)
    }

    /// Reset all statistics associated with `key`.
    pub async fn info_reset_stat(&self, key: &str) -> Result<Reply> {
        self.send(CMD_INFO, vec![key.into(), "RESETSTAT".into()])
            .await
    }

    /// Run a DAG via the legacy pipeline command. Consumes the DAG; a
    /// transport fault fails the whole batch.
    pub async fn dag_run(
        &self,
        dag: Dag,
        load: &[String],
        persist: &[String],
    ) -> Result<Vec<DagReply>> {
        let reply = self.send(CMD_DAG_RUN, dag.run_args(load, persist)).await?;
        Ok(dag.process_reply(Self::sub_replies(reply))?)
    }

    /// Execute a DAG. Consumes the DAG; a transport fault fails the whole
    /// batch.
    pub async fn dag_execute(
        &self,
        dag: Dag,
        options: &DagExecuteOptions,
    ) -> Result<Vec<DagReply>> {
        let reply = self.send(CMD_DAG_EXECUTE, dag.execute_args(options)).await?;
        Ok(dag.process_reply(Self::sub_replies(reply))?)
    }

    /// Execute a DAG through the read-only command variant.
    pub async fn dag_execute_readonly(
        &self,
        dag: Dag,
        options: &DagExecuteReadOnlyOptions,
    ) -> Result<Vec<DagReply>> {
        let reply = self
            .send(CMD_DAG_EXECUTE_RO, dag.execute_readonly_args(options))
            .await?;
        Ok(dag.process_reply(Self::sub_replies(reply))?)
    }
}
