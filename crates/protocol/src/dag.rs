//! DAG batch builder: accumulates sub-commands for a single pipelined
//! call and reinterprets the pipelined reply.

use crate::args::{optional_argument, variadic_argument, CommandArg};
use crate::constants::{
    CMD_MODEL_EXECUTE, CMD_MODEL_RUN, CMD_SCRIPT_EXECUTE, CMD_SCRIPT_RUN, CMD_TENSOR_GET,
    CMD_TENSOR_SET, PIPELINE_SEPARATOR,
};
use crate::entities::{Model, Script, ScriptExecuteOptions, Tensor};
use crate::error::Result;
use crate::reply::{FromReply, Reply};

/// One accumulated sub-command: its full token sequence (command name
/// first) together with whether its sub-reply decodes as a tensor. Keeping
/// both in one record makes the command/flag pairing structural.
#[derive(Debug, Clone)]
struct DagCommand {
    args: Vec<CommandArg>,
    expects_tensor: bool,
}

/// A client-side batch of sub-commands pipelined as one remote call.
/// Build it with the chaining methods, then hand it to the client's dag
/// call, which consumes it exactly once.
#[derive(Debug, Clone, Default)]
pub struct Dag {
    commands: Vec<DagCommand>,
}

/// Options for the write-capable dag-execute command.
#[derive(Debug, Clone, Default)]
pub struct DagExecuteOptions {
    pub load: Vec<String>,
    pub persist: Vec<String>,
    pub keys: Vec<String>,
    pub timeout_ms: Option<u64>,
}

/// Options for the read-only dag-execute variant; no PERSIST section.
#[derive(Debug, Clone, Default)]
pub struct DagExecuteReadOnlyOptions {
    pub load: Vec<String>,
    pub keys: Vec<String>,
    pub timeout_ms: Option<u64>,
}

/// One entry of a post-processed pipelined reply.
#[derive(Debug, Clone, PartialEq)]
pub enum DagReply {
    /// Sub-reply passed through untouched.
    Raw(Reply),
    /// Tensor-get sub-reply decoded in place.
    Tensor(Tensor),
}

impl Dag {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    fn push(
        &mut self,
        command: &'static str,
        tail: Vec<CommandArg>,
        expects_tensor: bool,
    ) -> &mut Self {
        let mut args = Vec::with_capacity(tail.len() + 1);
        args.push(CommandArg::token(command));
        args.extend(tail);
        self.commands.push(DagCommand {
            args,
            expects_tensor,
        });
        self
    }

    pub fn tensor_set(&mut self, key: &str, tensor: &Tensor) -> &mut Self {
        self.push(CMD_TENSOR_SET, tensor.set_args(key), false)
    }

    pub fn tensor_get(&mut self, key: &str) -> &mut Self {
        self.push(CMD_TENSOR_GET, Tensor::get_args(key), true)
    }

    /// Legacy model-run sub-command.
    pub fn model_run(&mut self, key: &str, inputs: &[String], outputs: &[String]) -> &mut Self {
        self.push(CMD_MODEL_RUN, Model::run_args(key, inputs, outputs), false)
    }

    pub fn model_execute(
        &mut self,
        key: &str,
        inputs: &[String],
        outputs: &[String],
        timeout_ms: Option<u64>,
    ) -> &mut Self {
        self.push(
            CMD_MODEL_EXECUTE,
            Model::execute_args(key, inputs, outputs, timeout_ms),
            false,
        )
    }

    /// Legacy script-run sub-command.
    pub fn script_run(
        &mut self,
        key: &str,
        function: &str,
        inputs: &[String],
        outputs: &[String],
    ) -> &mut Self {
        self.push(
            CMD_SCRIPT_RUN,
            Script::run_args(key, function, inputs, outputs),
            false,
        )
    }

    pub fn script_execute(
        &mut self,
        key: &str,
        function: &str,
        options: &ScriptExecuteOptions,
    ) -> &mut Self {
        self.push(
            CMD_SCRIPT_EXECUTE,
            Script::dag_execute_args(key, function, options),
            false,
        )
    }

    /// Legacy pipeline grammar:
    /// `[LOAD n k...] [PERSIST n k...] (|> subcommand)+`.
    pub fn run_args(&self, load: &[String], persist: &[String]) -> Vec<CommandArg> {
        let mut args = Vec::new();
        args.extend(variadic_argument("LOAD", load));
        args.extend(variadic_argument("PERSIST", persist));
        self.append_pipeline(&mut args);
        args
    }

    /// Current pipeline grammar:
    /// `[LOAD n k...] [PERSIST n k...] [KEYS n k...] [TIMEOUT t]
    /// (|> subcommand)+`.
    pub fn execute_args(&self, options: &DagExecuteOptions) -> Vec<CommandArg> {
        let mut args = Vec::new();
        args.extend(variadic_argument("LOAD", &options.load));
        args.extend(variadic_argument("PERSIST", &options.persist));
        args.extend(variadic_argument("KEYS", &options.keys));
        args.extend(optional_argument("TIMEOUT", options.timeout_ms));
        self.append_pipeline(&mut args);
        args
    }

    /// Read-only pipeline grammar; PERSIST is not accepted.
    pub fn execute_readonly_args(&self, options: &DagExecuteReadOnlyOptions) -> Vec<CommandArg> {
        let mut args = Vec::new();
        args.extend(variadic_argument("LOAD", &options.load));
        args.extend(variadic_argument("KEYS", &options.keys));
        args.extend(optional_argument("TIMEOUT", options.timeout_ms));
        self.append_pipeline(&mut args);
        args
    }

    fn append_pipeline(&self, args: &mut Vec<CommandArg>) {
        for command in &self.commands {
            args.push(CommandArg::token(PIPELINE_SEPARATOR));
            args.extend(command.args.iter().cloned());
        }
    }

    /// Reinterpret the pipelined reply: the entry of every tensor-get
    /// sub-command is decoded into a tensor at its original position, all
    /// other entries pass through. The output has the input's length.
    pub fn process_reply(&self, replies: Vec<Reply>) -> Result<Vec<DagReply>> {
        let mut out = Vec::with_capacity(replies.len());
        for (index, reply) in replies.into_iter().enumerate() {
            let expects_tensor = self
                .commands
                .get(index)
                .is_some_and(|command| command.expects_tensor);
            if expects_tensor {
                let pairs = reply.as_array().unwrap_or(&[]);
                out.push(DagReply::Tensor(Tensor::from_reply(pairs)?));
            } else {
                out.push(DagReply::Raw(reply));
            }
        }
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::DType;
    use crate::error::ProtocolError;

    fn tokens(args: &[CommandArg]) -> Vec<&str> {
        args.iter().filter_map(CommandArg::as_token).collect()
    }

    fn tensor_get_reply(values: &[i64]) -> Reply {
        Reply::Array(vec![
            Reply::Data(b"dtype".to_vec()),
            Reply::Data(b"FLOAT".to_vec()),
            Reply::Data(b"shape".to_vec()),
            Reply::Array(vec![Reply::Integer(1), Reply::Integer(values.len() as i64)]),
            Reply::Data(b"values".to_vec()),
            Reply::Array(values.iter().map(|v| Reply::Integer(*v)).collect()),
        ])
    }

    #[test]
    fn test_chaining_appends_in_order() {
        let tensor = Tensor::with_values(DType::Float, vec![1], vec![1.0]);
        let mut dag = Dag::new();
        dag.tensor_set("a", &tensor)
            .model_run("m", &["a".to_string()], &["b".to_string()])
            .tensor_get("b");
        assert_eq!(dag.len(), 3);
    }

    #[test]
    fn test_run_args_legacy_layout() {
        let mut dag = Dag::new();
        dag.tensor_get("out");
        let args = dag.run_args(&["in".to_string()], &["out".to_string()]);
        assert_eq!(
            tokens(&args),
            [
                "LOAD", "1", "in", "PERSIST", "1", "out", "|>", "AI.TENSORGET", "out", "META",
                "VALUES",
            ]
        );
    }

    #[test]
    fn test_run_args_omits_empty_key_lists() {
        let mut dag = Dag::new();
        dag.tensor_get("t");
        let toks = dag.run_args(&[], &[]);
        let toks = tokens(&toks);
        assert!(!toks.contains(&"LOAD"));
        assert!(!toks.contains(&"PERSIST"));
        assert_eq!(toks[0], "|>");
    }

    #[test]
    fn test_execute_args_layout() {
        let mut dag = Dag::new();
        dag.tensor_get("t");
        let options = DagExecuteOptions {
            load: vec!["a".into()],
            persist: vec!["t".into()],
            keys: vec!["a".into(), "t".into()],
            timeout_ms: Some(250),
        };
        let args = dag.execute_args(&options);
        assert_eq!(
            tokens(&args),
            [
                "LOAD", "1", "a", "PERSIST", "1", "t", "KEYS", "2", "a", "t", "TIMEOUT", "250",
                "|>", "AI.TENSORGET", "t", "META", "VALUES",
            ]
        );
    }

    #[test]
    fn test_execute_readonly_args_has_no_persist() {
        let mut dag = Dag::new();
        dag.tensor_get("t");
        let options = DagExecuteReadOnlyOptions {
            load: vec!["a".into()],
            keys: vec![],
            timeout_ms: None,
        };
        let toks = dag.execute_readonly_args(&options);
        assert!(!tokens(&toks).contains(&"PERSIST"));
    }

    #[test]
    fn test_script_execute_subcommand_drops_keys() {
        let mut dag = Dag::new();
        let options = ScriptExecuteOptions {
            keys: vec!["k".into()],
            inputs: vec!["a".into()],
            outputs: vec!["b".into()],
            ..Default::default()
        };
        dag.script_execute("s", "fn", &options);
        let args = dag.execute_args(&DagExecuteOptions::default());
        assert!(!tokens(&args).contains(&"KEYS"));
    }

    #[test]
    fn test_process_reply_decodes_only_tensor_get_entries() {
        let tensor = Tensor::with_values(DType::Float, vec![1, 2], vec![2.0, 3.0]);
        let mut dag = Dag::new();
        dag.tensor_set("a", &tensor)
            .tensor_set("b", &tensor)
            .model_run("m", &["a".to_string(), "b".to_string()], &["c".to_string()])
            .tensor_get("c");

        let replies = vec![
            Reply::Status("OK".into()),
            Reply::Status("OK".into()),
            Reply::Status("OK".into()),
            tensor_get_reply(&[6, 15]),
        ];
        let processed = dag.process_reply(replies).unwrap();

        assert_eq!(processed.len(), 4);
        assert_eq!(processed[0], DagReply::Raw(Reply::Status("OK".into())));
        assert_eq!(processed[2], DagReply::Raw(Reply::Status("OK".into())));
        match &processed[3] {
            DagReply::Tensor(t) => {
                assert_eq!(t.values(), Some(&[6.0, 15.0][..]));
                assert_eq!(t.shape(), [1, 2]);
            }
            other => panic!("expected decoded tensor, got {other:?}"),
        }
    }

    #[test]
    fn test_process_reply_propagates_decode_failure() {
        let mut dag = Dag::new();
        dag.tensor_get("t");
        let err = dag
            .process_reply(vec![Reply::Status("OK".into())])
            .unwrap_err();
        assert!(matches!(err, ProtocolError::MalformedReply { .. }));
    }

    #[test]
    fn test_process_reply_backend_error_entry_passes_through() {
        // Entries for non-tensor-get sub-commands pass through even when
        // the service reports a per-entry failure string.
        let mut dag = Dag::new();
        let tensor = Tensor::with_values(DType::Float, vec![1], vec![1.0]);
        dag.tensor_set("a", &tensor);
        let processed = dag
            .process_reply(vec![Reply::Status("ERR wrong dtype".into())])
            .unwrap();
        assert_eq!(
            processed[0],
            DagReply::Raw(Reply::Status("ERR wrong dtype".into()))
        );
    }
}
