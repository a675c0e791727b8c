//! Domain entities and their per-command codecs.

mod model;
mod script;
mod stats;
mod tensor;

pub use model::Model;
pub use script::{Script, ScriptExecuteOptions};
pub use stats::Stats;
pub use tensor::{Tensor, TensorData};
