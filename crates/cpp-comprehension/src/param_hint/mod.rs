mod provider;

pub use provider::ParamHintProvider;

/// Signature hint for the function call under the cursor: the textual
/// parameter list of the callee and which argument the cursor is on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FunctionParamsHint {
    pub params: Vec<String>,
    pub current_index: usize,
}
