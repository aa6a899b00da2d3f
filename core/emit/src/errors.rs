use thiserror::Error;

/// Generation faults. The pipeline skips the faulted collection and keeps
/// emitting the others.
#[derive(Error, Debug)]
#[must_use = "errors must not be silently ignored"]
pub enum EmitError {
    #[error(
        "option `{option}` of collection `{collection}` has no parameterless constructor"
    )]
    NoUsableConstructor { collection: String, option: String },
}
