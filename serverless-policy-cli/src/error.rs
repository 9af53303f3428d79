use thiserror::Error;

/// Exit code for runtime failures
pub const EXIT_FAILURE: u8 = 1;
/// Exit code for usage errors
pub const EXIT_USAGE: u8 = 2;

/// Invalid invocation: missing or malformed input supplied by the user
#[derive(Debug, Error)]
#[error("{0}")]
pub struct UsageError(pub String);

impl UsageError {
    pub fn new(message: impl Into<String>) -> Self {
        Self(message.into())
    }
}

/// Map an error chain to the process exit code
pub fn exit_code_for(err: &anyhow::Error) -> u8 {
    if err.chain().any(|cause| cause.is::<UsageError>()) {
        EXIT_USAGE
    } else {
        EXIT_FAILURE
    }
}
