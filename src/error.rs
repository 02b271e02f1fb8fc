//! Application error type.
//!
//! Every fatal condition in the pipeline is an `AppError` carrying the process
//! exit code that `main` should return:
//!
//! - `2`: input, schema, or configuration problems
//! - `3`: the input exists but holds no usable data
//! - `4`: rendering or output write failures

#[derive(Clone, PartialEq, Eq)]
pub struct AppError {
    exit_code: u8,
    message: String,
}

impl AppError {
    pub fn new(exit_code: u8, message: impl Into<String>) -> Self {
        Self {
            exit_code,
            message: message.into(),
        }
    }

    /// Missing/unreadable input, schema mismatch, or invalid configuration.
    pub fn input(message: impl Into<String>) -> Self {
        Self::new(2, message)
    }

    /// The input was readable but contributed nothing to work with.
    pub fn no_data(message: impl Into<String>) -> Self {
        Self::new(3, message)
    }

    /// Drawing or writing the output artifact failed.
    pub fn output(message: impl Into<String>) -> Self {
        Self::new(4, message)
    }

    pub fn exit_code(&self) -> u8 {
        self.exit_code
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::fmt::Debug for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppError")
            .field("exit_code", &self.exit_code)
            .field("message", &self.message)
            .finish()
    }
}

impl std::error::Error for AppError {}
