use std::{error::Error, fmt::Display};

/// Runtime failure kinds. The displayed form is the bare message, which is
/// also what a `catch` binding observes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RuntimeError {
    Type(String),
    Name(String),
    Index(String),
    ZeroDivision(String),
    User(String),
}

pub type RuntimeResult<T> = Result<T, RuntimeError>;

impl RuntimeError {
    pub fn message(&self) -> &str {
        match self {
            RuntimeError::Type(message)
            | RuntimeError::Name(message)
            | RuntimeError::Index(message)
            | RuntimeError::ZeroDivision(message)
            | RuntimeError::User(message) => message,
        }
    }
}

impl Display for RuntimeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.message())
    }
}

impl Error for RuntimeError {}
