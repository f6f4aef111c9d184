//! Test variable error handling.
//!
//! Every failure the registry can produce is a usage error. They are returned
//! synchronously at the call site and are meant to fail the enclosing test.
//! Nothing here is ever logged-and-ignored.

use miette::Diagnostic;
use std::fmt;
use thiserror::Error;

/// Convenience alias used throughout the crate.
pub type Result<T, E = TestVarsError> = std::result::Result<T, E>;

/// The single error type raised by test variable registries.
#[derive(Error, Diagnostic, Debug, Clone, PartialEq, Eq)]
pub enum TestVarsError {
    #[error("Duplicate initialization of \"{name}\"")]
    #[diagnostic(
        code(test_vars::definition::duplicate),
        help("each name can only be declared once per registry; use `redefine` inside a before-each hook to vary it")
    )]
    DuplicateDefinition { name: String },

    #[error("\"setup()\" must be called before reading \"{name}\"")]
    #[diagnostic(
        code(test_vars::lifecycle::not_ready_read),
        help("call `setup()` in a before-each hook registered at the same scope as the declarations")
    )]
    NotReadyForRead { name: String },

    #[error("\"setup()\" must be called before redefining \"{name}\"")]
    #[diagnostic(
        code(test_vars::lifecycle::not_ready_redefine),
        help("redefine variables from a nested before-each hook, after `setup()` has run")
    )]
    NotReadyForRedefine { name: String },

    #[error("Cannot redefine a test subject")]
    #[diagnostic(
        code(test_vars::definition::subject_redefinition),
        help("redefine the variables the subject depends on instead")
    )]
    SubjectRedefinition,

    #[error("\"{name}\" is still pending and cannot be read synchronously")]
    #[diagnostic(
        code(test_vars::read::still_pending),
        help("await the value returned by `read()` instead of calling `get()`")
    )]
    StillPending { name: String },

    #[error("definition of \"{name}\" does not match the handle's value type")]
    #[diagnostic(code(test_vars::internal::type_mismatch))]
    TypeMismatch { name: String },

    #[error("invalid registry configuration: {reason}")]
    #[diagnostic(code(test_vars::config::invalid))]
    InvalidConfig { reason: String },
}

/// Fieldless classification of [`TestVarsError`], for matching in tests and hosts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    DuplicateDefinition,
    NotReady,
    SubjectRedefinition,
    StillPending,
    Internal,
    Config,
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::DuplicateDefinition => "DuplicateDefinition",
            ErrorKind::NotReady => "NotReady",
            ErrorKind::SubjectRedefinition => "SubjectRedefinition",
            ErrorKind::StillPending => "StillPending",
            ErrorKind::Internal => "Internal",
            ErrorKind::Config => "Config",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl TestVarsError {
    /// Returns the classification of this error.
    /// Both not-ready conditions share [`ErrorKind::NotReady`].
    pub fn kind(&self) -> ErrorKind {
        match self {
            TestVarsError::DuplicateDefinition { .. } => ErrorKind::DuplicateDefinition,
            TestVarsError::NotReadyForRead { .. } | TestVarsError::NotReadyForRedefine { .. } => {
                ErrorKind::NotReady
            }
            TestVarsError::SubjectRedefinition => ErrorKind::SubjectRedefinition,
            TestVarsError::StillPending { .. } => ErrorKind::StillPending,
            TestVarsError::TypeMismatch { .. } => ErrorKind::Internal,
            TestVarsError::InvalidConfig { .. } => ErrorKind::Config,
        }
    }

    /// The variable name the error refers to, if any.
    pub fn name(&self) -> Option<&str> {
        match self {
            TestVarsError::DuplicateDefinition { name }
            | TestVarsError::NotReadyForRead { name }
            | TestVarsError::NotReadyForRedefine { name }
            | TestVarsError::StillPending { name }
            | TestVarsError::TypeMismatch { name } => Some(name),
            TestVarsError::SubjectRedefinition | TestVarsError::InvalidConfig { .. } => None,
        }
    }
}
