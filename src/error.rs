use thiserror::Error;

/// Errors raised while locating members or invoking synthesized accessors.
///
/// These only surface on the first use of a collection type whose
/// `Enumerable` implementation is internally inconsistent; a failed synthesis
/// is never cached, so a later call retries from scratch.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum SynthesisError {
    #[error("member `{member}` of `{type_name}` is bound to a foreign concrete type")]
    ForeignMember {
        type_name: &'static str,
        member: &'static str,
    },
    #[error("member `{member}` of `{type_name}` received a receiver of a different runtime type")]
    ForeignReceiver {
        type_name: &'static str,
        member: &'static str,
    },
    #[error("member `{member}` of `{type_name}` received an item of an unexpected type")]
    ForeignItem {
        type_name: &'static str,
        member: &'static str,
    },
    #[error("member `{member}` of `{type_name}` cannot answer a null query")]
    NoNullForm {
        type_name: &'static str,
        member: &'static str,
    },
    #[error("runtime description of `{type_name}` does not name a concrete type")]
    OpaqueRuntimeType { type_name: &'static str },
    #[error("description of `{type_name}` does not match the value it was produced from")]
    ForeignDescription { type_name: &'static str },
}

#[derive(Debug, Error, Clone, PartialEq)]
pub enum GuardError {
    #[error("argument `{argument}` {message}")]
    Violation {
        argument: &'static str,
        message: String,
    },
    #[error("accessor synthesis failed: {0}")]
    Synthesis(#[from] SynthesisError),
}

impl GuardError {
    /// The argument name a violation was reported for, if this is one.
    pub fn argument(&self) -> Option<&'static str> {
        match self {
            GuardError::Violation { argument, .. } => Some(argument),
            GuardError::Synthesis(_) => None,
        }
    }
}
