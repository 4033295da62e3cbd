// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Error types for the vigil rule engine.
//!
//! A single root [`VigilError`] covers both compile-time failures (syntax,
//! validation) and runtime failures (threshold evaluation, upstream stream
//! errors). Compile-time variants are returned synchronously from
//! `RuleEngine::build`; runtime variants travel in-band through verdict
//! streams as `StreamItem::Error` and terminate the stream that carries them.

/// Root error type for all vigil operations.
#[derive(Debug, Clone, thiserror::Error)]
pub enum VigilError {
    /// The rule text does not conform to the expression grammar.
    #[error("syntax error at offset {position}: {message}")]
    Syntax {
        /// Character offset into the rule text where the error was detected
        position: usize,
        /// Description of what the parser expected
        message: String,
    },

    /// The rule parsed but failed validation.
    #[error("invalid expression: {}", .errors.join("; "))]
    InvalidExpression {
        /// One message per validation failure
        errors: Vec<String>,
    },

    /// A threshold expression referenced a variable the resolver does not know.
    #[error("unresolved variable `{name}` in threshold expression")]
    UnresolvedVariable {
        /// The variable name that failed to resolve
        name: String,
    },

    /// A threshold expression divided by zero at evaluation time.
    #[error("division by zero in threshold expression")]
    DivisionByZero,

    /// An operator reached evaluation that the engine does not implement.
    ///
    /// Unreachable with a conforming parser; kept so programmatically built
    /// trees fail loudly instead of silently producing `false`.
    #[error("unsupported operator `{operator}`")]
    UnsupportedOperator {
        /// Textual form of the offending operator
        operator: String,
    },

    /// The sample source stream failed.
    #[error("upstream error: {context}")]
    Upstream {
        /// Description of the source failure
        context: String,
    },
}

impl VigilError {
    /// Create a syntax error at the given byte offset.
    pub fn syntax(position: usize, message: impl Into<String>) -> Self {
        Self::Syntax {
            position,
            message: message.into(),
        }
    }

    /// Create an upstream error with the given context.
    pub fn upstream(context: impl Into<String>) -> Self {
        Self::Upstream {
            context: context.into(),
        }
    }

    /// Returns `true` for errors surfaced before any subscription exists.
    ///
    /// Compile-time errors are returned from `build`; everything else flows
    /// through the verdict stream at runtime.
    #[must_use]
    pub const fn is_compile_time(&self) -> bool {
        matches!(self, Self::Syntax { .. } | Self::InvalidExpression { .. })
    }
}

/// Specialized `Result` type for vigil operations.
pub type Result<T> = std::result::Result<T, VigilError>;
