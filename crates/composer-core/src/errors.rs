//! Structured error types shared across composer crates.

use std::collections::BTreeMap;
use std::fmt::{self, Display};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::multiset::TypeName;

/// Structured payload attached to every [`ComposeError`] variant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorInfo {
    /// Stable machine readable error code.
    pub code: String,
    /// Human readable diagnostic message.
    pub message: String,
    /// Contextual key value pairs (type names, depths, identifiers).
    #[serde(default)]
    pub context: BTreeMap<String, String>,
    /// Optional hint that may help the caller resolve the issue.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hint: Option<String>,
}

impl ErrorInfo {
    /// Creates a new error payload with the provided code and message.
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            context: BTreeMap::new(),
            hint: None,
        }
    }

    /// Adds a context entry to the payload.
    pub fn with_context(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.context.insert(key.into(), value.into());
        self
    }

    /// Sets a human readable hint for remediation.
    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }
}

impl Display for ErrorInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (code: {})", self.message, self.code)?;
        if !self.context.is_empty() {
            write!(f, " | context: [")?;
            for (idx, (key, value)) in self.context.iter().enumerate() {
                if idx > 0 {
                    write!(f, ", ")?;
                }
                write!(f, "{key}={value}")?;
            }
            write!(f, "]")?;
        }
        if let Some(hint) = &self.hint {
            write!(f, " | hint: {hint}")?;
        }
        Ok(())
    }
}

/// Canonical error type for a synthesis request.
///
/// Errors are local to one request and never retried internally.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Error)]
#[serde(tag = "family", content = "detail")]
pub enum ComposeError {
    /// No primitive is available to sample from.
    #[error("empty registry: {0}")]
    EmptyRegistry(ErrorInfo),
    /// The depth budget is spent and leftover types have no constant generator.
    #[error("unsatisfiable frontier: {0}")]
    UnsatisfiableFrontier(ErrorInfo),
    /// The request, registry or configuration is malformed.
    #[error("invalid specification: {0}")]
    InvalidSpecification(ErrorInfo),
    /// Structural violations detected in a composed graph.
    #[error("graph error: {0}")]
    Graph(ErrorInfo),
    /// Serialization, schema and file errors.
    #[error("serde error: {0}")]
    Serde(ErrorInfo),
}

impl ComposeError {
    /// Returns a reference to the payload describing the error.
    pub fn info(&self) -> &ErrorInfo {
        match self {
            ComposeError::EmptyRegistry(info)
            | ComposeError::UnsatisfiableFrontier(info)
            | ComposeError::InvalidSpecification(info)
            | ComposeError::Graph(info)
            | ComposeError::Serde(info) => info,
        }
    }

    /// Returns the stable error code.
    pub fn code(&self) -> &str {
        &self.info().code
    }

    /// Builds the error raised when leftover frontier types cannot be turned into constants.
    pub fn unsatisfiable(unresolved: &[TypeName], depth: u32, max_depth: u32) -> Self {
        let mut names: Vec<&str> = unresolved.iter().map(TypeName::as_str).collect();
        names.sort_unstable();
        names.dedup();
        ComposeError::UnsatisfiableFrontier(
            ErrorInfo::new(
                "no-constant-generator",
                "leftover frontier types have no constant generator",
            )
            .with_context("unresolved", names.join(","))
            .with_context("depth", depth.to_string())
            .with_context("max_depth", max_depth.to_string())
            .with_hint("register a constant generator or a primitive producing these types"),
        )
    }

    /// Returns the unresolved types named by an [`ComposeError::UnsatisfiableFrontier`].
    pub fn unresolved_types(&self) -> Vec<TypeName> {
        match self {
            ComposeError::UnsatisfiableFrontier(info) => info
                .context
                .get("unresolved")
                .map(|list| {
                    list.split(',')
                        .filter(|name| !name.is_empty())
                        .map(TypeName::new)
                        .collect()
                })
                .unwrap_or_default(),
            _ => Vec::new(),
        }
    }
}
