//! Error handling for deporder
//!
//! This module provides the error taxonomy shared by the resolver, the
//! declaration registry, the hierarchy lookups and the field population
//! helpers, together with user-friendly error reporting for the CLI.
//!
//! # Architecture
//!
//! The error system consists of three types:
//! - [`DepError`] - Enumerated error types for every failure the crate can raise
//! - [`ErrorKind`] - Fieldless tag identifying a [`DepError`] variant
//! - [`ErrorContext`] - Wrapper that adds user-friendly details and suggestions
//!
//! # Error Categories
//!
//! - **Ordering**: [`DepError::CircularDependency`], [`DepError::MissingDependency`]
//! - **Consistency**: [`DepError::DuplicateDependency`], [`DepError::UnsatisfiedDependency`],
//!   [`DepError::MissingMainComponent`], [`DepError::MissingRequiredValue`]
//! - **Hierarchy**: [`DepError::MissingParent`], [`DepError::MissingComponentInParent`],
//!   [`DepError::MissingComponentInChildren`]
//! - **Fields**: [`DepError::UnserializableField`], [`DepError::InvalidFieldValue`]
//! - **Declarations**: [`DepError::Configuration`]
//!
//! Every error is raised at the point of detection and propagated to the
//! caller. Nothing in this crate retries or recovers.
//!
//! # Examples
//!
//! ```rust,no_run
//! use deporder::core::{DepError, ErrorKind, user_friendly_error};
//!
//! let error = DepError::CircularDependency {
//!     chain: "A -> B -> A".to_string(),
//! };
//! assert_eq!(error.kind(), ErrorKind::CircularDependency);
//!
//! let ctx = user_friendly_error(anyhow::Error::from(error));
//! ctx.display(); // Shows colored error with suggestions
//! ```

use colored::Colorize;
use std::fmt;
use thiserror::Error;

/// The main error type for deporder operations
///
/// Each variant carries the names of the kinds, nodes or fields involved so
/// that the message is meaningful without a debugger. Kind names are rendered
/// through their [`Display`](std::fmt::Display) implementation when the error
/// is created.
///
/// # Examples
///
/// ```rust,no_run
/// use deporder::core::DepError;
///
/// fn handle(error: DepError) {
///     match error {
///         DepError::CircularDependency { chain } => {
///             eprintln!("cycle: {chain}");
///         }
///         DepError::MissingDependency { kind, dependency } => {
///             eprintln!("{kind} needs {dependency}");
///         }
///         other => eprintln!("{other}"),
///     }
/// }
/// ```
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DepError {
    /// Items form at least one dependency cycle
    ///
    /// Raised when a full resolution round places no item.
    ///
    /// # Fields
    /// - `chain`: The cycle rendered as `A -> B -> A`
    #[error("Circular dependency detected: {chain}")]
    CircularDependency {
        /// String representation of the circular dependency chain
        chain: String,
    },

    /// A declared dependency kind is absent from the item set (strict mode)
    #[error("'{kind}' depends on '{dependency}', which is not present in the item set")]
    MissingDependency {
        /// Kind of the item declaring the dependency
        kind: String,
        /// The dependency kind that is missing
        dependency: String,
    },

    /// Two items share a kind in a set expected to be kind-unique
    #[error("Duplicate entry for '{kind}'")]
    DuplicateDependency {
        /// The repeated kind
        kind: String,
    },

    /// Dependents require kinds that providers do not supply
    #[error("Unsatisfied dependencies: {}", .missing.join(", "))]
    UnsatisfiedDependency {
        /// Every missing kind, in declaration order
        missing: Vec<String>,
    },

    /// The designated main item is not part of its set
    #[error("Main component '{kind}' is not part of the item set")]
    MissingMainComponent {
        /// Kind of the main item
        kind: String,
    },

    /// A required value is absent
    #[error("Required value is missing{}", .field.as_ref().map(|f| format!(": '{f}'")).unwrap_or_default())]
    MissingRequiredValue {
        /// Optional field name for diagnostics
        field: Option<String>,
    },

    /// A parent lookup was made from a root node
    #[error("'{node}' has no parent")]
    MissingParent {
        /// Name of the node without a parent
        node: String,
    },

    /// The parent exists but does not carry the requested component
    #[error("Parent of '{node}' has no '{kind}' component")]
    MissingComponentInParent {
        /// Requested component kind
        kind: String,
        /// Name of the child node the lookup started from
        node: String,
    },

    /// Fewer components than required were found below a node
    #[error("Expected at least {expected} '{kind}' component(s) under '{node}', found {found}")]
    MissingComponentInChildren {
        /// Requested component kind
        kind: String,
        /// Name of the node the lookup started from
        node: String,
        /// Minimum number of components required
        expected: usize,
        /// Number of components actually found
        found: usize,
    },

    /// A bulk field assignment targeted a field that does not exist or is not assignable
    #[error("'{kind}' has no serializable field '{field}'")]
    UnserializableField {
        /// Kind of the target object
        kind: String,
        /// Field name that was requested
        field: String,
    },

    /// A field exists but the value could not be converted into it
    #[error("Invalid value for field '{field}': {reason}")]
    InvalidFieldValue {
        /// Field name that was requested
        field: String,
        /// Conversion failure
        reason: String,
    },

    /// A dependency declaration is malformed
    ///
    /// Raised when a declaration is defined, never during resolution.
    #[error("Configuration error: {reason}")]
    Configuration {
        /// Why the declaration was rejected
        reason: String,
    },

    /// Catch-all used when converting foreign errors for display
    #[error("{message}")]
    Other {
        /// Error message
        message: String,
    },
}

/// Fieldless tag for [`DepError`] variants
///
/// Lets callers branch on the failure category without matching on fields,
/// and lets error mappers pick a replacement error per category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    CircularDependency,
    MissingDependency,
    DuplicateDependency,
    UnsatisfiedDependency,
    MissingMainComponent,
    MissingRequiredValue,
    MissingParent,
    MissingComponentInParent,
    MissingComponentInChildren,
    UnserializableField,
    InvalidFieldValue,
    Configuration,
    Other,
}

impl DepError {
    /// The category tag of this error.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::CircularDependency {
                ..
            } => ErrorKind::CircularDependency,
            Self::MissingDependency {
                ..
            } => ErrorKind::MissingDependency,
            Self::DuplicateDependency {
                ..
            } => ErrorKind::DuplicateDependency,
            Self::UnsatisfiedDependency {
                ..
            } => ErrorKind::UnsatisfiedDependency,
            Self::MissingMainComponent {
                ..
            } => ErrorKind::MissingMainComponent,
            Self::MissingRequiredValue {
                ..
            } => ErrorKind::MissingRequiredValue,
            Self::MissingParent {
                ..
            } => ErrorKind::MissingParent,
            Self::MissingComponentInParent {
                ..
            } => ErrorKind::MissingComponentInParent,
            Self::MissingComponentInChildren {
                ..
            } => ErrorKind::MissingComponentInChildren,
            Self::UnserializableField {
                ..
            } => ErrorKind::UnserializableField,
            Self::InvalidFieldValue {
                ..
            } => ErrorKind::InvalidFieldValue,
            Self::Configuration {
                ..
            } => ErrorKind::Configuration,
            Self::Other {
                ..
            } => ErrorKind::Other,
        }
    }

    /// Shorthand for [`DepError::Configuration`].
    pub fn configuration(reason: impl Into<String>) -> Self {
        Self::Configuration {
            reason: reason.into(),
        }
    }
}

/// Error context wrapper that provides user-friendly error information
///
/// Wraps a [`DepError`] with an optional suggestion and optional details.
/// The CLI renders it with terminal colors through [`ErrorContext::display`].
///
/// # Examples
///
/// ```rust,no_run
/// use deporder::core::{DepError, ErrorContext};
///
/// let context = ErrorContext::new(DepError::DuplicateDependency {
///     kind: "Transform".to_string(),
/// })
/// .with_suggestion("Remove one of the 'Transform' entries")
/// .with_details("Each kind may appear once per set");
///
/// context.display();
/// ```
#[derive(Debug)]
pub struct ErrorContext {
    /// The underlying error
    pub error: DepError,
    /// Optional suggestion for resolving the error
    pub suggestion: Option<String>,
    /// Optional additional details about the error
    pub details: Option<String>,
}

impl ErrorContext {
    /// Create a new error context with no suggestion or details.
    #[must_use]
    pub const fn new(error: DepError) -> Self {
        Self {
            error,
            suggestion: None,
            details: None,
        }
    }

    /// Add a suggestion for resolving the error.
    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestion = Some(suggestion.into());
        self
    }

    /// Add additional details explaining the error.
    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }

    /// Display the error context to stderr with terminal colors
    ///
    /// - Error message: Red and bold
    /// - Details: Yellow
    /// - Suggestion: Green
    pub fn display(&self) {
        eprintln!("{}: {}", "error".red().bold(), self.error);

        if let Some(details) = &self.details {
            eprintln!("{}: {}", "details".yellow(), details);
        }

        if let Some(suggestion) = &self.suggestion {
            eprintln!("{}: {}", "suggestion".green(), suggestion);
        }
    }
}

impl fmt::Display for ErrorContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.error)?;

        if let Some(details) = &self.details {
            write!(f, "\nDetails: {details}")?;
        }

        if let Some(suggestion) = &self.suggestion {
            write!(f, "\nSuggestion: {suggestion}")?;
        }

        Ok(())
    }
}

impl std::error::Error for ErrorContext {}

/// Extension trait for converting [`DepError`] to [`anyhow::Error`] with context
pub trait IntoAnyhowWithContext {
    /// Convert the error to an [`anyhow::Error`] carrying the context's suggestion and details
    fn into_anyhow_with_context(self, context: ErrorContext) -> anyhow::Error;
}

impl IntoAnyhowWithContext for DepError {
    fn into_anyhow_with_context(self, context: ErrorContext) -> anyhow::Error {
        anyhow::Error::new(ErrorContext {
            error: self,
            suggestion: context.suggestion,
            details: context.details,
        })
    }
}

/// Convert any error to a user-friendly [`ErrorContext`] with actionable suggestions
///
/// Recognizes:
/// - [`ErrorContext`] already attached to the error (suggestion is kept)
/// - [`DepError`] variants, anywhere in the error chain
/// - [`toml::de::Error`] from manifest parsing
/// - [`std::io::Error`] from reading manifests
/// - Anything else, with the full cause chain in the message
#[must_use]
pub fn user_friendly_error(error: anyhow::Error) -> ErrorContext {
    if let Some(ctx) = error.downcast_ref::<ErrorContext>() {
        return ErrorContext {
            error: ctx.error.clone(),
            suggestion: ctx.suggestion.clone(),
            details: ctx.details.clone(),
        };
    }

    for cause in error.chain() {
        if let Some(dep_error) = cause.downcast_ref::<DepError>() {
            return create_error_context(dep_error.clone());
        }
    }

    if let Some(toml_error) = error.downcast_ref::<toml::de::Error>() {
        return ErrorContext::new(DepError::Other {
            message: format!("Failed to parse manifest: {toml_error}"),
        })
        .with_suggestion("Check the TOML syntax of the manifest. Verify quotes, brackets, and table names")
        .with_details("Manifests list [kinds], [rules], [[declarations]] and [sets.<name>] tables");
    }

    if let Some(io_error) = error.downcast_ref::<std::io::Error>()
        && io_error.kind() == std::io::ErrorKind::NotFound
    {
        return ErrorContext::new(DepError::Other {
            message: error.to_string(),
        })
        .with_suggestion("Check that the manifest path is correct");
    }

    let mut message = error.to_string();
    let chain: Vec<String> =
        error.chain().skip(1).map(std::string::ToString::to_string).collect();

    if !chain.is_empty() {
        message.push_str("\n\nCaused by:");
        for (i, cause) in chain.iter().enumerate() {
            message.push_str(&format!("\n  {}: {}", i + 1, cause));
        }
    }

    ErrorContext::new(DepError::Other {
        message,
    })
}

/// Map each [`DepError`] variant to an [`ErrorContext`] with tailored suggestions.
pub(crate) fn create_error_context(error: DepError) -> ErrorContext {
    match &error {
        DepError::CircularDependency {
            chain,
        } => {
            let details = format!(
                "Circular dependency chain detected: {chain}. Items cannot depend on themselves directly or indirectly"
            );
            ErrorContext::new(error)
                .with_suggestion("Review the declarations and remove one edge of the cycle")
                .with_details(details)
        }
        DepError::MissingDependency {
            kind,
            dependency,
        } => {
            let suggestion = format!("Add a '{dependency}' item to the set, or drop the declaration on '{kind}'");
            ErrorContext::new(error)
                .with_suggestion(suggestion)
                .with_details("Strict resolution requires every declared dependency to be present")
        }
        DepError::DuplicateDependency {
            kind,
        } => {
            let suggestion = format!("Remove the extra '{kind}' entry");
            ErrorContext::new(error)
                .with_suggestion(suggestion)
                .with_details("Each kind may appear at most once in a dependency set")
        }
        DepError::UnsatisfiedDependency {
            missing,
        } => {
            let suggestion = format!("Add providers for: {}", missing.join(", "));
            ErrorContext::new(error).with_suggestion(suggestion)
        }
        DepError::MissingMainComponent {
            kind,
        } => {
            let suggestion = format!("Add the '{kind}' item to the set it is the main entry of");
            ErrorContext::new(error).with_suggestion(suggestion)
        }
        DepError::MissingRequiredValue {
            ..
        } => ErrorContext::new(error).with_suggestion("Assign the value before using the object"),
        DepError::MissingParent {
            ..
        } => ErrorContext::new(error)
            .with_suggestion("Attach the node to a parent that carries the required component"),
        DepError::MissingComponentInParent {
            kind,
            ..
        } => {
            let suggestion = format!("Add a '{kind}' component to the parent node");
            ErrorContext::new(error).with_suggestion(suggestion)
        }
        DepError::MissingComponentInChildren {
            kind,
            ..
        } => {
            let suggestion = format!("Add '{kind}' components below the node, or include inactive nodes in the lookup");
            ErrorContext::new(error).with_suggestion(suggestion)
        }
        DepError::UnserializableField {
            ..
        } => ErrorContext::new(error)
            .with_suggestion("Check the field name and mark the field public or serialized")
            .with_details("Only fields accepted by the field filter can be assigned in bulk"),
        DepError::InvalidFieldValue {
            ..
        } => ErrorContext::new(error).with_suggestion("Check the value type against the field declaration"),
        DepError::Configuration {
            ..
        } => ErrorContext::new(error)
            .with_suggestion("Fix the declaration; referenced kinds must derive from the rule's base kind")
            .with_details("Declarations are validated when they are defined, before any resolution runs"),
        DepError::Other {
            ..
        } => ErrorContext::new(error),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let error = DepError::CircularDependency {
            chain: "A -> B -> A".to_string(),
        };
        assert_eq!(error.to_string(), "Circular dependency detected: A -> B -> A");

        let error = DepError::UnsatisfiedDependency {
            missing: vec!["X".to_string(), "Y".to_string()],
        };
        assert_eq!(error.to_string(), "Unsatisfied dependencies: X, Y");

        let error = DepError::MissingRequiredValue {
            field: Some("target".to_string()),
        };
        assert_eq!(error.to_string(), "Required value is missing: 'target'");

        let error = DepError::MissingRequiredValue {
            field: None,
        };
        assert_eq!(error.to_string(), "Required value is missing");
    }

    #[test]
    fn test_error_kind_tags() {
        assert_eq!(
            DepError::DuplicateDependency {
                kind: "A".to_string()
            }
            .kind(),
            ErrorKind::DuplicateDependency
        );
        assert_eq!(DepError::configuration("bad").kind(), ErrorKind::Configuration);
        assert_eq!(
            DepError::MissingComponentInChildren {
                kind: "Collider".to_string(),
                node: "root".to_string(),
                expected: 2,
                found: 1,
            }
            .kind(),
            ErrorKind::MissingComponentInChildren
        );
    }

    #[test]
    fn test_error_context_display() {
        let ctx = ErrorContext::new(DepError::MissingParent {
            node: "root".to_string(),
        })
        .with_suggestion("Attach it")
        .with_details("Roots have no parent");

        let display = format!("{ctx}");
        assert!(display.contains("'root' has no parent"));
        assert!(display.contains("Details: Roots have no parent"));
        assert!(display.contains("Suggestion: Attach it"));
    }

    #[test]
    fn test_create_error_context_circular_dependency() {
        let ctx = create_error_context(DepError::CircularDependency {
            chain: "a -> b -> a".to_string(),
        });
        assert!(ctx.suggestion.unwrap().contains("remove one edge"));
        assert!(ctx.details.unwrap().contains("a -> b -> a"));
    }

    #[test]
    fn test_create_error_context_missing_dependency() {
        let ctx = create_error_context(DepError::MissingDependency {
            kind: "Rigidbody".to_string(),
            dependency: "Transform".to_string(),
        });
        let suggestion = ctx.suggestion.unwrap();
        assert!(suggestion.contains("Transform"));
        assert!(suggestion.contains("Rigidbody"));
    }

    #[test]
    fn test_user_friendly_error_from_dep_error() {
        let error = anyhow::Error::from(DepError::DuplicateDependency {
            kind: "Transform".to_string(),
        });
        let ctx = user_friendly_error(error);
        assert_eq!(ctx.error.kind(), ErrorKind::DuplicateDependency);
        assert!(ctx.suggestion.is_some());
    }

    #[test]
    fn test_user_friendly_error_finds_dep_error_in_chain() {
        let error = anyhow::Error::from(DepError::configuration("bad base"))
            .context("Failed to load manifest");
        let ctx = user_friendly_error(error);
        assert_eq!(ctx.error.kind(), ErrorKind::Configuration);
    }

    #[test]
    fn test_user_friendly_error_keeps_attached_context() {
        let error = DepError::configuration("x").into_anyhow_with_context(
            ErrorContext::new(DepError::Other {
                message: String::new(),
            })
            .with_suggestion("custom"),
        );
        let ctx = user_friendly_error(error);
        assert_eq!(ctx.suggestion.as_deref(), Some("custom"));
        assert_eq!(ctx.error.kind(), ErrorKind::Configuration);
    }

    #[test]
    fn test_user_friendly_error_generic_chain() {
        let error = anyhow::anyhow!("root cause").context("outer");
        let ctx = user_friendly_error(error);
        match ctx.error {
            DepError::Other {
                message,
            } => {
                assert!(message.contains("outer"));
                assert!(message.contains("Caused by:"));
                assert!(message.contains("root cause"));
            }
            _ => panic!("Expected Other"),
        }
    }
}
