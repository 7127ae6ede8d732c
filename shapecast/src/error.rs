//! Errors produced while building record instances.

use core::fmt::{self, Display};

use shapecast_core::{Type, Value};

/// Dotted path of field names from the root record to the failing field.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FieldPath(Vec<String>);

impl FieldPath {
    /// The root path.
    pub const fn root() -> Self {
        FieldPath(Vec::new())
    }

    /// `true` at the root.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Field names, outermost first.
    pub fn segments(&self) -> &[String] {
        &self.0
    }

    fn push_front(&mut self, name: &str) {
        self.0.insert(0, name.to_string());
    }
}

impl Display for FieldPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            return f.write_str("<root>");
        }
        for (i, segment) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(".")?;
            }
            f.write_str(segment)?;
        }
        Ok(())
    }
}

/// A "did you mean?" hint for an unexpected key.
#[derive(Clone, Debug, PartialEq)]
pub struct FieldSuggestion {
    /// The key found in the input.
    pub unknown: String,
    /// The declared field it most resembles.
    pub suggestion: String,
    /// Jaro-Winkler similarity between the two.
    pub similarity: f64,
}

/// Error type for record materialization.
///
/// Every failure is one of these; inspect [`DeserializeError::kind`] to tell
/// them apart.
#[derive(Debug)]
pub struct DeserializeError {
    kind: ErrorKind,
    path: FieldPath,
}

impl DeserializeError {
    pub(crate) fn new(kind: ErrorKind) -> Self {
        Self {
            kind,
            path: FieldPath::root(),
        }
    }

    /// The specific kind of error.
    pub fn kind(&self) -> &ErrorKind {
        &self.kind
    }

    /// Consume the error, returning its kind.
    pub fn into_kind(self) -> ErrorKind {
        self.kind
    }

    /// Where the error occurred. Always the root for forward-reference and
    /// unexpected-data errors.
    pub fn path(&self) -> &FieldPath {
        &self.path
    }

    /// Prepend `field` to the path while unwinding out of a record.
    pub(crate) fn with_field(mut self, field: &str) -> Self {
        if self.kind.is_field_error() {
            self.path.push_front(field);
        }
        self
    }
}

impl Display for DeserializeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.path.is_empty() {
            write!(f, "{}", self.kind)
        } else {
            write!(f, "at {}: {}", self.path, self.kind)
        }
    }
}

impl core::error::Error for DeserializeError {}

impl From<ErrorKind> for DeserializeError {
    fn from(kind: ErrorKind) -> Self {
        DeserializeError::new(kind)
    }
}

/// Detailed classification of materialization errors.
#[derive(Debug)]
#[non_exhaustive]
pub enum ErrorKind {
    /// A field type refers to a name that no namespace provides.
    ForwardReference {
        /// The unresolved name.
        name: String,
    },
    /// Strict mode: the input has keys the record does not declare.
    UnexpectedData {
        /// The record being built.
        record: String,
        /// The undeclared keys, sorted.
        keys: Vec<String>,
        /// Close matches among the declared fields.
        suggestions: Vec<FieldSuggestion>,
    },
    /// A required field is absent from the input and has no default.
    MissingValue,
    /// A built value does not match the declared field type.
    WrongType {
        /// The declared type.
        expected: Type,
        /// The offending value.
        value: Value,
    },
    /// No union member accepted the value.
    UnionMatch {
        /// The declared union.
        union: Type,
        /// The offending value.
        value: Value,
    },
    /// Strict union mode: more than one member accepted the value.
    StrictUnionMatch {
        /// Every matching member with the value built against it.
        matches: Vec<(Type, Value)>,
    },
    /// A type hook rejected its input.
    Hook {
        /// The type the hook is registered for.
        ty: Type,
        /// The hook's message.
        message: String,
    },
    /// A value could not be converted to a cast-list type.
    Cast {
        /// The type being constructed.
        target: Type,
        /// The value that failed to convert.
        value: Value,
        /// Why the conversion failed.
        message: String,
    },
    /// The record constructor or its post-init hook failed.
    Construct {
        /// The record being built.
        record: String,
        /// The constructor's message.
        message: String,
    },
    /// A post-construction field could not be assigned on a frozen record.
    FrozenAssignment {
        /// The frozen record.
        record: String,
    },
}

impl ErrorKind {
    /// Whether errors of this kind carry a field path.
    pub fn is_field_error(&self) -> bool {
        !matches!(
            self,
            ErrorKind::ForwardReference { .. } | ErrorKind::UnexpectedData { .. }
        )
    }

    /// Returns an error code for this error kind.
    pub fn code(&self) -> &'static str {
        match self {
            ErrorKind::ForwardReference { .. } => "shapecast::forward_reference",
            ErrorKind::UnexpectedData { .. } => "shapecast::unexpected_data",
            ErrorKind::MissingValue => "shapecast::missing_value",
            ErrorKind::WrongType { .. } => "shapecast::wrong_type",
            ErrorKind::UnionMatch { .. } => "shapecast::union_match",
            ErrorKind::StrictUnionMatch { .. } => "shapecast::strict_union_match",
            ErrorKind::Hook { .. } => "shapecast::hook",
            ErrorKind::Cast { .. } => "shapecast::cast",
            ErrorKind::Construct { .. } => "shapecast::construct",
            ErrorKind::FrozenAssignment { .. } => "shapecast::frozen_assignment",
        }
    }
}

impl Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorKind::ForwardReference { name } => {
                write!(f, "cannot resolve forward reference `{name}`")
            }
            ErrorKind::UnexpectedData { record, keys, .. } => {
                write!(f, "unexpected data for `{record}`: ")?;
                for (i, key) in keys.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "`{key}`")?;
                }
                Ok(())
            }
            ErrorKind::MissingValue => f.write_str("missing value for required field"),
            ErrorKind::WrongType { expected, value } => write!(
                f,
                "wrong value type: expected `{expected}`, got {value} ({})",
                value.value_type()
            ),
            ErrorKind::UnionMatch { union, value } => write!(
                f,
                "cannot match {value} ({}) to any member of `{union}`",
                value.value_type()
            ),
            ErrorKind::StrictUnionMatch { matches } => {
                f.write_str("ambiguous union match between ")?;
                for (i, (ty, _)) in matches.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "`{ty}`")?;
                }
                Ok(())
            }
            ErrorKind::Hook { ty, message } => {
                write!(f, "type hook for `{ty}` failed: {message}")
            }
            ErrorKind::Cast {
                target,
                value,
                message,
            } => write!(
                f,
                "cannot cast {value} ({}) to `{target}`: {message}",
                value.value_type()
            ),
            ErrorKind::Construct { record, message } => {
                write!(f, "cannot construct `{record}`: {message}")
            }
            ErrorKind::FrozenAssignment { record } => {
                write!(f, "cannot assign after construction: `{record}` is frozen")
            }
        }
    }
}

// ============================================================================
// Diagnostic Implementation
// ============================================================================

#[cfg(feature = "miette")]
impl miette::Diagnostic for DeserializeError {
    fn code<'a>(&'a self) -> Option<Box<dyn Display + 'a>> {
        Some(Box::new(self.kind.code()))
    }

    fn help<'a>(&'a self) -> Option<Box<dyn Display + 'a>> {
        match &self.kind {
            ErrorKind::UnexpectedData { suggestions, .. } if !suggestions.is_empty() => {
                let hints: Vec<String> = suggestions
                    .iter()
                    .map(|s| format!("`{}` -> `{}`", s.unknown, s.suggestion))
                    .collect();
                Some(Box::new(format!("did you mean: {}", hints.join(", "))))
            }
            ErrorKind::ForwardReference { name } => Some(Box::new(format!(
                "register `{name}` in the config's forward references or the record's namespace"
            ))),
            ErrorKind::FrozenAssignment { .. } => Some(Box::new(
                "use FrozenAssignment::Discard to drop post-construction values silently",
            )),
            _ => None,
        }
    }
}
