use std::fmt;

use crate::view::ViewClass;

/// Failure raised by the dispatcher or by a generated binder body.
///
/// Carries the owning view type and binder name when they are known so the
/// process-visible message points at the misconfigured component.
#[derive(Debug)]
pub struct BindError {
    pub view: Option<String>,
    pub binder: Option<String>,
    pub kind: BindErrorKind,
}

#[derive(Debug)]
pub enum BindErrorKind {
    /// The requested type has no binder anywhere in its class chain. This is
    /// a caller programming error, not a recoverable condition.
    NoBinder,
    /// A type-erased binder was handed an instance of the wrong concrete type.
    WrongInstanceType { expected: &'static str },
    /// A resource-backed extraction referenced an id the resource table does
    /// not contain.
    MissingResource { id: i32 },
    /// A failure raised while running the binder body, with the original
    /// failure attached as the cause.
    Construction { cause: Box<BindError> },
}

impl BindError {
    pub fn no_binder(class: &ViewClass) -> Self {
        BindError {
            view: Some(class.qualified_name()),
            binder: None,
            kind: BindErrorKind::NoBinder,
        }
    }

    pub fn wrong_instance_type(binder: &str, expected: &'static str) -> Self {
        BindError {
            view: None,
            binder: Some(binder.to_string()),
            kind: BindErrorKind::WrongInstanceType { expected },
        }
    }

    pub fn missing_resource(id: i32) -> Self {
        BindError {
            view: None,
            binder: None,
            kind: BindErrorKind::MissingResource { id },
        }
    }

    /// Wraps a failure from a binder body, preserving the identity of
    /// failures that are already construction-level.
    pub fn construction(class: &ViewClass, cause: BindError) -> Self {
        match cause.kind {
            BindErrorKind::Construction { .. } | BindErrorKind::NoBinder => cause,
            _ => BindError {
                view: Some(class.qualified_name()),
                binder: Some(class.binder_name()),
                kind: BindErrorKind::Construction { cause: Box::new(cause) },
            },
        }
    }
}

impl fmt::Display for BindError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(view) = &self.view {
            write!(f, "{view}: ")?;
        }
        if let Some(binder) = &self.binder {
            write!(f, "[{binder}] ")?;
        }
        match &self.kind {
            BindErrorKind::NoBinder => {
                write!(f, "type must contain at least one attribute binding annotation")
            }
            BindErrorKind::WrongInstanceType { expected } => {
                write!(f, "binder expects an instance of '{expected}'")
            }
            BindErrorKind::MissingResource { id } => {
                write!(f, "no resource registered for id {id}")
            }
            BindErrorKind::Construction { cause } => {
                write!(f, "unable to create binding instance: {cause}")
            }
        }
    }
}

impl std::error::Error for BindError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match &self.kind {
            BindErrorKind::Construction { cause } => Some(cause.as_ref()),
            _ => None,
        }
    }
}
