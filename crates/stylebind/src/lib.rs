//! Runtime half of the styled-attribute binding system.
//!
//! Generated binders (see the `stylebind-gen` crate) read attribute values
//! out of a styled snapshot and assign them to component fields. This crate
//! provides the dispatcher that locates and runs the binder for a concrete
//! component type, the registry binders install themselves into, the
//! snapshot collaborator surface, and the reactive [`Dynamic`] property.

pub mod dispatch;
pub mod dynamic;
pub mod error;
pub mod values;
pub mod view;

pub use dispatch::{
    bind, global, is_reserved_namespace, register_binder, BindArgs, BinderFn, Dispatcher,
    BINDER_SUFFIX, RESERVED_NAMESPACES,
};
pub use dynamic::Dynamic;
pub use error::{BindError, BindErrorKind};
pub use values::{
    drawable_compat, AttrValue, AttributeSet, ColorStateList, Drawable, Resources, StyledValues,
    Theme, DIRECT_DRAWABLE_MIN_VERSION,
};
pub use view::{Context, StyledView, ViewClass};
