//! Component-side collaborator surface: static type information and the
//! presentation context a binder reads styled values through.

use std::any::Any;

use crate::dispatch::BINDER_SUFFIX;
use crate::values::{Resources, Theme};

/// Static type information for a styled component class.
///
/// The parent link forms the class chain the dispatcher walks when the
/// concrete type has no binder of its own. Instances are expected to be
/// `'static` items, one per component type.
#[derive(Debug)]
pub struct ViewClass {
    pub name: &'static str,
    pub module_path: &'static str,
    pub parent: Option<&'static ViewClass>,
}

impl ViewClass {
    pub fn qualified_name(&self) -> String {
        format!("{}::{}", self.module_path, self.name)
    }

    /// Registry key of this class's binder: the module-qualified type name
    /// with the convention suffix appended. Qualification keeps two types
    /// with the same simple name in different modules on distinct keys.
    pub fn binder_name(&self) -> String {
        if self.module_path.is_empty() {
            format!("{}{}", self.name, BINDER_SUFFIX)
        } else {
            format!("{}::{}{}", self.module_path, self.name, BINDER_SUFFIX)
        }
    }
}

/// Presentation context of a component: its theme, resource table and the
/// platform revision it runs on.
#[derive(Debug, Clone)]
pub struct Context {
    theme: Theme,
    resources: Resources,
    platform_version: u32,
}

impl Context {
    pub fn new(theme: Theme, resources: Resources, platform_version: u32) -> Self {
        Context { theme, resources, platform_version }
    }

    pub fn theme(&self) -> &Theme {
        &self.theme
    }

    pub fn resources(&self) -> &Resources {
        &self.resources
    }

    pub fn platform_version(&self) -> u32 {
        self.platform_version
    }
}

/// A component that generated binders can be dispatched against.
pub trait StyledView: Any {
    fn class_info(&self) -> &'static ViewClass;

    fn context(&self) -> &Context;

    fn as_any_mut(&mut self) -> &mut dyn Any;
}
