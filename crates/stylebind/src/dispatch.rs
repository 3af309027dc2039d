//! Runtime type-to-binder resolution.
//!
//! Generated binders are registered under their convention name
//! (`<OwningType>AttrBinding`). Dispatch resolves a component's concrete
//! class to a binder function, walking the class chain upward, and memoizes
//! the outcome per visited class. The cache is process-lifetime state: the
//! universe of classes is fixed once registration has run, so entries are
//! terminal and never invalidated.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};

use once_cell::sync::Lazy;
use parking_lot::RwLock;

use crate::error::BindError;
use crate::values::{AttributeSet, StyledValues};
use crate::view::{StyledView, ViewClass};

/// Suffix appended to an owning type's module-qualified name to form its
/// binder's registry key. Must stay in sync with the generator's naming
/// convention.
pub const BINDER_SUFFIX: &str = "AttrBinding";

/// Namespaces that never own generated binders; the class-chain walk stops
/// as soon as it reaches one.
pub const RESERVED_NAMESPACES: &[&str] = &["std", "core", "alloc", "toolkit"];

pub fn is_reserved_namespace(module_path: &str) -> bool {
    RESERVED_NAMESPACES.iter().any(|ns| {
        module_path
            .strip_prefix(ns)
            .map_or(false, |rest| rest.is_empty() || rest.starts_with("::"))
    })
}

/// Arguments forwarded to a type-erased binder function.
pub struct BindArgs<'a> {
    pub attrs: Option<&'a AttributeSet>,
    pub styleable: &'a [i32],
    pub def_style_attr: i32,
    pub def_style_res: i32,
    /// Post-bind callback, invoked with the still-open snapshot.
    pub action: Option<&'a dyn Fn(&StyledValues)>,
}

/// A generated, type-erased binder entry point.
pub type BinderFn = fn(&mut dyn StyledView, &BindArgs<'_>) -> Result<(), BindError>;

#[derive(Clone, Copy)]
enum CacheEntry {
    Binder(BinderFn),
    NoBinder,
}

type ClassKey = (&'static str, &'static str);

fn class_key(class: &'static ViewClass) -> ClassKey {
    (class.module_path, class.name)
}

/// Maps concrete component classes to binder functions, memoizing lookups.
pub struct Dispatcher {
    registry: RwLock<HashMap<String, BinderFn>>,
    cache: RwLock<HashMap<ClassKey, CacheEntry>>,
    lookups: AtomicUsize,
}

impl Default for Dispatcher {
    fn default() -> Self {
        Self::new()
    }
}

impl Dispatcher {
    pub fn new() -> Self {
        Dispatcher {
            registry: RwLock::new(HashMap::new()),
            cache: RwLock::new(HashMap::new()),
            lookups: AtomicUsize::new(0),
        }
    }

    /// Registers a binder under its convention name. A later registration
    /// for the same name replaces the registry entry, but resolutions
    /// already cached keep the function they resolved to; registration is
    /// expected to run before the first dispatch.
    pub fn register(&self, name: impl Into<String>, binder: BinderFn) {
        self.registry.write().insert(name.into(), binder);
    }

    /// Total registry lookup attempts performed so far. Diagnostic counter.
    pub fn lookup_attempts(&self) -> usize {
        self.lookups.load(Ordering::SeqCst)
    }

    /// Resolves the binder for the instance's concrete class and runs it.
    pub fn bind(
        &self,
        view: &mut dyn StyledView,
        attrs: Option<&AttributeSet>,
        styleable: &[i32],
        def_style_attr: i32,
        def_style_res: i32,
        action: Option<&dyn Fn(&StyledValues)>,
    ) -> Result<(), BindError> {
        let class = view.class_info();
        match self.binder_for_class(class) {
            CacheEntry::NoBinder => Err(BindError::no_binder(class)),
            CacheEntry::Binder(binder) => {
                let args = BindArgs { attrs, styleable, def_style_attr, def_style_res, action };
                binder(view, &args).map_err(|cause| BindError::construction(class, cause))
            }
        }
    }

    /// Walks the class chain until a cache entry, a registered binder, or a
    /// reserved namespace is hit. Every class visited during the walk gets
    /// its own terminal cache entry for the outcome.
    fn binder_for_class(&self, class: &'static ViewClass) -> CacheEntry {
        let mut visited: Vec<&'static ViewClass> = Vec::new();
        let mut current = Some(class);

        let resolved = loop {
            let Some(cls) = current else { break CacheEntry::NoBinder };
            if let Some(entry) = self.cache.read().get(&class_key(cls)) {
                break *entry;
            }
            visited.push(cls);
            if is_reserved_namespace(cls.module_path) {
                break CacheEntry::NoBinder;
            }
            self.lookups.fetch_add(1, Ordering::SeqCst);
            if let Some(binder) = self.registry.read().get(&cls.binder_name()).copied() {
                break CacheEntry::Binder(binder);
            }
            current = cls.parent;
        };

        if !visited.is_empty() {
            let mut cache = self.cache.write();
            for cls in visited {
                cache.entry(class_key(cls)).or_insert(resolved);
            }
        }
        resolved
    }
}

static DISPATCHER: Lazy<Dispatcher> = Lazy::new(Dispatcher::new);

/// The process-wide dispatcher instance.
pub fn global() -> &'static Dispatcher {
    &DISPATCHER
}

/// Registers a binder with the process-wide dispatcher. Generated
/// `register_attr_bindings` functions call this once per binder.
pub fn register_binder(name: impl Into<String>, binder: BinderFn) {
    DISPATCHER.register(name, binder);
}

/// Binds styled attribute values onto `view` through its generated binder.
pub fn bind(
    view: &mut dyn StyledView,
    attrs: Option<&AttributeSet>,
    styleable: &[i32],
    def_style_attr: i32,
    def_style_res: i32,
    action: Option<&dyn Fn(&StyledValues)>,
) -> Result<(), BindError> {
    DISPATCHER.bind(view, attrs, styleable, def_style_attr, def_style_res, action)
}
