//! Styled attribute values: the raw attribute set a component is inflated
//! with, the theme that layers style defaults under it, and the transient
//! snapshot a binder reads typed values out of.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use crate::error::BindError;
use crate::view::Context;

/// First platform revision whose attribute snapshots hand back decoded
/// drawables directly. Older revisions only expose the resource id and the
/// drawable must be loaded through the resource table.
pub const DIRECT_DRAWABLE_MIN_VERSION: u32 = 24;

/// A color that varies with component state. Opaque to the binding core.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColorStateList {
    pub default_color: u32,
}

impl ColorStateList {
    pub fn new(default_color: u32) -> Self {
        ColorStateList { default_color }
    }
}

/// A decoded drawable resource handle. Opaque to the binding core.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Drawable {
    pub resource_id: i32,
}

/// One attribute value in its native representation.
#[derive(Debug, Clone, PartialEq)]
pub enum AttrValue {
    Bool(bool),
    Color(u32),
    ColorState(ColorStateList),
    Dimension(f32),
    Float(f32),
    Int(i32),
    Resource(i32),
    Str(String),
}

/// The raw per-instance attribute set, keyed by attribute slot.
#[derive(Debug, Clone, Default)]
pub struct AttributeSet {
    entries: HashMap<i32, AttrValue>,
}

impl AttributeSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(mut self, key: i32, value: AttrValue) -> Self {
        self.entries.insert(key, value);
        self
    }

    pub fn get(&self, key: i32) -> Option<&AttrValue> {
        self.entries.get(&key)
    }
}

/// Decoded drawable resources, keyed by resource id.
#[derive(Debug, Clone, Default)]
pub struct Resources {
    drawables: HashMap<i32, Drawable>,
}

impl Resources {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_drawable(mut self, id: i32) -> Self {
        self.drawables.insert(id, Drawable { resource_id: id });
        self
    }

    pub fn load_drawable(&self, id: i32) -> Result<Drawable, BindError> {
        self.drawables
            .get(&id)
            .cloned()
            .ok_or_else(|| BindError::missing_resource(id))
    }
}

/// A theme: style-level defaults layered under the instance attribute set,
/// plus named styles selectable through `def_style_attr` / `def_style_res`.
#[derive(Debug, Clone, Default)]
pub struct Theme {
    defaults: HashMap<i32, AttrValue>,
    styles: HashMap<i32, HashMap<i32, AttrValue>>,
    releases: Arc<AtomicUsize>,
}

impl Theme {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_default(mut self, key: i32, value: AttrValue) -> Self {
        self.defaults.insert(key, value);
        self
    }

    pub fn set_style(mut self, style: i32, key: i32, value: AttrValue) -> Self {
        self.styles.entry(style).or_default().insert(key, value);
        self
    }

    /// Number of snapshots obtained from this theme that have been released.
    pub fn release_count(&self) -> usize {
        self.releases.load(Ordering::SeqCst)
    }

    /// Materializes a styled attribute snapshot for the requested keys.
    ///
    /// Resolution order per key: instance attribute set, then the
    /// `def_style_attr` style, then the `def_style_res` style, then the theme
    /// default. Keys outside `styleable` are never materialized.
    pub fn obtain_styled(
        &self,
        attrs: Option<&AttributeSet>,
        styleable: &[i32],
        def_style_attr: i32,
        def_style_res: i32,
    ) -> StyledValues {
        let mut values = HashMap::new();
        for &key in styleable {
            let resolved = attrs
                .and_then(|a| a.get(key))
                .or_else(|| self.styles.get(&def_style_attr).and_then(|s| s.get(&key)))
                .or_else(|| self.styles.get(&def_style_res).and_then(|s| s.get(&key)))
                .or_else(|| self.defaults.get(&key));
            if let Some(value) = resolved {
                values.insert(key, value.clone());
            }
        }
        StyledValues { values, releases: Arc::clone(&self.releases) }
    }
}

/// A transient view over resolved attribute values for one binding pass.
///
/// Released exactly once, on drop, on every exit path of the binder that
/// obtained it.
#[derive(Debug)]
pub struct StyledValues {
    values: HashMap<i32, AttrValue>,
    releases: Arc<AtomicUsize>,
}

impl StyledValues {
    pub fn has_value(&self, key: i32) -> bool {
        self.values.contains_key(&key)
    }

    pub fn get_bool(&self, key: i32, default: bool) -> bool {
        match self.values.get(&key) {
            Some(AttrValue::Bool(v)) => *v,
            _ => default,
        }
    }

    pub fn get_color(&self, key: i32, default: u32) -> u32 {
        match self.values.get(&key) {
            Some(AttrValue::Color(v)) => *v,
            _ => default,
        }
    }

    pub fn get_color_state_list(&self, key: i32) -> Option<ColorStateList> {
        match self.values.get(&key) {
            Some(AttrValue::ColorState(v)) => Some(v.clone()),
            _ => None,
        }
    }

    pub fn get_dimension(&self, key: i32, default: f32) -> f32 {
        match self.values.get(&key) {
            Some(AttrValue::Dimension(v)) => *v,
            _ => default,
        }
    }

    pub fn get_float(&self, key: i32, default: f32) -> f32 {
        match self.values.get(&key) {
            Some(AttrValue::Float(v)) => *v,
            _ => default,
        }
    }

    pub fn get_int(&self, key: i32, default: i32) -> i32 {
        match self.values.get(&key) {
            Some(AttrValue::Int(v)) => *v,
            _ => default,
        }
    }

    pub fn get_resource_id(&self, key: i32, default: i32) -> i32 {
        match self.values.get(&key) {
            Some(AttrValue::Resource(v)) => *v,
            _ => default,
        }
    }

    pub fn get_string(&self, key: i32) -> Option<String> {
        match self.values.get(&key) {
            Some(AttrValue::Str(v)) => Some(v.clone()),
            _ => None,
        }
    }

    /// Reads a drawable stored as a resource reference, decoding it through
    /// the context's resource table.
    pub fn get_drawable(&self, key: i32, ctx: &Context) -> Result<Option<Drawable>, BindError> {
        match self.values.get(&key) {
            Some(AttrValue::Resource(id)) => ctx.resources().load_drawable(*id).map(Some),
            _ => Ok(None),
        }
    }
}

impl Drop for StyledValues {
    fn drop(&mut self) {
        self.releases.fetch_add(1, Ordering::SeqCst);
    }
}

/// Platform-version-aware drawable extraction: pre-[`DIRECT_DRAWABLE_MIN_VERSION`]
/// snapshots only carry the resource id, so the drawable is resolved through
/// the resource table; newer snapshots decode directly.
pub fn drawable_compat(
    values: &StyledValues,
    ctx: &Context,
    key: i32,
) -> Result<Option<Drawable>, BindError> {
    if ctx.platform_version() < DIRECT_DRAWABLE_MIN_VERSION {
        let id = values.get_resource_id(key, -1);
        if id == -1 {
            Ok(None)
        } else {
            ctx.resources().load_drawable(id).map(Some)
        }
    } else {
        values.get_drawable(key, ctx)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn attribute_set_returns_entries_by_key() {
        let attrs = AttributeSet::new().set(3, AttrValue::Int(5));
        assert_eq!(attrs.get(3), Some(&AttrValue::Int(5)));
        assert_eq!(attrs.get(4), None);
    }

    #[test]
    fn attrs_override_styles_override_defaults() {
        let theme = Theme::new()
            .set_default(1, AttrValue::Int(1))
            .set_default(2, AttrValue::Int(2))
            .set_default(3, AttrValue::Int(3))
            .set_style(10, 1, AttrValue::Int(11))
            .set_style(10, 2, AttrValue::Int(12));
        let attrs = AttributeSet::new().set(1, AttrValue::Int(21));

        let a = theme.obtain_styled(Some(&attrs), &[1, 2, 3], 10, 0);
        assert_eq!(a.get_int(1, 0), 21);
        assert_eq!(a.get_int(2, 0), 12);
        assert_eq!(a.get_int(3, 0), 3);
    }

    #[test]
    fn keys_outside_styleable_are_not_materialized() {
        let theme = Theme::new().set_default(7, AttrValue::Int(7));
        let a = theme.obtain_styled(None, &[8], 0, 0);
        assert!(!a.has_value(7));
        assert_eq!(a.get_int(7, -1), -1);
    }

    #[test]
    fn snapshot_release_is_counted_once() {
        let theme = Theme::new();
        let a = theme.obtain_styled(None, &[], 0, 0);
        assert_eq!(theme.release_count(), 0);
        drop(a);
        assert_eq!(theme.release_count(), 1);
    }

    #[test]
    fn typed_getter_falls_back_on_kind_mismatch() {
        let theme = Theme::new().set_default(1, AttrValue::Str("x".into()));
        let a = theme.obtain_styled(None, &[1], 0, 0);
        assert_eq!(a.get_int(1, 9), 9);
        assert_eq!(a.get_string(1).as_deref(), Some("x"));
    }
}
