//! Pure data describing discovered bindings.

use proc_macro2::TokenStream;
use quote::quote;
use syn::{Ident, Path};

/// Closed taxonomy of supported attribute value shapes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttrKind {
    Bool,
    Color,
    ColorState,
    DimenInt,
    DimenFloat,
    Drawable,
    Float,
    Int,
    ResourceId,
    StringData,
}

/// An attribute key: the raw integer slot plus the symbolic name recovered
/// from the originating expression, when the scan found one.
///
/// Equality is by raw value only; the symbol is best-effort and exists for
/// diagnostics and generated-code readability.
#[derive(Debug, Clone)]
pub struct ResolvedId {
    pub value: i32,
    pub symbol: Option<Path>,
}

impl ResolvedId {
    pub fn from_raw(value: i32) -> Self {
        ResolvedId { value, symbol: None }
    }

    pub fn with_symbol(value: i32, symbol: Path) -> Self {
        ResolvedId { value, symbol: Some(symbol) }
    }

    /// Tokens naming this key in generated code: the symbol path when known,
    /// the raw literal otherwise.
    pub fn code(&self) -> TokenStream {
        match &self.symbol {
            Some(path) => quote! { #path },
            None => {
                let value = self.value;
                quote! { #value }
            }
        }
    }

    pub fn symbol_string(&self) -> Option<String> {
        self.symbol.as_ref().map(path_to_string)
    }
}

impl PartialEq for ResolvedId {
    fn eq(&self, other: &Self) -> bool {
        self.value == other.value
    }
}

impl Eq for ResolvedId {}

pub fn path_to_string(path: &Path) -> String {
    path.segments
        .iter()
        .map(|segment| segment.ident.to_string())
        .collect::<Vec<_>>()
        .join("::")
}

/// Insertion-ordered map of recovered ids, keyed by raw value.
///
/// A later symbol entry for a value overwrites the earlier one in place; a
/// literal entry never displaces an existing entry for the same value.
#[derive(Debug, Default)]
pub struct IdMap {
    entries: Vec<ResolvedId>,
}

impl IdMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn put_symbol(&mut self, value: i32, symbol: Path) {
        match self.entries.iter_mut().find(|entry| entry.value == value) {
            Some(entry) => entry.symbol = Some(symbol),
            None => self.entries.push(ResolvedId::with_symbol(value, symbol)),
        }
    }

    pub fn put_literal(&mut self, value: i32) {
        if !self.entries.iter().any(|entry| entry.value == value) {
            self.entries.push(ResolvedId::from_raw(value));
        }
    }

    /// First entry in insertion order; traversal order, not value order.
    pub fn first(&self) -> Option<&ResolvedId> {
        self.entries.first()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

/// One discovered field-to-attribute binding, immutable after discovery.
#[derive(Debug, Clone)]
pub struct AttrBinding {
    /// Field identifier as written, used verbatim in generated code.
    pub field: Ident,
    /// Display name: the identifier with any raw-identifier mangling
    /// (`r#`) stripped.
    pub name: String,
    pub kind: AttrKind,
    pub id: ResolvedId,
    /// True when the declared type was the reactive `Dynamic<T>` alias.
    pub dynamic: bool,
}

impl AttrBinding {
    pub fn new(field: Ident, kind: AttrKind, id: ResolvedId, dynamic: bool) -> Self {
        let name = field.to_string().trim_start_matches("r#").to_string();
        AttrBinding { field, name, kind, id, dynamic }
    }
}

/// All bindings discovered for one owning type, in discovery order.
/// Non-empty by construction; an owner with zero valid bindings never
/// reaches generation.
#[derive(Debug, Clone)]
pub struct BindingGroup {
    pub owner: Ident,
    pub owner_module: String,
    pub bindings: Vec<AttrBinding>,
}

impl BindingGroup {
    pub fn qualified_owner(&self) -> String {
        if self.owner_module.is_empty() {
            self.owner.to_string()
        } else {
            format!("{}::{}", self.owner_module, self.owner)
        }
    }
}

#[cfg(test)]
mod tests {
    use syn::parse_quote;

    use super::*;

    #[test]
    fn literal_never_displaces_a_symbol_entry() {
        let mut ids = IdMap::new();
        ids.put_symbol(42, parse_quote!(style::styleable::ALPHA));
        ids.put_literal(42);
        let first = ids.first().unwrap();
        assert_eq!(first.symbol_string().as_deref(), Some("style::styleable::ALPHA"));
        assert_eq!(ids.len(), 1);
    }

    #[test]
    fn symbol_overwrites_symbol_in_place() {
        let mut ids = IdMap::new();
        ids.put_symbol(7, parse_quote!(style::styleable::FIRST));
        ids.put_symbol(9, parse_quote!(style::styleable::OTHER));
        ids.put_symbol(7, parse_quote!(style::styleable::SECOND));
        let first = ids.first().unwrap();
        assert_eq!(first.value, 7);
        assert_eq!(first.symbol_string().as_deref(), Some("style::styleable::SECOND"));
    }

    #[test]
    fn symbol_upgrades_a_literal_entry_in_place() {
        let mut ids = IdMap::new();
        ids.put_literal(42);
        ids.put_symbol(42, parse_quote!(style::styleable::ALPHA));
        let first = ids.first().unwrap();
        assert_eq!(first.symbol_string().as_deref(), Some("style::styleable::ALPHA"));
    }

    #[test]
    fn raw_identifier_mangling_is_stripped_from_the_display_name() {
        let binding = AttrBinding::new(
            parse_quote!(r#type),
            AttrKind::Int,
            ResolvedId::from_raw(1),
            false,
        );
        assert_eq!(binding.name, "type");
    }
}
