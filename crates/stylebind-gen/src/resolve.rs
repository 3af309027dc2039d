//! Symbolic recovery of attribute keys.
//!
//! Constant folding erases the symbolic name of an attribute key by the
//! time the value is used; this module reconstructs it from the originating
//! key expression. A constants index built from the input sources stands in
//! for the compiler's symbol table: every `const NAME: i32` nested at least
//! two module levels deep (the "constants container" shape, e.g.
//! `style::styleable::SomeView_color`) is recorded and path references in
//! key expressions resolve through it. Recovery is best-effort and feeds
//! diagnostics and generated-code readability only; the raw integer always
//! suffices for correctness.

use syn::visit::Visit;
use syn::{Expr, File, Item, LitInt};

use crate::diagnostics::Diagnostics;
use crate::model::{IdMap, ResolvedId};

#[derive(Debug)]
struct ConstEntry {
    segments: Vec<String>,
    value: i32,
}

/// Index of styleable-constant declarations found in the input source set.
#[derive(Debug, Default)]
pub struct ConstIndex {
    entries: Vec<ConstEntry>,
}

impl ConstIndex {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn scan_file(&mut self, file: &File) {
        let mut module = Vec::new();
        self.scan_items(&file.items, &mut module);
    }

    fn scan_items(&mut self, items: &[Item], module: &mut Vec<String>) {
        for item in items {
            match item {
                Item::Mod(m) => {
                    if let Some((_, items)) = &m.content {
                        module.push(m.ident.to_string());
                        self.scan_items(items, module);
                        module.pop();
                    }
                }
                // Two enclosing modules make a constants container member.
                Item::Const(c) if module.len() >= 2 => {
                    if let Some(value) = const_int_value(&c.expr) {
                        let mut segments = module.clone();
                        segments.push(c.ident.to_string());
                        self.entries.push(ConstEntry { segments, value });
                    }
                }
                _ => {}
            }
        }
    }

    /// Resolves a path reference to an indexed constant: an exact match on
    /// the full path, or a unique match on a trailing suffix of it (covering
    /// partially-qualified references). Ambiguous suffixes resolve to
    /// nothing and the caller falls back to the raw value.
    pub fn resolve(&self, path: &syn::Path) -> Option<(i32, syn::Path)> {
        let query: Vec<String> =
            path.segments.iter().map(|segment| segment.ident.to_string()).collect();
        if query.is_empty() {
            return None;
        }

        if let Some(entry) = self.entries.iter().find(|e| e.segments == query) {
            return Some((entry.value, entry.path()));
        }

        let mut matches = self.entries.iter().filter(|e| e.matches_suffix(&query));
        let first = matches.next()?;
        if matches.next().is_some() {
            return None;
        }
        Some((first.value, first.path()))
    }
}

impl ConstEntry {
    fn matches_suffix(&self, query: &[String]) -> bool {
        self.segments.len() >= query.len()
            && self.segments[self.segments.len() - query.len()..] == *query
    }

    fn path(&self) -> syn::Path {
        let mut path = syn::Path {
            leading_colon: None,
            segments: syn::punctuated::Punctuated::new(),
        };
        for segment in &self.segments {
            let ident = syn::Ident::new(segment, proc_macro2::Span::call_site());
            path.segments.push(syn::PathSegment::from(ident));
        }
        path
    }
}

fn const_int_value(expr: &Expr) -> Option<i32> {
    match expr {
        Expr::Lit(lit) => match &lit.lit {
            syn::Lit::Int(int) => int.base10_parse().ok(),
            _ => None,
        },
        Expr::Group(group) => const_int_value(&group.expr),
        _ => None,
    }
}

/// Traverses a key expression recording `{value -> symbol}` entries for
/// resolvable constant references and `{value -> no symbol}` entries for
/// bare integer literals, in traversal order.
pub struct IdScanner<'i> {
    index: &'i ConstIndex,
    pub ids: IdMap,
}

impl<'i> IdScanner<'i> {
    pub fn new(index: &'i ConstIndex) -> Self {
        IdScanner { index, ids: IdMap::new() }
    }

    pub fn reset(&mut self) {
        self.ids.clear();
    }
}

impl<'ast, 'i> Visit<'ast> for IdScanner<'i> {
    fn visit_expr_path(&mut self, node: &'ast syn::ExprPath) {
        if let Some((value, symbol)) = self.index.resolve(&node.path) {
            self.ids.put_symbol(value, symbol);
        }
        syn::visit::visit_expr_path(self, node);
    }

    fn visit_lit_int(&mut self, node: &'ast LitInt) {
        if let Ok(value) = node.base10_parse::<i32>() {
            self.ids.put_literal(value);
        }
    }
}

/// Resolves an annotation's key expression to a [`ResolvedId`].
///
/// The first mapping in traversal order wins. A key whose symbolic name
/// could not be recovered falls back to its raw value with a NOTE trace;
/// a key with no recoverable value at all is an error and the declaration
/// is excluded.
pub fn resolve_id(
    index: &ConstIndex,
    expr: &Expr,
    location: &str,
    diags: &mut Diagnostics,
) -> Option<ResolvedId> {
    let mut scanner = IdScanner::new(index);
    scanner.visit_expr(expr);

    match scanner.ids.first() {
        Some(id) => {
            if id.symbol.is_none() {
                diags.note(
                    location,
                    format!("no symbolic name recovered for attribute key {}", id.value),
                );
            }
            Some(id.clone())
        }
        None => {
            diags.error(
                location,
                "attribute key must be an integer literal or a reference to a styleable constant",
            );
            None
        }
    }
}
