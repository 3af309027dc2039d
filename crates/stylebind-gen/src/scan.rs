//! Discovery of annotated field declarations across the input source set.

use syn::{Attribute, Expr, File, Ident, Item, Type, Visibility};

use crate::diagnostics::Diagnostics;

/// The eight field annotations, one per attribute kind family.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttrAnnotation {
    Bool,
    Color,
    Dimension,
    Drawable,
    Float,
    Int,
    ResourceId,
    String,
}

impl AttrAnnotation {
    pub const ALL: [AttrAnnotation; 8] = [
        AttrAnnotation::Bool,
        AttrAnnotation::Color,
        AttrAnnotation::Dimension,
        AttrAnnotation::Drawable,
        AttrAnnotation::Float,
        AttrAnnotation::Int,
        AttrAnnotation::ResourceId,
        AttrAnnotation::String,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            AttrAnnotation::Bool => "bool_attr",
            AttrAnnotation::Color => "color_attr",
            AttrAnnotation::Dimension => "dimension_attr",
            AttrAnnotation::Drawable => "drawable_attr",
            AttrAnnotation::Float => "float_attr",
            AttrAnnotation::Int => "int_attr",
            AttrAnnotation::ResourceId => "resource_id_attr",
            AttrAnnotation::String => "string_attr",
        }
    }

    fn from_attribute(attr: &Attribute) -> Option<Self> {
        let ident = attr.path().segments.last()?.ident.to_string();
        Self::ALL.into_iter().find(|a| a.name() == ident)
    }
}

/// Where an annotation physically sat in the source.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Placement {
    NamedField,
    TupleField,
    EnumVariantField,
    FreeItem,
}

/// The declaration enclosing an annotated field.
#[derive(Debug, Clone)]
pub struct Owner {
    pub ident: Ident,
    pub module_path: String,
    pub is_private: bool,
    pub is_generic: bool,
}

impl Owner {
    pub fn qualified_name(&self) -> String {
        if self.module_path.is_empty() {
            self.ident.to_string()
        } else {
            format!("{}::{}", self.module_path, self.ident)
        }
    }
}

/// One discovered annotation occurrence, prior to validation.
#[derive(Debug)]
pub struct RawDecl {
    pub annotation: AttrAnnotation,
    /// Key argument expression; absent when the annotation carried none or
    /// sat somewhere no key is expected.
    pub key_expr: Option<Expr>,
    pub field_ident: Option<Ident>,
    pub field_ty: Option<Type>,
    pub owner: Owner,
    pub placement: Placement,
}

impl RawDecl {
    pub fn location(&self) -> String {
        match &self.field_ident {
            Some(field) => format!("{}.{}", self.owner.qualified_name(), field),
            None => self.owner.qualified_name(),
        }
    }
}

/// Enumerates every annotation occurrence in the input files, in source
/// order. Discovery records shape only; the validator judges it.
pub fn discover(files: &[File], diags: &mut Diagnostics) -> Vec<RawDecl> {
    let mut decls = Vec::new();
    for file in files {
        let mut module = Vec::new();
        walk_items(&file.items, &mut module, &mut decls, diags);
    }
    decls
}

fn walk_items(
    items: &[Item],
    module: &mut Vec<String>,
    decls: &mut Vec<RawDecl>,
    diags: &mut Diagnostics,
) {
    for item in items {
        match item {
            Item::Mod(m) => {
                if let Some((_, items)) = &m.content {
                    module.push(m.ident.to_string());
                    walk_items(items, module, decls, diags);
                    module.pop();
                }
            }
            Item::Struct(s) => {
                let owner = Owner {
                    ident: s.ident.clone(),
                    module_path: module.join("::"),
                    is_private: matches!(s.vis, Visibility::Inherited),
                    is_generic: !s.generics.params.is_empty(),
                };
                match &s.fields {
                    syn::Fields::Named(named) => {
                        for field in &named.named {
                            collect_field(field, &owner, Placement::NamedField, decls, diags);
                        }
                    }
                    syn::Fields::Unnamed(unnamed) => {
                        for field in &unnamed.unnamed {
                            collect_field(field, &owner, Placement::TupleField, decls, diags);
                        }
                    }
                    syn::Fields::Unit => {}
                }
            }
            Item::Enum(e) => {
                let owner = Owner {
                    ident: e.ident.clone(),
                    module_path: module.join("::"),
                    is_private: matches!(e.vis, Visibility::Inherited),
                    is_generic: !e.generics.params.is_empty(),
                };
                for variant in &e.variants {
                    for field in &variant.fields {
                        collect_field(field, &owner, Placement::EnumVariantField, decls, diags);
                    }
                }
            }
            Item::Static(s) => {
                collect_free_item(&s.attrs, &s.ident, module, decls);
            }
            Item::Const(c) => {
                collect_free_item(&c.attrs, &c.ident, module, decls);
            }
            _ => {}
        }
    }
}

fn collect_field(
    field: &syn::Field,
    owner: &Owner,
    placement: Placement,
    decls: &mut Vec<RawDecl>,
    diags: &mut Diagnostics,
) {
    for attr in &field.attrs {
        let Some(annotation) = AttrAnnotation::from_attribute(attr) else { continue };
        let location = match &field.ident {
            Some(ident) => format!("{}.{}", owner.qualified_name(), ident),
            None => owner.qualified_name(),
        };
        let key_expr = match attr.parse_args::<Expr>() {
            Ok(expr) => Some(expr),
            Err(err) => {
                diags.error(
                    location,
                    format!("unable to parse #[{}] key argument: {err}", annotation.name()),
                );
                continue;
            }
        };
        decls.push(RawDecl {
            annotation,
            key_expr,
            field_ident: field.ident.clone(),
            field_ty: Some(field.ty.clone()),
            owner: owner.clone(),
            placement,
        });
    }
}

fn collect_free_item(
    attrs: &[Attribute],
    ident: &Ident,
    module: &[String],
    decls: &mut Vec<RawDecl>,
) {
    for attr in attrs {
        let Some(annotation) = AttrAnnotation::from_attribute(attr) else { continue };
        decls.push(RawDecl {
            annotation,
            key_expr: attr.parse_args::<Expr>().ok(),
            field_ident: None,
            field_ty: None,
            owner: Owner {
                ident: ident.clone(),
                module_path: module.join("::"),
                is_private: false,
                is_generic: false,
            },
            placement: Placement::FreeItem,
        });
    }
}
