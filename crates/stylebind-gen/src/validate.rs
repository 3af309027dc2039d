//! Declaration validation: declared-type allow-lists per annotation and the
//! structural placement rules every binding must satisfy.
//!
//! Each failed check emits its own diagnostic; a declaration is usable by
//! the generator only if every check passes, and one bad declaration never
//! blocks the rest of the pass.

use syn::{Type, TypePath};

use crate::diagnostics::Diagnostics;
use crate::model::AttrKind;
use crate::scan::{AttrAnnotation, Placement, RawDecl};

/// Structural checks independent of the annotation's kind.
pub fn verify_common_restrictions(decl: &RawDecl, diags: &mut Diagnostics) -> bool {
    let mut ok = true;
    let annotation = decl.annotation.name();

    if decl.placement != Placement::NamedField {
        let shape = match decl.placement {
            Placement::TupleField => "tuple struct fields",
            Placement::EnumVariantField => "enum variant fields",
            Placement::FreeItem => "free statics or consts",
            Placement::NamedField => unreachable!(),
        };
        diags.error(
            decl.location(),
            format!("#[{annotation}] may only annotate named struct fields, not {shape}"),
        );
        ok = false;
    }

    if decl.owner.is_generic {
        diags.error(
            decl.location(),
            format!("#[{annotation}] fields may not be contained in generic types"),
        );
        ok = false;
    }

    if decl.owner.is_private {
        diags.error(
            decl.location(),
            format!("#[{annotation}] fields may not be contained in private types"),
        );
        ok = false;
    }

    if stylebind::is_reserved_namespace(&decl.owner.module_path) {
        diags.error(
            decl.location(),
            format!(
                "#[{annotation}]-annotated type incorrectly in reserved namespace ({})",
                decl.owner.qualified_name()
            ),
        );
        ok = false;
    }

    ok
}

/// Checks the declared field type against the annotation's allow-list
/// (native type or the `Dynamic` wrapper of it). Emits one diagnostic
/// naming the allowed set on mismatch.
pub fn validate_declaration(decl: &RawDecl, diags: &mut Diagnostics) -> bool {
    let Some(ty) = &decl.field_ty else { return false };
    let base = dynamic_inner(ty).unwrap_or(ty);

    let (allowed, ok) = match decl.annotation {
        AttrAnnotation::Bool => ("'bool'", is_ident(base, "bool")),
        AttrAnnotation::Color => (
            "'u32' or 'Option<ColorStateList>'",
            is_ident(base, "u32") || is_option_of(base, "ColorStateList"),
        ),
        AttrAnnotation::Dimension => {
            ("'i32' or 'f32'", is_ident(base, "i32") || is_ident(base, "f32"))
        }
        AttrAnnotation::Drawable => ("'Option<Drawable>'", is_option_of(base, "Drawable")),
        AttrAnnotation::Float => ("'f32'", is_ident(base, "f32")),
        AttrAnnotation::Int => ("'i32'", is_ident(base, "i32")),
        AttrAnnotation::ResourceId => ("'i32'", is_ident(base, "i32")),
        AttrAnnotation::String => ("'String'", is_ident(base, "String")),
    };

    if !ok {
        diags.error(
            decl.location(),
            format!("#[{}] field type must be {allowed}", decl.annotation.name()),
        );
    }
    ok
}

/// Splits the kind-family annotations on the declared type. A type that
/// passed validation but fits no arm means the validator and this table are
/// out of sync; that inconsistency is reported, never generated around.
pub fn decide_kind(annotation: AttrAnnotation, ty: &Type) -> Result<AttrKind, String> {
    let base = dynamic_inner(ty).unwrap_or(ty);
    match annotation {
        AttrAnnotation::Bool => Ok(AttrKind::Bool),
        AttrAnnotation::Color => {
            if is_option_of(base, "ColorStateList") {
                Ok(AttrKind::ColorState)
            } else if is_ident(base, "u32") {
                Ok(AttrKind::Color)
            } else {
                Err("validator must account for this color field type; please report".to_string())
            }
        }
        AttrAnnotation::Dimension => {
            if is_ident(base, "i32") {
                Ok(AttrKind::DimenInt)
            } else if is_ident(base, "f32") {
                Ok(AttrKind::DimenFloat)
            } else {
                Err("validator must account for this dimension field type; please report"
                    .to_string())
            }
        }
        AttrAnnotation::Drawable => Ok(AttrKind::Drawable),
        AttrAnnotation::Float => Ok(AttrKind::Float),
        AttrAnnotation::Int => Ok(AttrKind::Int),
        AttrAnnotation::ResourceId => Ok(AttrKind::ResourceId),
        AttrAnnotation::String => Ok(AttrKind::StringData),
    }
}

/// True when the declared type is the reactive `Dynamic<T>` wrapper.
pub fn is_dynamic(ty: &Type) -> bool {
    dynamic_inner(ty).is_some()
}

fn is_ident(ty: &Type, name: &str) -> bool {
    match ty {
        Type::Path(TypePath { qself: None, path }) => path
            .segments
            .last()
            .map(|segment| segment.ident == name && segment.arguments.is_none())
            .unwrap_or(false),
        _ => false,
    }
}

fn generic_inner<'a>(ty: &'a Type, wrapper: &str) -> Option<&'a Type> {
    let Type::Path(TypePath { qself: None, path }) = ty else { return None };
    let segment = path.segments.last()?;
    if segment.ident != wrapper {
        return None;
    }
    let syn::PathArguments::AngleBracketed(args) = &segment.arguments else { return None };
    match args.args.first()? {
        syn::GenericArgument::Type(inner) if args.args.len() == 1 => Some(inner),
        _ => None,
    }
}

fn dynamic_inner(ty: &Type) -> Option<&Type> {
    generic_inner(ty, "Dynamic")
}

fn is_option_of(ty: &Type, inner_name: &str) -> bool {
    generic_inner(ty, "Option").map(|inner| is_ident(inner, inner_name)).unwrap_or(false)
}
