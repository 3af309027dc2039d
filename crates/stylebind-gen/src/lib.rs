//! Build-time half of the styled-attribute binding system.
//!
//! One generation pass per build: annotated field declarations are
//! discovered across the input source set, validated, their attribute keys
//! symbolically resolved, grouped by owning type, and one binder definition
//! is generated per group. An external build driver feeds sources in and
//! writes the generated file out; this crate is only the analysis and
//! generation.

pub mod codegen;
pub mod diagnostics;
pub mod model;
pub mod resolve;
pub mod scan;
pub mod validate;

pub use codegen::{generate_file, BinderCodegen};
pub use diagnostics::{Diagnostic, Diagnostics, Severity};
pub use model::{AttrBinding, AttrKind, BindingGroup, IdMap, ResolvedId};
pub use resolve::{resolve_id, ConstIndex, IdScanner};
pub use scan::{discover, AttrAnnotation, Owner, Placement, RawDecl};
pub use validate::{decide_kind, is_dynamic, validate_declaration, verify_common_restrictions};

use model::BindingGroup as Group;

/// Outcome of one generation pass.
#[derive(Debug)]
pub struct Generation {
    /// Rendered source for the generated file; `None` when no owning type
    /// had a valid binding.
    pub source: Option<String>,
    pub groups: Vec<Group>,
    pub diagnostics: Diagnostics,
}

/// Drives discovery, validation, resolution and generation over a set of
/// parsed source files.
#[derive(Debug, Default)]
pub struct Processor {
    files: Vec<syn::File>,
}

impl Processor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_source(&mut self, source: &str) -> syn::Result<()> {
        self.files.push(syn::parse_file(source)?);
        Ok(())
    }

    pub fn add_file(&mut self, file: syn::File) {
        self.files.push(file);
    }

    pub fn run(&self) -> Generation {
        let mut diags = Diagnostics::new();

        let mut index = ConstIndex::new();
        for file in &self.files {
            index.scan_file(file);
        }

        let decls = scan::discover(&self.files, &mut diags);

        let mut groups: Vec<Group> = Vec::new();
        for decl in decls {
            // All checks for a declaration are reported; a failing
            // declaration is excluded without blocking the rest.
            if !validate::verify_common_restrictions(&decl, &mut diags) {
                continue;
            }
            if !validate::validate_declaration(&decl, &mut diags) {
                continue;
            }
            let (Some(ty), Some(field), Some(expr)) =
                (&decl.field_ty, &decl.field_ident, &decl.key_expr)
            else {
                continue;
            };

            let kind = match validate::decide_kind(decl.annotation, ty) {
                Ok(kind) => kind,
                Err(message) => {
                    diags.error(
                        decl.location(),
                        format!(
                            "unable to parse #[{}] binding: {message}",
                            decl.annotation.name()
                        ),
                    );
                    continue;
                }
            };

            let Some(id) = resolve::resolve_id(&index, expr, &decl.location(), &mut diags) else {
                continue;
            };

            let binding = AttrBinding::new(field.clone(), kind, id, validate::is_dynamic(ty));
            let owner_name = decl.owner.qualified_name();
            match groups.iter_mut().find(|group| group.qualified_owner() == owner_name) {
                Some(group) => group.bindings.push(binding),
                None => groups.push(Group {
                    owner: decl.owner.ident.clone(),
                    owner_module: decl.owner.module_path.clone(),
                    bindings: vec![binding],
                }),
            }
        }

        let source = if groups.is_empty() { None } else { Some(codegen::generate_file(&groups)) };
        Generation { source, groups, diagnostics: diags }
    }
}
