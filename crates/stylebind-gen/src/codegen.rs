//! Binder code generation: one synthesized binder definition per owning
//! type, applying its bindings in discovery order against a scoped attribute
//! snapshot, plus the registration entry point the host calls at startup.

use proc_macro2::TokenStream;
use quote::{format_ident, quote};
use stylebind::BINDER_SUFFIX;
use syn::Ident;

use crate::model::{AttrBinding, AttrKind, BindingGroup};

pub struct BinderCodegen<'a> {
    group: &'a BindingGroup,
}

impl<'a> BinderCodegen<'a> {
    pub fn new(group: &'a BindingGroup) -> Self {
        BinderCodegen { group }
    }

    pub fn binder_ident(&self) -> Ident {
        format_ident!("{}{}", self.group.owner, BINDER_SUFFIX)
    }

    /// The registry key: the owner's module-qualified name with the
    /// convention suffix. Two owners sharing a simple name in different
    /// modules register under distinct keys.
    pub fn binder_name(&self) -> String {
        let simple = format!("{}{}", self.group.owner, BINDER_SUFFIX);
        if self.group.owner_module.is_empty() {
            simple
        } else {
            format!("{}::{simple}", self.group.owner_module)
        }
    }

    pub fn dyn_fn_ident(&self) -> Ident {
        format_ident!("{}_bind_dyn", to_snake_case(&self.group.owner.to_string()))
    }

    /// The owner type as referenced from the generated file: a crate-rooted
    /// path, since the generated file is included at the host crate's root.
    fn owner_path(&self) -> TokenStream {
        let owner = &self.group.owner;
        if self.group.owner_module.is_empty() {
            quote! { crate::#owner }
        } else {
            let segments = module_idents(&self.group.owner_module);
            quote! { crate::#(#segments)::*::#owner }
        }
    }

    /// The binder definition: its constructor applies every binding in the
    /// group's discovery order, with the snapshot released on every exit
    /// path, and the type-erased entry point the dispatcher invokes.
    pub fn generate(&self) -> TokenStream {
        let owner = self.owner_path();
        let owner_str = self.group.qualified_owner();
        let binder = self.binder_ident();
        let binder_name = self.binder_name();
        let dyn_fn = self.dyn_fn_ident();
        let statements: Vec<TokenStream> =
            self.group.bindings.iter().map(binding_statement).collect();

        quote! {
            pub struct #binder;

            impl #binder {
                pub fn bind(
                    view: &mut #owner,
                    attrs: ::std::option::Option<&::stylebind::AttributeSet>,
                    styleable: &[i32],
                    def_style_attr: i32,
                    def_style_res: i32,
                    action: ::std::option::Option<&dyn Fn(&::stylebind::StyledValues)>,
                ) -> ::std::result::Result<(), ::stylebind::BindError> {
                    let a = ::stylebind::StyledView::context(view).theme().obtain_styled(
                        attrs,
                        styleable,
                        def_style_attr,
                        def_style_res,
                    );
                    #(#statements)*
                    if let ::std::option::Option::Some(action) = action {
                        action(&a);
                    }
                    ::std::result::Result::Ok(())
                }
            }

            pub fn #dyn_fn(
                view: &mut dyn ::stylebind::StyledView,
                args: &::stylebind::BindArgs<'_>,
            ) -> ::std::result::Result<(), ::stylebind::BindError> {
                match view.as_any_mut().downcast_mut::<#owner>() {
                    ::std::option::Option::Some(view) => #binder::bind(
                        view,
                        args.attrs,
                        args.styleable,
                        args.def_style_attr,
                        args.def_style_res,
                        args.action,
                    ),
                    ::std::option::Option::None => {
                        ::std::result::Result::Err(::stylebind::BindError::wrong_instance_type(
                            #binder_name,
                            #owner_str,
                        ))
                    }
                }
            }
        }
    }
}

fn binding_statement(binding: &AttrBinding) -> TokenStream {
    let field = &binding.field;
    let key = binding.id.code();
    match (binding.kind, binding.dynamic) {
        (AttrKind::Bool, false) => quote! {
            view.#field = a.get_bool(#key, view.#field);
        },
        (AttrKind::Bool, true) => quote! {
            view.#field.set(a.get_bool(#key, *view.#field.get()));
        },
        (AttrKind::Color, false) => quote! {
            view.#field = a.get_color(#key, view.#field);
        },
        (AttrKind::Color, true) => quote! {
            view.#field.set(a.get_color(#key, *view.#field.get()));
        },
        (AttrKind::ColorState, false) => quote! {
            view.#field = a.get_color_state_list(#key).or_else(|| view.#field.clone());
        },
        (AttrKind::ColorState, true) => quote! {
            {
                let current = view.#field.get().clone();
                view.#field.set(a.get_color_state_list(#key).or(current));
            }
        },
        (AttrKind::DimenInt, false) => quote! {
            view.#field = a.get_dimension(#key, view.#field as f32) as i32;
        },
        (AttrKind::DimenInt, true) => quote! {
            view.#field.set(a.get_dimension(#key, *view.#field.get() as f32) as i32);
        },
        (AttrKind::DimenFloat, false) => quote! {
            view.#field = a.get_dimension(#key, view.#field);
        },
        (AttrKind::DimenFloat, true) => quote! {
            view.#field.set(a.get_dimension(#key, *view.#field.get()));
        },
        (AttrKind::Drawable, false) => quote! {
            view.#field = ::stylebind::drawable_compat(
                &a,
                ::stylebind::StyledView::context(view),
                #key,
            )?
            .or_else(|| view.#field.clone());
        },
        (AttrKind::Drawable, true) => quote! {
            {
                let current = view.#field.get().clone();
                view.#field.set(
                    ::stylebind::drawable_compat(
                        &a,
                        ::stylebind::StyledView::context(view),
                        #key,
                    )?
                    .or(current),
                );
            }
        },
        (AttrKind::Float, false) => quote! {
            view.#field = a.get_float(#key, view.#field);
        },
        (AttrKind::Float, true) => quote! {
            view.#field.set(a.get_float(#key, *view.#field.get()));
        },
        (AttrKind::Int, false) => quote! {
            view.#field = a.get_int(#key, view.#field);
        },
        (AttrKind::Int, true) => quote! {
            view.#field.set(a.get_int(#key, *view.#field.get()));
        },
        (AttrKind::ResourceId, false) => quote! {
            view.#field = a.get_resource_id(#key, view.#field);
        },
        (AttrKind::ResourceId, true) => quote! {
            view.#field.set(a.get_resource_id(#key, *view.#field.get()));
        },
        (AttrKind::StringData, false) => quote! {
            view.#field = a.get_string(#key).unwrap_or_else(|| view.#field.clone());
        },
        (AttrKind::StringData, true) => quote! {
            {
                let current = view.#field.get().clone();
                view.#field.set(a.get_string(#key).unwrap_or(current));
            }
        },
    }
}

fn module_idents(module_path: &str) -> Vec<Ident> {
    module_path.split("::").map(|segment| format_ident!("{}", segment)).collect()
}

/// Generated items arranged by owning module, so each binder lands in a
/// `mod` block mirroring its owner's namespace and owners sharing a simple
/// name never collide.
#[derive(Default)]
struct ModuleTree {
    items: Vec<TokenStream>,
    children: Vec<(String, ModuleTree)>,
}

impl ModuleTree {
    fn insert(&mut self, path: &[String], tokens: TokenStream) {
        match path.split_first() {
            None => self.items.push(tokens),
            Some((head, rest)) => {
                let pos = match self.children.iter().position(|(name, _)| name == head) {
                    Some(pos) => pos,
                    None => {
                        self.children.push((head.clone(), ModuleTree::default()));
                        self.children.len() - 1
                    }
                };
                self.children[pos].1.insert(rest, tokens);
            }
        }
    }

    fn render(&self) -> TokenStream {
        let items = &self.items;
        let children = self.children.iter().map(|(name, child)| {
            let ident = format_ident!("{}", name);
            let inner = child.render();
            quote! {
                pub mod #ident {
                    #inner
                }
            }
        });
        quote! {
            #(#items)*
            #(#children)*
        }
    }
}

/// Renders the full generated file: every binder definition inside a module
/// layout mirroring its owner's, plus one `register_attr_bindings` entry
/// point installing them into the global dispatcher. Output is deterministic
/// for the same groups in the same order.
pub fn generate_file(groups: &[BindingGroup]) -> String {
    let mut tree = ModuleTree::default();
    for group in groups {
        let path: Vec<String> = if group.owner_module.is_empty() {
            Vec::new()
        } else {
            group.owner_module.split("::").map(str::to_string).collect()
        };
        tree.insert(&path, BinderCodegen::new(group).generate());
    }

    let registrations: Vec<TokenStream> = groups
        .iter()
        .map(|group| {
            let codegen = BinderCodegen::new(group);
            let name = codegen.binder_name();
            let dyn_fn = codegen.dyn_fn_ident();
            let path = if group.owner_module.is_empty() {
                quote! { #dyn_fn }
            } else {
                let segments = module_idents(&group.owner_module);
                quote! { self::#(#segments)::*::#dyn_fn }
            };
            quote! {
                ::stylebind::register_binder(#name, #path);
            }
        })
        .collect();

    let body = tree.render();
    let tokens = quote! {
        #body

        pub fn register_attr_bindings() {
            #(#registrations)*
        }
    };
    format!("// Generated by stylebind-gen. Do not edit.\n\n{tokens}\n")
}

fn to_snake_case(name: &str) -> String {
    let mut out = String::with_capacity(name.len() + 4);
    for (i, ch) in name.chars().enumerate() {
        if ch.is_uppercase() {
            if i != 0 {
                out.push('_');
            }
            out.extend(ch.to_lowercase());
        } else {
            out.push(ch);
        }
    }
    out
}
