//! Derive macro implementation for envbind

use proc_macro::TokenStream;
use quote::quote;
use syn::ext::IdentExt;
use syn::{parse_macro_input, Data, DeriveInput, Fields};

mod attrs;

use attrs::{FieldAttrs, StructAttrs};

/// `EnvBind` derive macro
///
/// Implements `Record`, `Field`, `Pointee` and `Target` for a struct so it
/// can be passed to `envbind::load_env` and nested inside other records.
///
/// # Supported Attributes
///
/// **Struct-level**:
/// - `#[env(custom_decode)]`: Consult the struct's `DecodeField` impl first
///
/// **Field-level**:
/// - `#[env(key = "NAME")]`: Bind from environment variable `NAME`
/// - `#[env(skip)]`: Leave the field out of the walk
/// - `#[env(mode)]`: Field of type `envbind::Mode` that records the load mode
///
/// # Example
///
/// See the `envbind` crate documentation for usage examples.
#[proc_macro_derive(EnvBind, attributes(env))]
pub fn derive_envbind(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    expand(&input)
        .unwrap_or_else(syn::Error::into_compile_error)
        .into()
}

fn expand(input: &DeriveInput) -> syn::Result<proc_macro2::TokenStream> {
    let struct_name = &input.ident;

    if !input.generics.params.is_empty() {
        return Err(syn::Error::new_spanned(
            &input.generics,
            "EnvBind does not support generic structs",
        ));
    }

    let fields = match &input.data {
        Data::Struct(data) => match &data.fields {
            Fields::Named(fields) => &fields.named,
            _ => {
                return Err(syn::Error::new_spanned(
                    input,
                    "EnvBind only supports structs with named fields",
                ));
            }
        },
        _ => {
            return Err(syn::Error::new_spanned(
                input,
                "EnvBind only supports structs",
            ));
        }
    };

    let struct_attrs = StructAttrs::from_attrs(&input.attrs)?;

    let mut visits = Vec::new();
    let mut mode_field = None;

    for field in fields {
        let Some(field_name) = field.ident.as_ref() else {
            continue;
        };
        let attrs = FieldAttrs::from_field(field)?;

        if attrs.mode {
            if mode_field.is_some() {
                return Err(syn::Error::new_spanned(
                    field,
                    "only one field can be marked #[env(mode)]",
                ));
            }
            mode_field = Some(field_name);
            continue;
        }
        if attrs.skip {
            continue;
        }

        // Decoders match on the name as written, without any `r#` prefix.
        let name = field_name.unraw().to_string();
        let key = match &attrs.key {
            Some(key) => quote! { ::std::option::Option::Some(#key) },
            None => quote! { ::std::option::Option::None },
        };

        visits.push(quote! {
            walker.field(
                self,
                &::envbind::FieldDescriptor::new(#name, #key),
                |this| ::envbind::Field::as_field(&mut this.#field_name),
            )?;
        });
    }

    let decode_fn = struct_attrs.custom_decode.then(|| {
        quote! {
            fn decode_field(
                &self,
                field: &str,
                key: &str,
                raw: &str,
            ) -> ::envbind::anyhow::Result<::std::option::Option<::envbind::Value>> {
                <Self as ::envbind::DecodeField>::decode_field(self, field, key, raw)
            }
        }
    });

    let mode_fn = mode_field.map(|field_name| {
        quote! {
            fn set_mode(&mut self, mode: ::envbind::Mode) {
                self.#field_name = mode;
            }
        }
    });

    Ok(quote! {
        impl ::envbind::Record for #struct_name {
            #[allow(unused_variables)]
            fn walk_fields(
                &mut self,
                walker: &mut ::envbind::Walker<'_>,
            ) -> ::std::result::Result<(), ::envbind::LoadError> {
                #(#visits)*
                ::std::result::Result::Ok(())
            }

            #decode_fn

            #mode_fn
        }

        impl ::envbind::Field for #struct_name {
            fn as_field(&mut self) -> ::envbind::FieldRef<'_> {
                ::envbind::FieldRef::Record(self)
            }
        }

        impl ::envbind::Pointee for #struct_name {
            fn optional_field(
                slot: &mut ::std::option::Option<Self>,
            ) -> ::envbind::FieldRef<'_> {
                match slot {
                    ::std::option::Option::Some(record) => ::envbind::FieldRef::Record(record),
                    ::std::option::Option::None => ::envbind::FieldRef::Absent,
                }
            }
        }

        impl<'a> ::envbind::Target<'a> for #struct_name {
            type Record = Self;

            fn into_record(self) -> ::std::result::Result<&'a mut Self, ::envbind::LoadError> {
                ::std::result::Result::Err(::envbind::LoadError::not_mutable::<Self>())
            }
        }
    })
}
