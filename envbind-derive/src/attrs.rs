//! Attribute parsing for `#[env(...)]` annotations.
//!
//! This module extracts and validates binding attributes from structs and
//! their fields during macro expansion.

use syn::{Attribute, Field, LitStr};

/// Parsed `#[env(...)]` attributes from a struct field.
#[derive(Debug, Default)]
pub struct FieldAttrs {
    /// Environment variable bound to the field.
    ///
    /// `Some("")` is kept as written; the runtime treats it as no binding.
    pub key: Option<String>,

    /// Leave the field out of the walk.
    pub skip: bool,

    /// The field receives the load mode.
    pub mode: bool,
}

impl FieldAttrs {
    /// Extract and parse `#[env(...)]` attributes from a struct field.
    ///
    /// Attributes with other paths are ignored so other derives can use them.
    pub fn from_field(field: &Field) -> syn::Result<Self> {
        let mut attrs = Self::default();

        for attr in env_attrs(&field.attrs) {
            attr.parse_nested_meta(|meta| {
                // key = "..."
                if meta.path.is_ident("key") {
                    let value: LitStr = meta.value()?.parse()?;
                    attrs.key = Some(value.value());
                    return Ok(());
                }

                if meta.path.is_ident("skip") {
                    attrs.skip = true;
                    return Ok(());
                }

                if meta.path.is_ident("mode") {
                    attrs.mode = true;
                    return Ok(());
                }

                Err(meta.error("unsupported env attribute"))
            })?;
        }

        if attrs.key.is_some() && (attrs.skip || attrs.mode) {
            return Err(syn::Error::new_spanned(
                field,
                "`key` cannot be combined with `skip` or `mode`",
            ));
        }
        if attrs.skip && attrs.mode {
            return Err(syn::Error::new_spanned(
                field,
                "`skip` and `mode` cannot be combined",
            ));
        }

        Ok(attrs)
    }
}

/// Parsed `#[env(...)]` attributes from the struct itself.
#[derive(Debug, Default)]
pub struct StructAttrs {
    /// Delegate `decode_field` to the struct's `DecodeField` impl.
    pub custom_decode: bool,
}

impl StructAttrs {
    pub fn from_attrs(attrs: &[Attribute]) -> syn::Result<Self> {
        let mut parsed = Self::default();

        for attr in env_attrs(attrs) {
            attr.parse_nested_meta(|meta| {
                if meta.path.is_ident("custom_decode") {
                    parsed.custom_decode = true;
                    return Ok(());
                }

                Err(meta.error("unsupported struct-level env attribute"))
            })?;
        }

        Ok(parsed)
    }
}

fn env_attrs(attrs: &[Attribute]) -> impl Iterator<Item = &Attribute> {
    attrs.iter().filter(|attr| attr.path().is_ident("env"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use syn::parse_quote;

    #[test]
    fn test_parse_key_attribute() {
        let field: Field = parse_quote! {
            #[env(key = "DATABASE_URL")]
            pub database_url: String
        };

        let attrs = FieldAttrs::from_field(&field).unwrap();
        assert_eq!(attrs.key, Some("DATABASE_URL".to_string()));
        assert!(!attrs.skip);
    }

    #[test]
    fn test_parse_empty_key() {
        let field: Field = parse_quote! {
            #[env(key = "")]
            pub name: String
        };

        let attrs = FieldAttrs::from_field(&field).unwrap();
        assert_eq!(attrs.key, Some(String::new()));
    }

    #[test]
    fn test_untagged_field() {
        let field: Field = parse_quote! {
            #[serde(default)]
            pub nested: Inner
        };

        let attrs = FieldAttrs::from_field(&field).unwrap();
        assert_eq!(attrs.key, None);
        assert!(!attrs.skip && !attrs.mode);
    }

    #[test]
    fn test_parse_skip_and_mode() {
        let skip: Field = parse_quote! {
            #[env(skip)]
            pub tags: Vec<String>
        };
        let mode: Field = parse_quote! {
            #[env(mode)]
            pub config_mode: Mode
        };

        assert!(FieldAttrs::from_field(&skip).unwrap().skip);
        assert!(FieldAttrs::from_field(&mode).unwrap().mode);
    }

    #[test]
    fn test_key_with_skip_is_rejected() {
        let field: Field = parse_quote! {
            #[env(key = "X", skip)]
            pub x: String
        };

        assert!(FieldAttrs::from_field(&field).is_err());
    }

    #[test]
    fn test_mode_with_skip_or_key_is_rejected() {
        let skip_mode: Field = parse_quote! {
            #[env(skip, mode)]
            pub config_mode: Mode
        };
        let key_mode: Field = parse_quote! {
            #[env(key = "X", mode)]
            pub config_mode: Mode
        };

        let err = FieldAttrs::from_field(&skip_mode).unwrap_err();
        assert!(err.to_string().contains("`skip` and `mode` cannot be combined"));
        let err = FieldAttrs::from_field(&key_mode).unwrap_err();
        assert!(err.to_string().contains("`key` cannot be combined"));
    }

    #[test]
    fn test_unknown_attribute_is_rejected() {
        let field: Field = parse_quote! {
            #[env(default = 1)]
            pub x: u32
        };

        let err = FieldAttrs::from_field(&field).unwrap_err();
        assert!(err.to_string().contains("unsupported env attribute"));
    }

    #[test]
    fn test_parse_custom_decode() {
        let attrs: Vec<Attribute> = vec![parse_quote!(#[env(custom_decode)])];
        assert!(StructAttrs::from_attrs(&attrs).unwrap().custom_decode);

        let bad: Vec<Attribute> = vec![parse_quote!(#[env(prefix = "APP_")])];
        assert!(StructAttrs::from_attrs(&bad).is_err());
    }
}
