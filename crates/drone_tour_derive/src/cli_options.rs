use proc_macro::TokenStream;
use proc_macro2::Span;
use quote::quote;
use syn::{Data, DeriveInput, Fields, LitStr, Path, parse_macro_input, spanned::Spanned};

use crate::utils;

struct CliField {
    long: LitStr,
    short: Option<LitStr>,
    apply: proc_macro2::TokenStream,
    is_flag: bool,
}

/// Generates `split_arg`, `long_for_short`, `is_cli_flag` and `apply_cli_option`
/// for every field carrying `#[cli(long = "...")]`.
pub fn derive_cli_options_inner(item: TokenStream) -> TokenStream {
    let input = parse_macro_input!(item as DeriveInput);
    let struct_ident = input.ident.clone();

    let Data::Struct(data_struct) = &input.data else {
        return syn::Error::new(input.span(), "CliOptions can only be derived for structs")
            .to_compile_error()
            .into();
    };
    let Fields::Named(fields) = &data_struct.fields else {
        return syn::Error::new(input.span(), "CliOptions requires named fields")
            .to_compile_error()
            .into();
    };

    let mut cli_fields = Vec::new();

    for field in &fields.named {
        let Some(field_ident) = &field.ident else {
            continue;
        };

        let mut long_name: Option<String> = None;
        let mut short_name: Option<String> = None;
        let mut parse_with: Option<Path> = None;

        for attr in &field.attrs {
            if !attr.path().is_ident("cli") {
                continue;
            }
            let parse_result = attr.parse_nested_meta(|meta| {
                if meta.path.is_ident("long") {
                    let lit: LitStr = meta.value()?.parse()?;
                    long_name = Some(lit.value());
                    return Ok(());
                }
                if meta.path.is_ident("short") {
                    let lit: LitStr = meta.value()?.parse()?;
                    if lit.value().chars().count() != 1 {
                        return Err(meta.error("short option must be a single character"));
                    }
                    short_name = Some(lit.value());
                    return Ok(());
                }
                if meta.path.is_ident("parse_with") {
                    let lit: LitStr = meta.value()?.parse()?;
                    parse_with = Some(syn::parse_str(&lit.value())?);
                    return Ok(());
                }
                Err(meta.error("unsupported cli attribute; expected long/short/parse_with"))
            });
            if let Err(err) = parse_result {
                return err.to_compile_error().into();
            }
        }

        let Some(long_name) = long_name else {
            continue;
        };

        let is_flag = utils::is_bool(&field.ty);
        let apply = if is_flag {
            quote! {
                self.#field_ident = match value {
                    None => true,
                    Some(raw) => raw.parse::<bool>().map_err(|e| {
                        crate::Error::invalid_input(format!(
                            "Invalid value for --{name}: {raw} ({e})"
                        ))
                    })?,
                };
            }
        } else if let Some(inner) = utils::inner_of_option(&field.ty) {
            let parse_expr = utils::build_cli_parse_expr(inner, parse_with.as_ref());
            quote! {
                let raw = value.ok_or_else(|| {
                    crate::Error::invalid_input(format!("Missing value for --{name}"))
                })?;
                self.#field_ident = Some(#parse_expr);
            }
        } else {
            let parse_expr = utils::build_cli_parse_expr(&field.ty, parse_with.as_ref());
            quote! {
                let raw = value.ok_or_else(|| {
                    crate::Error::invalid_input(format!("Missing value for --{name}"))
                })?;
                self.#field_ident = #parse_expr;
            }
        };

        cli_fields.push(CliField {
            long: LitStr::new(&long_name, Span::call_site()),
            short: short_name.map(|s| LitStr::new(&s, Span::call_site())),
            apply,
            is_flag,
        });
    }

    let apply_arms = cli_fields.iter().map(|f| {
        let long = &f.long;
        let apply = &f.apply;
        quote! {
            #long => {
                #apply
                Ok(true)
            }
        }
    });
    let short_arms = cli_fields.iter().filter_map(|f| {
        let long = &f.long;
        f.short.as_ref().map(|short| quote! { #short => Some(#long), })
    });
    let flag_names: Vec<&LitStr> = cli_fields
        .iter()
        .filter(|f| f.is_flag)
        .map(|f| &f.long)
        .collect();
    let flag_check = if flag_names.is_empty() {
        quote! {
            let _ = name;
            false
        }
    } else {
        quote! { matches!(name, #(#flag_names)|*) }
    };

    let expanded = quote! {
        impl #struct_ident {
            /// Splits `name=value`, or takes the next argument as the value
            /// unless it looks like another option. Flags only take `=value`.
            fn split_arg(
                raw_name: &str,
                args: &mut std::iter::Peekable<impl Iterator<Item = String>>,
            ) -> (String, Option<String>) {
                if let Some((k, v)) = raw_name.split_once('=') {
                    return (k.to_string(), Some(v.to_string()));
                }
                if Self::is_cli_flag(raw_name) {
                    return (raw_name.to_string(), None);
                }

                let value = match args.peek() {
                    Some(next) if !next.starts_with('-') => args.next(),
                    _ => None,
                };

                (raw_name.to_string(), value)
            }

            fn long_for_short(short: &str) -> Option<&'static str> {
                match short {
                    #(#short_arms)*
                    _ => None,
                }
            }

            fn is_cli_flag(name: &str) -> bool {
                #flag_check
            }

            fn apply_cli_option(
                &mut self,
                name: &str,
                value: Option<String>,
            ) -> crate::Result<bool> {
                match name {
                    #(#apply_arms,)*
                    _ => Ok(false),
                }
            }
        }
    };

    TokenStream::from(expanded)
}
