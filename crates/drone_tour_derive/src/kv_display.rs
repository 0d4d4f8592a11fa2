use proc_macro::TokenStream;
use proc_macro2::Span;
use quote::quote;
use syn::{Data, DeriveInput, Fields, LitStr, parse_macro_input, spanned::Spanned};

/// One `key=value` pair per field on a single line, e.g. `mode=opttsp precision=2`.
///
/// Field attributes:
/// - `#[kv(name = "...")]` renames the key,
/// - `#[kv(fmt = "display" | "len" | "opt")]` picks the rendering,
/// - `#[kv(empty = "...")]` prints a placeholder for empty strings,
/// - `#[kv(skip)]` leaves the field out.
pub fn derive_kv_display_inner(item: TokenStream) -> TokenStream {
    let input = parse_macro_input!(item as DeriveInput);
    let struct_ident = input.ident.clone();

    let Data::Struct(data_struct) = &input.data else {
        return syn::Error::new(input.span(), "KvDisplay can only be derived for structs")
            .to_compile_error()
            .into();
    };
    let Fields::Named(fields) = &data_struct.fields else {
        return syn::Error::new(input.span(), "KvDisplay requires named fields")
            .to_compile_error()
            .into();
    };

    let mut writes = Vec::new();

    for field in &fields.named {
        let Some(field_ident) = &field.ident else {
            continue;
        };
        let mut key = field_ident.to_string();
        let mut fmt_mode = String::from("display");
        let mut empty: Option<String> = None;
        let mut skip = false;

        for attr in &field.attrs {
            if !attr.path().is_ident("kv") {
                continue;
            }
            let parse_result = attr.parse_nested_meta(|meta| {
                if meta.path.is_ident("name") {
                    let lit: LitStr = meta.value()?.parse()?;
                    key = lit.value();
                    return Ok(());
                }
                if meta.path.is_ident("fmt") {
                    let lit: LitStr = meta.value()?.parse()?;
                    fmt_mode = lit.value();
                    return Ok(());
                }
                if meta.path.is_ident("empty") {
                    let lit: LitStr = meta.value()?.parse()?;
                    empty = Some(lit.value());
                    return Ok(());
                }
                if meta.path.is_ident("skip") {
                    skip = true;
                    return Ok(());
                }
                Err(meta.error("unsupported kv attribute; expected name/fmt/empty/skip"))
            });
            if let Err(err) = parse_result {
                return err.to_compile_error().into();
            }
        }
        if skip {
            continue;
        }

        let prefix = if writes.is_empty() {
            format!("{key}=")
        } else {
            format!(" {key}=")
        };
        let prefix_lit = LitStr::new(&prefix, Span::call_site());

        let value = match (fmt_mode.as_str(), &empty) {
            ("display", None) => quote! { write!(f, "{}", &self.#field_ident)?; },
            ("display", Some(placeholder)) => {
                let placeholder = LitStr::new(placeholder, Span::call_site());
                quote! {
                    if self.#field_ident.is_empty() {
                        f.write_str(#placeholder)?;
                    } else {
                        write!(f, "{}", &self.#field_ident)?;
                    }
                }
            }
            ("len", _) => quote! { write!(f, "{}", self.#field_ident.len())?; },
            ("opt", _) => quote! {
                match &self.#field_ident {
                    Some(value) => write!(f, "{value}")?,
                    None => f.write_str("-")?,
                }
            },
            (other, _) => {
                return syn::Error::new(field.span(), format!("unsupported kv fmt mode: {other}"))
                    .to_compile_error()
                    .into();
            }
        };

        writes.push(quote! {
            f.write_str(#prefix_lit)?;
            #value
        });
    }

    let expanded = quote! {
        impl std::fmt::Display for #struct_ident {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                #(#writes)*
                Ok(())
            }
        }
    };

    TokenStream::from(expanded)
}
