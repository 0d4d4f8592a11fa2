use proc_macro::TokenStream;
use quote::quote;
use syn::{ItemFn, LitStr, ReturnType, parse_macro_input};

pub fn timer_inner(attr: TokenStream, item: TokenStream) -> TokenStream {
    let label = if attr.is_empty() {
        None
    } else {
        Some(parse_macro_input!(attr as LitStr))
    };
    let ItemFn {
        attrs,
        vis,
        sig,
        block,
    } = parse_macro_input!(item as ItemFn);

    if sig.asyncness.is_some() {
        return syn::Error::new_spanned(sig.fn_token, "timer does not support async functions")
            .to_compile_error()
            .into();
    }

    let label = label.unwrap_or_else(|| LitStr::new(&sig.ident.to_string(), sig.ident.span()));
    let output = match &sig.output {
        ReturnType::Default => quote! { () },
        ReturnType::Type(_, ty) => quote! { #ty },
    };

    // The body runs in a closure so early `return`s and `?` still reach the log line.
    let expanded = quote! {
        #(#attrs)*
        #vis #sig {
            let __timer_start = ::std::time::Instant::now();
            #[allow(clippy::redundant_closure_call)]
            let __timer_result = (|| -> #output #block)();
            ::log::info!(
                "{}: elapsed={:.3}s",
                #label,
                __timer_start.elapsed().as_secs_f64()
            );
            __timer_result
        }
    };

    TokenStream::from(expanded)
}
