//! Procedural macros for neet
//!
//! This crate provides the `#[invocable]` attribute macro that implements the `Invocable`
//! trait from an inherent `call()` method.

use proc_macro::TokenStream;
use proc_macro2::Span;
use quote::quote;
use syn::{
    parse_macro_input, Attribute, Expr, ExprLit, FnArg, GenericArgument, Ident, ImplItem,
    ImplItemFn, ItemImpl, Lit, LitStr, Meta, Pat, PatType, PathArguments, ReturnType, Type,
};

/// Attribute macro to implement `Invocable` for a type.
///
/// Apply this to an `impl` block containing a `call()` method. The macro:
/// - Derives the `Value` type from the `call()` signature
/// - Checks the argument count at invocation time and reports mismatches as errors
/// - Takes the documentation of `call()` as the object's documentation
/// - Supports stateless (no self), read-only (`&self`) and mutable (`&mut self`) objects
/// - Supports infallible (`-> T`) and fallible (`-> Result<T, E>`) calls
///
/// The impl block itself is kept as written, so `call()` stays usable directly.
///
/// # Patterns
///
/// ## Mutable State
///
/// ```ignore
/// use neet::invocable;
///
/// struct Accumulator {
///     total: i64,
/// }
///
/// #[invocable]
/// impl Accumulator {
///     /// Add `x` to the running total.
///     fn call(&mut self, x: i64) -> i64 {
///         self.total += x;
///         self.total
///     }
/// }
/// ```
///
/// ## Read-Only State, Fallible
///
/// ```ignore
/// use neet::invocable;
///
/// struct Divider {
///     divisor: i64,
/// }
///
/// #[invocable(name = "div")]
/// impl Divider {
///     fn call(&self, x: i64) -> Result<i64, String> {
///         x.checked_div(self.divisor).ok_or_else(|| "division by zero".to_string())
///     }
/// }
/// ```
///
/// # Requirements
///
/// - The impl block must contain a `fn call()` method (not `async`)
/// - Parameters are taken by value, all of the same type `T`
/// - The return type is `T`, or `Result<T, E>` / `OpResult<T>` with `E: Into<OpError>`
///
/// # Generated Code
///
/// ```ignore
/// // Your code:
/// #[invocable]
/// impl Accumulator {
///     /// Add `x` to the running total.
///     fn call(&mut self, x: i64) -> i64 { .. }
/// }
///
/// // Generated:
/// impl ::neet::Invocable for Accumulator {
///     type Value = i64;
///
///     fn invoke(&mut self, args: Vec<i64>) -> ::neet::OpResult<i64> {
///         let [x] = take_args::<i64, 1>(&Invocable::name(self), args)?;
///         Ok(self.call(x))
///     }
///
///     fn doc(&self) -> Option<Cow<'static, str>> {
///         Some(Cow::Borrowed("Add `x` to the running total."))
///     }
/// }
/// ```
#[proc_macro_attribute]
pub fn invocable(attr: TokenStream, item: TokenStream) -> TokenStream {
    let mut name_override: Option<LitStr> = None;
    let attr_parser = syn::meta::parser(|meta| {
        if meta.path.is_ident("name") {
            name_override = Some(meta.value()?.parse()?);
            Ok(())
        } else {
            Err(meta.error("unsupported #[invocable] argument\n\nExpected: name = \"...\""))
        }
    });
    parse_macro_input!(attr with attr_parser);

    let impl_block = parse_macro_input!(item as ItemImpl);

    if let Some((_, path, _)) = &impl_block.trait_ {
        return syn::Error::new_spanned(
            path,
            "#[invocable] goes on an inherent impl block, not on a trait impl",
        )
        .to_compile_error()
        .into();
    }

    let self_ty = &impl_block.self_ty;
    let (impl_generics, _, where_clause) = impl_block.generics.split_for_impl();

    // Find the call() method
    let call_method = match impl_block.items.iter().find_map(|item| match item {
        ImplItem::Fn(method) if method.sig.ident == "call" => Some(method),
        _ => None,
    }) {
        Some(method) => method,
        None => {
            return syn::Error::new_spanned(
                &impl_block,
                "impl block must contain a call() method\n\n\
                 Expected signature: fn call(&mut self, a: T, ...) -> T\n\
                              or: fn call(&self, a: T, ...) -> Result<T, E>",
            )
            .to_compile_error()
            .into();
        }
    };

    if let Some(asyncness) = &call_method.sig.asyncness {
        return syn::Error::new_spanned(
            asyncness,
            "call() must be synchronous\n\n\
             Operations run when a node is realized, which is a blocking call.",
        )
        .to_compile_error()
        .into();
    }

    let params = match call_params(call_method) {
        Ok(params) => params,
        Err(e) => return e.to_compile_error().into(),
    };

    let (return_ty, fallible) = match &call_method.sig.output {
        ReturnType::Default => {
            return syn::Error::new_spanned(
                &call_method.sig,
                "call() must return a value\n\n\
                 The returned value becomes the value of the node that recorded the call.",
            )
            .to_compile_error()
            .into();
        }
        ReturnType::Type(_, ty) => match result_ok_type(ty) {
            Some(ok) => (ok.clone(), true),
            None => ((**ty).clone(), false),
        },
    };

    // Arguments and result share one value type
    let value_ty = params
        .first()
        .map(|(_, ty)| ty.clone())
        .unwrap_or(return_ty);

    let count = params.len();
    let arg_idents: Vec<_> = params
        .iter()
        .map(|(ident, _)| Ident::new(&format!("__neet_arg_{}", ident), Span::mixed_site()))
        .collect();

    let has_self_receiver = call_method
        .sig
        .inputs
        .iter()
        .any(|arg| matches!(arg, FnArg::Receiver(_)));

    let call = if has_self_receiver {
        quote! { self.call(#(#arg_idents),*) }
    } else {
        quote! { Self::call(#(#arg_idents),*) }
    };

    let body = if fallible {
        quote! { #call.map_err(::std::convert::Into::into) }
    } else {
        quote! { ::std::result::Result::Ok(#call) }
    };

    let name_fn = name_override.map(|name| {
        quote! {
            fn name(&self) -> ::std::borrow::Cow<'static, str> {
                ::std::borrow::Cow::Borrowed(#name)
            }
        }
    });

    let doc_fn = doc_string(&call_method.attrs).map(|doc| {
        quote! {
            fn doc(&self) -> ::std::option::Option<::std::borrow::Cow<'static, str>> {
                ::std::option::Option::Some(::std::borrow::Cow::Borrowed(#doc))
            }
        }
    });

    quote! {
        #impl_block

        impl #impl_generics ::neet::Invocable for #self_ty #where_clause {
            type Value = #value_ty;

            fn invoke(
                &mut self,
                args: ::std::vec::Vec<Self::Value>,
            ) -> ::neet::OpResult<Self::Value> {
                let [#(#arg_idents,)*] = ::neet::__private::take_args::<Self::Value, #count>(
                    &::neet::Invocable::name(self),
                    args,
                )?;
                #body
            }

            #name_fn

            #doc_fn
        }
    }
    .into()
}

/// Parameters of `call()`, excluding the receiver.
fn call_params(method: &ImplItemFn) -> syn::Result<Vec<(Ident, Type)>> {
    method
        .sig
        .inputs
        .iter()
        .filter_map(|arg| match arg {
            FnArg::Typed(PatType { pat, ty, .. }) => Some((pat, ty)),
            FnArg::Receiver(_) => None,
        })
        .map(|(pat, ty)| {
            let ident = match &**pat {
                Pat::Ident(pat_ident) => pat_ident.ident.clone(),
                _ => {
                    return Err(syn::Error::new_spanned(
                        pat,
                        "Unsupported parameter pattern\n\n\
                         Parameters must be simple identifiers like 'x: i64'.",
                    ))
                }
            };
            if let Type::Reference(_) = &**ty {
                return Err(syn::Error::new_spanned(
                    ty,
                    "Parameters must be taken by value\n\n\
                     Argument values are moved into call(). Change this parameter from '&T' to 'T'.",
                ));
            }
            Ok((ident, (**ty).clone()))
        })
        .collect()
}

/// `T` for a return type spelled `Result<T, ..>` or `OpResult<T>`.
fn result_ok_type(ty: &Type) -> Option<&Type> {
    let Type::Path(path) = ty else {
        return None;
    };
    let segment = path.path.segments.last()?;
    if segment.ident != "Result" && segment.ident != "OpResult" {
        return None;
    }
    let PathArguments::AngleBracketed(args) = &segment.arguments else {
        return None;
    };
    args.args.iter().find_map(|arg| match arg {
        GenericArgument::Type(ty) => Some(ty),
        _ => None,
    })
}

/// Concatenated `///` documentation, one leading space stripped per line.
fn doc_string(attrs: &[Attribute]) -> Option<String> {
    let lines: Vec<String> = attrs
        .iter()
        .filter(|attr| attr.path().is_ident("doc"))
        .filter_map(|attr| match &attr.meta {
            Meta::NameValue(nv) => match &nv.value {
                Expr::Lit(ExprLit {
                    lit: Lit::Str(s), ..
                }) => Some(s.value()),
                _ => None,
            },
            _ => None,
        })
        .map(|line| line.strip_prefix(' ').unwrap_or(&line).to_string())
        .collect();

    let doc = lines.join("\n").trim().to_string();
    if doc.is_empty() {
        None
    } else {
        Some(doc)
    }
}
