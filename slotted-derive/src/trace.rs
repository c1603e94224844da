//! Implementation of the `#[derive(Trace)]` macro.

use proc_macro::TokenStream;
use proc_macro2::TokenStream as TokenStream2;
use quote::{format_ident, quote};
use syn::{
    parse_macro_input, parse_quote, Data, DeriveInput, Field, Fields, Generics, Ident, Variant,
};

/// Main implementation of the Trace derive macro.
pub fn derive_trace_impl(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    TokenStream::from(expand(&input))
}

fn expand(input: &DeriveInput) -> TokenStream2 {
    let name = &input.ident;
    let generics = add_trace_bounds(input.generics.clone());

    let body = match &input.data {
        Data::Struct(data_struct) => generate_struct_body(&data_struct.fields),
        Data::Enum(data_enum) => {
            generate_enum_body(&data_enum.variants.iter().collect::<Vec<_>>())
        }
        Data::Union(_) => Err(syn::Error::new_spanned(
            &input.ident,
            "Trace cannot be derived for unions.",
        )),
    };

    match body {
        Ok(body) => generate_impl(name, &generics, &body),
        Err(error) => error.to_compile_error(),
    }
}

/// Adds a `Trace` bound to every type parameter.
fn add_trace_bounds(mut generics: Generics) -> Generics {
    for parameter in generics.type_params_mut() {
        parameter.bounds.push(parse_quote!(::slotted::gc::Trace));
    }
    generics
}

fn generate_impl(name: &Ident, generics: &Generics, body: &TokenStream2) -> TokenStream2 {
    let (impl_generics, type_generics, where_clause) = generics.split_for_impl();

    quote! {
        impl #impl_generics ::slotted::gc::Trace for #name #type_generics #where_clause {
            #[allow(unused_variables)]
            fn trace(&self, tracer: &mut ::slotted::gc::Tracer<'_>) {
                #body
            }
        }
    }
}

/// Returns `true` if the field carries `#[trace(skip)]`.
fn is_skipped(field: &Field) -> syn::Result<bool> {
    let mut skipped = false;
    for attribute in &field.attrs {
        if !attribute.path().is_ident("trace") {
            continue;
        }
        attribute.parse_nested_meta(|meta| {
            if meta.path.is_ident("skip") {
                skipped = true;
                Ok(())
            } else {
                Err(meta.error("unsupported trace attribute, expected `skip`"))
            }
        })?;
    }
    Ok(skipped)
}

/// Generates the trace body for a struct by visiting `self.field` paths.
fn generate_struct_body(fields: &Fields) -> syn::Result<TokenStream2> {
    let mut visits = Vec::new();
    match fields {
        Fields::Named(named_fields) => {
            for field in &named_fields.named {
                if is_skipped(field)? {
                    continue;
                }
                let field_name = &field.ident;
                visits.push(quote! {
                    ::slotted::gc::Trace::trace(&self.#field_name, tracer);
                });
            }
        }
        Fields::Unnamed(unnamed_fields) => {
            for (position, field) in unnamed_fields.unnamed.iter().enumerate() {
                if is_skipped(field)? {
                    continue;
                }
                let index = syn::Index::from(position);
                visits.push(quote! {
                    ::slotted::gc::Trace::trace(&self.#index, tracer);
                });
            }
        }
        Fields::Unit => {}
    }
    Ok(quote! { #(#visits)* })
}

/// Generates a `match self` trace body covering every variant.
fn generate_enum_body(variants: &[&Variant]) -> syn::Result<TokenStream2> {
    let arms = variants
        .iter()
        .map(|variant| generate_variant_arm(variant))
        .collect::<syn::Result<Vec<_>>>()?;

    if arms.is_empty() {
        return Ok(quote! { match *self {} });
    }

    Ok(quote! {
        match self {
            #(#arms)*
        }
    })
}

fn generate_variant_arm(variant: &Variant) -> syn::Result<TokenStream2> {
    let variant_name = &variant.ident;

    match &variant.fields {
        Fields::Unit => Ok(quote! { Self::#variant_name => {} }),

        // Tuple variant: bind positional fields as `field_0`, `field_1`, ...
        Fields::Unnamed(fields) => {
            let mut bindings = Vec::new();
            let mut visits = Vec::new();
            for (position, field) in fields.unnamed.iter().enumerate() {
                if is_skipped(field)? {
                    bindings.push(quote! { _ });
                    continue;
                }
                let binding = format_ident!("field_{}", position);
                visits.push(quote! { ::slotted::gc::Trace::trace(#binding, tracer); });
                bindings.push(quote! { #binding });
            }
            Ok(quote! {
                Self::#variant_name(#(#bindings),*) => { #(#visits)* }
            })
        }

        // Struct variant: bind by field name, skipped fields fall into `..`
        Fields::Named(fields) => {
            let mut bindings = Vec::new();
            let mut visits = Vec::new();
            for field in &fields.named {
                if is_skipped(field)? {
                    continue;
                }
                let field_name = field
                    .ident
                    .as_ref()
                    .ok_or_else(|| syn::Error::new_spanned(field, "named field without ident"))?;
                visits.push(quote! { ::slotted::gc::Trace::trace(#field_name, tracer); });
                bindings.push(quote! { #field_name });
            }
            Ok(quote! {
                Self::#variant_name { #(#bindings,)* .. } => { #(#visits)* }
            })
        }
    }
}
