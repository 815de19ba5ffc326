use proc_macro2::TokenStream;
use quote::{format_ident, quote};
use syn::ItemStruct;

pub fn expand_slice(input: ItemStruct) -> TokenStream {
    let wrapper_ident = &input.ident;
    let vis = &input.vis;
    let fields = &input.fields;
    let attrs = &input.attrs;
    let generics = &input.generics;
    let (impl_generics, ty_generics, where_clause) = generics.split_for_impl();

    let inner_ident = format_ident!("{wrapper_ident}Inner");
    let inner_doc = format!("Shared state behind [`{wrapper_ident}`].");
    let semi = if matches!(fields, syn::Fields::Named(_)) { quote!() } else { quote!(;) };

    quote! {
        #(#attrs)*
        #[doc = #inner_doc]
        #[derive(Debug)]
        #vis struct #inner_ident #generics #where_clause #fields #semi

        #[derive(Debug)]
        #vis struct #wrapper_ident #generics #where_clause {
            inner: std::sync::Arc<#inner_ident #ty_generics>,
        }

        impl #impl_generics #wrapper_ident #ty_generics #where_clause {
            pub fn new(inner: #inner_ident #ty_generics) -> Self {
                Self {
                    inner: std::sync::Arc::new(inner),
                }
            }
        }

        impl #impl_generics Clone for #wrapper_ident #ty_generics #where_clause {
            fn clone(&self) -> Self {
                Self { inner: std::sync::Arc::clone(&self.inner) }
            }
        }

        impl #impl_generics std::ops::Deref for #wrapper_ident #ty_generics #where_clause {
            type Target = #inner_ident #ty_generics;
            fn deref(&self) -> &Self::Target {
                &self.inner
            }
        }
    }
}
