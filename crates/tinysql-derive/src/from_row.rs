//! FromRow derive macro implementation

use proc_macro2::TokenStream;
use quote::quote;
use syn::{DeriveInput, Result};

use crate::attrs::{field_attrs, named_fields};

pub fn expand(input: DeriveInput) -> Result<TokenStream> {
    let name = &input.ident;
    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();
    let fields = named_fields(&input, "FromRow")?;

    let mut field_extracts = Vec::with_capacity(fields.len());
    for field in fields {
        let field_name = &field.ident;
        let ty = &field.ty;
        let attrs = field_attrs(field)?;
        let column = &attrs.column;

        field_extracts.push(if attrs.skip {
            quote! { #field_name: ::core::default::Default::default() }
        } else if attrs.flatten {
            quote! { #field_name: <#ty as ::tinysql::FromRow>::from_row(row)? }
        } else {
            quote! { #field_name: row.try_get::<#ty>(#column)? }
        });
    }

    Ok(quote! {
        impl #impl_generics ::tinysql::FromRow for #name #ty_generics #where_clause {
            fn from_row(row: &::tinysql::Row) -> ::tinysql::OrmResult<Self> {
                Ok(Self {
                    #(#field_extracts),*
                })
            }
        }
    })
}
