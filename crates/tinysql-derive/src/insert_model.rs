//! InsertModel derive macro implementation

use proc_macro2::TokenStream;
use quote::quote;
use syn::{DeriveInput, Result};

use crate::attrs::{field_attrs, named_fields, struct_attrs};

pub fn expand(input: DeriveInput) -> Result<TokenStream> {
    let name = &input.ident;
    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();
    let fields = named_fields(&input, "InsertModel")?;
    let table = struct_attrs(&input)?.table;

    let mut pushes = Vec::with_capacity(fields.len());
    for field in fields {
        let field_name = &field.ident;
        let attrs = field_attrs(field)?;
        if attrs.skip {
            continue;
        }
        let column = &attrs.column;

        pushes.push(if attrs.flatten {
            quote! {
                columns.extend(::tinysql::InsertModel::columns(&self.#field_name));
            }
        } else {
            quote! {
                columns.push((#column, ::tinysql::ToValue::to_value(&self.#field_name)));
            }
        });
    }
    let capacity = pushes.len();

    Ok(quote! {
        impl #impl_generics ::tinysql::InsertModel for #name #ty_generics #where_clause {
            fn table_name() -> &'static str {
                #table
            }

            fn columns(&self) -> ::std::vec::Vec<(&'static str, ::tinysql::Value)> {
                #[allow(unused_mut)]
                let mut columns = ::std::vec::Vec::with_capacity(#capacity);
                #(#pushes)*
                columns
            }
        }
    })
}
