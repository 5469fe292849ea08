//! `#[orm(...)]` attribute parsing shared by the derives.

use heck::ToSnakeCase;
use syn::Result;

/// One `key` or `key = "value"` entry inside `#[orm(...)]`.
struct OrmArg {
    key: syn::Ident,
    value: Option<syn::LitStr>,
}

struct OrmArgList(Vec<OrmArg>);

impl syn::parse::Parse for OrmArgList {
    fn parse(input: syn::parse::ParseStream) -> Result<Self> {
        let mut args = Vec::new();

        loop {
            if input.is_empty() {
                break;
            }

            let key: syn::Ident = input.parse()?;
            if input.peek(syn::token::Paren) {
                return Err(syn::Error::new(
                    key.span(),
                    "unexpected function-style attribute",
                ));
            }

            let value = if input.peek(syn::Token![=]) {
                let _: syn::Token![=] = input.parse()?;
                Some(input.parse::<syn::LitStr>()?)
            } else {
                None
            };
            args.push(OrmArg { key, value });

            if input.is_empty() {
                break;
            }
            let _: syn::Token![,] = input.parse()?;
        }

        Ok(Self(args))
    }
}

fn orm_args(attrs: &[syn::Attribute]) -> Result<Vec<OrmArg>> {
    let mut out = Vec::new();
    for attr in attrs {
        if attr.path().is_ident("orm") {
            out.extend(attr.parse_args::<OrmArgList>()?.0);
        }
    }
    Ok(out)
}

pub(crate) struct StructAttrs {
    pub(crate) table: String,
}

/// Parse struct-level attributes; the table defaults to the snake_case type name.
pub(crate) fn struct_attrs(input: &syn::DeriveInput) -> Result<StructAttrs> {
    let mut table = None;
    for arg in orm_args(&input.attrs)? {
        match (arg.key.to_string().as_str(), arg.value) {
            ("table", Some(v)) => table = Some(v.value()),
            _ => {
                return Err(syn::Error::new(
                    arg.key.span(),
                    "unsupported struct attribute; expected `table = \"...\"`",
                ));
            }
        }
    }
    Ok(StructAttrs {
        table: table.unwrap_or_else(|| input.ident.to_string().to_snake_case()),
    })
}

pub(crate) struct FieldAttrs {
    pub(crate) column: String,
    pub(crate) skip: bool,
    pub(crate) flatten: bool,
}

pub(crate) fn field_attrs(field: &syn::Field) -> Result<FieldAttrs> {
    let ident = field
        .ident
        .as_ref()
        .ok_or_else(|| syn::Error::new_spanned(field, "expected a named field"))?;

    let mut attrs = FieldAttrs {
        column: ident.to_string(),
        skip: false,
        flatten: false,
    };
    for arg in orm_args(&field.attrs)? {
        match (arg.key.to_string().as_str(), arg.value) {
            ("column", Some(v)) => attrs.column = v.value(),
            ("skip", None) => attrs.skip = true,
            ("flatten", None) => attrs.flatten = true,
            _ => {
                return Err(syn::Error::new(
                    arg.key.span(),
                    "unsupported field attribute; expected `column = \"...\"`, `skip` or `flatten`",
                ));
            }
        }
    }
    if attrs.skip && attrs.flatten {
        return Err(syn::Error::new_spanned(
            field,
            "`skip` and `flatten` cannot be combined",
        ));
    }
    Ok(attrs)
}

/// Named fields of a struct, or an error naming the derive.
pub(crate) fn named_fields<'a>(
    input: &'a syn::DeriveInput,
    derive: &str,
) -> Result<&'a syn::punctuated::Punctuated<syn::Field, syn::Token![,]>> {
    match &input.data {
        syn::Data::Struct(data) => match &data.fields {
            syn::Fields::Named(fields) => Ok(&fields.named),
            _ => Err(syn::Error::new_spanned(
                input,
                format!("{derive} can only be derived for structs with named fields"),
            )),
        },
        _ => Err(syn::Error::new_spanned(
            input,
            format!("{derive} can only be derived for structs"),
        )),
    }
}
