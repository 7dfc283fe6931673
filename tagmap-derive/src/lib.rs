//! # csv-tagmap derive
//!
//! Implements `CsvRecord` for structs with named fields. Field attributes:
//!
//! - `#[csv("alias1,alias2;omitempty")]` maps the field to a column
//! - `#[csv("alias", codec)]` routes the field through its `CsvCodec` impl
//! - `#[csv(flatten)]` splices the fields of a nested `CsvRecord` in place
//!
//! Fields without a `csv` attribute, or tagged `"-"`, are not mapped.
//!
//! Compatible with `syn 2.0`.

use proc_macro::TokenStream;
use proc_macro2::Span;
use quote::quote;
use syn::parse::{Parse, ParseStream};
use syn::punctuated::Punctuated;
use syn::{Attribute, Data, DeriveInput, Fields, Ident, LitStr, Token, parse_macro_input};

/// Derives `csv_tagmap::CsvRecord`.
#[proc_macro_derive(CsvRecord, attributes(csv))]
pub fn derive_csv_record(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    match expand(&input) {
        Ok(tokens) => tokens.into(),
        Err(e) => e.to_compile_error().into(),
    }
}

/// One argument inside `#[csv(...)]`
enum CsvArg {
    Tag(LitStr),
    Flag(Ident),
}

impl Parse for CsvArg {
    fn parse(input: ParseStream) -> syn::Result<Self> {
        if input.peek(LitStr) {
            Ok(CsvArg::Tag(input.parse()?))
        } else {
            Ok(CsvArg::Flag(input.parse()?))
        }
    }
}

enum Mapping {
    /// Column coerced through `CsvField` or `CsvCodec`
    Value { tag: LitStr, codec: bool },
    /// Nested record flattened into the owner
    Flatten,
}

/// Reads the `csv` attributes of a field. `None` means the field is not mapped.
fn parse_attributes(attrs: &[Attribute]) -> syn::Result<Option<Mapping>> {
    let mut tag: Option<LitStr> = None;
    let mut codec = false;
    let mut flatten = false;
    let mut seen = false;

    for attr in attrs {
        if !attr.path().is_ident("csv") {
            continue;
        }
        seen = true;
        let args = attr.parse_args_with(Punctuated::<CsvArg, Token![,]>::parse_terminated)?;
        for arg in args {
            match arg {
                CsvArg::Tag(lit) => {
                    if tag.is_some() {
                        return Err(syn::Error::new(lit.span(), "duplicate csv tag"));
                    }
                    tag = Some(lit);
                }
                CsvArg::Flag(ident) if ident == "codec" => codec = true,
                CsvArg::Flag(ident) if ident == "flatten" => flatten = true,
                CsvArg::Flag(ident) => {
                    return Err(syn::Error::new(
                        ident.span(),
                        "Unknown csv attribute key. Supported: a tag string, codec, flatten",
                    ));
                }
            }
        }
    }

    if !seen {
        return Ok(None);
    }
    match (tag, flatten) {
        (Some(tag), false) if tag.value().trim() == "-" => Ok(None),
        (Some(tag), false) => Ok(Some(Mapping::Value { tag, codec })),
        (None, true) if !codec => Ok(Some(Mapping::Flatten)),
        (Some(tag), true) => Err(syn::Error::new(
            tag.span(),
            "a flattened field takes its columns from the nested record and cannot carry a tag",
        )),
        (None, true) => Err(syn::Error::new(
            Span::call_site(),
            "codec and flatten cannot be combined",
        )),
        (None, false) => Err(syn::Error::new(
            Span::call_site(),
            "expected a tag string, e.g. #[csv(\"name\")]",
        )),
    }
}

fn expand(input: &DeriveInput) -> syn::Result<proc_macro2::TokenStream> {
    let name = &input.ident;
    let fields = match &input.data {
        Data::Struct(ds) => match &ds.fields {
            Fields::Named(named) => &named.named,
            _ => {
                return Err(syn::Error::new(
                    name.span(),
                    "CsvRecord only supports structs with named fields",
                ));
            }
        },
        _ => {
            return Err(syn::Error::new(name.span(), "CsvRecord only supports structs"));
        }
    };

    let mut decls = Vec::new();
    let mut decode_arms = Vec::new();
    let mut encode_arms = Vec::new();

    for (offset, field) in fields.iter().enumerate() {
        let Some(mapping) = parse_attributes(&field.attrs)? else {
            continue;
        };
        let Some(ident) = field.ident.as_ref() else {
            continue;
        };
        let ty = &field.ty;
        let ident_str = ident.to_string();

        match mapping {
            Mapping::Value { tag, codec: false } => {
                decls.push(quote! {
                    ::csv_tagmap::FieldDecl::value(
                        #ident_str, #offset, #tag, <#ty as ::csv_tagmap::CsvField>::kind()
                    )
                });
                decode_arms.push(quote! {
                    [#offset] => ::csv_tagmap::coerce::decode_value(&mut self.#ident, text),
                });
                encode_arms.push(quote! {
                    [#offset] => ::csv_tagmap::coerce::encode_value(&self.#ident),
                });
            }
            Mapping::Value { tag, codec: true } => {
                decls.push(quote! {
                    ::csv_tagmap::FieldDecl::value(
                        #ident_str, #offset, #tag, <#ty as ::csv_tagmap::CsvCodec>::codec_kind()
                    )
                });
                decode_arms.push(quote! {
                    [#offset] => ::csv_tagmap::coerce::decode_custom(&mut self.#ident, text),
                });
                encode_arms.push(quote! {
                    [#offset] => ::csv_tagmap::coerce::encode_custom(&self.#ident),
                });
            }
            Mapping::Flatten => {
                decls.push(quote! {
                    ::csv_tagmap::FieldDecl::embedded(
                        #ident_str,
                        #offset,
                        ::std::any::type_name::<#ty>(),
                        <#ty as ::csv_tagmap::CsvRecord>::schema,
                    )
                });
                decode_arms.push(quote! {
                    [#offset, rest @ ..] => ::csv_tagmap::CsvRecord::decode_field(&mut self.#ident, rest, text),
                });
                encode_arms.push(quote! {
                    [#offset, rest @ ..] => ::csv_tagmap::CsvRecord::encode_field(&self.#ident, rest),
                });
            }
        }
    }

    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();

    Ok(quote! {
        impl #impl_generics ::csv_tagmap::CsvRecord for #name #ty_generics #where_clause {
            fn schema() -> ::std::vec::Vec<::csv_tagmap::FieldDecl> {
                ::std::vec![#(#decls),*]
            }

            #[allow(unused_variables)]
            fn decode_field(
                &mut self,
                path: &[usize],
                text: &str,
            ) -> ::std::result::Result<(), ::csv_tagmap::CellError> {
                match path {
                    #(#decode_arms)*
                    _ => ::std::result::Result::Err(::csv_tagmap::CellError::InvalidPath(path.to_vec())),
                }
            }

            fn encode_field(
                &self,
                path: &[usize],
            ) -> ::std::result::Result<::csv_tagmap::Cell, ::csv_tagmap::CellError> {
                match path {
                    #(#encode_arms)*
                    _ => ::std::result::Result::Err(::csv_tagmap::CellError::InvalidPath(path.to_vec())),
                }
            }
        }
    })
}
