use proc_macro::TokenStream;
use quote::quote;
use syn::{
    Expr, ExprLit, Fields, ItemStruct, Lit, LitStr, Meta, Token, parse_macro_input,
    punctuated::Punctuated,
};

const GENERATED_FIELDS: [&str; 3] = ["id", "created_at", "updated_at"];

/// Prepends a store-generated `i32` primary key and the `created_at` /
/// `updated_at` columns to a sea-orm model, and implements the DAO helper
/// traits in `crate::db::dao::base_traits` for the generated `Entity` and
/// `ActiveModel`.
///
/// ```ignore
/// #[base_entity(label = "Menu item")]
/// #[sea_orm::model]
/// #[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
/// #[sea_orm(table_name = "menu_items")]
/// pub struct Model {
///     pub name: String,
/// }
/// ```
///
/// `label` is the human-readable name used in not-found messages.
#[proc_macro_attribute]
pub fn base_entity(attr: TokenStream, item: TokenStream) -> TokenStream {
    let args = parse_macro_input!(attr with Punctuated<Meta, Token![,]>::parse_terminated);
    let label = match parse_label(args) {
        Ok(label) => label,
        Err(err) => return err.to_compile_error().into(),
    };

    let mut input = parse_macro_input!(item as ItemStruct);
    let Fields::Named(fields) = &mut input.fields else {
        return syn::Error::new_spanned(input, "base_entity requires a struct with named fields")
            .to_compile_error()
            .into();
    };

    if let Some(clash) = fields.named.iter().find_map(|field| {
        field
            .ident
            .as_ref()
            .filter(|ident| GENERATED_FIELDS.contains(&ident.to_string().as_str()))
    }) {
        return syn::Error::new_spanned(
            clash,
            format!("base_entity generates `{clash}`; remove it from the struct"),
        )
        .to_compile_error()
        .into();
    }

    let declared = std::mem::take(&mut fields.named);
    fields.named.push(syn::parse_quote! {
        #[sea_orm(primary_key)]
        pub id: i32
    });
    fields.named.push(syn::parse_quote! {
        #[sea_orm(default_expr = "Expr::current_timestamp()")]
        pub created_at: sea_orm::entity::prelude::DateTimeWithTimeZone
    });
    fields.named.push(syn::parse_quote! {
        #[sea_orm(default_expr = "Expr::current_timestamp()")]
        pub updated_at: sea_orm::entity::prelude::DateTimeWithTimeZone
    });
    fields.named.extend(declared);

    let expanded = quote! {
        #input

        impl crate::db::dao::base_traits::BaseEntity for Entity {
            const LABEL: &'static str = #label;

            fn id_column() -> Column {
                Column::Id
            }
        }

        impl crate::db::dao::base_traits::TimestampedActiveModel for ActiveModel {
            fn set_created_at(&mut self, ts: sea_orm::entity::prelude::DateTimeWithTimeZone) {
                self.created_at = sea_orm::ActiveValue::Set(ts);
            }

            fn set_updated_at(&mut self, ts: sea_orm::entity::prelude::DateTimeWithTimeZone) {
                self.updated_at = sea_orm::ActiveValue::Set(ts);
            }
        }
    };

    expanded.into()
}

fn parse_label(args: Punctuated<Meta, Token![,]>) -> Result<LitStr, syn::Error> {
    let mut label = None;

    for meta in args {
        let Meta::NameValue(name_value) = meta else {
            return Err(syn::Error::new_spanned(
                meta,
                "expected name-value pair, e.g. label = \"Menu item\"",
            ));
        };
        if !name_value.path.is_ident("label") {
            return Err(syn::Error::new_spanned(
                name_value.path,
                "unknown base_entity attribute key; only `label` is supported",
            ));
        }
        let Expr::Lit(ExprLit {
            lit: Lit::Str(value),
            ..
        }) = name_value.value
        else {
            return Err(syn::Error::new_spanned(
                name_value.value,
                "expected string literal for label",
            ));
        };
        if value.value().trim().is_empty() {
            return Err(syn::Error::new(value.span(), "label must not be empty"));
        }
        label = Some(value);
    }

    label.ok_or_else(|| {
        syn::Error::new(
            proc_macro2::Span::call_site(),
            "base_entity requires a label, e.g. #[base_entity(label = \"Menu item\")]",
        )
    })
}
