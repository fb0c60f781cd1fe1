mod model;
mod route;

use proc_macro::TokenStream;

/// Creates a new documentation function for the route, named after the original function
/// with the suffix `_docs`. The first doc comment line becomes the operation summary,
/// the remaining lines (if any) the description.
#[proc_macro_attribute]
pub fn route(args: TokenStream, input: TokenStream) -> TokenStream {
	route::from_input(args, input)
}

/// Creates two new structs: `CreateX` and `UpdateX` for the model.
/// Fields with #[serde(skip_deserializing)] or #[serde(skip)] are left out, and all
/// other fields are included verbatim (including attributes); `UpdateX` fields
/// become optional for partial-field merges.
#[proc_macro_attribute]
pub fn model(_args: TokenStream, input: TokenStream) -> TokenStream {
	model::from_input(input)
}
