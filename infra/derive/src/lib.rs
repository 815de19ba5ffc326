#![allow(unreachable_pub)]
#![allow(clippy::needless_pass_by_value)]

//! # Macros
//!
//! Procedural macros shared by every crate of the workspace.
//!
//! * [`phub_error`] turns a struct-variant enum into a `thiserror` error with
//!   `.context(..)` support and, optionally, an error class per variant.
//! * [`phub_slice`] turns a plain struct into a cheaply cloneable, `Arc`-backed
//!   slice handle.
//!
//! ## Usage
//! ```toml
//! [dependencies]
//! phub-derive.workspace = true
//! thiserror.workspace = true
//! ```

mod macros;

use proc_macro::TokenStream;
use syn::{DeriveInput, ItemStruct, parse_macro_input};

/// A high-level attribute macro for defining domain-specific error enums.
///
/// # Features
///
/// * **Automatic Derives**: Injects `#[derive(Debug, thiserror::Error)]` when missing.
/// * **Context Support**: Generates a companion `...Ext` trait that adds `.context()`
///   to any `Result` that can be converted into this error type.
/// * **Standard Conversions**: Implements `From<T>` for variants containing a `source` field,
///   enabling the use of the `?` operator for upstream errors.
/// * **Internal Fallback**: Provides `From<&str>` and `From<String>` if an `Internal`
///   variant is present.
/// * **Error Classes**: Variants tagged with `#[class(input)]`, `#[class(rule)]`,
///   `#[class(contention)]` or `#[class(internal)]` get a generated
///   `class() -> phub_domain::error::ErrorClass` accessor. `#[class(source)]` on a variant
///   wrapping another `phub_error` type delegates to the wrapped error's `class()`.
///   Untagged variants report `Internal`. The accessor is only emitted when at least
///   one variant is tagged.
///
/// # Requirements
///
/// 1. The macro must be applied to an **enum**.
/// 2. Variants that support context must include a `context: Option<Cow<'static, str>>` field.
/// 3. Variants wrapping external errors must include a `source: T` field or a field marked
///    with `#[source]`/`#[from]`, and must also carry a context field.
/// 4. Tuple or unit variants are rejected to keep error wiring explicit and reliable.
///
/// # Example
///
/// ```rust,ignore
/// use phub_derive::phub_error;
/// use std::borrow::Cow;
///
/// #[phub_error]
/// pub enum QuoteError {
///     #[class(input)]
///     #[error("Invalid package{}: {message}", format_context(.context))]
///     InvalidPackageSpec { message: Cow<'static, str>, context: Option<Cow<'static, str>> },
///
///     #[error("Internal fault{}: {message}", format_context(.context))]
///     Internal { message: Cow<'static, str>, context: Option<Cow<'static, str>> },
/// }
/// ```
#[proc_macro_attribute]
pub fn phub_error(_args: TokenStream, item: TokenStream) -> TokenStream {
    let input = parse_macro_input!(item as DeriveInput);
    macros::error::expand_derive(input).into()
}

/// Attribute macro to define a slice handle.
///
/// This macro transforms a struct into the slice pattern:
/// 1. Renames the declared struct to `<Name>Inner` and keeps its fields and generics.
/// 2. Generates `<Name>` as an `Arc<<Name>Inner>` wrapper with a `new` constructor.
/// 3. Implements `Clone` (without bounds on the generics) and `Deref` to the inner state.
///
/// # Example
/// ```rust,ignore
/// #[phub_derive::phub_slice]
/// pub struct Resolver<C: LocationCatalog> {
///     catalog: C,
/// }
///
/// let resolver = Resolver::new(ResolverInner { catalog });
/// let shared = resolver.clone(); // cheap, shares the same catalog
/// ```
#[proc_macro_attribute]
pub fn phub_slice(_attr: TokenStream, item: TokenStream) -> TokenStream {
    let input = parse_macro_input!(item as ItemStruct);
    macros::slice::expand_slice(input).into()
}
