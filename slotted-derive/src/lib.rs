//! Derive macros for slotted's cycle collector.
//!
//! This crate provides the `#[derive(Trace)]` procedural macro, which
//! implements `slotted::gc::Trace` for element types that may own slot
//! containers. The collector uses the generated implementation to discover
//! container-to-container references while looking for unreachable cycles.
//!
//! # Example
//!
//! ```rust,ignore
//! use slotted::gc::Trace;
//! use slotted::slots::SlotContainer;
//! use slotted_derive::Trace;
//!
//! #[derive(Clone, Trace)]
//! enum Value {
//!     Integer(i64),
//!     Text(String),
//!     Slots(SlotContainer<Value>),
//! }
//!
//! // Generated:
//! // impl Trace for Value {
//! //     fn trace(&self, tracer: &mut Tracer<'_>) {
//! //         match self {
//! //             Self::Integer(field_0) => Trace::trace(field_0, tracer),
//! //             ...
//! //         }
//! //     }
//! // }
//! ```
//!
//! # Skipping fields
//!
//! Fields marked `#[trace(skip)]` are not visited. Use it for shared handles
//! (`Rc`, `Arc`) that are also reachable through another path: the collector
//! requires every owned container reference to be reported exactly once.

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]

mod trace;

use proc_macro::TokenStream;

/// Derive macro for the collector's `Trace` trait.
///
/// Every non-skipped field is traced in declaration order. Type parameters
/// receive a `Trace` bound.
///
/// # Requirements
///
/// - Every traced field type must implement `slotted::gc::Trace`
/// - Unions are rejected
///
/// # Example
///
/// ```rust,ignore
/// use slotted_derive::Trace;
///
/// #[derive(Trace)]
/// struct Node {
///     label: String,
///     children: SlotContainer<Node>,
///     #[trace(skip)]
///     shared: std::rc::Rc<Config>,
/// }
/// ```
#[proc_macro_derive(Trace, attributes(trace))]
pub fn derive_trace(input: TokenStream) -> TokenStream {
    trace::derive_trace_impl(input)
}
