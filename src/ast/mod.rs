//! AST for one parsed AIDL file.
//!
//! The grammar layer builds these nodes bottom-up and hands the finished
//! [`Document`] to the parse driver. Leaf types ([`Type`], [`Argument`]) are
//! immutable once constructed; the driver owns the [`Import`] records
//! separately from the document tree because import resolution happens in a
//! later compiler stage.

mod elements;
mod import;

pub use elements::{Argument, Direction, Document, Interface, Item, Method, Parcelable, Type};
pub use import::{Import, resolve_import};
