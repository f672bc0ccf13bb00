//! Tool catalog: descriptors, handlers, and the builtin care workflow set.

mod builtin;
mod catalog;
mod descriptor;
mod handler;

pub use builtin::builtin_catalog;
pub use catalog::{CatalogError, ToolCatalog};
pub use descriptor::ToolDescriptor;
pub use handler::{FnHandler, HandlerError, ToolHandler, ToolParams};
