//! Schema introspection and type mapping.
//!
//! Enumerates tables and columns from a SQLite database in ordinal order and
//! maps the resulting column descriptors into per-layer Go field descriptors
//! (dao-internal, data-object, entity).

mod column;
mod error;
mod introspect;
mod mapper;

pub use column::ColumnDescriptor;
pub use error::SchemaError;
pub use introspect::{SqliteIntrospector, TableFilter};
pub use mapper::{FieldDescriptor, Layer, TypeMapper};
