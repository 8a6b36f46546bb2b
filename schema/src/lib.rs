//! Declarative argument schemas for `argbind`.
//!
//! This crate describes the fields of an output record in YAML or JSON and
//! compiles that description into an
//! [`ArgumentDefinition<Record>`](argbind_core::ArgumentDefinition), so a
//! command's arguments can be bound without writing a Rust container type.
//!
//! - [`SchemaFile`]: a versioned list of [`FieldSpec`]s, loadable from and
//!   savable to `.json`, `.yml` and `.yaml` files.
//! - [`Record`] / [`Value`]: the dynamic container every compiled schema
//!   binds into.
//!
//! # Quick start
//!
//! ```no_run
//! use argbind_schema::SchemaFile;
//!
//! let schema = SchemaFile::load("greet.yml").unwrap();
//! let definition = schema.compile().unwrap();
//! let record = definition.parse(&["--name", "Ann"]).unwrap();
//! println!("{}", serde_json::to_string_pretty(&record).unwrap());
//! ```

mod error;
mod file;
mod record;

pub use error::{Result, SchemaError};
pub use file::{FieldSpec, FieldType, SchemaFile};
pub use record::{Record, Value};
