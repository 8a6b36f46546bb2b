//! Declarative schema files.
//!
//! A schema file lists one entry per field of the output record. It is the
//! data-form counterpart of hand-registered [`Slot`]s and compiles into an
//! [`ArgumentDefinition<Record>`].
//!
//! # Example YAML
//!
//! ```yaml
//! version: "1.0"
//! command: greet
//! fields:
//!   - name: name
//!     kind: named_value
//!   - name: verbose
//!     kind: switch
//!     short: v
//!     type: bool
//!   - name: times
//!     kind: positional_value
//!     index: 0
//!     type: uint
//!     optional: true
//!     nullable: true
//!   - name: extra
//!     kind: remaining
//! ```
//!
//! Named fields and switches without `long` or `short` use the field name as
//! their long name. `type` defaults to `bool` for switches and `string` for
//! every other kind.

use std::collections::HashSet;
use std::io::{BufReader, BufWriter};
use std::path::{Path, PathBuf};

use argbind_core::{ArgumentDefinition, FromToken, Slot, SlotKind};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{Result, SchemaError};
use crate::record::{Record, Value};

/// Scalar type of a schema field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldType {
    Bool,
    /// Signed 64-bit integer.
    Int,
    /// Unsigned 64-bit integer.
    Uint,
    /// 64-bit float.
    Float,
    #[default]
    String,
    Char,
    Path,
}

/// One field of a schema file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldSpec {
    /// Key of the field in the output record.
    pub name: String,
    /// How the field consumes tokens.
    pub kind: SlotKind,
    /// Long name (without `--`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub long: Option<String>,
    /// Short name (without `-`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub short: Option<char>,
    /// Zero-based position of a positional field.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub index: Option<usize>,
    /// Whether a named or positional field may be omitted.
    #[serde(default)]
    pub optional: bool,
    /// Scalar type tokens convert to; see [`FieldSpec::resolved_type`].
    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    pub value_type: Option<FieldType>,
    /// Whether the converted value is nullable.
    #[serde(default)]
    pub nullable: bool,
    /// Description for help generators.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl FieldSpec {
    /// Creates a field of `kind` with default settings.
    pub fn new(name: &str, kind: SlotKind) -> Self {
        Self {
            name: name.to_string(),
            kind,
            long: None,
            short: None,
            index: None,
            optional: false,
            value_type: None,
            nullable: false,
            description: None,
        }
    }

    /// Declared type, else `bool` for switches and `string` otherwise.
    pub fn resolved_type(&self) -> FieldType {
        self.value_type.unwrap_or(match self.kind {
            SlotKind::Switch => FieldType::Bool,
            _ => FieldType::default(),
        })
    }

    fn invalid(&self, reason: &str) -> SchemaError {
        SchemaError::InvalidField {
            field: self.name.clone(),
            reason: reason.to_string(),
        }
    }

    /// Long name used for lookup: explicit, else the field name when no
    /// short name is given either.
    fn effective_long(&self) -> Option<&str> {
        match (&self.long, self.short) {
            (Some(long), _) => Some(long),
            (None, Some(_)) => None,
            (None, None) => Some(&self.name),
        }
    }

    /// Value a fresh record holds before any token is bound.
    fn initial_value(&self) -> Value {
        match self.kind {
            SlotKind::Switch => Value::Bool(false),
            SlotKind::Remaining => Value::List(Vec::new()),
            SlotKind::NamedValue | SlotKind::PositionalValue => Value::Null,
        }
    }

    fn to_slot(&self) -> Result<Slot<Record>> {
        match self.kind {
            SlotKind::Switch => {
                if self.resolved_type() != FieldType::Bool {
                    return Err(self.invalid("switch fields must have type bool"));
                }
                if self.nullable {
                    return Err(self.invalid("switch fields cannot be nullable"));
                }
                let key = self.name.clone();
                Ok(
                    Slot::switch(self.effective_long(), self.short, move |r: &mut Record, v| {
                        r.insert(&key, v)
                    })
                    .describe_opt(self.description.as_deref()),
                )
            }
            SlotKind::PositionalValue if self.index.is_none() => {
                Err(self.invalid("positional fields require an index"))
            }
            SlotKind::Remaining if self.nullable => {
                Err(self.invalid("remaining fields cannot be nullable"))
            }
            _ => match self.resolved_type() {
                FieldType::Bool => self.typed_slot::<bool>(),
                FieldType::Int => self.typed_slot::<i64>(),
                FieldType::Uint => self.typed_slot::<u64>(),
                FieldType::Float => self.typed_slot::<f64>(),
                FieldType::String => self.typed_slot::<String>(),
                FieldType::Char => self.typed_slot::<char>(),
                FieldType::Path => self.typed_slot::<PathBuf>(),
            },
        }
    }

    fn typed_slot<T>(&self) -> Result<Slot<Record>>
    where
        T: FromToken + Into<Value> + 'static,
    {
        if self.nullable {
            self.build_slot::<Option<T>>()
        } else {
            self.build_slot::<T>()
        }
    }

    fn build_slot<T>(&self) -> Result<Slot<Record>>
    where
        T: FromToken + Into<Value> + 'static,
    {
        let key = self.name.clone();
        let slot = match self.kind {
            SlotKind::NamedValue => {
                Slot::named(self.effective_long(), self.short, move |r: &mut Record, v: T| {
                    r.insert(&key, v)
                })
            }
            SlotKind::PositionalValue => {
                let index = self
                    .index
                    .ok_or_else(|| self.invalid("positional fields require an index"))?;
                Slot::positional(index, move |r: &mut Record, v: T| r.insert(&key, v))
            }
            SlotKind::Remaining => {
                Slot::remaining(move |r: &mut Record, v: Vec<T>| r.insert(&key, v))
            }
            SlotKind::Switch => return Err(self.invalid("switch fields must have type bool")),
        };
        let slot = if self.optional { slot.optional() } else { slot };
        Ok(slot.describe_opt(self.description.as_deref()))
    }
}

trait DescribeOpt {
    fn describe_opt(self, text: Option<&str>) -> Self;
}

impl DescribeOpt for Slot<Record> {
    fn describe_opt(self, text: Option<&str>) -> Self {
        match text {
            Some(text) => self.describe(text),
            None => self,
        }
    }
}

/// A declarative argument schema for one command.
///
/// # Examples
///
/// ```
/// use argbind_schema::SchemaFile;
///
/// let schema = SchemaFile::from_yaml_str(r#"
/// version: "1.0"
/// fields:
///   - { name: name, kind: named_value }
///   - { name: verbose, kind: switch, short: v, type: bool }
/// "#).unwrap();
///
/// let definition = schema.compile().unwrap();
/// let record = definition.parse(&["--name", "Ann", "-v"]).unwrap();
/// assert_eq!(record.get("name").and_then(|v| v.as_str()), Some("Ann"));
/// assert_eq!(record.get("verbose").and_then(|v| v.as_bool()), Some(true));
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SchemaFile {
    /// Schema format version (e.g. `"1.0"`).
    pub version: String,
    /// Command the schema describes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub command: Option<String>,
    /// Short description of the command.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Fields in declaration order.
    #[serde(default)]
    pub fields: Vec<FieldSpec>,
}

enum Format {
    Json,
    Yaml,
}

fn format_of(path: &Path) -> Result<Format> {
    match path.extension().and_then(|ext| ext.to_str()) {
        Some("json") => Ok(Format::Json),
        Some("yml" | "yaml") => Ok(Format::Yaml),
        _ => Err(SchemaError::UnsupportedFormat(path.display().to_string())),
    }
}

impl SchemaFile {
    /// Creates an empty schema with the given format version.
    pub fn new(version: &str) -> Self {
        Self {
            version: version.to_string(),
            command: None,
            description: None,
            fields: Vec::new(),
        }
    }

    /// Adds a field.
    pub fn with_field(mut self, field: FieldSpec) -> Self {
        self.fields.push(field);
        self
    }

    /// Loads a schema, choosing JSON or YAML by file extension.
    ///
    /// # Errors
    ///
    /// Returns [`UnsupportedFormat`](SchemaError::UnsupportedFormat) for
    /// other extensions, [`IoError`](SchemaError::IoError) if the file cannot
    /// be read, or a JSON/YAML error if parsing fails.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let format = format_of(path)?;
        let reader = BufReader::new(std::fs::File::open(path)?);
        let schema: Self = match format {
            Format::Json => serde_json::from_reader(reader)?,
            Format::Yaml => serde_yaml::from_reader(reader)?,
        };
        debug!(path = %path.display(), fields = schema.fields.len(), "loaded schema file");
        Ok(schema)
    }

    /// Saves the schema, choosing JSON or YAML by file extension.
    ///
    /// # Errors
    ///
    /// Returns [`UnsupportedFormat`](SchemaError::UnsupportedFormat) for
    /// other extensions, [`IoError`](SchemaError::IoError) if the file cannot
    /// be written, or a JSON/YAML error if serialization fails.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let format = format_of(path)?;
        let writer = BufWriter::new(std::fs::File::create(path)?);
        match format {
            Format::Json => serde_json::to_writer_pretty(writer, self)?,
            Format::Yaml => serde_yaml::to_writer(writer, self)?,
        }
        Ok(())
    }

    pub fn from_yaml_str(text: &str) -> Result<Self> {
        Ok(serde_yaml::from_str(text)?)
    }

    pub fn from_json_str(text: &str) -> Result<Self> {
        Ok(serde_json::from_str(text)?)
    }

    /// Compiles the fields into an argument definition over [`Record`].
    ///
    /// # Errors
    ///
    /// Returns [`InvalidField`](SchemaError::InvalidField) for a field that
    /// is inconsistent on its own or repeats an earlier field's name, and
    /// [`Definition`](SchemaError::Definition) when the fields together
    /// break a definition invariant (duplicate names or positions, gaps,
    /// several remaining fields).
    pub fn compile(&self) -> Result<ArgumentDefinition<Record>> {
        let mut seen = HashSet::new();
        let mut template = Record::new();
        let mut slots = Vec::with_capacity(self.fields.len());

        for field in &self.fields {
            if field.name.trim().is_empty() {
                return Err(field.invalid("field name cannot be empty"));
            }
            if !seen.insert(field.name.as_str()) {
                return Err(field.invalid("duplicate field name"));
            }
            template.insert(&field.name, field.initial_value());
            slots.push(field.to_slot()?);
        }

        let definition = ArgumentDefinition::builder_with(move || template.clone())
            .slots(slots)
            .build()?;
        debug!(
            command = self.command.as_deref().unwrap_or("<unnamed>"),
            slots = definition.len(),
            "compiled schema"
        );
        Ok(definition)
    }
}
