//! Filterable field registry.
//!
//! A [`Schema`] is built by the call site for one filterable endpoint and
//! handed to the validator as read-only data. There is no global registry
//! and no runtime discovery: every field a filter may mention is declared
//! here, together with its kind, its enum domain and whether it holds an
//! array.
//!
//! ```
//! use sieve_lang::schema::{FieldDescriptor, Schema};
//!
//! let schema = Schema::new()
//!     .with_field(FieldDescriptor::enumeration("status", ["unreleased", "airing", "finished"]))
//!     .with_field(FieldDescriptor::int("rating"))
//!     .with_field(FieldDescriptor::date("airDate").with_column("start_air"))
//!     .with_field(FieldDescriptor::resource("genres").array());
//!
//! assert_eq!(schema.names(), vec!["status", "rating", "airDate", "genres"]);
//! assert_eq!(schema.get("airDate").map(|f| f.column()), Some("start_air"));
//! ```

use std::collections::{BTreeMap, HashMap};
use std::fmt;

use serde::{Deserialize, Serialize};

/// The declared kind of a filterable field.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum FieldKind {
    Int,
    Float,
    Date,
    String,
    /// Closed set of barewords, matched case-sensitively
    Enum {
        #[serde(rename = "values")]
        allowed: Vec<String>,
    },
    /// Reference to another entity by integer ID or string slug
    Resource,
}

/// Payload-free view of a [`FieldKind`], used in error reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldType {
    Int,
    Float,
    Date,
    String,
    Enum,
    Resource,
}

impl FieldKind {
    pub fn field_type(&self) -> FieldType {
        match self {
            FieldKind::Int => FieldType::Int,
            FieldKind::Float => FieldType::Float,
            FieldKind::Date => FieldType::Date,
            FieldKind::String => FieldType::String,
            FieldKind::Enum { .. } => FieldType::Enum,
            FieldKind::Resource => FieldType::Resource,
        }
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            FieldType::Int => "int",
            FieldType::Float => "float",
            FieldType::Date => "date",
            FieldType::String => "string",
            FieldType::Enum => "enum",
            FieldType::Resource => "resource",
        })
    }
}

/// One filterable field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldDescriptor {
    pub name: String,
    pub kind: FieldKind,
    pub is_array: bool,
    column: Option<String>,
    slug_column: Option<String>,
}

impl FieldDescriptor {
    pub fn new(name: impl Into<String>, kind: FieldKind) -> Self {
        FieldDescriptor {
            name: name.into(),
            kind,
            is_array: false,
            column: None,
            slug_column: None,
        }
    }

    pub fn int(name: impl Into<String>) -> Self {
        Self::new(name, FieldKind::Int)
    }

    pub fn float(name: impl Into<String>) -> Self {
        Self::new(name, FieldKind::Float)
    }

    pub fn date(name: impl Into<String>) -> Self {
        Self::new(name, FieldKind::Date)
    }

    pub fn string(name: impl Into<String>) -> Self {
        Self::new(name, FieldKind::String)
    }

    pub fn enumeration<I, S>(name: impl Into<String>, allowed: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::new(
            name,
            FieldKind::Enum {
                allowed: allowed.into_iter().map(Into::into).collect(),
            },
        )
    }

    pub fn resource(name: impl Into<String>) -> Self {
        Self::new(name, FieldKind::Resource)
    }

    /// Mark the field as holding an array of its kind.
    pub fn array(mut self) -> Self {
        self.is_array = true;
        self
    }

    /// Store the field under a different record key / SQL column.
    pub fn with_column(mut self, column: impl Into<String>) -> Self {
        self.column = Some(column.into());
        self
    }

    /// SQL column holding slugs of a scalar resource field.
    pub fn with_slug_column(mut self, column: impl Into<String>) -> Self {
        self.slug_column = Some(column.into());
        self
    }

    /// Storage name: the record key for in-memory evaluation and the SQL column.
    pub fn column(&self) -> &str {
        self.column.as_deref().unwrap_or(&self.name)
    }

    /// Slug column of a scalar resource field, `<column>_slug` unless overridden.
    pub fn slug_column(&self) -> String {
        match &self.slug_column {
            Some(column) => column.clone(),
            None => format!("{}_slug", self.column()),
        }
    }

    pub fn field_type(&self) -> FieldType {
        self.kind.field_type()
    }

    /// Allowed values of an enum field, empty for other kinds.
    pub fn allowed(&self) -> &[String] {
        match &self.kind {
            FieldKind::Enum { allowed } => allowed,
            _ => &[],
        }
    }
}

/// Read-only map from property name to [`FieldDescriptor`].
///
/// Lookup is case-sensitive. [`Schema::names`] preserves declaration order;
/// redeclaring a name replaces the earlier descriptor in place.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Schema {
    fields: Vec<FieldDescriptor>,
    index: HashMap<String, usize>,
}

impl Schema {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_field(mut self, field: FieldDescriptor) -> Self {
        self.insert(field);
        self
    }

    fn insert(&mut self, field: FieldDescriptor) {
        match self.index.get(&field.name) {
            Some(&i) => self.fields[i] = field,
            None => {
                self.index.insert(field.name.clone(), self.fields.len());
                self.fields.push(field);
            }
        }
    }

    pub fn get(&self, name: &str) -> Option<&FieldDescriptor> {
        self.index.get(name).map(|&i| &self.fields[i])
    }

    pub fn names(&self) -> Vec<String> {
        self.iter().map(|f| f.name.clone()).collect()
    }

    /// Fields in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = &FieldDescriptor> {
        self.fields.iter()
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl FromIterator<FieldDescriptor> for Schema {
    fn from_iter<T: IntoIterator<Item = FieldDescriptor>>(iter: T) -> Self {
        let mut schema = Schema::new();
        for field in iter {
            schema.insert(field);
        }
        schema
    }
}

/// Wire form of one field in a JSON schema document.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct FieldSpec {
    #[serde(flatten)]
    kind: FieldKind,
    #[serde(default)]
    is_array: bool,
    column: Option<String>,
    slug_column: Option<String>,
}

/// Schemas deserialize from an object keyed by property name:
///
/// ```json
/// {
///   "status": { "type": "enum", "values": ["airing", "finished"] },
///   "genres": { "type": "resource", "isArray": true },
///   "airDate": { "type": "date", "column": "start_air" }
/// }
/// ```
///
/// Fields are declared in key order.
impl<'de> Deserialize<'de> for Schema {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let specs = BTreeMap::<String, FieldSpec>::deserialize(deserializer)?;
        Ok(specs
            .into_iter()
            .map(|(name, spec)| FieldDescriptor {
                name,
                kind: spec.kind,
                is_array: spec.is_array,
                column: spec.column,
                slug_column: spec.slug_column,
            })
            .collect())
    }
}
