//! Declarative field specifications
//!
//! A [`Schema`] is an ordered list of [`FieldSpec`]s, each describing one
//! input field: where it comes from, what type it has, whether it is
//! required, its default, and the constraints attached to it. Schemas are
//! plain data interpreted uniformly by the validation engine.

use regex::Regex;
use serde_json::Value;

/// Where a field's raw value is extracted from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Source {
    Path,
    Query,
    Header,
    Cookie,
    Form,
    Body,
}

impl Source {
    pub fn as_str(&self) -> &'static str {
        match self {
            Source::Path => "path",
            Source::Query => "query",
            Source::Header => "header",
            Source::Cookie => "cookie",
            Source::Form => "form",
            Source::Body => "body",
        }
    }
}

/// The semantic type a raw value is converted to
///
/// `List` carries the spec of its elements; `Object` carries a nested schema
/// whose fields must all use [`Source::Body`] (nested members are validated
/// out of the object's own keys).
#[derive(Debug, Clone)]
pub enum FieldType {
    Integer,
    Float,
    String,
    Boolean,
    /// Member string table, matched case-sensitively
    Enum(Vec<&'static str>),
    List(Box<FieldSpec>),
    Object(Schema),
}

/// A single validation rule attached to a field
///
/// Constraints are applied in a fixed order regardless of declaration order:
/// min length, max length, gt, ge, lt, le, pattern. Constraints that do not
/// apply to the value's shape (e.g. a length bound on a number) pass through.
#[derive(Debug, Clone)]
pub enum Constraint {
    MinLength(usize),
    MaxLength(usize),
    /// Exclusive lower bound
    Gt(f64),
    /// Inclusive lower bound
    Ge(f64),
    /// Exclusive upper bound
    Lt(f64),
    /// Inclusive upper bound
    Le(f64),
    Pattern(Regex),
}

impl Constraint {
    /// Stable identifier used in error reporting
    pub fn kind(&self) -> &'static str {
        match self {
            Constraint::MinLength(_) => "min_length",
            Constraint::MaxLength(_) => "max_length",
            Constraint::Gt(_) => "gt",
            Constraint::Ge(_) => "ge",
            Constraint::Lt(_) => "lt",
            Constraint::Le(_) => "le",
            Constraint::Pattern(_) => "pattern",
        }
    }

    /// Fixed application order
    pub(crate) fn order(&self) -> u8 {
        match self {
            Constraint::MinLength(_) => 0,
            Constraint::MaxLength(_) => 1,
            Constraint::Gt(_) => 2,
            Constraint::Ge(_) => 3,
            Constraint::Lt(_) => 4,
            Constraint::Le(_) => 5,
            Constraint::Pattern(_) => 6,
        }
    }
}

/// Declarative description of one input field
///
/// Built fluently:
///
/// ```rust,ignore
/// FieldSpec::new("q", Source::Query, FieldType::String)
///     .optional()
///     .min_length(3)
///     .max_length(50)
///     .pattern("^fixedquery$")
/// ```
#[derive(Debug, Clone)]
pub struct FieldSpec {
    pub name: String,
    pub source: Source,
    pub field_type: FieldType,
    pub required: bool,
    pub default: Option<Value>,
    pub constraints: Vec<Constraint>,
}

impl FieldSpec {
    /// Create a new required field with no default and no constraints
    pub fn new(name: impl Into<String>, source: Source, field_type: FieldType) -> Self {
        Self {
            name: name.into(),
            source,
            field_type,
            required: true,
            default: None,
            constraints: Vec::new(),
        }
    }

    /// Mark the field optional; absent values are simply omitted
    pub fn optional(mut self) -> Self {
        self.required = false;
        self
    }

    /// Give the field a default, which also makes it optional
    pub fn default_value(mut self, value: Value) -> Self {
        self.required = false;
        self.default = Some(value);
        self
    }

    pub fn min_length(mut self, min: usize) -> Self {
        self.constraints.push(Constraint::MinLength(min));
        self
    }

    pub fn max_length(mut self, max: usize) -> Self {
        self.constraints.push(Constraint::MaxLength(max));
        self
    }

    /// Exclusive lower bound (value must be strictly greater)
    pub fn gt(mut self, bound: f64) -> Self {
        self.constraints.push(Constraint::Gt(bound));
        self
    }

    /// Inclusive lower bound
    pub fn ge(mut self, bound: f64) -> Self {
        self.constraints.push(Constraint::Ge(bound));
        self
    }

    /// Exclusive upper bound (value must be strictly less)
    pub fn lt(mut self, bound: f64) -> Self {
        self.constraints.push(Constraint::Lt(bound));
        self
    }

    /// Inclusive upper bound
    pub fn le(mut self, bound: f64) -> Self {
        self.constraints.push(Constraint::Le(bound));
        self
    }

    /// Regex the full value must match
    ///
    /// Patterns are programmer-supplied literals; an invalid pattern is a
    /// bug in the schema declaration and panics at construction.
    pub fn pattern(mut self, pattern: &str) -> Self {
        let regex = Regex::new(pattern).unwrap_or_else(|e| {
            panic!("invalid pattern for field '{}': {}", self.name, e);
        });
        self.constraints.push(Constraint::Pattern(regex));
        self
    }

    /// Constraints in their fixed application order
    pub(crate) fn ordered_constraints(&self) -> Vec<&Constraint> {
        let mut constraints: Vec<&Constraint> = self.constraints.iter().collect();
        constraints.sort_by_key(|c| c.order());
        constraints
    }
}

/// A named, ordered group of field specifications
#[derive(Debug, Clone)]
pub struct Schema {
    pub name: String,
    pub fields: Vec<FieldSpec>,
}

impl Schema {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            fields: Vec::new(),
        }
    }

    /// Append a field specification
    pub fn field(mut self, spec: FieldSpec) -> Self {
        self.fields.push(spec);
        self
    }

    /// Append all fields of another schema (used to compose path/query
    /// specs with a shared body schema)
    pub fn extend(mut self, other: &Schema) -> Self {
        self.fields.extend(other.fields.iter().cloned());
        self
    }

    /// Look up a field spec by name
    pub fn find(&self, name: &str) -> Option<&FieldSpec> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Whether a (name, source) pair is declared by this schema
    pub fn declares(&self, name: &str, source: Source) -> bool {
        self.fields
            .iter()
            .any(|f| f.name == name && f.source == source)
    }
}
