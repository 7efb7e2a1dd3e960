//! The abstract schema model the generator consumes. See `spec.md` §3.1.

/// A namespace plus an ordered list of record declarations.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct File {
    pub records: Vec<Record>,
}

/// A named aggregate with an ordered list of [`Field`]s. Only records
/// generate code.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
    pub name: String,
    pub fields: Vec<Field>,
}

/// `{ declared_name, wire_key, shape }`, per `spec.md` §3.1.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Field {
    /// The programmatic identifier.
    pub declared_name: String,
    /// The JSON key. Defaults to `declared_name`; `@key("ignore")` is
    /// represented separately via [`Field::ignored`], not as a literal
    /// wire key named `"ignore"`.
    pub wire_key: String,
    pub shape: Shape,
    /// Set by `@key("ignore")`: the field is parsed but suppressed from
    /// both encode and decode.
    pub ignored: bool,
}

/// The primitive scalar kinds a [`Shape::Primitive`] may name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Primitive {
    String,
    Int32,
    Int64,
    Uint32,
    Uint64,
    Float32,
    Float64,
    Bool,
}

impl Primitive {
    pub fn from_keyword(kw: &str) -> Option<Self> {
        Some(match kw {
            "string" => Self::String,
            "int32" => Self::Int32,
            "int64" => Self::Int64,
            "uint32" => Self::Uint32,
            "uint64" => Self::Uint64,
            "float32" => Self::Float32,
            "float64" => Self::Float64,
            "bool" => Self::Bool,
            _ => return None,
        })
    }
}

/// A field's shape: a scalar primitive, a reference to another record in the
/// same file, an array of some element shape, or an unsupported shape that
/// the generator silently omits per `spec.md` §3.1's invariant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Shape {
    Primitive(Primitive),
    /// References another record declared in the same file, by name.
    Nested(String),
    Array(Box<Shape>),
    /// Accepted by the parser but not generatable; the field is omitted
    /// from generated code, not rejected as a parse error.
    Unsupported,
}
