//! Value kinds and the per-kind semantics behind them
//!
//! Every kind a filter expression can mention has a [`ValueKind`] tag and a
//! [`TypeDescriptor`] describing how values of that kind are constructed,
//! parsed from text and compared. The set of kinds is closed, so the
//! descriptor dispatches with plain `match` arms instead of a vtable; the
//! [`crate::registry::Registry`] decides which kinds are live.

mod bytes;
mod double;
mod integer;
pub(crate) mod time;

use std::cmp::Ordering;
use std::fmt::{self, Display};
use std::str::FromStr;

use crate::config::RuntimeConfig;
use crate::error::FtypeError;
use crate::syntax_tree::{Payload, RangeNode, TestNode};

pub use time::NsTime;

/// Identifies a registered value kind
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "json", derive(serde::Serialize), serde(rename_all = "snake_case"))]
pub enum ValueKind {
    Integer,
    Double,
    String,
    Bytes,
    AbsoluteTime,
    RelativeTime,
    /// Reference to a protocol field
    Pointer,
    Range,
    Test,
}

impl ValueKind {
    pub const COUNT: usize = 9;

    pub const ALL: [ValueKind; Self::COUNT] = [
        ValueKind::Integer,
        ValueKind::Double,
        ValueKind::String,
        ValueKind::Bytes,
        ValueKind::AbsoluteTime,
        ValueKind::RelativeTime,
        ValueKind::Pointer,
        ValueKind::Range,
        ValueKind::Test,
    ];

    /// Dense index of this kind, stable for the life of the process
    pub fn id(self) -> usize {
        self as usize
    }

    pub fn from_id(id: usize) -> Option<Self> {
        Self::ALL.get(id).copied()
    }

    pub fn name(self) -> &'static str {
        match self {
            ValueKind::Integer => "INTEGER",
            ValueKind::Double => "DOUBLE",
            ValueKind::String => "STRING",
            ValueKind::Bytes => "BYTES",
            ValueKind::AbsoluteTime => "ABSOLUTE_TIME",
            ValueKind::RelativeTime => "RELATIVE_TIME",
            ValueKind::Pointer => "POINTER",
            ValueKind::Range => "RANGE",
            ValueKind::Test => "TEST",
        }
    }

    pub fn pretty_name(self) -> &'static str {
        match self {
            ValueKind::Integer => "unsigned integer",
            ValueKind::Double => "floating point",
            ValueKind::String => "character string",
            ValueKind::Bytes => "byte string",
            ValueKind::AbsoluteTime => "date/time",
            ValueKind::RelativeTime => "time offset",
            ValueKind::Pointer => "field reference",
            ValueKind::Range => "field range",
            ValueKind::Test => "test",
        }
    }
}

impl Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ValueKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().replace('_', "-").as_str() {
            "integer" | "int" | "uint" | "uint32" => Ok(ValueKind::Integer),
            "double" | "float" => Ok(ValueKind::Double),
            "string" | "str" => Ok(ValueKind::String),
            "bytes" | "ether" => Ok(ValueKind::Bytes),
            "absolute-time" | "abs-time" | "abstime" => Ok(ValueKind::AbsoluteTime),
            "relative-time" | "rel-time" | "reltime" => Ok(ValueKind::RelativeTime),
            "pointer" | "field" => Ok(ValueKind::Pointer),
            "range" => Ok(ValueKind::Range),
            "test" => Ok(ValueKind::Test),
            _ => Err(format!("unknown value kind '{s}'")),
        }
    }
}

/// The six relational predicates a kind may support
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "json", derive(serde::Serialize), serde(rename_all = "snake_case"))]
pub enum CmpOp {
    Eq,
    Ne,
    Gt,
    Ge,
    Lt,
    Le,
}

impl CmpOp {
    pub const ALL: [CmpOp; 6] = [CmpOp::Eq, CmpOp::Ne, CmpOp::Gt, CmpOp::Ge, CmpOp::Lt, CmpOp::Le];

    /// Apply the predicate with `PartialOrd` semantics, so an unordered pair
    /// (a NaN operand) satisfies only `Ne`.
    pub fn relate<T: PartialOrd + ?Sized>(self, a: &T, b: &T) -> bool {
        match self {
            CmpOp::Eq => a == b,
            CmpOp::Ne => a != b,
            CmpOp::Gt => a > b,
            CmpOp::Ge => a >= b,
            CmpOp::Lt => a < b,
            CmpOp::Le => a <= b,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            CmpOp::Eq => "==",
            CmpOp::Ne => "!=",
            CmpOp::Gt => ">",
            CmpOp::Ge => ">=",
            CmpOp::Lt => "<",
            CmpOp::Le => "<=",
        }
    }
}

impl Display for CmpOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CmpOp {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "==" | "eq" => Ok(CmpOp::Eq),
            "!=" | "ne" => Ok(CmpOp::Ne),
            ">" | "gt" => Ok(CmpOp::Gt),
            ">=" | "ge" => Ok(CmpOp::Ge),
            "<" | "lt" => Ok(CmpOp::Lt),
            "<=" | "le" => Ok(CmpOp::Le),
            _ => Err(format!("unknown comparison operator '{s}'")),
        }
    }
}

/// A field value: what protocol decoders produce and literals parse into
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "json", derive(serde::Serialize), serde(rename_all = "snake_case"))]
pub enum Value {
    Integer(u32),
    Double(f64),
    String(String),
    Bytes(Vec<u8>),
    AbsoluteTime(NsTime),
    RelativeTime(NsTime),
}

impl Value {
    /// Zero value of `kind`, or `None` for kinds that only exist as tree nodes
    pub fn new(kind: ValueKind) -> Option<Self> {
        match kind {
            ValueKind::Integer => Some(Value::Integer(0)),
            ValueKind::Double => Some(Value::Double(0.0)),
            ValueKind::String => Some(Value::String(String::new())),
            ValueKind::Bytes => Some(Value::Bytes(Vec::new())),
            ValueKind::AbsoluteTime => Some(Value::AbsoluteTime(NsTime::default())),
            ValueKind::RelativeTime => Some(Value::RelativeTime(NsTime::default())),
            ValueKind::Pointer | ValueKind::Range | ValueKind::Test => None,
        }
    }

    pub fn kind(&self) -> ValueKind {
        match self {
            Value::Integer(_) => ValueKind::Integer,
            Value::Double(_) => ValueKind::Double,
            Value::String(_) => ValueKind::String,
            Value::Bytes(_) => ValueKind::Bytes,
            Value::AbsoluteTime(_) => ValueKind::AbsoluteTime,
            Value::RelativeTime(_) => ValueKind::RelativeTime,
        }
    }

    pub fn integer(&self) -> Option<u32> {
        match self {
            Value::Integer(v) => Some(*v),
            _ => None,
        }
    }

    pub fn floating(&self) -> Option<f64> {
        match self {
            Value::Double(v) => Some(*v),
            _ => None,
        }
    }

    pub fn time(&self) -> Option<NsTime> {
        match self {
            Value::AbsoluteTime(t) | Value::RelativeTime(t) => Some(*t),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            Value::Bytes(b) => Some(b),
            _ => None,
        }
    }

    pub fn set_integer(&mut self, value: u32) {
        match self {
            Value::Integer(v) => *v = value,
            other => panic!("set_integer on a {} value", other.kind()),
        }
    }

    pub fn set_floating(&mut self, value: f64) {
        match self {
            Value::Double(v) => *v = value,
            other => panic!("set_floating on a {} value", other.kind()),
        }
    }

    pub fn set_time(&mut self, value: NsTime) {
        match self {
            Value::AbsoluteTime(t) | Value::RelativeTime(t) => *t = value,
            other => panic!("set_time on a {} value", other.kind()),
        }
    }
}

impl Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Integer(v) => write!(f, "{v}"),
            Value::Double(v) => write!(f, "{v}"),
            Value::String(s) => f.write_str(s),
            Value::Bytes(b) => f.write_str(&bytes::to_text(b)),
            Value::AbsoluteTime(t) => f.write_str(&time::absolute_to_text(*t)),
            Value::RelativeTime(t) => f.write_str(&time::relative_to_text(*t)),
        }
    }
}

/// Behavior table for one value kind
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TypeDescriptor {
    kind: ValueKind,
}

impl TypeDescriptor {
    pub fn new(kind: ValueKind) -> Self {
        Self { kind }
    }

    pub fn kind(&self) -> ValueKind {
        self.kind
    }

    pub fn name(&self) -> &'static str {
        self.kind.name()
    }

    pub fn pretty_name(&self) -> &'static str {
        self.kind.pretty_name()
    }

    /// Kinds whose node payload is built by [`TypeDescriptor::construct`];
    /// every other kind stores the raw data it is handed.
    pub fn has_constructor(&self) -> bool {
        matches!(
            self.kind,
            ValueKind::String | ValueKind::Range | ValueKind::Test
        )
    }

    /// Build the node payload for a kind that has a constructor.
    ///
    /// Range and test payloads start empty and take no raw data; a string
    /// payload takes ownership of the string it is given.
    pub fn construct(&self, raw: Option<Payload>) -> Option<Payload> {
        match (self.kind, raw) {
            (ValueKind::Test, None) => Some(Payload::Test(Box::<TestNode>::default())),
            (ValueKind::Range, None) => Some(Payload::Range(Box::<RangeNode>::default())),
            (ValueKind::String, None) => Some(Payload::Value(Value::String(String::new()))),
            (ValueKind::String, Some(Payload::Value(Value::String(s)))) => {
                Some(Payload::Value(Value::String(s)))
            }
            (kind, Some(raw)) if self.has_constructor() => {
                panic!("{kind} payload cannot be constructed from {} data", raw.kind())
            }
            (kind, _) => panic!("{kind} has no constructor"),
        }
    }

    pub fn has_text_form(&self) -> bool {
        Value::new(self.kind).is_some()
    }

    /// Convert a literal token into a value of this kind.
    pub fn from_text(&self, text: &str, config: &RuntimeConfig) -> Result<Value, FtypeError> {
        match self.kind {
            ValueKind::Integer => integer::from_text(text).map(Value::Integer),
            ValueKind::Double => double::from_text(text).map(Value::Double),
            ValueKind::String => Ok(Value::String(text.to_owned())),
            ValueKind::Bytes => bytes::from_text(text).map(Value::Bytes),
            ValueKind::AbsoluteTime => {
                time::absolute_from_text(text, config.local_time).map(Value::AbsoluteTime)
            }
            ValueKind::RelativeTime => time::relative_from_text(text).map(Value::RelativeTime),
            ValueKind::Pointer | ValueKind::Range | ValueKind::Test => {
                Err(FtypeError::NoTextForm { kind: self.kind })
            }
        }
    }

    pub fn supports(&self, op: CmpOp) -> bool {
        match self.kind {
            ValueKind::Integer
            | ValueKind::Double
            | ValueKind::Bytes
            | ValueKind::AbsoluteTime
            | ValueKind::RelativeTime => true,
            ValueKind::String => matches!(op, CmpOp::Eq | CmpOp::Ne),
            ValueKind::Pointer | ValueKind::Range | ValueKind::Test => false,
        }
    }

    /// Evaluate `a op b`. Both values must be of this descriptor's kind.
    pub fn compare(&self, op: CmpOp, a: &Value, b: &Value) -> Result<bool, FtypeError> {
        if !self.supports(op) {
            return Err(FtypeError::Unsupported {
                kind: self.kind,
                op,
            });
        }
        if a.kind() != self.kind || b.kind() != self.kind {
            return Err(FtypeError::KindMismatch {
                left: a.kind(),
                right: b.kind(),
            });
        }

        let result = match (a, b) {
            (Value::Integer(x), Value::Integer(y)) => op.relate(x, y),
            (Value::Double(x), Value::Double(y)) => op.relate(x, y),
            (Value::String(x), Value::String(y)) => op.relate(x.as_str(), y.as_str()),
            (Value::Bytes(x), Value::Bytes(y)) => bytes::relate(op, x, y),
            (Value::AbsoluteTime(x), Value::AbsoluteTime(y))
            | (Value::RelativeTime(x), Value::RelativeTime(y)) => op.relate(x, y),
            _ => {
                return Err(FtypeError::KindMismatch {
                    left: a.kind(),
                    right: b.kind(),
                })
            }
        };
        Ok(result)
    }

    /// Total order for kinds whose comparisons define one
    pub fn ordering(&self, a: &Value, b: &Value) -> Result<Option<Ordering>, FtypeError> {
        if self.compare(CmpOp::Eq, a, b)? {
            Ok(Some(Ordering::Equal))
        } else if self.compare(CmpOp::Lt, a, b)? {
            Ok(Some(Ordering::Less))
        } else if self.compare(CmpOp::Gt, a, b)? {
            Ok(Some(Ordering::Greater))
        } else {
            Ok(None)
        }
    }
}
