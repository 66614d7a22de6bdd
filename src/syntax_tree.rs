//! Generic syntax-tree nodes for compiled filter expressions
//!
//! A [`Node`] carries a registered [`ValueKind`] plus the payload that kind's
//! descriptor built for it. Literal integers skip the payload entirely and
//! keep their value inline. Parents own their children outright, so dropping
//! the root releases the whole tree.

pub mod range;
pub mod test;

use std::fmt::{self, Display};

use crate::drange::RangeList;
use crate::ftype::{Value, ValueKind};
use crate::registry::Registry;

pub use range::RangeNode;
pub use test::{TestNode, TestOp};

/// Name of a protocol field together with the kind of values it produces
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "json", derive(serde::Serialize))]
pub struct FieldRef {
    pub abbrev: String,
    pub kind: ValueKind,
}

impl FieldRef {
    pub fn new(abbrev: impl Into<String>, kind: ValueKind) -> Self {
        Self {
            abbrev: abbrev.into(),
            kind,
        }
    }
}

impl Display for FieldRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.abbrev)
    }
}

/// Kind-specific data owned by a node
#[derive(Debug, Clone, PartialEq)]
pub enum Payload {
    Value(Value),
    Field(FieldRef),
    Range(Box<RangeNode>),
    Test(Box<TestNode>),
}

impl Payload {
    pub fn kind(&self) -> ValueKind {
        match self {
            Payload::Value(v) => v.kind(),
            Payload::Field(_) => ValueKind::Pointer,
            Payload::Range(_) => ValueKind::Range,
            Payload::Test(_) => ValueKind::Test,
        }
    }
}

impl From<Value> for Payload {
    fn from(v: Value) -> Self {
        Payload::Value(v)
    }
}

impl From<FieldRef> for Payload {
    fn from(f: FieldRef) -> Self {
        Payload::Field(f)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    kind: Option<ValueKind>,
    data: Option<Payload>,
    value: u32,
}

impl Node {
    /// Build a node of `kind`, or an uninitialized placeholder when `kind`
    /// is `None` (which must then come without data).
    pub fn new(registry: &Registry, kind: Option<ValueKind>, raw: Option<Payload>) -> Self {
        let mut node = Self::uninitialized();
        match kind {
            Some(kind) => node.init(registry, kind, raw),
            None => assert!(raw.is_none(), "uninitialized node cannot carry data"),
        }
        node
    }

    pub fn uninitialized() -> Self {
        Self {
            kind: None,
            data: None,
            value: 0,
        }
    }

    /// Give a placeholder its kind. A node's kind is write-once.
    pub fn init(&mut self, registry: &Registry, kind: ValueKind, raw: Option<Payload>) {
        assert!(
            self.kind.is_none() && self.data.is_none(),
            "node of type {} initialized twice",
            self.type_name()
        );

        let descriptor = registry.lookup(kind);
        self.data = if descriptor.has_constructor() {
            descriptor.construct(raw)
        } else {
            if let Some(raw) = &raw {
                assert_eq!(
                    raw.kind(),
                    kind,
                    "{kind} node handed {} data",
                    raw.kind()
                );
            }
            raw
        };
        self.kind = Some(kind);
    }

    /// Literal fast path: the value lives on the node, not in a payload
    pub fn init_scalar(&mut self, registry: &Registry, kind: ValueKind, value: u32) {
        self.init(registry, kind, None);
        self.value = value;
    }

    pub fn integer(registry: &Registry, value: u32) -> Self {
        let mut node = Self::uninitialized();
        node.init_scalar(registry, ValueKind::Integer, value);
        node
    }

    /// Literal node holding a parsed value
    pub fn literal(registry: &Registry, value: Value) -> Self {
        Self::new(registry, Some(value.kind()), Some(Payload::Value(value)))
    }

    pub fn field(registry: &Registry, field: FieldRef) -> Self {
        Self::new(registry, Some(ValueKind::Pointer), Some(Payload::Field(field)))
    }

    /// `op operand` for the arity-1 operators
    pub fn test_unary(registry: &Registry, op: TestOp, operand: Node) -> Self {
        let mut node = Self::new(registry, Some(ValueKind::Test), None);
        node.as_test_mut().set_one_operand(op, operand);
        node
    }

    /// `left op right` for the arity-2 operators
    pub fn test_binary(registry: &Registry, op: TestOp, left: Node, right: Node) -> Self {
        let mut node = Self::new(registry, Some(ValueKind::Test), None);
        node.as_test_mut().set_two_operands(op, left, right);
        node
    }

    /// `field[specs]`; `field` must be a field-reference node
    pub fn range(registry: &Registry, field: Node, specs: RangeList) -> Self {
        let mut node = Self::new(registry, Some(ValueKind::Range), None);
        node.as_range_mut().set(field, specs);
        node
    }

    pub fn kind(&self) -> Option<ValueKind> {
        self.kind
    }

    pub fn type_name(&self) -> &'static str {
        self.kind.map_or("UNINITIALIZED", ValueKind::name)
    }

    pub fn type_id(&self) -> Option<usize> {
        self.kind.map(ValueKind::id)
    }

    pub fn data(&self) -> Option<&Payload> {
        self.data.as_ref()
    }

    pub fn data_mut(&mut self) -> Option<&mut Payload> {
        self.data.as_mut()
    }

    /// Inline scalar set by [`Node::init_scalar`]; zero otherwise
    pub fn value(&self) -> u32 {
        self.value
    }

    pub fn as_test(&self) -> &TestNode {
        match &self.data {
            Some(Payload::Test(test)) => test,
            _ => panic!("{} node used as a test", self.type_name()),
        }
    }

    pub fn as_test_mut(&mut self) -> &mut TestNode {
        let name = self.type_name();
        match &mut self.data {
            Some(Payload::Test(test)) => test,
            _ => panic!("{name} node used as a test"),
        }
    }

    pub fn as_range(&self) -> &RangeNode {
        match &self.data {
            Some(Payload::Range(range)) => range,
            _ => panic!("{} node used as a range", self.type_name()),
        }
    }

    pub fn as_range_mut(&mut self) -> &mut RangeNode {
        let name = self.type_name();
        match &mut self.data {
            Some(Payload::Range(range)) => range,
            _ => panic!("{name} node used as a range"),
        }
    }

    pub fn as_field(&self) -> &FieldRef {
        match &self.data {
            Some(Payload::Field(field)) => field,
            _ => panic!("{} node used as a field reference", self.type_name()),
        }
    }

    /// Consume a field-reference node, keeping only what it names
    pub fn into_field(self) -> FieldRef {
        match self.data {
            Some(Payload::Field(field)) => field,
            _ => panic!("{} node used as a field reference", self.type_name()),
        }
    }
}

impl Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (&self.kind, &self.data) {
            (None, _) => f.write_str("<uninitialized>"),
            (Some(_), None) => write!(f, "{}", self.value),
            (Some(_), Some(Payload::Value(Value::String(s)))) => write!(f, "{s:?}"),
            (Some(_), Some(Payload::Value(v))) => write!(f, "{v}"),
            (Some(_), Some(Payload::Field(field))) => write!(f, "{field}"),
            (Some(_), Some(Payload::Range(range))) => write!(f, "{range}"),
            (Some(_), Some(Payload::Test(test))) => write!(f, "{test}"),
        }
    }
}
