use std::fmt::{self, Display};

use crate::ftype::CmpOp;

use super::{Node, Payload};

/// Boolean operators a test node can apply
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TestOp {
    Exists,
    Not,
    And,
    Or,
    Eq,
    Ne,
    Gt,
    Ge,
    Lt,
    Le,
}

impl TestOp {
    pub fn arity(self) -> usize {
        match self {
            TestOp::Exists | TestOp::Not => 1,
            _ => 2,
        }
    }

    /// The value comparison behind a relational operator
    pub fn relation(self) -> Option<CmpOp> {
        match self {
            TestOp::Eq => Some(CmpOp::Eq),
            TestOp::Ne => Some(CmpOp::Ne),
            TestOp::Gt => Some(CmpOp::Gt),
            TestOp::Ge => Some(CmpOp::Ge),
            TestOp::Lt => Some(CmpOp::Lt),
            TestOp::Le => Some(CmpOp::Le),
            TestOp::Exists | TestOp::Not | TestOp::And | TestOp::Or => None,
        }
    }
}

impl From<CmpOp> for TestOp {
    fn from(op: CmpOp) -> Self {
        match op {
            CmpOp::Eq => TestOp::Eq,
            CmpOp::Ne => TestOp::Ne,
            CmpOp::Gt => TestOp::Gt,
            CmpOp::Ge => TestOp::Ge,
            CmpOp::Lt => TestOp::Lt,
            CmpOp::Le => TestOp::Le,
        }
    }
}

impl Display for TestOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.relation() {
            Some(op) => f.write_str(op.as_str()),
            None => f.write_str(match self {
                TestOp::Exists => "exists",
                TestOp::Not => "!",
                TestOp::And => "&&",
                _ => "||",
            }),
        }
    }
}

/// Payload of a test node: an operator over one or two owned operands.
///
/// Arity is checked on every assignment; a mismatch is a compiler bug and
/// panics rather than producing a half-built test.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TestNode {
    op: Option<TestOp>,
    val1: Option<Node>,
    val2: Option<Node>,
}

impl TestNode {
    pub fn op(&self) -> Option<TestOp> {
        self.op
    }

    pub fn set_one_operand(&mut self, op: TestOp, val1: Node) {
        assert_eq!(op.arity(), 1, "{op:?} takes two operands, got one");
        self.op = Some(op);
        self.val1 = Some(val1);
        self.val2 = None;
    }

    pub fn set_two_operands(&mut self, op: TestOp, val1: Node, val2: Node) {
        assert_eq!(op.arity(), 2, "{op:?} takes one operand, got two");
        self.op = Some(op);
        self.val1 = Some(val1);
        self.val2 = Some(val2);
    }

    /// Replace the operands, keeping the operator already assigned
    pub fn set_operands(&mut self, val1: Node, val2: Option<Node>) {
        let Some(op) = self.op else {
            panic!("operands set on a test node with no operator");
        };
        match (op.arity(), &val2) {
            (1, Some(_)) => panic!("{op:?} takes one operand, got two"),
            (2, None) => panic!("{op:?} takes two operands, got one"),
            _ => {}
        }
        self.val1 = Some(val1);
        self.val2 = val2;
    }

    /// Operator and operands; the second operand is `None` for arity-1
    /// operators.
    pub fn get(&self) -> (TestOp, &Node, Option<&Node>) {
        let (Some(op), Some(val1)) = (self.op, &self.val1) else {
            panic!("read of an unassigned test node");
        };
        (op, val1, self.val2.as_ref())
    }

    fn take_operands(&mut self, pending: &mut Vec<Node>) {
        pending.extend(self.val1.take());
        pending.extend(self.val2.take());
    }
}

// Operands are released from a work list, not by recursion, so nesting
// depth never reaches the stack.
impl Drop for TestNode {
    fn drop(&mut self) {
        let mut pending = Vec::new();
        self.take_operands(&mut pending);
        while let Some(mut node) = pending.pop() {
            if let Some(Payload::Test(test)) = node.data_mut() {
                test.take_operands(&mut pending);
            }
        }
    }
}

impl Display for TestNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (Some(op), Some(a)) = (self.op, &self.val1) else {
            return f.write_str("<empty test>");
        };
        match (op, &self.val2) {
            (TestOp::Exists, _) => write!(f, "{a}"),
            (TestOp::Not, _) => write!(f, "!{a}"),
            (TestOp::And | TestOp::Or, Some(b)) => write!(f, "({a} {op} {b})"),
            (_, Some(b)) => write!(f, "{a} {op} {b}"),
            (_, None) => write!(f, "{op} {a}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::Registry;

    #[test]
    fn test_arity() {
        assert_eq!(TestOp::Exists.arity(), 1);
        assert_eq!(TestOp::Not.arity(), 1);
        for op in [TestOp::And, TestOp::Or, TestOp::Eq, TestOp::Le] {
            assert_eq!(op.arity(), 2);
        }
        assert_eq!(TestOp::from(CmpOp::Ge).relation(), Some(CmpOp::Ge));
        assert_eq!(TestOp::And.relation(), None);
    }

    #[test]
    fn test_get_unary_has_no_second_operand() {
        let registry = Registry::new();
        let mut test = TestNode::default();
        test.set_one_operand(TestOp::Exists, Node::integer(&registry, 4));
        let (op, val1, val2) = test.get();
        assert_eq!(op, TestOp::Exists);
        assert_eq!(val1.value(), 4);
        assert!(val2.is_none());
    }

    #[test]
    fn test_set_operands_keeps_operator() {
        let registry = Registry::new();
        let mut test = TestNode::default();
        test.set_two_operands(
            TestOp::Gt,
            Node::integer(&registry, 1),
            Node::integer(&registry, 2),
        );
        test.set_operands(
            Node::integer(&registry, 7),
            Some(Node::integer(&registry, 3)),
        );
        let (op, a, b) = test.get();
        assert_eq!(op, TestOp::Gt);
        assert_eq!(a.value(), 7);
        assert_eq!(b.map(Node::value), Some(3));
    }

    #[test]
    #[should_panic(expected = "Not takes one operand, got two")]
    fn test_unary_given_two() {
        let registry = Registry::new();
        let mut test = TestNode::default();
        test.set_one_operand(TestOp::Not, Node::integer(&registry, 1));
        test.set_operands(
            Node::integer(&registry, 1),
            Some(Node::integer(&registry, 2)),
        );
    }

    #[test]
    #[should_panic(expected = "no operator")]
    fn test_operands_before_operator() {
        let registry = Registry::new();
        TestNode::default().set_operands(Node::integer(&registry, 1), None);
    }
}
