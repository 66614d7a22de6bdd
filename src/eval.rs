//! Reference evaluator: walks a finished tree against decoded field values

use std::collections::HashMap;

use slog::{debug, trace, Logger};

use crate::error::EvalError;
use crate::ftype::{Value, ValueKind};
use crate::registry::Registry;
use crate::syntax_tree::{FieldRef, Node, Payload, RangeNode, TestOp};

/// Supplies every occurrence of a field in the data under test
pub trait FieldSource {
    fn values(&self, field: &FieldRef) -> Vec<Value>;
}

impl FieldSource for HashMap<String, Vec<Value>> {
    fn values(&self, field: &FieldRef) -> Vec<Value> {
        self.get(&field.abbrev).cloned().unwrap_or_default()
    }
}

/// Evaluate a test tree.
///
/// Relations hold if any pair of left and right operand values satisfies
/// the comparison, so a field that occurs several times matches when one
/// occurrence does. `And` and `Or` short-circuit.
pub fn eval(
    logger: &Logger,
    registry: &Registry,
    tree: &Node,
    source: &impl FieldSource,
) -> Result<bool, EvalError> {
    let result = eval_test(logger, registry, tree, source, 0)?;
    debug!(logger, "evaluation finished"; "expr" => %tree, "result" => result);
    Ok(result)
}

fn eval_test(
    logger: &Logger,
    registry: &Registry,
    node: &Node,
    source: &impl FieldSource,
    depth: usize,
) -> Result<bool, EvalError> {
    let max_depth = registry.config().max_depth;
    if depth > max_depth {
        return Err(EvalError::TooDeep { max_depth });
    }

    let Some(Payload::Test(test)) = node.data() else {
        return Err(EvalError::NotATest {
            kind: node.type_name(),
        });
    };
    let (op, val1, val2) = test.get();

    let result = match (op, val2) {
        (TestOp::Exists, _) => !operand_values(logger, val1, source)?.is_empty(),
        (TestOp::Not, _) => !eval_test(logger, registry, val1, source, depth + 1)?,
        (TestOp::And, Some(val2)) => {
            eval_test(logger, registry, val1, source, depth + 1)?
                && eval_test(logger, registry, val2, source, depth + 1)?
        }
        (TestOp::Or, Some(val2)) => {
            eval_test(logger, registry, val1, source, depth + 1)?
                || eval_test(logger, registry, val2, source, depth + 1)?
        }
        (op, Some(val2)) => {
            let Some(relation) = op.relation() else {
                unreachable!("{op:?} is neither logical nor relational");
            };
            let left = operand_values(logger, val1, source)?;
            let right = operand_values(logger, val2, source)?;
            let mut matched = false;
            'pairs: for a in &left {
                for b in &right {
                    if registry.compare(relation, a, b)? {
                        matched = true;
                        break 'pairs;
                    }
                }
            }
            matched
        }
        (op, None) => unreachable!("{op:?} stored without its second operand"),
    };

    debug!(logger, "reduced test"; "op" => %op, "depth" => depth, "expr" => %node, "result" => result);
    Ok(result)
}

/// Values an operand contributes to a comparison
fn operand_values(
    logger: &Logger,
    node: &Node,
    source: &impl FieldSource,
) -> Result<Vec<Value>, EvalError> {
    let values = match (node.kind(), node.data()) {
        (Some(ValueKind::Integer), None) => vec![Value::Integer(node.value())],
        (_, Some(Payload::Value(v))) => vec![v.clone()],
        (_, Some(Payload::Field(field))) => source.values(field),
        (_, Some(Payload::Range(range))) => slice_field(range, source)?,
        _ => {
            return Err(EvalError::NotAValue {
                kind: node.type_name(),
            })
        }
    };
    trace!(logger, "operand values"; "operand" => %node, "count" => values.len());
    Ok(values)
}

fn slice_field(range: &RangeNode, source: &impl FieldSource) -> Result<Vec<Value>, EvalError> {
    let Some(field) = range.field() else {
        return Err(EvalError::NotAValue {
            kind: ValueKind::Range.name(),
        });
    };
    let Some(list) = range.range_list() else {
        return Err(EvalError::DetachedRange {
            field: field.abbrev.clone(),
        });
    };

    let mut out = Vec::new();
    for value in source.values(field) {
        let sliced = match &value {
            Value::Bytes(b) => list.apply(b).map(Value::Bytes),
            Value::String(s) => list
                .apply(s.as_bytes())
                .map(|b| Value::String(String::from_utf8_lossy(&b).into_owned())),
            other => {
                return Err(EvalError::NotSliceable {
                    field: field.abbrev.clone(),
                    kind: other.kind(),
                })
            }
        };
        // occurrences too short for the slice simply do not match
        out.extend(sliced);
    }
    Ok(out)
}
