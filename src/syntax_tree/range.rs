use std::fmt::{self, Display};

use crate::drange::{RangeList, RangeSpec};

use super::{FieldRef, Node};

/// Payload of a `field[...]` node
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RangeNode {
    field: Option<FieldRef>,
    drange: Option<RangeList>,
}

impl RangeNode {
    /// Attach the field named by `field_node` and the slices to take from it.
    /// The field node itself is consumed.
    pub fn set(&mut self, field_node: Node, specs: RangeList) {
        self.field = Some(field_node.into_field());
        self.drange = Some(specs);
    }

    pub fn set_one(&mut self, field_node: Node, spec: RangeSpec) {
        self.set(field_node, RangeList::from_specs([spec]));
    }

    pub fn field(&self) -> Option<&FieldRef> {
        self.field.as_ref()
    }

    pub fn range_list(&self) -> Option<&RangeList> {
        self.drange.as_ref()
    }

    /// Hand the range list to the caller; the node stays usable but no
    /// longer owns any slices.
    pub fn remove_range_list(&mut self) -> Option<RangeList> {
        self.drange.take()
    }
}

impl Display for RangeNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.field {
            Some(field) => write!(f, "{field}")?,
            None => f.write_str("<no field>")?,
        }
        match &self.drange {
            Some(list) => write!(f, "[{list}]"),
            None => f.write_str("[]"),
        }
    }
}
