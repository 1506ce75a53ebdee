use std::fmt;

use serde::{Deserialize, Serialize};

use crate::node::NodeId;

/// Relation kind between two code elements. Each kind carries a fixed
/// display color category; edges have no lifecycle of their own.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EdgeKind {
    /// function → function
    Calls,
    /// function → variable
    Reads,
    /// class → function
    Contains,
    /// class → typedef
    UsesType,
    /// function → macro
    Expands,
    /// function → api
    Invokes,
}

impl EdgeKind {
    /// Display color category for the renderer.
    pub fn color(self) -> &'static str {
        match self {
            EdgeKind::Calls => "#5470c6",
            EdgeKind::Reads => "#91cc75",
            EdgeKind::Contains => "#fac858",
            EdgeKind::UsesType => "#ee6666",
            EdgeKind::Expands => "#73c0de",
            EdgeKind::Invokes => "#fc8452",
        }
    }
}

impl fmt::Display for EdgeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EdgeKind::Calls => write!(f, "calls"),
            EdgeKind::Reads => write!(f, "reads"),
            EdgeKind::Contains => write!(f, "contains"),
            EdgeKind::UsesType => write!(f, "uses-type"),
            EdgeKind::Expands => write!(f, "expands"),
            EdgeKind::Invokes => write!(f, "invokes"),
        }
    }
}

/// A directed relation between two nodes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Edge {
    pub source: NodeId,
    pub target: NodeId,
    pub kind: EdgeKind,
    /// Mirror of endpoint visibility, maintained by the store's filter pass.
    pub hidden: bool,
}

impl Edge {
    pub fn new(source: NodeId, target: NodeId, kind: EdgeKind) -> Self {
        Self {
            source,
            target,
            kind,
            hidden: false,
        }
    }

    /// Whether this edge references the given node as source or target.
    pub fn touches(&self, id: NodeId) -> bool {
        self.source == id || self.target == id
    }
}
