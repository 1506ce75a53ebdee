use std::fmt;

use serde::{Deserialize, Serialize};

/// Identifier of a graph node, assigned sequentially at generation time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(pub u32);

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "n{}", self.0)
    }
}

/// Kind of synthetic code element a node represents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeType {
    Function,
    Variable,
    Class,
    Typedef,
    Macro,
    Api,
}

impl NodeType {
    /// Analysis complexity is a fixed property of the element kind.
    pub fn complexity(self) -> Complexity {
        match self {
            NodeType::Function | NodeType::Class => Complexity::High,
            NodeType::Typedef | NodeType::Api => Complexity::Medium,
            NodeType::Variable | NodeType::Macro => Complexity::Low,
        }
    }

    pub const ALL: [NodeType; 6] = [
        NodeType::Function,
        NodeType::Variable,
        NodeType::Class,
        NodeType::Typedef,
        NodeType::Macro,
        NodeType::Api,
    ];
}

impl fmt::Display for NodeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NodeType::Function => write!(f, "function"),
            NodeType::Variable => write!(f, "variable"),
            NodeType::Class => write!(f, "class"),
            NodeType::Typedef => write!(f, "typedef"),
            NodeType::Macro => write!(f, "macro"),
            NodeType::Api => write!(f, "api"),
        }
    }
}

/// How much simulated work a node takes to analyze fully.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Complexity {
    Low,
    Medium,
    High,
}

impl Complexity {
    /// Number of sequential analysis phases needed to reach completion.
    pub fn required_phases(self) -> u8 {
        match self {
            Complexity::Low => 1,
            Complexity::Medium => 2,
            Complexity::High => 3,
        }
    }

    /// Base wall-clock cost of one phase, in milliseconds, before the
    /// phase-index multiplier and jitter are applied.
    pub fn base_millis(self) -> u64 {
        match self {
            Complexity::Low => 400,
            Complexity::Medium => 700,
            Complexity::High => 1000,
        }
    }
}

impl fmt::Display for Complexity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Complexity::Low => write!(f, "low"),
            Complexity::Medium => write!(f, "medium"),
            Complexity::High => write!(f, "high"),
        }
    }
}

/// Lifecycle state of a node.
///
/// `Pending → Analyzing → (Partial | Completed)`; a `Partial` node returns to
/// `Analyzing` for its next phase until every phase is done. `Completed` is
/// terminal until a full reset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeStatus {
    Pending,
    Analyzing,
    Partial,
    Completed,
}

impl fmt::Display for NodeStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NodeStatus::Pending => write!(f, "pending"),
            NodeStatus::Analyzing => write!(f, "analyzing"),
            NodeStatus::Partial => write!(f, "partial"),
            NodeStatus::Completed => write!(f, "completed"),
        }
    }
}

/// Fixed 2D coordinate assigned once at generation. Layout is cosmetic.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
pub struct Position {
    pub x: f32,
    pub y: f32,
}

/// A unit of simulated analysis work.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    pub id: NodeId,
    pub name: String,
    pub node_type: NodeType,
    pub complexity: Complexity,
    /// Phases needed to reach full completion. Fixed at creation.
    pub required_phases: u8,
    /// Phases finished so far, in `0..=required_phases`.
    pub current_phase: u8,
    pub status: NodeStatus,
    /// Percent completion of the phase currently in flight, `0..=100`.
    pub progress: u8,
    /// Visibility flag controlled by filtering; never affects analysis
    /// eligibility checks on status.
    pub hidden: bool,
    pub position: Position,
}

impl Node {
    /// Create a fresh pending node. Complexity and phase count derive from
    /// the node type.
    pub fn new(id: NodeId, name: impl Into<String>, node_type: NodeType, position: Position) -> Self {
        let complexity = node_type.complexity();
        Self {
            id,
            name: name.into(),
            node_type,
            complexity,
            required_phases: complexity.required_phases(),
            current_phase: 0,
            status: NodeStatus::Pending,
            progress: 0,
            hidden: false,
            position,
        }
    }

    /// True once every required phase has been committed.
    pub fn is_fully_analyzed(&self) -> bool {
        self.current_phase >= self.required_phases
    }
}
