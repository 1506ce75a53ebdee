use thiserror::Error;

use crate::node::NodeId;

#[derive(Error, Debug)]
pub enum PulseError {
    #[error("config error: {0}")]
    Config(String),

    #[error("node not found: {0}")]
    NodeNotFound(NodeId),
}
