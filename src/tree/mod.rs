//! The form design tree and the state that rides along with it.
//!
//! - [`component`]: component kinds, default props, detached nodes and id generation
//! - [`forest`]: the arena-backed forest and its transactional operations
//! - [`drop_target`]: turning the end of a drag gesture into a tree change
//! - [`selection`]: selected node and active tab panes
//! - [`sorting`]: drag feedback ordering for lists and grids

use thiserror::Error;

pub mod component;
pub mod drop_target;
pub mod forest;
pub mod selection;
pub mod sorting;


pub use component::{ComponentKind, IdGenerator, Node, NodeId, Props};
pub use drop_target::{DragSource, DropAction, DropTarget};
pub use forest::{FormTree, NodeRef, Parent};
pub use selection::Selection;
pub use sorting::SortingStrategy;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TreeError {
    #[error("unknown component type {0:?}")]
    InvalidComponentType(String),
    #[error("parent {0} not found")]
    ParentNotFound(NodeId),
    #[error("node id {0} is already in use")]
    DuplicateNodeId(NodeId),
    #[error("{0} cannot have children")]
    NotAContainer(NodeId),
    #[error("node id {0} is reserved for the canvas")]
    ReservedNodeId(NodeId),
}
