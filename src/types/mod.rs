//! Core types for the impact kernel.

pub mod node;
pub mod segment;

pub use node::{NodeId, Kind, Kinds, Node};
pub use segment::{PathSegment, WalkReverse};
