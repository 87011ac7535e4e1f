pub mod evaluation;
pub mod instance;
pub mod interval;
pub mod operators;
pub mod sequence;
pub mod tree;

pub use crate::evaluation::EvaluationError;
pub use crate::instance::{NodeValue, TscInstance, TscInstanceEdge, TscInstanceNode};
pub use crate::interval::Interval;
pub use crate::sequence::{Entity, EntityId, Tick, TickSequence, TickUnit};
pub use crate::tree::{Bounds, Tsc, TscEdge, TscNode};
