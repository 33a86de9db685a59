pub mod expand;

pub use expand::{VariableContext, VariableExpander};
