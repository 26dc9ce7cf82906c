//! Filter primitives, stacks, and the named-filter registry.

pub(crate) mod binding;
pub(crate) mod fallback;
pub(crate) mod input;
pub(crate) mod operation;
pub(crate) mod registry;
pub(crate) mod stack;
