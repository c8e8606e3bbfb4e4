//! Template renderer adapters.

mod builtin;

pub use builtin::BuiltinRenderer;
