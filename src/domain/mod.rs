//! Domain primitives shared by the resolver, codec and builder.

pub mod value_objects;

pub use value_objects::*;
