pub mod kind;
pub mod value;

pub use kind::Kind;
pub use value::{Value, ValueError};

#[cfg(test)]
mod kind_test;
