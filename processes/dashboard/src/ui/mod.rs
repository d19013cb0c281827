pub mod builder;
pub mod common;
pub mod field;
