#[macro_use]
extern crate tracing;

pub mod cli;
pub mod editor;
pub mod tree;

#[cfg(test)]
mod tests;
