#![recursion_limit = "128"]

#[macro_use]
extern crate derive_builder;
#[macro_use]
extern crate error_chain;
#[macro_use]
extern crate log;

#[cfg(test)]
#[macro_use]
extern crate maplit;

mod freedesktop;
pub use crate::freedesktop::*;
