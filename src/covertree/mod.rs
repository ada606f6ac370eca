//! An insertion-built cover tree for nearest neighbor search in general
//! metric spaces.

#![warn(missing_docs)]

mod build;
mod index;

pub use index::CoverTree;
