//! Domain layer types and invariants.

pub mod about;
pub mod articles;
pub mod content;
pub mod gallery;
pub mod lightbox;
pub mod page;
pub mod theme;
