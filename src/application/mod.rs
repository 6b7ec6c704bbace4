//! Application services: content loading, page composition and the interactive surfaces.

pub mod bootstrap;
pub mod chrome;
pub mod contact;
pub mod content;
pub mod context;
pub mod error;
pub mod lightbox;
pub mod sections;
pub mod site;
pub mod stream;
