//! Core data models for catalog search results.

pub mod bbox;
pub mod resource;

pub use bbox::BBox;
pub use resource::{LinkType, Resource, ResourceLink, ResourceList};
