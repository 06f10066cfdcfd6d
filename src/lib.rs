//! Tamarack - federated search over environmental data catalogs
//!
//! This library provides the shared models, catalog clients, and
//! area-of-interest filtering used by the query server binary.

pub mod aoi;
pub mod catalogs;
pub mod config;
pub mod dates;
pub mod models;

pub use models::{BBox, LinkType, Resource, ResourceLink, ResourceList};
