//! Domain types shared across the workspace: the companion's entities,
//! their validated drafts and partial-update patches, and the per-entity
//! flows (check-in upsert, canonical reflections, lazy profile creation).

pub mod api;
pub mod flows;
pub mod models;
