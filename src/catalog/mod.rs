//! Skill catalog wiring.
//!
//! This module holds the aggregate built from a corpus scan: skill records
//! keyed by slug, categories keyed by directory name, and gateway indices.
//! Types mirror what the corpus layout expresses; callers go through
//! `load_catalog` for the all-or-nothing load described in the error policy.

pub mod builder;
pub mod identity;
pub mod model;

pub use builder::{build_catalog, load_catalog};
pub use identity::{CategorySlug, DocumentKind, GatewaySlug, SkillId, slug_from_path};
pub use model::{Catalog, CatalogSummary, CategoryRecord, GatewayRecord, SkillRecord};
