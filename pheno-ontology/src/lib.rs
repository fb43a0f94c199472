//! # Pheno Ontology
//!
//! In-memory term graph engine for OBO-style ontologies (mouse anatomy,
//! mammalian phenotype and friends).
//!
//! This crate provides:
//! - An immutable term catalog with annotation roles resolved once at load
//! - Memoized ancestor and depth-bounded descendant closures, with part-of
//!   edges folded into ancestry
//! - Seed-driven slim extraction with obsolete-term substitution
//! - Top-level / intermediate stratification
//! - Occurrence trees and widget payloads for hierarchical UIs
//!
//! ## Key Types
//!
//! - [`Ontology`]: facade owning the catalog and all derived state
//! - [`OntologyConfig`]: namespace, top levels, slim seeds, annotation roles
//! - [`TermView`]: serializable per-term read model
//! - [`TreePaths`] / [`TreeWidget`]: tree output for UI navigation
//!
//! ## Example
//!
//! ```ignore
//! use pheno_ontology::{Ontology, OntologyConfig};
//!
//! let config = OntologyConfig::from_path("ma.toml")?;
//! let ontology = Ontology::load_raw(&records, &edges, config)?;
//!
//! let ancestors = ontology.ancestors("MA:0000072");
//! let tree = ontology.build_paths("MA:0002405", true);
//! let widget = tree.widget_for("MA:0000072");
//! ```
//!
//! The loader that parses ontology documents into [`TermRecord`]s and
//! [`RawEdge`]s lives outside this crate.

pub mod cache;
pub mod catalog;
pub mod closure;
pub mod config;
pub mod error;
pub mod ontology;
pub mod record;
pub mod relations;
pub mod slim;
pub mod stratify;
pub mod tree;
pub mod view;

// Re-exports for convenience
pub use cache::CacheStats;
pub use catalog::{Term, TermCatalog};
pub use closure::{ClosureEngine, ClosureStats, Depth, ObsoletePolicy, TermSet};
pub use config::{AnnotationRole, AnnotationRoles, OntologyConfig, RoleResolver};
pub use error::{Error, Result};
pub use ontology::Ontology;
pub use record::{classify_edges, Annotation, RawEdge, RelationEdge, RelationKind, TermRecord};
pub use relations::{Link, RelationBuildStats, RelationIndex};
pub use slim::Slim;
pub use stratify::Stratifier;
pub use tree::{NodeId, Occurrence, TreeNode, TreePaths, TreeWidget};
pub use view::{TermRef, TermView, TopLevelGroup};
