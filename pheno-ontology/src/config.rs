//! Ontology build configuration.
//!
//! Everything the core needs to know about a particular ontology is supplied
//! here at catalog-build time: namespace prefixes, top-level ids, slim seeds,
//! the annotation-role table and the relation property lists. Nothing is read
//! from the environment.
//!
//! Config files are TOML, or JSON when the extension is `.json`:
//!
//! ```toml
//! namespace_prefixes = ["MA:"]
//! top_level_ids = ["MA:0000004", "MA:0000010"]
//! slim_seed_ids = ["MA:0000017"]
//!
//! [annotation_roles]
//! label = ["http://www.w3.org/2000/01/rdf-schema#label"]
//! ```

use crate::error::{Error, Result};
use hashbrown::{HashMap, HashSet};
use pheno_vocab::defaults;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use std::path::{Path, PathBuf};

// ============================================================================
// Annotation roles
// ============================================================================

/// The role an annotation property plays for a term
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnnotationRole {
    Label,
    Definition,
    Synonym,
    Obsolete,
    ReplacedBy,
    Consider,
    AltId,
}

/// Mapping from annotation role to the property ids that carry it.
///
/// Missing roles fall back to the `pheno_vocab::defaults` lists. `definition`
/// is ordered: earlier properties win.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnnotationRoles {
    pub label: Vec<String>,
    pub definition: Vec<String>,
    pub synonym: Vec<String>,
    pub obsolete: Vec<String>,
    pub replaced_by: Vec<String>,
    pub consider: Vec<String>,
    pub alt_id: Vec<String>,
}

fn owned(list: &[&str]) -> Vec<String> {
    list.iter().map(|s| s.to_string()).collect()
}

impl Default for AnnotationRoles {
    fn default() -> Self {
        Self {
            label: owned(defaults::LABEL),
            definition: owned(defaults::DEFINITION),
            synonym: owned(defaults::SYNONYM),
            obsolete: owned(defaults::OBSOLETE),
            replaced_by: owned(defaults::REPLACED_BY),
            consider: owned(defaults::CONSIDER),
            alt_id: owned(defaults::ALT_ID),
        }
    }
}

impl AnnotationRoles {
    /// Properties configured for `role`
    pub fn properties(&self, role: AnnotationRole) -> &[String] {
        match role {
            AnnotationRole::Label => &self.label,
            AnnotationRole::Definition => &self.definition,
            AnnotationRole::Synonym => &self.synonym,
            AnnotationRole::Obsolete => &self.obsolete,
            AnnotationRole::ReplacedBy => &self.replaced_by,
            AnnotationRole::Consider => &self.consider,
            AnnotationRole::AltId => &self.alt_id,
        }
    }

    /// Resolve the table into a property lookup (done once per load)
    pub fn resolver(&self) -> RoleResolver {
        RoleResolver::new(self)
    }
}

const ALL_ROLES: [AnnotationRole; 7] = [
    AnnotationRole::Label,
    AnnotationRole::Definition,
    AnnotationRole::Synonym,
    AnnotationRole::Obsolete,
    AnnotationRole::ReplacedBy,
    AnnotationRole::Consider,
    AnnotationRole::AltId,
];

/// Property id → (role, priority) lookup built from [`AnnotationRoles`].
///
/// A property may serve several roles (some ontologies reuse one property
/// for label and exact synonym). Priority is the index in the role's list.
#[derive(Debug, Clone, Default)]
pub struct RoleResolver {
    by_property: HashMap<String, SmallVec<[(AnnotationRole, usize); 1]>>,
}

impl RoleResolver {
    pub fn new(roles: &AnnotationRoles) -> Self {
        let mut by_property: HashMap<String, SmallVec<[(AnnotationRole, usize); 1]>> =
            HashMap::new();
        for role in ALL_ROLES {
            for (priority, property) in roles.properties(role).iter().enumerate() {
                by_property
                    .entry(property.clone())
                    .or_default()
                    .push((role, priority));
            }
        }
        Self { by_property }
    }

    /// Roles (with priority) carried by `property`; empty if unconfigured
    pub fn roles_of(&self, property: &str) -> &[(AnnotationRole, usize)] {
        self.by_property
            .get(property)
            .map(|sv| sv.as_slice())
            .unwrap_or(&[])
    }
}

// ============================================================================
// Top-level config
// ============================================================================

/// Configuration for one ontology catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OntologyConfig {
    /// Ontology source location. Handed to the loader; the core never opens it.
    pub source: Option<PathBuf>,
    /// Working namespace prefixes (e.g. `MA:`). Empty means every term.
    pub namespace_prefixes: Vec<String>,
    /// Ordered top-level term ids for stratification.
    pub top_level_ids: Vec<String>,
    /// Slim seed ids. When set, the slim is built eagerly at load.
    pub slim_seed_ids: Option<Vec<String>>,
    /// Annotation role table.
    pub annotation_roles: AnnotationRoles,
    /// Relation properties read as is-a edges.
    pub is_a_properties: Vec<String>,
    /// Relation properties read as part-of edges (all interchangeable).
    pub part_of_properties: Vec<String>,
    /// Fold part-of edges into ancestor/descendant closures.
    pub include_part_of: bool,
}

impl Default for OntologyConfig {
    fn default() -> Self {
        Self {
            source: None,
            namespace_prefixes: Vec::new(),
            top_level_ids: Vec::new(),
            slim_seed_ids: None,
            annotation_roles: AnnotationRoles::default(),
            is_a_properties: owned(defaults::IS_A),
            part_of_properties: owned(defaults::PART_OF),
            include_part_of: true,
        }
    }
}

impl OntologyConfig {
    /// Config restricted to the given namespace prefixes, defaults elsewhere
    pub fn for_prefixes<I, S>(prefixes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            namespace_prefixes: prefixes.into_iter().map(Into::into).collect(),
            ..Self::default()
        }
    }

    /// Builder-style setter for top-level ids
    pub fn with_top_levels<I, S>(mut self, ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.top_level_ids = ids.into_iter().map(Into::into).collect();
        self
    }

    /// Builder-style setter for slim seeds
    pub fn with_slim_seeds<I, S>(mut self, ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.slim_seed_ids = Some(ids.into_iter().map(Into::into).collect());
        self
    }

    /// Load a config file. TOML unless the extension is `.json`.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| Error::config(path, e))?;

        if content.trim().is_empty() {
            return Ok(Self::default());
        }

        let is_json = path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));

        let config: Self = if is_json {
            serde_json::from_str(&content).map_err(|e| Error::config(path, e))?
        } else {
            toml::from_str(&content).map_err(|e| Error::config(path, e))?
        };

        config.validate()?;
        tracing::debug!(
            path = %path.display(),
            prefixes = ?config.namespace_prefixes,
            top_levels = config.top_level_ids.len(),
            "loaded ontology config"
        );
        Ok(config)
    }

    /// Reject configs the engine cannot work with.
    pub fn validate(&self) -> Result<()> {
        if self.annotation_roles.label.is_empty() {
            return Err(Error::invalid_config(
                "annotation_roles.label must name at least one property",
            ));
        }
        if self.is_a_properties.is_empty() {
            return Err(Error::invalid_config(
                "is_a_properties must name at least one property",
            ));
        }
        let mut seen = HashSet::new();
        for id in &self.top_level_ids {
            if !seen.insert(id.as_str()) {
                return Err(Error::invalid_config(format!(
                    "top-level id {id} listed more than once"
                )));
            }
        }
        Ok(())
    }

    /// True if `id` (normalized) is inside the working namespace
    pub fn in_namespace(&self, id: &str) -> bool {
        pheno_vocab::in_namespace(id, &self.namespace_prefixes)
    }
}
