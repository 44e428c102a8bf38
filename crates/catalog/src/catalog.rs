//! The catalog container, id lookups and cross-reference validation.

use crate::{capsule::Capsule, error::CatalogError, planet::Planet, project::Project};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

const BUILTIN: &str = include_str!("../assets/catalog.ron");

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Catalog {
    pub planets: Vec<Planet>,
    pub projects: Vec<Project>,
    pub capsules: Vec<Capsule>,
}

impl Catalog {
    /// The catalog shipped with the binary.
    pub fn builtin() -> Result<Self, CatalogError> {
        Self::from_ron_str(BUILTIN)
    }

    /// Parse and validate a catalog from RON text.
    pub fn from_ron_str(source: &str) -> Result<Self, CatalogError> {
        let catalog: Catalog = ron::from_str(source)?;
        catalog.validate()?;
        log::debug!(
            "Catalog loaded: {} planets, {} projects, {} capsules",
            catalog.planets.len(),
            catalog.projects.len(),
            catalog.capsules.len()
        );
        Ok(catalog)
    }

    /// Reject duplicate ids and references to records that do not exist.
    pub fn validate(&self) -> Result<(), CatalogError> {
        unique_ids("planet", self.planets.iter().map(|p| p.id.as_str()))?;
        unique_ids("project", self.projects.iter().map(|p| p.id.as_str()))?;
        unique_ids("capsule", self.capsules.iter().map(|c| c.id.as_str()))?;

        for planet in &self.planets {
            if let Some(pid) = &planet.project_id {
                self.require_project(format!("planet {:?}", planet.id), pid)?;
            }
        }
        for capsule in &self.capsules {
            let owner = format!("capsule {:?}", capsule.id);
            if self.find_planet(&capsule.target_planet_id).is_none() {
                return Err(CatalogError::DanglingReference {
                    owner,
                    kind: "planet",
                    id: capsule.target_planet_id.clone(),
                });
            }
            if let Some(pid) = &capsule.project_id {
                self.require_project(owner, pid)?;
            }
        }
        Ok(())
    }

    fn require_project(&self, owner: String, id: &str) -> Result<(), CatalogError> {
        match self.find_project(id) {
            Some(_) => Ok(()),
            None => Err(CatalogError::DanglingReference {
                owner,
                kind: "project",
                id: id.to_string(),
            }),
        }
    }

    pub fn find_planet(&self, id: &str) -> Option<&Planet> {
        self.planets.iter().find(|p| p.id == id)
    }

    pub fn find_project(&self, id: &str) -> Option<&Project> {
        self.projects.iter().find(|p| p.id == id)
    }

    pub fn find_capsule(&self, id: &str) -> Option<&Capsule> {
        self.capsules.iter().find(|c| c.id == id)
    }

    /// Project showcased on `planet`, if it has one.
    pub fn project_for_planet(&self, planet: &Planet) -> Option<&Project> {
        planet.project_id.as_deref().and_then(|id| self.find_project(id))
    }
}

fn unique_ids<'a>(kind: &'static str, ids: impl Iterator<Item = &'a str>) -> Result<(), CatalogError> {
    let mut seen = HashSet::new();
    for id in ids {
        if !seen.insert(id) {
            return Err(CatalogError::DuplicateId { kind, id: id.to_string() });
        }
    }
    Ok(())
}
