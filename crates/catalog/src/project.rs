//! Portfolio projects shown in the detail overlay.

use crate::locale::Localized;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum LinkIcon {
    Npm,
    Blog,
    Docs,
    Video,
    #[default]
    External,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectLink {
    pub label: Localized,
    pub url: String,
    #[serde(default)]
    pub icon: LinkIcon,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Project {
    pub id: String,
    pub title: Localized,
    /// One-line summary.
    pub description: Localized,
    pub long_description: Localized,
    /// Free-form period, e.g. "2025.10 - 2025.11".
    pub period: String,
    #[serde(default)]
    pub team_size: Option<String>,
    pub technologies: Vec<String>,
    #[serde(default)]
    pub demo_url: Option<String>,
    #[serde(default)]
    pub github_url: Option<String>,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub links: Vec<ProjectLink>,
    #[serde(default)]
    pub featured: bool,
}

impl Project {
    /// Every outbound link: demo, source, then the extra links.
    pub fn all_links(&self) -> Vec<ProjectLink> {
        let mut out = Vec::new();
        if let Some(url) = &self.demo_url {
            out.push(ProjectLink {
                label: Localized::new("데모", "Demo"),
                url: url.clone(),
                icon: LinkIcon::External,
            });
        }
        if let Some(url) = &self.github_url {
            out.push(ProjectLink {
                label: Localized::new("소스 코드", "Source"),
                url: url.clone(),
                icon: LinkIcon::External,
            });
        }
        out.extend(self.links.iter().cloned());
        out
    }
}
