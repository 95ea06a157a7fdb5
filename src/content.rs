//! Static portfolio content.
//!
//! Everything on the page that does not come from the GitHub API: headline,
//! about text, skills, social links and the fallbacks shown when the
//! identity could not be fetched. Loaded from an optional TOML file.

use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::debug;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PortfolioContent {
    /// Shown when the identity has no display name or could not be fetched.
    #[serde(default = "default_name")]
    pub fallback_name: String,

    #[serde(default = "default_bio")]
    pub fallback_bio: String,

    #[serde(default)]
    pub fallback_email: Option<String>,

    #[serde(default)]
    pub fallback_profile_url: Option<String>,

    #[serde(default = "default_headline")]
    pub headline: String,

    #[serde(default)]
    pub about: Vec<String>,

    /// Technology badges under the about text.
    #[serde(default)]
    pub technologies: Vec<String>,

    #[serde(default)]
    pub proficiencies: Vec<Proficiency>,

    #[serde(default = "default_skill_categories")]
    pub skill_categories: Vec<SkillCategory>,

    #[serde(default)]
    pub social_links: Vec<SocialLink>,

    /// Link target for the "Download Resume" button. No button when unset.
    #[serde(default)]
    pub resume_url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Proficiency {
    pub skill: String,
    pub percentage: u8,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkillCategory {
    pub title: String,
    #[serde(default)]
    pub skills: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SocialLink {
    pub label: String,
    pub url: String,
}

impl Default for PortfolioContent {
    fn default() -> Self {
        Self {
            fallback_name: default_name(),
            fallback_bio: default_bio(),
            fallback_email: None,
            fallback_profile_url: None,
            headline: default_headline(),
            about: Vec::new(),
            technologies: Vec::new(),
            proficiencies: Vec::new(),
            skill_categories: default_skill_categories(),
            social_links: Vec::new(),
            resume_url: None,
        }
    }
}

fn default_name() -> String {
    "Developer Portfolio".to_string()
}

fn default_bio() -> String {
    "Building software in the open. Projects below are pulled live from GitHub.".to_string()
}

fn default_headline() -> String {
    "Full Stack Developer".to_string()
}

fn default_skill_categories() -> Vec<SkillCategory> {
    vec![
        SkillCategory {
            title: "Frontend".to_string(),
            skills: vec!["TypeScript".to_string(), "React".to_string()],
        },
        SkillCategory {
            title: "Backend".to_string(),
            skills: vec!["Rust".to_string(), "Node.js".to_string()],
        },
        SkillCategory {
            title: "Tools".to_string(),
            skills: vec!["Git".to_string(), "Docker".to_string()],
        },
    ]
}

impl PortfolioContent {
    /// Parse content from TOML. Missing keys take their defaults.
    pub fn from_toml(text: &str) -> Result<Self> {
        let mut content: PortfolioContent = toml::from_str(text)?;
        for proficiency in &mut content.proficiencies {
            proficiency.percentage = proficiency.percentage.min(100);
        }
        Ok(content)
    }

    pub fn load(path: &Path) -> Result<Self> {
        debug!(path = %path.display(), "Loading portfolio content");
        let text = std::fs::read_to_string(path)?;
        Self::from_toml(&text)
    }
}
