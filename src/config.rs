/// Engine configuration — which tags exist and how each one is ordered.
///
/// Stored as JSON by hosts. Tags serialize as their string ids, so a config
/// reads like `{"tags": {"m.favourite": {"sort": "Manual", "list": "Natural"}}}`.
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use thiserror::Error;

use crate::algorithms::{Algorithm, AlgorithmError, ListOrdering, SortAlgorithm};
use crate::models::{BuiltinTag, Tag};

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid config JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Config rejected by engine: {0}")]
    Algorithm(#[from] AlgorithmError),
}

#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Default)]
pub struct TagConfig {
    #[serde(default)]
    pub sort: SortAlgorithm,
    #[serde(default)]
    pub list: ListOrdering,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct EngineConfig {
    pub tags: BTreeMap<Tag, TagConfig>,
}

impl Default for EngineConfig {
    /// Every built-in tag; Favourite sorted manually, the rest by recency.
    fn default() -> Self {
        let tags = BuiltinTag::ALL
            .iter()
            .map(|builtin| {
                let tag = Tag::from(*builtin);
                let sort = if tag == Tag::FAVOURITE {
                    SortAlgorithm::Manual
                } else {
                    SortAlgorithm::Recent
                };
                (
                    tag,
                    TagConfig {
                        sort,
                        list: ListOrdering::Natural,
                    },
                )
            })
            .collect();
        EngineConfig { tags }
    }
}

impl EngineConfig {
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn to_json(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn with_tag(mut self, tag: Tag, sort: SortAlgorithm, list: ListOrdering) -> Self {
        self.tags.insert(tag, TagConfig { sort, list });
        self
    }

    pub fn sort_map(&self) -> BTreeMap<Tag, SortAlgorithm> {
        self.tags
            .iter()
            .map(|(tag, cfg)| (tag.clone(), cfg.sort))
            .collect()
    }

    pub fn list_map(&self) -> BTreeMap<Tag, ListOrdering> {
        self.tags
            .iter()
            .map(|(tag, cfg)| (tag.clone(), cfg.list))
            .collect()
    }

    /// Feed this config into `populate_tags`.
    pub fn apply_to(&self, algorithm: &mut Algorithm) -> Result<(), ConfigError> {
        algorithm.populate_tags(self.sort_map(), self.list_map())?;
        Ok(())
    }
}
