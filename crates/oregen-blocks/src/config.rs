use serde::Deserialize;
use std::collections::HashMap;

// Top-level registry file
#[derive(Deserialize, Debug, Default, Clone)]
pub struct RegistryConfig {
    // Block identifiers in id order; `minecraft:air` is always id 0 and may be omitted.
    #[serde(default)]
    pub blocks: Vec<String>,
    // Tag name -> member block identifiers
    #[serde(default)]
    pub block_tags: HashMap<String, Vec<String>>,
    // Tag name -> member biome identifiers
    #[serde(default)]
    pub biome_tags: HashMap<String, Vec<String>>,
}
