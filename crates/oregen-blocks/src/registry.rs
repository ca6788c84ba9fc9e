use std::collections::HashMap;
use std::fs;
use std::path::Path;

use rand::{Rng, RngCore};

use super::config::RegistryConfig;
use super::types::{Block, BlockId, canonical_id};

#[derive(Debug, thiserror::Error)]
pub enum RegistryError {
    #[error("failed to read registry: {0}")]
    Read(#[source] std::io::Error),
    #[error("failed to parse registry: {0}")]
    Parse(#[source] toml::de::Error),
    #[error("block id space exhausted at {0}")]
    Full(String),
}

/// Lookup surface the vein generator needs from the host: literal block ids,
/// block tags, and biome tags.
pub trait TagResolver {
    /// Default state of a registered block. Unknown ids resolve to `None`.
    fn resolve_block(&self, id: &str) -> Option<Block>;

    /// Members of a block tag, `None` when the tag is not registered.
    fn block_tag(&self, tag: &str) -> Option<&[BlockId]>;

    /// Members of a biome tag, `None` when the tag is not registered.
    fn biome_tag(&self, tag: &str) -> Option<&[String]>;

    fn tag_contains(&self, tag: &str, block: BlockId) -> bool {
        self.block_tag(tag)
            .is_some_and(|members| members.contains(&block))
    }

    fn pick_tag_member(&self, tag: &str, rng: &mut dyn RngCore) -> Option<Block> {
        let members = self.block_tag(tag)?;
        if members.is_empty() {
            return None;
        }
        Some(Block::new(members[rng.gen_range(0..members.len())]))
    }
}

#[derive(Clone, Debug)]
pub struct BlockRegistry {
    pub names: Vec<String>,
    pub by_name: HashMap<String, BlockId>,
    block_tags: HashMap<String, Vec<BlockId>>,
    biome_tags: HashMap<String, Vec<String>>,
}

impl Default for BlockRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl BlockRegistry {
    pub fn new() -> Self {
        let air = canonical_id("air").into_owned();
        Self {
            by_name: HashMap::from([(air.clone(), Block::AIR.id)]),
            names: vec![air],
            block_tags: HashMap::new(),
            biome_tags: HashMap::new(),
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.names.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    pub fn id_by_name(&self, name: &str) -> Option<BlockId> {
        self.by_name.get(canonical_id(name).as_ref()).copied()
    }

    pub fn name_of(&self, id: BlockId) -> Option<&str> {
        self.names.get(id as usize).map(String::as_str)
    }

    /// Registers a block, returning the existing id when already present.
    pub fn register(&mut self, name: &str) -> Result<BlockId, RegistryError> {
        let name = canonical_id(name).into_owned();
        if let Some(id) = self.by_name.get(&name) {
            return Ok(*id);
        }
        let id = BlockId::try_from(self.names.len()).map_err(|_| RegistryError::Full(name.clone()))?;
        self.by_name.insert(name.clone(), id);
        self.names.push(name);
        Ok(id)
    }

    /// Defines a block tag. Members that are not registered are dropped.
    pub fn define_block_tag<'a>(&mut self, tag: &str, members: impl IntoIterator<Item = &'a str>) {
        let tag = canonical_id(tag).into_owned();
        let mut ids = Vec::new();
        for member in members {
            match self.id_by_name(member) {
                Some(id) if !ids.contains(&id) => ids.push(id),
                Some(_) => {}
                None => log::debug!("tag {} references unknown block {}", tag, member),
            }
        }
        self.block_tags.insert(tag, ids);
    }

    pub fn define_biome_tag<'a>(&mut self, tag: &str, members: impl IntoIterator<Item = &'a str>) {
        let tag = canonical_id(tag).into_owned();
        let mut biomes: Vec<String> = members
            .into_iter()
            .map(|m| canonical_id(m).into_owned())
            .collect();
        biomes.sort();
        biomes.dedup();
        self.biome_tags.insert(tag, biomes);
    }

    pub fn load_from_path(path: impl AsRef<Path>) -> Result<Self, RegistryError> {
        let s = fs::read_to_string(path).map_err(RegistryError::Read)?;
        Self::from_toml_str(&s)
    }

    pub fn from_toml_str(toml_str: &str) -> Result<Self, RegistryError> {
        let cfg: RegistryConfig = toml::from_str(toml_str).map_err(RegistryError::Parse)?;
        Self::from_config(cfg)
    }

    pub fn from_config(cfg: RegistryConfig) -> Result<Self, RegistryError> {
        let mut reg = BlockRegistry::new();
        for name in &cfg.blocks {
            reg.register(name)?;
        }
        // HashMap iteration order is nondeterministic; sort so logs are stable.
        let mut block_tags: Vec<_> = cfg.block_tags.into_iter().collect();
        block_tags.sort_by(|a, b| a.0.cmp(&b.0));
        for (tag, members) in &block_tags {
            reg.define_block_tag(tag, members.iter().map(String::as_str));
        }
        for (tag, members) in &cfg.biome_tags {
            reg.define_biome_tag(tag, members.iter().map(String::as_str));
        }
        log::debug!(
            "registry loaded: {} blocks, {} block tags, {} biome tags",
            reg.len(),
            reg.block_tags.len(),
            reg.biome_tags.len()
        );
        Ok(reg)
    }
}

impl TagResolver for BlockRegistry {
    fn resolve_block(&self, id: &str) -> Option<Block> {
        self.id_by_name(id).map(Block::new)
    }

    fn block_tag(&self, tag: &str) -> Option<&[BlockId]> {
        self.block_tags
            .get(canonical_id(tag).as_ref())
            .map(Vec::as_slice)
    }

    fn biome_tag(&self, tag: &str) -> Option<&[String]> {
        self.biome_tags
            .get(canonical_id(tag).as_ref())
            .map(Vec::as_slice)
    }
}
