//! Literal-or-tag block references used by replacement rules.
use std::fmt;

use rand::RngCore;

use crate::registry::TagResolver;
use crate::types::{Block, canonical_id};

/// Either a single block id or a named block tag (`#`-prefixed in config text).
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum BlockSelector {
    Literal(String),
    Tag(String),
}

impl BlockSelector {
    pub fn parse(text: &str) -> Self {
        let text = text.trim();
        match text.strip_prefix('#') {
            Some(tag) => BlockSelector::Tag(canonical_id(tag).into_owned()),
            None => BlockSelector::Literal(canonical_id(text).into_owned()),
        }
    }

    /// Whether `block` satisfies this selector. Unknown ids, unknown tags and
    /// air never match.
    pub fn matches<T: TagResolver + ?Sized>(&self, block: Block, tags: &T) -> bool {
        match self {
            BlockSelector::Literal(id) => match tags.resolve_block(id) {
                Some(b) if !b.is_air() => b.id == block.id,
                _ => false,
            },
            BlockSelector::Tag(tag) => tags.tag_contains(tag, block.id),
        }
    }

    /// Concrete block to place for this selector; a tag yields a random member.
    pub fn resolve<T: TagResolver + ?Sized>(
        &self,
        tags: &T,
        rng: &mut dyn RngCore,
    ) -> Option<Block> {
        let block = match self {
            BlockSelector::Literal(id) => tags.resolve_block(id),
            BlockSelector::Tag(tag) => tags.pick_tag_member(tag, rng),
        }?;
        (!block.is_air()).then_some(block)
    }
}

impl fmt::Display for BlockSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BlockSelector::Literal(id) => f.write_str(id),
            BlockSelector::Tag(tag) => write!(f, "#{tag}"),
        }
    }
}
