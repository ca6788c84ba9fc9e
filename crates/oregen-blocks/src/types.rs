use std::borrow::Cow;

use serde::{Deserialize, Serialize};

// Compact voxel representation used at runtime
#[derive(Copy, Clone, PartialEq, Eq, Hash, Default, Debug, Serialize, Deserialize)]
pub struct Block {
    pub id: BlockId,
    pub state: BlockState,
}

pub type BlockId = u16;
pub type BlockState = u16;

impl Block {
    pub const AIR: Block = Block { id: 0, state: 0 };

    /// Default state of the given block id.
    #[inline]
    pub const fn new(id: BlockId) -> Self {
        Self { id, state: 0 }
    }

    #[inline]
    pub fn is_air(self) -> bool {
        self.id == Self::AIR.id
    }
}

pub const DEFAULT_NAMESPACE: &str = "minecraft";

/// Identifiers without a namespace live in `minecraft:`.
pub fn canonical_id(id: &str) -> Cow<'_, str> {
    let id = id.trim();
    if id.contains(':') {
        Cow::Borrowed(id)
    } else {
        Cow::Owned(format!("{DEFAULT_NAMESPACE}:{id}"))
    }
}
