//! Allow/deny filters over biome identifiers and biome tags.
use oregen_blocks::{TagResolver, canonical_id};

/// One allow/deny list element.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum BiomeEntry {
    /// `*`: every biome, including ones without an identifier.
    Any,
    Id(String),
    Tag(String),
}

impl BiomeEntry {
    pub fn parse(text: &str) -> Self {
        let text = text.trim();
        if text == "*" {
            return BiomeEntry::Any;
        }
        match text.strip_prefix('#') {
            Some(tag) => BiomeEntry::Tag(canonical_id(tag).into_owned()),
            None => BiomeEntry::Id(canonical_id(text).into_owned()),
        }
    }

    fn covers<T: TagResolver + ?Sized>(&self, biome: &str, tags: &T) -> bool {
        match self {
            BiomeEntry::Any => true,
            BiomeEntry::Id(id) => id == biome,
            BiomeEntry::Tag(tag) => tags
                .biome_tag(tag)
                .is_some_and(|members| members.iter().any(|m| m == biome)),
        }
    }
}

/// Deny takes precedence over allow; an empty or wildcard allow list admits
/// everything, unknown biomes included.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct BiomeSpec {
    pub allow: Vec<BiomeEntry>,
    pub deny: Vec<BiomeEntry>,
}

impl BiomeSpec {
    pub fn any() -> Self {
        Self::default()
    }

    pub fn allow(mut self, entry: &str) -> Self {
        self.allow.push(BiomeEntry::parse(entry));
        self
    }

    pub fn deny(mut self, entry: &str) -> Self {
        self.deny.push(BiomeEntry::parse(entry));
        self
    }

    #[inline]
    pub fn is_unrestricted(&self) -> bool {
        self.deny.is_empty() && self.allows_everything()
    }

    fn allows_everything(&self) -> bool {
        self.allow.is_empty() || self.allow.contains(&BiomeEntry::Any)
    }

    pub fn test<T: TagResolver + ?Sized>(&self, biome: Option<&str>, tags: &T) -> bool {
        let biome = biome.map(canonical_id);
        if let Some(id) = biome.as_deref() {
            // Biomes without an id pass the deny list.
            if self
                .deny
                .iter()
                .any(|e| !matches!(e, BiomeEntry::Any) && e.covers(id, tags))
            {
                return false;
            }
        }
        if self.allows_everything() {
            return true;
        }
        match biome.as_deref() {
            Some(id) => self.allow.iter().any(|e| e.covers(id, tags)),
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use oregen_blocks::BlockRegistry;

    fn tags() -> BlockRegistry {
        let mut reg = BlockRegistry::new();
        reg.define_biome_tag("c:mountains", ["mountains", "minecraft:gravelly_mountains"]);
        reg
    }

    #[test]
    fn empty_allow_admits_everything() {
        let reg = tags();
        let spec = BiomeSpec::any();
        assert!(spec.test(Some("minecraft:plains"), &reg));
        assert!(spec.test(None, &reg));
        assert!(spec.is_unrestricted());
    }

    #[test]
    fn wildcard_allow_covers_unknown_biomes() {
        let reg = tags();
        let spec = BiomeSpec::any().allow("*");
        assert!(spec.test(None, &reg));
        assert!(spec.test(Some("desert"), &reg));
    }

    #[test]
    fn explicit_allow_rejects_unknown_biomes() {
        let reg = tags();
        let spec = BiomeSpec::any().allow("#c:mountains");
        assert!(spec.test(Some("minecraft:mountains"), &reg));
        assert!(spec.test(Some("gravelly_mountains"), &reg));
        assert!(!spec.test(Some("minecraft:plains"), &reg));
        assert!(!spec.test(None, &reg));
    }

    #[test]
    fn deny_wins_over_allow() {
        let reg = tags();
        let spec = BiomeSpec::any().allow("*").deny("#c:mountains").deny("ocean");
        assert!(!spec.test(Some("mountains"), &reg));
        assert!(!spec.test(Some("minecraft:ocean"), &reg));
        assert!(spec.test(Some("plains"), &reg));
        assert!(spec.test(None, &reg));
    }

    #[test]
    fn unknown_tags_cover_nothing() {
        let reg = tags();
        let spec = BiomeSpec::any().allow("#c:missing");
        assert!(!spec.test(Some("plains"), &reg));
        let spec = BiomeSpec::any().deny("#c:missing");
        assert!(spec.test(Some("plains"), &reg));
    }
}
