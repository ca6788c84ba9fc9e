use oregen_blocks::canonical_id;
use oregen_world::BiomeSpec;
use toml::{Table, Value};

use crate::parse::{Lenient, join};

/// Placement density on a 0–100 scale. Carried with the settings; placement
/// does not consult it.
pub const DEFAULT_DENSITY: u8 = 85;

pub const DEFAULT_MIN_HEIGHT: i32 = 0;
pub const DEFAULT_MAX_HEIGHT: i32 = 64;

/// Per-resource vein parameters.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GenerationSettings {
    pub resource: String,
    /// Candidate block ids, first occurrence order, no duplicates.
    pub ores: Vec<String>,
    pub cluster_count: u32,
    pub cluster_size: u32,
    pub min_height: i32,
    pub max_height: i32,
    pub density: u8,
    pub biomes: BiomeSpec,
}

impl GenerationSettings {
    pub fn new(resource: impl Into<String>) -> Self {
        Self {
            resource: resource.into(),
            ores: Vec::new(),
            cluster_count: 1,
            cluster_size: 1,
            min_height: DEFAULT_MIN_HEIGHT,
            max_height: DEFAULT_MAX_HEIGHT,
            density: DEFAULT_DENSITY,
            biomes: BiomeSpec::any(),
        }
    }

    pub fn with_ores<'a>(mut self, ores: impl IntoIterator<Item = &'a str>) -> Self {
        for ore in ores {
            let id = canonical_id(ore).into_owned();
            if !self.ores.contains(&id) {
                self.ores.push(id);
            }
        }
        self
    }

    pub fn with_clusters(mut self, count: i64, size: i64) -> Self {
        self.cluster_count = clamp_count(count);
        self.cluster_size = clamp_count(size);
        self
    }

    pub fn with_heights(mut self, min_height: i32, max_height: i32) -> Self {
        self.min_height = min_height;
        self.max_height = max_height;
        self
    }

    pub fn with_biomes(mut self, biomes: BiomeSpec) -> Self {
        self.biomes = biomes;
        self
    }

    #[inline]
    pub fn effective_cluster_count(&self) -> u32 {
        self.cluster_count.max(1)
    }

    #[inline]
    pub fn effective_cluster_size(&self) -> u32 {
        self.cluster_size.max(1)
    }

    /// `(min_height, span)` with span forced to at least 1.
    #[inline]
    pub fn height_band(&self) -> (i32, i32) {
        self.height_band_within(i32::MAX)
    }

    /// Like `height_band`, with `max_height` first capped at `bound`.
    #[inline]
    pub fn height_band_within(&self, bound: i32) -> (i32, i32) {
        let span = self.max_height.min(bound).saturating_sub(self.min_height).max(1);
        (self.min_height, span)
    }

    pub(crate) fn from_table(resource: &str, table: &Table, path: &str, lenient: &mut Lenient) -> Self {
        let mut settings = GenerationSettings::new(resource);
        if let Some(items) = lenient.array(table, "ores", path) {
            let ores = lenient.strings(items, &join(path, "ores"));
            settings = settings.with_ores(ores);
        }
        if let Some(n) = lenient.integer(table, "cluster_count", path) {
            settings.cluster_count = clamp_count(n);
        }
        if let Some(n) = lenient.integer(table, "cluster_size", path) {
            settings.cluster_size = clamp_count(n);
        }
        if let Some(n) = lenient.integer(table, "min_height", path) {
            settings.min_height = clamp_i32(n);
        }
        if let Some(n) = lenient.integer(table, "max_height", path) {
            settings.max_height = clamp_i32(n);
        }
        if let Some(n) = lenient.integer(table, "density", path) {
            settings.density = n.clamp(0, 100) as u8;
        }
        if let Some(value) = table.get("biomes") {
            settings.biomes = parse_biomes(value, &join(path, "biomes"), lenient);
        }
        settings
    }
}

fn clamp_count(n: i64) -> u32 {
    n.clamp(1, i64::from(u32::MAX)) as u32
}

fn clamp_i32(n: i64) -> i32 {
    n.clamp(i64::from(i32::MIN), i64::from(i32::MAX)) as i32
}

// Accepts a single string, an array (allow list), or `{ allow = [..], deny = [..] }`.
fn parse_biomes(value: &Value, path: &str, lenient: &mut Lenient) -> BiomeSpec {
    let mut spec = BiomeSpec::any();
    match value {
        Value::String(s) => spec = spec.allow(s),
        Value::Array(items) => {
            for s in lenient.strings(items, path) {
                spec = spec.allow(s);
            }
        }
        Value::Table(t) => {
            if let Some(items) = lenient.array(t, "allow", path) {
                for s in lenient.strings(items, &join(path, "allow")) {
                    spec = spec.allow(s);
                }
            }
            if let Some(items) = lenient.array(t, "deny", path) {
                for s in lenient.strings(items, &join(path, "deny")) {
                    spec = spec.deny(s);
                }
            }
        }
        other => lenient.skip(path.to_string(), "string, array or table", other),
    }
    spec
}

#[cfg(test)]
mod tests {
    use super::*;
    use oregen_world::BiomeEntry;

    fn parse(src: &str) -> (GenerationSettings, Vec<String>) {
        let table: Table = toml::from_str(src).unwrap();
        let mut lenient = Lenient::default();
        let s = GenerationSettings::from_table("copper", &table, "generators.copper", &mut lenient);
        (s, lenient.skipped.into_iter().map(|s| s.path).collect())
    }

    #[test]
    fn counts_clamp_to_one() {
        let (s, skipped) = parse("cluster_count = 0\ncluster_size = -5");
        assert!(skipped.is_empty());
        assert_eq!(s.cluster_count, 1);
        assert_eq!(s.cluster_size, 1);
        assert_eq!(s.effective_cluster_count(), 1);
        assert_eq!(s.effective_cluster_size(), 1);
    }

    #[test]
    fn defaults_apply_when_missing() {
        let (s, _) = parse("");
        assert_eq!(s, GenerationSettings::new("copper"));
        assert_eq!(s.density, DEFAULT_DENSITY);
        assert_eq!(s.height_band(), (0, 64));
    }

    #[test]
    fn collapsed_band_spans_one() {
        let s = GenerationSettings::new("tin").with_heights(40, 40);
        assert_eq!(s.height_band(), (40, 1));
        let s = GenerationSettings::new("tin").with_heights(40, 10);
        assert_eq!(s.height_band(), (40, 1));
    }

    #[test]
    fn band_capped_by_bound() {
        let s = GenerationSettings::new("tin").with_heights(10, 200);
        assert_eq!(s.height_band_within(128), (10, 118));
        assert_eq!(s.height_band_within(500), (10, 190));
        assert_eq!(s.height_band_within(5), (10, 1));
        let s = GenerationSettings::new("tin").with_heights(i32::MIN, i32::MAX);
        assert_eq!(s.height_band_within(i32::MAX), (i32::MIN, i32::MAX));
    }

    #[test]
    fn mismatched_fields_are_recorded() {
        let (s, skipped) = parse(
            r#"
            ores = ["c:copper_ore", 4, "c:copper_ore"]
            cluster_count = "many"
            max_height = 1.5
        "#,
        );
        assert_eq!(s.ores, vec!["c:copper_ore".to_string()]);
        assert_eq!(s.cluster_count, 1);
        assert_eq!(s.max_height, 64);
        assert_eq!(
            skipped,
            vec![
                "generators.copper.ores[1]".to_string(),
                "generators.copper.cluster_count".to_string(),
                "generators.copper.max_height".to_string(),
            ]
        );
    }

    #[test]
    fn biome_filters_accept_several_shapes() {
        let (s, _) = parse(r##"biomes = ["#c:mountains", "plains"]"##);
        assert_eq!(
            s.biomes.allow,
            vec![
                BiomeEntry::Tag("c:mountains".into()),
                BiomeEntry::Id("minecraft:plains".into())
            ]
        );
        let (s, _) = parse(r#"biomes = { allow = ["*"], deny = ["ocean"] }"#);
        assert_eq!(s.biomes.allow, vec![BiomeEntry::Any]);
        assert_eq!(s.biomes.deny, vec![BiomeEntry::Id("minecraft:ocean".into())]);
        let (s, skipped) = parse("biomes = 3");
        assert!(s.biomes.is_unrestricted());
        assert_eq!(skipped, vec!["generators.copper.biomes".to_string()]);
    }
}
