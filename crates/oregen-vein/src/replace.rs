use oregen_blocks::{Block, NATURAL_STONES, TagResolver};
use oregen_config::ReplacementRule;
use oregen_world::{BlockPos, SetFlags, VoxelGrid};
use rand::Rng;

/// Attempts to place one ore block at `pos`. Returns whether a block was written.
///
/// With `rules`, the first rule whose target matches the current block and
/// whose replacement resolves wins; a rule with an unresolvable replacement
/// defers to the rules after it. Without rules only natural stone is
/// replaced, by a uniformly chosen candidate.
pub fn replace_block<G, T, R>(
    grid: &mut G,
    tags: &T,
    pos: BlockPos,
    rules: &[ReplacementRule],
    candidates: &[Block],
    rng: &mut R,
) -> bool
where
    G: VoxelGrid + ?Sized,
    T: TagResolver + ?Sized,
    R: Rng,
{
    let Some(current) = grid.block_at(pos) else {
        return false;
    };

    if !rules.is_empty() {
        for rule in rules {
            if !rule.target.matches(current, tags) {
                continue;
            }
            if let Some(block) = rule.replacement.resolve(tags, &mut *rng) {
                grid.set_block(pos, block, SetFlags::DEFAULT);
                return true;
            }
        }
        return false;
    }

    if candidates.is_empty() || !tags.tag_contains(NATURAL_STONES, current.id) {
        return false;
    }
    let block = candidates[rng.gen_range(0..candidates.len())];
    grid.set_block(pos, block, SetFlags::DEFAULT);
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use oregen_blocks::BlockRegistry;
    use oregen_world::{ChunkCoord, ChunkGrid};
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn registry() -> BlockRegistry {
        BlockRegistry::from_toml_str(
            r#"
            blocks = ["minecraft:stone", "minecraft:dirt", "minecraft:granite", "minecraft:copper_ore", "minecraft:tin_ore", "c:deep_tin_ore"]
            [block_tags]
            "c:natural_stones" = ["minecraft:stone", "minecraft:granite"]
            "c:tin_ores" = ["minecraft:tin_ore", "c:deep_tin_ore"]
            "c:empty" = []
            "#,
        )
        .unwrap()
    }

    fn block(reg: &BlockRegistry, id: &str) -> Block {
        reg.resolve_block(id).unwrap()
    }

    fn grid_of(reg: &BlockRegistry, id: &str) -> ChunkGrid {
        ChunkGrid::filled(ChunkCoord::new(0, 0), 0, 16, 16, block(reg, id))
    }

    #[test]
    fn natural_stone_gets_a_candidate() {
        let reg = registry();
        let mut grid = grid_of(&reg, "minecraft:stone");
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let copper = block(&reg, "minecraft:copper_ore");
        let pos = BlockPos::new(3, 3, 3);
        assert!(replace_block(&mut grid, &reg, pos, &[], &[copper], &mut rng));
        assert_eq!(grid.block_at(pos), Some(copper));
    }

    #[test]
    fn non_stone_is_left_alone_without_rules() {
        let reg = registry();
        let mut grid = grid_of(&reg, "minecraft:dirt");
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let copper = block(&reg, "minecraft:copper_ore");
        assert!(!replace_block(&mut grid, &reg, BlockPos::new(3, 3, 3), &[], &[copper], &mut rng));
        assert_eq!(grid.writes, 0);
    }

    #[test]
    fn outside_grid_is_never_replaced() {
        let reg = registry();
        let mut grid = grid_of(&reg, "minecraft:stone");
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let copper = block(&reg, "minecraft:copper_ore");
        for pos in [BlockPos::new(-1, 3, 3), BlockPos::new(3, 16, 3), BlockPos::new(3, -1, 3)] {
            assert!(!replace_block(&mut grid, &reg, pos, &[], &[copper], &mut rng));
        }
        assert_eq!(grid.writes, 0);
    }

    #[test]
    fn first_matching_rule_wins() {
        let reg = registry();
        let mut grid = grid_of(&reg, "minecraft:dirt");
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let rules = [
            ReplacementRule::new("minecraft:stone", "minecraft:copper_ore"),
            ReplacementRule::new("minecraft:dirt", "minecraft:tin_ore"),
            ReplacementRule::new("minecraft:dirt", "minecraft:copper_ore"),
        ];
        let pos = BlockPos::new(1, 1, 1);
        assert!(replace_block(&mut grid, &reg, pos, &rules, &[], &mut rng));
        assert_eq!(grid.block_at(pos), Some(block(&reg, "minecraft:tin_ore")));
    }

    #[test]
    fn earlier_tag_rule_beats_later_literal() {
        let reg = registry();
        let mut grid = grid_of(&reg, "minecraft:stone");
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let rules = [
            ReplacementRule::new("#c:natural_stones", "minecraft:granite"),
            ReplacementRule::new("minecraft:stone", "minecraft:copper_ore"),
        ];
        let pos = BlockPos::new(5, 5, 5);
        assert!(replace_block(&mut grid, &reg, pos, &rules, &[], &mut rng));
        assert_eq!(grid.block_at(pos), Some(block(&reg, "minecraft:granite")));
    }

    #[test]
    fn rules_replace_the_natural_stone_default() {
        let reg = registry();
        let mut grid = grid_of(&reg, "minecraft:stone");
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let copper = block(&reg, "minecraft:copper_ore");
        let rules = [ReplacementRule::new("minecraft:dirt", "minecraft:tin_ore")];
        assert!(!replace_block(&mut grid, &reg, BlockPos::new(1, 1, 1), &rules, &[copper], &mut rng));
    }

    #[test]
    fn tag_target_and_tag_replacement() {
        let reg = registry();
        let mut grid = grid_of(&reg, "minecraft:granite");
        let mut rng = ChaCha8Rng::seed_from_u64(9);
        let rules = [ReplacementRule::new("#c:natural_stones", "#c:tin_ores")];
        let pos = BlockPos::new(2, 2, 2);
        assert!(replace_block(&mut grid, &reg, pos, &rules, &[], &mut rng));
        let placed = grid.block_at(pos).unwrap();
        assert!(reg.tag_contains("c:tin_ores", placed.id));
    }

    #[test]
    fn unresolvable_replacement_falls_through() {
        let reg = registry();
        let mut grid = grid_of(&reg, "minecraft:stone");
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let rules = [
            ReplacementRule::new("minecraft:stone", "minecraft:nonexistent"),
            ReplacementRule::new("minecraft:stone", "#c:empty"),
            ReplacementRule::new("minecraft:stone", "minecraft:air"),
            ReplacementRule::new("minecraft:stone", "minecraft:copper_ore"),
        ];
        let pos = BlockPos::new(4, 4, 4);
        assert!(replace_block(&mut grid, &reg, pos, &rules, &[], &mut rng));
        assert_eq!(grid.block_at(pos), Some(block(&reg, "minecraft:copper_ore")));
    }

    #[test]
    fn unknown_targets_never_match() {
        let reg = registry();
        let mut grid = ChunkGrid::new(ChunkCoord::new(0, 0), 0, 4);
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let rules = [
            ReplacementRule::new("#c:missing", "minecraft:copper_ore"),
            ReplacementRule::new("minecraft:missing", "minecraft:copper_ore"),
            ReplacementRule::new("minecraft:air", "minecraft:copper_ore"),
        ];
        assert!(!replace_block(&mut grid, &reg, BlockPos::new(0, 0, 0), &rules, &[], &mut rng));
        assert_eq!(grid.writes, 0);
    }
}
