//! Text views of generated chunks.

use tessera_terrain::{CHUNK_SIZE, Chunk, ClimateOverlay, SharedWorld, TileRegistry};

/// Chunk symbols, optionally with the climate overlay as ANSI 24-bit
/// background colors.
pub fn render_chunk(world: &SharedWorld, chunk: &Chunk, overlay: ClimateOverlay) -> String {
    if !overlay.is_active() {
        return chunk.render_symbols(world.tiles());
    }
    let (ox, oy) = chunk.origin();
    let mut out = String::new();
    for (lx, ly, id) in chunk.iter() {
        let climate = world.climate_at(ox + lx as i64, oy + ly as i64);
        let symbol = &world.tiles().get(id).symbol;
        match overlay.color(&climate) {
            Some(c) => {
                out.push_str(&format!("\x1b[48;2;{};{};{}m{symbol}", c.0, c.1, c.2));
            }
            None => out.push_str(symbol),
        }
        if lx == CHUNK_SIZE - 1 {
            out.push_str("\x1b[0m\n");
        }
    }
    out
}

/// One line per tile: symbol, name, color and tags.
pub fn legend(tiles: &TileRegistry) -> String {
    let mut out = String::new();
    for (_, tile) in tiles.iter() {
        let tags: Vec<&str> = tile.tags().iter().map(String::as_str).collect();
        out.push_str(&format!(
            "{}  {:<20} rgb({}, {}, {})  [{}]\n",
            tile.symbol,
            tile.name,
            tile.color.0,
            tile.color.1,
            tile.color.2,
            tags.join(", ")
        ));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use tessera_terrain::{ChunkCoord, Ruleset, World, WorldParams};

    fn shared() -> SharedWorld {
        World::from_ruleset(WorldParams::default(), &Ruleset::reference())
            .unwrap()
            .into_shared()
    }

    #[test]
    fn test_plain_view_matches_symbols() {
        let world = shared();
        let chunk = world.new_chunk(ChunkCoord::new(0, 0)).unwrap();
        let text = render_chunk(&world, &chunk, ClimateOverlay::default());
        assert_eq!(text, chunk.render_symbols(world.tiles()));
        assert!(!text.contains('\x1b'));
    }

    #[test]
    fn test_overlay_view_has_color_codes_per_row() {
        let world = shared();
        let chunk = world.new_chunk(ChunkCoord::new(0, 0)).unwrap();
        let overlay = ClimateOverlay {
            temperature: true,
            ..ClimateOverlay::default()
        };
        let text = render_chunk(&world, &chunk, overlay);
        assert_eq!(text.lines().count(), CHUNK_SIZE);
        assert_eq!(text.matches("\x1b[0m").count(), CHUNK_SIZE);
        assert!(text.starts_with("\x1b[48;2;"));
    }

    #[test]
    fn test_legend_lists_tiles_in_order() {
        let world = shared();
        let text = legend(world.tiles());
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[0].starts_with("S  Simple Tile"));
        assert!(lines[2].contains("[Base, Simple]"));
    }

    #[test]
    fn test_legend_line_layout() {
        let text = legend(shared().tiles());
        assert!(text.starts_with("S  Simple Tile          rgb(25, 25, 25)  [Simple]\n"));
        assert!(text.ends_with('\n'));
    }
}
