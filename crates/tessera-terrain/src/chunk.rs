//! Fixed-size square grid of resolved tiles.
//!
//! A [`Chunk`] is built once, completely, and never mutated afterwards. It
//! stores [`TileId`]s; the tiles themselves live in the world's registry.

use crate::biome::{TileId, TileRegistry};

/// Side length of a chunk in tiles.
pub const CHUNK_SIZE: usize = 64;
/// Number of tiles in a chunk.
pub const CHUNK_AREA: usize = CHUNK_SIZE * CHUNK_SIZE;

/// Identifies a chunk's position on the chunk grid.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ChunkCoord {
    pub x: i64,
    pub y: i64,
}

impl ChunkCoord {
    pub fn new(x: i64, y: i64) -> Self {
        Self { x, y }
    }

    /// The chunk containing tile coordinate `(x, y)`. Uses floor division,
    /// so tile `-1` belongs to chunk `-1`.
    pub fn containing(x: i64, y: i64) -> Self {
        let size = CHUNK_SIZE as i64;
        Self {
            x: x.div_euclid(size),
            y: y.div_euclid(size),
        }
    }

    /// Tile coordinate of this chunk's local `(0, 0)`, or `None` if the
    /// chunk's tiles do not fit in `i64` tile coordinates.
    ///
    /// Every axis in `i64::MIN / CHUNK_SIZE..=i64::MAX / CHUNK_SIZE` has an
    /// origin, and so does its last tile (`origin + CHUNK_SIZE - 1`).
    pub fn origin(self) -> Option<(i64, i64)> {
        let size = CHUNK_SIZE as i64;
        Some((self.x.checked_mul(size)?, self.y.checked_mul(size)?))
    }

    /// Returns the neighboring coordinate offset by `(dx, dy)`, or `None`
    /// on overflow.
    pub fn offset(self, dx: i64, dy: i64) -> Option<Self> {
        Some(Self {
            x: self.x.checked_add(dx)?,
            y: self.y.checked_add(dy)?,
        })
    }
}

/// Errors from chunk construction and tile access.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ChunkError {
    #[error("local coordinate ({x}, {y}) is outside the {size}x{size} chunk", size = CHUNK_SIZE)]
    OutOfBounds { x: usize, y: usize },

    /// The chunk's tile coordinates would overflow `i64`.
    #[error("chunk ({x}, {y}) lies outside the addressable world")]
    CoordinateOutOfRange { x: i64, y: i64 },
}

/// A generated chunk of tiles.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Chunk {
    coord: ChunkCoord,
    origin: (i64, i64),
    /// Row-major: index `ly * CHUNK_SIZE + lx`.
    tiles: Box<[TileId]>,
}

impl Chunk {
    /// Generate every tile of the chunk at `coord`.
    ///
    /// `tile_for` receives world tile coordinates, row by row (local y, then
    /// local x). The first error aborts generation, so a partial chunk is
    /// never produced. A coordinate without an origin fails with
    /// [`ChunkError::CoordinateOutOfRange`] before `tile_for` is called.
    pub fn generate<E: From<ChunkError>>(
        coord: ChunkCoord,
        mut tile_for: impl FnMut(i64, i64) -> Result<TileId, E>,
    ) -> Result<Self, E> {
        let (ox, oy) = coord.origin().ok_or(ChunkError::CoordinateOutOfRange {
            x: coord.x,
            y: coord.y,
        })?;
        let mut tiles = Vec::with_capacity(CHUNK_AREA);
        for ly in 0..CHUNK_SIZE as i64 {
            for lx in 0..CHUNK_SIZE as i64 {
                tiles.push(tile_for(ox + lx, oy + ly)?);
            }
        }
        Ok(Self {
            coord,
            origin: (ox, oy),
            tiles: tiles.into_boxed_slice(),
        })
    }

    pub fn coord(&self) -> ChunkCoord {
        self.coord
    }

    /// World tile coordinate of local `(0, 0)`.
    pub fn origin(&self) -> (i64, i64) {
        self.origin
    }

    /// Returns the tile at local `(x, y)`.
    ///
    /// # Errors
    ///
    /// Returns [`ChunkError::OutOfBounds`] if either coordinate is `>= CHUNK_SIZE`.
    pub fn tile_at(&self, x: usize, y: usize) -> Result<TileId, ChunkError> {
        if x >= CHUNK_SIZE || y >= CHUNK_SIZE {
            return Err(ChunkError::OutOfBounds { x, y });
        }
        Ok(self.tiles[y * CHUNK_SIZE + x])
    }

    /// All tiles in row-major order.
    pub fn tiles(&self) -> &[TileId] {
        &self.tiles
    }

    /// Iterates `(local_x, local_y, tile)` in row-major order.
    pub fn iter(&self) -> impl Iterator<Item = (usize, usize, TileId)> + '_ {
        self.tiles
            .iter()
            .enumerate()
            .map(|(i, &id)| (i % CHUNK_SIZE, i / CHUNK_SIZE, id))
    }

    /// Text view: one line per row, one tile symbol per column.
    pub fn render_symbols(&self, registry: &TileRegistry) -> String {
        let mut out = String::with_capacity(CHUNK_AREA + CHUNK_SIZE);
        for row in self.tiles.chunks_exact(CHUNK_SIZE) {
            for &id in row {
                out.push_str(&registry.get(id).symbol);
            }
            out.push('\n');
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::biome::{Rgb, Tile};

    #[derive(Debug, PartialEq)]
    enum TestError {
        BadTile,
        Chunk(ChunkError),
    }

    impl From<ChunkError> for TestError {
        fn from(err: ChunkError) -> Self {
            TestError::Chunk(err)
        }
    }

    fn checkerboard(coord: ChunkCoord) -> Chunk {
        Chunk::generate::<ChunkError>(coord, |x, y| Ok(TileId(((x ^ y) & 1) as u16)))
            .unwrap()
    }

    #[test]
    fn test_containing_uses_floor_division() {
        assert_eq!(ChunkCoord::containing(0, 0), ChunkCoord::new(0, 0));
        assert_eq!(ChunkCoord::containing(63, 64), ChunkCoord::new(0, 1));
        assert_eq!(ChunkCoord::containing(-1, -64), ChunkCoord::new(-1, -1));
        assert_eq!(ChunkCoord::containing(-65, 128), ChunkCoord::new(-2, 2));
    }

    #[test]
    fn test_origin_and_offset() {
        assert_eq!(ChunkCoord::new(2, -1).origin(), Some((128, -64)));
        assert_eq!(
            ChunkCoord::new(2, -1).offset(-1, 1),
            Some(ChunkCoord::new(1, 0))
        );
    }

    #[test]
    fn test_origin_at_axis_limits() {
        let size = CHUNK_SIZE as i64;
        let max = ChunkCoord::new(i64::MAX / size, i64::MIN / size);
        let (ox, oy) = max.origin().unwrap();
        assert_eq!(ox.checked_add(size - 1), Some(i64::MAX));
        assert_eq!(oy, i64::MIN);

        assert_eq!(ChunkCoord::new(i64::MAX / size + 1, 0).origin(), None);
        assert_eq!(ChunkCoord::new(0, i64::MIN / size - 1).origin(), None);
        assert_eq!(ChunkCoord::new(i64::MAX, 0).offset(1, 0), None);
        assert_eq!(ChunkCoord::new(0, i64::MIN).offset(0, -1), None);
    }

    #[test]
    fn test_containing_always_has_origin() {
        for (x, y) in [(i64::MAX, i64::MIN), (i64::MIN, i64::MAX), (0, -1)] {
            let coord = ChunkCoord::containing(x, y);
            let (ox, oy) = coord.origin().unwrap();
            assert!(ox <= x && x - ox < CHUNK_SIZE as i64);
            assert!(oy <= y && y - oy < CHUNK_SIZE as i64);
        }
    }

    #[test]
    fn test_generate_rejects_coordinate_without_origin() {
        let coord = ChunkCoord::new(i64::MAX / 32, 0);
        let mut calls = 0;
        let result = Chunk::generate::<ChunkError>(coord, |_, _| {
            calls += 1;
            Ok(TileId(0))
        });
        assert_eq!(
            result,
            Err(ChunkError::CoordinateOutOfRange { x: coord.x, y: 0 })
        );
        assert_eq!(calls, 0);
    }

    #[test]
    fn test_last_addressable_chunk_generates() {
        let size = CHUNK_SIZE as i64;
        let chunk = checkerboard(ChunkCoord::new(i64::MAX / size, i64::MAX / size));
        assert_eq!(chunk.origin(), (i64::MAX - (size - 1), i64::MAX - (size - 1)));
        assert_eq!(chunk.tiles().len(), CHUNK_AREA);
    }

    #[test]
    fn test_generate_visits_world_coordinates() {
        let coord = ChunkCoord::new(1, -2);
        let mut visited = Vec::new();
        let chunk = Chunk::generate::<ChunkError>(coord, |x, y| {
            visited.push((x, y));
            Ok(TileId(0))
        })
        .unwrap();
        assert_eq!(visited.len(), CHUNK_AREA);
        assert_eq!(visited[0], (64, -128));
        assert_eq!(visited[1], (65, -128));
        assert_eq!(visited[CHUNK_SIZE], (64, -127));
        assert_eq!(*visited.last().unwrap(), (127, -65));
        assert_eq!(chunk.coord(), coord);
        assert_eq!(chunk.origin(), (64, -128));
    }

    #[test]
    fn test_generate_aborts_on_first_error() {
        let mut calls = 0;
        let result = Chunk::generate(ChunkCoord::new(0, 0), |x, _| {
            calls += 1;
            if x == 3 {
                Err(TestError::BadTile)
            } else {
                Ok(TileId(0))
            }
        });
        assert_eq!(result, Err(TestError::BadTile));
        assert_eq!(calls, 4);

        let result = Chunk::generate(ChunkCoord::new(i64::MIN, 0), |_, _| {
            Err::<TileId, _>(TestError::BadTile)
        });
        assert!(matches!(
            result,
            Err(TestError::Chunk(ChunkError::CoordinateOutOfRange { x: i64::MIN, y: 0 }))
        ));
    }

    #[test]
    fn test_tile_at_bounds_checked() {
        let chunk = checkerboard(ChunkCoord::new(0, 0));
        assert_eq!(chunk.tile_at(0, 0), Ok(TileId(0)));
        assert_eq!(chunk.tile_at(1, 0), Ok(TileId(1)));
        assert_eq!(chunk.tile_at(63, 63), Ok(TileId(0)));
        assert_eq!(
            chunk.tile_at(64, 0),
            Err(ChunkError::OutOfBounds { x: 64, y: 0 })
        );
        assert_eq!(
            chunk.tile_at(0, 64),
            Err(ChunkError::OutOfBounds { x: 0, y: 64 })
        );
    }

    #[test]
    fn test_iter_matches_tile_at() {
        let chunk = checkerboard(ChunkCoord::new(3, 7));
        for (x, y, id) in chunk.iter() {
            assert_eq!(chunk.tile_at(x, y), Ok(id));
        }
        assert_eq!(chunk.iter().count(), CHUNK_AREA);
        assert_eq!(chunk.tiles().len(), CHUNK_AREA);
    }

    #[test]
    fn test_render_symbols_grid() {
        let mut reg = TileRegistry::new();
        reg.register(Tile::new("Even", ".", Rgb(0, 0, 0), ["Even"]).unwrap())
            .unwrap();
        reg.register(Tile::new("Odd", "#", Rgb(255, 255, 255), ["Odd"]).unwrap())
            .unwrap();
        let text = checkerboard(ChunkCoord::new(0, 0)).render_symbols(&reg);
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), CHUNK_SIZE);
        assert!(lines.iter().all(|l| l.len() == CHUNK_SIZE));
        assert!(lines[0].starts_with(".#.#"));
        assert!(lines[1].starts_with("#.#."));
    }
}
