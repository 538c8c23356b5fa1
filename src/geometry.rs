//! Coordinate boxes, compass orientation, and chunk/block/region index math.
//!
//! Mirrors the teacher's convention of plain, `Copy` geometry types with no
//! smart constructors beyond what callers actually need.

use std::fmt::{self, Display};

/// One of the four compass orientations the renderer can project from.
///
/// Picks which world corner appears at the top of the image; also swaps
/// which world axis maps to which screen axis (see [`Coordinates::size`]).
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum Orientation {
    NW,
    NE,
    SW,
    SE,
}

impl Orientation {
    pub const ALL: [Orientation; 4] = [
        Orientation::NW,
        Orientation::NE,
        Orientation::SW,
        Orientation::SE,
    ];

    /// Rotates NW->NE->SE->SW->NW, used only by property tests (spec.md §8 #7).
    pub fn rotated(self) -> Self {
        match self {
            Orientation::NW => Orientation::NE,
            Orientation::NE => Orientation::SE,
            Orientation::SE => Orientation::SW,
            Orientation::SW => Orientation::NW,
        }
    }

    /// NE and SW swap which world axis reads left-to-right on screen.
    pub fn swaps_axes(self) -> bool {
        matches!(self, Orientation::NE | Orientation::SW)
    }
}

impl Display for Orientation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}",
            match self {
                Orientation::NW => "nw",
                Orientation::NE => "ne",
                Orientation::SW => "sw",
                Orientation::SE => "se",
            }
        )
    }
}

/// An axis-aligned block-space box plus the orientation to render it from.
///
/// `minX <= maxX`, `minZ <= maxZ`, `minY <= maxY <= 255`. An "undefined" box
/// (see [`Coordinates::undefined`]) uses `i32::MAX`/`i32::MIN` sentinels so
/// that repeated [`Coordinates::union`] calls behave like a running min/max
/// fold — this is how the world decoder discovers the world's bounding
/// rectangle without a separate first pass.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct Coordinates {
    pub min_x: i32,
    pub max_x: i32,
    pub min_z: i32,
    pub max_z: i32,
    pub min_y: u8,
    pub max_y: u8,
    pub orientation: Orientation,
}

impl Coordinates {
    pub fn new(min_x: i32, max_x: i32, min_z: i32, max_z: i32, min_y: u8, max_y: u8) -> Self {
        debug_assert!(min_x <= max_x);
        debug_assert!(min_z <= max_z);
        debug_assert!(min_y <= max_y);
        Self {
            min_x,
            max_x,
            min_z,
            max_z,
            min_y,
            max_y,
            orientation: Orientation::NW,
        }
    }

    /// A box with sentinel extrema, to be grown via [`Coordinates::union`].
    pub fn undefined() -> Self {
        Self {
            min_x: i32::MAX,
            max_x: i32::MIN,
            min_z: i32::MAX,
            max_z: i32::MIN,
            min_y: 0,
            max_y: 255,
            orientation: Orientation::NW,
        }
    }

    pub fn is_undefined(&self) -> bool {
        self.min_x == i32::MAX && self.max_x == i32::MIN
    }

    /// Grows this box to also cover `(x, z)`, block coordinates.
    pub fn union_point(&mut self, x: i32, z: i32) {
        self.min_x = self.min_x.min(x);
        self.max_x = self.max_x.max(x);
        self.min_z = self.min_z.min(z);
        self.max_z = self.max_z.max(z);
    }

    pub fn contains_block(&self, x: i32, z: i32) -> bool {
        x >= self.min_x && x <= self.max_x && z >= self.min_z && z <= self.max_z
    }

    pub fn with_orientation(mut self, orientation: Orientation) -> Self {
        self.orientation = orientation;
        self
    }

    pub fn min_cx(&self) -> i32 {
        self.min_x >> 4
    }
    pub fn max_cx(&self) -> i32 {
        self.max_x >> 4
    }
    pub fn min_cz(&self) -> i32 {
        self.min_z >> 4
    }
    pub fn max_cz(&self) -> i32 {
        self.max_z >> 4
    }

    pub fn n_x_chunks(&self) -> i64 {
        self.max_cx() as i64 - self.min_cx() as i64 + 1
    }
    pub fn n_z_chunks(&self) -> i64 {
        self.max_cz() as i64 - self.min_cz() as i64 + 1
    }

    /// `(sizeX, sizeZ)` as used by the projection math of spec.md §4.5.
    /// Orientation only swaps which is which; the world-space extent is
    /// unaffected (invariant 4, spec.md §8).
    pub fn size(&self) -> (i64, i64) {
        let size_x = (self.max_x - self.min_x) as i64 + 1;
        let size_z = (self.max_z - self.min_z) as i64 + 1;
        if self.orientation.swaps_axes() {
            (size_z, size_x)
        } else {
            (size_x, size_z)
        }
    }

    /// Bounds for the canvas-local chunk loop (spec §4.5 "chunk draw
    /// order"): how many steps `cx` and `cz` each take before
    /// [`Coordinates::world_chunk`] starts repeating. NE/SW swap axes the
    /// same way [`Coordinates::size`] does.
    pub fn chunk_counts(&self) -> (i64, i64) {
        let (nx, nz) = (self.n_x_chunks(), self.n_z_chunks());
        if self.orientation.swaps_axes() {
            (nz, nx)
        } else {
            (nx, nz)
        }
    }

    /// Translates a canvas-local chunk coordinate to a world chunk coordinate,
    /// per the table in spec.md §4.2.
    pub fn world_chunk(&self, cx: i64, cz: i64) -> (i64, i64) {
        let min_cx = self.min_cx() as i64;
        let max_cx = self.max_cx() as i64;
        let min_cz = self.min_cz() as i64;
        let max_cz = self.max_cz() as i64;
        match self.orientation {
            Orientation::NW => (min_cx + cx, min_cz + cz),
            Orientation::NE => (max_cx - cz, min_cz + cx),
            Orientation::SW => (min_cx + cz, max_cz - cx),
            Orientation::SE => (max_cx - cx, max_cz - cz),
        }
    }

    /// Orients an in-section block coordinate the same way
    /// [`Coordinates::world_chunk`] orients chunks, per spec.md §4.2.
    pub fn orient_block(&self, x: u8, z: u8) -> (u8, u8) {
        match self.orientation {
            Orientation::NW => (x, z),
            Orientation::NE => (15 - z, x),
            Orientation::SW => (z, 15 - x),
            Orientation::SE => (15 - x, 15 - z),
        }
    }

    /// Splits this box into at most `count` shards tiling it exactly, each a
    /// contiguous band of world Z rows covering the full X range. Shards are
    /// returned in ascending world-Z order, which is also the order the
    /// merger (§4.6) requires them to be merged in: canvas-local row 0 is
    /// always the first world chunk row regardless of orientation, since
    /// orientation is baked into `world_chunk`/projection, not into shard
    /// bounds.
    pub fn split_shards(&self, count: usize) -> Vec<Coordinates> {
        let count = count.max(1);
        let total_chunks = self.n_z_chunks();
        let count = count.min(total_chunks.max(1) as usize).max(1);

        let base = total_chunks / count as i64;
        let extra = total_chunks % count as i64;

        let mut shards = Vec::with_capacity(count);
        let mut cz = self.min_cz();
        for i in 0..count {
            let rows = base + if (i as i64) < extra { 1 } else { 0 };
            if rows == 0 {
                continue;
            }
            let min_z = cz << 4;
            let max_z = ((cz + rows) << 4) - 1;
            shards.push(Coordinates {
                min_x: self.min_x,
                max_x: self.max_x,
                min_z,
                max_z: max_z.min(self.max_z).max(min_z),
                min_y: self.min_y,
                max_y: self.max_y,
                orientation: self.orientation,
            });
            cz += rows;
        }
        shards
    }
}

impl Display for Coordinates {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "from x:{} z:{} to x:{} z:{}",
            self.min_x, self.min_z, self.max_x, self.max_z
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn union_behaves_like_running_minmax() {
        let mut c = Coordinates::undefined();
        assert!(c.is_undefined());
        c.union_point(5, -3);
        c.union_point(-2, 9);
        assert_eq!((c.min_x, c.max_x, c.min_z, c.max_z), (-2, 5, -3, 9));
    }

    #[test]
    fn size_swaps_with_orientation() {
        let c = Coordinates::new(0, 31, 0, 15, 0, 255);
        assert_eq!(c.size(), (32, 16));
        let c_ne = c.with_orientation(Orientation::NE);
        assert_eq!(c_ne.size(), (16, 32));
        let c_sw = c.with_orientation(Orientation::SW);
        assert_eq!(c_sw.size(), (16, 32));
        let c_se = c.with_orientation(Orientation::SE);
        assert_eq!(c_se.size(), (32, 16));
    }

    #[test]
    fn chunk_counts_swap_with_orientation() {
        let c = Coordinates::new(0, 31, 0, 15, 0, 255);
        assert_eq!(c.chunk_counts(), (2, 1));
        assert_eq!(c.with_orientation(Orientation::NE).chunk_counts(), (1, 2));
        assert_eq!(c.with_orientation(Orientation::SW).chunk_counts(), (1, 2));
        assert_eq!(c.with_orientation(Orientation::SE).chunk_counts(), (2, 1));
    }

    #[test]
    fn world_chunk_table_matches_spec() {
        let c = Coordinates::new(0, 31, 0, 15, 0, 255);
        assert_eq!(c.with_orientation(Orientation::NW).world_chunk(0, 0), (0, 0));
        assert_eq!(
            c.with_orientation(Orientation::SE).world_chunk(0, 0),
            (1, 0)
        );
    }

    #[test]
    fn split_shards_tiles_exactly() {
        let c = Coordinates::new(0, 255, 0, 255, 0, 255);
        let shards = c.split_shards(4);
        assert_eq!(shards.len(), 4);
        assert_eq!(shards[0].min_z, 0);
        assert_eq!(shards.last().unwrap().max_z, 255);
        // no gaps or overlaps between successive shards
        for pair in shards.windows(2) {
            assert_eq!(pair[0].max_z + 1, pair[1].min_z);
        }
    }

    #[test]
    fn split_shards_caps_at_available_rows() {
        let c = Coordinates::new(0, 15, 0, 15, 0, 255);
        let shards = c.split_shards(100);
        assert_eq!(shards.len(), 1);
    }
}
