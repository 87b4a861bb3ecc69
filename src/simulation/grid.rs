//! # Grid and Generation Snapshots
//!
//! [`GridSize`] fixes the automaton's dimensions for a run. [`Generation`] is a
//! host-side snapshot of one tick: what the CPU reference steps, what patterns
//! are drawn into, and what a GPU readback decodes to.
//!
//! ## Cell encoding
//!
//! On the GPU a cell is one `Rgba8Unorm` texel. Alive is `(255, 255, 255, 255)`
//! and dead is `(0, 0, 0, 255)`; decoding only looks at the red channel.

use std::fmt;
use std::str::FromStr;

use crate::error::{LifeError, Result};

/// Texel written for a live cell
pub const ALIVE_RGBA: [u8; 4] = [255, 255, 255, 255];
/// Texel written for a dead cell
pub const DEAD_RGBA: [u8; 4] = [0, 0, 0, 255];
/// Bytes per cell in the generation images
pub const BYTES_PER_CELL: u32 = 4;

/// Immutable grid dimensions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct GridSize {
    width: u32,
    height: u32,
}

impl GridSize {
    pub fn new(width: u32, height: u32) -> Result<Self> {
        if width == 0 || height == 0 {
            return Err(LifeError::InvalidConfig(format!(
                "grid dimensions must be non-zero, got {width}x{height}"
            )));
        }
        Ok(Self { width, height })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn cell_count(&self) -> usize {
        self.width as usize * self.height as usize
    }

    pub fn contains(&self, x: u32, y: u32) -> bool {
        x < self.width && y < self.height
    }

    /// Row-major linear index; also the seeding input for the cell
    pub fn linear_index(&self, x: u32, y: u32) -> u32 {
        y.wrapping_mul(self.width).wrapping_add(x)
    }

    /// Workgroups needed to cover the grid with `tile`-sized tiles
    pub fn workgroups(&self, tile: (u32, u32)) -> (u32, u32) {
        (self.width.div_ceil(tile.0), self.height.div_ceil(tile.1))
    }

    pub fn extent(&self) -> wgpu::Extent3d {
        wgpu::Extent3d {
            width: self.width,
            height: self.height,
            depth_or_array_layers: 1,
        }
    }
}

impl fmt::Display for GridSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

/// How neighbor coordinates outside the grid are resolved
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum EdgePolicy {
    /// Toroidal: coordinates wrap modulo width and height
    #[default]
    Wrap,
    /// Clamp-to-edge: coordinates clamp into the grid, so an edge cell can read itself
    Clamp,
}

impl EdgePolicy {
    /// Value passed to the shaders in `LifeParams::edge_policy`
    pub fn shader_id(self) -> u32 {
        match self {
            EdgePolicy::Wrap => 0,
            EdgePolicy::Clamp => 1,
        }
    }

    /// Maps a possibly out-of-range coordinate onto a grid cell
    pub fn resolve(self, x: i64, y: i64, size: GridSize) -> (u32, u32) {
        let w = size.width as i64;
        let h = size.height as i64;
        match self {
            EdgePolicy::Wrap => (x.rem_euclid(w) as u32, y.rem_euclid(h) as u32),
            EdgePolicy::Clamp => (x.clamp(0, w - 1) as u32, y.clamp(0, h - 1) as u32),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            EdgePolicy::Wrap => "wrap",
            EdgePolicy::Clamp => "clamp",
        }
    }
}

impl FromStr for EdgePolicy {
    type Err = LifeError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "wrap" | "torus" => Ok(EdgePolicy::Wrap),
            "clamp" => Ok(EdgePolicy::Clamp),
            other => Err(LifeError::InvalidConfig(format!(
                "unknown edge policy '{other}', expected 'wrap' or 'clamp'"
            ))),
        }
    }
}

/// Host-side snapshot of one generation
#[derive(Clone, PartialEq, Eq)]
pub struct Generation {
    size: GridSize,
    cells: Vec<bool>,
}

impl Generation {
    /// All-dead generation
    pub fn new(size: GridSize) -> Self {
        Self {
            size,
            cells: vec![false; size.cell_count()],
        }
    }

    /// Builds a generation from alive coordinates; out-of-range ones are skipped
    pub fn with_alive(size: GridSize, alive: &[(u32, u32)]) -> Self {
        let mut generation = Self::new(size);
        for &(x, y) in alive {
            generation.set(x, y, true);
        }
        generation
    }

    pub fn size(&self) -> GridSize {
        self.size
    }

    pub fn get(&self, x: u32, y: u32) -> bool {
        self.size.contains(x, y) && self.cells[self.size.linear_index(x, y) as usize]
    }

    /// Sets a cell; returns false (and writes nothing) when out of range
    pub fn set(&mut self, x: u32, y: u32, alive: bool) -> bool {
        if !self.size.contains(x, y) {
            return false;
        }
        let index = self.size.linear_index(x, y) as usize;
        self.cells[index] = alive;
        true
    }

    /// Reads a neighbor at a signed offset, resolved through the edge policy
    pub fn neighbor(&self, x: u32, y: u32, dx: i64, dy: i64, policy: EdgePolicy) -> bool {
        let (nx, ny) = policy.resolve(x as i64 + dx, y as i64 + dy, self.size);
        self.get(nx, ny)
    }

    pub fn population(&self) -> usize {
        self.cells.iter().filter(|&&alive| alive).count()
    }

    /// Alive coordinates in row-major order
    pub fn alive_cells(&self) -> Vec<(u32, u32)> {
        let width = self.size.width;
        self.cells
            .iter()
            .enumerate()
            .filter(|(_, alive)| **alive)
            .map(|(i, _)| (i as u32 % width, i as u32 / width))
            .collect()
    }

    /// Tightly packed RGBA8 texels, row-major
    pub fn to_rgba8(&self) -> Vec<u8> {
        self.cells
            .iter()
            .flat_map(|&alive| if alive { ALIVE_RGBA } else { DEAD_RGBA })
            .collect()
    }

    /// Decodes RGBA8 texels whose rows are `bytes_per_row` apart
    pub fn from_rgba8(size: GridSize, data: &[u8], bytes_per_row: u32) -> Result<Self> {
        let row_bytes = (size.width * BYTES_PER_CELL) as usize;
        let stride = bytes_per_row as usize;
        let needed = stride * (size.height as usize - 1) + row_bytes;
        if stride < row_bytes || data.len() < needed {
            return Err(LifeError::Readback(format!(
                "got {} bytes with stride {}, need {} for a {} grid",
                data.len(),
                stride,
                needed,
                size
            )));
        }

        let mut generation = Self::new(size);
        for (y, row) in data.chunks(stride).take(size.height as usize).enumerate() {
            for (x, texel) in row[..row_bytes].chunks_exact(4).enumerate() {
                generation.cells[y * size.width as usize + x] = texel[0] > 127;
            }
        }
        Ok(generation)
    }
}

impl fmt::Debug for Generation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Generation {} ({} alive)", self.size, self.population())?;
        for y in 0..self.size.height {
            for x in 0..self.size.width {
                f.write_str(if self.get(x, y) { "#" } else { "." })?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn size(w: u32, h: u32) -> GridSize {
        GridSize::new(w, h).unwrap()
    }

    #[test]
    fn test_grid_size_rejects_zero() {
        assert!(GridSize::new(0, 1).is_err());
        assert!(GridSize::new(1, 0).is_err());
    }

    #[test]
    fn test_workgroups_round_up() {
        assert_eq!(size(128, 72).workgroups((8, 8)), (16, 9));
        assert_eq!(size(10, 3).workgroups((8, 8)), (2, 1));
    }

    #[test]
    fn test_linear_index_is_row_major() {
        let grid = size(5, 4);
        assert_eq!(grid.linear_index(0, 0), 0);
        assert_eq!(grid.linear_index(4, 0), 4);
        assert_eq!(grid.linear_index(0, 1), 5);
        assert_eq!(grid.linear_index(2, 3), 17);
    }

    #[test]
    fn test_wrap_resolves_modulo() {
        let grid = size(4, 3);
        assert_eq!(EdgePolicy::Wrap.resolve(-1, -1, grid), (3, 2));
        assert_eq!(EdgePolicy::Wrap.resolve(4, 3, grid), (0, 0));
        assert_eq!(EdgePolicy::Wrap.resolve(2, 1, grid), (2, 1));
    }

    #[test]
    fn test_clamp_resolves_to_edge() {
        let grid = size(4, 3);
        assert_eq!(EdgePolicy::Clamp.resolve(-1, -1, grid), (0, 0));
        assert_eq!(EdgePolicy::Clamp.resolve(4, 3, grid), (3, 2));
    }

    #[test]
    fn test_edge_policy_parse() {
        assert_eq!("Wrap".parse::<EdgePolicy>().unwrap(), EdgePolicy::Wrap);
        assert_eq!("clamp".parse::<EdgePolicy>().unwrap(), EdgePolicy::Clamp);
        assert!("mirror".parse::<EdgePolicy>().is_err());
    }

    #[test]
    fn test_set_out_of_range_is_skipped() {
        let mut generation = Generation::new(size(3, 3));
        assert!(!generation.set(3, 0, true));
        assert!(!generation.set(0, 7, true));
        assert_eq!(generation.population(), 0);
        assert!(!generation.get(10, 10));
    }

    #[test]
    fn test_alive_cells_round_trip() {
        let alive = vec![(0, 0), (2, 1), (1, 2)];
        let generation = Generation::with_alive(size(3, 3), &alive);
        assert_eq!(generation.population(), 3);
        assert_eq!(generation.alive_cells(), vec![(0, 0), (2, 1), (1, 2)]);
    }

    #[test]
    fn test_rgba8_decode_honours_row_padding() {
        let grid = size(2, 2);
        // Two cells per row, padded to 12 bytes per row
        let mut data = vec![0u8; 24];
        data[0..4].copy_from_slice(&ALIVE_RGBA);
        data[4..8].copy_from_slice(&DEAD_RGBA);
        data[12..16].copy_from_slice(&DEAD_RGBA);
        data[16..20].copy_from_slice(&ALIVE_RGBA);

        let generation = Generation::from_rgba8(grid, &data, 12).unwrap();
        assert!(generation.get(0, 0));
        assert!(!generation.get(1, 0));
        assert!(!generation.get(0, 1));
        assert!(generation.get(1, 1));
    }

    #[test]
    fn test_rgba8_decode_rejects_short_data() {
        let grid = size(4, 4);
        assert!(Generation::from_rgba8(grid, &[0u8; 10], 16).is_err());
        assert!(Generation::from_rgba8(grid, &[0u8; 64], 8).is_err());
    }

    #[test]
    fn test_packed_encoding_decodes_back() {
        let generation = Generation::with_alive(size(3, 2), &[(1, 0), (2, 1)]);
        let bytes = generation.to_rgba8();
        assert_eq!(bytes.len(), 24);
        let decoded = Generation::from_rgba8(generation.size(), &bytes, 12).unwrap();
        assert_eq!(decoded, generation);
    }
}
