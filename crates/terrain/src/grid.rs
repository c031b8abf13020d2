use glam::Vec3;
use wayfarer_common::{ConfigError, TerrainConfig};

/// Fixed-resolution height-field in plane space.
///
/// Vertices are laid out row by row starting at the +y edge, each row running
/// from -x to +x. Planar `x`/`y` are fixed at construction; only `z` is ever
/// rewritten.
#[derive(Debug, Clone, PartialEq)]
pub struct TerrainGrid {
    width: f32,
    height: f32,
    segments_x: u32,
    segments_y: u32,
    vertices: Vec<Vec3>,
}

impl TerrainGrid {
    /// Build a flat grid centered on the origin. Fails on zero segments or a
    /// non-positive size, like [`TerrainGrid::from_config`].
    pub fn new(
        width: f32,
        height: f32,
        segments_x: u32,
        segments_y: u32,
    ) -> Result<Self, ConfigError> {
        Self::from_config(&TerrainConfig {
            width,
            height,
            segments_x,
            segments_y,
            seed: None,
        })
    }

    /// Validate the configuration and build its grid.
    pub fn from_config(config: &TerrainConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self::flat(
            config.width,
            config.height,
            config.segments_x,
            config.segments_y,
        ))
    }

    /// Segment counts must already be non-zero.
    fn flat(width: f32, height: f32, segments_x: u32, segments_y: u32) -> Self {
        let cell_w = width / segments_x as f32;
        let cell_h = height / segments_y as f32;
        let half_w = width / 2.0;
        let half_h = height / 2.0;

        let mut vertices =
            Vec::with_capacity((segments_x as usize + 1) * (segments_y as usize + 1));
        for iy in 0..=segments_y {
            let y = iy as f32 * cell_h - half_h;
            for ix in 0..=segments_x {
                let x = ix as f32 * cell_w - half_w;
                vertices.push(Vec3::new(x, -y, 0.0));
            }
        }

        Self {
            width,
            height,
            segments_x,
            segments_y,
            vertices,
        }
    }

    pub fn width(&self) -> f32 {
        self.width
    }

    pub fn height(&self) -> f32 {
        self.height
    }

    pub fn segments_x(&self) -> u32 {
        self.segments_x
    }

    pub fn segments_y(&self) -> u32 {
        self.segments_y
    }

    pub fn vertices(&self) -> &[Vec3] {
        &self.vertices
    }

    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    /// Replace every vertex height with `f(x, y)` of its planar position.
    pub fn rewrite_heights(&mut self, mut f: impl FnMut(f32, f32) -> f32) {
        for v in &mut self.vertices {
            v.z = f(v.x, v.y);
        }
    }

    /// Two counter-clockwise triangles per cell.
    pub fn indices(&self) -> Vec<u32> {
        let row = self.segments_x + 1;
        let mut indices = Vec::with_capacity((self.segments_x * self.segments_y * 6) as usize);
        for iy in 0..self.segments_y {
            for ix in 0..self.segments_x {
                let a = ix + row * iy;
                let b = ix + row * (iy + 1);
                let c = (ix + 1) + row * (iy + 1);
                let d = (ix + 1) + row * iy;
                indices.extend_from_slice(&[a, b, d, b, c, d]);
            }
        }
        indices
    }

    /// Lowest and highest vertex height.
    pub fn height_range(&self) -> (f32, f32) {
        self.vertices
            .iter()
            .fold((f32::INFINITY, f32::NEG_INFINITY), |(lo, hi), v| {
                (lo.min(v.z), hi.max(v.z))
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn vertex_count_matches_segments() {
        let grid = TerrainGrid::new(10.0, 6.0, 5, 3).unwrap();
        assert_eq!(grid.vertex_count(), 6 * 4);
    }

    #[test]
    fn default_config_grid() {
        let grid = TerrainGrid::from_config(&TerrainConfig::default()).unwrap();
        assert_eq!(grid.vertex_count(), 51 * 52);
    }

    #[test]
    fn corners_span_the_plane() {
        let grid = TerrainGrid::new(100.0, 100.0, 50, 51).unwrap();
        let v = grid.vertices();
        assert_eq!(v[0], Vec3::new(-50.0, 50.0, 0.0));
        assert_eq!(v[50], Vec3::new(50.0, 50.0, 0.0));
        let last = *v.last().unwrap();
        assert!(last.abs_diff_eq(Vec3::new(50.0, -50.0, 0.0), 1e-4));
    }

    #[test]
    fn rewrite_only_touches_height() {
        let mut grid = TerrainGrid::new(4.0, 4.0, 2, 2).unwrap();
        let before: Vec<(u32, u32)> = grid
            .vertices()
            .iter()
            .map(|v| (v.x.to_bits(), v.y.to_bits()))
            .collect();

        grid.rewrite_heights(|x, y| x + 2.0 * y);

        for (v, (bx, by)) in grid.vertices().iter().zip(before) {
            assert_eq!(v.x.to_bits(), bx);
            assert_eq!(v.y.to_bits(), by);
            assert_eq!(v.z, v.x + 2.0 * v.y);
        }
    }

    #[test]
    fn indices_cover_every_cell() {
        let grid = TerrainGrid::new(3.0, 2.0, 3, 2).unwrap();
        let indices = grid.indices();
        assert_eq!(indices.len(), 3 * 2 * 6);
        assert_eq!(&indices[..6], &[0, 4, 1, 4, 5, 1]);
        let max = *indices.iter().max().unwrap() as usize;
        assert_eq!(max, grid.vertex_count() - 1);
    }

    #[test]
    fn height_range_tracks_rewrites() {
        let mut grid = TerrainGrid::new(2.0, 2.0, 1, 1).unwrap();
        assert_eq!(grid.height_range(), (0.0, 0.0));
        grid.rewrite_heights(|x, _| x);
        assert_eq!(grid.height_range(), (-1.0, 1.0));
    }

    #[test]
    fn invalid_config_is_rejected() {
        let cfg = TerrainConfig {
            segments_y: 0,
            ..TerrainConfig::default()
        };
        assert!(matches!(
            TerrainGrid::from_config(&cfg),
            Err(ConfigError::Invalid { .. })
        ));
    }

    #[test]
    fn zero_segments_are_an_error() {
        for (sx, sy) in [(0, 1), (1, 0), (0, 0)] {
            assert!(matches!(
                TerrainGrid::new(1.0, 1.0, sx, sy),
                Err(ConfigError::Invalid { .. })
            ));
        }
        assert!(TerrainGrid::new(1.0, 1.0, 1, 1).is_ok());
    }
}
