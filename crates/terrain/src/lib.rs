//! Procedural terrain: a fixed height-field whose heights are recomputed from
//! a seeded 2D noise function on every tick.
//!
//! # Invariants
//! - Planar vertex coordinates never change after construction.
//! - The noise source is seeded once; heights are a pure function of planar
//!   position, so repeated updates produce identical meshes.
//! - Every update marks the mesh for re-upload.

mod grid;
mod height;
mod mesh;

pub use grid::TerrainGrid;
pub use height::{HeightSource, SimplexHeight};
pub use mesh::{TerrainMaterial, TerrainMesh};

use wayfarer_common::{ConfigError, TerrainConfig};

/// Height-field terrain driven by a [`HeightSource`].
#[derive(Debug)]
pub struct Terrain<H = SimplexHeight> {
    mesh: TerrainMesh,
    source: H,
}

impl Terrain<SimplexHeight> {
    /// Terrain over simplex noise. Uses the configured seed, or a random one.
    pub fn new(config: &TerrainConfig) -> Result<Self, ConfigError> {
        let source = match config.seed {
            Some(seed) => SimplexHeight::new(seed),
            None => SimplexHeight::random(),
        };
        tracing::debug!(
            seed = source.seed(),
            vertices = config.vertex_count(),
            "terrain created"
        );
        Self::with_source(config, source)
    }
}

impl<H: HeightSource> Terrain<H> {
    pub fn with_source(config: &TerrainConfig, source: H) -> Result<Self, ConfigError> {
        let grid = TerrainGrid::from_config(config)?;
        Ok(Self {
            mesh: TerrainMesh::new(grid),
            source,
        })
    }

    /// Recompute every vertex height from the noise source and flag the mesh
    /// for upload. O(vertex count).
    pub fn update(&mut self) {
        let source = &self.source;
        self.mesh.rewrite_heights(|x, y| source.height(x, y));
    }

    pub fn mesh(&self) -> &TerrainMesh {
        &self.mesh
    }

    pub fn mesh_mut(&mut self) -> &mut TerrainMesh {
        &mut self.mesh
    }

    pub fn source(&self) -> &H {
        &self.source
    }
}

pub fn crate_info() -> &'static str {
    "wayfarer-terrain v0.1.0"
}

#[cfg(test)]
mod tests {
    use super::*;

    fn small() -> TerrainConfig {
        TerrainConfig {
            seed: Some(1234),
            ..TerrainConfig::with_size(20, 16)
        }
    }

    #[test]
    fn update_writes_noise_at_each_vertex() {
        let cfg = small();
        let mut terrain = Terrain::new(&cfg).unwrap();
        let reference = SimplexHeight::new(1234);
        let planar_before: Vec<(u32, u32)> = terrain
            .mesh()
            .grid()
            .vertices()
            .iter()
            .map(|v| (v.x.to_bits(), v.y.to_bits()))
            .collect();

        terrain.update();

        let vertices = terrain.mesh().grid().vertices();
        assert_eq!(vertices.len(), cfg.vertex_count());
        for (v, (bx, by)) in vertices.iter().zip(planar_before) {
            assert_eq!(v.x.to_bits(), bx);
            assert_eq!(v.y.to_bits(), by);
            assert_eq!(v.z.to_bits(), reference.height(v.x, v.y).to_bits());
        }
    }

    #[test]
    fn repeated_updates_are_identical() {
        let mut terrain = Terrain::new(&small()).unwrap();
        terrain.update();
        let first = terrain.mesh().grid().clone();
        for _ in 0..5 {
            terrain.update();
            assert_eq!(terrain.mesh().grid(), &first);
        }
        assert_eq!(terrain.mesh().revision(), 6);
    }

    #[test]
    fn every_update_flags_upload() {
        let mut terrain = Terrain::new(&small()).unwrap();
        let mesh = terrain.mesh_mut();
        mesh.take_needs_upload();
        assert!(!mesh.needs_upload());

        terrain.update();
        assert!(terrain.mesh_mut().take_needs_upload());
        terrain.update();
        assert!(terrain.mesh().needs_upload());
    }

    #[test]
    fn custom_source_drives_heights() {
        let mut terrain = Terrain::with_source(&small(), |x: f32, y: f32| x - y).unwrap();
        terrain.update();
        for v in terrain.mesh().grid().vertices() {
            assert_eq!(v.z, v.x - v.y);
        }
    }

    #[test]
    fn unseeded_terrain_still_builds() {
        let cfg = TerrainConfig::with_size(8, 8);
        let mut terrain = Terrain::new(&cfg).unwrap();
        terrain.update();
        let (lo, hi) = terrain.mesh().grid().height_range();
        assert!(lo <= hi);
    }

    #[test]
    fn invalid_grid_is_a_config_error() {
        let cfg = TerrainConfig {
            width: -1.0,
            ..small()
        };
        assert!(Terrain::new(&cfg).is_err());
    }
}
