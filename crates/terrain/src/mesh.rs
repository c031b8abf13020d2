use crate::grid::TerrainGrid;
use glam::{Quat, Vec3};

/// Surface parameters handed to the renderer with the mesh.
#[derive(Debug, Clone, PartialEq)]
pub struct TerrainMaterial {
    pub color: [f32; 3],
    pub wireframe: bool,
}

impl Default for TerrainMaterial {
    fn default() -> Self {
        Self {
            color: [1.0, 1.0, 1.0],
            wireframe: false,
        }
    }
}

/// Grid, index buffer and material, plus the dirty flag the renderer uses
/// to decide when to re-upload vertex data.
#[derive(Debug, Clone)]
pub struct TerrainMesh {
    grid: TerrainGrid,
    indices: Vec<u32>,
    material: TerrainMaterial,
    orientation: Quat,
    needs_upload: bool,
    revision: u64,
}

impl TerrainMesh {
    /// Wrap a grid. The plane is laid flat (its +z becomes world +y) and
    /// starts out needing its first upload.
    pub fn new(grid: TerrainGrid) -> Self {
        let indices = grid.indices();
        Self {
            grid,
            indices,
            material: TerrainMaterial::default(),
            orientation: Quat::from_rotation_x(-std::f32::consts::FRAC_PI_2),
            needs_upload: true,
            revision: 0,
        }
    }

    pub fn grid(&self) -> &TerrainGrid {
        &self.grid
    }

    pub fn indices(&self) -> &[u32] {
        &self.indices
    }

    pub fn material(&self) -> &TerrainMaterial {
        &self.material
    }

    pub fn material_mut(&mut self) -> &mut TerrainMaterial {
        &mut self.material
    }

    pub fn orientation(&self) -> Quat {
        self.orientation
    }

    /// Vertex `index` in world space.
    pub fn world_vertex(&self, index: usize) -> Option<Vec3> {
        self.grid
            .vertices()
            .get(index)
            .map(|v| self.orientation * *v)
    }

    /// Number of completed height rewrites.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn needs_upload(&self) -> bool {
        self.needs_upload
    }

    /// Consume the dirty flag. Returns whether vertex data must be uploaded.
    pub fn take_needs_upload(&mut self) -> bool {
        std::mem::take(&mut self.needs_upload)
    }

    pub(crate) fn rewrite_heights(&mut self, f: impl FnMut(f32, f32) -> f32) {
        self.grid.rewrite_heights(f);
        self.revision += 1;
        self.needs_upload = true;
    }
}
