use glam::{Mat4, Vec3};
use serde::{Deserialize, Serialize};
use wayfarer_common::CameraState;
use wayfarer_input::{Action, ActionSnapshot};
use wayfarer_locomotion::AnimationState;
use wayfarer_scene::Scene;

/// Camera/view configuration for rendering.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RenderView {
    /// Camera position in world space.
    pub eye: Vec3,
    /// Point the camera is looking at.
    pub target: Vec3,
    /// Field of view in degrees.
    pub fov_degrees: f32,
}

impl Default for RenderView {
    fn default() -> Self {
        Self::from_camera(CameraState::default())
    }
}

impl RenderView {
    /// View from the chase camera's current state.
    pub fn from_camera(camera: CameraState) -> Self {
        Self {
            eye: camera.position,
            target: camera.look_at_target,
            fov_degrees: 75.0,
        }
    }

    /// Right-handed, +Y up.
    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.eye, self.target, Vec3::Y)
    }
}

/// Renderer-agnostic interface. All renderers implement this trait.
///
/// The renderer reads the scene and a view, then produces output. It never
/// mutates the scene.
pub trait Renderer {
    /// The output type produced by this renderer.
    type Output;

    /// Render one frame from the given scene and view.
    fn render(&self, scene: &Scene, view: &RenderView) -> Self::Output;
}

/// Terrain stats for one frame.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TerrainReport {
    pub vertices: usize,
    pub revision: u64,
    pub min_height: f32,
    pub max_height: f32,
    pub needs_upload: bool,
}

/// Everything the renderer reads from the scene in one frame.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FrameReport {
    pub tick: u64,
    pub state: AnimationState,
    pub previous: Option<AnimationState>,
    pub speed: f32,
    pub position: Vec3,
    pub yaw: f32,
    pub facing: Vec3,
    /// Names of the actions held on the last tick.
    pub actions: Vec<String>,
    pub clips_loaded: bool,
    pub view: RenderView,
    pub terrain: TerrainReport,
}

impl FrameReport {
    pub fn capture(scene: &Scene, view: &RenderView) -> Self {
        let controller = scene.controller();
        let pose = controller.pose();
        let mesh = scene.terrain().mesh();
        let (min_height, max_height) = mesh.grid().height_range();
        let snapshot = scene.mapper().snapshot();
        tracing::trace!(tick = scene.tick(), "frame captured");

        Self {
            tick: scene.tick(),
            state: controller.current_state(),
            previous: controller.previous_state(),
            speed: controller.speed(),
            position: pose.position,
            yaw: pose.yaw,
            facing: pose.facing_direction(),
            actions: action_names(snapshot),
            clips_loaded: controller.has_clips(),
            view: *view,
            terrain: TerrainReport {
                vertices: mesh.grid().vertex_count(),
                revision: mesh.revision(),
                min_height,
                max_height,
                needs_upload: mesh.needs_upload(),
            },
        }
    }
}

fn action_names(snapshot: ActionSnapshot) -> Vec<String> {
    Action::ALL
        .iter()
        .filter(|a| snapshot.get(**a))
        .map(|a| a.name().to_string())
        .collect()
}

/// Structured frame capture, for JSON output and tests.
#[derive(Debug, Default)]
pub struct ReportRenderer;

impl Renderer for ReportRenderer {
    type Output = FrameReport;

    fn render(&self, scene: &Scene, view: &RenderView) -> FrameReport {
        FrameReport::capture(scene, view)
    }
}

/// Human-readable dump of the frame. Useful for CLI output and logging.
#[derive(Debug, Default)]
pub struct DebugTextRenderer;

impl DebugTextRenderer {
    pub fn new() -> Self {
        Self
    }
}

impl Renderer for DebugTextRenderer {
    type Output = String;

    fn render(&self, scene: &Scene, view: &RenderView) -> String {
        let r = FrameReport::capture(scene, view);
        let mut out = String::new();
        out.push_str(&format!("=== Scene (tick={}) ===\n", r.tick));
        out.push_str(&format!(
            "Character: state={} previous={} speed={:.3}\n",
            r.state,
            r.previous.map_or_else(|| "-".to_string(), |s| s.to_string()),
            r.speed
        ));
        out.push_str(&format!(
            "  pos=({:.2}, {:.2}, {:.2}) yaw={:.3} facing=({:.2}, {:.2}, {:.2})\n",
            r.position.x, r.position.y, r.position.z, r.yaw, r.facing.x, r.facing.y, r.facing.z
        ));
        let actions = if r.actions.is_empty() {
            "-".to_string()
        } else {
            r.actions.join(" ")
        };
        out.push_str(&format!(
            "Actions: {actions} (clips {})\n",
            if r.clips_loaded { "loaded" } else { "pending" }
        ));
        out.push_str(&format!(
            "Camera: eye=({:.2}, {:.2}, {:.2}) target=({:.2}, {:.2}, {:.2}) fov={:.0}\n",
            view.eye.x,
            view.eye.y,
            view.eye.z,
            view.target.x,
            view.target.y,
            view.target.z,
            view.fov_degrees
        ));
        out.push_str(&format!(
            "Terrain: vertices={} revision={} height=[{:.3}, {:.3}]\n",
            r.terrain.vertices, r.terrain.revision, r.terrain.min_height, r.terrain.max_height
        ));
        out
    }
}
