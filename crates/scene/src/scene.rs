use serde::{Deserialize, Serialize};
use std::sync::mpsc::{self, Receiver, Sender, TryRecvError};
use wayfarer_common::{CameraState, CharacterPose, ConfigError, SceneConfig};
use wayfarer_input::{
    Action, ActionBindings, ActionIndicator, ActionMapper, ActionSnapshot, BindingError, Key,
    KeyboardHub,
};
use wayfarer_locomotion::{AnimationState, ClipSet, LocomotionController};
use wayfarer_terrain::Terrain;

#[derive(Debug, thiserror::Error)]
pub enum SceneError {
    #[error("config error: {0}")]
    Config(#[from] ConfigError),
    #[error("binding error: {0}")]
    Binding(#[from] BindingError),
}

/// A record of something the frame driver did.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum SceneEvent {
    /// A clip set arrived through the asset inbox.
    ClipsLoaded { tick: u64, count: usize },
    /// The locomotion state changed and a crossfade started.
    Transition {
        tick: u64,
        from: Option<AnimationState>,
        to: AnimationState,
    },
}

/// Most events the log holds before the oldest half is discarded.
pub const EVENT_LOG_CAPACITY: usize = 4096;

/// The frame driver.
///
/// Owns the action mapper, the locomotion controller and the terrain, and
/// ticks them in a fixed order. Clips are delivered out of band through the
/// asset inbox; the tick never waits for them.
pub struct Scene {
    tick: u64,
    mapper: ActionMapper,
    controller: LocomotionController,
    terrain: Terrain,
    assets_tx: Sender<ClipSet>,
    assets_rx: Receiver<ClipSet>,
    /// Driver events, oldest first, bounded by [`EVENT_LOG_CAPACITY`].
    events: Vec<SceneEvent>,
}

impl Scene {
    /// Build a scene with the standard bindings. Keys are fed through
    /// [`Scene::key_down`] / [`Scene::key_up`].
    pub fn new(config: &SceneConfig) -> Result<Self, SceneError> {
        config.validate()?;
        let mapper = ActionMapper::new(ActionBindings::standard())?;
        Self::build(config, mapper)
    }

    /// Build a scene whose mapper listens on `hub`. The listener is removed
    /// when the scene is dropped.
    pub fn attach(config: &SceneConfig, hub: &KeyboardHub) -> Result<Self, SceneError> {
        config.validate()?;
        let mapper = ActionMapper::attach(ActionBindings::standard(), hub)?;
        Self::build(config, mapper)
    }

    fn build(config: &SceneConfig, mapper: ActionMapper) -> Result<Self, SceneError> {
        let terrain = Terrain::new(&config.terrain)?;
        let (assets_tx, assets_rx) = mpsc::channel();
        tracing::debug!(
            vertices = terrain.mesh().grid().vertex_count(),
            attached = mapper.is_attached(),
            "scene created"
        );
        Ok(Self {
            tick: 0,
            mapper,
            controller: LocomotionController::from_config(config),
            terrain,
            assets_tx,
            assets_rx,
            events: Vec::new(),
        })
    }

    /// Sender for loaded clip sets. May be moved to a loader thread.
    pub fn asset_sender(&self) -> Sender<ClipSet> {
        self.assets_tx.clone()
    }

    /// Install clips immediately, bypassing the inbox.
    pub fn load_clips(&mut self, clips: ClipSet) {
        self.record(SceneEvent::ClipsLoaded {
            tick: self.tick,
            count: clips.len(),
        });
        self.controller.load_clips(clips);
    }

    fn record(&mut self, event: SceneEvent) {
        if self.events.len() >= EVENT_LOG_CAPACITY {
            let dropped = EVENT_LOG_CAPACITY / 2;
            self.events.drain(..dropped);
            tracing::debug!(dropped, "scene event log full, oldest events discarded");
        }
        self.events.push(event);
    }

    /// Install any clip sets waiting in the inbox. Never blocks.
    fn poll_assets(&mut self) {
        loop {
            match self.assets_rx.try_recv() {
                Ok(clips) => self.load_clips(clips),
                Err(TryRecvError::Empty | TryRecvError::Disconnected) => break,
            }
        }
    }

    /// Advance one tick: poll assets, advance the animation mixer, apply the
    /// action snapshot to the controller, then rewrite the terrain.
    pub fn step(&mut self) -> ActionSnapshot {
        self.poll_assets();

        self.controller.update();
        let actions = self.mapper.update(&mut self.controller);
        if let Some(t) = self.controller.last_transition() {
            self.record(SceneEvent::Transition {
                tick: self.tick,
                from: t.from,
                to: t.to,
            });
        }
        self.terrain.update();

        self.tick += 1;
        tracing::trace!(tick = self.tick, state = %self.controller.current_state(), "scene stepped");
        actions
    }

    /// Number of completed ticks.
    pub fn tick(&self) -> u64 {
        self.tick
    }

    pub fn key_down(&mut self, key: Key) {
        self.mapper.key_down(key);
    }

    pub fn key_up(&mut self, key: Key) {
        self.mapper.key_up(key);
    }

    pub fn bind_indicator(&mut self, action: Action, indicator: Box<dyn ActionIndicator>) {
        self.mapper.bind_indicator(action, indicator);
    }

    pub fn mapper(&self) -> &ActionMapper {
        &self.mapper
    }

    pub fn controller(&self) -> &LocomotionController {
        &self.controller
    }

    pub fn terrain(&self) -> &Terrain {
        &self.terrain
    }

    pub fn terrain_mut(&mut self) -> &mut Terrain {
        &mut self.terrain
    }

    pub fn pose(&self) -> &CharacterPose {
        self.controller.pose()
    }

    pub fn camera(&self) -> CameraState {
        self.controller.camera().state()
    }

    /// Read-only access to the event log.
    pub fn events(&self) -> &[SceneEvent] {
        &self.events
    }

    /// Drain and return the event log.
    pub fn drain_events(&mut self) -> Vec<SceneEvent> {
        std::mem::take(&mut self.events)
    }

    /// Deterministic hash of the simulated state: tick, pose, camera and
    /// terrain heights.
    pub fn state_hash(&self) -> u64 {
        let mut h: u64 = 0xcbf2_9ce4_8422_2325; // FNV offset basis
        let mix = |h: &mut u64, bytes: &[u8]| {
            for &b in bytes {
                *h ^= b as u64;
                *h = h.wrapping_mul(0x0100_0000_01b3);
            }
        };
        let pose = self.pose();
        let camera = self.camera();
        mix(&mut h, &self.tick.to_le_bytes());
        for f in pose.position.to_array() {
            mix(&mut h, &f.to_le_bytes());
        }
        mix(&mut h, &pose.yaw.to_le_bytes());
        for f in camera
            .position
            .to_array()
            .into_iter()
            .chain(camera.look_at_target.to_array())
        {
            mix(&mut h, &f.to_le_bytes());
        }
        for v in self.terrain.mesh().grid().vertices() {
            mix(&mut h, &v.z.to_le_bytes());
        }
        h
    }
}

impl std::fmt::Debug for Scene {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Scene")
            .field("tick", &self.tick)
            .field("mapper", &self.mapper)
            .field("controller", &self.controller)
            .field("terrain", &self.terrain)
            .finish_non_exhaustive()
    }
}
