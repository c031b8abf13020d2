use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Index of a clip within its [`ClipSet`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ClipId(pub usize);

/// A named animation clip as delivered by the asset loader.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnimationClip {
    pub name: String,
    /// Clip length in animation time units. Playback loops over it.
    pub duration: f32,
}

impl AnimationClip {
    pub fn new(name: impl Into<String>, duration: f32) -> Self {
        Self {
            name: name.into(),
            duration,
        }
    }
}

/// The loaded clips of one model, looked up by exact name.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ClipSet {
    clips: Vec<AnimationClip>,
}

impl ClipSet {
    pub fn new(clips: Vec<AnimationClip>) -> Self {
        Self { clips }
    }

    /// Clips with the given names, all of the same duration.
    pub fn from_names<S: Into<String>>(names: impl IntoIterator<Item = S>, duration: f32) -> Self {
        names
            .into_iter()
            .map(|name| AnimationClip::new(name, duration))
            .collect()
    }

    /// First clip whose name matches exactly.
    pub fn find_by_name(&self, name: &str) -> Option<ClipId> {
        self.clips.iter().position(|c| c.name == name).map(ClipId)
    }

    pub fn get(&self, id: ClipId) -> Option<&AnimationClip> {
        self.clips.get(id.0)
    }

    pub fn len(&self) -> usize {
        self.clips.len()
    }

    pub fn is_empty(&self) -> bool {
        self.clips.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &AnimationClip> {
        self.clips.iter()
    }
}

impl FromIterator<AnimationClip> for ClipSet {
    fn from_iter<I: IntoIterator<Item = AnimationClip>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

/// A scheduled linear weight ramp.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Fade {
    pub from: f32,
    pub to: f32,
    pub duration: f32,
    pub elapsed: f32,
}

impl Fade {
    fn new(from: f32, to: f32, duration: f32) -> Self {
        Self {
            from,
            to,
            duration,
            elapsed: 0.0,
        }
    }

    pub fn weight(&self) -> f32 {
        if self.duration <= 0.0 {
            return self.to;
        }
        let t = (self.elapsed / self.duration).min(1.0);
        self.from + (self.to - self.from) * t
    }

    pub fn is_done(&self) -> bool {
        self.elapsed >= self.duration
    }
}

/// Playback state of one clip inside the mixer.
#[derive(Debug, Clone, PartialEq)]
pub struct ClipAction {
    time: f32,
    weight: f32,
    enabled: bool,
    playing: bool,
    fade: Option<Fade>,
}

impl Default for ClipAction {
    fn default() -> Self {
        Self {
            time: 0.0,
            weight: 1.0,
            enabled: true,
            playing: false,
            fade: None,
        }
    }
}

impl ClipAction {
    /// Rewind to the start, re-enable and cancel any fade. Weight is kept.
    pub fn reset(&mut self) -> &mut Self {
        self.time = 0.0;
        self.enabled = true;
        self.fade = None;
        self
    }

    /// Ramp weight from 0 to 1 over `duration`.
    pub fn fade_in(&mut self, duration: f32) -> &mut Self {
        self.weight = 0.0;
        self.fade = Some(Fade::new(0.0, 1.0, duration));
        self
    }

    /// Ramp weight from 1 to 0 over `duration`, then disable.
    pub fn fade_out(&mut self, duration: f32) -> &mut Self {
        self.weight = 1.0;
        self.fade = Some(Fade::new(1.0, 0.0, duration));
        self
    }

    pub fn play(&mut self) -> &mut Self {
        self.playing = true;
        self
    }

    pub fn time(&self) -> f32 {
        self.time
    }

    /// Blend weight as contributed to the pose. Disabled actions weigh zero.
    pub fn weight(&self) -> f32 {
        if self.enabled { self.weight } else { 0.0 }
    }

    pub fn is_playing(&self) -> bool {
        self.playing && self.enabled
    }

    pub fn fade(&self) -> Option<&Fade> {
        self.fade.as_ref()
    }

    fn advance(&mut self, dt: f32, clip_duration: f32) {
        if !self.is_playing() {
            return;
        }

        if let Some(fade) = &mut self.fade {
            fade.elapsed += dt;
            self.weight = fade.weight();
            if fade.is_done() {
                let target = fade.to;
                self.fade = None;
                if target == 0.0 {
                    self.enabled = false;
                }
            }
        }

        self.time += dt;
        if clip_duration > 0.0 {
            self.time = self.time.rem_euclid(clip_duration);
        }
    }
}

/// Per-clip playback and crossfade bookkeeping for one character.
#[derive(Debug, Clone, Default)]
pub struct AnimationMixer {
    clips: ClipSet,
    actions: BTreeMap<ClipId, ClipAction>,
    time: f32,
}

impl AnimationMixer {
    pub fn new(clips: ClipSet) -> Self {
        Self {
            clips,
            ..Self::default()
        }
    }

    pub fn clips(&self) -> &ClipSet {
        &self.clips
    }

    pub fn find(&self, name: &str) -> Option<ClipId> {
        self.clips.find_by_name(name)
    }

    /// The action for a clip, created on first use. `None` if the clip is not
    /// part of this mixer's set.
    pub fn clip_action(&mut self, id: ClipId) -> Option<&mut ClipAction> {
        self.clips.get(id)?;
        Some(self.actions.entry(id).or_default())
    }

    pub fn action(&self, id: ClipId) -> Option<&ClipAction> {
        self.actions.get(&id)
    }

    /// Actions currently contributing to the pose.
    pub fn active_actions(&self) -> impl Iterator<Item = (ClipId, &ClipAction)> {
        self.actions
            .iter()
            .filter(|(_, a)| a.is_playing())
            .map(|(id, a)| (*id, a))
    }

    /// Total animation time advanced so far.
    pub fn time(&self) -> f32 {
        self.time
    }

    /// Advance fades and playback of every active action by `dt`.
    pub fn update(&mut self, dt: f32) {
        self.time += dt;
        for (id, action) in self.actions.iter_mut() {
            let duration = self.clips.get(*id).map_or(0.0, |c| c.duration);
            action.advance(dt, duration);
        }
    }
}
