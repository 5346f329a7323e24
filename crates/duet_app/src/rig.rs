//! Engine-side avatar: pivot node, instantiated model and clip actions.
//!
//! [`RigDriver`] makes the decisions without touching the scene: which model
//! results to keep, when to retarget the yaw tween and when to restart the
//! cross-fade. [`AvatarRig`] feeds it load results and writes what it decides
//! onto scene nodes.
//!
//! Clips come from separate glTF files and are bound by node name onto the
//! current model, so they keep working after the model is swapped. The
//! cross-faded pose is a weighted blend of every audible clip's sampled
//! tracks: translations and scales are averaged, rotations are slerped.

use std::hash::Hash;
use std::sync::Arc;

use duet_core::config::StageConfig;
use duet_core::{AvatarKind, AvatarState, Clip, CrossFade, Facing, StageError, YawTween};
use glam::{EulerRot, Quat, Vec3};
use myth::animation::action::TrackValue;
use myth::animation::{AnimationAction, AnimationClip, Binder, TargetPath};
use myth::assets::SharedPrefab;
use myth::prelude::*;
use myth::scene::Node;
use rustc_hash::FxHashMap;

// ============================================================================
// Pose blending
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Channel {
    Vector(Vec3),
    Rotation(Quat),
}

#[derive(Debug, Clone, Copy)]
struct Accumulator {
    value: Channel,
    weight: f32,
}

/// Weighted blend of sampled track values, keyed per animated property.
#[derive(Debug, Clone)]
pub struct PoseBlend<K> {
    channels: FxHashMap<K, Accumulator>,
}

impl<K> Default for PoseBlend<K> {
    fn default() -> Self {
        Self {
            channels: FxHashMap::default(),
        }
    }
}

impl<K: Hash + Eq + Copy> PoseBlend<K> {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn clear(&mut self) {
        self.channels.clear();
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.channels.is_empty()
    }

    pub fn add_vector(&mut self, key: K, value: Vec3, weight: f32) {
        if weight <= 0.0 {
            return;
        }
        let acc = self.channels.entry(key).or_insert(Accumulator {
            value: Channel::Vector(Vec3::ZERO),
            weight: 0.0,
        });
        if let Channel::Vector(sum) = &mut acc.value {
            *sum += value * weight;
            acc.weight += weight;
        }
    }

    pub fn add_rotation(&mut self, key: K, value: Quat, weight: f32) {
        if weight <= 0.0 {
            return;
        }
        match self.channels.get_mut(&key) {
            Some(acc) => {
                if let Channel::Rotation(current) = &mut acc.value {
                    let total = acc.weight + weight;
                    *current = current.slerp(value, weight / total);
                    acc.weight = total;
                }
            }
            None => {
                self.channels.insert(
                    key,
                    Accumulator {
                        value: Channel::Rotation(value),
                        weight,
                    },
                );
            }
        }
    }

    /// Blended value of each property, normalized by its total weight.
    pub fn resolve(&self) -> impl Iterator<Item = (K, Channel)> + '_ {
        self.channels.iter().map(|(key, acc)| {
            let value = match acc.value {
                Channel::Vector(sum) => Channel::Vector(sum / acc.weight),
                Channel::Rotation(q) => Channel::Rotation(q.normalize()),
            };
            (*key, value)
        })
    }
}

// ============================================================================
// Rig driver
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
enum ClipFile {
    Pending,
    /// Every animation name in the file.
    Loaded(Vec<String>),
    Failed,
}

/// The decisions of an [`AvatarRig`], kept free of scene access.
///
/// Tracks which model revision was requested and settled, which clip files
/// have arrived, and diffs each frame's [`AvatarState`] against the last one
/// to retarget the yaw tween and restart the cross-fade.
#[derive(Debug, Clone)]
pub struct RigDriver {
    requested_revision: Option<u32>,
    settled_revision: Option<u32>,
    has_model: bool,
    files: [ClipFile; 4],

    yaw: YawTween,
    fade: CrossFade,
    facing: Facing,
    clip: Clip,
    clip_started: bool,
}

impl RigDriver {
    #[must_use]
    pub fn new(state: &AvatarState, config: &StageConfig) -> Self {
        Self {
            requested_revision: None,
            settled_revision: None,
            has_model: false,
            files: [
                ClipFile::Pending,
                ClipFile::Pending,
                ClipFile::Pending,
                ClipFile::Pending,
            ],
            yaw: YawTween::new(state.rotation, &config.orientation),
            fade: CrossFade::new(config.animation.fade_seconds),
            facing: state.facing,
            clip: state.clip,
            clip_started: false,
        }
    }

    /// `true` once a model load has finished (or failed) and every clip file
    /// has been dealt with.
    #[must_use]
    pub fn is_ready(&self) -> bool {
        self.settled_revision.is_some() && !self.files.contains(&ClipFile::Pending)
    }

    #[must_use]
    pub fn yaw(&self) -> &YawTween {
        &self.yaw
    }

    #[must_use]
    pub fn fade(&self) -> &CrossFade {
        &self.fade
    }

    /// Model revision that still has to be requested, if any.
    #[must_use]
    pub fn wanted_revision(&self, state: &AvatarState) -> Option<u32> {
        (self.requested_revision != Some(state.model_revision)).then_some(state.model_revision)
    }

    pub fn mark_requested(&mut self, revision: u32) {
        self.requested_revision = Some(revision);
    }

    /// Accepts a loaded model unless a newer revision was requested since.
    /// The clip schedule starts over on the new model.
    pub fn accept_model(&mut self, revision: u32) -> bool {
        if self.requested_revision != Some(revision) {
            return false;
        }
        self.settled_revision = Some(revision);
        self.has_model = true;
        self.fade = CrossFade::new(self.fade.fade_seconds());
        self.clip_started = false;
        true
    }

    /// A failed load still settles its revision; any previous model stays.
    pub fn reject_model(&mut self, revision: u32) {
        if self.requested_revision == Some(revision) {
            self.settled_revision = Some(revision);
        }
    }

    pub fn clip_loaded(&mut self, clip: Clip, names: Vec<String>) {
        self.files[clip.index()] = ClipFile::Loaded(names);
    }

    pub fn clip_failed(&mut self, clip: Clip) {
        self.files[clip.index()] = ClipFile::Failed;
    }

    /// Follows `state` and advances the tweens by `dt`. Returns the rotation
    /// to apply to the pivot.
    pub fn advance(&mut self, state: &AvatarState, dt: f32) -> Vec3 {
        if state.facing != self.facing {
            self.facing = state.facing;
            self.yaw.retarget(state.facing);
        }

        if state.clip != self.clip {
            self.clip = state.clip;
            self.clip_started = false;
        }
        if !self.clip_started && self.has_model {
            self.start_clip();
        }

        let rotation = self.yaw.advance(dt);
        self.fade.advance(dt);
        rotation
    }

    fn start_clip(&mut self) {
        let names: &[String] = match &self.files[self.clip.index()] {
            ClipFile::Pending => return,
            ClipFile::Loaded(names) => names,
            ClipFile::Failed => &[],
        };
        self.fade.play_matching(self.clip, names);
        self.clip_started = true;
    }
}

// ============================================================================
// Avatar rig
// ============================================================================

/// A clip file's matching animation, bound onto the current model.
struct BoundClip {
    clip: Arc<AnimationClip>,
    action: Option<AnimationAction>,
}

impl BoundClip {
    fn bind(&mut self, scene: &Scene, root: NodeHandle) {
        let mut action = AnimationAction::new(Arc::clone(&self.clip));
        action.bindings = Binder::bind(scene, root, &self.clip);
        self.action = Some(action);
    }
}

pub struct AvatarRig {
    kind: AvatarKind,
    pivot: NodeHandle,
    model: Option<NodeHandle>,
    clips: [Option<BoundClip>; 4],
    driver: RigDriver,
    scale: f32,

    pose: PoseBlend<(NodeHandle, TargetPath)>,
}

impl AvatarRig {
    /// Creates the pivot node at the avatar's current placement. The model
    /// is attached later by [`attach_model`](Self::attach_model).
    pub fn new(scene: &mut Scene, state: &AvatarState, kind: AvatarKind, config: &StageConfig) -> Self {
        let pivot = scene.add_node(Node::new());
        let rig = Self {
            kind,
            pivot,
            model: None,
            clips: [None, None, None, None],
            driver: RigDriver::new(state, config),
            scale: config.avatars.scale,
            pose: PoseBlend::new(),
        };
        rig.place(scene, state.position, state.rotation);
        rig
    }

    #[must_use]
    pub fn kind(&self) -> AvatarKind {
        self.kind
    }

    #[must_use]
    pub fn is_ready(&self) -> bool {
        self.driver.is_ready()
    }

    #[must_use]
    pub fn driver(&self) -> &RigDriver {
        &self.driver
    }

    #[must_use]
    pub fn wanted_revision(&self, state: &AvatarState) -> Option<u32> {
        self.driver.wanted_revision(state)
    }

    pub fn mark_requested(&mut self, revision: u32) {
        self.driver.mark_requested(revision);
    }

    /// Replaces the visible model. Results for superseded revisions are
    /// dropped.
    pub fn attach_model(&mut self, scene: &mut Scene, revision: u32, prefab: &SharedPrefab) {
        if !self.driver.accept_model(revision) {
            log::debug!("Dropping stale {} model (revision {revision})", self.kind);
            return;
        }

        if let Some(old) = self.model.take() {
            scene.remove_node(old);
        }

        let root = scene.instantiate(prefab);
        scene.attach(root, self.pivot);
        // clips are driven here, not by the loader's auto mixer
        scene.animation_mixers.remove(root);
        self.model = Some(root);
        log::info!("{} model ready (revision {revision})", self.kind);

        for bound in self.clips.iter_mut().flatten() {
            bound.bind(scene, root);
        }
    }

    pub fn model_failed(&mut self, revision: u32, error: &StageError) {
        log::error!("Failed to load {} model: {error}", self.kind);
        self.driver.reject_model(revision);
    }

    pub fn attach_clip(&mut self, scene: &Scene, clip: Clip, prefab: &SharedPrefab) {
        let names: Vec<String> = prefab.animations.iter().map(|a| a.name.clone()).collect();
        let mut bound = clip
            .find_in(names.iter())
            .and_then(|name| prefab.animations.iter().find(|a| a.name == name))
            .map(|a| BoundClip {
                clip: Arc::new(a.clone()),
                action: None,
            });

        if let (Some(bound), Some(root)) = (bound.as_mut(), self.model) {
            bound.bind(scene, root);
        }
        self.clips[clip.index()] = bound;
        self.driver.clip_loaded(clip, names);
    }

    pub fn clip_failed(&mut self, clip: Clip, error: &StageError) {
        log::error!("Failed to load {} {clip} clip: {error}", self.kind);
        self.driver.clip_failed(clip);
    }

    /// Mirrors `state` onto the scene and advances tweens by `dt`.
    pub fn sync(&mut self, scene: &mut Scene, state: &AvatarState, dt: f32) {
        let rotation = self.driver.advance(state, dt);
        self.place(scene, state.position, rotation);
        self.apply_pose(scene);
    }

    fn place(&self, scene: &mut Scene, position: Vec3, rotation: Vec3) {
        if let Some(node) = scene.get_node_mut(self.pivot) {
            node.transform.position = position;
            node.transform.rotation =
                Quat::from_euler(EulerRot::XYZ, rotation.x, rotation.y, rotation.z);
            node.transform.scale = Vec3::splat(self.scale);
            node.transform.mark_dirty();
        }
    }

    fn apply_pose(&mut self, scene: &mut Scene) {
        self.pose.clear();

        for layer in self.driver.fade().layers() {
            if layer.weight <= 0.0 {
                continue;
            }
            let Some(action) = self.clips[layer.clip.index()]
                .as_mut()
                .and_then(|bound| bound.action.as_mut())
            else {
                continue;
            };

            let duration = action.clip().duration;
            action.time = if duration > 0.0 {
                layer.time % duration
            } else {
                0.0
            };

            for i in 0..action.bindings.len() {
                let binding = &action.bindings[i];
                let (track, node, target) = (binding.track_index, binding.node_handle, binding.target);
                match (action.sample_track(track), target) {
                    (Some(TrackValue::Vector3(v)), TargetPath::Translation | TargetPath::Scale) => {
                        self.pose.add_vector((node, target), v, layer.weight);
                    }
                    (Some(TrackValue::Quaternion(q)), TargetPath::Rotation) => {
                        self.pose.add_rotation((node, target), q, layer.weight);
                    }
                    _ => {}
                }
            }
        }

        for ((handle, target), value) in self.pose.resolve() {
            let Some(node) = scene.get_node_mut(handle) else {
                continue;
            };
            match (target, value) {
                (TargetPath::Translation, Channel::Vector(v)) => node.transform.position = v,
                (TargetPath::Scale, Channel::Vector(v)) => node.transform.scale = v,
                (TargetPath::Rotation, Channel::Rotation(q)) => node.transform.rotation = q,
                _ => continue,
            }
            node.transform.mark_dirty();
        }
    }
}
