//! Cross-fade weight schedule for the four canned clips.
//!
//! [`CrossFade`] decides *how much* of each clip is audible at any moment and
//! where each clip's playhead is; sampling and blending the actual keyframes is
//! left to the renderer. Switching clips fades every audible clip out and the
//! new clip in over the same duration, restarting the new clip from its first
//! frame.

use crate::clip::Clip;

#[derive(Debug, Clone, Copy, PartialEq)]
struct Fade {
    from: f32,
    to: f32,
    elapsed: f32,
    duration: f32,
}

impl Fade {
    fn progress(&self) -> f32 {
        if self.duration <= 0.0 {
            1.0
        } else {
            (self.elapsed / self.duration).clamp(0.0, 1.0)
        }
    }

    fn value(&self) -> f32 {
        self.from + (self.to - self.from) * self.progress()
    }
}

/// Weight and playhead of one clip.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Layer {
    pub clip: Clip,
    /// Blend weight in `[0, 1]`.
    pub weight: f32,
    /// Seconds since the clip was (re)started. Not wrapped; the sampler knows
    /// the clip duration.
    pub time: f32,
    fade: Option<Fade>,
}

impl Layer {
    fn new(clip: Clip) -> Self {
        Self {
            clip,
            weight: 0.0,
            time: 0.0,
            fade: None,
        }
    }

    /// `true` while the clip contributes to the pose or is still fading.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.weight > 0.0 || self.fade.is_some_and(|f| f.to > 0.0)
    }

    #[must_use]
    pub fn is_fading(&self) -> bool {
        self.fade.is_some()
    }

    fn fade_to(&mut self, to: f32, duration: f32) {
        self.fade = Some(Fade {
            from: self.weight,
            to,
            elapsed: 0.0,
            duration,
        });
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct CrossFade {
    layers: [Layer; 4],
    fade_seconds: f32,
    current: Option<Clip>,
}

impl CrossFade {
    /// Creates a silent schedule; nothing plays until [`play`](Self::play).
    #[must_use]
    pub fn new(fade_seconds: f32) -> Self {
        Self {
            layers: Clip::ALL.map(Layer::new),
            fade_seconds: fade_seconds.max(0.0),
            current: None,
        }
    }

    #[must_use]
    pub fn current(&self) -> Option<Clip> {
        self.current
    }

    #[must_use]
    pub fn fade_seconds(&self) -> f32 {
        self.fade_seconds
    }

    /// Fades every other clip out and restarts `clip`, fading it in.
    pub fn play(&mut self, clip: Clip) {
        let duration = self.fade_seconds;
        for layer in &mut self.layers {
            if layer.clip == clip {
                layer.time = 0.0;
                layer.weight = 0.0;
                layer.fade_to(1.0, duration);
            } else if layer.weight > 0.0 {
                layer.fade_to(0.0, duration);
            } else {
                // never became audible; nothing to fade out
                layer.fade = None;
            }
        }
        if duration <= 0.0 {
            self.settle();
        }
        self.current = Some(clip);
    }

    /// Plays `clip` if one of `names` matches its pattern and returns the
    /// matching name. Leaves the schedule untouched otherwise.
    pub fn play_matching<'a, S>(&mut self, clip: Clip, names: &'a [S]) -> Option<&'a str>
    where
        S: AsRef<str>,
    {
        let found = clip.find_in(names.iter());
        match found {
            Some(name) => {
                log::debug!("Cross-fading to {clip} ({name})");
                self.play(clip);
            }
            None => {
                let all: Vec<&str> = names.iter().map(AsRef::as_ref).collect();
                log::warn!("Animation not found: {} in {}", clip.pattern(), all.join(", "));
            }
        }
        found
    }

    /// Advances fades and the playheads of audible clips by `dt` seconds.
    pub fn advance(&mut self, dt: f32) {
        let dt = dt.max(0.0);
        for layer in &mut self.layers {
            if !layer.is_active() {
                continue;
            }
            layer.time += dt;
            if let Some(fade) = layer.fade.as_mut() {
                fade.elapsed += dt;
            }
        }
        self.settle();
    }

    fn settle(&mut self) {
        for layer in &mut self.layers {
            if let Some(fade) = layer.fade {
                layer.weight = fade.value().clamp(0.0, 1.0);
                if fade.progress() >= 1.0 {
                    layer.weight = fade.to;
                    layer.fade = None;
                }
            }
        }
    }

    #[must_use]
    pub fn layer(&self, clip: Clip) -> &Layer {
        &self.layers[clip.index()]
    }

    #[must_use]
    pub fn layers(&self) -> &[Layer; 4] {
        &self.layers
    }

    #[must_use]
    pub fn weight(&self, clip: Clip) -> f32 {
        self.layer(clip).weight
    }

    /// Layers currently contributing to the pose.
    pub fn audible(&self) -> impl Iterator<Item = &Layer> {
        self.layers.iter().filter(|l| l.weight > 0.0)
    }

    #[must_use]
    pub fn total_weight(&self) -> f32 {
        self.audible().map(|l| l.weight).sum()
    }

    #[must_use]
    pub fn is_settled(&self) -> bool {
        self.layers.iter().all(|l| !l.is_fading())
    }
}
