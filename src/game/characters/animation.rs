// Character animation selection
//
// The core never plays sprites. It only decides which animation and frame a
// renderer should show, derived from the state-local tick counter.

use std::collections::HashMap;

/// A single animation clip
#[derive(Debug, Clone, PartialEq)]
pub struct AnimationClip {
    /// Name of the animation (matches `CharacterState::animation_name`)
    pub name: &'static str,
    /// Number of frames in the animation
    pub frame_count: u32,
    /// Ticks each frame is shown for
    pub ticks_per_frame: u32,
    /// Whether the animation loops
    pub looping: bool,
}

impl AnimationClip {
    /// Create a looping animation
    pub fn looping(name: &'static str, frame_count: u32, ticks_per_frame: u32) -> Self {
        Self {
            name,
            frame_count: frame_count.max(1),
            ticks_per_frame: ticks_per_frame.max(1),
            looping: true,
        }
    }

    /// Create a one-shot animation that holds its last frame
    pub fn one_shot(name: &'static str, frame_count: u32, ticks_per_frame: u32) -> Self {
        Self {
            looping: false,
            ..Self::looping(name, frame_count, ticks_per_frame)
        }
    }

    /// Frame to display after `tick` ticks in the state
    pub fn frame_at(&self, tick: u32) -> u32 {
        let frame = tick / self.ticks_per_frame;
        if self.looping {
            frame % self.frame_count
        } else {
            frame.min(self.frame_count - 1)
        }
    }
}

/// What the renderer should draw for an entity this tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SpriteFrame {
    pub animation: &'static str,
    pub frame: u32,
}

impl Default for SpriteFrame {
    fn default() -> Self {
        Self {
            animation: "fall",
            frame: 0,
        }
    }
}

/// Clips available to one character
#[derive(Debug, Clone, Default)]
pub struct AnimationSet {
    clips: HashMap<&'static str, AnimationClip>,
}

impl AnimationSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Standard clips for every non-attack state
    pub fn with_standard_clips(ticks_per_frame: u32) -> Self {
        let mut set = Self::new();
        set.add(AnimationClip::looping("stand", 8, ticks_per_frame * 2));
        set.add(AnimationClip::looping("run", 8, ticks_per_frame));
        set.add(AnimationClip::one_shot("run_turnaround", 4, ticks_per_frame));
        set.add(AnimationClip::one_shot("run_end", 4, ticks_per_frame));
        set.add(AnimationClip::one_shot("initial_dash", 4, ticks_per_frame));
        set.add(AnimationClip::looping("crouch", 2, ticks_per_frame * 4));
        set.add(AnimationClip::one_shot("jumpsquat", 2, ticks_per_frame));
        set.add(AnimationClip::looping("fall", 4, ticks_per_frame * 2));
        set.add(AnimationClip::looping("special_fall", 4, ticks_per_frame * 2));
        set.add(AnimationClip::one_shot("air_dodge", 6, ticks_per_frame));
        set.add(AnimationClip::looping("hit", 3, ticks_per_frame));
        set.add(AnimationClip::one_shot("landing", 3, ticks_per_frame));
        set
    }

    pub fn add(&mut self, clip: AnimationClip) {
        self.clips.insert(clip.name, clip);
    }

    pub fn clip(&self, name: &str) -> Option<&AnimationClip> {
        self.clips.get(name)
    }

    /// Frame for `name` at `tick`. A missing clip shows frame 0.
    pub fn frame_for(&self, name: &'static str, tick: u32) -> SpriteFrame {
        let frame = self.clip(name).map_or(0, |clip| clip.frame_at(tick));
        SpriteFrame {
            animation: name,
            frame,
        }
    }
}
