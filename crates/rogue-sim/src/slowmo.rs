//! Tactical pause (slowmo) controller.
//!
//! Owns the global time scale. Cycles `Inactive -> Slowdown -> Executing ->
//! Inactive`; forced termination may jump straight to `Inactive`. All of its
//! own timing runs on unscaled time. Notifications queue in an outbox the
//! engine drains once per frame.

use std::collections::VecDeque;

use glam::Vec3;
use hecs::Entity;
use tracing::{debug, info};

use rogue_core::config::SlowmoTuning;
use rogue_core::enums::{Ambience, SlowmoState};
use rogue_core::events::SlowmoEvent;
use rogue_core::layers::MARKABLE_LAYERS;
use rogue_core::state::{SlowmoView, TagView};
use rogue_core::types::lerp;

use crate::spatial::RayHit;

/// A marked target waiting to be executed.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SlowmoTag {
    pub target: Entity,
    pub target_id: u32,
    /// Marked point relative to the target's position.
    pub offset: Vec3,
    /// Marked point in world space, following the target.
    pub point: Vec3,
}

/// Bounded-duration interpolation of the time scale.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TimeScaleTween {
    from: f32,
    to: f32,
    duration: f32,
    elapsed: f32,
}

impl TimeScaleTween {
    pub fn new(from: f32, to: f32, duration: f32) -> Self {
        Self {
            from,
            to,
            duration,
            elapsed: 0.0,
        }
    }

    /// Advance by `dt` real seconds and return the current value.
    pub fn advance(&mut self, dt: f32) -> f32 {
        self.elapsed += dt;
        self.value()
    }

    pub fn value(&self) -> f32 {
        if self.finished() {
            self.to
        } else {
            lerp(self.from, self.to, self.elapsed / self.duration)
        }
    }

    pub fn finished(&self) -> bool {
        self.duration <= 0.0 || self.elapsed >= self.duration
    }

    pub fn target(&self) -> f32 {
        self.to
    }
}

#[derive(Debug)]
pub struct SlowmoController {
    tuning: SlowmoTuning,
    state: SlowmoState,
    remaining: f32,
    tags: VecDeque<SlowmoTag>,
    tag_time_left: f32,
    time_scale: f32,
    tween: Option<TimeScaleTween>,
    warning_active: bool,
    outbox: Vec<SlowmoEvent>,
}

impl SlowmoController {
    /// A controller at rest with a full budget.
    pub fn new(tuning: SlowmoTuning) -> Self {
        Self {
            remaining: tuning.max_duration,
            tag_time_left: tuning.tag_visible_duration,
            tuning,
            state: SlowmoState::Inactive,
            tags: VecDeque::new(),
            time_scale: 1.0,
            tween: None,
            warning_active: false,
            outbox: Vec::new(),
        }
    }

    pub fn state(&self) -> SlowmoState {
        self.state
    }

    /// Current global time scale.
    pub fn time_scale(&self) -> f32 {
        self.time_scale
    }

    pub fn remaining(&self) -> f32 {
        self.remaining
    }

    pub fn max_duration(&self) -> f32 {
        self.tuning.max_duration
    }

    pub fn marking_distance(&self) -> f32 {
        self.tuning.marking_distance
    }

    pub fn is_interpolating(&self) -> bool {
        self.tween.is_some()
    }

    pub fn tags(&self) -> impl Iterator<Item = &SlowmoTag> {
        self.tags.iter()
    }

    pub fn tag_count(&self) -> usize {
        self.tags.len()
    }

    /// Marked point of the tag currently being executed.
    pub fn current_tag_point(&self) -> Option<Vec3> {
        if self.state != SlowmoState::Executing {
            return None;
        }
        self.tags.front().map(|tag| tag.point)
    }

    /// Set the remaining budget directly, clamped to `[0, max]`.
    pub fn set_remaining(&mut self, remaining: f32) {
        self.remaining = remaining.clamp(0.0, self.tuning.max_duration);
    }

    /// Restore budget after a kill, clamped to the maximum.
    pub fn gain(&mut self) {
        self.remaining = (self.remaining + self.tuning.gain_per_kill).min(self.tuning.max_duration);
    }

    /// Toggle input. Returns true if the state changed.
    pub fn toggle(&mut self) -> bool {
        match self.state {
            SlowmoState::Inactive => self.begin(),
            SlowmoState::Slowdown => {
                if self.tags.is_empty() {
                    self.end(true);
                } else {
                    self.enter_executing();
                }
                true
            }
            SlowmoState::Executing => false,
        }
    }

    /// Try to tag whatever the marking ray struck. Only possible during
    /// `Slowdown`; reaching the tag cap starts execution immediately.
    pub fn try_mark(&mut self, hit: &RayHit, target_id: u32, target_position: Vec3) -> bool {
        if self.state != SlowmoState::Slowdown || !MARKABLE_LAYERS.contains(hit.layer) {
            return false;
        }

        let mut marked = false;
        if self.tags.len() < self.tuning.max_tags {
            self.tags.push_back(SlowmoTag {
                target: hit.entity,
                target_id,
                offset: hit.point - target_position,
                point: hit.point,
            });
            self.outbox.push(SlowmoEvent::TargetMarked {
                target: target_id,
                point: hit.point,
            });
            debug!(target = target_id, tags = self.tags.len(), "slowmo target marked");
            marked = true;
        }
        if self.tags.len() >= self.tuning.max_tags {
            self.enter_executing();
        }
        marked
    }

    /// Advance by `dt` real seconds.
    ///
    /// `locate` resolves a tagged target to its current position, or `None`
    /// once the target is gone.
    pub fn tick(&mut self, dt: f32, mut locate: impl FnMut(Entity) -> Option<Vec3>) {
        self.refresh_tags(&mut locate);

        if let Some(tween) = self.tween.as_mut() {
            self.time_scale = tween.advance(dt);
            if tween.finished() {
                self.tween = None;
            }
        }

        match self.state {
            SlowmoState::Inactive => {}
            SlowmoState::Slowdown => {
                self.remaining = (self.remaining - dt).max(0.0);
                if !self.warning_active && self.remaining <= self.tuning.duration_warning {
                    self.warning_active = true;
                    self.outbox.push(SlowmoEvent::DurationWarning);
                }
                if self.remaining <= 0.0 {
                    info!("slowmo budget exhausted");
                    self.end(true);
                }
            }
            SlowmoState::Executing => {
                if !self.tags.is_empty() {
                    self.tag_time_left -= dt;
                    if self.tag_time_left <= 0.0 {
                        if let Some(expired) = self.tags.pop_front() {
                            self.outbox.push(SlowmoEvent::TagExpired {
                                target: expired.target_id,
                            });
                        }
                        self.tag_time_left = self.tuning.tag_visible_duration;
                    }
                }
                if self.tags.is_empty() {
                    self.end(true);
                }
            }
        }
    }

    /// End immediately with no interpolation and no sound.
    pub fn force_terminate(&mut self) {
        self.tags.clear();
        self.tween = None;
        self.time_scale = 1.0;
        self.warning_active = false;
        if self.state != SlowmoState::Inactive {
            self.state = SlowmoState::Inactive;
            self.outbox.push(SlowmoEvent::StateChanged {
                state: SlowmoState::Inactive,
            });
            self.outbox.push(SlowmoEvent::AmbienceChanged {
                ambience: Ambience::Normal,
            });
            self.outbox.push(SlowmoEvent::Ended { with_sound: false });
            info!("slowmo force terminated");
        }
    }

    /// Take the notifications queued since the last drain.
    pub fn drain_events(&mut self) -> Vec<SlowmoEvent> {
        std::mem::take(&mut self.outbox)
    }

    pub fn view(&self) -> SlowmoView {
        SlowmoView {
            state: self.state,
            remaining: self.remaining,
            max: self.tuning.max_duration,
            tags: self
                .tags
                .iter()
                .map(|tag| TagView {
                    target: tag.target_id,
                    point: tag.point,
                })
                .collect(),
        }
    }

    fn begin(&mut self) -> bool {
        if self.remaining <= 0.0 {
            return false;
        }
        self.state = SlowmoState::Slowdown;
        self.warning_active = false;
        self.start_tween(self.tuning.time_scale, self.tuning.enter_duration);
        self.outbox.push(SlowmoEvent::Started);
        self.outbox.push(SlowmoEvent::StateChanged {
            state: SlowmoState::Slowdown,
        });
        self.outbox.push(SlowmoEvent::AmbienceChanged {
            ambience: Ambience::Slowmo,
        });
        info!(remaining = self.remaining, "slowmo started");
        true
    }

    fn enter_executing(&mut self) {
        self.state = SlowmoState::Executing;
        self.warning_active = false;
        self.tag_time_left = self.tuning.tag_visible_duration;
        self.outbox.push(SlowmoEvent::StateChanged {
            state: SlowmoState::Executing,
        });
        debug!(tags = self.tags.len(), "slowmo executing");
    }

    fn end(&mut self, with_sound: bool) {
        self.tags.clear();
        self.warning_active = false;
        self.start_tween(1.0, self.tuning.exit_duration);
        self.state = SlowmoState::Inactive;
        self.outbox.push(SlowmoEvent::StateChanged {
            state: SlowmoState::Inactive,
        });
        self.outbox.push(SlowmoEvent::AmbienceChanged {
            ambience: Ambience::Normal,
        });
        self.outbox.push(SlowmoEvent::Ended { with_sound });
        info!(remaining = self.remaining, "slowmo ended");
    }

    /// Replace any in-flight interpolation with a new one from the current
    /// scale.
    fn start_tween(&mut self, to: f32, duration: f32) {
        let tween = TimeScaleTween::new(self.time_scale, to, duration);
        if tween.finished() {
            self.time_scale = to;
            self.tween = None;
        } else {
            self.tween = Some(tween);
        }
    }

    fn refresh_tags(&mut self, locate: &mut impl FnMut(Entity) -> Option<Vec3>) {
        let outbox = &mut self.outbox;
        self.tags.retain_mut(|tag| match locate(tag.target) {
            Some(position) => {
                tag.point = position + tag.offset;
                true
            }
            None => {
                outbox.push(SlowmoEvent::TagDropped {
                    target: tag.target_id,
                });
                false
            }
        });
    }
}
