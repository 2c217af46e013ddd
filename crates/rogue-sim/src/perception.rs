//! Throttled perception: cached line-of-sight refreshed at a fixed cadence.

use glam::Vec3;
use hecs::Entity;

use rogue_core::enums::{TimeBase, TriggerInteraction};
use rogue_core::layers::LayerMask;
use rogue_core::types::FrameTime;

use crate::spatial::SpatialQuery;

/// True only if the first collider along the ray from `observer` toward
/// `target_position` is `target` itself.
pub fn check_line_of_sight(
    scene: &dyn SpatialQuery,
    observer: Vec3,
    target: Entity,
    target_position: Vec3,
    max_distance: f32,
    mask: LayerMask,
    triggers: TriggerInteraction,
) -> bool {
    scene
        .raycast(
            observer,
            target_position - observer,
            max_distance,
            mask,
            triggers,
        )
        .is_some_and(|hit| hit.entity == target)
}

/// Perception component: the cached result plus its refresh countdown.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Perception {
    pub check_delay: f32,
    pub time_till_next_check: f32,
    pub clock: TimeBase,
    /// Distance beyond which the target is not even ray-tested.
    pub range: f32,
    pub layers: LayerMask,
    pub triggers: TriggerInteraction,
    pub visible: bool,
    pub sqr_distance: f32,
}

impl Perception {
    pub fn new(check_delay: f32, clock: TimeBase, range: f32, layers: LayerMask) -> Self {
        Self {
            check_delay,
            time_till_next_check: check_delay,
            clock,
            range,
            layers,
            triggers: TriggerInteraction::UseGlobal,
            visible: false,
            sqr_distance: f32::INFINITY,
        }
    }

    /// Count down toward the next check. Returns true when one is due.
    pub fn advance(&mut self, time: FrameTime) -> bool {
        self.time_till_next_check -= match self.clock {
            TimeBase::Scaled => time.delta,
            TimeBase::Unscaled => time.unscaled_delta,
        };
        self.time_till_next_check <= 0.0
    }

    /// Refresh the cached result and restart the countdown.
    ///
    /// Targets beyond `range` skip the ray test and keep the last result.
    pub fn refresh(
        &mut self,
        scene: &dyn SpatialQuery,
        observer: Vec3,
        target: Entity,
        target_position: Vec3,
    ) {
        self.time_till_next_check = self.check_delay;
        self.sqr_distance = observer.distance_squared(target_position);
        if self.sqr_distance <= self.range * self.range {
            self.visible = check_line_of_sight(
                scene,
                observer,
                target,
                target_position,
                self.range,
                self.layers,
                self.triggers,
            );
        }
    }

    /// Drop the cached result, e.g. when the target disappears.
    pub fn forget(&mut self) {
        self.visible = false;
        self.sqr_distance = f32::INFINITY;
    }
}
