//! Spatial query service: rays and overlap volumes against colliders.
//!
//! Systems depend on the [`SpatialQuery`] trait; [`SceneQuery`] answers it
//! from the `(Transform, Collider)` pairs in the ECS world. A ray that
//! starts inside a collider never reports that collider, so a wielder's own
//! body does not block its shots.

use glam::Vec3;
use hecs::{Entity, World};

use rogue_core::components::{Collider, Shape, Transform};
use rogue_core::enums::TriggerInteraction;
use rogue_core::layers::{Layer, LayerMask};

/// Nearest hit along a ray.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RayHit {
    pub entity: Entity,
    pub point: Vec3,
    pub distance: f32,
    pub layer: Layer,
}

pub trait SpatialQuery {
    /// First collider along the ray within `max_distance`, filtered by `mask`
    /// and the trigger policy. `direction` need not be normalized; a zero
    /// direction hits nothing.
    fn raycast(
        &self,
        origin: Vec3,
        direction: Vec3,
        max_distance: f32,
        mask: LayerMask,
        triggers: TriggerInteraction,
    ) -> Option<RayHit>;

    /// All colliders touching the sphere, filtered by `mask`, in entity order.
    fn overlap_sphere(&self, center: Vec3, radius: f32, mask: LayerMask) -> Vec<Entity>;
}

/// [`SpatialQuery`] over the colliders of an ECS world.
pub struct SceneQuery<'w> {
    world: &'w World,
    queries_hit_triggers: bool,
}

impl<'w> SceneQuery<'w> {
    pub fn new(world: &'w World, queries_hit_triggers: bool) -> Self {
        Self {
            world,
            queries_hit_triggers,
        }
    }

    fn hits_triggers(&self, policy: TriggerInteraction) -> bool {
        match policy {
            TriggerInteraction::UseGlobal => self.queries_hit_triggers,
            TriggerInteraction::Collide => true,
            TriggerInteraction::Ignore => false,
        }
    }
}

impl SpatialQuery for SceneQuery<'_> {
    fn raycast(
        &self,
        origin: Vec3,
        direction: Vec3,
        max_distance: f32,
        mask: LayerMask,
        triggers: TriggerInteraction,
    ) -> Option<RayHit> {
        let direction = direction.try_normalize()?;
        let hit_triggers = self.hits_triggers(triggers);

        let mut best: Option<RayHit> = None;
        let mut query = self.world.query::<(&Transform, &Collider)>();
        for (entity, (transform, collider)) in query.iter() {
            if !mask.contains(collider.layer) || (collider.is_trigger && !hit_triggers) {
                continue;
            }
            let Some(distance) =
                ray_distance(origin, direction, transform.position, &collider.shape)
            else {
                continue;
            };
            if distance > max_distance {
                continue;
            }
            let closer = match &best {
                Some(current) => {
                    distance < current.distance
                        || (distance == current.distance && entity < current.entity)
                }
                None => true,
            };
            if closer {
                best = Some(RayHit {
                    entity,
                    point: origin + direction * distance,
                    distance,
                    layer: collider.layer,
                });
            }
        }
        best
    }

    fn overlap_sphere(&self, center: Vec3, radius: f32, mask: LayerMask) -> Vec<Entity> {
        let mut found: Vec<Entity> = self
            .world
            .query::<(&Transform, &Collider)>()
            .iter()
            .filter(|(_, (transform, collider))| {
                mask.contains(collider.layer)
                    && sphere_touches(center, radius, transform.position, &collider.shape)
            })
            .map(|(entity, _)| entity)
            .collect();
        found.sort();
        found
    }
}

/// Distance along a normalized ray to `shape` centered at `center`.
fn ray_distance(origin: Vec3, direction: Vec3, center: Vec3, shape: &Shape) -> Option<f32> {
    match *shape {
        Shape::Sphere { radius } => ray_sphere(origin, direction, center, radius),
        Shape::Box { half_extents } => {
            ray_aabb(origin, direction, center - half_extents, center + half_extents)
        }
    }
}

fn ray_sphere(origin: Vec3, direction: Vec3, center: Vec3, radius: f32) -> Option<f32> {
    let offset = origin - center;
    let c = offset.length_squared() - radius * radius;
    if c <= 0.0 {
        // Origin inside
        return None;
    }
    let b = offset.dot(direction);
    let discriminant = b * b - c;
    if discriminant < 0.0 {
        return None;
    }
    let t = -b - discriminant.sqrt();
    (t >= 0.0).then_some(t)
}

fn ray_aabb(origin: Vec3, direction: Vec3, min: Vec3, max: Vec3) -> Option<f32> {
    if origin.cmpge(min).all() && origin.cmple(max).all() {
        return None;
    }
    let mut t_min = 0.0f32;
    let mut t_max = f32::INFINITY;
    for axis in 0..3 {
        let o = origin[axis];
        let d = direction[axis];
        if d.abs() < f32::EPSILON {
            if o < min[axis] || o > max[axis] {
                return None;
            }
            continue;
        }
        let inv = 1.0 / d;
        let (near, far) = {
            let a = (min[axis] - o) * inv;
            let b = (max[axis] - o) * inv;
            if a <= b {
                (a, b)
            } else {
                (b, a)
            }
        };
        t_min = t_min.max(near);
        t_max = t_max.min(far);
        if t_min > t_max {
            return None;
        }
    }
    Some(t_min)
}

fn sphere_touches(center: Vec3, radius: f32, shape_center: Vec3, shape: &Shape) -> bool {
    match *shape {
        Shape::Sphere { radius: other } => {
            center.distance_squared(shape_center) <= (radius + other) * (radius + other)
        }
        Shape::Box { half_extents } => {
            let closest = center.clamp(shape_center - half_extents, shape_center + half_extents);
            center.distance_squared(closest) <= radius * radius
        }
    }
}
