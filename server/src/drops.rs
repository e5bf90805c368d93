use std::f32::consts::TAU;

/// Ticks before a dropped item can be picked up again
pub const DROP_PICKUP_DELAY: u32 = 40;

/// Upward speed given to every dropped item
pub const DROP_UPWARD_VELOCITY: f32 = 0.2;

/// Upper bound (exclusive) of the horizontal scatter speed
pub const DROP_SCATTER: f32 = 0.5;

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Velocity {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Velocity {
    pub fn horizontal_speed(&self) -> f32 {
        (self.x * self.x + self.z * self.z).sqrt()
    }
}

/// A payload removed from a store on death, with the motion the host should
/// give the spawned item
#[derive(Clone, Debug, PartialEq)]
pub struct DroppedItem<P> {
    pub payload: P,
    pub velocity: Velocity,
    pub pickup_delay: u32,
}

impl<P> DroppedItem<P> {
    pub(crate) fn scatter(payload: P, rng: &fastrand::Rng) -> Self {
        let speed = rng.f32() * DROP_SCATTER;
        let angle = rng.f32() * TAU;
        Self {
            payload,
            velocity: Velocity {
                x: angle.cos() * speed,
                y: DROP_UPWARD_VELOCITY,
                z: angle.sin() * speed,
            },
            pickup_delay: DROP_PICKUP_DELAY,
        }
    }
}
