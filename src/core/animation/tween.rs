//=========================================================================
// Tween
//=========================================================================
//
// Single-property interpolation on a scene node's transform.
//
// Per tick:
//   advance(time, dt, yoyo/repeat) → ease(t / duration) → lerp(from, to) → set
//
//=========================================================================

//=== Internal Dependencies ===============================================

use crate::core::render::{NodeId, Transform};

//=== Repeat ==============================================================

/// How many extra legs play after the first.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Repeat {
    Times(u32),
    Forever,
}

impl Repeat {
    pub const NONE: Self = Self::Times(0);
}

//=== Easing ==============================================================

/// Easing curves over normalized time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Easing {
    Linear,
    QuadIn,
    QuadOut,
    QuadInOut,
    CubicIn,
    CubicOut,
    CubicInOut,
}

/// Applies `easing` to `t`, clamped to `[0, 1]`.
pub fn ease(easing: Easing, t: f32) -> f32 {
    let t = t.clamp(0.0, 1.0);
    match easing {
        Easing::Linear => t,
        Easing::QuadIn => t * t,
        Easing::QuadOut => t * (2.0 - t),
        Easing::QuadInOut => {
            if t < 0.5 {
                2.0 * t * t
            } else {
                -1.0 + (4.0 - 2.0 * t) * t
            }
        }
        Easing::CubicIn => t * t * t,
        Easing::CubicOut => {
            let p = t - 1.0;
            p * p * p + 1.0
        }
        Easing::CubicInOut => {
            if t < 0.5 {
                4.0 * t * t * t
            } else {
                let p = 2.0 * t - 2.0;
                0.5 * p * p * p + 1.0
            }
        }
    }
}

//=== Property ============================================================

/// Scalar transform component a tween drives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Property {
    PositionX,
    PositionY,
    PositionZ,
    RotationX,
    RotationY,
    RotationZ,
    ScaleX,
    ScaleY,
    ScaleZ,
}

impl Property {
    pub fn get(self, transform: &Transform) -> f32 {
        match self {
            Self::PositionX => transform.position.x,
            Self::PositionY => transform.position.y,
            Self::PositionZ => transform.position.z,
            Self::RotationX => transform.rotation.x,
            Self::RotationY => transform.rotation.y,
            Self::RotationZ => transform.rotation.z,
            Self::ScaleX => transform.scale.x,
            Self::ScaleY => transform.scale.y,
            Self::ScaleZ => transform.scale.z,
        }
    }

    pub fn set(self, transform: &mut Transform, value: f32) {
        let slot = match self {
            Self::PositionX => &mut transform.position.x,
            Self::PositionY => &mut transform.position.y,
            Self::PositionZ => &mut transform.position.z,
            Self::RotationX => &mut transform.rotation.x,
            Self::RotationY => &mut transform.rotation.y,
            Self::RotationZ => &mut transform.rotation.z,
            Self::ScaleX => &mut transform.scale.x,
            Self::ScaleY => &mut transform.scale.y,
            Self::ScaleZ => &mut transform.scale.z,
        };
        *slot = value;
    }
}

//=== Tween ===============================================================

/// Animates one property of one node from `from` to `to`.
#[derive(Debug, Clone, PartialEq)]
pub struct Tween {
    pub node: NodeId,
    pub property: Property,
    pub from: f32,
    pub to: f32,
    /// Seconds per leg.
    pub duration: f32,
    pub easing: Easing,
    /// Reverse direction on each repeat instead of rewinding.
    pub yoyo: bool,
    pub repeat: Repeat,
    pub playing: bool,
    /// Seconds into the current leg.
    pub time: f32,
    /// Current leg runs `from` to `to` (false: `to` to `from`).
    pub forward: bool,
    repeats_done: u32,
}

impl Tween {
    pub fn new(node: NodeId, property: Property, from: f32, to: f32, duration: f32) -> Self {
        Self {
            node,
            property,
            from,
            to,
            duration,
            easing: Easing::Linear,
            yoyo: false,
            repeat: Repeat::NONE,
            playing: true,
            time: 0.0,
            forward: true,
            repeats_done: 0,
        }
    }

    pub fn with_easing(mut self, easing: Easing) -> Self {
        self.easing = easing;
        self
    }

    pub fn with_yoyo(mut self, yoyo: bool) -> Self {
        self.yoyo = yoyo;
        self
    }

    pub fn with_repeat(mut self, repeat: Repeat) -> Self {
        self.repeat = repeat;
        self
    }

    /// Rewinds to the start, playing forward with the full repeat count.
    pub fn restart(&mut self) {
        self.time = 0.0;
        self.forward = true;
        self.playing = true;
        self.repeats_done = 0;
    }

    /// Advances by `dt` seconds and returns the eased value.
    pub fn step(&mut self, dt: f32) -> f32 {
        if self.playing {
            self.advance(dt.max(0.0));
        }
        self.value()
    }

    /// Current interpolated value. Reverse legs swap `from` and `to`.
    pub fn value(&self) -> f32 {
        let (from, to) = if self.forward { (self.from, self.to) } else { (self.to, self.from) };
        if self.duration <= 0.0 {
            return to;
        }
        let t = ease(self.easing, self.time / self.duration);
        from + (to - from) * t
    }

    fn advance(&mut self, dt: f32) {
        if self.duration <= 0.0 {
            self.playing = false;
            return;
        }

        self.time += dt;
        if self.time < self.duration {
            return;
        }

        // Overshoot carries into the following legs.
        let legs = (self.time / self.duration).floor();
        let allowed = match self.repeat {
            Repeat::Forever => legs,
            Repeat::Times(n) => legs.min(n.saturating_sub(self.repeats_done) as f32),
        };

        if self.yoyo && allowed % 2.0 == 1.0 {
            self.forward = !self.forward;
        }
        self.repeats_done = self.repeats_done.saturating_add(allowed as u32);

        if allowed < legs {
            self.playing = false;
            self.time = self.duration;
        } else {
            self.time = (self.time - legs * self.duration).clamp(0.0, self.duration);
        }
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;
    use crate::core::render::SceneGraph;

    fn node() -> NodeId {
        let mut graph = SceneGraph::new();
        graph.add(crate::core::render::Node::group("n"))
    }

    #[test]
    fn ease_endpoints_are_fixed() {
        for easing in [
            Easing::Linear,
            Easing::QuadIn,
            Easing::QuadOut,
            Easing::QuadInOut,
            Easing::CubicIn,
            Easing::CubicOut,
            Easing::CubicInOut,
        ] {
            assert_relative_eq!(ease(easing, 0.0), 0.0);
            assert_relative_eq!(ease(easing, 1.0), 1.0);
        }
    }

    #[test]
    fn quad_in_out_is_symmetric_at_half() {
        assert_relative_eq!(ease(Easing::QuadInOut, 0.5), 0.5);
        assert_relative_eq!(ease(Easing::QuadInOut, 0.25), 0.125);
    }

    #[test]
    fn once_stops_at_target() {
        let mut tween = Tween::new(node(), Property::ScaleY, 1.0, 2.0, 1.0);
        tween.step(0.5);
        assert_relative_eq!(tween.value(), 1.5);
        tween.step(5.0);
        assert!(!tween.playing);
        assert_relative_eq!(tween.value(), 2.0);
    }

    #[test]
    fn yoyo_forever_reverses() {
        let mut tween = Tween::new(node(), Property::RotationY, -1.0, 1.0, 1.0)
            .with_yoyo(true)
            .with_repeat(Repeat::Forever);
        tween.step(1.0);
        assert!(!tween.forward);
        assert_relative_eq!(tween.value(), 1.0);
        tween.step(0.5);
        assert_relative_eq!(tween.value(), 0.0);
        tween.step(0.5);
        assert!(tween.forward);
        assert_relative_eq!(tween.value(), -1.0);
        assert!(tween.playing);
    }

    #[test]
    fn repeat_without_yoyo_rewinds() {
        let mut tween = Tween::new(node(), Property::PositionX, 0.0, 10.0, 1.0).with_repeat(Repeat::Forever);
        tween.step(1.0);
        assert_relative_eq!(tween.value(), 0.0);
        assert!(tween.playing);
    }

    #[test]
    fn finite_repeat_stops_after_count() {
        let mut tween = Tween::new(node(), Property::PositionX, 0.0, 10.0, 1.0).with_repeat(Repeat::Times(2));
        tween.step(1.0);
        tween.step(1.0);
        assert!(tween.playing);
        tween.step(1.0);
        assert!(!tween.playing);
        assert_relative_eq!(tween.value(), 10.0);

        tween.restart();
        tween.step(1.0);
        assert!(tween.playing);
    }

    #[test]
    fn restart_rewinds() {
        let mut tween = Tween::new(node(), Property::PositionX, 0.0, 10.0, 1.0);
        tween.step(2.0);
        tween.restart();
        assert!(tween.playing && tween.forward);
        assert_relative_eq!(tween.value(), 0.0);
    }

    #[test]
    fn property_get_set_roundtrip() {
        let mut transform = Transform::IDENTITY;
        Property::RotationY.set(&mut transform, 0.75);
        Property::ScaleY.set(&mut transform, 1.05);
        assert_relative_eq!(Property::RotationY.get(&transform), 0.75);
        assert_relative_eq!(transform.scale.y, 1.05);
        assert_relative_eq!(transform.scale.x, 1.0);
    }

    #[test]
    fn rewinding_carries_leftover_time() {
        let mut tween = Tween::new(node(), Property::PositionX, 0.0, 1.0, 1.0).with_repeat(Repeat::Forever);
        let values: Vec<f32> = (0..4).map(|_| tween.step(0.75)).collect();

        for (value, expected) in values.iter().zip([0.75, 0.5, 0.25, 0.0]) {
            assert_relative_eq!(*value, expected, epsilon = 1e-5);
        }
    }

    #[test]
    fn yoyo_carries_leftover_time_into_the_return_leg() {
        let mut tween = Tween::new(node(), Property::PositionX, 0.0, 1.0, 1.0)
            .with_yoyo(true)
            .with_repeat(Repeat::Forever);

        assert_relative_eq!(tween.step(0.75), 0.75, epsilon = 1e-5);
        assert_relative_eq!(tween.step(0.75), 0.5, epsilon = 1e-5);
        assert!(!tween.forward);
        assert_relative_eq!(tween.step(0.75), 0.25, epsilon = 1e-5);
        assert!(tween.forward);
        assert_relative_eq!(tween.step(0.75), 1.0, epsilon = 1e-5);
        assert!(!tween.forward);
    }

    #[test]
    fn leg_length_does_not_depend_on_step_size() {
        let make = || {
            Tween::new(node(), Property::ScaleY, 1.0, 1.05, 0.1)
                .with_yoyo(true)
                .with_repeat(Repeat::Forever)
        };
        let mut coarse = make();
        let mut fine = make();

        for _ in 0..7 {
            coarse.step(0.03);
        }
        for _ in 0..21 {
            fine.step(0.01);
        }

        assert_eq!(coarse.forward, fine.forward);
        assert_relative_eq!(coarse.value(), fine.value(), epsilon = 1e-4);
    }

    #[test]
    fn finite_repeat_stops_inside_a_long_step() {
        let mut tween = Tween::new(node(), Property::PositionX, 0.0, 10.0, 1.0)
            .with_yoyo(true)
            .with_repeat(Repeat::Times(1));

        tween.step(5.0);

        assert!(!tween.playing);
        assert!(!tween.forward);
        assert_relative_eq!(tween.value(), 0.0);
    }

    #[test]
    fn return_leg_swaps_endpoints_instead_of_reversing_time() {
        let mut tween = Tween::new(node(), Property::PositionX, 0.0, 1.0, 1.0)
            .with_easing(Easing::QuadIn)
            .with_yoyo(true)
            .with_repeat(Repeat::Forever);

        tween.step(1.0);
        let value = tween.step(0.5);

        assert_relative_eq!(value, 1.0 - ease(Easing::QuadIn, 0.5), epsilon = 1e-5);
        assert_relative_eq!(value, 0.75, epsilon = 1e-5);
    }

    #[test]
    fn zero_duration_snaps_to_target() {
        let mut tween = Tween::new(node(), Property::PositionZ, 0.0, 3.0, 0.0);
        assert_relative_eq!(tween.step(0.016), 3.0);
    }
}
