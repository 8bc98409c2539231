/// Animated scalar values
///
/// Each [`AnimatedValue`] is advanced by an explicit time step, so the
/// animation clock belongs to whoever owns the value (the frame subscription
/// in the app, a loop in tests).

use std::time::Duration;

/// Physics parameters of a spring animation
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpringConfig {
    pub stiffness: f32,
    pub damping: f32,
    pub mass: f32,
    /// Distance from the target under which the spring may come to rest
    pub rest_displacement: f32,
    /// Speed (units/s) under which the spring may come to rest
    pub rest_speed: f32,
}

impl Default for SpringConfig {
    fn default() -> Self {
        Self {
            stiffness: 100.0,
            damping: 10.0,
            mass: 1.0,
            rest_displacement: 0.01,
            rest_speed: 2.0,
        }
    }
}

/// Largest integration step for springs (1/240 s)
const MAX_SPRING_STEP: f32 = 1.0 / 240.0;

/// Ease-in-out quadratic curve over `t` in 0..=1
pub fn ease_in_out_quad(t: f32) -> f32 {
    let t = t.clamp(0.0, 1.0);
    if t < 0.5 {
        2.0 * t * t
    } else {
        1.0 - (-2.0 * t + 2.0).powi(2) / 2.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Motion {
    Spring {
        target: f32,
        config: SpringConfig,
    },
    Timing {
        from: f32,
        to: f32,
        elapsed: f32,
        duration: f32,
    },
}

/// A value that can be set directly or animated toward a target.
#[derive(Debug, Clone, PartialEq)]
pub struct AnimatedValue {
    value: f32,
    velocity: f32,
    motion: Option<Motion>,
}

impl AnimatedValue {
    pub fn new(value: f32) -> Self {
        Self {
            value,
            velocity: 0.0,
            motion: None,
        }
    }

    pub fn value(&self) -> f32 {
        self.value
    }

    pub fn is_animating(&self) -> bool {
        self.motion.is_some()
    }

    /// Where the value is heading: the animation target, or the value itself at rest
    pub fn target(&self) -> f32 {
        match self.motion {
            Some(Motion::Spring { target, .. }) => target,
            Some(Motion::Timing { to, .. }) => to,
            None => self.value,
        }
    }

    /// Jump to `value`, dropping any animation in flight
    pub fn set(&mut self, value: f32) {
        self.motion = None;
        self.value = value;
        self.velocity = 0.0;
    }

    /// Stop where it is
    pub fn cancel(&mut self) {
        self.motion = None;
        self.velocity = 0.0;
    }

    /// Spring toward `target`. `velocity` seeds the motion; `None` keeps the
    /// current velocity so retargeting mid-flight stays smooth.
    pub fn spring_to(&mut self, target: f32, velocity: Option<f32>) {
        self.spring_to_with(target, velocity, SpringConfig::default());
    }

    pub fn spring_to_with(&mut self, target: f32, velocity: Option<f32>, config: SpringConfig) {
        if let Some(velocity) = velocity {
            self.velocity = velocity;
        }
        self.motion = Some(Motion::Spring { target, config });
    }

    /// Move to `target` over `duration` on an ease-in-out curve
    pub fn timing_to(&mut self, target: f32, duration: Duration) {
        self.velocity = 0.0;
        self.motion = Some(Motion::Timing {
            from: self.value,
            to: target,
            elapsed: 0.0,
            duration: duration.as_secs_f32(),
        });
    }

    /// Advance by `dt`. Returns `true` on the step where the animation finishes.
    pub fn advance(&mut self, dt: Duration) -> bool {
        let Some(motion) = self.motion else {
            return false;
        };
        let dt = dt.as_secs_f32();

        match motion {
            Motion::Spring { target, config } => {
                let mut remaining = dt;
                while remaining > 0.0 {
                    let step = remaining.min(MAX_SPRING_STEP);
                    let displacement = self.value - target;
                    let acceleration =
                        (-config.stiffness * displacement - config.damping * self.velocity)
                            / config.mass;
                    self.velocity += acceleration * step;
                    self.value += self.velocity * step;
                    remaining -= step;

                    if (self.value - target).abs() < config.rest_displacement
                        && self.velocity.abs() < config.rest_speed
                    {
                        self.set(target);
                        return true;
                    }
                }
                false
            }
            Motion::Timing {
                from,
                to,
                elapsed,
                duration,
            } => {
                let elapsed = elapsed + dt;
                if duration <= 0.0 || elapsed >= duration {
                    self.set(to);
                    return true;
                }
                self.value = from + (to - from) * ease_in_out_quad(elapsed / duration);
                self.motion = Some(Motion::Timing {
                    from,
                    to,
                    elapsed,
                    duration,
                });
                false
            }
        }
    }
}
