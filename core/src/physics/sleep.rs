//! Sleep-state bookkeeping for dynamic bodies.
//!
//! Grounded on the original engine's `DynamicBody::updateSleep`: a body whose
//! linear and angular velocity both stay below the motion threshold for
//! enough consecutive steps is put to sleep and excluded from further
//! integration and narrow-phase work until something wakes it (a joint, or
//! an explicit `set_awake` call — there is no contact-based wake-up in the
//! original and none is added here).

use glam::Vec3;

use super::body::Body;

const SLEEP_MOTION_THRESHOLD: f32 = 0.005;
const SLEEP_STILL_FRAMES: u32 = 80;

/// Updates the still-frame counter and sleep flag for one dynamic body.
/// No-op for static bodies.
pub fn update_sleep(body: &mut Body) {
    let Some(d) = body.dynamics.as_mut() else {
        return;
    };

    let motion = d.vel.length_squared().max(d.angular_vel.length_squared());
    if motion < SLEEP_MOTION_THRESHOLD {
        d.still_frames += 1;
    } else {
        d.still_frames = 0;
    }

    if d.still_frames >= SLEEP_STILL_FRAMES {
        d.is_awake = false;
    }

    if !d.is_awake {
        d.vel = Vec3::ZERO;
        d.angular_vel = Vec3::ZERO;
    }
}
