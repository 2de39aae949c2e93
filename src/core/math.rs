// Math utilities and helper functions

/// Move `value` toward `target` by at most `step`, never overshooting
pub fn approach(value: f32, target: f32, step: f32) -> f32 {
    if value < target {
        (value + step).min(target)
    } else {
        (value - step).max(target)
    }
}

/// Reduce the magnitude of `value` toward zero by `step`
pub fn decay_toward_zero(value: f32, step: f32) -> f32 {
    approach(value, 0.0, step.abs())
}

/// Mirror an angle in degrees across the vertical axis (0 = right, 90 = up)
pub fn mirror_angle(degrees: f32) -> f32 {
    180.0 - degrees
}

/// Round a non-negative float to a tick count, saturating at zero
pub fn round_ticks(value: f32) -> u32 {
    if value.is_finite() && value > 0.0 {
        value.round() as u32
    } else {
        0
    }
}
