/*
 * Vector Helpers
 *
 * Small value-semantics helpers on top of glam's Vec2. Every helper takes
 * its input by value and returns a new vector, so steering sums never
 * alias each other.
 */

use glam::Vec2;

// Clamp the magnitude of a vector to `max`, leaving shorter vectors untouched
#[inline]
pub fn limit(v: Vec2, max: f32) -> Vec2 {
    let length_squared = v.length_squared();
    if length_squared > max * max {
        v * (max / length_squared.sqrt())
    } else {
        v
    }
}

// Rescale a vector to the given length. The caller guarantees `v` is nonzero.
#[inline]
pub fn with_magnitude(v: Vec2, length: f32) -> Vec2 {
    v * (length / v.length())
}

// Desired-velocity steering: head along `desired` at `max_speed`, minus the current velocity
#[inline]
pub fn seek(desired: Vec2, velocity: Vec2, max_speed: f32) -> Vec2 {
    with_magnitude(desired, max_speed) - velocity
}
