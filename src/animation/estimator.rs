use crate::animation::AnimState;
use crate::constants::MAX_ESTIMATED_FRAMES;

/// Guesses how many frames a horizontal strip holds, assuming roughly square frames.
///
/// The result is always within `1..=MAX_ESTIMATED_FRAMES`. Only used when a
/// class has no explicit count for the state and auto-detection is enabled.
pub fn estimate_frame_count(width: u32, height: u32, state: AnimState) -> u32 {
    let ratio = width.checked_div(height).unwrap_or(0);
    ratio.max(state.min_estimated_frames()).min(MAX_ESTIMATED_FRAMES)
}

#[cfg(test)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;

    #[test]
    fn zero_height_uses_state_floor() {
        assert_eq!(estimate_frame_count(128, 0, AnimState::Death), 4);
        assert_eq!(estimate_frame_count(0, 0, AnimState::Idle), 1);
    }

    #[test]
    fn every_state_stays_in_bounds() {
        for state in AnimState::iter() {
            for (w, h) in [(1, 1000), (64, 64), (4096, 16), (u32::MAX, 1)] {
                let n = estimate_frame_count(w, h, state);
                assert!((1..=MAX_ESTIMATED_FRAMES).contains(&n), "{state} {w}x{h} -> {n}");
            }
        }
    }
}
