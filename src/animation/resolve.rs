use crate::animation::{AnimState, AnimationDescriptor, AnimationRegistry};
use crate::direction::Direction;
use crate::error::AnimationError;

/// A concrete visual chosen for a `(state, direction)` request.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedAnimation {
    /// `state_direction` for directional hits, `state` otherwise, using the state that actually resolved.
    pub key: String,
    pub descriptor: AnimationDescriptor,
}

/// Builds an animation key: `state_direction`, or `state` when there is no direction.
pub fn animation_key(state: AnimState, direction: Option<Direction>) -> String {
    match direction {
        Some(direction) => format!("{state}_{}", direction.name()),
        None => state.to_string(),
    }
}

/// Picks the visual for `state` facing `direction`.
///
/// First hit wins: directional multi-frame, non-directional multi-frame,
/// directional single frame, non-directional single frame. A missing `attack2`
/// retries the whole chain as `attack1`; the reverse never happens.
pub fn resolve(registry: &AnimationRegistry, state: AnimState, direction: Option<Direction>) -> Result<ResolvedAnimation, AnimationError> {
    let found = lookup(registry, state, direction).or_else(|| match state {
        AnimState::Attack2 => lookup(registry, AnimState::Attack1, direction),
        _ => None,
    });

    found
        .map(|(descriptor, hit_direction)| ResolvedAnimation {
            key: animation_key(descriptor.state, hit_direction),
            descriptor: descriptor.clone(),
        })
        .ok_or_else(|| AnimationError::MissingAsset {
            class: registry.class().to_string(),
            state,
            direction,
        })
}

fn lookup(
    registry: &AnimationRegistry,
    state: AnimState,
    direction: Option<Direction>,
) -> Option<(&AnimationDescriptor, Option<Direction>)> {
    let directional = |find: fn(&AnimationRegistry, AnimState, Option<Direction>) -> Option<&AnimationDescriptor>| {
        direction.and_then(|d| find(registry, state, Some(d)).map(|desc| (desc, Some(d))))
    };

    directional(AnimationRegistry::multi)
        .or_else(|| registry.multi(state, None).map(|desc| (desc, None)))
        .or_else(|| directional(AnimationRegistry::single))
        .or_else(|| registry.single(state, None).map(|desc| (desc, None)))
}
