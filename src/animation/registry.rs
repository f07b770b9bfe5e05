//! Per-class animation tables, built once from configuration and asset probes.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use bevy_ecs::resource::Resource;
use glam::UVec2;
use tracing::{debug, info};

use crate::animation::{estimate_frame_count, AnimState, LoopPolicy};
use crate::asset::{image_key, AssetProbe};
use crate::config::AnimationClass;
use crate::constants::DEFAULT_FRAME_EDGE;
use crate::direction::Direction;
use crate::error::ConfigError;

/// Identifies an entity class (the player, or an enemy template name).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ClassId(Arc<str>);

impl ClassId {
    pub fn new(name: impl Into<Arc<str>>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ClassId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnimationKind {
    MultiFrame,
    SingleFrame,
}

/// Everything a renderer needs to show one animation.
#[derive(Debug, Clone, PartialEq)]
pub struct AnimationDescriptor {
    pub class: ClassId,
    pub state: AnimState,
    pub direction: Option<Direction>,
    /// Key of the source image in the asset collaborator.
    pub source: String,
    pub kind: AnimationKind,
    /// Always at least 1; greater than 1 for multi-frame descriptors.
    pub frame_count: u32,
    pub frame_size: UVec2,
    pub fps: u32,
    pub loop_policy: LoopPolicy,
}

impl AnimationDescriptor {
    pub fn frame_duration_ms(&self) -> u64 {
        1000 / u64::from(self.fps.max(1))
    }

    /// Time taken to play every frame once.
    pub fn duration_ms(&self) -> u64 {
        u64::from(self.frame_count) * 1000 / u64::from(self.fps.max(1))
    }
}

/// One cell of the registry table.
#[derive(Debug, Clone, PartialEq)]
pub enum AnimationSlot {
    Multi(AnimationDescriptor),
    Single(AnimationDescriptor),
    Absent,
}

impl AnimationSlot {
    pub fn descriptor(&self) -> Option<&AnimationDescriptor> {
        match self {
            AnimationSlot::Multi(d) | AnimationSlot::Single(d) => Some(d),
            AnimationSlot::Absent => None,
        }
    }

    pub fn is_absent(&self) -> bool {
        matches!(self, AnimationSlot::Absent)
    }
}

/// The typed `(state, direction-or-none) -> slot` table for one class.
///
/// Immutable once built. Cells never probed behave the same as [`AnimationSlot::Absent`].
#[derive(Debug, Clone)]
pub struct AnimationRegistry {
    class: ClassId,
    slots: HashMap<(AnimState, Option<Direction>), AnimationSlot>,
}

impl AnimationRegistry {
    /// Probes every declared state (plus the attack variants) with and without each declared direction.
    pub fn build(class: &AnimationClass, probe: &dyn AssetProbe) -> Result<Self, ConfigError> {
        let sheet = &class.sheet;
        if sheet.attack_alternate && sheet.attack_variants.is_empty() {
            return Err(ConfigError::InvalidConfiguration(format!(
                "class '{}' alternates attacks but lists no attack variants",
                class.id
            )));
        }
        if let Some((state, _)) = sheet.frame_counts.iter().find(|(_, count)| **count == 0) {
            return Err(ConfigError::InvalidConfiguration(format!(
                "class '{}' declares zero frames for '{state}'",
                class.id
            )));
        }

        let mut states = class.states.clone();
        for variant in &sheet.attack_variants {
            if !states.contains(variant) {
                states.push(*variant);
            }
        }

        let mut slots = HashMap::new();
        for &state in &states {
            for &direction in &class.directions {
                slots.insert((state, Some(direction)), Self::probe_slot(class, state, Some(direction), probe));
            }
            slots.insert((state, None), Self::probe_slot(class, state, None, probe));
        }

        let present = slots.values().filter(|slot| !slot.is_absent()).count();
        info!(class = %class.id, probed = slots.len(), present, "Animation registry built");

        Ok(Self {
            class: class.id.clone(),
            slots,
        })
    }

    fn probe_slot(class: &AnimationClass, state: AnimState, direction: Option<Direction>, probe: &dyn AssetProbe) -> AnimationSlot {
        let source = image_key(&class.prefix, state, direction);
        let Some(size) = probe.image_size(&source) else {
            return AnimationSlot::Absent;
        };

        let sheet = &class.sheet;
        let frame_count = match sheet.frame_counts.get(&state) {
            Some(&count) => count,
            None if !sheet.auto_detect_frames => 1,
            None => estimate_frame_count(size.x, size.y, state),
        };
        let frame_size = sheet.frame_size.map(UVec2::from).unwrap_or_else(|| {
            if size.x == 0 || size.y == 0 {
                UVec2::splat(DEFAULT_FRAME_EDGE)
            } else {
                UVec2::new(size.x / frame_count, size.y)
            }
        });

        let kind = if frame_count > 1 {
            AnimationKind::MultiFrame
        } else {
            AnimationKind::SingleFrame
        };
        debug!(class = %class.id, %source, frame_count, ?kind, "Probed animation");

        let descriptor = AnimationDescriptor {
            class: class.id.clone(),
            state,
            direction,
            source,
            kind,
            frame_count,
            frame_size,
            fps: state.fps(),
            loop_policy: state.loop_policy(),
        };
        match kind {
            AnimationKind::MultiFrame => AnimationSlot::Multi(descriptor),
            AnimationKind::SingleFrame => AnimationSlot::Single(descriptor),
        }
    }

    pub fn class(&self) -> &ClassId {
        &self.class
    }

    pub fn slot(&self, state: AnimState, direction: Option<Direction>) -> Option<&AnimationSlot> {
        self.slots.get(&(state, direction))
    }

    /// The multi-frame descriptor for a cell, if it has one.
    pub fn multi(&self, state: AnimState, direction: Option<Direction>) -> Option<&AnimationDescriptor> {
        match self.slot(state, direction) {
            Some(AnimationSlot::Multi(d)) => Some(d),
            _ => None,
        }
    }

    /// The single-frame descriptor for a cell, if it has one.
    pub fn single(&self, state: AnimState, direction: Option<Direction>) -> Option<&AnimationDescriptor> {
        match self.slot(state, direction) {
            Some(AnimationSlot::Single(d)) => Some(d),
            _ => None,
        }
    }

    /// Present descriptors, in no particular order.
    pub fn descriptors(&self) -> impl Iterator<Item = &AnimationDescriptor> {
        self.slots.values().filter_map(AnimationSlot::descriptor)
    }
}

/// Every class registry known to the game.
///
/// Registries are shared as `Arc`s. A rebuild produces a whole new registry and
/// swaps the pointer, so holders of the old one keep a consistent table.
#[derive(Resource, Debug, Clone, Default)]
pub struct AnimationLibrary {
    registries: HashMap<ClassId, Arc<AnimationRegistry>>,
}

impl AnimationLibrary {
    pub fn build<'a>(classes: impl IntoIterator<Item = &'a AnimationClass>, probe: &dyn AssetProbe) -> Result<Self, ConfigError> {
        let mut library = Self::default();
        for class in classes {
            library.replace(AnimationRegistry::build(class, probe)?);
        }
        Ok(library)
    }

    pub fn get(&self, class: &ClassId) -> Option<&Arc<AnimationRegistry>> {
        self.registries.get(class)
    }

    /// Installs `registry`, returning the one it displaced.
    pub fn replace(&mut self, registry: AnimationRegistry) -> Option<Arc<AnimationRegistry>> {
        self.registries.insert(registry.class().clone(), Arc::new(registry))
    }

    /// Rebuilds one class. On error the previous registry stays in place.
    pub fn rebuild_class(&mut self, class: &AnimationClass, probe: &dyn AssetProbe) -> Result<(), ConfigError> {
        let registry = AnimationRegistry::build(class, probe)?;
        self.replace(registry);
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.registries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.registries.is_empty()
    }
}
