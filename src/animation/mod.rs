//! Animation resolution: per-class registries, the fallback chain and per-entity playback.

pub mod estimator;
pub mod player;
pub mod registry;
pub mod resolve;
pub mod state;

pub use estimator::estimate_frame_count;
pub use player::{AnimationPlayer, PlayOutcome};
pub use registry::{AnimationDescriptor, AnimationKind, AnimationLibrary, AnimationRegistry, AnimationSlot, ClassId};
pub use resolve::{animation_key, resolve, ResolvedAnimation};
pub use state::{AnimState, LoopPolicy};
