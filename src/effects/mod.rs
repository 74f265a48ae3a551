pub mod celebration;
pub mod queue;

pub use celebration::CelebrationStage;
pub use queue::{
    EffectKind, EffectsQueue, TransientEffect, AMBER, CYAN, PARTICLES_PER_BURST, TEAL,
    TRAIL_CAPACITY,
};
