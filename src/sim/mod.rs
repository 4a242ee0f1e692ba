//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only
//! - Stable iteration order (by entity ID)
//! - No rendering or platform dependencies

pub mod ai;
pub mod economy;
pub mod environment;
pub mod events;
pub mod reel;
pub mod rope;
pub mod snapshot;
pub mod spawn;
pub mod state;
pub mod tick;

pub use economy::{CatchReceipt, StoreAction, StoreError};
pub use environment::{CelestialKind, Environment, Weather};
pub use events::{AiEvent, ParticleKind, SimEvent};
pub use reel::{ReelOutcome, ReelState};
pub use rope::Rope;
pub use snapshot::UiSnapshot;
pub use state::{Attribute, CatchRef, Phase, SessionState, Tool};
pub use tick::{TickInput, TickReport, select_character, tick, use_chum};
