//! Events crossing the simulation boundary
//!
//! `SimEvent`s are fire-once hooks for the render layer. `AiEvent`s are what
//! the behaviour update hands to the session state machine within a tick.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::state::{Predator, SwimmingFish};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ParticleKind {
    Splash,
    Sparkle,
    Bubble,
    Blood,
}

/// Visual/audio hooks for the presentation layer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum SimEvent {
    Splash {
        pos: Vec2,
    },
    Ripple {
        pos: Vec2,
        max_radius: f32,
    },
    ScreenShake {
        intensity: f32,
    },
    ParticleBurst {
        pos: Vec2,
        count: u32,
        /// 0xRRGGBB
        color: u32,
        kind: ParticleKind,
    },
    /// Transient warning text (predator interruptions, stealth attacks)
    Alert(String),
    /// One-time informational text (level ups, first ultra rare)
    Notification(String),
}

impl SimEvent {
    pub fn burst(pos: Vec2, count: u32, color: u32, kind: ParticleKind) -> Self {
        SimEvent::ParticleBurst {
            pos,
            count,
            color,
            kind,
        }
    }

    /// True for events that only exist to look nice
    pub fn is_cosmetic(&self) -> bool {
        !matches!(self, SimEvent::Alert(_) | SimEvent::Notification(_))
    }
}

/// Transition requests from entity behaviour to the session state machine
#[derive(Debug, Clone)]
pub enum AiEvent {
    /// A fish reached the hook and left the pool
    HookReached(SwimmingFish),
    /// A predator took the hook itself and left the pool
    PredatorHooked(Predator),
    /// A predator entered Attack against the hook
    PredatorAttack { predator_id: u32, name: &'static str },
    /// A predator struck the boat or an idle angler in low visibility
    StealthAttack { name: &'static str },
}

pub mod colors {
    pub const WATER: u32 = 0x5dade2;
    pub const GOLD: u32 = 0xffd700;
    pub const GREEN: u32 = 0x2ecc71;
    pub const BLUE: u32 = 0x3b82f6;
    pub const BUBBLE: u32 = 0x88ccff;
    pub const BLOOD: u32 = 0xc0392b;
}
