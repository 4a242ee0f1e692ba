//! Player settings and preferences
//!
//! Persisted in LocalStorage on the web, separate from any session data.

use serde::{Deserialize, Serialize};

use crate::platform;
use crate::sim::SimEvent;

/// Player settings/preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Name shown on leaderboards (blank falls back to a generated one)
    pub player_name: String,
    /// Selected character portrait
    pub character: usize,

    // === Visual Effects ===
    /// Screen shake on predator hits and line snaps
    pub screen_shake: bool,
    /// Splash, sparkle, bubble and blood particles
    pub particles: bool,

    // === Accessibility ===
    /// Reduced motion (no shake, fewer particles)
    pub reduced_motion: bool,

    // === Leaderboard ===
    /// Seconds between leaderboard refreshes
    pub leaderboard_refresh_secs: f32,
    /// Base URL for score submission and leaderboard reads; empty disables both
    pub leaderboard_endpoint: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            player_name: String::new(),
            character: 0,

            screen_shake: true,
            particles: true,

            reduced_motion: false,

            leaderboard_refresh_secs: 60.0,
            leaderboard_endpoint: String::new(),
        }
    }
}

impl Settings {
    /// LocalStorage key
    const STORAGE_KEY: &'static str = "ocean_angler_settings";

    /// Effective screen shake (respects reduced_motion)
    pub fn effective_screen_shake(&self) -> bool {
        self.screen_shake && !self.reduced_motion
    }

    pub fn leaderboard_enabled(&self) -> bool {
        !self.leaderboard_endpoint.is_empty()
    }

    /// Drop render events the player has turned off
    pub fn filter_events(&self, events: Vec<SimEvent>) -> Vec<SimEvent> {
        let shake = self.effective_screen_shake();
        events
            .into_iter()
            .filter_map(|event| match event {
                SimEvent::ScreenShake { .. } if !shake => None,
                SimEvent::ParticleBurst { .. } if !self.particles => None,
                SimEvent::ParticleBurst {
                    pos,
                    count,
                    color,
                    kind,
                } if self.reduced_motion => Some(SimEvent::ParticleBurst {
                    pos,
                    count: count.div_ceil(2),
                    color,
                    kind,
                }),
                other => Some(other),
            })
            .collect()
    }

    /// Load settings from LocalStorage (defaults when missing or unreadable)
    pub fn load() -> Self {
        if let Some(json) = platform::storage_get(Self::STORAGE_KEY) {
            match serde_json::from_str(&json) {
                Ok(settings) => {
                    log::info!("Loaded settings from LocalStorage");
                    return settings;
                }
                Err(e) => log::warn!("Ignoring stored settings: {}", e),
            }
        }

        log::info!("Using default settings");
        Self::default()
    }

    /// Save settings to LocalStorage (no-op on native)
    pub fn save(&self) {
        if let Ok(json) = serde_json::to_string(self) {
            if platform::storage_set(Self::STORAGE_KEY, &json) {
                log::info!("Settings saved");
            }
        }
    }
}
