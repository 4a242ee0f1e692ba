//! Game balance
//!
//! Every number the simulation uses that is a matter of feel rather than
//! structure lives here. Rates and timers are per frame at `SIM_HZ`; distances
//! are world pixels with y growing downward.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::platform;

/// Errors raised while loading or validating a balance file
#[derive(Debug, Error)]
pub enum TuningError {
    /// JSON could not be parsed into a `Tuning`
    #[error("failed to parse tuning: {0}")]
    Parse(#[from] serde_json::Error),

    /// A field parsed but holds a value the simulation cannot run with
    #[error("invalid tuning value for '{field}': {reason}")]
    Invalid { field: &'static str, reason: String },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    // === World ===
    pub world_width: f32,
    /// Width of the visible window centered on the angler
    pub view_width: f32,
    /// Water surface line
    pub water_y: f32,
    /// Lowest swimmable y
    pub water_bottom: f32,
    /// Where the angler's feet rest on the pier
    pub pier_y: f32,
    pub start_x: f32,
    pub walk_speed: f32,
    pub swim_speed: f32,
    pub boat_speed: f32,
    /// Left end of the pier; open water beyond it is reached by boat or swimming
    pub pier_start_x: f32,
    /// Where the boat is moored
    pub boat_x: f32,
    pub boarding_frames: f32,
    /// Bait shop landmark. Left of it is open water, right of it the beach.
    pub shop_x: f32,
    pub npc_x: f32,
    pub interact_range: f32,
    /// Distance from the shop at which location effects saturate
    pub location_span: f32,

    // === Cast & rope ===
    pub cast_launch_vy: f32,
    pub cast_gravity: f32,
    /// Cast meter change per frame
    pub cast_charge_rate: f32,
    pub default_cast_distance: f32,
    pub default_hook_depth: f32,
    pub hook_sink_rate: f32,
    pub rope_slack: f32,
    pub rope_passes: u32,
    /// Allowed link error after relaxation, as a fraction of segment length
    pub rope_tolerance: f32,
    pub rope_damping: f32,
    pub rope_gravity: f32,
    pub rope_min_segment: f32,

    // === Fish ===
    pub max_fish: usize,
    pub fish_spawn_chance: f32,
    pub cull_margin: f32,
    pub capture_range: f32,
    pub approach_spawn_chance: f32,
    pub approach_speed_mult: f32,
    pub bite_distance: f32,
    pub junk_chance: f32,
    pub wait_min: f32,
    pub wait_spread: f32,
    pub bite_window_min: f32,
    pub bite_window_spread: f32,

    // === Predators ===
    pub max_predators: usize,
    pub predator_spawn_chance: f32,
    pub predator_attack_range: f32,
    pub predator_attack_cooldown: f32,
    pub predator_attack_frames: f32,
    pub predator_hurt_frames: f32,
    pub predator_flee_frames: f32,
    pub predator_death_frames: f32,
    pub predator_bite_chance: f32,
    pub scare_speed_mult: f32,
    pub stealth_attack_chance: f32,
    pub stealth_range: f32,

    // === Outcome displays ===
    pub missed_frames: f32,
    pub float_up_frames: f32,
    pub carry_frames: f32,
    pub reveal_weight_frames: f32,
    pub reveal_length_frames: f32,
    pub reveal_stars_frames: f32,
    pub reveal_hold_frames: f32,

    // === Economy ===
    pub demand_step: f32,
    pub demand_floor: f32,
    pub demand_recovery_frames: f32,
    /// Session catches only count for the leaderboard this long after start
    pub session_cutoff_secs: f64,
    pub chum_drop_chance: f32,

    // === Tools ===
    pub harpoon_range: f32,
    pub harpoon_cooldown: f32,
    pub net_frames: f32,
    pub net_cooldown: f32,
    pub max_npc_requests: usize,

    // === Environment ===
    pub day_length: f32,
    pub weather_min: f32,
    pub weather_max: f32,
    pub weather_transition: f32,
    pub celestial_chance: f32,
    pub celestial_min: f32,
    pub celestial_max: f32,
    pub celestial_fade: f32,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            world_width: 4800.0,
            view_width: 960.0,
            water_y: 300.0,
            water_bottom: 640.0,
            pier_y: 262.0,
            start_x: 3000.0,
            walk_speed: 3.0,
            swim_speed: 1.5,
            boat_speed: 2.0,
            pier_start_x: 1800.0,
            boat_x: 1760.0,
            boarding_frames: 45.0,
            shop_x: 3600.0,
            npc_x: 3320.0,
            interact_range: 80.0,
            location_span: 3840.0,

            cast_launch_vy: 6.0,
            cast_gravity: 0.35,
            cast_charge_rate: 0.018,
            default_cast_distance: 220.0,
            default_hook_depth: 90.0,
            hook_sink_rate: 0.4,
            rope_slack: 1.15,
            rope_passes: 3,
            rope_tolerance: 0.01,
            rope_damping: 0.98,
            rope_gravity: 0.15,
            rope_min_segment: 6.0,

            max_fish: 10,
            fish_spawn_chance: 0.012,
            cull_margin: 180.0,
            capture_range: 300.0,
            approach_spawn_chance: 0.15,
            approach_speed_mult: 1.5,
            bite_distance: 8.0,
            junk_chance: 0.08,
            wait_min: 30.0,
            wait_spread: 50.0,
            bite_window_min: 120.0,
            bite_window_spread: 80.0,

            max_predators: 2,
            predator_spawn_chance: 0.0015,
            predator_attack_range: 40.0,
            predator_attack_cooldown: 300.0,
            predator_attack_frames: 40.0,
            predator_hurt_frames: 30.0,
            predator_flee_frames: 150.0,
            predator_death_frames: 90.0,
            predator_bite_chance: 0.002,
            scare_speed_mult: 1.8,
            stealth_attack_chance: 0.0005,
            stealth_range: 220.0,

            missed_frames: 100.0,
            float_up_frames: 120.0,
            carry_frames: 120.0,
            reveal_weight_frames: 60.0,
            reveal_length_frames: 60.0,
            reveal_stars_frames: 80.0,
            reveal_hold_frames: 120.0,

            demand_step: 0.12,
            demand_floor: 0.3,
            demand_recovery_frames: 600.0,
            session_cutoff_secs: 20.0 * 60.0,
            chum_drop_chance: 0.05,

            harpoon_range: 48.0,
            harpoon_cooldown: 45.0,
            net_frames: 120.0,
            net_cooldown: 600.0,
            max_npc_requests: 3,

            day_length: 7200.0,
            weather_min: 3600.0,
            weather_max: 10800.0,
            weather_transition: 300.0,
            celestial_chance: 1.0 / 30.0,
            celestial_min: 800.0,
            celestial_max: 1400.0,
            celestial_fade: 120.0,
        }
    }
}

impl Tuning {
    /// LocalStorage key holding a balance override on the web
    pub const STORAGE_KEY: &'static str = "ocean_angler_tuning";

    /// Balance override from LocalStorage, or the defaults
    pub fn load() -> Self {
        Self::from_override(platform::storage_get(Self::STORAGE_KEY).as_deref())
    }

    /// Apply an optional balance file, keeping the defaults if it is absent or rejected
    pub fn from_override(json: Option<&str>) -> Self {
        let Some(json) = json else {
            return Self::default();
        };
        match Self::from_json(json) {
            Ok(tuning) => {
                log::info!("Loaded tuning override");
                tuning
            }
            Err(e) => {
                log::warn!("Ignoring tuning override: {}", e);
                Self::default()
            }
        }
    }

    /// Parse a balance file. Missing fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self, TuningError> {
        let tuning: Tuning = serde_json::from_str(json)?;
        tuning.validate()?;
        Ok(tuning)
    }

    /// Reject values the simulation cannot run with
    pub fn validate(&self) -> Result<(), TuningError> {
        let positive = [
            ("world_width", self.world_width),
            ("view_width", self.view_width),
            ("location_span", self.location_span),
            ("cast_launch_vy", self.cast_launch_vy),
            ("cast_gravity", self.cast_gravity),
            ("cast_charge_rate", self.cast_charge_rate),
            ("rope_min_segment", self.rope_min_segment),
            ("rope_tolerance", self.rope_tolerance),
            ("day_length", self.day_length),
            ("demand_recovery_frames", self.demand_recovery_frames),
        ];
        for (field, value) in positive {
            if value.is_nan() || value <= 0.0 {
                return Err(invalid(field, format!("must be positive, got {value}")));
            }
        }

        if self.water_bottom <= self.water_y {
            return Err(invalid(
                "water_bottom",
                format!("must lie below water_y ({} <= {})", self.water_bottom, self.water_y),
            ));
        }
        if self.pier_y >= self.water_y {
            return Err(invalid("pier_y", "the pier must stand above the water".to_string()));
        }
        if self.rope_passes == 0 {
            return Err(invalid("rope_passes", "at least one relaxation pass is required".to_string()));
        }
        if self.rope_slack < 1.0 {
            return Err(invalid("rope_slack", format!("must be at least 1.0, got {}", self.rope_slack)));
        }

        let chances = [
            ("fish_spawn_chance", self.fish_spawn_chance),
            ("approach_spawn_chance", self.approach_spawn_chance),
            ("junk_chance", self.junk_chance),
            ("predator_spawn_chance", self.predator_spawn_chance),
            ("predator_bite_chance", self.predator_bite_chance),
            ("stealth_attack_chance", self.stealth_attack_chance),
            ("chum_drop_chance", self.chum_drop_chance),
            ("celestial_chance", self.celestial_chance),
        ];
        for (field, value) in chances {
            if !(0.0..=1.0).contains(&value) {
                return Err(invalid(field, format!("probability out of range: {value}")));
            }
        }

        if !(0.0..=1.0).contains(&self.demand_floor) {
            return Err(invalid("demand_floor", format!("must be within [0, 1], got {}", self.demand_floor)));
        }
        if self.weather_max < self.weather_min || self.celestial_max < self.celestial_min {
            return Err(invalid("weather_max", "maximum duration below minimum".to_string()));
        }

        Ok(())
    }
}

fn invalid(field: &'static str, reason: String) -> TuningError {
    log::warn!("Rejected tuning field {}: {}", field, reason);
    TuningError::Invalid { field, reason }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_validate() {
        assert!(Tuning::default().validate().is_ok());
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let tuning = Tuning::from_json(r#"{ "max_fish": 4, "junk_chance": 0.0 }"#).unwrap();
        assert_eq!(tuning.max_fish, 4);
        assert_eq!(tuning.junk_chance, 0.0);
        assert_eq!(tuning.rope_passes, Tuning::default().rope_passes);
    }

    #[test]
    fn test_override_falls_back_to_defaults() {
        assert_eq!(Tuning::from_override(None), Tuning::default());
        assert_eq!(Tuning::from_override(Some("not json")), Tuning::default());
        assert_eq!(Tuning::from_override(Some(r#"{ "rope_passes": 0 }"#)), Tuning::default());
        assert_eq!(Tuning::from_override(Some(r#"{ "max_fish": 3 }"#)).max_fish, 3);
    }

    #[test]
    fn test_native_load_uses_defaults() {
        assert_eq!(Tuning::load(), Tuning::default());
    }

    #[test]
    fn test_malformed_json_is_parse_error() {
        let err = Tuning::from_json("{ max_fish: ").unwrap_err();
        assert!(matches!(err, TuningError::Parse(_)));
    }

    #[test]
    fn test_zero_rope_passes_rejected() {
        let err = Tuning::from_json(r#"{ "rope_passes": 0 }"#).unwrap_err();
        assert!(matches!(err, TuningError::Invalid { field: "rope_passes", .. }));
    }

    #[test]
    fn test_inverted_water_rejected() {
        let tuning = Tuning {
            water_bottom: 100.0,
            ..Default::default()
        };
        assert!(matches!(
            tuning.validate(),
            Err(TuningError::Invalid { field: "water_bottom", .. })
        ));
    }

    #[test]
    fn test_bad_probability_rejected() {
        let tuning = Tuning {
            junk_chance: 1.5,
            ..Default::default()
        };
        assert!(tuning.validate().is_err());
    }
}
