//! Weather, day/night and celestial events

use rand::Rng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::events::SimEvent;
use crate::catalog::Rarity;
use crate::tuning::Tuning;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Weather {
    Clear,
    Cloudy,
    Rain,
    Storm,
    Fog,
}

/// Weighted roll table
const WEATHER_TABLE: [(Weather, u32); 5] = [
    (Weather::Clear, 3),
    (Weather::Cloudy, 2),
    (Weather::Rain, 1),
    (Weather::Storm, 1),
    (Weather::Fog, 1),
];

impl Weather {
    pub fn visibility(&self) -> f32 {
        match self {
            Weather::Clear => 1.0,
            Weather::Cloudy => 0.85,
            Weather::Rain => 0.6,
            Weather::Storm => 0.4,
            Weather::Fog => 0.3,
        }
    }

    /// Predators can strike unseen
    pub fn is_low_visibility(&self) -> bool {
        matches!(self, Weather::Rain | Weather::Storm | Weather::Fog)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Weather::Clear => "clear",
            Weather::Cloudy => "cloudy",
            Weather::Rain => "rain",
            Weather::Storm => "storm",
            Weather::Fog => "fog",
        }
    }

    fn roll(rng: &mut Pcg32) -> Weather {
        let total: u32 = WEATHER_TABLE.iter().map(|(_, w)| w).sum();
        let mut r = rng.random_range(0..total);
        for (weather, w) in WEATHER_TABLE {
            if r < w {
                return weather;
            }
            r -= w;
        }
        Weather::Clear
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CelestialKind {
    RedSun,
    TentacleSun,
    GreenMoon,
    BloodMoon,
}

impl CelestialKind {
    pub fn name(&self) -> &'static str {
        match self {
            CelestialKind::RedSun => "Red Sun",
            CelestialKind::TentacleSun => "Tentacle Sun",
            CelestialKind::GreenMoon => "Green Moon",
            CelestialKind::BloodMoon => "Blood Moon",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CelestialEvent {
    pub kind: CelestialKind,
    pub elapsed: f32,
    pub duration: f32,
}

impl CelestialEvent {
    /// 0..1 intensity, ramping in and out over `fade` frames
    pub fn intensity(&self, fade: f32) -> f32 {
        if fade <= 0.0 {
            return 1.0;
        }
        let remaining = (self.duration - self.elapsed).max(0.0);
        (self.elapsed / fade).min(remaining / fade).clamp(0.0, 1.0)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Environment {
    pub weather: Weather,
    pub previous_weather: Weather,
    /// 0..1 blend from previous to current weather
    pub transition: f32,
    pub weather_timer: f32,
    /// Frames into the current day or night
    pub cycle_frame: f32,
    pub is_night: bool,
    pub celestial: Option<CelestialEvent>,
    fade: f32,
}

impl Environment {
    pub fn new(tuning: &Tuning) -> Self {
        Self {
            weather: Weather::Clear,
            previous_weather: Weather::Clear,
            transition: 1.0,
            weather_timer: tuning.weather_min,
            cycle_frame: 0.0,
            is_night: false,
            celestial: None,
            fade: tuning.celestial_fade,
        }
    }

    /// Advance by `frames`, pushing notifications for new events
    pub fn update(&mut self, rng: &mut Pcg32, tuning: &Tuning, frames: f32, events: &mut Vec<SimEvent>) {
        self.fade = tuning.celestial_fade;

        // Weather
        if self.transition < 1.0 {
            let step = if tuning.weather_transition > 0.0 {
                frames / tuning.weather_transition
            } else {
                1.0
            };
            self.transition = (self.transition + step).min(1.0);
        }
        self.weather_timer -= frames;
        if self.weather_timer <= 0.0 {
            let next = Weather::roll(rng);
            let (lo, hi) = (tuning.weather_min, tuning.weather_max.max(tuning.weather_min));
            self.weather_timer = rng.random_range(lo..=hi);
            if next != self.weather {
                log::debug!("Weather {} -> {}", self.weather.as_str(), next.as_str());
                self.previous_weather = self.weather;
                self.weather = next;
                self.transition = 0.0;
            }
        }

        // Day/night
        self.cycle_frame += frames;
        if self.cycle_frame >= tuning.day_length {
            self.cycle_frame -= tuning.day_length;
            self.is_night = !self.is_night;
            log::debug!("{}", if self.is_night { "Night falls" } else { "Day breaks" });

            if self.celestial.is_none() && rng.random::<f32>() < tuning.celestial_chance {
                let kind = match (self.is_night, rng.random_bool(0.5)) {
                    (false, true) => CelestialKind::RedSun,
                    (false, false) => CelestialKind::TentacleSun,
                    (true, true) => CelestialKind::GreenMoon,
                    (true, false) => CelestialKind::BloodMoon,
                };
                let (lo, hi) = (tuning.celestial_min, tuning.celestial_max.max(tuning.celestial_min));
                let duration = rng.random_range(lo..=hi);
                log::info!("Celestial event: {} for {} frames", kind.name(), duration);
                self.celestial = Some(CelestialEvent {
                    kind,
                    elapsed: 0.0,
                    duration,
                });
                events.push(SimEvent::Notification(format!("A {} rises!", kind.name())));
            }
        }

        // Celestial
        if let Some(event) = &mut self.celestial {
            event.elapsed += frames;
            if event.elapsed >= event.duration {
                log::debug!("Celestial event {} ended", event.kind.name());
                self.celestial = None;
            }
        }
    }

    /// Current visibility, blended across a weather change
    pub fn visibility(&self) -> f32 {
        let from = self.previous_weather.visibility();
        let to = self.weather.visibility();
        from + (to - from) * self.transition
    }

    pub fn is_low_visibility(&self) -> bool {
        self.weather.is_low_visibility()
    }

    /// Spawn-weight multiplier the active celestial event gives a rarity tier
    pub fn celestial_factor(&self, rarity: Rarity) -> f32 {
        let Some(event) = self.celestial else {
            return 1.0;
        };
        let f = event.intensity(self.fade);
        match (rarity, event.kind) {
            (Rarity::Rare, CelestialKind::RedSun) => 1.0 + f * 1.5,
            (Rarity::Legendary, CelestialKind::GreenMoon) => 1.0 + f * 2.5,
            (Rarity::Legendary, CelestialKind::BloodMoon) => 1.0 + f * 1.5,
            (Rarity::UltraRare, CelestialKind::TentacleSun) => 1.0 + f * 3.5,
            (Rarity::UltraRare, CelestialKind::BloodMoon) => 1.0 + f * 2.0,
            _ => 1.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    #[test]
    fn test_day_night_flips() {
        let tuning = Tuning::default();
        let mut env = Environment::new(&tuning);
        let mut rng = Pcg32::seed_from_u64(1);
        let mut events = Vec::new();
        for _ in 0..(tuning.day_length as usize + 1) {
            env.update(&mut rng, &tuning, 1.0, &mut events);
        }
        assert!(env.is_night);
    }

    #[test]
    fn test_inverted_durations_roll_the_minimum() {
        let tuning = Tuning {
            weather_min: 900.0,
            weather_max: 300.0,
            celestial_chance: 1.0,
            celestial_min: 500.0,
            celestial_max: 100.0,
            day_length: 2.0,
            ..Tuning::default()
        };
        let mut env = Environment::new(&tuning);
        env.weather_timer = 1.0;
        let mut rng = Pcg32::seed_from_u64(3);
        let mut events = Vec::new();
        env.update(&mut rng, &tuning, 2.0, &mut events);
        assert_eq!(env.weather_timer, 900.0);
        assert_eq!(env.celestial.map(|c| c.duration), Some(500.0));
    }

    #[test]
    fn test_celestial_factor_only_boosts_matching_tier() {
        let tuning = Tuning::default();
        let mut env = Environment::new(&tuning);
        env.celestial = Some(CelestialEvent {
            kind: CelestialKind::BloodMoon,
            elapsed: 500.0,
            duration: 1000.0,
        });
        assert_eq!(env.celestial_factor(Rarity::Common), 1.0);
        assert_eq!(env.celestial_factor(Rarity::Rare), 1.0);
        assert!((env.celestial_factor(Rarity::UltraRare) - 3.0).abs() < 1e-5);
    }

    #[test]
    fn test_intensity_fades_in_and_out() {
        let event = CelestialEvent {
            kind: CelestialKind::RedSun,
            elapsed: 30.0,
            duration: 1000.0,
        };
        assert!((event.intensity(120.0) - 0.25).abs() < 1e-6);
        let ending = CelestialEvent {
            elapsed: 940.0,
            ..event
        };
        assert!((ending.intensity(120.0) - 0.5).abs() < 1e-6);
    }

    #[test]
    fn test_weather_rolls_eventually() {
        let tuning = Tuning {
            weather_min: 10.0,
            weather_max: 20.0,
            ..Default::default()
        };
        let mut env = Environment::new(&tuning);
        env.weather_timer = 10.0;
        let mut rng = Pcg32::seed_from_u64(42);
        let mut events = Vec::new();
        let mut seen_other = false;
        for _ in 0..2000 {
            env.update(&mut rng, &tuning, 1.0, &mut events);
            seen_other |= env.weather != Weather::Clear;
        }
        assert!(seen_other);
        assert!((0.0..=1.0).contains(&env.visibility()));
    }
}
