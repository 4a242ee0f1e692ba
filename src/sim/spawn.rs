//! Species selection and pool spawning

use glam::Vec2;
use rand::Rng;
use rand_pcg::Pcg32;

use super::state::{Predator, PredatorState, SessionState, SwimmingFish};
use crate::catalog::{self, Lure, Rarity, SPECIES};
use crate::tuning::Tuning;

/// Where the angler stands relative to the bait shop, in [-1, 1]
///
/// Positive values lie toward the open water and the abyss, negative values
/// toward the shallow beach.
pub fn location_ratio(x: f32, tuning: &Tuning) -> f32 {
    let toward_abyss = ((tuning.shop_x - x).max(0.0) / tuning.location_span).min(1.0);
    let toward_beach = ((x - tuning.shop_x).max(0.0) / tuning.location_span).min(1.0);
    toward_abyss - toward_beach
}

/// Everything besides location that reshapes the species table
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WeightModifiers {
    /// Index into `catalog::LURES`
    pub lure: usize,
    pub wisdom_boost: f32,
    pub chum_rarity_boost: f32,
    pub celestial_rare: f32,
    pub celestial_legendary: f32,
    pub celestial_ultra: f32,
}

impl Default for WeightModifiers {
    fn default() -> Self {
        Self {
            lure: 0,
            wisdom_boost: 1.0,
            chum_rarity_boost: 1.0,
            celestial_rare: 1.0,
            celestial_legendary: 1.0,
            celestial_ultra: 1.0,
        }
    }
}

impl WeightModifiers {
    pub fn from_state(state: &SessionState) -> Self {
        let env = &state.environment;
        Self {
            lure: state.inventory.lure,
            wisdom_boost: state.attributes.wisdom_boost(),
            chum_rarity_boost: state.chum.rarity_boost(),
            celestial_rare: env.celestial_factor(Rarity::Rare),
            celestial_legendary: env.celestial_factor(Rarity::Legendary),
            celestial_ultra: env.celestial_factor(Rarity::UltraRare),
        }
    }

    fn celestial(&self, rarity: Rarity) -> f32 {
        match rarity {
            Rarity::Rare => self.celestial_rare,
            Rarity::Legendary => self.celestial_legendary,
            Rarity::UltraRare => self.celestial_ultra,
            _ => 1.0,
        }
    }
}

/// Location multiplier for one rarity tier
fn location_factor(rarity: Rarity, location: f32) -> f32 {
    if location < -0.1 {
        let r = -location;
        match rarity {
            Rarity::UltraRare => (1.0 - r * 3.0).max(0.01),
            Rarity::Legendary => (1.0 - r * 2.5).max(0.05),
            Rarity::Rare => (1.0 - r * 2.0).max(0.1),
            Rarity::Uncommon => 1.0 + r * 0.5,
            Rarity::Common => 1.0 + r * 2.0,
        }
    } else {
        let r = location.max(0.0);
        match rarity {
            Rarity::UltraRare => 1.0 + r * 25.0,
            Rarity::Legendary => 1.0 + r * 15.0,
            Rarity::Rare => 1.0 + r * 8.0,
            Rarity::Uncommon => 1.0 + r * 3.0,
            Rarity::Common => (1.0 - r * 0.5).max(0.3),
        }
    }
}

/// Adjusted spawn weight for every species, in catalog order
pub fn species_weights(location: f32, mods: &WeightModifiers) -> Vec<f32> {
    let lure = catalog::lure(mods.lure);
    SPECIES
        .iter()
        .map(|sp| {
            let mut w = sp.weight * location_factor(sp.rarity, location);
            if sp.rarity.is_rare_plus() {
                w *= lure.rarity_boost * mods.wisdom_boost * mods.chum_rarity_boost * mods.celestial(sp.rarity);
            } else if sp.rarity == Rarity::Uncommon {
                w *= 1.0 + (mods.wisdom_boost - 1.0) * 0.5;
            }
            if lure.targets(sp.name) {
                w *= lure.target_bonus;
            }
            w
        })
        .collect()
}

/// Share of the table held by rare, legendary and ultra rare species
pub fn rare_plus_mass(weights: &[f32]) -> f32 {
    let total: f32 = weights.iter().sum();
    if total <= 0.0 {
        return 0.0;
    }
    let rare: f32 = weights
        .iter()
        .zip(SPECIES)
        .filter(|(_, sp)| sp.rarity.is_rare_plus())
        .map(|(w, _)| w)
        .sum();
    rare / total
}

/// Standard weighted draw. Falls back to the first entry on an empty table.
pub fn pick_weighted(weights: &[f32], rng: &mut Pcg32) -> usize {
    let total: f32 = weights.iter().sum();
    if total <= 0.0 {
        return 0;
    }
    let mut r = rng.random::<f32>() * total;
    for (i, w) in weights.iter().enumerate() {
        r -= w;
        if r <= 0.0 {
            return i;
        }
    }
    weights.len() - 1
}

/// Size multiplier, rolled independently of the species
pub fn roll_size(species: usize, location: f32, lure: &Lure, rng: &mut Pcg32) -> f32 {
    let sp = catalog::species(species);
    let skew = rng.random::<f32>() * rng.random::<f32>();
    let base = 0.5 + skew * 4.5;
    let abyss = location.max(0.0);
    let beach = (-location).max(0.0);
    let beach_reduction = if beach > 0.1 {
        (1.0 - beach * 0.7).max(0.3)
    } else {
        1.0
    };
    (base * (1.0 + abyss * 0.8) + lure.size_boost) * sp.base_scale.unwrap_or(1.0) * beach_reduction
}

fn random_depth(min_depth: f32, tuning: &Tuning, rng: &mut Pcg32) -> f32 {
    let range = tuning.water_bottom - tuning.water_y;
    let min_y = tuning.water_y + range * min_depth;
    let max_y = tuning.water_bottom - 20.0;
    (min_y + rng.random::<f32>() * (max_y - min_y).max(10.0)).min(tuning.water_bottom)
}

/// Build a fish of a freshly drawn species at `pos`
fn new_fish(state: &mut SessionState, pos: Vec2, direction: f32) -> SwimmingFish {
    let location = location_ratio(state.angler.pos.x, &state.tuning);
    let weights = species_weights(location, &WeightModifiers::from_state(state));
    let species = pick_weighted(&weights, &mut state.rng);
    let lure = catalog::lure(state.inventory.lure);
    let size = roll_size(species, location, lure, &mut state.rng);
    let sp = catalog::species(species);
    let id = state.next_entity_id();
    let rng = &mut state.rng;

    SwimmingFish {
        id,
        pos,
        base_y: pos.y,
        direction,
        speed: sp.speed * (0.7 + rng.random::<f32>() * 0.6),
        species,
        size,
        approaching_hook: false,
        dir_change_timer: 60.0 + rng.random::<f32>() * 120.0,
        wobble_phase: rng.random::<f32>() * std::f32::consts::TAU,
        wobble_amp: 2.0 + rng.random::<f32>() * 4.0,
    }
}

/// Spawn a wandering fish just outside the view
pub fn spawn_fish(state: &mut SessionState) {
    let direction = if state.rng.random_bool(0.5) { 1.0 } else { -1.0 };
    let half_view = state.tuning.view_width * 0.5 + 100.0;
    let x = if direction > 0.0 {
        state.angler.pos.x - half_view - 80.0
    } else {
        state.angler.pos.x + half_view + 80.0
    };
    // Depth depends on the species, so draw it after the species is known
    let mut fish = new_fish(state, Vec2::new(x, state.tuning.water_y), direction);
    let min_depth = catalog::species(fish.species).min_depth;
    fish.pos.y = random_depth(min_depth, &state.tuning, &mut state.rng);
    fish.base_y = fish.pos.y;
    state.fish.push(fish);
}

/// Spawn a fish near the hook that is already heading for it
pub fn spawn_approaching_fish(state: &mut SessionState, hook: Vec2) -> u32 {
    let side = if state.rng.random_bool(0.5) { 1.0 } else { -1.0 };
    let offset = 200.0 + state.rng.random::<f32>() * 100.0;
    let dy = (state.rng.random::<f32>() - 0.5) * 80.0;
    let y = (hook.y + dy).clamp(state.tuning.water_y + 15.0, state.tuning.water_bottom);
    let mut fish = new_fish(state, Vec2::new(hook.x + side * offset, y), -side);
    fish.approaching_hook = true;
    let id = fish.id;
    state.fish.push(fish);
    id
}

/// Spawn a patrolling predator just outside the view
pub fn spawn_predator(state: &mut SessionState) {
    let weights: Vec<f32> = catalog::PREDATORS
        .iter()
        .map(|p| match p.rarity {
            Rarity::Common | Rarity::Uncommon => 3.0,
            Rarity::Rare => 2.0,
            _ => 1.0,
        })
        .collect();
    let kind_idx = pick_weighted(&weights, &mut state.rng);
    let kind = catalog::predator(kind_idx);
    let direction = if state.rng.random_bool(0.5) { 1.0 } else { -1.0 };
    let half_view = state.tuning.view_width * 0.5 + 100.0;
    let x = if direction > 0.0 {
        state.angler.pos.x - half_view - 120.0
    } else {
        state.angler.pos.x + half_view + 120.0
    };
    let y = random_depth(0.35, &state.tuning, &mut state.rng);
    let id = state.next_entity_id();
    let dir_change_timer = 120.0 + state.rng.random::<f32>() * 180.0;
    log::debug!("Predator {} #{} spawned at x={:.0}", kind.name, id, x);

    state.predators.push(Predator {
        id,
        kind: kind_idx,
        pos: Vec2::new(x, y),
        base_y: y,
        direction,
        speed: kind.speed,
        state: PredatorState::Patrol,
        state_timer: 0.0,
        health: kind.health,
        opacity: 1.0,
        attack_cooldown: 0.0,
        dir_change_timer,
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    #[test]
    fn test_location_ratio_bounds() {
        let t = Tuning::default();
        assert_eq!(location_ratio(t.shop_x, &t), 0.0);
        assert_eq!(location_ratio(-1.0e6, &t), 1.0);
        assert_eq!(location_ratio(1.0e6, &t), -1.0);
    }

    #[test]
    fn test_abyss_favours_rare() {
        let mods = WeightModifiers::default();
        let shop = rare_plus_mass(&species_weights(0.0, &mods));
        let abyss = rare_plus_mass(&species_weights(1.0, &mods));
        let beach = rare_plus_mass(&species_weights(-1.0, &mods));
        assert!(abyss > shop);
        assert!(beach < shop);
    }

    #[test]
    fn test_wisdom_increases_rare_mass() {
        let low = WeightModifiers::default();
        let high = WeightModifiers {
            wisdom_boost: 1.5,
            ..Default::default()
        };
        for loc in [-1.0, -0.5, 0.0, 0.5, 1.0] {
            let a = rare_plus_mass(&species_weights(loc, &low));
            let b = rare_plus_mass(&species_weights(loc, &high));
            assert!(b > a, "location {loc}: {b} <= {a}");
        }
    }

    #[test]
    fn test_lure_target_bonus() {
        let lure = catalog::LURES
            .iter()
            .position(|l| l.name == "Kraken Bait")
            .unwrap();
        let whale = catalog::species_index("Whale").unwrap();
        let plain = species_weights(0.5, &WeightModifiers::default());
        let baited = species_weights(
            0.5,
            &WeightModifiers {
                lure,
                ..Default::default()
            },
        );
        assert!(baited[whale] > plain[whale] * 4.0);
    }

    #[test]
    fn test_pick_weighted_respects_zero_weights() {
        let mut rng = Pcg32::seed_from_u64(9);
        let weights = [0.0, 0.0, 5.0, 0.0];
        for _ in 0..100 {
            assert_eq!(pick_weighted(&weights, &mut rng), 2);
        }
    }

    #[test]
    fn test_sizes_positive() {
        let mut rng = Pcg32::seed_from_u64(5);
        for i in 0..SPECIES.len() {
            for loc in [-1.0, 0.0, 1.0] {
                assert!(roll_size(i, loc, catalog::lure(0), &mut rng) > 0.0);
            }
        }
    }

    #[test]
    fn test_spawned_fish_off_view() {
        let mut state = SessionState::new(11);
        spawn_fish(&mut state);
        let fish = &state.fish[0];
        let half = state.tuning.view_width * 0.5;
        assert!((fish.pos.x - state.angler.pos.x).abs() > half);
        assert!(fish.pos.y > state.tuning.water_y);
    }
}
