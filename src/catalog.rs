//! Static reference data
//!
//! Species, junk, predators and equipment are immutable tables with process
//! lifetime. The session only ever stores indices into them; an index that is
//! out of range is a programming error and panics on lookup.

use serde::{Deserialize, Serialize};

/// Rarity tiers, ordered from most to least common
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Rarity {
    Common,
    Uncommon,
    Rare,
    Legendary,
    UltraRare,
}

impl Rarity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Rarity::Common => "common",
            Rarity::Uncommon => "uncommon",
            Rarity::Rare => "rare",
            Rarity::Legendary => "legendary",
            Rarity::UltraRare => "ultra_rare",
        }
    }

    /// Rare, legendary and ultra rare
    pub fn is_rare_plus(&self) -> bool {
        *self >= Rarity::Rare
    }

    /// Sell price multiplier
    pub fn price_multiplier(&self) -> f32 {
        match self {
            Rarity::Common => 1.0,
            Rarity::Uncommon => 1.8,
            Rarity::Rare => 3.0,
            Rarity::Legendary => 5.0,
            Rarity::UltraRare => 10.0,
        }
    }

    /// Base XP before size and intellect scaling
    pub fn base_xp(&self) -> f32 {
        match self {
            Rarity::Common => 10.0,
            Rarity::Uncommon => 25.0,
            Rarity::Rare => 50.0,
            Rarity::Legendary => 100.0,
            Rarity::UltraRare => 200.0,
        }
    }

    /// Star rating shown in the catch reveal
    pub fn stars(&self) -> u8 {
        match self {
            Rarity::Common => 1,
            Rarity::Uncommon => 2,
            Rarity::Rare => 3,
            Rarity::Legendary => 4,
            Rarity::UltraRare => 5,
        }
    }

    /// How hard a fish of this tier fights on the line
    pub fn reel_difficulty(&self) -> f32 {
        match self {
            Rarity::Common => 1.0,
            Rarity::Uncommon => 1.15,
            Rarity::Rare => 1.4,
            Rarity::Legendary => 1.8,
            Rarity::UltraRare => 2.2,
        }
    }
}

/// A catchable fish species
#[derive(Debug, Clone, Copy)]
pub struct Species {
    pub name: &'static str,
    pub rarity: Rarity,
    /// Base spawn weight
    pub weight: f32,
    pub points: u32,
    /// Minimum depth as a fraction of the water column
    pub min_depth: f32,
    pub speed: f32,
    /// Width of the catch sprite, used for the reported length
    pub catch_width: f32,
    pub idle_frames: u8,
    pub walk_frames: u8,
    /// Size scale applied on top of the rolled size (ultra rares are bigger)
    pub base_scale: Option<f32>,
}

/// Non-fish items that occasionally take the hook
#[derive(Debug, Clone, Copy)]
pub struct Junk {
    pub name: &'static str,
    pub points: u32,
    pub catch_width: f32,
}

/// Predator kinds roaming the water
#[derive(Debug, Clone, Copy)]
pub struct PredatorKind {
    pub name: &'static str,
    pub rarity: Rarity,
    pub points: u32,
    pub health: u8,
    pub speed: f32,
    /// Fish within this radius flee
    pub scare_radius: f32,
    /// Hook within this radius triggers a chase
    pub detect_range: f32,
    pub catch_width: f32,
    pub walk_frames: u8,
}

#[derive(Debug, Clone, Copy)]
pub struct Rod {
    pub name: &'static str,
    pub price: u64,
    pub catch_zone_bonus: f32,
    pub reel_speed_mult: f32,
    pub line_strength: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LureKind {
    Live,
    Artificial,
}

#[derive(Debug, Clone, Copy)]
pub struct Lure {
    pub name: &'static str,
    pub price: u64,
    pub kind: LureKind,
    pub rarity_boost: f32,
    pub size_boost: f32,
    /// Shortens the wait between approach attempts
    pub speed_boost: f32,
    pub target_species: &'static [&'static str],
    pub target_bonus: f32,
}

impl Lure {
    pub fn targets(&self, species_name: &str) -> bool {
        self.target_species.contains(&species_name)
    }
}

#[derive(Debug, Clone, Copy)]
pub struct Chum {
    pub name: &'static str,
    pub price: u64,
    /// Active duration in frames
    pub duration: f32,
    pub rarity_boost: f32,
    pub bite_speed_boost: f32,
    pub fish_attract: f32,
    pub predator_attract: f32,
    /// Cooldown in frames before another chum can be thrown
    pub cooldown: f32,
    /// Found as a catch bonus rather than bought
    pub catchable: bool,
}

const fn def_species(
    name: &'static str,
    rarity: Rarity,
    weight: f32,
    points: u32,
    min_depth: f32,
    speed: f32,
    catch_width: f32,
    walk_frames: u8,
    base_scale: Option<f32>,
) -> Species {
    Species {
        name,
        rarity,
        weight,
        points,
        min_depth,
        speed,
        catch_width,
        idle_frames: 4,
        walk_frames,
        base_scale,
    }
}

pub static SPECIES: &[Species] = &[
    def_species("Minnow", Rarity::Common, 40.0, 10, 0.15, 1.5, 24.0, 4, None),
    def_species("Perch", Rarity::Common, 30.0, 25, 0.25, 1.2, 32.0, 6, None),
    def_species("Bass", Rarity::Uncommon, 15.0, 50, 0.35, 1.0, 40.0, 4, None),
    def_species("Catfish", Rarity::Uncommon, 8.0, 75, 0.45, 0.8, 52.0, 4, None),
    def_species("Swordfish", Rarity::Rare, 4.0, 150, 0.55, 1.8, 56.0, 6, None),
    def_species("Whale", Rarity::Legendary, 1.0, 300, 0.65, 0.5, 108.0, 6, None),
    def_species("Eel", Rarity::Common, 20.0, 40, 0.3, 1.3, 60.0, 4, None),
    def_species("Salmon", Rarity::Uncommon, 12.0, 60, 0.35, 1.1, 60.0, 6, None),
    def_species("Phantom Minnow", Rarity::UltraRare, 0.3, 500, 0.55, 2.2, 24.0, 4, Some(1.8)),
    def_species("Volcanic Perch", Rarity::UltraRare, 0.25, 600, 0.6, 1.6, 32.0, 6, Some(2.0)),
    def_species("Abyssal Bass", Rarity::UltraRare, 0.2, 750, 0.65, 1.4, 40.0, 4, Some(2.2)),
    def_species("Frost Catfish", Rarity::UltraRare, 0.18, 800, 0.6, 0.9, 52.0, 4, Some(2.3)),
    def_species("Storm Swordfish", Rarity::UltraRare, 0.12, 1000, 0.7, 2.5, 56.0, 6, Some(2.0)),
    def_species("Celestial Whale", Rarity::UltraRare, 0.05, 2000, 0.75, 0.4, 108.0, 6, Some(1.5)),
    def_species("Neon Eel", Rarity::UltraRare, 0.22, 650, 0.55, 1.9, 60.0, 4, Some(2.0)),
    def_species("Golden Salmon", Rarity::UltraRare, 0.2, 700, 0.6, 1.5, 60.0, 6, Some(2.1)),
    def_species("Shadow Leviathan", Rarity::UltraRare, 0.08, 1500, 0.8, 0.6, 108.0, 6, Some(1.8)),
];

pub static JUNK: &[Junk] = &[
    Junk { name: "Old Barrel", points: 5, catch_width: 12.0 },
    Junk { name: "Wooden Box", points: 5, catch_width: 12.0 },
    Junk { name: "Treasure Chest", points: 100, catch_width: 22.0 },
];

pub static PREDATORS: &[PredatorKind] = &[
    PredatorKind {
        name: "Barracuda",
        rarity: Rarity::Uncommon,
        points: 90,
        health: 2,
        speed: 2.2,
        scare_radius: 110.0,
        detect_range: 260.0,
        catch_width: 64.0,
        walk_frames: 4,
    },
    PredatorKind {
        name: "Reef Shark",
        rarity: Rarity::Rare,
        points: 220,
        health: 3,
        speed: 1.8,
        scare_radius: 150.0,
        detect_range: 340.0,
        catch_width: 96.0,
        walk_frames: 6,
    },
    PredatorKind {
        name: "Giant Squid",
        rarity: Rarity::Legendary,
        points: 450,
        health: 5,
        speed: 1.2,
        scare_radius: 190.0,
        detect_range: 400.0,
        catch_width: 120.0,
        walk_frames: 6,
    },
];

pub static RODS: &[Rod] = &[
    Rod { name: "Bamboo Rod", price: 0, catch_zone_bonus: 0.0, reel_speed_mult: 1.0, line_strength: 1.0 },
    Rod { name: "Fiberglass Rod", price: 150, catch_zone_bonus: 0.015, reel_speed_mult: 1.1, line_strength: 1.15 },
    Rod { name: "Carbon Rod", price: 400, catch_zone_bonus: 0.025, reel_speed_mult: 1.2, line_strength: 1.3 },
    Rod { name: "Titanium Rod", price: 800, catch_zone_bonus: 0.035, reel_speed_mult: 1.35, line_strength: 1.5 },
    Rod { name: "Legendary Rod", price: 1500, catch_zone_bonus: 0.05, reel_speed_mult: 1.5, line_strength: 1.8 },
];

const fn def_lure(
    name: &'static str,
    price: u64,
    kind: LureKind,
    rarity_boost: f32,
    size_boost: f32,
    speed_boost: f32,
    target_species: &'static [&'static str],
    target_bonus: f32,
) -> Lure {
    Lure {
        name,
        price,
        kind,
        rarity_boost,
        size_boost,
        speed_boost,
        target_species,
        target_bonus,
    }
}

pub static LURES: &[Lure] = &[
    def_lure("Basic Worm", 0, LureKind::Live, 1.0, 0.0, 1.0, &[], 1.0),
    def_lure("Nightcrawler", 40, LureKind::Live, 1.0, 0.1, 1.4, &["Catfish", "Bass"], 1.5),
    def_lure("Leech", 90, LureKind::Live, 1.2, 0.2, 1.1, &["Catfish", "Eel"], 2.5),
    def_lure("Maggots", 60, LureKind::Live, 1.0, 0.0, 2.0, &["Minnow", "Perch"], 2.0),
    def_lure("Minnow Bait", 150, LureKind::Live, 1.5, 0.4, 1.0, &["Bass", "Salmon", "Swordfish"], 2.0),
    def_lure("Beginner Lure", 50, LureKind::Artificial, 1.0, 0.0, 1.2, &[], 1.0),
    def_lure("Crankbait", 120, LureKind::Artificial, 1.1, 0.2, 1.3, &["Perch", "Bass"], 2.5),
    def_lure("Silver Spoon", 100, LureKind::Artificial, 1.0, 0.1, 1.5, &["Salmon", "Minnow"], 2.0),
    def_lure("Grub Worm", 80, LureKind::Artificial, 1.1, 0.1, 1.2, &[], 1.0),
    def_lure("Spinnerbait", 200, LureKind::Artificial, 1.3, 0.3, 1.4, &["Bass", "Perch"], 2.5),
    def_lure("Deep Diver", 180, LureKind::Artificial, 1.2, 0.3, 1.0, &["Catfish", "Eel"], 2.5),
    def_lure("Golden Fly", 250, LureKind::Artificial, 2.0, 0.0, 1.0, &["Swordfish"], 2.0),
    def_lure("Glow Jig", 350, LureKind::Artificial, 1.3, 0.8, 1.1, &[], 1.0),
    def_lure("Storm Shad", 300, LureKind::Artificial, 1.0, 0.2, 2.0, &["Bass", "Salmon"], 2.0),
    def_lure("Kraken Bait", 500, LureKind::Artificial, 3.0, 0.5, 0.8, &["Whale"], 4.0),
    def_lure("Prismatic Lure", 750, LureKind::Artificial, 1.8, 0.5, 1.5, &[], 1.0),
];

const fn def_chum(
    name: &'static str,
    price: u64,
    duration: f32,
    rarity_boost: f32,
    bite_speed_boost: f32,
    fish_attract: f32,
    predator_attract: f32,
    cooldown: f32,
    catchable: bool,
) -> Chum {
    Chum {
        name,
        price,
        duration,
        rarity_boost,
        bite_speed_boost,
        fish_attract,
        predator_attract,
        cooldown,
        catchable,
    }
}

pub static CHUM: &[Chum] = &[
    def_chum("Fish Scraps", 15, 300.0, 1.0, 1.0, 1.2, 1.0, 120.0, false),
    def_chum("Bread Crumbs", 20, 350.0, 1.0, 1.1, 1.4, 1.0, 120.0, false),
    def_chum("Corn Mash", 25, 400.0, 1.05, 1.0, 1.5, 1.0, 140.0, false),
    def_chum("Blood Meal", 40, 350.0, 1.15, 1.05, 1.6, 3.0, 160.0, false),
    def_chum("Shrimp Paste", 50, 400.0, 1.1, 1.15, 1.7, 1.0, 150.0, false),
    def_chum("Squid Ink", 60, 350.0, 1.2, 1.0, 1.5, 1.2, 180.0, false),
    def_chum("Fish Oil Slick", 75, 500.0, 1.1, 1.1, 2.0, 1.5, 200.0, false),
    def_chum("Sardine Chunks", 45, 300.0, 1.0, 1.5, 1.3, 1.0, 130.0, false),
    def_chum("Crab Guts", 55, 350.0, 1.3, 1.0, 1.4, 1.2, 170.0, false),
    def_chum("Mussel Mix", 35, 450.0, 1.05, 1.05, 1.5, 1.0, 140.0, false),
    def_chum("Fermented Brine", 80, 400.0, 1.5, 1.0, 1.6, 1.0, 200.0, false),
    def_chum("Whale Blubber", 100, 350.0, 1.7, 1.0, 1.8, 2.0, 250.0, false),
    def_chum("Phosphor Dust", 120, 300.0, 2.0, 1.1, 1.5, 1.0, 280.0, false),
    def_chum("Coral Powder", 90, 400.0, 1.3, 1.1, 1.7, 1.0, 200.0, false),
    def_chum("Deep Sea Extract", 150, 350.0, 1.8, 1.2, 2.0, 1.5, 300.0, false),
    def_chum("Thunder Chum", 130, 300.0, 1.6, 1.3, 1.8, 1.5, 260.0, false),
    def_chum("Moonlight Essence", 200, 400.0, 2.0, 1.2, 2.2, 1.0, 350.0, false),
    def_chum("Kraken Bile", 180, 300.0, 2.5, 1.0, 1.6, 2.5, 320.0, false),
    def_chum("Golden Flakes", 250, 500.0, 2.0, 1.4, 2.5, 1.0, 400.0, false),
    def_chum("Abyssal Ooze", 300, 600.0, 2.5, 1.5, 3.0, 2.0, 500.0, false),
    def_chum("Live Shrimp Cluster", 0, 250.0, 1.2, 1.3, 1.8, 1.0, 100.0, true),
    def_chum("Glowing Plankton", 0, 200.0, 1.8, 1.1, 1.5, 1.0, 100.0, true),
];

pub fn species(index: usize) -> &'static Species {
    &SPECIES[index]
}

pub fn junk(index: usize) -> &'static Junk {
    &JUNK[index]
}

pub fn predator(index: usize) -> &'static PredatorKind {
    &PREDATORS[index]
}

pub fn rod(index: usize) -> &'static Rod {
    &RODS[index]
}

pub fn lure(index: usize) -> &'static Lure {
    &LURES[index]
}

pub fn chum(index: usize) -> &'static Chum {
    &CHUM[index]
}

/// Index of a species by name
pub fn species_index(name: &str) -> Option<usize> {
    SPECIES.iter().position(|s| s.name == name)
}

/// Indices of chum that can only be found, never bought
pub fn catchable_chum() -> impl Iterator<Item = usize> {
    CHUM.iter()
        .enumerate()
        .filter(|(_, c)| c.catchable)
        .map(|(i, _)| i)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rarity_ordering() {
        assert!(Rarity::Common < Rarity::Uncommon);
        assert!(Rarity::Legendary < Rarity::UltraRare);
        assert!(Rarity::Rare.is_rare_plus());
        assert!(!Rarity::Uncommon.is_rare_plus());
    }

    #[test]
    fn test_species_names_unique() {
        for (i, a) in SPECIES.iter().enumerate() {
            for b in &SPECIES[i + 1..] {
                assert_ne!(a.name, b.name);
            }
        }
    }

    #[test]
    fn test_lure_targets_exist() {
        for l in LURES {
            for name in l.target_species {
                assert!(species_index(name).is_some(), "{} targets unknown {}", l.name, name);
            }
        }
    }

    #[test]
    fn test_starter_gear_is_free() {
        assert_eq!(RODS[0].price, 0);
        assert_eq!(LURES[0].price, 0);
    }

    #[test]
    fn test_catchable_chum() {
        let found: Vec<_> = catchable_chum().collect();
        assert_eq!(found.len(), 2);
        assert!(found.iter().all(|&i| CHUM[i].price == 0));
    }

    #[test]
    #[should_panic]
    fn test_out_of_range_lookup_panics() {
        let _ = rod(RODS.len());
    }
}
