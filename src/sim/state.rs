//! Session state and core simulation types
//!
//! Everything a running game owns lives in `SessionState`. The host keeps
//! exactly one and hands it to `tick` by exclusive reference.

use std::collections::{BTreeMap, BTreeSet};

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::economy::{Bounty, CatchReceipt, CollectionEntry, HistoryEntry, MarketEntry, NpcRequest};
use super::environment::Environment;
use super::events::SimEvent;
use super::reel::ReelState;
use super::rope::Rope;
use crate::catalog::{self, Rarity};
use crate::consts::*;
use crate::persistence::ScoreRecord;
use crate::tuning::Tuning;

/// Current phase of the session. Exactly one is active at a time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Phase {
    /// Splash screen
    Intro,
    Title,
    CharacterSelect,
    /// Free to walk, cast or use tools
    Idle,
    /// Aiming a cast
    Casting,
    /// Hook in the water, waiting for a fish
    Waiting,
    /// Something took the hook; react before the window closes
    Bite,
    /// Reeling minigame
    Reeling,
    /// Catch cinematic
    Caught,
    /// Catch lost, showing the reason
    Missed,
    Swimming,
    /// Climbing into or out of the boat
    Boarding,
    Store,
    NpcChat,
}

impl Phase {
    /// Screens that never advance the simulation
    pub fn is_cosmetic(&self) -> bool {
        matches!(self, Phase::Intro | Phase::Title | Phase::CharacterSelect)
    }

    /// Phases in which a catch is on the line
    pub fn holds_catch(&self) -> bool {
        matches!(self, Phase::Bite | Phase::Reeling | Phase::Caught)
    }

    /// Phases in which the hook and line exist
    pub fn has_line(&self) -> bool {
        matches!(
            self,
            Phase::Casting | Phase::Waiting | Phase::Bite | Phase::Reeling
        )
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Phase::Intro => "intro",
            Phase::Title => "title",
            Phase::CharacterSelect => "char_select",
            Phase::Idle => "idle",
            Phase::Casting => "casting",
            Phase::Waiting => "waiting",
            Phase::Bite => "bite",
            Phase::Reeling => "reeling",
            Phase::Caught => "caught",
            Phase::Missed => "missed",
            Phase::Swimming => "swimming",
            Phase::Boarding => "boarding",
            Phase::Store => "store",
            Phase::NpcChat => "npc_chat",
        }
    }
}

/// Steps of the catch cinematic, in order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CatchStep {
    FloatUp,
    Carry,
    RevealWeight,
    RevealLength,
    RevealStars,
    Hold,
}

impl CatchStep {
    pub fn next(self) -> Option<CatchStep> {
        match self {
            CatchStep::FloatUp => Some(CatchStep::Carry),
            CatchStep::Carry => Some(CatchStep::RevealWeight),
            CatchStep::RevealWeight => Some(CatchStep::RevealLength),
            CatchStep::RevealLength => Some(CatchStep::RevealStars),
            CatchStep::RevealStars => Some(CatchStep::Hold),
            CatchStep::Hold => None,
        }
    }

    pub fn duration(self, tuning: &Tuning) -> f32 {
        match self {
            CatchStep::FloatUp => tuning.float_up_frames,
            CatchStep::Carry => tuning.carry_frames,
            CatchStep::RevealWeight => tuning.reveal_weight_frames,
            CatchStep::RevealLength => tuning.reveal_length_frames,
            CatchStep::RevealStars => tuning.reveal_stars_frames,
            CatchStep::Hold => tuning.reveal_hold_frames,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Cinematic {
    pub step: CatchStep,
    pub timer: f32,
}

/// Active hand tool
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Tool {
    #[default]
    Rod,
    Net,
    Harpoon,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Attribute {
    Strength,
    Intellect,
    Vitality,
    Dexterity,
    Endurance,
    Wisdom,
    Agility,
    Tactics,
}

impl Attribute {
    pub const ALL: [Attribute; 8] = [
        Attribute::Strength,
        Attribute::Intellect,
        Attribute::Vitality,
        Attribute::Dexterity,
        Attribute::Endurance,
        Attribute::Wisdom,
        Attribute::Agility,
        Attribute::Tactics,
    ];
}

/// Angler attributes. Tactics amplifies every other attribute a little.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attributes {
    pub strength: u32,
    pub intellect: u32,
    pub vitality: u32,
    pub dexterity: u32,
    pub endurance: u32,
    pub wisdom: u32,
    pub agility: u32,
    pub tactics: u32,
}

impl Default for Attributes {
    fn default() -> Self {
        Self {
            strength: 1,
            intellect: 1,
            vitality: 1,
            dexterity: 1,
            endurance: 1,
            wisdom: 1,
            agility: 1,
            tactics: 1,
        }
    }
}

impl Attributes {
    pub fn get(&self, attr: Attribute) -> u32 {
        match attr {
            Attribute::Strength => self.strength,
            Attribute::Intellect => self.intellect,
            Attribute::Vitality => self.vitality,
            Attribute::Dexterity => self.dexterity,
            Attribute::Endurance => self.endurance,
            Attribute::Wisdom => self.wisdom,
            Attribute::Agility => self.agility,
            Attribute::Tactics => self.tactics,
        }
    }

    pub fn get_mut(&mut self, attr: Attribute) -> &mut u32 {
        match attr {
            Attribute::Strength => &mut self.strength,
            Attribute::Intellect => &mut self.intellect,
            Attribute::Vitality => &mut self.vitality,
            Attribute::Dexterity => &mut self.dexterity,
            Attribute::Endurance => &mut self.endurance,
            Attribute::Wisdom => &mut self.wisdom,
            Attribute::Agility => &mut self.agility,
            Attribute::Tactics => &mut self.tactics,
        }
    }

    pub fn tactics_global(&self) -> f32 {
        1.0 + self.tactics as f32 * 0.005
    }

    fn scaled(&self, value: u32, per_point: f32) -> f32 {
        1.0 + value as f32 * per_point * self.tactics_global()
    }

    pub fn strength_mod(&self) -> f32 {
        self.scaled(self.strength, 0.015)
    }

    pub fn agility_mod(&self) -> f32 {
        self.scaled(self.agility, 0.008)
    }

    pub fn dexterity_mod(&self) -> f32 {
        self.scaled(self.dexterity, 0.010)
    }

    pub fn endurance_mod(&self) -> f32 {
        self.scaled(self.endurance, 0.012)
    }

    /// Multiplier on rare+ spawn weights
    pub fn wisdom_boost(&self) -> f32 {
        self.scaled(self.wisdom, 0.01)
    }

    pub fn intellect_price_bonus(&self) -> f32 {
        self.scaled(self.intellect, 0.012)
    }

    pub fn intellect_xp_bonus(&self) -> f32 {
        self.scaled(self.intellect, 0.008)
    }

    /// Stretches the bite reaction window
    pub fn vitality_bite_bonus(&self) -> f32 {
        self.scaled(self.vitality, 0.01)
    }

    /// Shortens the wait between approach checks
    pub fn vitality_wait_reduction(&self) -> f32 {
        self.scaled(self.vitality, 0.006)
    }

    pub fn bounty_bonus(&self) -> f32 {
        1.0 + self.tactics as f32 * 0.01
    }
}

/// A fish swimming in the pool
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SwimmingFish {
    pub id: u32,
    pub pos: Vec2,
    pub base_y: f32,
    /// -1 or +1
    pub direction: f32,
    pub speed: f32,
    /// Index into `catalog::SPECIES`
    pub species: usize,
    pub size: f32,
    pub approaching_hook: bool,
    pub dir_change_timer: f32,
    pub wobble_phase: f32,
    pub wobble_amp: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PredatorState {
    Patrol,
    Chase,
    Attack,
    Hurt,
    Flee,
    Death,
}

/// A predator roaming the water
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Predator {
    pub id: u32,
    /// Index into `catalog::PREDATORS`
    pub kind: usize,
    pub pos: Vec2,
    pub base_y: f32,
    pub direction: f32,
    pub speed: f32,
    pub state: PredatorState,
    pub state_timer: f32,
    pub health: u8,
    pub opacity: f32,
    pub attack_cooldown: f32,
    pub dir_change_timer: f32,
}

impl Predator {
    pub fn name(&self) -> &'static str {
        catalog::predator(self.kind).name
    }

    /// Patrol and Flee may be culled; everything else is committed
    pub fn is_committed(&self) -> bool {
        !matches!(self.state, PredatorState::Patrol | PredatorState::Flee)
    }
}

/// What is on the end of the line
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CatchRef {
    Species(usize),
    Junk(usize),
    Predator(usize),
}

impl CatchRef {
    pub fn name(&self) -> &'static str {
        match *self {
            CatchRef::Species(i) => catalog::species(i).name,
            CatchRef::Junk(i) => catalog::junk(i).name,
            CatchRef::Predator(i) => catalog::predator(i).name,
        }
    }

    pub fn points(&self) -> u32 {
        match *self {
            CatchRef::Species(i) => catalog::species(i).points,
            CatchRef::Junk(i) => catalog::junk(i).points,
            CatchRef::Predator(i) => catalog::predator(i).points,
        }
    }

    /// Junk has no rarity
    pub fn rarity(&self) -> Option<Rarity> {
        match *self {
            CatchRef::Species(i) => Some(catalog::species(i).rarity),
            CatchRef::Junk(_) => None,
            CatchRef::Predator(i) => Some(catalog::predator(i).rarity),
        }
    }

    pub fn rarity_label(&self) -> &'static str {
        self.rarity().map(|r| r.as_str()).unwrap_or("junk")
    }

    pub fn catch_width(&self) -> f32 {
        match *self {
            CatchRef::Species(i) => catalog::species(i).catch_width,
            CatchRef::Junk(i) => catalog::junk(i).catch_width,
            CatchRef::Predator(i) => catalog::predator(i).catch_width,
        }
    }

    pub fn swim_speed(&self) -> f32 {
        match *self {
            CatchRef::Species(i) => catalog::species(i).speed,
            CatchRef::Junk(_) => 1.0,
            CatchRef::Predator(i) => catalog::predator(i).speed,
        }
    }

    pub fn is_junk(&self) -> bool {
        matches!(self, CatchRef::Junk(_))
    }
}

/// The catch being fought, independent of the pool entity it came from
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Hooked {
    pub catch: CatchRef,
    pub size: f32,
    pub pos: Vec2,
    pub vel: Vec2,
    pub dive_timer: f32,
}

/// Hook/bobber authoritative position
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Hook {
    pub pos: Vec2,
    /// Depth the hook sinks toward once it lands
    pub target_y: f32,
    pub landed: bool,
    pub bob_phase: f32,
}

/// A catch waiting for the cinematic to finish before it is paid out
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PendingCatch {
    pub catch: CatchRef,
    pub size: f32,
    pub combo: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Angler {
    pub pos: Vec2,
    /// -1 faces open water, +1 faces the beach
    pub facing: f32,
    pub in_boat: bool,
    pub near_shop: bool,
    pub near_npc: bool,
    pub near_boat: bool,
}

impl Angler {
    /// Default rod tip when the host does not supply the animated one
    pub fn rod_tip(&self) -> Vec2 {
        self.pos + Vec2::new(self.facing * 26.0, -38.0)
    }
}

/// Owned equipment and what is equipped. Equipped values are catalog indices.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Inventory {
    pub owned_rods: Vec<bool>,
    pub owned_lures: Vec<bool>,
    pub owned_chum: Vec<u32>,
    pub rod: usize,
    pub lure: usize,
    pub chum: Option<usize>,
}

impl Default for Inventory {
    fn default() -> Self {
        let mut owned_rods = vec![false; catalog::RODS.len()];
        let mut owned_lures = vec![false; catalog::LURES.len()];
        owned_rods[0] = true;
        owned_lures[0] = true;
        Self {
            owned_rods,
            owned_lures,
            owned_chum: vec![0; catalog::CHUM.len()],
            rod: 0,
            lure: 0,
            chum: None,
        }
    }
}

/// Thrown chum and its cooldown
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ChumState {
    pub active: Option<usize>,
    pub timer: f32,
    pub cooldown: f32,
}

impl ChumState {
    pub fn active_chum(&self) -> Option<&'static catalog::Chum> {
        self.active.map(catalog::chum)
    }

    pub fn rarity_boost(&self) -> f32 {
        self.active_chum().map(|c| c.rarity_boost).unwrap_or(1.0)
    }

    pub fn bite_speed_boost(&self) -> f32 {
        self.active_chum().map(|c| c.bite_speed_boost).unwrap_or(1.0)
    }

    pub fn fish_attract(&self) -> f32 {
        self.active_chum().map(|c| c.fish_attract).unwrap_or(1.0)
    }

    pub fn predator_attract(&self) -> f32 {
        self.active_chum().map(|c| c.predator_attract).unwrap_or(1.0)
    }
}

/// A thrown net settling in the water
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NetCast {
    pub pos: Vec2,
    pub width: f32,
    pub depth: f32,
    pub timer: f32,
}

/// HUD alert text with its remaining display time
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Alert {
    pub text: String,
    pub timer: f32,
}

/// Frames an alert stays on screen
pub const ALERT_FRAMES: f32 = 180.0;

/// RNG state wrapper for serialization
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RngState {
    pub seed: u64,
    pub stream: u64,
}

impl RngState {
    pub fn new(seed: u64) -> Self {
        Self { seed, stream: 0 }
    }

    pub fn to_rng(&self) -> Pcg32 {
        Pcg32::seed_from_u64(self.seed.wrapping_add(self.stream))
    }
}

fn fresh_rng() -> Pcg32 {
    Pcg32::seed_from_u64(0)
}

/// Complete session state
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionState {
    pub seed: u64,
    pub rng_state: RngState,
    /// Live generator. Not serialized; `reseed` restores it from `rng_state`.
    #[serde(skip, default = "fresh_rng")]
    pub rng: Pcg32,
    pub tuning: Tuning,

    pub phase: Phase,
    /// Global pause; a paused tick changes nothing
    pub paused: bool,
    pub time_ticks: u64,
    /// Simulated time in frames
    pub time_frames: f64,
    /// `time_frames` when the player picked a character
    pub session_start_frame: f64,

    pub player_name: String,
    pub character: usize,
    pub angler: Angler,
    pub boarding_timer: f32,

    // === Line ===
    pub aim: Vec2,
    /// Cast meter, 0..1
    pub cast_power: f32,
    /// Which way the cast meter is sweeping (+1 charging, -1 falling back)
    pub cast_direction: f32,
    pub hook: Option<Hook>,
    pub rope: Option<Rope>,
    pub hooked: Option<Hooked>,
    pub reel: ReelState,
    pub wait_timer: f32,
    pub bite_timer: f32,
    pub missed_timer: f32,
    pub missed_reason: Option<String>,
    pub cinematic: Option<Cinematic>,
    pub pending_catch: Option<PendingCatch>,
    pub last_catch: Option<CatchReceipt>,

    // === Pools (sorted by id) ===
    pub fish: Vec<SwimmingFish>,
    pub predators: Vec<Predator>,

    // === Progression ===
    pub combo: u32,
    pub best_combo: u32,
    pub total_caught: u32,
    pub score: u64,
    pub money: u64,
    /// Premium currency
    pub pearls: u32,
    pub level: u32,
    pub xp: u32,
    pub xp_to_next: u32,
    pub attribute_points: u32,
    pub attributes: Attributes,
    pub rod_level: u32,
    pub collection: BTreeMap<String, CollectionEntry>,
    pub market: BTreeMap<String, MarketEntry>,
    pub bounties: Vec<Bounty>,
    pub npc_requests: Vec<NpcRequest>,
    pub npc_offer: Option<NpcRequest>,
    pub history: Vec<HistoryEntry>,
    pub biggest_catch: Option<HistoryEntry>,
    pub ultra_rares_found: BTreeSet<String>,

    // === Equipment & tools ===
    pub inventory: Inventory,
    pub chum: ChumState,
    pub tool: Tool,
    pub net: Option<NetCast>,
    pub net_cooldown: f32,
    pub harpoon_cooldown: f32,

    pub environment: Environment,
    pub alert: Option<Alert>,
    pub screen_shake: f32,

    /// Score records awaiting submission by the host
    pub outbox: Vec<ScoreRecord>,
    /// Render events produced during the current tick
    #[serde(skip)]
    pub events: Vec<SimEvent>,

    next_id: u32,
}

impl SessionState {
    /// Create a new session with default balance
    pub fn new(seed: u64) -> Self {
        Self::with_tuning(seed, Tuning::default())
    }

    /// Create a session with custom balance; values that fail validation fall back to defaults
    pub fn with_tuning(seed: u64, tuning: Tuning) -> Self {
        let tuning = match tuning.validate() {
            Ok(()) => tuning,
            Err(e) => {
                log::warn!("Falling back to default tuning: {}", e);
                Tuning::default()
            }
        };
        let rng_state = RngState::new(seed);
        let rng = rng_state.to_rng();
        let angler = Angler {
            pos: Vec2::new(tuning.start_x, tuning.pier_y),
            facing: -1.0,
            in_boat: false,
            near_shop: false,
            near_npc: false,
            near_boat: false,
        };

        let mut state = Self {
            seed,
            rng_state,
            rng,
            phase: Phase::Intro,
            paused: false,
            time_ticks: 0,
            time_frames: 0.0,
            session_start_frame: 0.0,
            player_name: String::new(),
            character: 0,
            angler,
            boarding_timer: 0.0,
            aim: Vec2::new(tuning.start_x - tuning.default_cast_distance, tuning.water_y),
            cast_power: 0.0,
            cast_direction: 1.0,
            hook: None,
            rope: None,
            hooked: None,
            reel: ReelState::default(),
            wait_timer: 0.0,
            bite_timer: 0.0,
            missed_timer: 0.0,
            missed_reason: None,
            cinematic: None,
            pending_catch: None,
            last_catch: None,
            fish: Vec::new(),
            predators: Vec::new(),
            combo: 0,
            best_combo: 0,
            total_caught: 0,
            score: 0,
            money: STARTING_MONEY,
            pearls: 0,
            level: 1,
            xp: 0,
            xp_to_next: 100,
            attribute_points: STARTING_ATTRIBUTE_POINTS,
            attributes: Attributes::default(),
            rod_level: 0,
            collection: BTreeMap::new(),
            market: BTreeMap::new(),
            bounties: Vec::new(),
            npc_requests: Vec::new(),
            npc_offer: None,
            history: Vec::new(),
            biggest_catch: None,
            ultra_rares_found: BTreeSet::new(),
            inventory: Inventory::default(),
            chum: ChumState::default(),
            tool: Tool::Rod,
            net: None,
            net_cooldown: 0.0,
            harpoon_cooldown: 0.0,
            environment: Environment::new(&tuning),
            alert: None,
            screen_shake: 0.0,
            outbox: Vec::new(),
            events: Vec::new(),
            next_id: 1,
            tuning,
        };

        super::economy::generate_bounties(&mut state);
        state
    }

    /// Restore the live generator after deserializing
    pub fn reseed(&mut self) {
        self.rng_state.stream = self.rng_state.stream.wrapping_add(1);
        self.rng = self.rng_state.to_rng();
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    pub fn emit(&mut self, event: SimEvent) {
        self.events.push(event);
    }

    pub fn raise_alert(&mut self, text: String) {
        log::debug!("Alert: {}", text);
        self.alert = Some(Alert {
            text: text.clone(),
            timer: ALERT_FRAMES,
        });
        self.events.push(SimEvent::Alert(text));
    }

    pub fn shake(&mut self, intensity: f32) {
        self.screen_shake = self.screen_shake.max(intensity);
        self.events.push(SimEvent::ScreenShake { intensity });
    }

    /// Rod tip for this tick: the host's animated pose if given
    pub fn rod_tip(&self, pose: Option<Vec2>) -> Vec2 {
        pose.unwrap_or_else(|| self.angler.rod_tip())
    }

    /// Seconds since the player picked a character
    pub fn session_age_secs(&self) -> f64 {
        (self.time_frames - self.session_start_frame) / SIM_HZ as f64
    }

    /// Drop the hook, line and anything attached to it
    pub fn clear_line(&mut self) {
        self.hook = None;
        self.rope = None;
        self.hooked = None;
        for fish in &mut self.fish {
            fish.approaching_hook = false;
        }
    }

    pub fn set_phase(&mut self, phase: Phase) {
        if self.phase != phase {
            log::debug!("Phase {} -> {}", self.phase.as_str(), phase.as_str());
            self.phase = phase;
        }
    }

    /// Name shown on the leaderboard
    pub fn display_name(&self) -> &str {
        if self.player_name.is_empty() {
            "Angler"
        } else {
            &self.player_name
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_session_defaults() {
        let state = SessionState::new(7);
        assert_eq!(state.phase, Phase::Intro);
        assert_eq!(state.money, STARTING_MONEY);
        assert_eq!(state.bounties.len(), 3);
        assert!(state.hooked.is_none());
        assert!(state.inventory.owned_rods[0]);
    }

    #[test]
    fn test_invalid_tuning_falls_back_to_defaults() {
        let inverted = Tuning {
            weather_min: 5000.0,
            weather_max: 10.0,
            ..Tuning::default()
        };
        let mut state = SessionState::with_tuning(7, inverted);
        assert_eq!(state.tuning, Tuning::default());

        state.environment.weather_timer = 0.5;
        let tuning = state.tuning.clone();
        state.environment.update(&mut state.rng, &tuning, 1.0, &mut state.events);
        assert!(state.environment.weather_timer >= tuning.weather_min);
    }

    #[test]
    fn test_entity_ids_increase() {
        let mut state = SessionState::new(7);
        let a = state.next_entity_id();
        let b = state.next_entity_id();
        assert!(b > a);
    }

    #[test]
    fn test_tactics_amplifies_attributes() {
        let base = Attributes::default();
        let tactical = Attributes {
            tactics: 20,
            ..Default::default()
        };
        assert!(tactical.strength_mod() > base.strength_mod());
        assert!(tactical.wisdom_boost() > base.wisdom_boost());
    }

    #[test]
    fn test_catch_step_sequence_ends() {
        let mut step = CatchStep::FloatUp;
        let mut count = 1;
        while let Some(next) = step.next() {
            step = next;
            count += 1;
        }
        assert_eq!(step, CatchStep::Hold);
        assert_eq!(count, 6);
    }

    #[test]
    fn test_state_serializes() {
        let state = SessionState::new(3);
        let json = serde_json::to_string(&state).unwrap();
        let mut restored: SessionState = serde_json::from_str(&json).unwrap();
        restored.reseed();
        assert_eq!(restored.money, state.money);
        assert_eq!(restored.phase, state.phase);
    }
}
