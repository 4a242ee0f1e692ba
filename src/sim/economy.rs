//! Catch economy and progression
//!
//! `apply_catch` is the single entry point that turns a landed catch into
//! money, score, XP and records. The state machine calls it exactly once per
//! completed catch cinematic.

use rand::Rng;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::events::SimEvent;
use super::state::{Attribute, CatchRef, PendingCatch, SessionState};
use crate::catalog::{self, Rarity, SPECIES};
use crate::consts::MAX_HISTORY;
use crate::persistence::{Category, ScoreRecord};
use crate::round1;
use crate::tuning::Tuning;

/// Maximum rod level earned through catches
pub const MAX_ROD_LEVEL: u32 = 5;
/// Catches per rod level
pub const CATCHES_PER_ROD_LEVEL: u32 = 5;

/// Failed store or inventory actions
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    #[error("not enough money: need {needed}, have {available}")]
    InsufficientFunds { needed: u64, available: u64 },

    #[error("{0} is already owned")]
    AlreadyOwned(&'static str),

    #[error("{0} is not owned")]
    NotOwned(&'static str),

    #[error("{0} cannot be bought")]
    NotForSale(&'static str),

    #[error("no attribute points to spend")]
    NoAttributePoints,

    #[error("no store item at index {0}")]
    NoSuchItem(usize),
}

/// A shop or character sheet request from the host
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StoreAction {
    BuyRod(usize),
    BuyLure(usize),
    BuyChum { index: usize, quantity: u32 },
    EquipRod(usize),
    EquipLure(usize),
    EquipChum(usize),
    Allocate(Attribute),
}

/// Aggregate per caught name
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CollectionEntry {
    pub count: u32,
    pub best_combo: u32,
    pub biggest_size: f32,
    pub total_weight: f32,
}

/// Recent sales of one item, used for demand
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MarketEntry {
    pub recent_sold: u32,
    pub last_sold_frame: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bounty {
    /// Index into `catalog::SPECIES`
    pub species: usize,
    pub min_size: f32,
    pub reward: u64,
}

impl Bounty {
    pub fn label(&self) -> String {
        format!("Catch a {} ({:.1}x+)", catalog::species(self.species).name, self.min_size)
    }
}

/// A villager's standing order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NpcRequest {
    pub species: usize,
    pub count: u32,
    pub progress: u32,
    pub reward: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub name: String,
    pub rarity: String,
    pub size: f32,
    pub weight: f32,
    pub length: f32,
    pub sell_price: u64,
}

/// Everything one catch paid out, for the reveal and the HUD
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatchReceipt {
    pub name: String,
    pub rarity: String,
    pub size: f32,
    pub weight: f32,
    pub length: f32,
    pub stars: u8,
    pub sell_price: u64,
    pub score_gained: u64,
    pub xp_gained: u32,
    pub levels_gained: u32,
    pub bounty_reward: u64,
    pub request_reward: u64,
}

pub fn catch_weight(catch: CatchRef, size: f32) -> f32 {
    round1(size * catch.points() as f32 * 0.3)
}

pub fn catch_length(catch: CatchRef, size: f32) -> f32 {
    round1(size * catch.catch_width() * 0.8)
}

pub fn catch_stars(catch: CatchRef) -> u8 {
    catch.rarity().map(|r| r.stars()).unwrap_or(1)
}

fn price_rarity_multiplier(catch: CatchRef) -> f32 {
    catch.rarity().map(|r| r.price_multiplier()).unwrap_or(0.5)
}

/// Demand multiplier for `name` at simulated time `now`
///
/// Each sale lowers demand by one step; one sale is forgiven per recovery
/// window of quiet.
pub fn demand_multiplier(entry: Option<&MarketEntry>, now: f64, tuning: &Tuning) -> f32 {
    let Some(entry) = entry else {
        return 1.0;
    };
    let quiet = (now - entry.last_sold_frame).max(0.0);
    let forgiven = (quiet / tuning.demand_recovery_frames as f64).floor() as u32;
    let effective = entry.recent_sold.saturating_sub(forgiven);
    (1.0 - effective as f32 * tuning.demand_step).max(tuning.demand_floor)
}

/// Current sell price of a catch of `size`
pub fn sell_price(state: &SessionState, catch: CatchRef, size: f32) -> u64 {
    let demand = demand_multiplier(state.market.get(catch.name()), state.time_frames, &state.tuning);
    let raw = catch.points() as f32
        * price_rarity_multiplier(catch)
        * size
        * 0.4
        * state.attributes.intellect_price_bonus()
        * demand;
    (raw.floor() as u64).max(1)
}

fn record_sale(state: &mut SessionState, name: &str) {
    let now = state.time_frames;
    let recovery = state.tuning.demand_recovery_frames as f64;
    let entry = state.market.entry(name.to_string()).or_insert(MarketEntry {
        recent_sold: 0,
        last_sold_frame: now,
    });
    // Fold elapsed recovery into the count before stamping the new sale
    let forgiven = ((now - entry.last_sold_frame).max(0.0) / recovery).floor() as u32;
    entry.recent_sold = entry.recent_sold.saturating_sub(forgiven) + 1;
    entry.last_sold_frame = now;
}

fn record_collection(state: &mut SessionState, name: &str, combo: u32, size: f32, weight: f32) {
    let entry = state
        .collection
        .entry(name.to_string())
        .or_insert(CollectionEntry {
            count: 0,
            best_combo: 0,
            biggest_size: 0.0,
            total_weight: 0.0,
        });
    entry.count += 1;
    entry.best_combo = entry.best_combo.max(combo);
    entry.biggest_size = entry.biggest_size.max(size);
    entry.total_weight += weight;
}

fn push_history(state: &mut SessionState, entry: HistoryEntry) {
    let bigger = state
        .biggest_catch
        .as_ref()
        .map(|b| entry.size > b.size)
        .unwrap_or(true);
    if bigger {
        state.biggest_catch = Some(entry.clone());
    }
    state.history.insert(0, entry);
    state.history.truncate(MAX_HISTORY);
}

/// Pay out a landed catch. Called once per completed cinematic.
pub fn apply_catch(state: &mut SessionState, pending: PendingCatch) -> CatchReceipt {
    let PendingCatch { catch, size, combo } = pending;
    let name = catch.name();
    let weight = catch_weight(catch, size);
    let length = catch_length(catch, size);

    let combo_mult = 1.0 + combo.saturating_sub(1) as f32 * 0.15;
    let score_gained = (catch.points() as f32 * size * combo_mult).floor() as u64;
    state.score += score_gained;

    let price = sell_price(state, catch, size);
    state.money += price;
    record_sale(state, name);
    record_collection(state, name, combo, size, weight);

    let bounty_reward = settle_bounty(state, catch, size);
    let request_reward = settle_requests(state, catch);

    if state.total_caught % CATCHES_PER_ROD_LEVEL == 0 && state.rod_level < MAX_ROD_LEVEL {
        state.rod_level += 1;
        log::info!("Rod level {}", state.rod_level);
    }

    let base_xp = catch.rarity().unwrap_or(Rarity::Common).base_xp();
    let xp_gained = (base_xp * size * state.attributes.intellect_xp_bonus()).floor() as u32;
    let levels_gained = grant_xp(state, xp_gained);

    push_history(
        state,
        HistoryEntry {
            name: name.to_string(),
            rarity: catch.rarity_label().to_string(),
            size,
            weight,
            length,
            sell_price: price,
        },
    );

    if state.rng.random::<f32>() < state.tuning.chum_drop_chance {
        let found: Vec<usize> = catalog::catchable_chum().collect();
        if !found.is_empty() {
            let idx = found[state.rng.random_range(0..found.len())];
            state.inventory.owned_chum[idx] += 1;
            let chum_name = catalog::chum(idx).name;
            state.emit(SimEvent::Notification(format!("Found {}!", chum_name)));
        }
    }

    if catch.rarity() == Some(Rarity::UltraRare) && state.ultra_rares_found.insert(name.to_string()) {
        state.pearls += 1;
        log::info!("First {} caught, pearl awarded", name);
        state.emit(SimEvent::Notification(format!("First {} ever! +1 pearl", name)));
    }

    queue_score_records(state, catch, weight);

    log::info!(
        "Caught {} ({}) size {:.2} for ${} and {} points",
        name,
        catch.rarity_label(),
        size,
        price,
        score_gained
    );

    CatchReceipt {
        name: name.to_string(),
        rarity: catch.rarity_label().to_string(),
        size,
        weight,
        length,
        stars: catch_stars(catch),
        sell_price: price,
        score_gained,
        xp_gained,
        levels_gained,
        bounty_reward,
        request_reward,
    }
}

/// Add XP, levelling up as many times as it covers. Returns levels gained.
pub fn grant_xp(state: &mut SessionState, amount: u32) -> u32 {
    state.xp += amount;
    let mut levels = 0;
    while state.xp >= state.xp_to_next {
        state.xp -= state.xp_to_next;
        state.level += 1;
        state.attribute_points += 2;
        state.xp_to_next = xp_threshold(state.level);
        levels += 1;
    }
    if levels > 0 {
        log::info!("Level up to {}", state.level);
        state.emit(SimEvent::Notification(format!("Level up! You are now level {}", state.level)));
    }
    levels
}

/// XP needed to leave `level`
pub fn xp_threshold(level: u32) -> u32 {
    (100.0 * 1.15f64.powi(level.saturating_sub(1) as i32)).floor() as u32
}

fn settle_bounty(state: &mut SessionState, catch: CatchRef, size: f32) -> u64 {
    let CatchRef::Species(species) = catch else {
        return 0;
    };
    let Some(idx) = state
        .bounties
        .iter()
        .position(|b| b.species == species && size >= b.min_size)
    else {
        return 0;
    };
    let bounty = state.bounties.remove(idx);
    let reward = (bounty.reward as f32 * state.attributes.bounty_bonus()).floor() as u64;
    state.money += reward;
    log::info!("Bounty complete: {} for ${}", bounty.label(), reward);
    if state.bounties.is_empty() {
        generate_bounties(state);
    }
    reward
}

fn settle_requests(state: &mut SessionState, catch: CatchRef) -> u64 {
    let CatchRef::Species(species) = catch else {
        return 0;
    };
    let mut paid = 0;
    for req in state.npc_requests.iter_mut().filter(|r| r.species == species) {
        req.progress += 1;
        if req.progress >= req.count {
            paid += req.reward;
        }
    }
    state.npc_requests.retain(|r| r.progress < r.count);
    if paid > 0 {
        state.money += paid;
        log::info!("Request fulfilled for ${}", paid);
        state.emit(SimEvent::Notification(format!("Request complete! +${}", paid)));
    }
    paid
}

/// Replace the bounty board with three random species
pub fn generate_bounties(state: &mut SessionState) {
    let mut pool: Vec<usize> = (0..SPECIES.len()).collect();
    let mut bounties = Vec::with_capacity(3);
    for _ in 0..3 {
        if pool.is_empty() {
            break;
        }
        let species = pool.swap_remove(state.rng.random_range(0..pool.len()));
        let min_size = round1(1.5 + state.rng.random::<f32>() * 2.0);
        let points = catalog::species(species).points as f32;
        let reward = ((points * 2.0 + state.rng.random::<f32>() * 100.0) / 10.0).floor() as u64 * 10;
        bounties.push(Bounty {
            species,
            min_size,
            reward,
        });
    }
    state.bounties = bounties;
}

/// Roll a request for the villager to offer
pub fn roll_npc_request(state: &mut SessionState) -> NpcRequest {
    // Villagers only ask for what turns up near the shore
    let candidates: Vec<usize> = SPECIES
        .iter()
        .enumerate()
        .filter(|(_, s)| !s.rarity.is_rare_plus())
        .map(|(i, _)| i)
        .collect();
    let species = candidates[state.rng.random_range(0..candidates.len())];
    let count = state.rng.random_range(1..=3);
    let points = catalog::species(species).points as u64;
    let reward = (points * count as u64 * 3 / 10).max(1) * 10;
    NpcRequest {
        species,
        count,
        progress: 0,
        reward,
    }
}

/// Sell a net haul: half price, half score, no combo
pub fn apply_net_catch(state: &mut SessionState, species: usize, size: f32) -> u64 {
    let catch = CatchRef::Species(species);
    let name = catch.name();
    let weight = catch_weight(catch, size);
    let price = (sell_price(state, catch, size) / 2).max(1);
    state.money += price;
    state.score += (catch.points() as f32 * size * 0.5).floor() as u64;
    record_sale(state, name);
    record_collection(state, name, 0, size, weight);
    push_history(
        state,
        HistoryEntry {
            name: name.to_string(),
            rarity: catch.rarity_label().to_string(),
            size,
            weight,
            length: catch_length(catch, size),
            sell_price: price,
        },
    );
    price
}

fn queue_score_records(state: &mut SessionState, catch: CatchRef, weight: f32) {
    if catch.is_junk() {
        return;
    }
    let base = ScoreRecord {
        player_name: state.display_name().to_string(),
        fish_name: catch.name().to_string(),
        fish_rarity: catch.rarity_label().to_string(),
        value: weight,
        score: state.score,
        category: Category::BiggestCatch,
    };

    if state.session_age_secs() <= state.tuning.session_cutoff_secs {
        state.outbox.push(ScoreRecord {
            value: state.total_caught as f32,
            category: Category::SessionCatches,
            ..base.clone()
        });
    }
    if matches!(catch.rarity(), Some(Rarity::Legendary | Rarity::UltraRare)) {
        state.outbox.push(ScoreRecord {
            category: Category::LegendaryCatches,
            ..base.clone()
        });
    }
    state.outbox.push(base);
}

fn charge(state: &mut SessionState, price: u64) -> Result<(), StoreError> {
    if state.money < price {
        return Err(StoreError::InsufficientFunds {
            needed: price,
            available: state.money,
        });
    }
    state.money -= price;
    Ok(())
}

pub fn purchase_rod(state: &mut SessionState, index: usize) -> Result<(), StoreError> {
    let rod = catalog::rod(index);
    if state.inventory.owned_rods[index] {
        return Err(StoreError::AlreadyOwned(rod.name));
    }
    charge(state, rod.price)?;
    state.inventory.owned_rods[index] = true;
    state.inventory.rod = index;
    log::info!("Bought {} for ${}", rod.name, rod.price);
    Ok(())
}

pub fn purchase_lure(state: &mut SessionState, index: usize) -> Result<(), StoreError> {
    let lure = catalog::lure(index);
    if state.inventory.owned_lures[index] {
        return Err(StoreError::AlreadyOwned(lure.name));
    }
    charge(state, lure.price)?;
    state.inventory.owned_lures[index] = true;
    state.inventory.lure = index;
    log::info!("Bought {} for ${}", lure.name, lure.price);
    Ok(())
}

pub fn purchase_chum(state: &mut SessionState, index: usize, quantity: u32) -> Result<(), StoreError> {
    let chum = catalog::chum(index);
    if chum.catchable {
        return Err(StoreError::NotForSale(chum.name));
    }
    charge(state, chum.price * quantity as u64)?;
    state.inventory.owned_chum[index] += quantity;
    if state.inventory.chum.is_none() {
        state.inventory.chum = Some(index);
    }
    log::info!("Bought {}x {}", quantity, chum.name);
    Ok(())
}

pub fn equip_rod(state: &mut SessionState, index: usize) -> Result<(), StoreError> {
    if !state.inventory.owned_rods[index] {
        return Err(StoreError::NotOwned(catalog::rod(index).name));
    }
    state.inventory.rod = index;
    Ok(())
}

pub fn equip_lure(state: &mut SessionState, index: usize) -> Result<(), StoreError> {
    if !state.inventory.owned_lures[index] {
        return Err(StoreError::NotOwned(catalog::lure(index).name));
    }
    state.inventory.lure = index;
    Ok(())
}

pub fn equip_chum(state: &mut SessionState, index: usize) -> Result<(), StoreError> {
    if state.inventory.owned_chum[index] == 0 {
        return Err(StoreError::NotOwned(catalog::chum(index).name));
    }
    state.inventory.chum = Some(index);
    Ok(())
}

/// Dispatch a store request, rejecting indices outside the catalog
pub fn apply_store_action(state: &mut SessionState, action: StoreAction) -> Result<(), StoreError> {
    let check = |index: usize, len: usize| {
        if index < len {
            Ok(index)
        } else {
            Err(StoreError::NoSuchItem(index))
        }
    };
    match action {
        StoreAction::BuyRod(i) => purchase_rod(state, check(i, catalog::RODS.len())?),
        StoreAction::BuyLure(i) => purchase_lure(state, check(i, catalog::LURES.len())?),
        StoreAction::BuyChum { index, quantity } => {
            purchase_chum(state, check(index, catalog::CHUM.len())?, quantity.max(1))
        }
        StoreAction::EquipRod(i) => equip_rod(state, check(i, catalog::RODS.len())?),
        StoreAction::EquipLure(i) => equip_lure(state, check(i, catalog::LURES.len())?),
        StoreAction::EquipChum(i) => equip_chum(state, check(i, catalog::CHUM.len())?),
        StoreAction::Allocate(attr) => allocate_attribute(state, attr),
    }
}

pub fn allocate_attribute(state: &mut SessionState, attr: Attribute) -> Result<(), StoreError> {
    if state.attribute_points == 0 {
        return Err(StoreError::NoAttributePoints);
    }
    state.attribute_points -= 1;
    *state.attributes.get_mut(attr) += 1;
    log::debug!("{:?} raised to {}", attr, state.attributes.get(attr));
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn whale() -> CatchRef {
        CatchRef::Species(catalog::species_index("Whale").unwrap())
    }

    #[test]
    fn test_demand_decays_and_recovers() {
        let mut state = SessionState::new(1);
        let catch = whale();
        let fresh = sell_price(&state, catch, 2.0);
        let mut last = fresh;
        let mut sold = 0;
        // Strictly decreasing until the floor
        loop {
            record_sale(&mut state, catch.name());
            sold += 1;
            let price = sell_price(&state, catch, 2.0);
            let mult = demand_multiplier(state.market.get(catch.name()), state.time_frames, &state.tuning);
            if mult <= state.tuning.demand_floor {
                assert!(price <= last);
                break;
            }
            assert!(price < last, "sale {sold}: {price} !< {last}");
            last = price;
        }
        state.time_frames += state.tuning.demand_recovery_frames as f64 * sold as f64;
        assert_eq!(sell_price(&state, catch, 2.0), fresh);
    }

    #[test]
    fn test_junk_price_multiplier() {
        let state = SessionState::new(1);
        let chest = CatchRef::Junk(2);
        let expected = (100.0 * 0.5 * 1.0 * 0.4 * state.attributes.intellect_price_bonus()).floor() as u64;
        assert_eq!(sell_price(&state, chest, 1.0), expected);
    }

    #[test]
    fn test_price_floor_is_one() {
        let mut state = SessionState::new(1);
        let minnow = CatchRef::Species(0);
        for _ in 0..20 {
            record_sale(&mut state, minnow.name());
        }
        assert!(sell_price(&state, minnow, 0.01) >= 1);
    }

    #[test]
    fn test_apply_catch_updates_everything_once() {
        let mut state = SessionState::new(2);
        state.bounties.clear();
        state.total_caught = 1;
        state.combo = 1;
        let money = state.money;
        let pending = PendingCatch {
            catch: CatchRef::Species(0),
            size: 1.0,
            combo: 1,
        };
        let expected_price = sell_price(&state, pending.catch, 1.0);
        let receipt = apply_catch(&mut state, pending);
        assert_eq!(receipt.sell_price, expected_price);
        assert!(state.money >= money + expected_price);
        assert_eq!(state.score, 10);
        assert_eq!(state.collection["Minnow"].count, 1);
        assert_eq!(state.market["Minnow"].recent_sold, 1);
        assert_eq!(state.history.len(), 1);
        assert!(!state.outbox.is_empty());
    }

    #[test]
    fn test_combo_score_bonus() {
        let mut state = SessionState::new(2);
        state.bounties.clear();
        state.total_caught = 1;
        apply_catch(
            &mut state,
            PendingCatch {
                catch: CatchRef::Species(0),
                size: 2.0,
                combo: 3,
            },
        );
        // 10 * 2 * (1 + 2 * 0.15)
        assert_eq!(state.score, 26);
    }

    #[test]
    fn test_level_up_loop() {
        let mut state = SessionState::new(3);
        let levels = grant_xp(&mut state, 100 + 115 + 5);
        assert_eq!(levels, 2);
        assert_eq!(state.level, 3);
        assert_eq!(state.xp, 5);
        assert_eq!(state.attribute_points, crate::consts::STARTING_ATTRIBUTE_POINTS + 4);
        assert_eq!(state.xp_to_next, xp_threshold(3));
    }

    #[test]
    fn test_bounty_regenerates_when_empty() {
        let mut state = SessionState::new(4);
        state.bounties = vec![Bounty {
            species: 0,
            min_size: 1.5,
            reward: 100,
        }];
        let money = state.money;
        let reward = settle_bounty(&mut state, CatchRef::Species(0), 2.0);
        assert_eq!(reward, (100.0 * state.attributes.bounty_bonus()).floor() as u64);
        assert_eq!(state.money, money + reward);
        assert_eq!(state.bounties.len(), 3);
    }

    #[test]
    fn test_undersized_catch_misses_bounty() {
        let mut state = SessionState::new(4);
        state.bounties = vec![Bounty {
            species: 0,
            min_size: 3.0,
            reward: 100,
        }];
        assert_eq!(settle_bounty(&mut state, CatchRef::Species(0), 2.0), 0);
        assert_eq!(state.bounties.len(), 1);
    }

    #[test]
    fn test_request_progress_and_payout() {
        let mut state = SessionState::new(5);
        state.npc_requests.push(NpcRequest {
            species: 1,
            count: 2,
            progress: 0,
            reward: 80,
        });
        assert_eq!(settle_requests(&mut state, CatchRef::Species(1)), 0);
        assert_eq!(state.npc_requests[0].progress, 1);
        assert_eq!(settle_requests(&mut state, CatchRef::Species(1)), 80);
        assert!(state.npc_requests.is_empty());
    }

    #[test]
    fn test_first_ultra_rare_awards_one_pearl() {
        let mut state = SessionState::new(6);
        state.bounties.clear();
        let ultra = CatchRef::Species(catalog::species_index("Neon Eel").unwrap());
        for _ in 0..2 {
            state.total_caught += 1;
            apply_catch(
                &mut state,
                PendingCatch {
                    catch: ultra,
                    size: 1.0,
                    combo: 1,
                },
            );
        }
        assert_eq!(state.pearls, 1);
    }

    #[test]
    fn test_history_bounded_newest_first() {
        let mut state = SessionState::new(7);
        for i in 0..(MAX_HISTORY + 5) {
            push_history(
                &mut state,
                HistoryEntry {
                    name: format!("fish{i}"),
                    rarity: "common".into(),
                    size: 1.0,
                    weight: 1.0,
                    length: 1.0,
                    sell_price: 1,
                },
            );
        }
        assert_eq!(state.history.len(), MAX_HISTORY);
        assert_eq!(state.history[0].name, format!("fish{}", MAX_HISTORY + 4));
    }

    #[test]
    fn test_legendary_catch_records() {
        let mut state = SessionState::new(8);
        state.bounties.clear();
        state.total_caught = 1;
        apply_catch(
            &mut state,
            PendingCatch {
                catch: whale(),
                size: 1.0,
                combo: 1,
            },
        );
        let categories: Vec<_> = state.outbox.iter().map(|r| r.category).collect();
        assert!(categories.contains(&Category::BiggestCatch));
        assert!(categories.contains(&Category::SessionCatches));
        assert!(categories.contains(&Category::LegendaryCatches));
    }

    #[test]
    fn test_store_errors() {
        let mut state = SessionState::new(9);
        state.money = 10;
        assert_eq!(purchase_rod(&mut state, 0), Err(StoreError::AlreadyOwned("Bamboo Rod")));
        assert!(matches!(
            purchase_rod(&mut state, 1),
            Err(StoreError::InsufficientFunds { needed: 150, available: 10 })
        ));
        assert_eq!(equip_lure(&mut state, 3), Err(StoreError::NotOwned("Maggots")));
        assert!(matches!(purchase_chum(&mut state, 20, 1), Err(StoreError::NotForSale(_))));

        state.money = 1000;
        purchase_rod(&mut state, 1).unwrap();
        assert_eq!(state.money, 850);
        assert_eq!(state.inventory.rod, 1);
        equip_rod(&mut state, 0).unwrap();
        assert_eq!(state.inventory.rod, 0);
    }

    #[test]
    fn test_allocate_attribute() {
        let mut state = SessionState::new(10);
        state.attribute_points = 1;
        allocate_attribute(&mut state, Attribute::Wisdom).unwrap();
        assert_eq!(state.attributes.wisdom, 2);
        assert_eq!(
            allocate_attribute(&mut state, Attribute::Wisdom),
            Err(StoreError::NoAttributePoints)
        );
    }
}
