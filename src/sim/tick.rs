//! Fixed timestep simulation tick
//!
//! Core game loop that advances the session deterministically.

use glam::Vec2;
use rand::Rng;

use super::ai;
use super::economy::{self, StoreAction};
use super::events::{AiEvent, ParticleKind, SimEvent, colors};
use super::reel::{ReelContext, ReelInput, ReelOutcome, ReelState};
use super::rope::Rope;
use super::snapshot::UiSnapshot;
use super::spawn;
use super::state::{
    CatchRef, CatchStep, ChumState, Cinematic, Hook, Hooked, NetCast, PendingCatch, Phase,
    SessionState, Tool,
};
use crate::catalog::{self, Rarity};
use crate::consts::*;
use crate::{approach, distance};

/// Missed reason when the bite window closes
pub const TOO_SLOW: &str = "Too slow! The fish escaped...";
/// Missed reason when the gauge empties
pub const BROKE_FREE: &str = "The fish broke free!";

/// Input commands for a single tick (deterministic)
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Click/tap/space went down this tick
    pub primary_pressed: bool,
    pub primary_held: bool,
    /// Right click / escape went down this tick
    pub secondary_pressed: bool,
    pub secondary_held: bool,
    pub move_left: bool,
    pub move_right: bool,
    /// Aim point in world coordinates
    pub aim: Option<Vec2>,
    /// Hotbar slot 1-5
    pub hotbar: Option<u8>,
    pub power_reel_held: bool,
    pub let_out_line: bool,
    /// Talk, shop, board or swim
    pub interact: bool,
    /// Animated rod tip from the host; falls back to the angler's default pose
    pub rod_tip: Option<Vec2>,
    /// Pause toggle
    pub pause: bool,
    /// Demo mode - the simulation plays itself
    pub autopilot: bool,
    /// Shop request; buying and equipping need the Store, attribute points also spend in Idle
    pub store: Option<StoreAction>,
}

/// What a tick produced for the host
#[derive(Debug, Clone)]
pub struct TickReport {
    pub events: Vec<SimEvent>,
    pub snapshot: UiSnapshot,
}

/// Advance the session by one fixed timestep
pub fn tick(state: &mut SessionState, input: &TickInput, dt: f32) -> TickReport {
    if input.pause {
        state.paused = !state.paused;
        log::info!("{}", if state.paused { "Paused" } else { "Resumed" });
    }
    if state.paused {
        return report(state);
    }

    let mut input = input.clone();
    if input.autopilot {
        autopilot(state, &mut input);
    }

    if state.phase.is_cosmetic() {
        title_flow(state, &input);
        return report(state);
    }

    let frames = dt * SIM_HZ;
    state.time_ticks += 1;
    state.time_frames += frames as f64;

    decay_feedback(state, frames);
    update_cooldowns(state, frames);

    // Environment
    state
        .environment
        .update(&mut state.rng, &state.tuning, frames, &mut state.events);

    // Entities and AI transitions
    let ai_events = ai::update(state, frames);

    // State machine: AI requests first, then player input
    for event in ai_events {
        handle_ai_event(state, event);
    }
    if let Some(aim) = input.aim {
        state.aim = aim;
    }
    update_phase(state, &input, frames);
    if let Some(action) = input.store {
        store_action(state, action);
    }
    update_net(state, frames);
    refresh_proximity(state);

    // Rope physics
    update_rope(state, input.rod_tip, frames);

    // Economy
    settle_catch(state);

    report(state)
}

fn report(state: &mut SessionState) -> TickReport {
    TickReport {
        events: std::mem::take(&mut state.events),
        snapshot: UiSnapshot::capture(state),
    }
}

/// Intro -> Title -> CharacterSelect on primary press
fn title_flow(state: &mut SessionState, input: &TickInput) {
    if !input.primary_pressed {
        return;
    }
    match state.phase {
        Phase::Intro => state.set_phase(Phase::Title),
        Phase::Title => state.set_phase(Phase::CharacterSelect),
        _ => {}
    }
}

/// Pick a character and start the session clock
///
/// Ignored outside character select.
pub fn select_character(state: &mut SessionState, index: usize, name: &str) -> bool {
    if state.phase != Phase::CharacterSelect {
        return false;
    }
    state.character = index;
    state.player_name = name.trim().to_string();
    state.session_start_frame = state.time_frames;
    state.set_phase(Phase::Idle);
    log::info!("Session started as {} (character {})", state.display_name(), index);
    true
}

fn decay_feedback(state: &mut SessionState, frames: f32) {
    state.screen_shake *= 0.9f32.powf(frames);
    if state.screen_shake < 0.01 {
        state.screen_shake = 0.0;
    }
    if let Some(alert) = &mut state.alert {
        alert.timer -= frames;
        if alert.timer <= 0.0 {
            state.alert = None;
        }
    }
}

fn update_cooldowns(state: &mut SessionState, frames: f32) {
    state.net_cooldown = (state.net_cooldown - frames).max(0.0);
    state.harpoon_cooldown = (state.harpoon_cooldown - frames).max(0.0);

    let chum = &mut state.chum;
    chum.cooldown = (chum.cooldown - frames).max(0.0);
    if chum.active.is_some() {
        chum.timer -= frames;
        if chum.timer <= 0.0 {
            log::debug!("Chum wore off");
            chum.active = None;
            chum.timer = 0.0;
        }
    }
}

fn handle_ai_event(state: &mut SessionState, event: AiEvent) {
    match event {
        AiEvent::HookReached(fish) => {
            let Some(hook) = state.hook.filter(|_| state.phase == Phase::Waiting) else {
                return;
            };
            // Junk substitution is an independent roll
            let catch = if state.rng.random::<f32>() < state.tuning.junk_chance {
                CatchRef::Junk(state.rng.random_range(0..catalog::JUNK.len()))
            } else {
                CatchRef::Species(fish.species)
            };
            let size = if catch.is_junk() { 1.0 } else { fish.size };
            start_bite(state, catch, size, hook.pos);
        }
        AiEvent::PredatorHooked(pred) => {
            let Some(hook) = state.hook.filter(|_| state.phase == Phase::Waiting) else {
                return;
            };
            let size = 1.0 + state.rng.random::<f32>() * 0.5;
            start_bite(state, CatchRef::Predator(pred.kind), size, hook.pos);
        }
        AiEvent::PredatorAttack { predator_id, name } => {
            if matches!(state.phase, Phase::Bite | Phase::Reeling) {
                log::info!("Predator #{} interrupted the catch", predator_id);
                state.clear_line();
                state.combo = 0;
                state.reel = ReelState::default();
                state.bite_timer = 0.0;
                state.set_phase(Phase::Idle);
                state.raise_alert(format!("A {} snapped your line!", name));
                state.shake(8.0);
            }
        }
        AiEvent::StealthAttack { name } => {
            let pos = state.angler.pos;
            state.raise_alert(format!("A {} lunges out of the murk!", name));
            state.shake(6.0);
            state.emit(SimEvent::burst(pos, 10, colors::BLOOD, ParticleKind::Blood));
        }
    }
}

fn start_bite(state: &mut SessionState, catch: CatchRef, size: f32, at: Vec2) {
    let t = &state.tuning;
    let window = t.bite_window_min + state.rng.random::<f32>() * t.bite_window_spread;
    state.bite_timer = window * state.attributes.vitality_bite_bonus();
    state.hooked = Some(Hooked {
        catch,
        size,
        pos: at,
        vel: Vec2::ZERO,
        dive_timer: 0.0,
    });
    for fish in &mut state.fish {
        fish.approaching_hook = false;
    }
    log::debug!("Bite: {} ({:.2})", catch.name(), size);
    state.emit(SimEvent::Splash { pos: at });
    state.emit(SimEvent::burst(at, 8, colors::WATER, ParticleKind::Splash));
    state.set_phase(Phase::Bite);
}

fn update_phase(state: &mut SessionState, input: &TickInput, frames: f32) {
    match state.phase {
        Phase::Idle => update_idle(state, input, frames),
        Phase::Casting => update_casting(state, input, frames),
        Phase::Waiting => update_waiting(state, input, frames),
        Phase::Bite => update_bite(state, input, frames),
        Phase::Reeling => update_reeling(state, input, frames),
        Phase::Caught => update_caught(state, input, frames),
        Phase::Missed => update_missed(state, input, frames),
        Phase::Swimming => update_swimming(state, input, frames),
        Phase::Boarding => update_boarding(state, frames),
        Phase::Store => {
            if input.secondary_pressed {
                state.set_phase(Phase::Idle);
            }
        }
        Phase::NpcChat => update_npc_chat(state, input),
        Phase::Intro | Phase::Title | Phase::CharacterSelect => {}
    }
}

/// Run a store request, surfacing refusals as an alert
fn store_action(state: &mut SessionState, action: StoreAction) {
    let allowed = match action {
        StoreAction::Allocate(_) => matches!(state.phase, Phase::Idle | Phase::Store),
        _ => state.phase == Phase::Store,
    };
    if !allowed {
        log::debug!("Ignored {:?} in {:?}", action, state.phase);
        return;
    }
    if let Err(e) = economy::apply_store_action(state, action) {
        log::info!("Store refused {:?}: {}", action, e);
        state.raise_alert(e.to_string());
    }
}

// === Walking ===

fn walk(state: &mut SessionState, input: &TickInput, speed: f32, frames: f32) {
    let dir = match (input.move_left, input.move_right) {
        (true, false) => -1.0,
        (false, true) => 1.0,
        _ => return,
    };
    let t = &state.tuning;
    let (min_x, max_x) = if state.phase == Phase::Swimming {
        (0.0, t.world_width)
    } else if state.angler.in_boat {
        (0.0, t.boat_x)
    } else {
        (t.pier_start_x, t.world_width)
    };
    state.angler.facing = dir;
    state.angler.pos.x = (state.angler.pos.x + dir * speed * frames).clamp(min_x, max_x);
}

fn refresh_proximity(state: &mut SessionState) {
    let t = &state.tuning;
    let a = &mut state.angler;
    let near = |x: f32| (a.pos.x - x).abs() < t.interact_range;
    let on_foot = !a.in_boat && state.phase != Phase::Swimming;
    let near_shop = on_foot && near(t.shop_x);
    let near_npc = on_foot && near(t.npc_x);
    let near_boat = state.phase != Phase::Swimming && near(t.boat_x);
    a.near_shop = near_shop;
    a.near_npc = near_npc;
    a.near_boat = near_boat;
}

// === Idle ===

fn update_idle(state: &mut SessionState, input: &TickInput, frames: f32) {
    let speed = if state.angler.in_boat {
        state.tuning.boat_speed
    } else {
        state.tuning.walk_speed
    };
    walk(state, input, speed, frames);
    refresh_proximity(state);

    if let Some(slot) = input.hotbar {
        select_hotbar(state, slot);
    }

    let prompt = state.angler.near_shop || state.angler.near_npc || state.angler.near_boat;
    if input.interact || (input.primary_pressed && prompt) {
        interact(state);
        return;
    }

    if input.primary_pressed {
        match state.tool {
            Tool::Rod => begin_cast(state),
            Tool::Net => throw_net(state),
            Tool::Harpoon => strike_harpoon(state),
        }
    }
}

fn interact(state: &mut SessionState) {
    let a = state.angler;
    if a.near_shop {
        log::info!("Entered the bait shop");
        state.set_phase(Phase::Store);
    } else if a.near_npc {
        open_npc_chat(state);
    } else if a.near_boat {
        state.boarding_timer = state.tuning.boarding_frames;
        state.set_phase(Phase::Boarding);
    } else if !a.in_boat {
        let splash = Vec2::new(a.pos.x, state.tuning.water_y);
        state.angler.pos.y = state.tuning.water_y;
        state.emit(SimEvent::Splash { pos: splash });
        state.set_phase(Phase::Swimming);
    }
}

fn update_swimming(state: &mut SessionState, input: &TickInput, frames: f32) {
    let speed = state.tuning.swim_speed;
    walk(state, input, speed, frames);
    if input.interact && state.angler.pos.x >= state.tuning.pier_start_x {
        state.angler.pos.y = state.tuning.pier_y;
        state.set_phase(Phase::Idle);
    }
}

fn update_boarding(state: &mut SessionState, frames: f32) {
    state.boarding_timer -= frames;
    if state.boarding_timer > 0.0 {
        return;
    }
    let t = &state.tuning;
    let a = &mut state.angler;
    a.in_boat = !a.in_boat;
    if a.in_boat {
        a.pos = Vec2::new(t.boat_x, t.water_y - 12.0);
    } else {
        a.pos = Vec2::new(t.pier_start_x, t.pier_y);
    }
    log::info!("{}", if a.in_boat { "Boarded the boat" } else { "Back on the pier" });
    state.set_phase(Phase::Idle);
}

// === Npc requests ===

fn open_npc_chat(state: &mut SessionState) {
    if state.npc_requests.len() >= state.tuning.max_npc_requests {
        state.npc_offer = None;
        state.emit(SimEvent::Notification(
            "Finish my other orders first, friend.".to_string(),
        ));
    } else if state.npc_offer.is_none() {
        let offer = economy::roll_npc_request(state);
        state.npc_offer = Some(offer);
    }
    state.set_phase(Phase::NpcChat);
}

fn update_npc_chat(state: &mut SessionState, input: &TickInput) {
    if input.primary_pressed {
        if let Some(offer) = state.npc_offer.take() {
            if state.npc_requests.len() < state.tuning.max_npc_requests {
                let name = catalog::species(offer.species).name;
                log::info!("Accepted request: {}x {} for ${}", offer.count, name, offer.reward);
                state.emit(SimEvent::Notification(format!("Bring me {} {}!", offer.count, name)));
                state.npc_requests.push(offer);
            }
        }
        state.set_phase(Phase::Idle);
    } else if input.secondary_pressed {
        state.npc_offer = None;
        state.set_phase(Phase::Idle);
    }
}

// === Hotbar and tools ===

fn select_hotbar(state: &mut SessionState, slot: u8) {
    let idle = state.phase == Phase::Idle;
    match slot {
        1 if idle => state.tool = Tool::Rod,
        2 if idle => cycle_lure(state),
        3 => {
            cycle_chum(state);
            use_chum(state);
        }
        4 if idle => state.tool = Tool::Net,
        5 if idle => state.tool = Tool::Harpoon,
        _ => {}
    }
}

fn cycle_lure(state: &mut SessionState) {
    let owned = &state.inventory.owned_lures;
    let n = owned.len();
    let current = state.inventory.lure;
    if let Some(next) = (1..=n).map(|i| (current + i) % n).find(|&i| owned[i]) {
        state.inventory.lure = next;
        log::debug!("Lure: {}", catalog::lure(next).name);
    }
}

fn cycle_chum(state: &mut SessionState) {
    let owned = &state.inventory.owned_chum;
    let n = owned.len();
    let start = state.inventory.chum.map(|c| c + 1).unwrap_or(0);
    if let Some(next) = (0..n).map(|i| (start + i) % n).find(|&i| owned[i] > 0) {
        state.inventory.chum = Some(next);
    }
}

/// Throw one unit of the equipped chum. False while on cooldown or out of stock.
pub fn use_chum(state: &mut SessionState) -> bool {
    let Some(idx) = state.inventory.chum else {
        return false;
    };
    if state.chum.cooldown > 0.0 || state.inventory.owned_chum[idx] == 0 {
        return false;
    }
    state.inventory.owned_chum[idx] -= 1;
    let chum = catalog::chum(idx);
    state.chum = ChumState {
        active: Some(idx),
        timer: chum.duration,
        cooldown: chum.duration + chum.cooldown,
    };
    let at = state.hook.map(|h| h.pos).unwrap_or(state.aim);
    log::info!("Threw {} ({} left)", chum.name, state.inventory.owned_chum[idx]);
    state.emit(SimEvent::burst(at, 16, colors::GREEN, ParticleKind::Bubble));
    true
}

fn throw_net(state: &mut SessionState) {
    if state.net.is_some() || state.net_cooldown > 0.0 {
        return;
    }
    let t = &state.tuning;
    let a = &state.attributes;
    let pos = Vec2::new(state.aim.x.clamp(0.0, t.world_width), t.water_y);
    state.net = Some(NetCast {
        pos,
        width: 60.0 + 3.0 * a.strength as f32 + 2.0 * a.dexterity as f32,
        depth: 40.0 + 2.0 * a.endurance as f32,
        timer: t.net_frames,
    });
    state.net_cooldown = t.net_cooldown;
    log::debug!("Net thrown at {:.0}", pos.x);
    state.emit(SimEvent::Splash { pos });
}

fn update_net(state: &mut SessionState, frames: f32) {
    let Some(mut net) = state.net else {
        return;
    };
    net.timer -= frames;
    if net.timer > 0.0 {
        state.net = Some(net);
        return;
    }
    state.net = None;

    let half = net.width * 0.5;
    let (caught, kept): (Vec<_>, Vec<_>) = std::mem::take(&mut state.fish).into_iter().partition(|f| {
        let rarity = catalog::species(f.species).rarity;
        !f.approaching_hook
            && matches!(rarity, Rarity::Common | Rarity::Uncommon)
            && (f.pos.x - net.pos.x).abs() <= half
            && f.pos.y >= net.pos.y
            && f.pos.y <= net.pos.y + net.depth
    });
    state.fish = kept;

    let haul: u64 = caught
        .iter()
        .map(|f| economy::apply_net_catch(state, f.species, f.size))
        .sum();
    let msg = if caught.is_empty() {
        "The net came up empty".to_string()
    } else {
        log::info!("Net hauled {} fish for ${}", caught.len(), haul);
        format!("Net hauled {} fish for ${}", caught.len(), haul)
    };
    state.emit(SimEvent::Notification(msg));
}

fn strike_harpoon(state: &mut SessionState) {
    if state.harpoon_cooldown > 0.0 {
        return;
    }
    state.harpoon_cooldown = state.tuning.harpoon_cooldown;
    let target = state.aim;
    let range = state.tuning.harpoon_range;
    let hits = ai::damage_predators(state, target, range);
    log::debug!("Harpoon hit {} predator(s)", hits);
    state.emit(SimEvent::Splash { pos: target });
}

// === Fishing ===

fn begin_cast(state: &mut SessionState) {
    let t = &state.tuning;
    state.cast_power = 0.0;
    state.cast_direction = 1.0;
    state.aim = Vec2::new(
        state.angler.pos.x + state.angler.facing * t.default_cast_distance,
        t.water_y,
    );
    state.clear_line();
    state.set_phase(Phase::Casting);
}

fn update_casting(state: &mut SessionState, input: &TickInput, frames: f32) {
    if input.secondary_pressed {
        state.clear_line();
        state.cast_power = 0.0;
        state.set_phase(Phase::Idle);
        return;
    }
    charge_cast(state, frames);
    if input.primary_pressed {
        launch_cast(state, input.rod_tip);
    }
}

/// Power meter sweeps 0 -> 1 -> 0 until the player lets go
fn charge_cast(state: &mut SessionState, frames: f32) {
    let power = state.cast_power + state.cast_direction * state.tuning.cast_charge_rate * frames;
    if power >= 1.0 {
        state.cast_power = 1.0;
        state.cast_direction = -1.0;
    } else if power <= 0.0 {
        state.cast_power = 0.0;
        state.cast_direction = 1.0;
    } else {
        state.cast_power = power;
    }
}

fn launch_cast(state: &mut SessionState, rod_tip: Option<Vec2>) {
    let tip = state.rod_tip(rod_tip);
    let t = &state.tuning;
    let target = Vec2::new(state.aim.x.clamp(0.0, t.world_width), t.water_y);
    let depth = t.default_hook_depth * (0.5 + 0.5 * state.cast_power);
    let target_y = (t.water_y + depth).min(t.water_bottom);

    // Any previous line is discarded whole
    state.rope = Some(Rope::cast(tip, target, target, t));
    state.hook = Some(Hook {
        pos: tip,
        target_y,
        landed: false,
        bob_phase: 0.0,
    });
    state.hooked = None;
    for fish in &mut state.fish {
        fish.approaching_hook = false;
    }
    state.wait_timer = wait_duration(state);
    log::debug!("Cast toward x={:.0}", target.x);
    state.set_phase(Phase::Waiting);
}

/// Frames until the next approach attempt
fn wait_duration(state: &mut SessionState) -> f32 {
    let t = &state.tuning;
    let base = t.wait_min + state.rng.random::<f32>() * t.wait_spread;
    let lure = catalog::lure(state.inventory.lure);
    base / (state.attributes.vitality_wait_reduction() * state.chum.bite_speed_boost() * lure.speed_boost)
}

fn update_waiting(state: &mut SessionState, input: &TickInput, frames: f32) {
    if let Some(slot) = input.hotbar {
        select_hotbar(state, slot);
    }
    if input.secondary_pressed {
        state.clear_line();
        state.set_phase(Phase::Idle);
        return;
    }
    let Some(mut hook) = state.hook else {
        state.set_phase(Phase::Idle);
        return;
    };
    // Still in flight
    if !hook.landed {
        return;
    }
    hook.pos.y = approach(hook.pos.y, hook.target_y, state.tuning.hook_sink_rate * frames);
    hook.bob_phase += 0.08 * frames;
    state.hook = Some(hook);

    if state.fish.iter().any(|f| f.approaching_hook) {
        return;
    }
    state.wait_timer -= frames;
    if state.wait_timer > 0.0 {
        return;
    }

    let range = state.tuning.capture_range;
    let closest = state
        .fish
        .iter_mut()
        .filter(|f| (f.pos.x - hook.pos.x).abs() <= range)
        .min_by(|a, b| distance(a.pos, hook.pos).total_cmp(&distance(b.pos, hook.pos)));
    if let Some(fish) = closest {
        fish.approaching_hook = true;
        log::debug!("Fish #{} noticed the hook", fish.id);
    } else if state.rng.random::<f32>() < state.tuning.approach_spawn_chance {
        let id = spawn::spawn_approaching_fish(state, hook.pos);
        log::debug!("Fish #{} swims in toward the hook", id);
    }
    state.wait_timer = wait_duration(state);
}

fn update_bite(state: &mut SessionState, input: &TickInput, frames: f32) {
    state.bite_timer -= frames;
    let wobble = (state.time_frames as f32 * 0.4).sin() * 3.0;
    if let (Some(hooked), Some(hook)) = (&mut state.hooked, state.hook) {
        hooked.pos = hook.pos + Vec2::new(wobble, 0.0);
    }

    if input.primary_pressed {
        let Some(hooked) = state.hooked else {
            state.set_phase(Phase::Idle);
            return;
        };
        state.reel = ReelState::start(&state.attributes, &hooked, state.angler.pos, &mut state.rng);
        state.emit(SimEvent::burst(hooked.pos, 6, colors::BUBBLE, ParticleKind::Bubble));
        state.set_phase(Phase::Reeling);
    } else if state.bite_timer <= 0.0 {
        miss(state, TOO_SLOW);
    }
}

fn update_reeling(state: &mut SessionState, input: &TickInput, frames: f32) {
    let Some(mut hooked) = state.hooked else {
        state.set_phase(Phase::Idle);
        return;
    };
    if input.let_out_line && state.reel.let_out(&mut hooked) {
        log::debug!("Let out line ({} left)", state.reel.resilience);
        state.emit(SimEvent::burst(hooked.pos, 4, colors::BUBBLE, ParticleKind::Bubble));
    }

    let ctx = ReelContext::for_session(state, &hooked);
    let reel_input = ReelInput {
        reel: input.primary_held,
        slacken: input.secondary_held,
        power: input.power_reel_held,
    };
    let outcome = state
        .reel
        .step(&mut hooked, &ctx, reel_input, &mut state.rng, frames);
    state.hooked = Some(hooked);
    if let Some(hook) = &mut state.hook {
        hook.pos = hooked.pos;
    }

    match outcome {
        ReelOutcome::Continue => {}
        ReelOutcome::Caught => land_catch(state),
        ReelOutcome::BrokeFree => miss(state, BROKE_FREE),
    }
}

fn land_catch(state: &mut SessionState) {
    let Some(hooked) = state.hooked else {
        return;
    };
    state.combo += 1;
    state.best_combo = state.best_combo.max(state.combo);
    state.total_caught += 1;
    state.pending_catch = Some(PendingCatch {
        catch: hooked.catch,
        size: hooked.size,
        combo: state.combo,
    });
    state.cinematic = Some(Cinematic {
        step: CatchStep::FloatUp,
        timer: CatchStep::FloatUp.duration(&state.tuning),
    });
    state.hook = None;
    state.rope = None;

    state.emit(SimEvent::Splash { pos: hooked.pos });
    state.emit(SimEvent::burst(hooked.pos, 20, colors::GOLD, ParticleKind::Sparkle));
    if hooked.catch.rarity().is_some_and(|r| r.is_rare_plus()) {
        state.shake(4.0);
    }
    log::debug!("Landed {} (combo {})", hooked.catch.name(), state.combo);
    state.set_phase(Phase::Caught);
}

fn update_caught(state: &mut SessionState, input: &TickInput, frames: f32) {
    let Some(mut cine) = state.cinematic else {
        return;
    };
    if input.primary_pressed {
        cine.timer = 0.0;
    } else {
        cine.timer -= frames;
    }

    let t = &state.tuning;
    if let Some(hooked) = &mut state.hooked {
        match cine.step {
            CatchStep::FloatUp => {
                hooked.pos.y = approach(hooked.pos.y, t.water_y - 30.0, 2.0 * frames);
            }
            CatchStep::Carry => {
                let to = state.angler.pos + Vec2::new(0.0, -40.0);
                let delta = to - hooked.pos;
                let step = 4.0 * frames;
                hooked.pos = if delta.length() <= step {
                    to
                } else {
                    hooked.pos + delta.normalize_or_zero() * step
                };
            }
            _ => {}
        }
    }

    if cine.timer <= 0.0 {
        match cine.step.next() {
            Some(step) => {
                cine = Cinematic {
                    step,
                    timer: step.duration(t),
                };
            }
            None => {
                state.cinematic = None;
                return;
            }
        }
    }
    state.cinematic = Some(cine);
}

fn miss(state: &mut SessionState, reason: &str) {
    log::info!("Missed: {}", reason);
    state.combo = 0;
    state.clear_line();
    state.reel = ReelState::default();
    state.missed_reason = Some(reason.to_string());
    state.missed_timer = state.tuning.missed_frames;
    state.set_phase(Phase::Missed);
}

fn update_missed(state: &mut SessionState, input: &TickInput, frames: f32) {
    state.missed_timer -= frames;
    if input.primary_pressed || state.missed_timer <= 0.0 {
        state.missed_timer = 0.0;
        state.missed_reason = None;
        state.set_phase(Phase::Idle);
    }
}

// === Physics ===

fn update_rope(state: &mut SessionState, rod_tip: Option<Vec2>, frames: f32) {
    if !state.phase.has_line() {
        return;
    }
    let tip = state.rod_tip(rod_tip);
    let lead_target = match state.phase {
        Phase::Waiting => state
            .hook
            .filter(|h| h.landed)
            .map(|h| h.pos + Vec2::new(0.0, h.bob_phase.sin() * 2.0)),
        Phase::Bite | Phase::Reeling => state.hooked.map(|h| h.pos),
        _ => None,
    };
    let Some(rope) = state.rope.as_mut() else {
        return;
    };
    let landed = rope.step(tip, lead_target, frames, &state.tuning);
    let lead = rope.lead();

    let Some(hook) = state.hook.as_mut() else {
        return;
    };
    if hook.landed {
        return;
    }
    match landed {
        Some(pos) => {
            hook.pos = pos;
            hook.landed = true;
            state.emit(SimEvent::Splash { pos });
            state.emit(SimEvent::Ripple { pos, max_radius: 40.0 });
            state.emit(SimEvent::burst(pos, 10, colors::WATER, ParticleKind::Splash));
        }
        None => hook.pos = lead,
    }
}

// === Economy ===

/// Pay out once the cinematic has finished, then return to Idle
fn settle_catch(state: &mut SessionState) {
    if state.phase != Phase::Caught || state.cinematic.is_some() {
        return;
    }
    if let Some(pending) = state.pending_catch.take() {
        let receipt = economy::apply_catch(state, pending);
        state.last_catch = Some(receipt);
    }
    state.hooked = None;
    state.set_phase(Phase::Idle);
}

// === Autopilot ===

/// Replace player input with a simple scripted angler
fn autopilot(state: &mut SessionState, input: &mut TickInput) {
    *input = TickInput {
        autopilot: true,
        rod_tip: input.rod_tip,
        ..Default::default()
    };
    match state.phase {
        Phase::Intro | Phase::Title => input.primary_pressed = true,
        Phase::CharacterSelect => {
            select_character(state, 0, "Autopilot");
        }
        Phase::Idle => {
            let a = state.angler;
            if a.near_shop || a.near_npc || a.near_boat {
                input.move_left = !a.in_boat;
                input.move_right = a.in_boat;
            } else if state.tool != Tool::Rod {
                input.hotbar = Some(1);
            } else {
                input.primary_pressed = true;
            }
        }
        Phase::Casting => input.primary_pressed = state.cast_power >= 0.5,
        Phase::Bite => input.primary_pressed = true,
        Phase::Reeling => {
            let r = &state.reel;
            input.primary_held = r.target > r.progress;
            input.secondary_held = r.target < r.progress - 0.05;
            input.power_reel_held = r.in_zone && r.force > 0.5;
            input.let_out_line = r.gauge < 0.15;
        }
        Phase::Store | Phase::NpcChat => input.secondary_pressed = true,
        Phase::Swimming => {
            input.move_right = true;
            input.interact = state.angler.pos.x >= state.tuning.pier_start_x;
        }
        Phase::Waiting | Phase::Caught | Phase::Missed | Phase::Boarding => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::state::{Predator, PredatorState};

    fn idle_state(seed: u64) -> SessionState {
        let mut s = SessionState::new(seed);
        s.phase = Phase::Idle;
        s
    }

    fn press() -> TickInput {
        TickInput {
            primary_pressed: true,
            ..Default::default()
        }
    }

    fn hooked_minnow(pos: Vec2) -> Hooked {
        Hooked {
            catch: CatchRef::Species(0),
            size: 1.0,
            pos,
            vel: Vec2::ZERO,
            dive_timer: 0.0,
        }
    }

    #[test]
    fn test_title_flow() {
        let mut s = SessionState::new(1);
        let t0 = s.time_frames;
        tick(&mut s, &press(), SIM_DT);
        assert_eq!(s.phase, Phase::Title);
        tick(&mut s, &press(), SIM_DT);
        assert_eq!(s.phase, Phase::CharacterSelect);
        tick(&mut s, &TickInput::default(), SIM_DT);
        assert_eq!(s.time_frames, t0, "cosmetic phases never advance time");
        assert!(select_character(&mut s, 2, "Nemo"));
        assert_eq!(s.phase, Phase::Idle);
        assert_eq!(s.player_name, "Nemo");
    }

    #[test]
    fn test_pause_is_noop() {
        let mut s = idle_state(2);
        tick(&mut s, &TickInput { pause: true, ..Default::default() }, SIM_DT);
        let frames = s.time_frames;
        let report = tick(&mut s, &press(), SIM_DT);
        assert_eq!(s.time_frames, frames);
        assert_eq!(s.phase, Phase::Idle);
        assert!(report.snapshot.paused);
    }

    #[test]
    fn test_cast_and_cancel() {
        let mut s = idle_state(3);
        tick(&mut s, &press(), SIM_DT);
        assert_eq!(s.phase, Phase::Casting);
        tick(&mut s, &press(), SIM_DT);
        assert_eq!(s.phase, Phase::Waiting);
        assert!(s.rope.is_some());
        assert!(s.hook.is_some());
        tick(&mut s, &TickInput { secondary_pressed: true, ..Default::default() }, SIM_DT);
        assert_eq!(s.phase, Phase::Idle);
        assert!(s.rope.is_none());
        assert!(s.hook.is_none());
    }

    #[test]
    fn test_cast_power_sweeps_up_and_back() {
        let mut s = idle_state(3);
        tick(&mut s, &press(), SIM_DT);
        assert_eq!(s.cast_power, 0.0);

        let mut peaked = false;
        let mut fell_after_peak = false;
        let mut last = 0.0;
        for _ in 0..80 {
            tick(&mut s, &TickInput::default(), SIM_DT);
            assert!((0.0..=1.0).contains(&s.cast_power));
            peaked |= s.cast_power == 1.0;
            fell_after_peak |= peaked && s.cast_power < last;
            last = s.cast_power;
        }
        assert_eq!(s.phase, Phase::Casting);
        assert!(peaked && fell_after_peak);
        assert_eq!(s.cast_direction, -1.0);
    }

    #[test]
    fn test_cast_lands_at_aim() {
        let mut s = idle_state(4);
        tick(&mut s, &press(), SIM_DT);
        let aim = Vec2::new(2700.0, 300.0);
        tick(&mut s, &TickInput { primary_pressed: true, aim: Some(aim), ..Default::default() }, SIM_DT);
        let mut events = Vec::new();
        for _ in 0..300 {
            let r = tick(&mut s, &TickInput::default(), SIM_DT);
            events.extend(r.events);
            if s.hook.is_some_and(|h| h.landed) {
                break;
            }
        }
        let hook = s.hook.unwrap();
        assert!(hook.landed);
        assert!((hook.pos.x - aim.x).abs() < 1.0);
        assert!(events.iter().any(|e| matches!(e, SimEvent::Ripple { .. })));
    }

    #[test]
    fn test_bite_times_out() {
        let mut s = idle_state(5);
        s.phase = Phase::Bite;
        s.combo = 3;
        s.hook = Some(Hook { pos: Vec2::new(2800.0, 350.0), target_y: 350.0, landed: true, bob_phase: 0.0 });
        s.hooked = Some(hooked_minnow(Vec2::new(2800.0, 350.0)));
        s.bite_timer = 2.0;
        for _ in 0..3 {
            tick(&mut s, &TickInput::default(), SIM_DT);
        }
        assert_eq!(s.phase, Phase::Missed);
        assert_eq!(s.missed_reason.as_deref(), Some(TOO_SLOW));
        assert_eq!(s.combo, 0);
        assert!(s.hooked.is_none());
    }

    #[test]
    fn test_bite_to_reeling_resets_bars() {
        let mut s = idle_state(6);
        s.phase = Phase::Bite;
        s.hook = Some(Hook { pos: Vec2::new(2800.0, 350.0), target_y: 350.0, landed: true, bob_phase: 0.0 });
        s.hooked = Some(hooked_minnow(Vec2::new(2800.0, 350.0)));
        s.bite_timer = 100.0;
        s.reel.gauge = 0.1;
        tick(&mut s, &press(), SIM_DT);
        assert_eq!(s.phase, Phase::Reeling);
        assert_eq!(s.reel.gauge, 0.5);
        assert_eq!(s.reel.progress, 0.5);
        assert!(s.reel.resilience > 0);
    }

    #[test]
    fn test_predator_interrupts_reeling() {
        let mut s = idle_state(7);
        let pos = Vec2::new(2900.0, 400.0);
        s.phase = Phase::Reeling;
        s.combo = 4;
        s.hooked = Some(hooked_minnow(pos));
        s.hook = Some(Hook { pos, target_y: 400.0, landed: true, bob_phase: 0.0 });
        s.reel = ReelState::start(&s.attributes, &hooked_minnow(pos), s.angler.pos, &mut s.rng);
        let id = s.next_entity_id();
        s.predators.push(Predator {
            id,
            kind: 0,
            pos,
            base_y: pos.y,
            direction: 1.0,
            speed: 2.0,
            state: PredatorState::Chase,
            state_timer: 0.0,
            health: 3,
            opacity: 1.0,
            attack_cooldown: 0.0,
            dir_change_timer: 100.0,
        });
        let report = tick(&mut s, &TickInput::default(), SIM_DT);
        assert_eq!(s.phase, Phase::Idle);
        assert!(s.hooked.is_none());
        assert_eq!(s.combo, 0);
        let name = catalog::predator(0).name;
        assert!(report
            .events
            .iter()
            .any(|e| *e == SimEvent::Alert(format!("A {} snapped your line!", name))));
    }

    #[test]
    fn test_caught_pays_once() {
        let mut s = idle_state(8);
        s.bounties.clear();
        let pos = Vec2::new(2900.0, 400.0);
        s.phase = Phase::Reeling;
        s.hooked = Some(hooked_minnow(pos));
        s.reel = ReelState::start(&s.attributes, &hooked_minnow(pos), s.angler.pos, &mut s.rng);
        s.reel.gauge = 0.999;
        s.reel.target = s.reel.progress;
        tick(&mut s, &TickInput { primary_held: true, ..Default::default() }, SIM_DT);
        assert_eq!(s.phase, Phase::Caught);
        assert_eq!(s.total_caught, 1);

        let mut ticks = 0;
        while s.phase == Phase::Caught && ticks < 2000 {
            tick(&mut s, &TickInput::default(), SIM_DT);
            ticks += 1;
        }
        assert_eq!(s.phase, Phase::Idle);
        let score = s.score;
        let money = s.money;
        assert!(score > 0);
        for _ in 0..100 {
            tick(&mut s, &TickInput::default(), SIM_DT);
        }
        assert_eq!(s.score, score);
        assert_eq!(s.money, money);
        assert_eq!(s.collection["Minnow"].count, 1);
    }

    #[test]
    fn test_click_fast_forwards_cinematic() {
        let mut s = idle_state(9);
        s.phase = Phase::Caught;
        s.hooked = Some(hooked_minnow(Vec2::new(2900.0, 400.0)));
        s.pending_catch = Some(PendingCatch { catch: CatchRef::Species(0), size: 1.0, combo: 1 });
        s.cinematic = Some(Cinematic { step: CatchStep::FloatUp, timer: 120.0 });
        for _ in 0..6 {
            tick(&mut s, &press(), SIM_DT);
        }
        assert_eq!(s.phase, Phase::Idle);
        assert!(s.last_catch.is_some());
    }

    #[test]
    fn test_walk_and_shop() {
        let mut s = idle_state(10);
        s.angler.pos.x = s.tuning.shop_x - 100.0;
        let right = TickInput { move_right: true, ..Default::default() };
        for _ in 0..30 {
            tick(&mut s, &right, SIM_DT);
        }
        assert!(s.angler.near_shop);
        tick(&mut s, &TickInput { interact: true, ..Default::default() }, SIM_DT);
        assert_eq!(s.phase, Phase::Store);
        tick(&mut s, &TickInput { secondary_pressed: true, ..Default::default() }, SIM_DT);
        assert_eq!(s.phase, Phase::Idle);
    }

    #[test]
    fn test_shop_buy_and_equip_through_input() {
        let mut s = idle_state(12);
        s.angler.pos.x = s.tuning.shop_x;
        let shop = |action| TickInput { store: Some(action), ..Default::default() };

        // Nothing happens away from the counter
        tick(&mut s, &shop(StoreAction::BuyLure(1)), SIM_DT);
        assert_eq!(s.money, STARTING_MONEY);
        assert!(!s.inventory.owned_lures[1]);

        tick(&mut s, &TickInput { interact: true, ..Default::default() }, SIM_DT);
        assert_eq!(s.phase, Phase::Store);

        let price = catalog::lure(1).price;
        tick(&mut s, &shop(StoreAction::BuyLure(1)), SIM_DT);
        assert_eq!(s.money, STARTING_MONEY - price);
        assert!(s.inventory.owned_lures[1]);
        assert_eq!(s.inventory.lure, 1);

        tick(&mut s, &shop(StoreAction::EquipLure(0)), SIM_DT);
        assert_eq!(s.inventory.lure, 0);
        tick(&mut s, &shop(StoreAction::EquipLure(1)), SIM_DT);
        assert_eq!(s.inventory.lure, 1);

        // Refusals leave the wallet alone and tell the player why
        let report = tick(&mut s, &shop(StoreAction::BuyRod(catalog::RODS.len() - 1)), SIM_DT);
        assert_eq!(s.money, STARTING_MONEY - price);
        assert!(report
            .events
            .iter()
            .any(|e| matches!(e, SimEvent::Alert(t) if t.contains("not enough money"))));
        tick(&mut s, &shop(StoreAction::EquipRod(99)), SIM_DT);
        assert_eq!(s.inventory.rod, 0);
        assert_eq!(s.phase, Phase::Store);

        tick(&mut s, &TickInput { secondary_pressed: true, ..Default::default() }, SIM_DT);
        assert_eq!(s.phase, Phase::Idle);
        let points = s.attribute_points;
        let wisdom = s.attributes.wisdom;
        tick(&mut s, &shop(StoreAction::Allocate(crate::sim::Attribute::Wisdom)), SIM_DT);
        assert_eq!(s.attribute_points, points - 1);
        assert_eq!(s.attributes.wisdom, wisdom + 1);
    }

    #[test]
    fn test_npc_request_accept() {
        let mut s = idle_state(11);
        s.angler.pos.x = s.tuning.npc_x;
        tick(&mut s, &TickInput { interact: true, ..Default::default() }, SIM_DT);
        assert_eq!(s.phase, Phase::NpcChat);
        assert!(s.npc_offer.is_some());
        tick(&mut s, &press(), SIM_DT);
        assert_eq!(s.phase, Phase::Idle);
        assert_eq!(s.npc_requests.len(), 1);
    }

    #[test]
    fn test_boarding_round_trip() {
        let mut s = idle_state(12);
        s.angler.pos.x = s.tuning.pier_start_x;
        tick(&mut s, &TickInput { interact: true, ..Default::default() }, SIM_DT);
        assert_eq!(s.phase, Phase::Boarding);
        for _ in 0..(s.tuning.boarding_frames as usize + 1) {
            tick(&mut s, &TickInput::default(), SIM_DT);
        }
        assert_eq!(s.phase, Phase::Idle);
        assert!(s.angler.in_boat);
        let left = TickInput { move_left: true, ..Default::default() };
        for _ in 0..60 {
            tick(&mut s, &left, SIM_DT);
        }
        assert!(s.angler.pos.x < s.tuning.boat_x);
    }

    #[test]
    fn test_swim_and_climb_out() {
        let mut s = idle_state(13);
        tick(&mut s, &TickInput { interact: true, ..Default::default() }, SIM_DT);
        assert_eq!(s.phase, Phase::Swimming);
        assert_eq!(s.angler.pos.y, s.tuning.water_y);
        tick(&mut s, &TickInput { interact: true, ..Default::default() }, SIM_DT);
        assert_eq!(s.phase, Phase::Idle);
        assert_eq!(s.angler.pos.y, s.tuning.pier_y);
    }

    #[test]
    fn test_chum_consumes_and_expires() {
        let mut s = idle_state(14);
        s.inventory.owned_chum[0] = 2;
        tick(&mut s, &TickInput { hotbar: Some(3), ..Default::default() }, SIM_DT);
        assert_eq!(s.chum.active, Some(0));
        assert_eq!(s.inventory.owned_chum[0], 1);
        assert!(!use_chum(&mut s), "cooldown blocks reuse");
        let duration = catalog::chum(0).duration as usize;
        for _ in 0..=duration {
            tick(&mut s, &TickInput::default(), SIM_DT);
        }
        assert!(s.chum.active.is_none());
    }

    #[test]
    fn test_harpoon_hurts_predator() {
        let mut s = idle_state(15);
        let pos = Vec2::new(2800.0, 400.0);
        let id = s.next_entity_id();
        s.predators.push(Predator {
            id,
            kind: 0,
            pos,
            base_y: pos.y,
            direction: 1.0,
            speed: 0.0,
            state: PredatorState::Flee,
            state_timer: 1000.0,
            health: 3,
            opacity: 1.0,
            attack_cooldown: 100.0,
            dir_change_timer: 100.0,
        });
        tick(&mut s, &TickInput { hotbar: Some(5), ..Default::default() }, SIM_DT);
        assert_eq!(s.tool, Tool::Harpoon);
        let aim = s.predators[0].pos;
        tick(&mut s, &TickInput { primary_pressed: true, aim: Some(aim), ..Default::default() }, SIM_DT);
        assert_eq!(s.predators[0].health, 2);
        assert_eq!(s.predators[0].state, PredatorState::Hurt);
        assert!(s.harpoon_cooldown > 0.0);
    }

    #[test]
    fn test_net_hauls_common_fish() {
        let mut s = idle_state(16);
        s.tool = Tool::Net;
        let spot = Vec2::new(2800.0, s.tuning.water_y + 20.0);
        let id = s.next_entity_id();
        s.fish.push(crate::sim::state::SwimmingFish {
            id,
            pos: spot,
            base_y: spot.y,
            direction: 1.0,
            speed: 0.0,
            species: 0,
            size: 1.0,
            approaching_hook: false,
            dir_change_timer: 1000.0,
            wobble_phase: 0.0,
            wobble_amp: 0.0,
        });
        let money = s.money;
        tick(&mut s, &TickInput { primary_pressed: true, aim: Some(spot), ..Default::default() }, SIM_DT);
        assert!(s.net.is_some());
        for _ in 0..(s.tuning.net_frames as usize + 1) {
            tick(&mut s, &TickInput::default(), SIM_DT);
        }
        assert!(s.net.is_none());
        assert!(s.fish.iter().all(|f| f.id != id));
        assert!(s.money > money);
        assert_eq!(s.collection["Minnow"].count, 1);
    }

    #[test]
    fn test_autopilot_reaches_the_water() {
        let mut s = SessionState::new(17);
        let input = TickInput { autopilot: true, ..Default::default() };
        let mut cast = false;
        for _ in 0..600 {
            tick(&mut s, &input, SIM_DT);
            cast |= s.phase == Phase::Waiting;
        }
        assert!(cast);
    }
}
