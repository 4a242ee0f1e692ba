//! Fish and predator behaviour
//!
//! Entities never touch the session phase. Anything that should change it is
//! returned as an `AiEvent` for the state machine to consume this tick.

use glam::Vec2;
use rand::Rng;

use super::events::{AiEvent, ParticleKind, SimEvent, colors};
use super::spawn;
use super::state::{Phase, PredatorState, SessionState};
use crate::catalog;
use crate::distance;

/// What the predators and fish can see of the line this tick
#[derive(Debug, Clone, Copy)]
struct LineView {
    /// Landed hook while waiting for a bite
    bare_hook: Option<Vec2>,
    /// Catch being fought (Bite or Reeling)
    struggling: Option<Vec2>,
}

impl LineView {
    fn of(state: &SessionState) -> Self {
        let hook = state.hook.filter(|h| h.landed).map(|h| h.pos);
        match state.phase {
            Phase::Waiting => Self {
                bare_hook: hook,
                struggling: None,
            },
            Phase::Bite | Phase::Reeling => Self {
                bare_hook: None,
                struggling: state.hooked.map(|h| h.pos),
            },
            _ => Self {
                bare_hook: None,
                struggling: None,
            },
        }
    }
}

/// Spawn, move and cull both pools; return transition requests
pub fn update(state: &mut SessionState, frames: f32) -> Vec<AiEvent> {
    let mut events = Vec::new();

    spawn_entities(state, frames);
    update_predators(state, frames, &mut events);
    scare_fish(state);
    update_fish(state, frames, &mut events);
    cull(state);

    events
}

fn spawn_entities(state: &mut SessionState, frames: f32) {
    let t = &state.tuning;
    let fish_chance = t.fish_spawn_chance * state.chum.fish_attract() * frames;
    if state.fish.len() < t.max_fish && state.rng.random::<f32>() < fish_chance {
        spawn::spawn_fish(state);
    }

    let t = &state.tuning;
    let night = if state.environment.is_night { 1.5 } else { 1.0 };
    let predator_chance = t.predator_spawn_chance * night * state.chum.predator_attract() * frames;
    if state.predators.len() < t.max_predators && state.rng.random::<f32>() < predator_chance {
        spawn::spawn_predator(state);
    }
}

fn update_fish(state: &mut SessionState, frames: f32, events: &mut Vec<AiEvent>) {
    let line = LineView::of(state);
    let bite_distance = state.tuning.bite_distance;
    let approach_mult = state.tuning.approach_speed_mult;
    let water_top = state.tuning.water_y + 10.0;
    let water_bottom = state.tuning.water_bottom;
    let mut reached = None;

    for (idx, fish) in state.fish.iter_mut().enumerate() {
        let sp = catalog::species(fish.species);
        match (fish.approaching_hook, line.bare_hook) {
            (true, Some(hook)) if reached.is_none() => {
                let to_hook = hook - fish.pos;
                let step = sp.speed * approach_mult * frames;
                if to_hook.length() <= step.max(bite_distance) {
                    fish.pos = hook;
                } else {
                    fish.pos += to_hook.normalize_or_zero() * step;
                }
                fish.direction = if to_hook.x >= 0.0 { 1.0 } else { -1.0 };
                if distance(fish.pos, hook) < bite_distance {
                    reached = Some(idx);
                }
            }
            (true, Some(_)) => {}
            _ => {
                fish.approaching_hook = false;
                fish.pos.x += fish.direction * fish.speed * frames;
                fish.wobble_phase += 0.05 * frames;
                fish.pos.y = (fish.base_y + fish.wobble_phase.sin() * fish.wobble_amp).clamp(water_top, water_bottom);
                fish.dir_change_timer -= frames;
                if fish.dir_change_timer <= 0.0 {
                    fish.dir_change_timer = 60.0 + state.rng.random::<f32>() * 120.0;
                    if state.rng.random::<f32>() < 0.3 {
                        fish.direction = -fish.direction;
                    }
                    fish.speed = sp.speed * (0.7 + state.rng.random::<f32>() * 0.6);
                    fish.wobble_amp = 2.0 + state.rng.random::<f32>() * 4.0;
                }
            }
        }
    }

    if let Some(idx) = reached {
        let fish = state.fish.remove(idx);
        log::debug!("Fish #{} ({}) reached the hook", fish.id, catalog::species(fish.species).name);
        events.push(AiEvent::HookReached(fish));
    }
}

/// Predators send nearby fish fleeing and cancel their approach
fn scare_fish(state: &mut SessionState) {
    let scare_mult = state.tuning.scare_speed_mult;
    for pred in &state.predators {
        if matches!(pred.state, PredatorState::Death | PredatorState::Hurt) {
            continue;
        }
        let radius = catalog::predator(pred.kind).scare_radius;
        for fish in &mut state.fish {
            if distance(fish.pos, pred.pos) < radius {
                fish.approaching_hook = false;
                fish.direction = if fish.pos.x >= pred.pos.x { 1.0 } else { -1.0 };
                fish.speed = catalog::species(fish.species).speed * scare_mult;
                fish.base_y = fish.pos.y;
            }
        }
    }
}

fn update_predators(state: &mut SessionState, frames: f32, events: &mut Vec<AiEvent>) {
    let line = LineView::of(state);
    let t = state.tuning.clone();
    let angler = state.angler.pos;
    let fish_approaching = state.fish.iter().any(|f| f.approaching_hook);
    let stealth_possible = state.environment.is_low_visibility()
        && state.phase == Phase::Idle
        && (state.angler.in_boat || state.angler.pos.x < t.pier_start_x + t.stealth_range);
    let mut attack_active = state
        .predators
        .iter()
        .any(|p| p.state == PredatorState::Attack);
    let mut hooked_idx = None;
    let mut effects = Vec::new();

    for (idx, pred) in state.predators.iter_mut().enumerate() {
        let kind = catalog::predator(pred.kind);
        pred.attack_cooldown = (pred.attack_cooldown - frames).max(0.0);
        pred.state_timer -= frames;

        match pred.state {
            PredatorState::Patrol => {
                pred.pos.x += pred.direction * pred.speed * 0.6 * frames;
                pred.pos.y = pred.base_y + (pred.state_timer * 0.03).sin() * 6.0;
                pred.dir_change_timer -= frames;
                if pred.dir_change_timer <= 0.0 {
                    pred.dir_change_timer = 120.0 + state.rng.random::<f32>() * 180.0;
                    if state.rng.random::<f32>() < 0.3 {
                        pred.direction = -pred.direction;
                    }
                }

                if let Some(hook) = line.bare_hook {
                    if hooked_idx.is_none()
                        && !fish_approaching
                        && distance(pred.pos, hook) < kind.detect_range
                        && state.rng.random::<f32>() < t.predator_bite_chance * frames
                    {
                        hooked_idx = Some(idx);
                        continue;
                    }
                }

                if let Some(target) = line.struggling {
                    if pred.attack_cooldown <= 0.0 && distance(pred.pos, target) < kind.detect_range {
                        log::debug!("{} #{} gives chase", kind.name, pred.id);
                        pred.state = PredatorState::Chase;
                        continue;
                    }
                }

                if stealth_possible
                    && !attack_active
                    && pred.attack_cooldown <= 0.0
                    && (pred.pos.x - angler.x).abs() < t.stealth_range
                    && state.rng.random::<f32>() < t.stealth_attack_chance * frames
                {
                    log::info!("{} #{} strikes from the murk", kind.name, pred.id);
                    pred.state = PredatorState::Attack;
                    pred.state_timer = t.predator_attack_frames;
                    pred.attack_cooldown = t.predator_attack_cooldown;
                    attack_active = true;
                    events.push(AiEvent::StealthAttack { name: kind.name });
                }
            }
            PredatorState::Chase => {
                let Some(target) = line.struggling else {
                    pred.state = PredatorState::Patrol;
                    pred.base_y = pred.pos.y;
                    continue;
                };
                let to_target = target - pred.pos;
                pred.direction = if to_target.x >= 0.0 { 1.0 } else { -1.0 };
                let step = kind.speed * 1.5 * frames;
                if to_target.length() > step {
                    pred.pos += to_target.normalize_or_zero() * step;
                }

                if distance(pred.pos, target) < t.predator_attack_range
                    && pred.attack_cooldown <= 0.0
                    && !attack_active
                {
                    log::debug!("{} #{} attacks the line", kind.name, pred.id);
                    pred.state = PredatorState::Attack;
                    pred.state_timer = t.predator_attack_frames;
                    pred.attack_cooldown = t.predator_attack_cooldown;
                    attack_active = true;
                    effects.push(SimEvent::burst(target, 12, colors::BLOOD, ParticleKind::Blood));
                    events.push(AiEvent::PredatorAttack {
                        predator_id: pred.id,
                        name: kind.name,
                    });
                }
            }
            PredatorState::Attack => {
                if pred.state_timer <= 0.0 {
                    pred.state = PredatorState::Patrol;
                    pred.base_y = pred.pos.y;
                    attack_active = false;
                }
            }
            PredatorState::Hurt => {
                if pred.state_timer <= 0.0 {
                    if pred.health > 0 {
                        pred.state = PredatorState::Flee;
                        pred.state_timer = t.predator_flee_frames;
                        pred.direction = if pred.pos.x >= angler.x { 1.0 } else { -1.0 };
                    } else {
                        log::info!("{} #{} was slain", kind.name, pred.id);
                        pred.state = PredatorState::Death;
                        pred.state_timer = t.predator_death_frames;
                    }
                }
            }
            PredatorState::Flee => {
                pred.pos.x += pred.direction * kind.speed * 2.0 * frames;
                if pred.state_timer <= 0.0 {
                    pred.state = PredatorState::Patrol;
                    pred.base_y = pred.pos.y;
                }
            }
            PredatorState::Death => {
                pred.pos.y -= 0.3 * frames;
                let fade = if t.predator_death_frames > 0.0 {
                    frames / t.predator_death_frames
                } else {
                    1.0
                };
                pred.opacity = (pred.opacity - fade).max(0.0);
            }
        }
        pred.pos.y = pred.pos.y.max(t.water_y + 10.0);
    }

    state.events.extend(effects);
    state.predators.retain(|p| !(p.state == PredatorState::Death && p.opacity <= 0.0));

    if let Some(idx) = hooked_idx {
        let pred = state.predators.remove(idx);
        log::debug!("{} #{} took the hook", pred.name(), pred.id);
        events.push(AiEvent::PredatorHooked(pred));
    }
}

/// Remove uncommitted entities beyond the view margin
fn cull(state: &mut SessionState) {
    let limit = state.tuning.view_width * 0.5 + 100.0 + state.tuning.cull_margin;
    let center = state.angler.pos.x;
    state
        .fish
        .retain(|f| f.approaching_hook || (f.pos.x - center).abs() <= limit);
    state
        .predators
        .retain(|p| p.is_committed() || (p.pos.x - center).abs() <= limit);
}

/// Strike at `pos`: every living predator in `range` loses one health
///
/// Returns how many were hit.
pub fn damage_predators(state: &mut SessionState, pos: Vec2, range: f32) -> usize {
    let hurt_frames = state.tuning.predator_hurt_frames;
    let mut hits = 0;
    for pred in &mut state.predators {
        if matches!(pred.state, PredatorState::Death | PredatorState::Hurt) {
            continue;
        }
        if distance(pred.pos, pos) <= range {
            pred.health = pred.health.saturating_sub(1);
            pred.state = PredatorState::Hurt;
            pred.state_timer = hurt_frames;
            hits += 1;
            log::debug!("{} #{} hit, {} health left", pred.name(), pred.id, pred.health);
        }
    }
    if hits > 0 {
        state.emit(SimEvent::burst(pos, 8 * hits as u32, colors::BLOOD, ParticleKind::Blood));
    }
    hits
}
