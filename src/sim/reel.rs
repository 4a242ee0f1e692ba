//! Reeling minigame
//!
//! The fish drives a target marker along [0.12, 0.88]. The player steers a
//! progress marker; while the target sits inside the catch zone around the
//! progress marker the gauge fills, otherwise it drains.

use glam::Vec2;
use rand::Rng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::state::{Attributes, Hooked, SessionState};
use crate::catalog::{self, Rod};
use crate::consts::*;

/// Frames between emergency line releases
pub const LET_OUT_COOLDOWN: f32 = 30.0;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ReelState {
    pub progress: f32,
    pub target: f32,
    /// Direction the target is drifting, -1 or +1
    pub direction: f32,
    pub gauge: f32,
    pub force: f32,
    pub force_max: f32,
    pub resilience: u32,
    pub resilience_max: u32,
    pub let_out_cooldown: f32,
    /// Furthest the hooked catch may be from the angler
    pub line_max_dist: f32,
    pub in_zone: bool,
}

impl Default for ReelState {
    fn default() -> Self {
        Self {
            progress: 0.5,
            target: 0.5,
            direction: 1.0,
            gauge: 0.5,
            force: 1.0,
            force_max: 1.0,
            resilience: 0,
            resilience_max: 0,
            let_out_cooldown: 0.0,
            line_max_dist: 0.0,
            in_zone: false,
        }
    }
}

/// Player intent for one reeling step
#[derive(Debug, Clone, Copy, Default)]
pub struct ReelInput {
    /// Reel in: progress toward 1
    pub reel: bool,
    /// Give line: progress toward 0
    pub slacken: bool,
    /// Spend force for a faster gauge
    pub power: bool,
}

/// Fixed parameters of the fight
#[derive(Debug, Clone, Copy)]
pub struct ReelContext {
    pub attributes: Attributes,
    pub rod: &'static Rod,
    pub rod_level: u32,
    /// Rarity and size difficulty
    pub difficulty: f32,
    /// 0..1 distance of the angler from the shop, scaling target speed
    pub distance_ratio: f32,
    pub angler: Vec2,
    pub water_y: f32,
    pub water_bottom: f32,
    pub world_width: f32,
    pub view_width: f32,
}

impl ReelContext {
    /// Fight parameters for `hooked` in the current session
    pub fn for_session(state: &SessionState, hooked: &Hooked) -> Self {
        let t = &state.tuning;
        let rarity_difficulty = hooked.catch.rarity().map(|r| r.reel_difficulty()).unwrap_or(0.6);
        Self {
            attributes: state.attributes,
            rod: catalog::rod(state.inventory.rod),
            rod_level: state.rod_level,
            difficulty: difficulty(rarity_difficulty, hooked.size),
            distance_ratio: ((state.angler.pos.x - t.shop_x).abs() / t.location_span).min(1.0),
            angler: state.angler.pos,
            water_y: t.water_y,
            water_bottom: t.water_bottom,
            world_width: t.world_width,
            view_width: t.view_width,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReelOutcome {
    Continue,
    Caught,
    BrokeFree,
}

/// Combined rarity and size difficulty
pub fn difficulty(rarity_difficulty: f32, size: f32) -> f32 {
    let size_diff = 1.0 + (size - 1.0) * 0.08;
    rarity_difficulty * size_diff.clamp(0.5, 1.5)
}

impl ReelState {
    /// Fresh fight state on the Bite to Reeling transition
    pub fn start(attributes: &Attributes, hooked: &Hooked, angler: Vec2, rng: &mut Pcg32) -> Self {
        let resilience = (2 + attributes.endurance / 5).min(8);
        Self {
            progress: 0.5,
            target: 0.3 + rng.random::<f32>() * 0.4,
            direction: if rng.random_bool(0.5) { 1.0 } else { -1.0 },
            gauge: 0.5,
            force: 1.0,
            force_max: 1.0,
            resilience,
            resilience_max: resilience,
            let_out_cooldown: 0.0,
            line_max_dist: (hooked.pos - angler).length(),
            in_zone: false,
        }
    }

    /// Half-width of the catch window centered on progress
    pub fn catch_zone_half(ctx: &ReelContext) -> f32 {
        0.08 + ctx.rod_level as f32 * 0.015
            + ctx.rod.catch_zone_bonus
            + ctx.attributes.strength as f32 * 0.003 * ctx.attributes.tactics_global()
    }

    pub fn target_in_zone(&self, half: f32) -> bool {
        self.target >= self.progress - half && self.target <= self.progress + half
    }

    /// Emergency release. Costs one resilience; gated by a cooldown.
    pub fn let_out(&mut self, hooked: &mut Hooked) -> bool {
        if self.let_out_cooldown > 0.0 || self.resilience == 0 {
            return false;
        }
        self.resilience -= 1;
        self.target += (self.progress - self.target) * 0.6;
        self.target = self.target.clamp(REEL_TARGET_MIN, REEL_TARGET_MAX);
        hooked.vel *= 0.3;
        self.let_out_cooldown = LET_OUT_COOLDOWN;
        true
    }

    /// Advance the fight by `frames`
    pub fn step(
        &mut self,
        hooked: &mut Hooked,
        ctx: &ReelContext,
        input: ReelInput,
        rng: &mut Pcg32,
        frames: f32,
    ) -> ReelOutcome {
        let attrs = &ctx.attributes;
        let tg = attrs.tactics_global();
        let str_mod = attrs.strength_mod();
        let agi_mod = attrs.agility_mod();
        let dex_mod = attrs.dexterity_mod();
        let end_mod = attrs.endurance_mod();
        let diff = ctx.difficulty;

        self.move_fish(hooked, ctx, rng, frames);
        self.let_out_cooldown = (self.let_out_cooldown - frames).max(0.0);

        let align_dist = (ctx.angler.x - hooked.pos.x).abs();
        let alignment = (1.0 - align_dist / (ctx.view_width * 0.4)).max(0.0);
        let alignment_bonus = 0.6 + alignment * 0.4;

        // Target marker random walk
        let distance_mult = 0.5 + ctx.distance_ratio * 0.5;
        let fish_speed = (0.004 + ctx.rod_level as f32 * 0.0005) * diff / alignment_bonus * distance_mult
            / (1.0 + attrs.dexterity as f32 * 0.007 * tg);
        self.target += self.direction * fish_speed * frames;
        if rng.random::<f32>() < 0.008 * diff * frames {
            self.direction = -self.direction;
        }
        if self.target >= REEL_TARGET_MAX {
            self.target = REEL_TARGET_MAX;
            self.direction = -1.0;
        }
        if self.target <= REEL_TARGET_MIN {
            self.target = REEL_TARGET_MIN;
            self.direction = 1.0;
        }

        // Player marker
        let secs = frames / SIM_HZ;
        let reel_speed = 0.40 * agi_mod;
        if input.reel {
            self.progress += reel_speed * secs;
        } else if input.slacken {
            self.progress -= reel_speed * secs;
        } else {
            self.progress += 0.05 / alignment_bonus * secs / dex_mod;
        }
        self.progress = self.progress.clamp(REEL_PROGRESS_MIN, REEL_PROGRESS_MAX);

        // Gauge
        let half = Self::catch_zone_half(ctx);
        self.in_zone = self.target_in_zone(half);
        let powered = input.power && self.force > 0.0;
        if self.in_zone {
            let mut gain = 0.003 * alignment_bonus * ctx.rod.reel_speed_mult * str_mod;
            if powered {
                let drain = 0.008 * diff / (1.0 + attrs.agility as f32 * 0.01 * tg);
                self.force = (self.force - drain * frames).max(0.0);
                gain *= 2.0;
                hooked.pos.x += (ctx.angler.x - hooked.pos.x) * 0.002 * 0.5 * str_mod * frames;
            }
            self.gauge += gain * frames;
            hooked.pos.y -= 0.3 * str_mod * frames;
        } else {
            let drain = 0.004 * diff / (ctx.rod.line_strength * end_mod);
            self.gauge -= drain * frames;
            hooked.pos.y += 0.15 / end_mod * frames;
        }
        if !powered || !self.in_zone {
            let regen = 0.003 * (1.0 + attrs.vitality as f32 * 0.01 * tg);
            self.force = (self.force + regen * frames).min(self.force_max);
        }
        hooked.pos.y = hooked.pos.y.clamp(ctx.water_y + 15.0, ctx.water_bottom);

        // Clamp, then success before failure
        self.gauge = self.gauge.clamp(0.0, 1.0);
        if self.gauge >= 1.0 {
            ReelOutcome::Caught
        } else if self.gauge <= 0.0 {
            ReelOutcome::BrokeFree
        } else {
            ReelOutcome::Continue
        }
    }

    /// Hooked catch kinematics: drag, random bursts, line length limit
    fn move_fish(&mut self, hooked: &mut Hooked, ctx: &ReelContext, rng: &mut Pcg32, frames: f32) {
        let attrs = &ctx.attributes;
        let str_mod = attrs.strength_mod();
        let diff = ctx.difficulty;
        let mass = diff * (0.8 + hooked.size * 0.2);
        let move_speed = hooked.catch.swim_speed() * 1.2 * diff;

        let net_force = str_mod * 0.6 - mass * 0.4;
        let drag = (net_force * 0.02).max(0.0);
        hooked.vel.x *= (1.0 - drag * frames * 0.01).max(0.85);
        hooked.vel.y *= (1.0 - drag * frames * 0.008).max(0.88);
        hooked.pos += hooked.vel * frames;
        hooked.dive_timer = (hooked.dive_timer - frames).max(0.0);

        let burst_chance = 0.012 * diff / (1.0 + attrs.dexterity as f32 * 0.03 * attrs.tactics_global());
        if rng.random::<f32>() < burst_chance * frames {
            let burst = move_speed * (0.5 + rng.random::<f32>() * 0.8);
            let roll = rng.random::<f32>();
            if roll < 0.40 {
                let side = if rng.random_bool(0.5) { 1.0 } else { -1.0 };
                hooked.vel.x = side * burst / str_mod;
            } else if roll < 0.65 {
                hooked.vel.y = burst * 0.6 / str_mod;
                hooked.dive_timer = 30.0 + rng.random::<f32>() * 40.0;
            } else if roll < 0.85 {
                hooked.vel.y = -burst * 0.5 / str_mod;
            } else {
                hooked.vel.x *= -1.2;
                hooked.vel.y *= -0.8;
            }
        }

        hooked.pos.x = hooked.pos.x.clamp(20.0, ctx.world_width - 20.0);
        hooked.pos.y = hooked.pos.y.clamp(ctx.water_y + 15.0, ctx.water_bottom);
        if self.line_max_dist > 0.0 {
            let offset = hooked.pos - ctx.angler;
            let dist = offset.length();
            if dist > self.line_max_dist {
                hooked.pos = ctx.angler + offset * (self.line_max_dist / dist);
            }
        }
    }
}
