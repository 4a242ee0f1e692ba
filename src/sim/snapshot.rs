//! Read-only copy of display state, taken at the end of every tick

use std::collections::BTreeMap;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::economy::{CatchReceipt, CollectionEntry, HistoryEntry, NpcRequest};
use super::reel::{ReelContext, ReelState};
use super::state::{Angler, Attributes, Cinematic, NetCast, Phase, PredatorState, SessionState, Tool};
use crate::catalog;

/// Points in the closed-form line approximation
const SAG_SAMPLES: usize = 16;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FishView {
    pub id: u32,
    pub pos: Vec2,
    pub direction: f32,
    pub species: String,
    pub size: f32,
    pub approaching_hook: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredatorView {
    pub id: u32,
    pub name: String,
    pub pos: Vec2,
    pub direction: f32,
    pub state: PredatorState,
    pub health: u8,
    pub opacity: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BountyView {
    pub label: String,
    pub reward: u64,
}

/// Reeling bars
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ReelView {
    pub gauge: f32,
    pub progress: f32,
    pub target: f32,
    pub catch_zone_half: f32,
    pub in_zone: bool,
    pub force: f32,
    pub force_max: f32,
    pub resilience: u32,
    pub resilience_max: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UiSnapshot {
    pub phase: Phase,
    pub paused: bool,
    pub time_frames: f64,
    pub player_name: String,
    pub character: usize,

    pub score: u64,
    pub money: u64,
    pub pearls: u32,
    pub combo: u32,
    pub best_combo: u32,
    pub total_caught: u32,
    pub level: u32,
    pub xp: u32,
    pub xp_to_next: u32,
    pub attribute_points: u32,
    pub attributes: Attributes,
    pub rod_level: u32,

    pub current_catch: Option<String>,
    pub current_junk: Option<String>,
    pub catch_rarity: Option<String>,
    pub catch_size: Option<f32>,
    pub reel: Option<ReelView>,
    pub bite_timer: f32,
    pub missed_reason: Option<String>,
    pub cinematic: Option<Cinematic>,
    pub last_catch: Option<CatchReceipt>,

    pub angler: Angler,
    pub aim: Vec2,
    pub cast_power: f32,
    pub hook: Option<Vec2>,
    pub rope: Vec<Vec2>,
    pub rope_sag: Vec<Vec2>,
    pub fish: Vec<FishView>,
    pub predators: Vec<PredatorView>,

    pub weather: String,
    pub visibility: f32,
    pub is_night: bool,
    pub celestial: Option<String>,
    pub alert: Option<String>,
    pub screen_shake: f32,

    pub collection: BTreeMap<String, CollectionEntry>,
    pub bounties: Vec<BountyView>,
    pub npc_requests: Vec<NpcRequest>,
    pub npc_offer: Option<NpcRequest>,
    pub history: Vec<HistoryEntry>,
    pub biggest_catch: Option<HistoryEntry>,

    pub rod: String,
    pub lure: String,
    pub chum: Option<String>,
    pub chum_active: Option<String>,
    pub chum_timer: f32,
    pub tool: Tool,
    pub net: Option<NetCast>,
    pub net_cooldown: f32,
    pub harpoon_cooldown: f32,
}

impl UiSnapshot {
    pub fn capture(state: &SessionState) -> Self {
        let hooked = state.hooked.filter(|_| state.phase.holds_catch());
        let (current_catch, current_junk) = match hooked {
            Some(h) if h.catch.is_junk() => (None, Some(h.catch.name().to_string())),
            Some(h) => (Some(h.catch.name().to_string()), None),
            None => (None, None),
        };

        let reel = match (state.phase, state.hooked) {
            (Phase::Reeling, Some(h)) => {
                Some(reel_view(&state.reel, ReelState::catch_zone_half(&ReelContext::for_session(state, &h))))
            }
            _ => None,
        };

        let (rope, rope_sag) = match &state.rope {
            Some(r) => (r.segments.iter().map(|s| s.pos).collect(), r.sag_curve(SAG_SAMPLES)),
            None => (Vec::new(), Vec::new()),
        };

        Self {
            phase: state.phase,
            paused: state.paused,
            time_frames: state.time_frames,
            player_name: state.display_name().to_string(),
            character: state.character,

            score: state.score,
            money: state.money,
            pearls: state.pearls,
            combo: state.combo,
            best_combo: state.best_combo,
            total_caught: state.total_caught,
            level: state.level,
            xp: state.xp,
            xp_to_next: state.xp_to_next,
            attribute_points: state.attribute_points,
            attributes: state.attributes,
            rod_level: state.rod_level,

            current_catch,
            current_junk,
            catch_rarity: hooked.map(|h| h.catch.rarity_label().to_string()),
            catch_size: hooked.map(|h| h.size),
            reel,
            bite_timer: state.bite_timer,
            missed_reason: state.missed_reason.clone(),
            cinematic: state.cinematic,
            last_catch: state.last_catch.clone(),

            angler: state.angler,
            aim: state.aim,
            cast_power: state.cast_power,
            hook: state.hook.map(|h| h.pos),
            rope,
            rope_sag,
            fish: state
                .fish
                .iter()
                .map(|f| FishView {
                    id: f.id,
                    pos: f.pos,
                    direction: f.direction,
                    species: catalog::species(f.species).name.to_string(),
                    size: f.size,
                    approaching_hook: f.approaching_hook,
                })
                .collect(),
            predators: state
                .predators
                .iter()
                .map(|p| PredatorView {
                    id: p.id,
                    name: p.name().to_string(),
                    pos: p.pos,
                    direction: p.direction,
                    state: p.state,
                    health: p.health,
                    opacity: p.opacity,
                })
                .collect(),

            weather: state.environment.weather.as_str().to_string(),
            visibility: state.environment.visibility(),
            is_night: state.environment.is_night,
            celestial: state.environment.celestial.map(|c| c.kind.name().to_string()),
            alert: state.alert.as_ref().map(|a| a.text.clone()),
            screen_shake: state.screen_shake,

            collection: state.collection.clone(),
            bounties: state
                .bounties
                .iter()
                .map(|b| BountyView {
                    label: b.label(),
                    reward: b.reward,
                })
                .collect(),
            npc_requests: state.npc_requests.clone(),
            npc_offer: state.npc_offer.clone(),
            history: state.history.clone(),
            biggest_catch: state.biggest_catch.clone(),

            rod: catalog::rod(state.inventory.rod).name.to_string(),
            lure: catalog::lure(state.inventory.lure).name.to_string(),
            chum: state.inventory.chum.map(|i| catalog::chum(i).name.to_string()),
            chum_active: state.chum.active_chum().map(|c| c.name.to_string()),
            chum_timer: state.chum.timer,
            tool: state.tool,
            net: state.net,
            net_cooldown: state.net_cooldown,
            harpoon_cooldown: state.harpoon_cooldown,
        }
    }
}

fn reel_view(reel: &ReelState, catch_zone_half: f32) -> ReelView {
    ReelView {
        gauge: reel.gauge,
        progress: reel.progress,
        target: reel.target,
        catch_zone_half,
        in_zone: reel.in_zone,
        force: reel.force,
        force_max: reel.force_max,
        resilience: reel.resilience,
        resilience_max: reel.resilience_max,
    }
}
