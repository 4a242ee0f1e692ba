//! Invariants that must hold for any input

use glam::Vec2;
use proptest::prelude::*;
use rand::SeedableRng;
use rand_pcg::Pcg32;

use ocean_angler::Tuning;
use ocean_angler::catalog::RODS;
use ocean_angler::consts::*;
use ocean_angler::sim::reel::{ReelContext, ReelInput, ReelOutcome, ReelState};
use ocean_angler::sim::spawn::{WeightModifiers, rare_plus_mass, species_weights};
use ocean_angler::sim::state::{Attributes, CatchRef, Hooked};
use ocean_angler::sim::{Phase, Rope, SessionState, TickInput, tick};

fn attributes() -> impl Strategy<Value = Attributes> {
    prop::array::uniform8(0u32..60).prop_map(|a| Attributes {
        strength: a[0],
        intellect: a[1],
        vitality: a[2],
        dexterity: a[3],
        endurance: a[4],
        wisdom: a[5],
        agility: a[6],
        tactics: a[7],
    })
}

fn reel_input() -> impl Strategy<Value = ReelInput> {
    (any::<bool>(), any::<bool>(), any::<bool>()).prop_map(|(reel, slacken, power)| ReelInput {
        reel,
        slacken,
        power,
    })
}

fn tick_input() -> impl Strategy<Value = TickInput> {
    (any::<u16>(), 0.0f32..4800.0, 0u8..7).prop_map(|(bits, aim_x, slot)| {
        let bit = |n: u16| bits & (1 << n) != 0;
        TickInput {
            primary_pressed: bit(0),
            primary_held: bit(1),
            secondary_pressed: bit(2) && bit(3),
            secondary_held: bit(4),
            move_left: bit(5),
            move_right: bit(6),
            aim: bit(7).then(|| Vec2::new(aim_x, 320.0)),
            hotbar: (bit(8) && bit(9) && slot > 0 && slot < 6).then_some(slot),
            power_reel_held: bit(10),
            let_out_line: bit(11),
            interact: bit(12) && bit(13),
            rod_tip: None,
            pause: false,
            autopilot: false,
            store: None,
        }
    })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn gauge_stays_in_bounds_and_outcome_matches(
        attrs in attributes(),
        input in reel_input(),
        difficulty in 0.3f32..2.5,
        gauge in 0.0f32..=1.0,
        progress in REEL_PROGRESS_MIN..=REEL_PROGRESS_MAX,
        target in REEL_TARGET_MIN..=REEL_TARGET_MAX,
        frames in 0.25f32..4.0,
        seed in any::<u64>(),
    ) {
        let mut rng = Pcg32::seed_from_u64(seed);
        let mut hooked = Hooked {
            catch: CatchRef::Species(0),
            size: 1.0,
            pos: Vec2::new(2800.0, 420.0),
            vel: Vec2::ZERO,
            dive_timer: 0.0,
        };
        let ctx = ReelContext {
            attributes: attrs,
            rod: &RODS[0],
            rod_level: 0,
            difficulty,
            distance_ratio: 0.5,
            angler: Vec2::new(3000.0, 262.0),
            water_y: 300.0,
            water_bottom: 640.0,
            world_width: 4800.0,
            view_width: 960.0,
        };
        let mut reel = ReelState::start(&attrs, &hooked, ctx.angler, &mut rng);
        reel.gauge = gauge;
        reel.progress = progress;
        reel.target = target;

        let outcome = reel.step(&mut hooked, &ctx, input, &mut rng, frames);

        prop_assert!((0.0..=1.0).contains(&reel.gauge));
        prop_assert!((REEL_PROGRESS_MIN..=REEL_PROGRESS_MAX).contains(&reel.progress));
        prop_assert!((REEL_TARGET_MIN..=REEL_TARGET_MAX).contains(&reel.target));
        match outcome {
            ReelOutcome::Caught => prop_assert_eq!(reel.gauge, 1.0),
            ReelOutcome::BrokeFree => prop_assert_eq!(reel.gauge, 0.0),
            ReelOutcome::Continue => prop_assert!(reel.gauge > 0.0 && reel.gauge < 1.0),
        }
    }

    #[test]
    fn landed_line_always_reaches_its_lead(
        tip_x in 2000.0f32..4000.0,
        hook_x in 100.0f32..4700.0,
        hook_y in 310.0f32..620.0,
        steps in 1usize..240,
    ) {
        let t = Tuning::default();
        let tip = Vec2::new(tip_x, 224.0);
        let hook = Vec2::new(hook_x, hook_y);
        let mut rope = Rope::cast(tip, Vec2::new(hook_x, t.water_y), hook, &t);
        let mut guard = 0;
        while rope.step(tip, None, 1.0, &t).is_none() {
            guard += 1;
            prop_assert!(guard < 10_000, "lead never landed");
        }
        for _ in 0..steps {
            rope.step(tip, Some(hook), 1.0, &t);
        }

        prop_assert_eq!(rope.segments.len(), ROPE_SEGMENTS);
        prop_assert!(rope.segments.iter().all(|s| s.pos.is_finite()));
        prop_assert_eq!(rope.anchor(), tip);
        prop_assert_eq!(rope.lead(), hook);
        prop_assert!(rope.segment_length >= t.rope_min_segment);
        prop_assert!((hook - tip).length() <= rope.length() + 1e-3);

        let curve = rope.sag_curve(16);
        prop_assert_eq!(curve.first().copied(), Some(tip));
        prop_assert_eq!(curve.last().copied(), Some(hook));
    }

    #[test]
    fn waiting_line_links_hold_their_length(
        seed in any::<u64>(),
        aim_x in 200.0f32..4700.0,
        charge in 1usize..90,
        waits in 60usize..480,
    ) {
        let tuning = Tuning {
            fish_spawn_chance: 0.0,
            approach_spawn_chance: 0.0,
            max_predators: 0,
            predator_spawn_chance: 0.0,
            stealth_attack_chance: 0.0,
            ..Tuning::default()
        };
        let mut state = SessionState::with_tuning(seed, tuning);
        state.phase = Phase::Idle;
        state.fish.clear();
        state.predators.clear();

        let press = TickInput { primary_pressed: true, ..Default::default() };
        tick(&mut state, &press, SIM_DT);
        prop_assert_eq!(state.phase, Phase::Casting);
        for _ in 1..charge {
            tick(&mut state, &TickInput::default(), SIM_DT);
        }
        let aim = TickInput { aim: Some(Vec2::new(aim_x, 320.0)), ..press };
        tick(&mut state, &aim, SIM_DT);
        prop_assert_eq!(state.phase, Phase::Waiting);

        let mut landed_ticks = 0;
        for _ in 0..waits {
            tick(&mut state, &TickInput::default(), SIM_DT);
            prop_assert_eq!(state.phase, Phase::Waiting);
            let rope = state.rope.as_ref().expect("line stays out while waiting");
            if rope.is_flying() {
                continue;
            }
            landed_ticks += 1;
            let eps = rope.segment_length * 0.05;
            prop_assert!(
                rope.max_pair_error() <= eps,
                "link error {} > {} after {} landed ticks",
                rope.max_pair_error(),
                eps,
                landed_ticks
            );
        }
        prop_assert!(landed_ticks > 0, "lead never landed");
    }

    #[test]
    fn more_wisdom_never_lowers_rare_odds(
        wisdom in 0u32..80,
        extra in 1u32..20,
        tactics in 0u32..40,
        location in -1.0f32..=1.0,
        lure in 0usize..ocean_angler::catalog::LURES.len(),
    ) {
        let low = Attributes { wisdom, tactics, ..Attributes::default() };
        let high = Attributes { wisdom: wisdom + extra, ..low };
        let mods = |a: &Attributes| WeightModifiers {
            lure,
            wisdom_boost: a.wisdom_boost(),
            ..WeightModifiers::default()
        };
        let a = rare_plus_mass(&species_weights(location, &mods(&low)));
        let b = rare_plus_mass(&species_weights(location, &mods(&high)));
        prop_assert!(b > a, "location {}: {} <= {}", location, b, a);
    }

    #[test]
    fn phases_stay_exclusive(
        seed in any::<u64>(),
        inputs in prop::collection::vec(tick_input(), 100..400),
    ) {
        let mut state = SessionState::new(seed);
        state.phase = Phase::Idle;
        for input in &inputs {
            let snap = tick(&mut state, input, SIM_DT).snapshot;

            prop_assert!(!(snap.current_catch.is_some() && snap.current_junk.is_some()));
            prop_assert_eq!(snap.reel.is_some(), state.phase == Phase::Reeling);
            if state.hooked.is_some() {
                prop_assert!(state.phase.holds_catch(), "hooked in {:?}", state.phase);
            }
            if state.pending_catch.is_some() {
                prop_assert_eq!(state.phase, Phase::Caught);
            }
            if state.rope.is_some() {
                prop_assert!(state.phase.has_line(), "line out in {:?}", state.phase);
            }
            if state.phase != Phase::Missed {
                prop_assert!(state.missed_reason.is_none());
            }
        }
    }
}
