//! Fishing line physics
//!
//! A fixed chain of verlet particles from the rod tip (segment 0) to the lead
//! (last segment). While flying, the lead follows a ballistic arc; once landed
//! it is pinned to whatever the state machine says the hook is attached to.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts::ROPE_SEGMENTS;
use crate::quad_bezier;
use crate::tuning::Tuning;

/// Inter-particle distance below which a pair is left alone
const MIN_PAIR_DIST: f32 = 1e-4;

/// Upper bound on relaxation passes in a single step
pub const MAX_RELAX_PASSES: u32 = 128;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RopeSegment {
    pub pos: Vec2,
    pub prev: Vec2,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum RopeMode {
    /// Lead particle in ballistic flight (px/frame)
    Flying { velocity: Vec2 },
    /// Lead pinned to the hook or hooked catch
    Landed,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Rope {
    pub segments: Vec<RopeSegment>,
    pub segment_length: f32,
    pub mode: RopeMode,
}

/// Whole frames for a lead launched upward at `launch_vy` from `start_y` to
/// fall to `water_y`, integrated the same way `Rope::step` integrates it.
pub fn flight_frames(start_y: f32, water_y: f32, launch_vy: f32, gravity: f32) -> u32 {
    let mut y = start_y;
    let mut vy = -launch_vy;
    let mut frames = 0;
    while y < water_y && frames < 10_000 {
        vy += gravity;
        y += vy;
        frames += 1;
    }
    frames.max(1)
}

impl Rope {
    /// Start a new cast from `tip` toward `target`
    ///
    /// All segments start bunched at the tip. Horizontal launch speed is
    /// chosen so the lead lands at `target.x`.
    pub fn cast(tip: Vec2, target: Vec2, line_end: Vec2, tuning: &Tuning) -> Self {
        let frames = flight_frames(tip.y, tuning.water_y, tuning.cast_launch_vy, tuning.cast_gravity);
        let velocity = Vec2::new((target.x - tip.x) / frames as f32, -tuning.cast_launch_vy);

        let reach = (line_end - tip).length() * tuning.rope_slack;
        let segment_length = (reach / (ROPE_SEGMENTS - 1) as f32).max(tuning.rope_min_segment);

        Self {
            segments: vec![RopeSegment { pos: tip, prev: tip }; ROPE_SEGMENTS],
            segment_length,
            mode: RopeMode::Flying { velocity },
        }
    }

    pub fn is_flying(&self) -> bool {
        matches!(self.mode, RopeMode::Flying { .. })
    }

    pub fn anchor(&self) -> Vec2 {
        self.segments[0].pos
    }

    pub fn lead(&self) -> Vec2 {
        self.segments[ROPE_SEGMENTS - 1].pos
    }

    /// Total line length
    pub fn length(&self) -> f32 {
        self.segment_length * (ROPE_SEGMENTS - 1) as f32
    }

    /// Advance one step. `lead_target` pins the lead once landed.
    ///
    /// Returns the landing point on the step the lead reaches the water.
    pub fn step(
        &mut self,
        tip: Vec2,
        lead_target: Option<Vec2>,
        frames: f32,
        tuning: &Tuning,
    ) -> Option<Vec2> {
        let last = ROPE_SEGMENTS - 1;
        let mut landed_at = None;

        self.segments[0].pos = tip;
        self.segments[0].prev = tip;

        match self.mode {
            RopeMode::Flying { mut velocity } => {
                velocity.y += tuning.cast_gravity * frames;
                let lead = &mut self.segments[last];
                lead.prev = lead.pos;
                lead.pos += velocity * frames;
                if lead.pos.y >= tuning.water_y {
                    lead.pos.y = tuning.water_y;
                    lead.prev = lead.pos;
                    self.mode = RopeMode::Landed;
                    landed_at = Some(lead.pos);
                } else {
                    self.mode = RopeMode::Flying { velocity };
                }
            }
            RopeMode::Landed => {
                if let Some(target) = lead_target {
                    let lead = &mut self.segments[last];
                    lead.prev = lead.pos;
                    lead.pos = target;
                }
                self.pay_out(tip);
            }
        }

        for seg in &mut self.segments[1..last] {
            let velocity = (seg.pos - seg.prev) * tuning.rope_damping;
            seg.prev = seg.pos;
            seg.pos += velocity + Vec2::new(0.0, tuning.rope_gravity * frames);
        }

        // At least `rope_passes`, then more until every pair is within tolerance
        let tolerance = self.segment_length * tuning.rope_tolerance;
        let mut passes = 0;
        while passes < tuning.rope_passes
            || (passes < MAX_RELAX_PASSES && self.max_pair_error() > tolerance)
        {
            self.relax();
            passes += 1;
        }

        landed_at
    }

    /// Lengthen the line when the lead is pulled beyond its reach
    fn pay_out(&mut self, tip: Vec2) {
        let needed = (self.lead() - tip).length() / (ROPE_SEGMENTS - 1) as f32;
        if needed > self.segment_length {
            self.segment_length = needed * 1.02;
        }
    }

    /// One distance-constraint pass. Anchor and lead never move.
    fn relax(&mut self) {
        let last = ROPE_SEGMENTS - 1;
        for i in 0..last {
            let a = self.segments[i].pos;
            let b = self.segments[i + 1].pos;
            let delta = b - a;
            let dist = delta.length();
            if dist < MIN_PAIR_DIST {
                continue;
            }
            let correction = delta * ((dist - self.segment_length) / dist);

            let a_fixed = i == 0;
            let b_fixed = i + 1 == last;
            match (a_fixed, b_fixed) {
                (true, true) => {}
                (true, false) => self.segments[i + 1].pos -= correction,
                (false, true) => self.segments[i].pos += correction,
                (false, false) => {
                    self.segments[i].pos += correction * 0.5;
                    self.segments[i + 1].pos -= correction * 0.5;
                }
            }
        }
    }

    /// Largest deviation of a pair from the segment length
    ///
    /// The lead pair is skipped while flying.
    pub fn max_pair_error(&self) -> f32 {
        let pairs = if self.is_flying() {
            ROPE_SEGMENTS - 2
        } else {
            ROPE_SEGMENTS - 1
        };
        (0..pairs)
            .map(|i| {
                let d = (self.segments[i + 1].pos - self.segments[i].pos).length();
                (d - self.segment_length).abs()
            })
            .fold(0.0, f32::max)
    }

    /// Closed-form sag approximation through rod tip, a sagging midpoint and
    /// the lead. Shares both endpoints with the chain.
    pub fn sag_curve(&self, samples: usize) -> Vec<Vec2> {
        sag_curve(self.anchor(), self.lead(), self.length(), samples)
    }
}

/// Quadratic bezier sag between `start` and `end` for a line of `length`
pub fn sag_curve(start: Vec2, end: Vec2, length: f32, samples: usize) -> Vec<Vec2> {
    let span = (end - start).length();
    let slack = (length - span).max(0.0);
    let mid = (start + end) * 0.5 + Vec2::new(0.0, slack * 0.5 + span * 0.05);
    let samples = samples.max(2);
    (0..samples)
        .map(|i| {
            let t = i as f32 / (samples - 1) as f32;
            quad_bezier(start, mid, end, t)
        })
        .collect()
}
