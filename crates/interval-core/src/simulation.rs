//! Deterministic simulation of a full workout.
//!
//! Drives a real [`IntervalEngine`] from `start()` to `Complete` without a
//! clock and records what happened at which second. Used to preview a
//! configuration and as a regression harness for the engine itself.

use serde::Serialize;

use crate::events::{CueKind, Event};
use crate::timer::{IntervalConfig, IntervalEngine, Phase};

/// One contiguous stretch of a single phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PhaseSegment {
    pub phase: Phase,
    pub cycle: u32,
    /// Seconds after `start()` at which the segment begins.
    pub starts_at_secs: u64,
    pub duration_secs: u32,
}

/// A cue and the second (after `start()`) at which it is emitted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CueAt {
    pub at_secs: u64,
    pub kind: CueKind,
}

#[derive(Debug, Clone, Serialize)]
pub struct PhasePlan {
    pub config: IntervalConfig,
    pub segments: Vec<PhaseSegment>,
    pub cues: Vec<CueAt>,
    /// Ticks from `start()` until `Complete`.
    pub total_secs: u64,
}

impl PhasePlan {
    pub fn for_config(config: IntervalConfig) -> Self {
        let mut engine = IntervalEngine::new(config);
        let mut plan = PhasePlan {
            config,
            segments: Vec::new(),
            cues: Vec::new(),
            total_secs: 0,
        };

        let mut now = 0u64;
        plan.record(now, &engine.start());
        while engine.phase() != Phase::Complete {
            now += 1;
            let events = engine.tick();
            debug_assert!(!events.is_empty(), "running engine ignored a tick");
            plan.record(now, &events);
        }
        plan.total_secs = now;
        plan
    }

    /// Counting phases in the order they are visited.
    pub fn phases(&self) -> impl Iterator<Item = Phase> + '_ {
        self.segments
            .iter()
            .map(|s| s.phase)
            .filter(|p| p.is_counting())
    }

    pub fn cue_count(&self, kind: CueKind) -> usize {
        self.cues.iter().filter(|c| c.kind == kind).count()
    }

    fn record(&mut self, now: u64, events: &[Event]) {
        for event in events {
            match event {
                Event::PhaseEntered {
                    phase,
                    cycle,
                    duration_secs,
                    ..
                } => self.segments.push(PhaseSegment {
                    phase: *phase,
                    cycle: *cycle,
                    starts_at_secs: now,
                    duration_secs: *duration_secs,
                }),
                Event::Cue { kind, .. } => self.cues.push(CueAt {
                    at_secs: now,
                    kind: *kind,
                }),
                _ => {}
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn example_plan_takes_100_seconds() {
        let plan = PhasePlan::for_config(IntervalConfig::new(30, 15, 5, 3, 2));
        assert_eq!(plan.total_secs, 100);
        let phases: Vec<Phase> = plan.phases().collect();
        assert_eq!(
            phases,
            vec![
                Phase::DelayStart,
                Phase::Work,
                Phase::Pause,
                Phase::DelayStart,
                Phase::Work,
                Phase::Pause,
            ]
        );
        assert_eq!(plan.segments.last().map(|s| s.phase), Some(Phase::Complete));
        assert_eq!(plan.cue_count(CueKind::Warning), 6);
    }

    #[test]
    fn segment_offsets_accumulate() {
        let plan = PhasePlan::for_config(IntervalConfig::new(30, 15, 5, 3, 2));
        let starts: Vec<u64> = plan.segments.iter().map(|s| s.starts_at_secs).collect();
        assert_eq!(starts, vec![0, 5, 35, 50, 55, 85, 100]);
        assert_eq!(plan.segments[3].cycle, 2);
    }

    #[test]
    fn first_warning_lands_three_seconds_before_work() {
        let plan = PhasePlan::for_config(IntervalConfig::new(30, 15, 5, 3, 1));
        assert_eq!(
            plan.cues.first(),
            Some(&CueAt {
                at_secs: 3,
                kind: CueKind::Warning
            })
        );
    }
}
