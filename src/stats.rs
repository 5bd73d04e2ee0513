//! Per-spell combat statistics and run summaries

use serde::{Deserialize, Serialize};

/// Tracks one class of damage events (e.g. direct crits, dot ticks) as a
/// count plus a running damage total.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct DamageSegment {
    pub count: u32,
    pub total: f64,
}

impl DamageSegment {
    pub fn record(&mut self, damage: f64) {
        self.count += 1;
        self.total += damage;
    }

    /// Average damage per event; 0 when the segment is empty.
    pub fn average(&self) -> f64 {
        if self.count > 0 {
            self.total / self.count as f64
        } else {
            0.0
        }
    }
}

/// Combat statistics for a single spell, accumulated over one simulation
/// run. Owned exclusively by its spell; reset by rebuilding the spell.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Statistics {
    /// Non-critical direct damage hits.
    pub hits: DamageSegment,
    /// Critical direct damage hits.
    pub crits: DamageSegment,
    /// Non-critical periodic ticks.
    pub tick_hits: DamageSegment,
    /// Critical periodic ticks.
    pub tick_crits: DamageSegment,
    /// Missed casts; the total records the notional damage lost.
    pub misses: DamageSegment,

    /// Number of times the spell was cast.
    pub cast_count: u32,
    /// Total mana consumed.
    pub mana_used: f64,
    /// Cumulative time spent actually casting (excludes latency and idle
    /// gaps) - the DPS denominator.
    pub active_time: f64,
}

impl Statistics {
    /// Casts that landed on the target (hit or crit).
    pub fn landed_casts(&self) -> u32 {
        self.hits.count + self.crits.count
    }

    pub fn direct_damage(&self) -> f64 {
        self.hits.total + self.crits.total
    }

    pub fn dot_damage(&self) -> f64 {
        self.tick_hits.total + self.tick_crits.total
    }

    pub fn overall_damage(&self) -> f64 {
        self.direct_damage() + self.dot_damage()
    }
}

/// Per-spell results exposed to the caller after a run. Formatting (tooltip
/// text, tables) is the caller's job.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SpellBreakdown {
    pub name: String,
    pub statistics: Statistics,
    pub overall_damage: f64,
}

/// Totals for one simulation run.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SimSummary {
    pub overall_damage: f64,
    pub total_mana_cost: f64,
    pub active_time: f64,
    /// `overall_damage / active_time`: damage per second of casting, not
    /// per second of fight. Defined as 0 for an empty rotation.
    pub dps: f64,
    pub spells: Vec<SpellBreakdown>,
}

impl SimSummary {
    /// Aggregate per-spell statistics into run totals.
    pub fn from_spells<'a, I>(entries: I) -> Self
    where
        I: IntoIterator<Item = (&'a str, &'a Statistics)>,
    {
        let mut summary = Self::default();
        for (name, statistics) in entries {
            let overall = statistics.overall_damage();
            summary.overall_damage += overall;
            summary.total_mana_cost += statistics.mana_used;
            summary.active_time += statistics.active_time;
            summary.spells.push(SpellBreakdown {
                name: name.to_string(),
                statistics: statistics.clone(),
                overall_damage: overall,
            });
        }
        summary.dps = if summary.active_time > 0.0 {
            summary.overall_damage / summary.active_time
        } else {
            0.0
        };
        summary
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_segment_average_is_zero() {
        let segment = DamageSegment::default();
        let average = segment.average();
        assert_eq!(average, 0.0);
        assert!(!average.is_nan());
    }

    #[test]
    fn segment_records_and_averages() {
        let mut segment = DamageSegment::default();
        segment.record(100.0);
        segment.record(300.0);
        assert_eq!(segment.count, 2);
        assert!((segment.average() - 200.0).abs() < 1e-9);
    }

    #[test]
    fn overall_damage_sums_all_segments() {
        let mut statistics = Statistics::default();
        statistics.hits.record(100.0);
        statistics.crits.record(250.0);
        statistics.tick_hits.record(40.0);
        statistics.tick_crits.record(90.0);
        statistics.misses.record(170.0); // lost damage is not dealt damage
        assert!((statistics.direct_damage() - 350.0).abs() < 1e-9);
        assert!((statistics.dot_damage() - 130.0).abs() < 1e-9);
        assert!((statistics.overall_damage() - 480.0).abs() < 1e-9);
    }

    #[test]
    fn summary_of_nothing_has_zero_dps() {
        let summary = SimSummary::from_spells(std::iter::empty());
        assert_eq!(summary.dps, 0.0);
        assert!(!summary.dps.is_nan());
        assert_eq!(summary.overall_damage, 0.0);
        assert!(summary.spells.is_empty());
    }

    #[test]
    fn summary_totals_across_spells() {
        let mut first = Statistics::default();
        first.hits.record(500.0);
        first.active_time = 2.0;
        first.mana_used = 100.0;
        let mut second = Statistics::default();
        second.tick_hits.record(300.0);
        second.active_time = 2.0;
        second.mana_used = 50.0;

        let summary = SimSummary::from_spells(vec![("a", &first), ("b", &second)]);
        assert!((summary.overall_damage - 800.0).abs() < 1e-9);
        assert!((summary.total_mana_cost - 150.0).abs() < 1e-9);
        assert!((summary.dps - 200.0).abs() < 1e-9);
        assert_eq!(summary.spells.len(), 2);
    }
}
