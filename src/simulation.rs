//! Core combat simulation engine
//!
//! A min-priority queue of spell events drives simulated time forward:
//! pop the next-due spell, resolve a tick or a cast, re-schedule it, stop
//! at the fight boundary. One run is strictly single-threaded; independent
//! runs (gear comparisons) parallelize across configs with rayon since
//! every run owns its spells and statistics outright.

use crate::aura::AuraState;
use crate::catalog::build_priority_list;
use crate::config::{BuildConfig, SimOptions};
use crate::spell::Spell;
use crate::stats::SimSummary;
use rayon::prelude::*;
use rayon::ThreadPoolBuilder;
use std::cmp::Ordering;
use std::collections::BinaryHeap;

/// Smallest re-schedule delay any well-formed spell can produce (the 0.5s
/// GCD floor, with margin). Only used to size the runaway-loop backstop.
const MIN_CONCEIVABLE_DELAY: f64 = 0.01;

/// A pending spell event. Entries order by scheduled time; ties break by
/// priority-list position so equal-time pops are FIFO and runs are
/// reproducible regardless of heap internals.
#[derive(Debug, Clone, Copy, PartialEq)]
struct QueueEntry {
    time: f64,
    order: usize,
}

impl Eq for QueueEntry {}

impl PartialOrd for QueueEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for QueueEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reverse ordering for min-heap behavior.
        other
            .time
            .partial_cmp(&self.time)
            .unwrap_or(Ordering::Equal)
            .then(other.order.cmp(&self.order))
    }
}

/// Run the discrete-event combat loop over `spells` until the fight ends.
///
/// Every spell starts due at t=0. Each pop either resolves a periodic tick
/// (no mana, no GCD) or attempts a cast, which is admitted only when
/// `timer + cast_time + latency` still fits inside the fight. A spell
/// whose cast cannot be admitted is dropped from the queue; the loop does
/// not search forward for a cheaper spell to fill the gap.
pub fn simulate_combat(spells: &mut [Spell], auras: &mut AuraState, options: &SimOptions) {
    let time_limit = options.duration;
    let latency = options.latency_secs();

    let mut queue: BinaryHeap<QueueEntry> = BinaryHeap::with_capacity(spells.len());
    for (order, spell) in spells.iter_mut().enumerate() {
        spell.scheduled_time = 0.0;
        queue.push(QueueEntry { time: 0.0, order });
    }

    // Every re-enqueue strictly increases a spell's scheduled time, so the
    // loop is bounded. The cap only trips on a spell definition with a
    // non-positive delay, which is a data bug - fail loudly.
    let event_budget =
        ((time_limit / MIN_CONCEIVABLE_DELAY) as usize + 1) * spells.len().max(1);
    let mut events = 0usize;

    while let Some(entry) = queue.pop() {
        events += 1;
        assert!(
            events <= event_budget,
            "event budget exceeded after {events} events: a spell re-scheduled with a non-positive delay"
        );

        let timer = entry.time;
        let spell = &mut spells[entry.order];

        // Anything scheduled at or past the boundary is irrelevant, and
        // nothing still queued can be due earlier than this entry.
        if timer >= time_limit {
            queue.clear();
            continue;
        }

        if spell.is_ticking() {
            spell.tick();
            queue.push(QueueEntry {
                time: spell.scheduled_time,
                order: entry.order,
            });
            continue;
        }

        let cast_time = spell.cast_time(auras);
        if timer + cast_time + latency < time_limit {
            spell.execute(timer, auras);
            spell.scheduled_time += spell.time_delay();
            if spell.scheduled_time < time_limit {
                queue.push(QueueEntry {
                    time: spell.scheduled_time,
                    order: entry.order,
                });
            }
            // Otherwise the fight ends before another full cycle fits;
            // let the spell fall out of the rotation.
        }
        // Not enough time for this spell: fall through to the next-ready
        // entry, whatever it is.
    }
}

/// Build the spell list for one configuration and run it to completion.
pub fn run_build(config: &BuildConfig) -> SimSummary {
    let mut spells = build_priority_list(config);
    let mut auras = AuraState::new(config.talents.backdraft);
    simulate_combat(&mut spells, &mut auras, &config.options);
    summarize(&spells)
}

/// Aggregate per-spell statistics into run totals.
pub fn summarize(spells: &[Spell]) -> SimSummary {
    SimSummary::from_spells(spells.iter().map(|s| (s.name, &s.statistics)))
}

/// Run several builds in parallel - gear comparisons are embarrassingly
/// parallel because each run owns its spell instances outright.
pub fn compare_builds(configs: &[BuildConfig]) -> Vec<SimSummary> {
    let num_threads = num_cpus::get().clamp(1, 8);

    let pool = ThreadPoolBuilder::new()
        .num_threads(num_threads)
        .build()
        .unwrap_or_else(|_| ThreadPoolBuilder::new().build().unwrap());

    pool.install(|| configs.par_iter().map(run_build).collect())
}

/// Sequential variant for callers that want predictable thread usage.
pub fn compare_builds_sequential(configs: &[BuildConfig]) -> Vec<SimSummary> {
    configs.iter().map(run_build).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{StatBundle, Talents};
    use crate::spell::tests::test_spell;
    use crate::spell::CastState;

    fn options(duration: f64, latency_ms: f64) -> SimOptions {
        SimOptions {
            duration,
            latency: latency_ms,
            target_level: 83,
        }
    }

    /// Hit-capped stats so scenario spells never miss.
    fn capped_stats() -> StatBundle {
        StatBundle {
            spell_hit: 0.17,
            ..StatBundle::default()
        }
    }

    #[test]
    fn instant_with_one_second_cadence_casts_ten_times() {
        // Instant cast, 1s cooldown cadence, hasted GCD of 0.5s: the t=9
        // cast still fits (9 + 0.5 + 0 < 10), the t=10 one does not.
        let mut spell = test_spell(StatBundle {
            spell_hit: 0.17,
            spell_haste: 1.0,
            ..StatBundle::default()
        });
        spell.may_crit = false;
        spell.base_execute_time = 0.0;
        spell.base_gcd = 1.0;
        spell.base_cooldown = 1.0;
        assert!((spell.global_cooldown() - 0.5).abs() < 1e-9);
        assert!((spell.time_delay() - 1.0).abs() < 1e-9);

        let mut spells = vec![spell];
        let mut auras = AuraState::default();
        simulate_combat(&mut spells, &mut auras, &options(10.0, 0.0));

        let statistics = &spells[0].statistics;
        assert_eq!(statistics.cast_count, 10);
        assert_eq!(statistics.misses.count, 0);
        assert_eq!(statistics.crits.count, 0);
        assert_eq!(statistics.hits.count, 10);
    }

    #[test]
    fn periodic_only_spell_casts_once_and_ticks_six_times() {
        // 6 ticks x 3s over an 18s duration in a 20s fight: the 18s tick
        // is admitted (18 < 20), the would-be re-cast at 21s is not.
        let mut spell = test_spell(capped_stats());
        spell.may_crit = false;
        spell.base_execute_time = 0.0;
        spell.base_min_damage = 0.0;
        spell.base_max_damage = 0.0;
        spell.base_tick_damage = 100.0;
        spell.base_tick_time = 3.0;
        spell.num_ticks = 6;
        spell.base_duration = 18.0;

        let mut spells = vec![spell];
        let mut auras = AuraState::default();
        simulate_combat(&mut spells, &mut auras, &options(20.0, 0.0));

        let statistics = &spells[0].statistics;
        assert_eq!(statistics.cast_count, 1);
        assert_eq!(statistics.tick_hits.count, 6);
        assert_eq!(statistics.tick_crits.count, 0);
    }

    #[test]
    fn long_fight_recasts_expired_dot() {
        // Same dot in a 60s fight: expiry returns it to the rotation at
        // t=21, 42... - it must not keep ticking off a single cast.
        let mut spell = test_spell(capped_stats());
        spell.may_crit = false;
        spell.base_execute_time = 0.0;
        spell.base_tick_damage = 100.0;
        spell.base_tick_time = 3.0;
        spell.num_ticks = 6;
        spell.base_duration = 18.0;

        let mut spells = vec![spell];
        let mut auras = AuraState::default();
        simulate_combat(&mut spells, &mut auras, &options(60.0, 0.0));

        // Casts at 0, 21 and 42; the third application only fits 5 of its
        // ticks (45..57) before the 63s re-cast falls outside the fight.
        let statistics = &spells[0].statistics;
        assert_eq!(statistics.cast_count, 3);
        assert_eq!(statistics.tick_hits.count, 17);
    }

    #[test]
    fn latency_blocks_final_cast_but_not_active_time() {
        // 3s cast with 1s latency in a 5s fight: admitted at t=0
        // (0+3+1 < 5), re-scheduled to t=3, rejected there (3+3+1 >= 5).
        // Active time counts the cast, never the latency.
        let mut spell = test_spell(capped_stats());
        spell.may_crit = false;

        let mut spells = vec![spell];
        let mut auras = AuraState::default();
        simulate_combat(&mut spells, &mut auras, &options(5.0, 1000.0));

        let statistics = &spells[0].statistics;
        assert_eq!(statistics.cast_count, 1);
        assert!((statistics.active_time - 3.0).abs() < 1e-9);
    }

    #[test]
    fn empty_rotation_is_a_no_op() {
        let mut spells: Vec<Spell> = Vec::new();
        let mut auras = AuraState::default();
        simulate_combat(&mut spells, &mut auras, &options(300.0, 100.0));

        let summary = summarize(&spells);
        assert_eq!(summary.overall_damage, 0.0);
        assert_eq!(summary.active_time, 0.0);
        assert_eq!(summary.dps, 0.0);
        assert!(!summary.dps.is_nan());
    }

    #[test]
    fn no_event_lands_past_the_fight_boundary() {
        let duration = 47.0;
        let mut dot = test_spell(capped_stats());
        dot.may_crit = false;
        dot.base_execute_time = 0.0;
        dot.base_tick_damage = 50.0;
        dot.base_tick_time = 3.0;
        dot.num_ticks = 6;
        dot.base_duration = 18.0;
        let mut nuke = test_spell(capped_stats());
        nuke.may_crit = false;

        let mut spells = vec![dot, nuke];
        let mut auras = AuraState::default();
        simulate_combat(&mut spells, &mut auras, &options(duration, 100.0));

        for spell in &spells {
            // The final schedule may point past the boundary (that's why
            // the spell left the queue), but no more than one full cycle.
            assert!(spell.scheduled_time < duration + spell.time_delay() + 1e-9);
            // And recorded activity always fits inside the fight.
            assert!(spell.statistics.active_time <= duration);
        }
    }

    #[test]
    fn equal_times_pop_in_priority_list_order() {
        // An aura-granting instant and a destruction cast, both due at
        // t=0. FIFO by list position means the instant resolves first and
        // its Backdraft charges shorten the very first cast of the nuke;
        // with the order reversed, that first cast runs at full length.
        let aura_source = || {
            let mut granter = test_spell(capped_stats());
            granter.may_crit = false;
            granter.base_execute_time = 0.0;
            granter.base_cooldown = 100.0;
            granter.grants_backdraft = true;
            granter
        };
        let mut nuke = test_spell(capped_stats());
        nuke.may_crit = false; // 3s destruction cast

        let mut spells = vec![aura_source(), nuke.clone()];
        let mut auras = AuraState::new(3);
        simulate_combat(&mut spells, &mut auras, &options(5.0, 0.0));
        // Granter popped first: the nuke's t=0 cast already runs at the
        // 30% reduction, so exactly one 2.1s cast lands.
        assert!((spells[1].statistics.active_time - 2.1).abs() < 1e-9);

        let mut spells = vec![nuke, aura_source()];
        let mut auras = AuraState::new(3);
        simulate_combat(&mut spells, &mut auras, &options(5.0, 0.0));
        // Nuke listed first: its t=0 cast resolves before the charges
        // exist and takes the full 3s.
        assert!((spells[0].statistics.active_time - 3.0).abs() < 1e-9);
    }

    #[test]
    fn deterministic_across_runs() {
        let config = BuildConfig {
            stats: StatBundle {
                spell_power: 2240.0,
                spell_hit: 0.10,
                spell_crit: 0.31,
                spell_haste: 0.22,
                ..StatBundle::default()
            },
            talents: Talents {
                shadow_mastery: 5,
                haunt: 1,
                unstable_affliction: 1,
                pandemic: 1,
                malediction: 3,
                contagion: 5,
                ..Talents::default()
            },
            options: SimOptions::default(),
            priority: vec![
                "Haunt".to_string(),
                "Unstable Affliction".to_string(),
                "Corruption".to_string(),
                "Curse of Agony".to_string(),
                "Shadow Bolt".to_string(),
            ],
            minion: None,
        };

        let first = run_build(&config);
        let second = run_build(&config);
        assert_eq!(first, second);
        assert!(first.overall_damage > 0.0);
        assert!(first.dps > 0.0);
    }

    #[test]
    fn parallel_comparison_matches_sequential() {
        let make = |spell_power: f64| BuildConfig {
            stats: StatBundle {
                spell_power,
                spell_hit: 0.17,
                ..StatBundle::default()
            },
            priority: vec!["Shadow Bolt".to_string(), "Corruption".to_string()],
            ..BuildConfig::default()
        };
        let configs = vec![make(2000.0), make(2100.0), make(2200.0)];

        let parallel = compare_builds(&configs);
        let sequential = compare_builds_sequential(&configs);
        assert_eq!(parallel, sequential);
        // More spell power can only help.
        assert!(parallel[2].dps > parallel[0].dps);
    }

    #[test]
    fn resolver_outcomes_converge_over_a_long_fight() {
        // ~10000 casts of a 1s-cadence instant at 83% hit, 30% crit.
        let mut spell = test_spell(StatBundle {
            spell_crit: 0.30,
            spell_haste: 1.0,
            ..StatBundle::default()
        });
        spell.base_execute_time = 0.0;
        spell.base_gcd = 1.0;
        spell.base_cooldown = 1.0;

        let mut spells = vec![spell];
        let mut auras = AuraState::default();
        simulate_combat(&mut spells, &mut auras, &options(10_000.0, 0.0));

        let statistics = &spells[0].statistics;
        let n = statistics.cast_count as f64;
        assert!(n >= 9_999.0);
        let hit_rate = statistics.landed_casts() as f64 / n;
        let crit_rate = statistics.crits.count as f64 / n;
        assert!((hit_rate - 0.83).abs() < 0.001);
        assert!((crit_rate - 0.83 * 0.30).abs() < 0.001);
    }

    #[test]
    #[should_panic(expected = "event budget exceeded")]
    fn zero_delay_spell_trips_the_backstop() {
        // A periodic spell with a 0s tick interval re-schedules itself at
        // the same instant forever - a data-definition bug the loop must
        // surface instead of hanging.
        let mut spell = test_spell(capped_stats());
        spell.may_crit = false;
        spell.base_execute_time = 0.0;
        spell.num_ticks = 10;
        spell.base_tick_time = 0.0;
        spell.base_duration = 18.0;
        spell.state = CastState::Ticking {
            ticks_left: u32::MAX,
            ready_at: 0.0,
        };

        let mut spells = vec![spell];
        let mut auras = AuraState::default();
        simulate_combat(&mut spells, &mut auras, &options(300.0, 0.0));
    }
}
