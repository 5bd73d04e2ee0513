//! The spell model: timing, damage formulas, the deterministic attack
//! table and the per-instance cast state machine
//!
//! Every castable action is a `Spell` value built by the catalog. Talent
//! and glyph effects are baked into the base fields at construction, so
//! the methods here only combine those with the stat bundle, the target
//! and the aura state.

use crate::aura::AuraState;
use crate::catalog::SpellKind;
use crate::config::StatBundle;
use crate::stats::Statistics;

/// The firestone weapon imbue increases direct damage by 1%.
const FIRESTONE_DIRECT_DAMAGE_BONUS: f64 = 0.01;
/// The spellstone weapon imbue increases periodic damage by 1%.
const SPELLSTONE_DOT_DAMAGE_BONUS: f64 = 0.01;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MagicSchool {
    Shadow,
    Fire,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpellTree {
    None,
    Affliction,
    Demonology,
    Destruction,
}

/// Where a spell instance is in its cast cycle.
///
/// `Idle` spells cast when popped. A cast moves the spell to `Recharging`
/// (one-shot) or `Ticking` (periodic); a finished periodic effect returns
/// to `Recharging` or `Idle` depending on whether a cooldown gates it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CastState {
    Idle,
    Recharging { ready_at: f64 },
    Ticking { ticks_left: u32, ready_at: f64 },
}

/// Damage snapshot for spells that derive their numbers from another
/// spell's periodic effect instead of their own base values (Conflagrate
/// consumes the Immolate dot). Taken once at construction - stats are
/// static for the whole run.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DerivedDamage {
    /// Full periodic damage of the source effect (tick damage x ticks).
    pub source_dot_damage: f64,
    /// Fraction delivered as the instant hit.
    pub direct_portion: f64,
    /// Fraction delivered over this spell's own ticks.
    pub dot_portion: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Spell {
    pub kind: SpellKind,
    pub name: &'static str,
    pub school: MagicSchool,
    pub tree: SpellTree,
    /// False for utility casts (Life Tap, Dark Pact) that never touch the
    /// attack table.
    pub harmful: bool,
    pub channeled: bool,
    pub area_of_effect: bool,
    /// Binary spells land fully or not at all (no partial resists).
    pub binary: bool,

    // Timing. Talent adjustments are already folded in.
    pub base_execute_time: f64,
    pub base_gcd: f64,
    pub base_cooldown: f64,
    pub base_duration: f64,
    pub base_tick_time: f64,
    pub num_ticks: u32,
    pub hasted_ticks: bool,
    /// Flat cast-time reduction applied after haste (glyph effects).
    pub cast_time_reduction: f64,

    // Damage formula inputs.
    pub base_min_damage: f64,
    pub base_max_damage: f64,
    pub base_tick_damage: f64,
    pub direct_coefficient: f64,
    pub direct_multiplier: f64,
    pub tick_coefficient: f64,
    pub tick_multiplier: f64,
    /// Flat-damage talent bonus applied to every result (Demonic Pact).
    pub flat_damage_bonus: f64,
    pub base_crit_chance: f64,
    /// 1.5 = +50% crit damage before talents and metagem.
    pub base_crit_multiplier: f64,
    /// Tree / identity scaling of the crit damage bonus (Ruin, Pandemic).
    pub crit_bonus_scale: f64,
    pub may_crit: bool,
    pub ticks_may_crit: bool,

    // Resources.
    /// Mana cost as a fraction of base mana.
    pub base_cost: f64,
    /// Talent cost reduction (Cataclysm, Suppression).
    pub cost_multiplier: f64,

    pub derived_damage: Option<DerivedDamage>,
    /// A successful cast grants Backdraft charges (talented Conflagrate).
    pub grants_backdraft: bool,

    // Immutable inputs, snapshotted at construction.
    pub stats: StatBundle,
    pub target_hit: f64,

    // Mutable simulation state.
    pub scheduled_time: f64,
    pub state: CastState,
    pub statistics: Statistics,
}

impl Spell {
    // ------------------------------------------------------------------
    // Timing
    // ------------------------------------------------------------------

    /// Hasted cast time, floored at 1s; 0 for instants.
    pub fn execute_time(&self) -> f64 {
        if self.base_execute_time <= 0.0 {
            return 0.0;
        }
        let hasted = (self.base_execute_time / (1.0 + self.stats.spell_haste)).max(1.0);
        (hasted - self.cast_time_reduction).max(0.0)
    }

    /// Hasted global cooldown. A 1.0s base (Amplify Curse) floors at 0.5s,
    /// the standard 1.5s base floors at 1.0s.
    pub fn global_cooldown(&self) -> f64 {
        let floor = if self.base_gcd == 1.0 { 0.5 } else { 1.0 };
        (self.base_gcd / (1.0 + self.stats.spell_haste)).max(floor)
    }

    pub fn cooldown(&self) -> f64 {
        self.base_cooldown
    }

    pub fn duration(&self) -> f64 {
        self.base_duration
    }

    /// Interval between periodic ticks; haste applies only to flagged
    /// spells.
    pub fn tick_time(&self) -> f64 {
        if self.hasted_ticks {
            self.base_tick_time / (1.0 + self.stats.spell_haste)
        } else {
            self.base_tick_time
        }
    }

    pub fn is_periodic(&self) -> bool {
        self.num_ticks > 0
    }

    pub fn is_ticking(&self) -> bool {
        matches!(self.state, CastState::Ticking { .. })
    }

    /// Re-scheduling interval after one resolution: the tick interval
    /// while a periodic effect is running, otherwise the first non-zero of
    /// cooldown, duration, cast time and GCD.
    pub fn time_delay(&self) -> f64 {
        if self.is_ticking() {
            return self.tick_time();
        }
        if self.cooldown() > 0.0 {
            self.cooldown()
        } else if self.duration() > 0.0 {
            self.duration()
        } else if self.execute_time() > 0.0 {
            self.execute_time()
        } else {
            self.global_cooldown()
        }
    }

    /// Time this cast occupies the fight clock: the (aura-adjusted) cast
    /// time, or the GCD for instants. Used by both the admission check and
    /// the active-time ledger so the two can never disagree.
    pub fn cast_time(&self, auras: &AuraState) -> f64 {
        let exec = self.execute_time();
        if exec > 0.0 {
            if self.tree == SpellTree::Destruction && auras.backdraft_active() {
                (exec * auras.cast_factor()).max(1.0)
            } else {
                exec
            }
        } else {
            self.global_cooldown()
        }
    }

    /// Same as `cast_time`, but spends the Backdraft charge it applies.
    fn cast_time_consuming(&self, auras: &mut AuraState) -> f64 {
        let exec = self.execute_time();
        if exec > 0.0 {
            if self.tree == SpellTree::Destruction && auras.backdraft_active() {
                let factor = auras.cast_factor();
                auras.consume_backdraft();
                (exec * factor).max(1.0)
            } else {
                exec
            }
        } else {
            self.global_cooldown()
        }
    }

    // ------------------------------------------------------------------
    // Damage formulas
    // ------------------------------------------------------------------

    fn school_power(&self) -> f64 {
        let additional = match self.school {
            MagicSchool::Shadow => self.stats.shadow_damage,
            MagicSchool::Fire => self.stats.fire_damage,
        };
        self.stats.spell_power + additional
    }

    /// D = (B + Sp x C) x M, then the flat-damage talent bonus, the raid
    /// damage bonus and the school-specific damage-taken bonus, in that
    /// order.
    fn calculate_damage(&self, base_value: f64, coefficient: f64, multiplier: f64) -> f64 {
        let mut damage = (base_value + self.school_power() * coefficient) * multiplier;
        damage *= self.flat_damage_bonus;
        damage *= 1.0 + self.stats.bonus_damage_multiplier;
        damage *= 1.0
            + match self.school {
                MagicSchool::Shadow => self.stats.bonus_shadow_damage_multiplier,
                MagicSchool::Fire => self.stats.bonus_fire_damage_multiplier,
            };
        damage
    }

    /// Minimum non-critical direct damage per cast.
    pub fn min_hit_damage(&self) -> f64 {
        if let Some(derived) = self.derived_damage {
            return derived.source_dot_damage * derived.direct_portion;
        }
        self.calculate_damage(self.base_min_damage, self.direct_coefficient, self.direct_multiplier)
            * (1.0 + FIRESTONE_DIRECT_DAMAGE_BONUS)
    }

    /// Maximum non-critical direct damage per cast.
    pub fn max_hit_damage(&self) -> f64 {
        if let Some(derived) = self.derived_damage {
            return derived.source_dot_damage * derived.direct_portion;
        }
        self.calculate_damage(self.base_max_damage, self.direct_coefficient, self.direct_multiplier)
            * (1.0 + FIRESTONE_DIRECT_DAMAGE_BONUS)
    }

    /// Non-critical damage per periodic tick.
    pub fn tick_hit_damage(&self) -> f64 {
        if let Some(derived) = self.derived_damage {
            if self.num_ticks == 0 {
                return 0.0;
            }
            return derived.source_dot_damage * derived.dot_portion / self.num_ticks as f64;
        }
        self.calculate_damage(self.base_tick_damage, self.tick_coefficient, self.tick_multiplier)
            * (1.0 + SPELLSTONE_DOT_DAMAGE_BONUS)
    }

    pub fn tick_crit_damage(&self) -> f64 {
        if self.ticks_may_crit {
            self.tick_hit_damage() * self.crit_multiplier()
        } else {
            0.0
        }
    }

    /// Crit damage multiplier: the base bonus (+50%) and the metagem bonus
    /// add together, then talents (Ruin, Pandemic) scale the combined
    /// bonus.
    pub fn crit_multiplier(&self) -> f64 {
        let crit_bonus = self.base_crit_multiplier - 1.0;
        let metagem_bonus = self.stats.bonus_spell_crit_multiplier * 1.5;
        1.0 + (crit_bonus + metagem_bonus) * self.crit_bonus_scale
    }

    pub fn crit_chance(&self) -> f64 {
        self.stats.spell_crit + self.base_crit_chance
    }

    /// Total chance to hit the target, capped at 100%.
    pub fn hit_chance(&self) -> f64 {
        (self.stats.spell_hit + self.target_hit).min(1.0)
    }

    pub fn avg_hit_damage(&self) -> f64 {
        (self.min_hit_damage() + self.max_hit_damage()) / 2.0
    }

    pub fn avg_crit_damage(&self) -> f64 {
        self.avg_hit_damage() * self.crit_multiplier()
    }

    /// Average direct damage per cast, weighted by the attack table.
    pub fn avg_direct_damage(&self) -> f64 {
        self.avg_hit_damage() * (self.hit_chance() - self.crit_chance())
            + self.avg_crit_damage() * self.crit_chance()
    }

    /// Average damage per tick, including tick crits where allowed.
    pub fn avg_tick_damage(&self) -> f64 {
        if self.ticks_may_crit {
            self.tick_hit_damage() * (self.hit_chance() - self.crit_chance())
                + self.tick_crit_damage() * self.crit_chance()
        } else {
            self.tick_hit_damage()
        }
    }

    pub fn avg_dot_damage(&self) -> f64 {
        self.avg_tick_damage() * self.num_ticks as f64
    }

    /// Average direct + periodic damage per cast.
    pub fn avg_total_damage(&self) -> f64 {
        self.avg_direct_damage() + self.avg_dot_damage()
    }

    /// Mana required to cast.
    pub fn mana(&self) -> f64 {
        (self.stats.base_mana * self.base_cost * self.cost_multiplier).floor()
    }

    // ------------------------------------------------------------------
    // Combat resolution
    // ------------------------------------------------------------------

    /// Resolve one cast with the two-roll deterministic attack table and
    /// record the outcome. The sole side-effecting operation on a spell.
    ///
    /// Roll one compares the running hit rate against the target hit
    /// chance: once the ledger has gotten ahead of the expected ratio, a
    /// miss is issued to correct it. Roll two does the same for crits,
    /// measured over all casts, so hit chance suppresses the achievable
    /// crit rate. No random numbers anywhere - a run is fully
    /// reproducible.
    pub fn execute(&mut self, now: f64, auras: &mut AuraState) {
        self.statistics.cast_count += 1;

        let cast_time = self.cast_time_consuming(auras);

        if !self.harmful {
            // Utility casts never enter the attack table.
            self.statistics.mana_used += self.mana();
            self.statistics.active_time += cast_time;
            self.enter_recharge(now);
            return;
        }

        let total_hit_chance = self.hit_chance();
        let missed = if total_hit_chance < 1.0 {
            let landed = self.statistics.landed_casts() as f64;
            let hit_rate = landed / self.statistics.cast_count as f64;
            hit_rate > total_hit_chance
        } else {
            false
        };

        if missed {
            self.statistics.misses.record(self.avg_total_damage());
            self.enter_recharge(now);
        } else {
            if self.may_crit {
                let expected_crit_rate = total_hit_chance * self.crit_chance();
                let actual_crit_rate =
                    self.statistics.crits.count as f64 / self.statistics.cast_count as f64;
                if actual_crit_rate < expected_crit_rate {
                    self.statistics.crits.record(self.avg_crit_damage());
                } else {
                    self.statistics.hits.record(self.avg_hit_damage());
                }
            } else {
                self.statistics.hits.record(self.avg_hit_damage());
            }

            if self.grants_backdraft {
                auras.trigger_backdraft();
            }

            if self.num_ticks > 0 {
                self.state = CastState::Ticking {
                    ticks_left: self.num_ticks,
                    ready_at: now + self.cooldown(),
                };
            } else {
                self.enter_recharge(now);
            }
        }

        self.statistics.mana_used += self.mana();
        self.statistics.active_time += cast_time;
    }

    /// Resolve one due periodic tick and advance the schedule. Ticks cost
    /// no mana and no GCD; tick crits follow the same self-correcting
    /// ratio over the tick counters (ticks cannot miss, so the expected
    /// rate is the crit chance alone).
    pub fn tick(&mut self) {
        let CastState::Ticking { ticks_left, ready_at } = self.state else {
            return;
        };

        if self.ticks_may_crit {
            let total_ticks = (self.statistics.tick_hits.count + self.statistics.tick_crits.count) as f64;
            let actual_crit_rate = if total_ticks > 0.0 {
                self.statistics.tick_crits.count as f64 / total_ticks
            } else {
                0.0
            };
            if actual_crit_rate < self.crit_chance() {
                self.statistics.tick_crits.record(self.tick_crit_damage());
            } else {
                self.statistics.tick_hits.record(self.tick_hit_damage());
            }
        } else {
            self.statistics.tick_hits.record(self.tick_hit_damage());
        }

        let next = self.scheduled_time + self.tick_time();
        if ticks_left <= 1 {
            // The effect expired: re-castable one tick interval after the
            // last tick, and never before the cooldown gate.
            self.scheduled_time = next.max(ready_at);
            self.state = if self.cooldown() > 0.0 {
                CastState::Recharging { ready_at }
            } else {
                CastState::Idle
            };
        } else {
            self.scheduled_time = next;
            self.state = CastState::Ticking {
                ticks_left: ticks_left - 1,
                ready_at,
            };
        }
    }

    fn enter_recharge(&mut self, now: f64) {
        let cooldown = self.cooldown();
        self.state = if cooldown > 0.0 {
            CastState::Recharging {
                ready_at: now + cooldown,
            }
        } else {
            CastState::Idle
        };
    }
}
