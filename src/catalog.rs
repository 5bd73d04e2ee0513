//! The spell catalog: base numbers, coefficients and talent math for every
//! castable spell
//!
//! Spells are identified by a closed `SpellKind` enum; name resolution
//! happens once when the priority list is built, never inside the
//! simulation loop. Each builder bakes the relevant talent and glyph
//! effects into the spell's base fields, so a constructed `Spell` needs
//! only the stat bundle (and the aura state) at cast time. Builders return
//! `None` when the required talent is not taken.

use crate::config::{BuildConfig, SimOptions, StatBundle, Talents};
use crate::spell::{CastState, DerivedDamage, MagicSchool, Spell, SpellTree};
use crate::stats::Statistics;

/// Closed set of castable spells.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SpellKind {
    // Shadow school
    ShadowBolt,
    Haunt,
    Corruption,
    CurseOfAgony,
    CurseOfDoom,
    UnstableAffliction,
    DeathCoil,
    DrainLife,
    DrainSoul,
    SeedOfCorruption,
    Shadowflame,
    Shadowburn,
    Shadowfury,
    LifeTap,
    DarkPact,
    // Fire school
    Immolate,
    ImmolationAura,
    Conflagrate,
    ChaosBolt,
    Incinerate,
    SearingPain,
    SoulFire,
    RainOfFire,
    Hellfire,
}

impl SpellKind {
    /// Resolve a configured spell name. Unknown names yield `None` and are
    /// skipped by the list builder.
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "Shadow Bolt" => Some(Self::ShadowBolt),
            "Haunt" => Some(Self::Haunt),
            "Corruption" => Some(Self::Corruption),
            "Curse of Agony" => Some(Self::CurseOfAgony),
            "Curse of Doom" => Some(Self::CurseOfDoom),
            "Unstable Affliction" => Some(Self::UnstableAffliction),
            "Death Coil" => Some(Self::DeathCoil),
            "Drain Life" => Some(Self::DrainLife),
            "Drain Soul" => Some(Self::DrainSoul),
            "Seed of Corruption" => Some(Self::SeedOfCorruption),
            "Shadowflame" => Some(Self::Shadowflame),
            "Shadowburn" => Some(Self::Shadowburn),
            "Shadowfury" => Some(Self::Shadowfury),
            "Life Tap" => Some(Self::LifeTap),
            "Dark Pact" => Some(Self::DarkPact),
            "Immolate" => Some(Self::Immolate),
            "Immolation Aura" => Some(Self::ImmolationAura),
            "Conflagrate" => Some(Self::Conflagrate),
            "Chaos Bolt" => Some(Self::ChaosBolt),
            "Incinerate" => Some(Self::Incinerate),
            "Searing Pain" => Some(Self::SearingPain),
            "Soul Fire" => Some(Self::SoulFire),
            "Rain of Fire" => Some(Self::RainOfFire),
            "Hellfire" => Some(Self::Hellfire),
            _ => None,
        }
    }
}

/// Build the live spell list from the configured priority order, dropping
/// names that don't resolve or are gated behind untaken talents.
pub fn build_priority_list(config: &BuildConfig) -> Vec<Spell> {
    config
        .priority
        .iter()
        .filter_map(|name| SpellKind::from_name(name))
        .filter_map(|kind| create_spell(kind, &config.stats, &config.talents, &config.options))
        .collect()
}

/// Construct one spell, or `None` when its talent requirement is unmet.
pub fn create_spell(
    kind: SpellKind,
    stats: &StatBundle,
    talents: &Talents,
    options: &SimOptions,
) -> Option<Spell> {
    match kind {
        SpellKind::ShadowBolt => Some(shadow_bolt(stats, talents, options)),
        SpellKind::Haunt => (talents.haunt > 0).then(|| haunt(stats, talents, options)),
        SpellKind::Corruption => Some(corruption(stats, talents, options)),
        SpellKind::CurseOfAgony => Some(curse_of_agony(stats, talents, options)),
        SpellKind::CurseOfDoom => Some(curse_of_doom(stats, talents, options)),
        SpellKind::UnstableAffliction => {
            (talents.unstable_affliction > 0).then(|| unstable_affliction(stats, talents, options))
        }
        SpellKind::DeathCoil => Some(death_coil(stats, talents, options)),
        SpellKind::DrainLife => Some(drain_life(stats, talents, options)),
        SpellKind::DrainSoul => Some(drain_soul(stats, talents, options)),
        SpellKind::SeedOfCorruption => Some(seed_of_corruption(stats, talents, options)),
        SpellKind::Shadowflame => Some(shadowflame(stats, talents, options)),
        SpellKind::Shadowburn => (talents.shadowburn > 0).then(|| shadowburn(stats, talents, options)),
        SpellKind::Shadowfury => (talents.shadowfury > 0).then(|| shadowfury(stats, talents, options)),
        SpellKind::LifeTap => Some(life_tap(stats, talents, options)),
        SpellKind::DarkPact => (talents.dark_pact > 0).then(|| dark_pact(stats, talents, options)),
        SpellKind::Immolate => Some(immolate(stats, talents, options)),
        SpellKind::ImmolationAura => {
            (talents.metamorphosis > 0).then(|| immolation_aura(stats, talents, options))
        }
        SpellKind::Conflagrate => (talents.conflagrate > 0).then(|| conflagrate(stats, talents, options)),
        SpellKind::ChaosBolt => (talents.chaos_bolt > 0).then(|| chaos_bolt(stats, talents, options)),
        SpellKind::Incinerate => Some(incinerate(stats, talents, options)),
        SpellKind::SearingPain => Some(searing_pain(stats, talents, options)),
        SpellKind::SoulFire => Some(soul_fire(stats, talents, options)),
        SpellKind::RainOfFire => Some(rain_of_fire(stats, talents, options)),
        SpellKind::Hellfire => Some(hellfire(stats, talents, options)),
    }
}

/// Mana returned by one Life Tap. Scales with spell power.
pub fn life_tap_mana_gained(stats: &StatBundle, talents: &Talents) -> f64 {
    ((2000.0 + stats.spell_power * 0.5) * (1.0 + talents.improved_life_tap as f64 * 0.10)).floor()
}

/// Mana drained from the minion by one Dark Pact. Receives 96% of the
/// shadow damage bonus.
pub fn dark_pact_mana_gained(stats: &StatBundle) -> f64 {
    (1200.0 + (stats.spell_power + stats.shadow_damage) * 0.96).floor()
}

// ----------------------------------------------------------------------
// Builders
// ----------------------------------------------------------------------

/// Common template: the fields every builder starts from, matching the
/// base-ability defaults (3s cast, 1.5s GCD, x1 multipliers, 1.5 crit).
#[allow(clippy::too_many_arguments)]
fn base(
    kind: SpellKind,
    name: &'static str,
    school: MagicSchool,
    tree: SpellTree,
    base_min_damage: f64,
    base_max_damage: f64,
    base_tick_damage: f64,
    base_cost: f64,
    stats: &StatBundle,
    talents: &Talents,
    options: &SimOptions,
) -> Spell {
    let cost_multiplier = match tree {
        SpellTree::Destruction => {
            1.0 - match talents.cataclysm {
                0 => 0.0,
                1 => 0.04,
                2 => 0.07,
                _ => 0.10,
            }
        }
        SpellTree::Affliction => 1.0 - talents.suppression as f64 * 0.02,
        _ => 1.0,
    };

    // Ruin doubles the crit bonus of destruction spells at 5/5; Pandemic
    // does the same for Haunt, Corruption and Unstable Affliction.
    let crit_bonus_scale = if tree == SpellTree::Destruction {
        1.0 + talents.ruin as f64 * 0.20
    } else if matches!(
        kind,
        SpellKind::Haunt | SpellKind::Corruption | SpellKind::UnstableAffliction
    ) {
        1.0 + talents.pandemic as f64
    } else {
        1.0
    };

    Spell {
        kind,
        name,
        school,
        tree,
        harmful: true,
        channeled: false,
        area_of_effect: false,
        binary: false,
        base_execute_time: 3.0,
        base_gcd: 1.5,
        base_cooldown: 0.0,
        base_duration: 0.0,
        base_tick_time: 3.0,
        num_ticks: 0,
        hasted_ticks: false,
        cast_time_reduction: 0.0,
        base_min_damage,
        base_max_damage,
        base_tick_damage,
        direct_coefficient: 0.0,
        direct_multiplier: 1.0,
        tick_coefficient: 0.0,
        tick_multiplier: 1.0,
        flat_damage_bonus: 1.0 + talents.demonic_pact as f64 * 0.01,
        base_crit_chance: 0.0,
        base_crit_multiplier: 1.5,
        crit_bonus_scale,
        may_crit: false,
        ticks_may_crit: false,
        base_cost,
        cost_multiplier,
        derived_damage: None,
        grants_backdraft: false,
        stats: *stats,
        target_hit: options.target_hit(),
        scheduled_time: 0.0,
        state: CastState::Idle,
        statistics: Statistics::default(),
    }
}

fn malediction(talents: &Talents) -> f64 {
    1.0 + talents.malediction as f64 * 0.01
}

/// Sends a shadowy bolt at the enemy. The standard filler nuke.
fn shadow_bolt(stats: &StatBundle, talents: &Talents, options: &SimOptions) -> Spell {
    let mut spell = base(
        SpellKind::ShadowBolt,
        "Shadow Bolt",
        MagicSchool::Shadow,
        SpellTree::Destruction,
        694.0,
        775.0,
        0.0,
        0.17,
        stats,
        talents,
        options,
    );
    spell.may_crit = true;
    // Bane shortens the cast; the coefficient keeps the untalented time.
    spell.direct_coefficient = (3.0 / 3.5) * (1.0 + talents.shadow_and_flame as f64 * 0.04);
    spell.base_execute_time = 3.0 - talents.bane as f64 * 0.1;
    spell.direct_multiplier = (1.0
        + talents.shadow_mastery as f64 * 0.03
        + talents.improved_shadow_bolt as f64 * 0.01)
        * malediction(talents);
    spell.base_crit_chance = talents.devastation as f64 * 0.05;
    spell
}

/// A ghostly soul dealing direct damage; short cooldown keeps it on a
/// strict cadence.
fn haunt(stats: &StatBundle, talents: &Talents, options: &SimOptions) -> Spell {
    let mut spell = base(
        SpellKind::Haunt,
        "Haunt",
        MagicSchool::Shadow,
        SpellTree::Affliction,
        645.0,
        753.0,
        0.0,
        0.12,
        stats,
        talents,
        options,
    );
    spell.may_crit = true;
    spell.base_execute_time = 1.5;
    spell.base_duration = 12.0;
    spell.base_cooldown = 8.0;
    spell.direct_coefficient = 1.5 / 3.5;
    spell.direct_multiplier = (1.0 + talents.shadow_mastery as f64 * 0.03)
        * (1.0 + if talents.glyph_haunt { 0.03 } else { 0.0 });
    spell
}

/// Corrupts the target: 6 ticks over 18 sec, refreshable indefinitely.
fn corruption(stats: &StatBundle, talents: &Talents, options: &SimOptions) -> Spell {
    let mut spell = base(
        SpellKind::Corruption,
        "Corruption",
        MagicSchool::Shadow,
        SpellTree::Affliction,
        0.0,
        0.0,
        180.0,
        0.14,
        stats,
        talents,
        options,
    );
    spell.base_execute_time = 0.0;
    spell.base_tick_time = 3.0;
    spell.num_ticks = 6;
    spell.base_duration = 18.0;

    // Dot coefficient follows C = Duration / 15, split per tick.
    spell.tick_coefficient = (18.0 / 15.0) / 6.0
        + talents.empowered_corruption as f64 * (0.12 / 6.0)
        + talents.everlasting_affliction as f64 * 0.01;
    spell.tick_multiplier = (1.0
        + talents.improved_corruption as f64 * 0.02
        + talents.shadow_mastery as f64 * 0.03
        + talents.contagion as f64 * 0.01
        + talents.siphon_life as f64 * 0.05)
        * malediction(talents);

    if talents.pandemic > 0 {
        spell.ticks_may_crit = true;
        spell.base_crit_chance = talents.malediction as f64 * 0.03;
    }
    spell
}

/// 12 ticks over 24 sec; 14 with the glyph. Damage ramp is averaged.
fn curse_of_agony(stats: &StatBundle, talents: &Talents, options: &SimOptions) -> Spell {
    let mut spell = base(
        SpellKind::CurseOfAgony,
        "Curse of Agony",
        MagicSchool::Shadow,
        SpellTree::Affliction,
        0.0,
        0.0,
        145.0,
        0.10,
        stats,
        talents,
        options,
    );
    spell.base_execute_time = 0.0;
    spell.base_tick_time = 2.0;
    spell.num_ticks = if talents.glyph_curse_of_agony { 14 } else { 12 };
    spell.base_duration = 24.0;
    spell.base_gcd = if talents.amplify_curse > 0 { 1.0 } else { 1.5 };

    // Capped at 10% per tick - an exception to the duration/15 rule.
    spell.tick_coefficient = 0.10;
    spell.tick_multiplier = (1.0
        + talents.improved_curse_of_agony as f64 * 0.05
        + talents.shadow_mastery as f64 * 0.03
        + talents.contagion as f64 * 0.01)
        * malediction(talents);
    spell
}

/// One giant tick after a full minute.
fn curse_of_doom(stats: &StatBundle, talents: &Talents, options: &SimOptions) -> Spell {
    let mut spell = base(
        SpellKind::CurseOfDoom,
        "Curse of Doom",
        MagicSchool::Shadow,
        SpellTree::Affliction,
        0.0,
        0.0,
        7300.0,
        0.15,
        stats,
        talents,
        options,
    );
    spell.base_execute_time = 0.0;
    spell.base_tick_time = 60.0;
    spell.num_ticks = 1;
    spell.base_gcd = if talents.amplify_curse > 0 { 1.0 } else { 1.5 };

    // Capped at 200% - another exception to the dot coefficient rule.
    spell.tick_coefficient = 2.0;
    spell.tick_multiplier = (1.0 + talents.shadow_mastery as f64 * 0.03) * malediction(talents);
    spell
}

/// 5 ticks over 15 sec behind a 1.5s cast.
fn unstable_affliction(stats: &StatBundle, talents: &Talents, options: &SimOptions) -> Spell {
    let mut spell = base(
        SpellKind::UnstableAffliction,
        "Unstable Affliction",
        MagicSchool::Shadow,
        SpellTree::Affliction,
        0.0,
        0.0,
        230.0,
        0.15,
        stats,
        talents,
        options,
    );
    spell.base_execute_time = 1.5;
    spell.base_tick_time = 3.0;
    spell.num_ticks = 5;
    spell.base_duration = 15.0;
    if talents.glyph_unstable_affliction {
        spell.cast_time_reduction = 0.2;
    }

    spell.tick_coefficient = 3.0 / 15.0 + talents.everlasting_affliction as f64 * 0.01;
    spell.tick_multiplier = (1.0
        + talents.shadow_mastery as f64 * 0.03
        + talents.siphon_life as f64 * 0.05)
        * malediction(talents);

    if talents.pandemic > 0 {
        spell.ticks_may_crit = true;
        spell.base_crit_chance = talents.malediction as f64 * 0.03;
    }
    spell
}

/// Instant direct damage on a 2 min cooldown; binary because of the fear
/// component.
fn death_coil(stats: &StatBundle, talents: &Talents, options: &SimOptions) -> Spell {
    let mut spell = base(
        SpellKind::DeathCoil,
        "Death Coil",
        MagicSchool::Shadow,
        SpellTree::Affliction,
        800.0,
        800.0,
        0.0,
        0.23,
        stats,
        talents,
        options,
    );
    spell.binary = true;
    spell.may_crit = true;
    spell.base_execute_time = 0.0;
    spell.base_duration = 3.0 + if talents.glyph_death_coil { 0.5 } else { 0.0 };
    spell.base_cooldown = 120.0;

    spell.direct_coefficient = (1.5 / 3.5) / 2.0;
    spell.direct_multiplier = (1.0 + talents.shadow_mastery as f64 * 0.03) * malediction(talents);
    spell
}

/// Channeled drain, 5 hasted ticks over 5 sec.
fn drain_life(stats: &StatBundle, talents: &Talents, options: &SimOptions) -> Spell {
    let mut spell = base(
        SpellKind::DrainLife,
        "Drain Life",
        MagicSchool::Shadow,
        SpellTree::Affliction,
        0.0,
        0.0,
        133.0,
        0.17,
        stats,
        talents,
        options,
    );
    spell.base_execute_time = 0.0;
    spell.base_tick_time = 1.0;
    spell.num_ticks = 5;
    spell.base_duration = 5.0;
    spell.binary = true;
    spell.channeled = true;
    spell.hasted_ticks = true;
    spell.tick_coefficient = (1.0 / 3.5) / 2.0;
    spell.tick_multiplier = 1.0 + talents.shadow_mastery as f64 * 0.03;
    spell
}

/// Channeled drain, 5 ticks over 15 sec.
fn drain_soul(stats: &StatBundle, talents: &Talents, options: &SimOptions) -> Spell {
    let mut spell = base(
        SpellKind::DrainSoul,
        "Drain Soul",
        MagicSchool::Shadow,
        SpellTree::Affliction,
        0.0,
        0.0,
        142.0,
        0.14,
        stats,
        talents,
        options,
    );
    spell.base_execute_time = 0.0;
    spell.base_tick_time = 3.0;
    spell.num_ticks = 5;
    spell.base_duration = 15.0;
    spell.binary = true;
    spell.channeled = true;
    spell.hasted_ticks = true;
    spell.tick_coefficient = (3.0 / 3.5) / 2.0;
    spell.tick_multiplier = 1.0 + talents.shadow_mastery as f64 * 0.03;
    spell
}

/// Hybrid: a 2s cast with both a direct hit and a 6-tick dot. The
/// coefficient splits by the damage-weighted hybrid formula.
fn seed_of_corruption(stats: &StatBundle, talents: &Talents, options: &SimOptions) -> Spell {
    let mut spell = base(
        SpellKind::SeedOfCorruption,
        "Seed of Corruption",
        MagicSchool::Shadow,
        SpellTree::Affliction,
        1633.0,
        1897.0,
        253.0,
        0.34,
        stats,
        talents,
        options,
    );
    spell.base_execute_time = 2.0;
    spell.base_tick_time = 3.0;
    spell.num_ticks = 6;
    spell.base_duration = 18.0;
    spell.may_crit = true;

    let direct = (spell.base_min_damage + spell.base_max_damage) / 2.0;
    let dot = spell.base_tick_damage * spell.num_ticks as f64;
    let total = direct + dot;
    spell.direct_coefficient = (2.0 / 3.5) * (direct / total);
    spell.tick_coefficient = ((18.0 / 15.0) * (dot / total)) / 6.0;

    spell.direct_multiplier = (1.0
        + talents.shadow_mastery as f64 * 0.03
        + talents.contagion as f64 * 0.01
        + talents.siphon_life as f64 * 0.05)
        * malediction(talents);
    spell.tick_multiplier = spell.direct_multiplier;
    spell.base_crit_chance = talents.improved_corruption as f64 * 0.01;
    spell
}

/// Hybrid cone: shadow direct portion, fire dot portion.
fn shadowflame(stats: &StatBundle, talents: &Talents, options: &SimOptions) -> Spell {
    let mut spell = base(
        SpellKind::Shadowflame,
        "Shadowflame",
        MagicSchool::Shadow,
        SpellTree::Destruction,
        615.0,
        671.0,
        161.0,
        0.25,
        stats,
        talents,
        options,
    );
    spell.base_execute_time = 0.0;
    spell.base_tick_time = 2.0;
    spell.num_ticks = 4;
    spell.base_duration = 8.0;
    spell.base_cooldown = 15.0;
    spell.may_crit = true;

    let direct = (spell.base_min_damage + spell.base_max_damage) / 2.0;
    let dot = spell.base_tick_damage * spell.num_ticks as f64;
    let total = direct + dot;
    spell.direct_coefficient = (1.5 / 3.5) * (direct / total);
    spell.tick_coefficient = ((8.0 / 15.0) * (dot / total)) / 4.0;

    // Shadow Mastery covers the shadow hit, Emberstorm the fire dot.
    spell.direct_multiplier = (1.0 + talents.shadow_mastery as f64 * 0.03) * malediction(talents);
    spell.tick_multiplier = (1.0 + talents.emberstorm as f64 * 0.03) * malediction(talents);
    spell.base_crit_chance = talents.devastation as f64 * 0.05;
    spell
}

/// Instant nuke on a short cooldown.
fn shadowburn(stats: &StatBundle, talents: &Talents, options: &SimOptions) -> Spell {
    let mut spell = base(
        SpellKind::Shadowburn,
        "Shadowburn",
        MagicSchool::Shadow,
        SpellTree::Destruction,
        775.0,
        865.0,
        0.0,
        0.20,
        stats,
        talents,
        options,
    );
    spell.base_execute_time = 0.0;
    spell.base_cooldown = 15.0;
    spell.may_crit = true;
    spell.direct_coefficient = (1.5 / 3.5) * (1.0 + talents.shadow_and_flame as f64 * 0.04);
    spell.direct_multiplier = 1.0 + talents.shadow_mastery as f64 * 0.03;
    spell.base_crit_chance = talents.devastation as f64 * 0.05;
    spell
}

/// Instant burst with a stun; the stun is irrelevant against a raid boss.
fn shadowfury(stats: &StatBundle, talents: &Talents, options: &SimOptions) -> Spell {
    let mut spell = base(
        SpellKind::Shadowfury,
        "Shadowfury",
        MagicSchool::Shadow,
        SpellTree::Destruction,
        968.0,
        1152.0,
        0.0,
        0.27,
        stats,
        talents,
        options,
    );
    spell.base_execute_time = 0.0;
    spell.base_cooldown = 20.0;
    spell.base_duration = 3.0;
    spell.may_crit = true;
    spell.direct_coefficient = 1.5 / 3.5;
    spell.direct_multiplier = 1.0 + talents.shadow_mastery as f64 * 0.03;
    spell.base_crit_chance = talents.devastation as f64 * 0.05;
    spell
}

/// Converts health into mana on a GCD. Occupies the rotation without
/// dealing damage.
fn life_tap(stats: &StatBundle, talents: &Talents, options: &SimOptions) -> Spell {
    let mut spell = base(
        SpellKind::LifeTap,
        "Life Tap",
        MagicSchool::Shadow,
        SpellTree::Affliction,
        0.0,
        0.0,
        0.0,
        0.0,
        stats,
        talents,
        options,
    );
    spell.harmful = false;
    spell.base_execute_time = 0.0;
    spell
}

/// Drains the minion's mana pool instead of health.
fn dark_pact(stats: &StatBundle, talents: &Talents, options: &SimOptions) -> Spell {
    let mut spell = base(
        SpellKind::DarkPact,
        "Dark Pact",
        MagicSchool::Shadow,
        SpellTree::Affliction,
        0.0,
        0.0,
        0.0,
        0.0,
        stats,
        talents,
        options,
    );
    spell.harmful = false;
    spell.base_execute_time = 0.0;
    spell
}

/// Direct fire hit plus a 15 sec burn; both portions hold a capped 20%
/// coefficient.
fn immolate(stats: &StatBundle, talents: &Talents, options: &SimOptions) -> Spell {
    let mut spell = base(
        SpellKind::Immolate,
        "Immolate",
        MagicSchool::Fire,
        SpellTree::Destruction,
        460.0,
        460.0,
        157.0,
        0.17,
        stats,
        talents,
        options,
    );
    spell.may_crit = true;
    spell.ticks_may_crit = true;
    spell.base_execute_time = 2.0 - talents.bane as f64 * 0.1;
    spell.base_tick_time = 3.0;
    spell.num_ticks = 5 + talents.molten_core;
    spell.base_duration = 15.0 + talents.molten_core as f64 * 3.0;

    spell.direct_coefficient = 0.20;
    spell.tick_coefficient = 0.20;

    spell.direct_multiplier = (1.0
        + talents.emberstorm as f64 * 0.03
        + talents.improved_immolate as f64 * 0.1
        + if talents.glyph_immolate { 0.10 } else { 0.0 })
        * malediction(talents);
    // Aftermath adds on top of the finished direct multiplier.
    spell.tick_multiplier = spell.direct_multiplier + talents.aftermath as f64 * 0.03;
    spell.base_crit_chance = talents.devastation as f64 * 0.05;
    spell
}

/// Metamorphosis pulse: 15 hasted ticks around the caster.
fn immolation_aura(stats: &StatBundle, talents: &Talents, options: &SimOptions) -> Spell {
    let mut spell = base(
        SpellKind::ImmolationAura,
        "Immolation Aura",
        MagicSchool::Fire,
        SpellTree::Demonology,
        0.0,
        0.0,
        481.0,
        0.64,
        stats,
        talents,
        options,
    );
    spell.base_execute_time = 0.0;
    spell.base_tick_time = 1.0;
    spell.num_ticks = 15;
    spell.base_duration = 15.0;
    spell.base_cooldown = 30.0;
    spell.channeled = true;
    spell.area_of_effect = true;
    spell.hasted_ticks = true;
    spell.tick_coefficient = (15.0 / 7.0) / 15.0;
    spell.tick_multiplier = 1.0 + talents.emberstorm as f64 * 0.03;
    spell
}

/// Consumes the Immolate burn: hits for 60% of its full dot damage and
/// re-applies 20% over 3 ticks. Damage derives from Immolate's numbers,
/// not its own.
fn conflagrate(stats: &StatBundle, talents: &Talents, options: &SimOptions) -> Spell {
    let mut spell = base(
        SpellKind::Conflagrate,
        "Conflagrate",
        MagicSchool::Fire,
        SpellTree::Destruction,
        0.0,
        0.0,
        0.0,
        0.16,
        stats,
        talents,
        options,
    );
    spell.base_execute_time = 0.0;
    spell.base_tick_time = 2.0;
    spell.num_ticks = 3;
    spell.base_duration = 6.0;
    spell.base_cooldown = 10.0;
    spell.may_crit = true;
    spell.ticks_may_crit = true;
    spell.base_crit_chance =
        talents.devastation as f64 * 0.05 + talents.fire_and_brimstone as f64 * 0.05;

    let source = immolate(stats, talents, options);
    spell.derived_damage = Some(DerivedDamage {
        source_dot_damage: source.tick_hit_damage() * source.num_ticks as f64,
        direct_portion: 0.60,
        dot_portion: 0.20,
    });
    spell.grants_backdraft = talents.backdraft > 0;
    spell
}

/// Chaotic fire bolt; binary, pierces absorbs.
fn chaos_bolt(stats: &StatBundle, talents: &Talents, options: &SimOptions) -> Spell {
    let mut spell = base(
        SpellKind::ChaosBolt,
        "Chaos Bolt",
        MagicSchool::Fire,
        SpellTree::Destruction,
        1429.0,
        1813.0,
        0.0,
        0.07,
        stats,
        talents,
        options,
    );
    spell.binary = true;
    spell.may_crit = true;
    spell.base_cooldown = 12.0 - if talents.glyph_chaos_bolt { 2.0 } else { 0.0 };
    spell.base_execute_time = 2.5 - talents.bane as f64 * 0.1;
    spell.direct_coefficient = (2.5 / 3.5) * (1.0 + talents.shadow_and_flame as f64 * 0.04);
    spell.direct_multiplier = 1.0 + talents.emberstorm as f64 * 0.03;
    spell.base_crit_chance = talents.devastation as f64 * 0.05;
    spell
}

/// The fire filler nuke.
fn incinerate(stats: &StatBundle, talents: &Talents, options: &SimOptions) -> Spell {
    let mut spell = base(
        SpellKind::Incinerate,
        "Incinerate",
        MagicSchool::Fire,
        SpellTree::Destruction,
        582.0,
        676.0,
        0.0,
        0.14,
        stats,
        talents,
        options,
    );
    spell.may_crit = true;
    // Emberstorm shortens the cast; the coefficient keeps the untalented
    // time.
    spell.direct_coefficient = (2.5 / 3.5) * (1.0 + talents.shadow_and_flame as f64 * 0.04);
    spell.base_execute_time = 2.5 - talents.emberstorm as f64 * 0.05;
    spell.direct_multiplier = (1.0
        + talents.emberstorm as f64 * 0.03
        + if talents.glyph_incinerate { 0.05 } else { 0.0 })
        * malediction(talents);
    spell.base_crit_chance = talents.devastation as f64 * 0.05;
    spell
}

/// Quick fire nuke; high threat is irrelevant here.
fn searing_pain(stats: &StatBundle, talents: &Talents, options: &SimOptions) -> Spell {
    let mut spell = base(
        SpellKind::SearingPain,
        "Searing Pain",
        MagicSchool::Fire,
        SpellTree::Destruction,
        343.0,
        405.0,
        0.0,
        0.08,
        stats,
        talents,
        options,
    );
    spell.may_crit = true;
    spell.base_execute_time = 1.5;
    spell.direct_coefficient = 1.5 / 3.5;
    spell.direct_multiplier = (1.0 + talents.emberstorm as f64 * 0.03) * malediction(talents);
    spell.base_crit_chance = talents.devastation as f64 * 0.05
        + if talents.improved_searing_pain > 0 {
            0.01 + 0.03 * talents.improved_searing_pain as f64
        } else {
            0.0
        };
    spell
}

/// Slow heavy nuke; the coefficient is capped at 115%.
fn soul_fire(stats: &StatBundle, talents: &Talents, options: &SimOptions) -> Spell {
    let mut spell = base(
        SpellKind::SoulFire,
        "Soul Fire",
        MagicSchool::Fire,
        SpellTree::Destruction,
        1323.0,
        1657.0,
        0.0,
        0.09,
        stats,
        talents,
        options,
    );
    spell.may_crit = true;
    spell.base_execute_time = 6.0 - talents.bane as f64 * 0.4;
    spell.direct_coefficient = 1.15;
    spell.direct_multiplier = 1.0 + talents.emberstorm as f64 * 0.03;
    spell.base_crit_chance = talents.devastation as f64 * 0.05;
    spell
}

/// Channeled area rain, 4 hasted ticks over 8 sec.
fn rain_of_fire(stats: &StatBundle, talents: &Talents, options: &SimOptions) -> Spell {
    let mut spell = base(
        SpellKind::RainOfFire,
        "Rain of Fire",
        MagicSchool::Fire,
        SpellTree::Destruction,
        0.0,
        0.0,
        677.0,
        0.57,
        stats,
        talents,
        options,
    );
    spell.base_execute_time = 0.0;
    spell.base_tick_time = 2.0;
    spell.num_ticks = 4;
    spell.base_duration = 8.0;
    spell.channeled = true;
    spell.area_of_effect = true;
    spell.ticks_may_crit = true;
    spell.hasted_ticks = true;
    // Area spells: C = Duration / 7, split per tick.
    spell.tick_coefficient = (8.0 / 7.0) / 4.0;
    spell.tick_multiplier = 1.0 + talents.emberstorm as f64 * 0.03;
    spell.base_crit_chance = talents.devastation as f64 * 0.05;
    spell
}

/// Channeled self-and-area burn, 15 hasted ticks.
fn hellfire(stats: &StatBundle, talents: &Talents, options: &SimOptions) -> Spell {
    let mut spell = base(
        SpellKind::Hellfire,
        "Hellfire",
        MagicSchool::Fire,
        SpellTree::Destruction,
        0.0,
        0.0,
        453.0,
        0.64,
        stats,
        talents,
        options,
    );
    spell.base_execute_time = 0.0;
    spell.base_tick_time = 1.0;
    spell.num_ticks = 15;
    spell.base_duration = 15.0;
    spell.channeled = true;
    spell.area_of_effect = true;
    spell.hasted_ticks = true;
    spell.tick_coefficient = (15.0 / 7.0) / 15.0;
    spell.tick_multiplier = 1.0 + talents.emberstorm as f64 * 0.03;
    spell
}
