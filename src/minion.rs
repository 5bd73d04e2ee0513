//! Minion stat derivation
//!
//! A minion inherits fixed fractions of its owner's stats on top of its
//! own base sheet. This is plain arithmetic - no scheduling, no
//! simulation - kept apart from the combat engine on purpose.

use crate::config::{StatBundle, Talents};
use serde::Serialize;

/// Fraction of the owner's stamina a minion inherits.
const INHERITED_STAMINA: f64 = 0.75;
/// Fraction of the owner's intellect a minion inherits.
const INHERITED_INTELLECT: f64 = 0.30;
/// Fraction of the owner's armor a minion inherits.
const INHERITED_ARMOR: f64 = 0.35;
/// Fraction of the owner's spell power granted as minion attack power.
const INHERITED_ATTACK_POWER: f64 = 0.57;
/// Fraction of the owner's spell power granted as minion spell damage.
const INHERITED_SPELL_DAMAGE: f64 = 0.15;
/// Minions are hit-capped whenever their owner is.
const INHERITED_HIT_CHANCE: f64 = 1.00;

/// Attack power divisor in the melee DPS formula.
const ATTACK_POWER_PER_DPS: f64 = 14.0;
const HEALTH_PER_STAMINA: f64 = 10.0;
const MANA_PER_INTELLECT: f64 = 15.0;
/// The first 20 points of a stat convert 1:1.
const STAT_ADJUSTMENT: f64 = 20.0;
const MELEE_ATTACK_SPEED: f64 = 2.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum MinionKind {
    Imp,
    Voidwalker,
    Succubus,
    Felhunter,
    Felguard,
}

impl MinionKind {
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "Imp" => Some(Self::Imp),
            "Voidwalker" => Some(Self::Voidwalker),
            "Succubus" => Some(Self::Succubus),
            "Felhunter" => Some(Self::Felhunter),
            "Felguard" => Some(Self::Felguard),
            _ => None,
        }
    }
}

/// Level-80 base sheet for one minion, before inheritance.
struct BaseSheet {
    strength: f64,
    agility: f64,
    stamina: f64,
    intellect: f64,
    health: f64,
    power: f64,
    health_modifier: f64,
    power_modifier: f64,
    min_damage: f64,
    max_damage: f64,
    armor: f64,
}

fn base_sheet(kind: MinionKind) -> BaseSheet {
    match kind {
        MinionKind::Imp => BaseSheet {
            strength: 297.0,
            agility: 79.0,
            stamina: 118.0,
            intellect: 369.0,
            health: 3028.0,
            power: 1175.0,
            health_modifier: 0.83999,
            power_modifier: 0.33,
            min_damage: 315.0,
            max_damage: 467.0,
            armor: 6273.0,
        },
        MinionKind::Voidwalker => BaseSheet {
            strength: 314.0,
            agility: 90.0,
            stamina: 328.0,
            intellect: 150.0,
            health: 2018.0,
            power: 1558.0,
            health_modifier: 1.10,
            power_modifier: 0.76999,
            min_damage: 361.0,
            max_damage: 504.0,
            armor: 16148.0,
        },
        MinionKind::Succubus => BaseSheet {
            strength: 314.0,
            agility: 90.0,
            stamina: 328.0,
            intellect: 150.0,
            health: 1784.0,
            power: 1558.0,
            health_modifier: 0.89999,
            power_modifier: 0.76999,
            min_damage: 437.0,
            max_damage: 611.0,
            armor: 9706.0,
        },
        MinionKind::Felhunter => BaseSheet {
            strength: 314.0,
            agility: 90.0,
            stamina: 328.0,
            intellect: 150.0,
            health: 1842.0,
            power: 1558.0,
            health_modifier: 0.94999,
            power_modifier: 0.76999,
            min_damage: 333.0,
            max_damage: 466.0,
            armor: 7782.0,
        },
        MinionKind::Felguard => BaseSheet {
            strength: 314.0,
            agility: 90.0,
            stamina: 377.0,
            intellect: 172.0,
            health: 2018.0,
            power: 1558.0,
            health_modifier: 1.10,
            power_modifier: 0.76999,
            min_damage: 0.0,
            max_damage: 0.0,
            armor: 0.0,
        },
    }
}

/// Derived minion stats, ready for reporting.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MinionStats {
    pub kind: MinionKind,
    pub stamina: f64,
    pub intellect: f64,
    pub health: f64,
    pub mana: f64,
    pub armor: f64,
    pub attack_power: f64,
    pub spell_power: f64,
    pub hit_chance: f64,
    pub crit_chance: f64,
    pub melee_dps: f64,
}

impl MinionStats {
    /// Compute a minion's sheet from its owner's finished stats.
    pub fn derive(kind: MinionKind, owner: &StatBundle, talents: &Talents) -> Self {
        let sheet = base_sheet(kind);
        let fel_vitality = 1.0 + talents.fel_vitality as f64 * 0.05;

        let stamina =
            ((sheet.stamina + (owner.stamina * INHERITED_STAMINA).floor()) * fel_vitality).floor();
        let intellect =
            ((sheet.intellect + (owner.intellect * INHERITED_INTELLECT).floor()) * fel_vitality)
                .floor();

        let health =
            sheet.health + ((stamina - STAT_ADJUSTMENT) * HEALTH_PER_STAMINA + STAT_ADJUSTMENT)
                * sheet.health_modifier;
        let mana =
            sheet.power + ((intellect - STAT_ADJUSTMENT) * MANA_PER_INTELLECT + STAT_ADJUSTMENT)
                * sheet.power_modifier;

        let armor = sheet.armor + (owner.armor * INHERITED_ARMOR).floor();

        // The imp shoots, so its attack power comes from agility; every
        // other minion swings from strength.
        let own_attack_power = match kind {
            MinionKind::Imp => sheet.agility - 10.0,
            _ => sheet.strength * 2.0 - STAT_ADJUSTMENT,
        };
        let mut attack_power = own_attack_power + owner.spell_power * INHERITED_ATTACK_POWER;
        if kind == MinionKind::Felguard && talents.glyph_felguard {
            attack_power *= 1.2;
        }

        let spell_power = owner.spell_power * INHERITED_SPELL_DAMAGE;
        let hit_chance = owner.spell_hit * INHERITED_HIT_CHANCE;
        let crit_chance = owner.spell_crit * (talents.improved_demonic_tactics as f64 * 0.10);

        let base_damage = (sheet.min_damage + sheet.max_damage) / 2.0;
        let melee_dps = base_damage / MELEE_ATTACK_SPEED + attack_power / ATTACK_POWER_PER_DPS;

        Self {
            kind,
            stamina,
            intellect,
            health,
            mana,
            armor,
            attack_power,
            spell_power,
            hit_chance,
            crit_chance,
            melee_dps,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn owner() -> StatBundle {
        StatBundle {
            spell_power: 2000.0,
            spell_hit: 0.14,
            spell_crit: 0.30,
            stamina: 1200.0,
            intellect: 800.0,
            armor: 2800.0,
            ..StatBundle::default()
        }
    }

    #[test]
    fn felhunter_inherits_owner_fractions() {
        let talents = Talents::default();
        let minion = MinionStats::derive(MinionKind::Felhunter, &owner(), &talents);

        assert_eq!(minion.stamina, 328.0 + (1200.0f64 * 0.75).floor());
        assert_eq!(minion.intellect, 150.0 + (800.0f64 * 0.30).floor());
        assert_eq!(minion.armor, 7782.0 + (2800.0f64 * 0.35).floor());
        assert!((minion.attack_power - (314.0 * 2.0 - 20.0 + 2000.0 * 0.57)).abs() < 1e-9);
        assert!((minion.spell_power - 300.0).abs() < 1e-9);
        // Fully inherited hit: a capped owner means a capped minion.
        assert!((minion.hit_chance - 0.14).abs() < 1e-12);
    }

    #[test]
    fn fel_vitality_scales_stamina_and_intellect() {
        let talents = Talents {
            fel_vitality: 3,
            ..Talents::default()
        };
        let plain = MinionStats::derive(MinionKind::Voidwalker, &owner(), &Talents::default());
        let talented = MinionStats::derive(MinionKind::Voidwalker, &owner(), &talents);
        assert_eq!(talented.stamina, (plain.stamina * 1.15).floor());
        assert_eq!(talented.intellect, (plain.intellect * 1.15).floor());
        assert!(talented.health > plain.health);
    }

    #[test]
    fn imp_attack_power_comes_from_agility() {
        let talents = Talents::default();
        let imp = MinionStats::derive(MinionKind::Imp, &owner(), &talents);
        assert!((imp.attack_power - (79.0 - 10.0 + 2000.0 * 0.57)).abs() < 1e-9);
    }

    #[test]
    fn felguard_glyph_boosts_attack_power() {
        let plain = MinionStats::derive(MinionKind::Felguard, &owner(), &Talents::default());
        let glyphed = MinionStats::derive(
            MinionKind::Felguard,
            &owner(),
            &Talents {
                glyph_felguard: true,
                ..Talents::default()
            },
        );
        assert!((glyphed.attack_power - plain.attack_power * 1.2).abs() < 1e-9);
    }

    #[test]
    fn improved_demonic_tactics_shares_owner_crit() {
        let talents = Talents {
            improved_demonic_tactics: 3,
            ..Talents::default()
        };
        let minion = MinionStats::derive(MinionKind::Succubus, &owner(), &talents);
        assert!((minion.crit_chance - 0.30 * 0.30).abs() < 1e-9);
    }

    #[test]
    fn unknown_minion_name_is_absent() {
        assert_eq!(MinionKind::from_name("Doomguard"), None);
        assert_eq!(MinionKind::from_name("Felhunter"), Some(MinionKind::Felhunter));
    }
}
