//! Configuration structures for loading build YAML/JSON files

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// The finished combat stats handed to the simulator by the external stat
/// aggregation layer (gear, buffs, consumables already folded in).
///
/// Chances and haste are fractions (0.05 = 5%); `shadow_damage` and
/// `fire_damage` are flat school-specific spell damage added on top of
/// `spell_power`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StatBundle {
    pub spell_power: f64,
    pub spell_hit: f64,
    pub spell_crit: f64,
    pub spell_haste: f64,
    pub shadow_damage: f64,
    pub fire_damage: f64,
    /// Raid-wide "+damage %" buffs (sanctified ret / ferocious inspiration).
    pub bonus_damage_multiplier: f64,
    /// "Spell damage taken %" debuffs on the target, per school.
    pub bonus_shadow_damage_multiplier: f64,
    pub bonus_fire_damage_multiplier: f64,
    /// Metagem spell crit damage bonus (0.03 for the Chaotic Skyflare Diamond).
    pub bonus_spell_crit_multiplier: f64,
    /// Base mana pool - spell costs are a percentage of this value.
    pub base_mana: f64,
    // Inherited by minions.
    pub stamina: f64,
    pub intellect: f64,
    pub armor: f64,
}

impl Default for StatBundle {
    fn default() -> Self {
        Self {
            spell_power: 0.0,
            spell_hit: 0.0,
            spell_crit: 0.0,
            spell_haste: 0.0,
            shadow_damage: 0.0,
            fire_damage: 0.0,
            bonus_damage_multiplier: 0.0,
            bonus_shadow_damage_multiplier: 0.0,
            bonus_fire_damage_multiplier: 0.0,
            bonus_spell_crit_multiplier: 0.0,
            base_mana: 3856.0,
            stamina: 0.0,
            intellect: 0.0,
            armor: 0.0,
        }
    }
}

/// Talent ranks and glyphs referenced by the spell catalog. Everything the
/// builders don't recognize simply stays at rank 0.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Talents {
    // Affliction
    pub suppression: u32,
    pub amplify_curse: u32,
    pub improved_curse_of_agony: u32,
    pub empowered_corruption: u32,
    pub improved_corruption: u32,
    pub shadow_mastery: u32,
    pub contagion: u32,
    pub siphon_life: u32,
    pub everlasting_affliction: u32,
    pub malediction: u32,
    pub pandemic: u32,
    pub unstable_affliction: u32,
    pub haunt: u32,
    pub dark_pact: u32,
    pub improved_life_tap: u32,

    // Demonology
    pub demonic_pact: u32,
    pub molten_core: u32,
    pub metamorphosis: u32,
    pub fel_vitality: u32,
    pub improved_demonic_tactics: u32,

    // Destruction
    pub bane: u32,
    pub cataclysm: u32,
    pub devastation: u32,
    pub ruin: u32,
    pub emberstorm: u32,
    pub shadow_and_flame: u32,
    pub improved_shadow_bolt: u32,
    pub improved_immolate: u32,
    pub aftermath: u32,
    pub improved_searing_pain: u32,
    pub backdraft: u32,
    pub shadowburn: u32,
    pub shadowfury: u32,
    pub conflagrate: u32,
    pub chaos_bolt: u32,
    pub fire_and_brimstone: u32,

    // Glyphs
    pub glyph_curse_of_agony: bool,
    pub glyph_unstable_affliction: bool,
    pub glyph_haunt: bool,
    pub glyph_immolate: bool,
    pub glyph_incinerate: bool,
    pub glyph_chaos_bolt: bool,
    pub glyph_death_coil: bool,
    pub glyph_felguard: bool,
}

/// Fight parameters consumed directly by the simulation loop.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimOptions {
    /// Fight duration in seconds.
    pub duration: f64,
    /// Per-cast latency in milliseconds.
    pub latency: f64,
    /// Target level, 80-85. Raid bosses are 83.
    pub target_level: u32,
}

impl Default for SimOptions {
    fn default() -> Self {
        Self {
            duration: 300.0,
            latency: 100.0,
            target_level: 83,
        }
    }
}

impl SimOptions {
    pub fn latency_secs(&self) -> f64 {
        self.latency / 1000.0
    }

    /// Base chance to hit the target before any +hit from gear or talents.
    /// Miss chance rises sharply once the target is 3+ levels above the
    /// caster.
    pub fn target_hit(&self) -> f64 {
        match self.target_level {
            0..=80 => 0.96,
            81 => 0.95,
            82 => 0.94,
            83 => 0.83,
            84 => 0.72,
            _ => 0.61,
        }
    }
}

/// Full build configuration loaded from a YAML or JSON file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BuildConfig {
    #[serde(default)]
    pub stats: StatBundle,
    #[serde(default)]
    pub talents: Talents,
    #[serde(default)]
    pub options: SimOptions,
    /// Ordered spell names, highest priority first. Names that don't
    /// resolve (unknown, or gated behind an untaken talent) are skipped.
    #[serde(default)]
    pub priority: Vec<String>,
    /// Active minion, if any (e.g. "Felhunter").
    #[serde(default)]
    pub minion: Option<String>,
}

impl BuildConfig {
    /// Load a build configuration from a YAML or JSON file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, Box<dyn std::error::Error>> {
        let content = fs::read_to_string(&path)?;
        let path_str = path.as_ref().to_string_lossy().to_lowercase();

        if path_str.ends_with(".json") {
            let config: BuildConfig = serde_json::from_str(&content)?;
            Ok(config)
        } else {
            let config: BuildConfig = serde_yaml::from_str(&content)?;
            Ok(config)
        }
    }

    /// Load from a JSON string.
    pub fn from_json(json: &str) -> Result<Self, Box<dyn std::error::Error>> {
        let config: BuildConfig = serde_json::from_str(json)?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_standard_fight() {
        let options = SimOptions::default();
        assert_eq!(options.duration, 300.0);
        assert_eq!(options.latency, 100.0);
        assert_eq!(options.target_level, 83);
        assert!((options.latency_secs() - 0.1).abs() < 1e-12);
    }

    #[test]
    fn target_hit_table() {
        let mut options = SimOptions::default();
        assert!((options.target_hit() - 0.83).abs() < 1e-12);
        options.target_level = 80;
        assert!((options.target_hit() - 0.96).abs() < 1e-12);
        options.target_level = 85;
        assert!((options.target_hit() - 0.61).abs() < 1e-12);
    }

    #[test]
    fn parse_yaml_build() {
        let yaml = r#"
stats:
  spell_power: 2240
  spell_hit: 0.14
  spell_crit: 0.31
  spell_haste: 0.22
talents:
  shadow_mastery: 5
  haunt: 1
  pandemic: 1
options:
  duration: 240
priority:
  - Shadow Bolt
  - Haunt
"#;
        let config: BuildConfig = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.stats.spell_power, 2240.0);
        assert_eq!(config.talents.shadow_mastery, 5);
        assert_eq!(config.talents.haunt, 1);
        // Unset sections fall back to defaults.
        assert_eq!(config.options.duration, 240.0);
        assert_eq!(config.options.latency, 100.0);
        assert_eq!(config.stats.base_mana, 3856.0);
        assert_eq!(config.priority.len(), 2);
        assert!(config.minion.is_none());
    }

    #[test]
    fn parse_json_build() {
        let json = r#"{
            "stats": { "spell_power": 1800 },
            "priority": ["Corruption", "Curse of Agony"],
            "minion": "Felhunter"
        }"#;
        let config = BuildConfig::from_json(json).unwrap();
        assert_eq!(config.stats.spell_power, 1800.0);
        assert_eq!(config.minion.as_deref(), Some("Felhunter"));
        assert_eq!(config.talents, Talents::default());
    }
}
