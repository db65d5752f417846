use std::fs;
use std::path::{Path, PathBuf};

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::globals::MAX_RULE_RADIUS;
use crate::resources::particle_types::ColorIndex;
use crate::resources::rules::{FlatRules, RuleMatrix};
use crate::resources::simulation::{SimulationConfig, seed_fragment};
use crate::resources::universe::Universe;

/// Seuil au-delà duquel une interaction compte comme forte
const STRONG_INTERACTION: f64 = 0.5;

/// Configuration et règles d'une simulation, sans l'état des particules
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct Preset {
    pub name: String,
    pub timestamp: String,
    pub description: Option<String>,
    pub config: SimulationConfig,
    /// Règles stockées à plat, vérifiées au chargement
    pub rules: FlatRules,
}

/// Statistiques de la matrice pour le résumé
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
pub struct RulesAnalysis {
    pub total_interactions: usize,
    pub strong_attractions: usize,
    pub strong_repulsions: usize,
    pub neutral_interactions: usize,
}

impl Preset {
    pub fn from_universe(universe: &Universe, name: String, description: Option<String>) -> Self {
        let timestamp = chrono::Utc::now().format("%Y-%m-%d_%H-%M-%S").to_string();

        Self {
            name,
            timestamp,
            description,
            config: universe.config().clone(),
            rules: universe.rules().flatten(),
        }
    }

    /// Valide la cohérence du preset
    pub fn validate_integrity(&self) -> Result<(), ConfigError> {
        if self.rules.color_count != self.config.color_count {
            return Err(ConfigError::InvalidPreset(format!(
                "Nombre de couleurs incohérent: {} dans les règles, {} dans la configuration",
                self.rules.color_count, self.config.color_count
            )));
        }
        self.config.validate()?;
        self.rule_matrix()?;
        Ok(())
    }

    pub fn rule_matrix(&self) -> Result<RuleMatrix, ConfigError> {
        RuleMatrix::from_flat(self.rules.color_count, &self.rules.strengths, &self.rules.radii)
    }

    /// Crée une simulation neuve : particules tirées de la graine, règles du preset
    pub fn to_universe(&self) -> Result<Universe, ConfigError> {
        self.validate_integrity()?;
        let mut universe = Universe::configure(self.config.clone())?;
        universe.set_rules(&self.rules.strengths, &self.rules.radii)?;
        Ok(universe)
    }

    pub fn analyze_rules(&self) -> RulesAnalysis {
        let mut analysis = RulesAnalysis {
            total_interactions: self.rules.strengths.len(),
            strong_attractions: 0,
            strong_repulsions: 0,
            neutral_interactions: 0,
        };

        for &force in &self.rules.strengths {
            if force > STRONG_INTERACTION {
                analysis.strong_attractions += 1;
            } else if force < -STRONG_INTERACTION {
                analysis.strong_repulsions += 1;
            } else {
                analysis.neutral_interactions += 1;
            }
        }
        analysis
    }

    /// Génère un résumé textuel du preset
    pub fn summary(&self) -> String {
        let analysis = self.analyze_rules();
        let widest = self
            .rules
            .radii
            .iter()
            .enumerate()
            .max_by(|a, b| a.1.total_cmp(b.1))
            .map(|(i, r)| format!("{} ({:.0}/{:.0})", ColorIndex(i).name(), r, MAX_RULE_RADIUS))
            .unwrap_or_else(|| "-".to_string());

        format!(
            "Preset '{}' ({}, graine {})\n\
             {} couleurs x {} particules | Viscosité: {:.2} | Pas: {:.2}\n\
             Interactions: {} attractions fortes, {} répulsions fortes, {} neutres\n\
             Plus grand rayon: {}",
            self.name,
            self.timestamp,
            seed_fragment(self.config.seed),
            self.config.color_count,
            self.config.atoms_per_color,
            self.config.viscosity,
            self.config.time_scale,
            analysis.strong_attractions,
            analysis.strong_repulsions,
            analysis.neutral_interactions,
            widest
        )
    }

    pub fn to_json(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let preset: Self = serde_json::from_str(json)?;
        preset.validate_integrity()?;
        Ok(preset)
    }

    /// Écrit le preset dans `dir`, sous un nom dérivé du nom et de la date
    pub fn save_to_dir(&self, dir: &Path) -> Result<PathBuf, ConfigError> {
        self.validate_integrity()?;
        if !dir.exists() {
            fs::create_dir_all(dir)?;
        }

        let safe_name: String = self
            .name
            .chars()
            .map(|c| if c.is_alphanumeric() || c == '-' || c == '_' { c } else { '_' })
            .collect();
        let path = dir.join(format!("{}_{}.json", safe_name, self.timestamp));

        fs::write(&path, self.to_json()?)?;
        info!("Preset '{}' sauvegardé dans {}", self.name, path.display());
        Ok(path)
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path)?;
        Self::from_json(&content)
    }
}

/// Charge tous les presets valides d'un dossier. Les fichiers illisibles
/// sont ignorés avec un avertissement.
pub fn load_all_presets(dir: &Path) -> Result<Vec<Preset>, ConfigError> {
    let mut presets = Vec::new();
    if !dir.exists() {
        return Ok(presets);
    }

    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        if path.extension().and_then(|s| s.to_str()) != Some("json") {
            continue;
        }
        match Preset::load(&path) {
            Ok(preset) => presets.push(preset),
            Err(e) => warn!("Preset ignoré {}: {}", path.display(), e),
        }
    }

    presets.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
    Ok(presets)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resources::simulation::ClusterSettings;

    fn universe() -> Universe {
        Universe::configure(SimulationConfig {
            color_count: 3,
            atoms_per_color: 10,
            seed: 77,
            clusters: ClusterSettings {
                enabled: false,
                ..ClusterSettings::default()
            },
            ..SimulationConfig::default()
        })
        .unwrap()
    }

    fn temp_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("particle-life-{}-{}", name, std::process::id()));
        let _ = fs::remove_dir_all(&dir);
        dir
    }

    #[test]
    fn preset_captures_config_and_rules() {
        let u = universe();
        let preset = Preset::from_universe(&u, "test".into(), None);
        assert_eq!(preset.config, *u.config());
        assert_eq!(preset.rules.strengths, u.rules().strengths());
        assert_eq!(preset.rules.radii, u.rules().radii());
        assert!(preset.validate_integrity().is_ok());
    }

    #[test]
    fn integrity_rejects_bad_matrix() {
        let mut preset = Preset::from_universe(&universe(), "bad".into(), None);
        preset.rules.strengths.pop();
        assert!(preset.validate_integrity().is_err());

        let mut preset = Preset::from_universe(&universe(), "bad".into(), None);
        preset.rules.strengths[0] = 3.0;
        assert!(preset.validate_integrity().is_err());

        let mut preset = Preset::from_universe(&universe(), "bad".into(), None);
        preset.rules.radii[1] = 0.0;
        assert!(preset.validate_integrity().is_err());
    }

    #[test]
    fn integrity_rejects_color_mismatch() {
        let mut preset = Preset::from_universe(&universe(), "bad".into(), None);
        preset.config.color_count = 4;
        assert!(matches!(preset.validate_integrity(), Err(ConfigError::InvalidPreset(_))));
    }

    #[test]
    fn json_is_read_back() {
        let preset = Preset::from_universe(&universe(), "json".into(), Some("essai".into()));
        let json = preset.to_json().unwrap();
        assert_eq!(Preset::from_json(&json).unwrap(), preset);
        assert!(Preset::from_json("{ pas du json").is_err());
    }

    #[test]
    fn save_and_load_from_disk() {
        let dir = temp_dir("save");
        let preset = Preset::from_universe(&universe(), "mon preset!".into(), None);
        let path = preset.save_to_dir(&dir).unwrap();
        assert!(path.file_name().unwrap().to_str().unwrap().starts_with("mon_preset_"));

        fs::write(dir.join("broken.json"), "{}").unwrap();
        fs::write(dir.join("notes.txt"), "ignored").unwrap();

        let loaded = load_all_presets(&dir).unwrap();
        assert_eq!(loaded, vec![preset]);
        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn missing_directory_is_empty() {
        let dir = temp_dir("missing");
        assert!(load_all_presets(&dir).unwrap().is_empty());
    }

    #[test]
    fn preset_restores_rules_on_fresh_particles() {
        let mut source = universe();
        source.mutate_rules_once();
        source.tick();
        let preset = Preset::from_universe(&source, "restore".into(), None);

        let restored = preset.to_universe().unwrap();
        assert_eq!(restored.rules(), source.rules());
        assert_eq!(restored.tick_count(), 0);
        assert_eq!(restored.particles(), universe().particles());
    }

    #[test]
    fn analysis_counts_every_entry() {
        let preset = Preset::from_universe(&universe(), "stats".into(), None);
        let a = preset.analyze_rules();
        assert_eq!(a.total_interactions, 9);
        assert_eq!(a.strong_attractions + a.strong_repulsions + a.neutral_interactions, 9);
        assert!(preset.summary().contains("Preset 'stats'"));
        assert!(preset.summary().contains("#77"));
    }
}
