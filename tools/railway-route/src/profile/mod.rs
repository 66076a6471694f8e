//! Railway vehicle profiles
//!
//! A profile describes a class of train (electrification, gauge, speed). Each
//! requested profile is resolved exactly once into a [`Profile`] descriptor
//! that states whether it stores turn costs and under which dimension.

use railway_common::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

pub mod builtin;

pub use builtin::{builtin_profile, KNOWN_PROFILES};

/// Key under which a profile's turn costs are stored
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct TurnCostDimension(pub u16);

/// Vehicle parameters of a profile, as written in configuration files
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProfileConfig {
    pub name: String,
    #[serde(default = "default_railway")]
    pub railway: String,
    #[serde(default)]
    pub electrified: String,
    /// `;`-separated volts, e.g. `15000;25000`
    #[serde(default)]
    pub voltages: String,
    /// `;`-separated Hz, `0` for DC
    #[serde(default)]
    pub frequencies: String,
    /// `;`-separated millimetres
    #[serde(default)]
    pub gauges: String,
    #[serde(default = "default_maxspeed")]
    pub maxspeed: u32,
    #[serde(default = "default_speed_factor", alias = "speedFactor")]
    pub speed_factor: u32,
    #[serde(default = "default_true", alias = "yardSpur")]
    pub yard_spur: bool,
    /// Whether routing with this profile honours turn costs
    #[serde(default = "default_true", alias = "turnCosts")]
    pub turn_costs: bool,
}

fn default_railway() -> String {
    "rail".to_string()
}

fn default_maxspeed() -> u32 {
    90
}

fn default_speed_factor() -> u32 {
    5
}

fn default_true() -> bool {
    true
}

impl ProfileConfig {
    /// Config with every field at its default
    pub fn named(name: &str) -> Self {
        Self {
            name: name.to_string(),
            railway: default_railway(),
            electrified: String::new(),
            voltages: String::new(),
            frequencies: String::new(),
            gauges: String::new(),
            maxspeed: default_maxspeed(),
            speed_factor: default_speed_factor(),
            yard_spur: true,
            turn_costs: true,
        }
    }

    pub fn voltages(&self) -> Result<Vec<u32>> {
        parse_list(&self.name, "voltages", &self.voltages)
    }

    pub fn frequencies(&self) -> Result<Vec<f64>> {
        parse_list(&self.name, "frequencies", &self.frequencies)
    }

    pub fn gauges(&self) -> Result<Vec<u32>> {
        parse_list(&self.name, "gauges", &self.gauges)
    }

    pub fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(Error::InvalidConfig("profile name must not be empty".to_string()));
        }
        if self.maxspeed == 0 {
            return Err(Error::InvalidConfig(format!(
                "profile '{}': maxspeed must be positive",
                self.name
            )));
        }
        self.voltages()?;
        self.frequencies()?;
        self.gauges()?;
        Ok(())
    }
}

fn parse_list<T: std::str::FromStr>(profile: &str, field: &str, raw: &str) -> Result<Vec<T>> {
    raw.split(';')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| {
            s.parse::<T>().map_err(|_| {
                Error::InvalidConfig(format!("profile '{profile}': invalid {field} entry '{s}'"))
            })
        })
        .collect()
}

/// Resolved profile descriptor
#[derive(Debug, Clone, PartialEq)]
pub struct Profile {
    config: ProfileConfig,
    turn_cost_dimension: Option<TurnCostDimension>,
}

impl Profile {
    pub fn new(config: ProfileConfig, turn_cost_dimension: Option<TurnCostDimension>) -> Self {
        Self {
            config,
            turn_cost_dimension,
        }
    }

    pub fn name(&self) -> &str {
        &self.config.name
    }

    pub fn config(&self) -> &ProfileConfig {
        &self.config
    }

    pub fn supports_turn_costs(&self) -> bool {
        self.turn_cost_dimension.is_some()
    }

    pub fn turn_cost_dimension(&self) -> Option<TurnCostDimension> {
        self.turn_cost_dimension
    }
}

/// Custom profile definitions layered over the built-in catalogue
#[derive(Debug, Clone, Default)]
pub struct ProfileRegistry {
    custom: Vec<ProfileConfig>,
}

impl ProfileRegistry {
    pub fn new(custom: Vec<ProfileConfig>) -> Result<Self> {
        for (i, config) in custom.iter().enumerate() {
            config.validate()?;
            if custom[..i]
                .iter()
                .any(|c| c.name.eq_ignore_ascii_case(&config.name))
            {
                return Err(Error::DuplicateProfile(config.name.clone()));
            }
        }
        Ok(Self { custom })
    }

    /// Custom definitions win over built-ins; names match case-insensitively
    pub fn lookup(&self, name: &str) -> Option<ProfileConfig> {
        self.custom
            .iter()
            .find(|c| c.name.eq_ignore_ascii_case(name))
            .cloned()
            .or_else(|| builtin_profile(name))
    }

    /// Every name this registry can resolve, custom ones first
    pub fn known_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.custom.iter().map(|c| c.name.clone()).collect();
        for builtin in KNOWN_PROFILES {
            if !names.iter().any(|n| n.eq_ignore_ascii_case(builtin)) {
                names.push(builtin.to_string());
            }
        }
        names
    }

    /// Resolve requested names into descriptors.
    ///
    /// Dimensions are dense and follow request order, counting only
    /// profiles with turn costs enabled.
    pub fn resolve<S: AsRef<str>>(&self, names: &[S]) -> Result<Vec<Profile>> {
        let mut profiles: Vec<Profile> = Vec::with_capacity(names.len());
        let mut next_dimension: u16 = 0;

        for name in names {
            let name = name.as_ref().trim();
            let config = self
                .lookup(name)
                .ok_or_else(|| Error::UnknownProfile(name.to_string()))?;

            if profiles
                .iter()
                .any(|p| p.name().eq_ignore_ascii_case(&config.name))
            {
                return Err(Error::DuplicateProfile(config.name));
            }

            let dimension = if config.turn_costs {
                let dim = TurnCostDimension(next_dimension);
                next_dimension = next_dimension.checked_add(1).ok_or_else(|| {
                    Error::InvalidConfig("too many turn cost dimensions".to_string())
                })?;
                Some(dim)
            } else {
                None
            };

            profiles.push(Profile::new(config, dimension));
        }

        Ok(profiles)
    }
}

/// Top-level configuration file: custom profiles and the profiles to use
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RailwayConfig {
    #[serde(default)]
    pub profiles: Vec<ProfileConfig>,
    #[serde(default, rename = "use")]
    pub use_profiles: Vec<String>,
}

impl RailwayConfig {
    /// Load from `.toml` or `.json`
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let f = path.display();
        let s = std::fs::read_to_string(path)?;

        match path.extension().and_then(|e| e.to_str()) {
            Some("toml") => toml::from_str(&s)
                .map_err(|e| Error::InvalidConfig(format!("failure decoding {f}: {e}"))),
            Some("json") => serde_json::from_str(&s)
                .map_err(|e| Error::InvalidConfig(format!("failure decoding {f}: {e}"))),
            _ => Err(Error::InvalidConfig(format!("unsupported file type: {f}"))),
        }
    }

    /// Names to resolve: `use` if given, otherwise every custom profile
    pub fn requested(&self) -> Vec<String> {
        if self.use_profiles.is_empty() {
            self.profiles.iter().map(|p| p.name.clone()).collect()
        } else {
            self.use_profiles.clone()
        }
    }

    pub fn registry(&self) -> Result<ProfileRegistry> {
        ProfileRegistry::new(self.profiles.clone())
    }
}
