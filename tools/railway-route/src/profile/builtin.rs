//! Built-in railway profiles

use super::ProfileConfig;

pub const KNOWN_PROFILES: [&str; 5] = [
    "freight_electric_15kvac_25kvac",
    "freight_diesel",
    "tgv_15kvac25kvac1.5kvdc",
    "tgv_25kvac1.5kvdc3kvdc",
    "freight_25kvac1.5kvdc3kvdc",
];

/// Built-in profile by name, ignoring ASCII case; the config carries the canonical name
pub fn builtin_profile(name: &str) -> Option<ProfileConfig> {
    let name = KNOWN_PROFILES
        .into_iter()
        .find(|known| known.eq_ignore_ascii_case(name))?;
    let mut config = ProfileConfig::named(name);
    config.gauges = "1435".to_string();

    match name {
        "freight_electric_15kvac_25kvac" => {
            config.electrified = "contact_line".to_string();
            config.voltages = "15000;25000".to_string();
            config.frequencies = "16.7;16.67;50".to_string();
        }
        "freight_diesel" => {}
        "tgv_15kvac25kvac1.5kvdc" => {
            config.electrified = "contact_line".to_string();
            config.voltages = "15000;25000;1500".to_string();
            config.frequencies = "16.7;16.67;50;0".to_string();
            config.maxspeed = 319;
            config.speed_factor = 11;
        }
        "tgv_25kvac1.5kvdc3kvdc" => {
            config.electrified = "contact_line".to_string();
            config.voltages = "25000;3000;1500".to_string();
            config.frequencies = "0;50".to_string();
            config.maxspeed = 319;
            config.speed_factor = 11;
        }
        "freight_25kvac1.5kvdc3kvdc" => {
            config.electrified = "contact_line".to_string();
            config.voltages = "25000;3000;1500".to_string();
            config.frequencies = "0;50".to_string();
        }
        _ => return None,
    }

    Some(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_known_profile_is_valid() {
        for name in KNOWN_PROFILES {
            let config = builtin_profile(name).unwrap();
            assert_eq!(config.name, name);
            config.validate().unwrap();
            assert!(config.turn_costs);
        }
    }

    #[test]
    fn test_tgv_speeds() {
        let tgv = builtin_profile("tgv_15kvac25kvac1.5kvdc").unwrap();
        assert_eq!(tgv.maxspeed, 319);
        assert_eq!(tgv.speed_factor, 11);
        assert_eq!(tgv.voltages().unwrap(), vec![15000, 25000, 1500]);

        let diesel = builtin_profile("freight_diesel").unwrap();
        assert!(diesel.electrified.is_empty());
        assert_eq!(diesel.maxspeed, 90);
    }

    #[test]
    fn test_lookup_ignores_case() {
        let config = builtin_profile("FREIGHT_Diesel").unwrap();
        assert_eq!(config.name, "freight_diesel");
        assert_eq!(config.gauges, "1435");
    }

    #[test]
    fn test_unknown_name() {
        assert!(builtin_profile("hyperloop").is_none());
    }
}
