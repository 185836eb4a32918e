use anyhow::{Context, Result};
use directories::ProjectDirs;
use ratatui::style::Color;
use serde::Deserialize;
use std::fs;

#[derive(Debug, Deserialize, Clone, Default)]
#[serde(default)]
pub struct Config {
    pub theme: Theme,
    pub icons: Icons,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct Theme {
    #[serde(deserialize_with = "hex_to_color")]
    pub background: Color,
    #[serde(deserialize_with = "hex_to_color")]
    pub foreground: Color,
    #[serde(deserialize_with = "hex_to_color")]
    pub pink: Color,
    #[serde(deserialize_with = "hex_to_color")]
    pub red: Color,
    #[serde(deserialize_with = "hex_to_color")]
    pub green: Color,
    #[serde(deserialize_with = "hex_to_color")]
    pub gray: Color,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct Icons {
    pub check: String,
    pub header_left: String,
    pub header_right: String,
    pub separator: String,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            background: Color::Rgb(247, 245, 221),
            foreground: Color::Rgb(59, 59, 59),
            pink: Color::Rgb(226, 151, 156),
            red: Color::Rgb(231, 48, 91),
            green: Color::Rgb(155, 222, 172),
            gray: Color::Rgb(140, 140, 130),
        }
    }
}

impl Default for Icons {
    fn default() -> Self {
        Self {
            check: "✔".to_string(),
            header_left: "⟪ ".to_string(),
            header_right: " ⟫".to_string(),
            separator: "│".to_string(),
        }
    }
}

fn hex_to_color<'de, D>(deserializer: D) -> Result<Color, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let s: String = serde::Deserialize::deserialize(deserializer)?;
    if !s.starts_with('#') || s.len() != 7 {
        return Err(serde::de::Error::custom("invalid hex color format"));
    }
    let r = u8::from_str_radix(&s[1..3], 16).map_err(serde::de::Error::custom)?;
    let g = u8::from_str_radix(&s[3..5], 16).map_err(serde::de::Error::custom)?;
    let b = u8::from_str_radix(&s[5..7], 16).map_err(serde::de::Error::custom)?;
    Ok(Color::Rgb(r, g, b))
}

pub fn load_config() -> Result<Config> {
    match ProjectDirs::from("com", "tomatui", "tomatui") {
        Some(proj_dirs) => {
            let path = proj_dirs.config_dir().join("tomatui.toml");
            if path.exists() {
                let config_str = fs::read_to_string(&path)
                    .with_context(|| format!("Failed to read config file at {:?}", path))?;
                toml::from_str(&config_str)
                    .with_context(|| format!("Failed to parse config file at {:?}", path))
            } else {
                Ok(Config::default())
            }
        }
        None => Ok(Config::default()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn theme_parses_hex_colors() {
        let config: Config = toml::from_str(
            r##"
            [theme]
            red = "#e7305b"
            [icons]
            check = "x"
            "##,
        )
        .unwrap();
        assert_eq!(config.theme.red, Color::Rgb(0xe7, 0x30, 0x5b));
        // Unset fields keep their defaults.
        assert_eq!(config.theme.pink, Theme::default().pink);
        assert_eq!(config.icons.check, "x");
    }

    #[test]
    fn malformed_color_is_rejected() {
        let parsed = toml::from_str::<Config>("[theme]\nred = \"e7305b\"\n");
        assert!(parsed.is_err());
    }
}
