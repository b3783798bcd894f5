// Runtime configuration.
// Everything has a sensible default; `GRADIENT_*` environment variables
// override individual fields.

use std::str::FromStr;

use log::warn;

use crate::input::Button;

#[derive(Clone, Debug, PartialEq)]
pub struct Config {
    pub title: String,
    /// Initial window and back buffer size, in pixels.
    pub width: usize,
    pub height: usize,
    /// Frame pacing handed to the window; 0 disables it.
    pub target_fps: usize,
    /// Horizontal scroll per frame (always applied).
    pub x_step: i32,
    /// Vertical scroll per frame while `scroll_button` is held.
    pub y_step: i32,
    pub scroll_button: Button,
    /// Log ms/frame and frames/s once per second.
    pub report_fps: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            title: "Weird Gradient".to_string(),
            width: 960,
            height: 540,
            target_fps: 60,
            x_step: 1,
            y_step: 10,
            scroll_button: Button::Up,
            report_fps: false,
        }
    }
}

impl Config {
    /// Defaults overridden by the process environment.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Defaults overridden by whatever `lookup` returns for each `GRADIENT_*` key.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let title = lookup("GRADIENT_TITLE")
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .unwrap_or(defaults.title);

        let scroll_button = match lookup("GRADIENT_SCROLL_BUTTON") {
            Some(name) => Button::from_name(&name).unwrap_or_else(|| {
                warn!("GRADIENT_SCROLL_BUTTON={name:?} is not a button, using {:?}", defaults.scroll_button);
                defaults.scroll_button
            }),
            None => defaults.scroll_button,
        };

        let report_fps = lookup("GRADIENT_REPORT_FPS")
            .map(|v| matches!(v.trim().to_lowercase().as_str(), "1" | "true" | "yes"))
            .unwrap_or(defaults.report_fps);

        Self {
            title,
            width: parse_or(&lookup, "GRADIENT_WIDTH", defaults.width),
            height: parse_or(&lookup, "GRADIENT_HEIGHT", defaults.height),
            target_fps: parse_or(&lookup, "GRADIENT_FPS", defaults.target_fps),
            x_step: parse_or(&lookup, "GRADIENT_X_STEP", defaults.x_step),
            y_step: parse_or(&lookup, "GRADIENT_Y_STEP", defaults.y_step),
            scroll_button,
            report_fps,
        }
    }
}

fn parse_or<F, T>(lookup: &F, key: &str, default: T) -> T
where
    F: Fn(&str) -> Option<String>,
    T: FromStr + std::fmt::Debug,
{
    match lookup(key) {
        Some(raw) => raw.trim().parse().unwrap_or_else(|_| {
            warn!("{key}={raw:?} could not be parsed, using {default:?}");
            default
        }),
        None => default,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(pairs: &[(&str, &str)]) -> Config {
        let vars: HashMap<String, String> =
            pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
        Config::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn empty_environment_gives_defaults() {
        assert_eq!(config_from(&[]), Config::default());
    }

    #[test]
    fn overrides_are_applied() {
        let config = config_from(&[
            ("GRADIENT_TITLE", "Banding"),
            ("GRADIENT_WIDTH", "1920"),
            ("GRADIENT_HEIGHT", " 1080 "),
            ("GRADIENT_FPS", "0"),
            ("GRADIENT_X_STEP", "-2"),
            ("GRADIENT_Y_STEP", "3"),
            ("GRADIENT_SCROLL_BUTTON", "right_shoulder"),
            ("GRADIENT_REPORT_FPS", "yes"),
        ]);
        assert_eq!(config.title, "Banding");
        assert_eq!((config.width, config.height), (1920, 1080));
        assert_eq!(config.target_fps, 0);
        assert_eq!((config.x_step, config.y_step), (-2, 3));
        assert_eq!(config.scroll_button, Button::RightShoulder);
        assert!(config.report_fps);
    }

    #[test]
    fn bad_values_fall_back_to_defaults() {
        let config = config_from(&[
            ("GRADIENT_WIDTH", "wide"),
            ("GRADIENT_HEIGHT", "-5"),
            ("GRADIENT_SCROLL_BUTTON", "jump"),
            ("GRADIENT_TITLE", "   "),
        ]);
        let defaults = Config::default();
        assert_eq!(config.width, defaults.width);
        assert_eq!(config.height, defaults.height);
        assert_eq!(config.scroll_button, defaults.scroll_button);
        assert_eq!(config.title, defaults.title);
    }
}
