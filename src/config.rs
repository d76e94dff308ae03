use crate::binding::{Behavior, Flag};
use anyhow::{Context, Result};
use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

const APP_DIR: &str = "run-or-raise";

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    pub logging: LoggingConfig,
    pub input: InputConfig,
    pub bindings: BindingsConfig,
    pub behavior: BehaviorConfig,
    pub desktop: DesktopConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LoggingConfig {
    pub level: String,
    pub format: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct InputConfig {
    pub device_path: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct BindingsConfig {
    pub path: String,
}

/// Глобальные значения флагов. Флаги в строке шортката важнее.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct BehaviorConfig {
    #[serde(default)]
    pub verbose: bool,
    #[serde(default)]
    pub isolate_workspace: bool,
    #[serde(default)]
    pub minimize_when_unfocused: bool,
    #[serde(default)]
    pub switch_back_when_focused: bool,
    #[serde(default)]
    pub move_window_to_active_workspace: bool,
    #[serde(default)]
    pub center_mouse_to_focused_window: bool,
    #[serde(default)]
    pub always_run: bool,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DesktopConfig {
    pub app_name: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            logging: LoggingConfig {
                level: "info".to_string(),
                format: "compact".to_string(),
            },
            input: InputConfig {
                device_path: "auto".to_string(),
            },
            bindings: BindingsConfig {
                path: default_config_dir()
                    .join("shortcuts.conf")
                    .to_string_lossy()
                    .into_owned(),
            },
            behavior: BehaviorConfig::default(),
            desktop: DesktopConfig {
                app_name: "Run or Raise".to_string(),
            },
        }
    }
}

impl Config {
    /// `$XDG_CONFIG_HOME/run-or-raise/config.toml`
    pub fn default_path() -> PathBuf {
        default_config_dir().join("config.toml")
    }

    /// Значения по умолчанию, затем TOML файл (может отсутствовать), затем `ROR_*`.
    pub fn load<P: AsRef<Path>>(config_path: P) -> Result<Self> {
        let config_path = config_path.as_ref();

        let figment = Figment::from(Serialized::defaults(Config::default()))
            .merge(Toml::file(config_path))
            .merge(Env::prefixed("ROR_").split("__"));

        let config: Config = figment
            .extract()
            .with_context(|| format!("Не удалось загрузить конфигурацию из {:?}", config_path))?;

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        match self.logging.level.as_str() {
            "trace" | "debug" | "info" | "warn" | "error" => {}
            _ => anyhow::bail!("Неверный уровень логирования: {}", self.logging.level),
        }

        match self.logging.format.as_str() {
            "compact" | "pretty" => {}
            _ => anyhow::bail!("Неверный формат логирования: {}", self.logging.format),
        }

        if self.bindings.path.trim().is_empty() {
            anyhow::bail!("Не указан путь к файлу шорткатов");
        }

        if self.input.device_path.trim().is_empty() {
            anyhow::bail!("Не указано устройство ввода (используйте \"auto\")");
        }

        Ok(())
    }

    /// Путь к файлу шорткатов с раскрытым `~`.
    pub fn bindings_path(&self) -> PathBuf {
        expand_home(&self.bindings.path)
    }
}

impl BehaviorConfig {
    pub fn to_behavior(&self) -> Behavior {
        let mut behavior = Behavior::new();
        let flags = [
            (self.verbose, Flag::Verbose),
            (self.isolate_workspace, Flag::IsolateWorkspace),
            (self.minimize_when_unfocused, Flag::MinimizeWhenUnfocused),
            (self.switch_back_when_focused, Flag::SwitchBackWhenFocused),
            (self.move_window_to_active_workspace, Flag::MoveWindowToActiveWorkspace),
            (self.center_mouse_to_focused_window, Flag::CenterMouseToFocusedWindow),
            (self.always_run, Flag::AlwaysRun),
        ];
        for (enabled, flag) in flags {
            if enabled {
                behavior.set(flag);
            }
        }
        behavior
    }
}

fn default_config_dir() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from(".config"))
        .join(APP_DIR)
}

fn expand_home(path: &str) -> PathBuf {
    match (path.strip_prefix("~/"), dirs::home_dir()) {
        (Some(rest), Some(home)) => home.join(rest),
        _ if path == "~" => dirs::home_dir().unwrap_or_else(|| PathBuf::from(path)),
        _ => PathBuf::from(path),
    }
}
