use super::r#trait::{AppEntry, Launcher};
use crate::error::Result;
use crate::ror_error;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Child, Command, Stdio};
use tracing::{debug, info, warn};

/// Запуск через установленные .desktop файлы (`gtk-launch`),
/// всё остальное уходит в `sh -c`.
pub struct DesktopEntryLauncher {
    search_dirs: Vec<PathBuf>,
}

impl DesktopEntryLauncher {
    pub fn new() -> Self {
        Self::with_dirs(application_dirs())
    }

    pub fn with_dirs(search_dirs: Vec<PathBuf>) -> Self {
        debug!("Каталоги приложений: {:?}", search_dirs);
        Self { search_dirs }
    }
}

impl Default for DesktopEntryLauncher {
    fn default() -> Self {
        Self::new()
    }
}

impl Launcher for DesktopEntryLauncher {
    fn lookup_app(&self, command: &str) -> Option<AppEntry> {
        let id = command.trim().trim_end_matches(".desktop");
        // Команда с аргументами или путём это не идентификатор приложения
        if id.is_empty() || id.contains(char::is_whitespace) || id.contains('/') {
            return None;
        }

        let file_name = format!("{}.desktop", id);
        self.search_dirs
            .iter()
            .map(|dir| dir.join(&file_name))
            .find(|path| path.is_file())
            .map(|path| AppEntry {
                id: id.to_string(),
                name: read_entry_name(&path),
                path,
            })
    }

    fn activate(&self, app: &AppEntry) -> Result<()> {
        info!("Запуск приложения {}", app);
        let child = Command::new("gtk-launch")
            .arg(&app.id)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
            .map_err(|e| ror_error!(command, "gtk-launch {}: {}", app.id, e))?;
        reap(child, format!("gtk-launch {}", app.id));
        Ok(())
    }

    fn spawn_shell(&self, command: &str) -> Result<()> {
        info!("Запуск команды: {}", command);
        let child = Command::new("sh")
            .arg("-c")
            .arg(command)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
            .map_err(|e| ror_error!(command, "sh -c '{}': {}", command, e))?;
        reap(child, command.to_string());
        Ok(())
    }
}

/// Дождаться процесса в фоне, чтобы не оставлять зомби.
fn reap(mut child: Child, label: String) {
    std::thread::spawn(move || match child.wait() {
        Ok(status) if !status.success() => warn!("'{}' завершился с {}", label, status),
        Ok(_) => {}
        Err(e) => warn!("Не удалось дождаться '{}': {}", label, e),
    });
}

/// `$XDG_DATA_HOME/applications` и `applications` в каждом из `$XDG_DATA_DIRS`.
fn application_dirs() -> Vec<PathBuf> {
    let data_dirs = std::env::var("XDG_DATA_DIRS")
        .ok()
        .filter(|v| !v.is_empty())
        .unwrap_or_else(|| "/usr/local/share:/usr/share".to_string());

    dirs::data_dir()
        .into_iter()
        .chain(data_dirs.split(':').filter(|d| !d.is_empty()).map(PathBuf::from))
        .map(|dir| dir.join("applications"))
        .collect()
}

fn read_entry_name(path: &Path) -> Option<String> {
    let content = fs::read_to_string(path).ok()?;
    parse_entry_name(&content)
}

/// `Name=` из секции `[Desktop Entry]`, локализованные варианты пропускаются.
fn parse_entry_name(content: &str) -> Option<String> {
    let mut in_entry = false;
    for line in content.lines().map(str::trim) {
        if line.starts_with('[') {
            in_entry = line == "[Desktop Entry]";
            continue;
        }
        if !in_entry {
            continue;
        }
        if let Some(name) = line.strip_prefix("Name=") {
            return Some(name.trim().to_string());
        }
    }
    None
}
