use super::r#trait::{AppEntry, Desktop, Launcher, Notifier, WindowManager};
use crate::error::{RorError, Result};
use crate::events::{Window, WindowGeometry};
use parking_lot::Mutex;
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::info;

/// Рабочий стол в режиме эмуляции: фиксированный список окон,
/// все вызовы логируются и записываются в журнал.
#[derive(Clone, Default)]
pub struct DryRunDesktop {
    windows: Arc<Mutex<Vec<Window>>>,
    apps: Arc<Mutex<Vec<String>>>,
    calls: Arc<Mutex<Vec<String>>>,
    active_workspace: Arc<Mutex<u32>>,
    fail_focus: Arc<AtomicBool>,
    fail_spawn: Arc<AtomicBool>,
}

impl DryRunDesktop {
    pub fn new() -> Self {
        Self::default()
    }

    /// Набор окон для `--dry-run`.
    pub fn with_fake_windows() -> Self {
        let desktop = Self::new();
        let fake_windows = [
            ("gnome-terminal-server", "Terminal - dry_run"),
            ("firefox", "Browser - dry_run"),
            ("gedit", "Editor - dry_run"),
            ("steam", "Game - dry_run"),
        ];
        desktop.set_windows(
            fake_windows
                .iter()
                .enumerate()
                .map(|(i, (class, title))| {
                    Window::new(0x1000 + i as u64, *class, *title)
                        .with_focus(i == 0)
                        .with_geometry(WindowGeometry::new(0, 0, 1280, 720))
                })
                .collect(),
        );
        desktop
    }

    pub fn set_windows(&self, windows: Vec<Window>) {
        *self.windows.lock() = windows;
    }

    #[cfg(test)]
    pub fn windows(&self) -> Vec<Window> {
        self.windows.lock().clone()
    }

    #[cfg(test)]
    pub fn set_apps(&self, apps: &[&str]) {
        *self.apps.lock() = apps.iter().map(|a| a.to_string()).collect();
    }

    #[cfg(test)]
    pub fn set_active_workspace(&self, workspace: u32) {
        *self.active_workspace.lock() = workspace;
    }

    #[cfg(test)]
    pub fn set_fail_focus(&self, fail: bool) {
        self.fail_focus.store(fail, Ordering::SeqCst);
    }

    #[cfg(test)]
    pub fn set_fail_spawn(&self, fail: bool) {
        self.fail_spawn.store(fail, Ordering::SeqCst);
    }

    #[cfg(test)]
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().clone()
    }

    #[cfg(test)]
    pub fn calls_contains(&self, call: &str) -> bool {
        self.calls.lock().iter().any(|c| c == call)
    }

    #[cfg(test)]
    pub fn clear_calls(&self) {
        self.calls.lock().clear();
    }

    /// Собрать [`Desktop`], все части которого пишут в этот журнал.
    pub fn desktop(&self) -> Desktop {
        Desktop::new(
            Box::new(self.clone()),
            Box::new(self.clone()),
            Box::new(self.clone()),
        )
    }

    fn record(&self, call: String) {
        info!("[DRY RUN] {}", call);
        self.calls.lock().push(call);
    }
}

impl WindowManager for DryRunDesktop {
    fn list_windows(&self, isolate_workspace: bool) -> Result<Vec<Window>> {
        let active = *self.active_workspace.lock();
        Ok(self
            .windows
            .lock()
            .iter()
            .filter(|w| !isolate_workspace || w.workspace.map_or(true, |ws| ws == active))
            .cloned()
            .collect())
    }

    fn focus(&self, window: &Window, move_to_active_workspace: bool) -> Result<()> {
        if self.fail_focus.load(Ordering::SeqCst) {
            return Err(RorError::Command(format!("focus {} failed", window.id)));
        }
        self.record(format!("focus:{}", window.id));

        let active = *self.active_workspace.lock();
        let mut windows = self.windows.lock();
        if let Some(pos) = windows.iter().position(|w| w.id == window.id) {
            // Окно становится самым свежим
            let mut focused = windows.remove(pos);
            focused.focused = true;
            if move_to_active_workspace && focused.workspace.is_some() {
                focused.workspace = Some(active);
            }
            for other in windows.iter_mut() {
                other.focused = false;
            }
            windows.insert(0, focused);
        }
        Ok(())
    }

    fn minimize(&self, window: &Window) -> Result<()> {
        self.record(format!("minimize:{}", window.id));
        if let Some(w) = self.windows.lock().iter_mut().find(|w| w.id == window.id) {
            w.focused = false;
        }
        Ok(())
    }

    fn warp_pointer(&self, x: i32, y: i32) -> Result<()> {
        self.record(format!("warp:{},{}", x, y));
        Ok(())
    }
}

impl Launcher for DryRunDesktop {
    fn lookup_app(&self, command: &str) -> Option<AppEntry> {
        let id = command.trim_end_matches(".desktop");
        self.apps.lock().iter().find(|a| *a == id).map(|a| AppEntry {
            id: a.clone(),
            name: None,
            path: PathBuf::from(format!("/dry-run/applications/{}.desktop", a)),
        })
    }

    fn activate(&self, app: &AppEntry) -> Result<()> {
        self.record(format!("activate:{}", app.id));
        Ok(())
    }

    fn spawn_shell(&self, command: &str) -> Result<()> {
        if self.fail_spawn.load(Ordering::SeqCst) {
            return Err(RorError::Command(format!("spawn '{}' failed", command)));
        }
        self.record(format!("spawn:{}", command));
        Ok(())
    }
}

impl Notifier for DryRunDesktop {
    fn notify(&self, message: &str) {
        self.record(format!("notify:{}", message));
    }
}
