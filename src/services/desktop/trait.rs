use crate::error::Result;
use crate::events::Window;
use std::fmt;
use std::path::PathBuf;

/// Оконный менеджер: перечисление окон и операции над ними.
pub trait WindowManager: Send {
    /// Окна в порядке последнего использования (самое свежее первым).
    /// С `isolate_workspace` только окна активного рабочего стола.
    fn list_windows(&self, isolate_workspace: bool) -> Result<Vec<Window>>;

    /// Активировать окно, при необходимости перенеся его на активный стол.
    fn focus(&self, window: &Window, move_to_active_workspace: bool) -> Result<()>;

    fn minimize(&self, window: &Window) -> Result<()>;

    fn warp_pointer(&self, x: i32, y: i32) -> Result<()>;
}

/// Установленное приложение (.desktop файл).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppEntry {
    /// Идентификатор без суффикса `.desktop`.
    pub id: String,
    pub name: Option<String>,
    pub path: PathBuf,
}

impl fmt::Display for AppEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.name {
            Some(name) => write!(f, "{} ({})", name, self.id),
            None => write!(f, "{}", self.id),
        }
    }
}

/// Запуск приложений и команд.
pub trait Launcher: Send {
    fn lookup_app(&self, command: &str) -> Option<AppEntry>;

    fn activate(&self, app: &AppEntry) -> Result<()>;

    fn spawn_shell(&self, command: &str) -> Result<()>;
}

/// Уведомления для пользователя (режим verbose).
pub trait Notifier: Send {
    fn notify(&self, message: &str);
}

/// Всё, что движку нужно от рабочего стола.
pub struct Desktop {
    pub windows: Box<dyn WindowManager>,
    pub launcher: Box<dyn Launcher>,
    pub notifier: Box<dyn Notifier>,
}

impl Desktop {
    pub fn new(
        windows: Box<dyn WindowManager>,
        launcher: Box<dyn Launcher>,
        notifier: Box<dyn Notifier>,
    ) -> Self {
        Self {
            windows,
            launcher,
            notifier,
        }
    }
}
