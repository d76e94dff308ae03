//! Desktop service: окна, запуск приложений и уведомления.
//!
//! Здесь только взаимодействие с рабочим столом. Решения о том, какое окно
//! поднять или что запустить, принимает `engine`.

mod dry_run;
mod launcher;
mod notifier;
mod r#trait;
mod x11;

pub use self::dry_run::DryRunDesktop;
pub use self::launcher::DesktopEntryLauncher;
pub use self::notifier::{DbusNotifier, LogNotifier};
pub use self::r#trait::{Desktop, Notifier};
#[cfg(test)]
pub use self::r#trait::WindowManager;
pub use self::x11::X11WindowManager;

use crate::config::Config;
use crate::error::Result;
use tracing::{info, warn};

/// Собрать рабочий стол под текущую сессию. В `dry_run` все вызовы только логируются.
pub fn create_desktop(config: &Config, dry_run: bool) -> Result<Desktop> {
    if dry_run {
        info!("Рабочий стол в режиме эмуляции");
        return Ok(DryRunDesktop::with_fake_windows().desktop());
    }

    if std::env::var("XDG_SESSION_TYPE").map_or(false, |s| s == "wayland") {
        warn!("Сессия Wayland: управление окнами доступно только для XWayland окон");
    }

    let windows = X11WindowManager::new();
    windows.test()?;

    let notifier: Box<dyn Notifier> = match DbusNotifier::new(&config.desktop.app_name) {
        Ok(notifier) => Box::new(notifier),
        Err(e) => {
            warn!("Сессионная шина недоступна ({}), уведомления только в лог", e);
            Box::new(LogNotifier)
        }
    };

    info!("Рабочий стол X11 инициализирован");
    Ok(Desktop::new(
        Box::new(windows),
        Box::new(DesktopEntryLauncher::new()),
        notifier,
    ))
}
