//! Решение "сфокусировать или запустить" для одного нажатия шортката.
//!
//! [`Action::trigger`] получает свежий снимок окон и состояние lock-клавиш,
//! выбирает ровно один исход и сам выполняет побочные эффекты через
//! [`Desktop`]. Ошибки оконного менеджера и запуска не прерывают работу:
//! они логируются и превращаются в [`Outcome::NoOp`].

pub mod register;

pub use register::{RegisterTable, Slot, WindowRef};

use crate::binding::{Behavior, Binding, Flag, LockState};
use crate::debug_if_enabled;
use crate::events::{Window, WindowId};
use crate::services::desktop::Desktop;
use std::fmt;
use tracing::{debug, info, warn};

/// Итог одного срабатывания.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Focused(WindowId),
    Registered {
        slot: Option<Slot>,
        window: Option<WindowId>,
    },
    /// Команда запущена. `raised` заполнен, если с `always-run` окно
    /// было ещё и сфокусировано.
    Launched { raised: Option<WindowId> },
    Minimized(WindowId),
    NoOp,
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Outcome::Focused(id) => write!(f, "focused {}", id),
            Outcome::Registered { slot, window } => {
                let target = window.map_or_else(|| "nothing".to_string(), |id| id.to_string());
                match slot {
                    Some(slot) => write!(f, "registered {} into slot {}", target, slot),
                    None => write!(f, "registered {}", target),
                }
            }
            Outcome::Launched { raised: Some(id) } => write!(f, "launched (and focused {})", id),
            Outcome::Launched { raised: None } => write!(f, "launched"),
            Outcome::Minimized(id) => write!(f, "minimized {}", id),
            Outcome::NoOp => write!(f, "no-op"),
        }
    }
}

/// Состояние, которое движок хранит для одного биндинга.
#[derive(Debug, Default)]
pub struct EngineState {
    registered_window: Option<WindowRef>,
}

#[cfg(test)]
impl EngineState {
    pub fn registered_window(&self) -> Option<&WindowRef> {
        self.registered_window.as_ref()
    }
}

/// Биндинг вместе с его состоянием и итоговыми флагами.
#[derive(Debug)]
pub struct Action {
    binding: Binding,
    /// Флаги биндинга поверх глобальных значений по умолчанию.
    behavior: Behavior,
    state: EngineState,
}

impl Action {
    pub fn new(binding: Binding, defaults: &Behavior) -> Self {
        let behavior = binding.behavior.over(defaults);
        Self {
            binding,
            behavior,
            state: EngineState::default(),
        }
    }

    pub fn binding(&self) -> &Binding {
        &self.binding
    }

    pub fn behavior(&self) -> &Behavior {
        &self.behavior
    }

    #[cfg(test)]
    pub fn state(&self) -> &EngineState {
        &self.state
    }

    /// Подходит ли окно под критерии биндинга.
    ///
    /// Класс (и заголовок, если задан) важнее одного заголовка. Без обоих
    /// критериев команда ищется в классе или заголовке без учёта регистра.
    pub fn is_conforming(&self, window: &Window) -> bool {
        let class = &self.binding.class_matcher;
        let title = &self.binding.title_matcher;

        if !class.is_empty() {
            class.matches(&window.class_name) && (title.is_empty() || title.matches(&window.title))
        } else if !title.is_empty() {
            title.matches(&window.title)
        } else {
            let command = self.binding.command.to_lowercase();
            window.class_name.to_lowercase().contains(&command)
                || window.title.to_lowercase().contains(&command)
        }
    }

    /// Выполнить шорткат.
    pub fn trigger(
        &mut self,
        desktop: &Desktop,
        register: &mut RegisterTable,
        windows: &[Window],
        locks: LockState,
    ) -> Outcome {
        if !self.binding.locks.conforms(locks) {
            debug!(
                "Шорткат {} не активен при состоянии lock-клавиш {:?}",
                self.binding.shortcut, locks
            );
            return Outcome::NoOp;
        }

        self.debug(
            desktop,
            format_args!(
                "trigger class: {}, title: {}, command: {}",
                self.binding.class_matcher, self.binding.title_matcher, self.binding.command
            ),
        );

        if self.behavior.enabled(Flag::RaiseOrRegister) {
            return self.raise_or_register(desktop, windows);
        }
        if let Some(value) = self.behavior.get(Flag::Register) {
            let slot = Slot::from_arg(value.arg());
            let window = windows.iter().find(|w| self.is_conforming(w));
            let id = window.map(|w| w.id);
            info!("Ячейка {}: {}", slot, window.map_or_else(|| "пусто".to_string(), |w| w.to_string()));
            register.store(slot.clone(), window.map(WindowRef::from));
            return Outcome::Registered {
                slot: Some(slot),
                window: id,
            };
        }
        if let Some(value) = self.behavior.get(Flag::Raise) {
            let slot = Slot::from_arg(value.arg());
            return match self.focus_live(desktop, register.get(&slot), windows) {
                Some(id) => Outcome::Focused(id),
                None => Outcome::NoOp,
            };
        }

        if self.behavior.enabled(Flag::RunOnly) {
            return self.launch_outcome(desktop, None);
        }

        self.run_or_raise(desktop, windows)
    }

    fn raise_or_register(&mut self, desktop: &Desktop, windows: &[Window]) -> Outcome {
        if let Some(id) = self.focus_live(desktop, self.state.registered_window.as_ref(), windows) {
            return Outcome::Focused(id);
        }

        let window = windows.iter().find(|w| self.is_conforming(w));
        self.state.registered_window = window.map(WindowRef::from);
        debug!(
            "Шорткат {} запомнил окно: {:?}",
            self.binding.shortcut,
            self.state.registered_window.as_ref().map(|w| w.to_string())
        );
        Outcome::Registered {
            slot: None,
            window: window.map(|w| w.id),
        }
    }

    fn run_or_raise(&self, desktop: &Desktop, windows: &[Window]) -> Outcome {
        // Если первое окно уже подходит, идём с конца: предпочитаем самое старое
        let oldest_first = windows.first().is_some_and(|w| self.is_conforming(w));
        let ordered: Vec<&Window> = if oldest_first {
            windows.iter().rev().collect()
        } else {
            windows.iter().collect()
        };

        let mut seen: Option<&Window> = None;
        for window in ordered {
            if self.is_conforming(window) {
                seen = Some(window);
                if !window.has_focus() {
                    break;
                }
            }
        }
        debug_if_enabled!(
            "Шорткат {}: найдено окно {:?} (обход {})",
            self.binding.shortcut,
            seen.map(|w| w.to_string()),
            if oldest_first { "с конца" } else { "с начала" }
        );

        let mut outcome = Outcome::NoOp;
        if let Some(seen) = seen {
            if !seen.has_focus() {
                if self.focus_window(desktop, seen) {
                    outcome = Outcome::Focused(seen.id);
                }
            } else {
                if self.behavior.enabled(Flag::MinimizeWhenUnfocused) {
                    match desktop.windows.minimize(seen) {
                        Ok(()) => outcome = Outcome::Minimized(seen.id),
                        Err(e) => warn!("Не удалось свернуть окно {}: {}", seen, e),
                    }
                }
                if self.behavior.enabled(Flag::SwitchBackWhenFocused) {
                    let previous = windows
                        .iter()
                        .find(|w| w.monitor_index() == seen.monitor_index() && w.id != seen.id);
                    if let Some(previous) = previous {
                        if self.focus_window(desktop, previous) {
                            outcome = Outcome::Focused(previous.id);
                        }
                    }
                }
            }
        }

        if seen.is_none() || self.behavior.enabled(Flag::AlwaysRun) {
            let raised = match outcome {
                Outcome::Focused(id) => Some(id),
                _ => None,
            };
            let launched = self.launch_outcome(desktop, raised);
            if launched != Outcome::NoOp {
                return launched;
            }
        }
        outcome
    }

    /// Сфокусировать запомненное окно, только если оно ещё живо.
    fn focus_live(
        &self,
        desktop: &Desktop,
        handle: Option<&WindowRef>,
        windows: &[Window],
    ) -> Option<WindowId> {
        let Some(live) = handle.and_then(|h| h.resolve(windows)) else {
            self.debug(desktop, "Window not found");
            return None;
        };
        self.focus_window(desktop, live).then_some(live.id)
    }

    fn focus_window(&self, desktop: &Desktop, window: &Window) -> bool {
        let move_here = self.behavior.enabled(Flag::MoveWindowToActiveWorkspace);
        if let Err(e) = desktop.windows.focus(window, move_here) {
            warn!("Не удалось активировать окно {}: {}", window, e);
            self.debug(desktop, format_args!("Focus failed: {}", e));
            return false;
        }

        if self.behavior.enabled(Flag::CenterMouseToFocusedWindow) {
            let (x, y) = window.frame_rect().center();
            if let Err(e) = desktop.windows.warp_pointer(x, y) {
                warn!("Не удалось переместить указатель: {}", e);
            }
        }
        self.debug(desktop, "Window activated");
        true
    }

    fn launch_outcome(&self, desktop: &Desktop, raised: Option<WindowId>) -> Outcome {
        if self.run(desktop) {
            Outcome::Launched { raised }
        } else {
            raised.map_or(Outcome::NoOp, Outcome::Focused)
        }
    }

    /// Запустить команду: сначала как установленное приложение, потом через shell.
    fn run(&self, desktop: &Desktop) -> bool {
        let command = &self.binding.command;
        self.debug(desktop, format_args!("running: {}", command));

        let result = match desktop.launcher.lookup_app(command) {
            Some(app) => {
                info!("Активируем приложение {}", app);
                desktop.launcher.activate(&app)
            }
            None => {
                info!("Запускаем команду: {}", command);
                desktop.launcher.spawn_shell(command)
            }
        };

        match result {
            Ok(()) => true,
            Err(e) => {
                warn!("Не удалось запустить '{}': {}", command, e);
                self.debug(desktop, format_args!("Launch failed: {}", e));
                false
            }
        }
    }

    /// Диагностика в уведомления, только с флагом `verbose`.
    fn debug(&self, desktop: &Desktop, message: impl fmt::Display) {
        if self.behavior.enabled(Flag::Verbose) {
            desktop.notifier.notify(&format!("Run-or-raise> {}", message));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::desktop::{DryRunDesktop, WindowManager};

    fn action(line: &str) -> Action {
        Action::new(Binding::parse(line).unwrap(), &Behavior::new())
    }

    fn fixture(windows: Vec<Window>) -> (DryRunDesktop, Desktop) {
        let mock = DryRunDesktop::new();
        mock.set_windows(windows);
        let desktop = mock.desktop();
        (mock, desktop)
    }

    fn fire(action: &mut Action, mock: &DryRunDesktop, desktop: &Desktop, register: &mut RegisterTable) -> Outcome {
        let windows = mock.list_windows(false).unwrap();
        action.trigger(desktop, register, &windows, LockState::default())
    }

    #[test]
    fn class_match_is_case_sensitive() {
        let action = action("a, foo, bar");
        assert!(!action.is_conforming(&Window::new(1, "Bar", "whatever")));
        assert!(action.is_conforming(&Window::new(1, "foobar", "whatever")));
    }

    #[test]
    fn class_and_title_must_both_match() {
        let action = action("a, foo, term, /vim$/");
        assert!(action.is_conforming(&Window::new(1, "gnome-terminal", "file.rs - vim")));
        assert!(!action.is_conforming(&Window::new(1, "gnome-terminal", "bash")));
        assert!(!action.is_conforming(&Window::new(1, "xterm-no", "vi")));
    }

    #[test]
    fn title_alone_when_class_empty() {
        let action = action("a, foo, , Inbox");
        assert!(action.is_conforming(&Window::new(1, "thunderbird", "Inbox - Mail")));
        assert!(!action.is_conforming(&Window::new(1, "Inbox", "Drafts")));
    }

    #[test]
    fn command_fallback_is_case_insensitive() {
        let action = action("a, Firefox, , ");
        assert!(action.is_conforming(&Window::new(1, "Navigator", "firefox — mozilla")));
        assert!(action.is_conforming(&Window::new(1, "FIREFOX", "start page")));
        assert!(!action.is_conforming(&Window::new(1, "chromium", "start page")));
    }

    #[test]
    fn lock_mismatch_is_noop() {
        let mut action = action("<Caps_Lock_OFF>a, firefox, firefox");
        let (mock, desktop) = fixture(vec![Window::new(1, "firefox", "Firefox")]);
        let windows = mock.list_windows(false).unwrap();
        let mut register = RegisterTable::new();

        let outcome = action.trigger(&desktop, &mut register, &windows, LockState::new(true, true, true));
        assert_eq!(outcome, Outcome::NoOp);
        assert!(mock.calls().is_empty());

        let outcome = action.trigger(&desktop, &mut register, &windows, LockState::new(false, false, false));
        assert_eq!(outcome, Outcome::Focused(WindowId(1)));
    }

    #[test]
    fn first_unfocused_conforming_window_wins() {
        let mut action = action("a, app, app");
        let (mock, desktop) = fixture(vec![
            Window::new(1, "app", "W1").with_focus(false),
            Window::new(2, "app", "W2").with_focus(true),
        ]);
        let mut register = RegisterTable::new();

        let outcome = fire(&mut action, &mock, &desktop, &mut register);
        assert_eq!(outcome, Outcome::Focused(WindowId(1)));
        assert_eq!(mock.calls(), vec!["focus:0x00000001"]);
    }

    #[test]
    fn cycles_through_matching_windows() {
        let mut action = action("a, term, term");
        let (mock, desktop) = fixture(vec![
            Window::new(1, "term", "one").with_focus(true),
            Window::new(2, "editor", "code"),
            Window::new(3, "term", "two"),
            Window::new(4, "term", "three"),
        ]);
        let mut register = RegisterTable::new();

        // Текущее окно подходит: берём самое старое из подходящих
        assert_eq!(fire(&mut action, &mock, &desktop, &mut register), Outcome::Focused(WindowId(4)));
        assert_eq!(fire(&mut action, &mock, &desktop, &mut register), Outcome::Focused(WindowId(3)));
        assert_eq!(fire(&mut action, &mock, &desktop, &mut register), Outcome::Focused(WindowId(1)));
    }

    #[test]
    fn youngest_conforming_when_current_does_not_match() {
        let mut action = action("a, term, term");
        let (mock, desktop) = fixture(vec![
            Window::new(1, "editor", "code").with_focus(true),
            Window::new(2, "term", "recent"),
            Window::new(3, "term", "old"),
        ]);
        let mut register = RegisterTable::new();

        assert_eq!(fire(&mut action, &mock, &desktop, &mut register), Outcome::Focused(WindowId(2)));
    }

    #[test]
    fn launches_when_nothing_conforms() {
        let mut action = action("a, gedit, gedit");
        let (mock, desktop) = fixture(vec![Window::new(1, "term", "bash").with_focus(true)]);
        let mut register = RegisterTable::new();

        let outcome = fire(&mut action, &mock, &desktop, &mut register);
        assert_eq!(outcome, Outcome::Launched { raised: None });
        assert_eq!(mock.calls(), vec!["spawn:gedit"]);
    }

    #[test]
    fn installed_app_is_activated_instead_of_spawned() {
        let mut action = action("a, org.gnome.Nautilus, nautilus");
        let (mock, desktop) = fixture(vec![]);
        mock.set_apps(&["org.gnome.Nautilus"]);
        let mut register = RegisterTable::new();

        let outcome = fire(&mut action, &mock, &desktop, &mut register);
        assert_eq!(outcome, Outcome::Launched { raised: None });
        assert_eq!(mock.calls(), vec!["activate:org.gnome.Nautilus"]);
    }

    #[test]
    fn always_run_focuses_and_launches() {
        let mut action = action("a:always-run, firefox, firefox");
        let (mock, desktop) = fixture(vec![
            Window::new(1, "term", "bash").with_focus(true),
            Window::new(2, "firefox", "Mozilla Firefox"),
        ]);
        let mut register = RegisterTable::new();

        let outcome = fire(&mut action, &mock, &desktop, &mut register);
        assert_eq!(outcome, Outcome::Launched { raised: Some(WindowId(2)) });
        assert_eq!(mock.calls(), vec!["focus:0x00000002", "spawn:firefox"]);
    }

    #[test]
    fn run_only_never_looks_at_windows() {
        let mut action = action("a, firefox");
        let (mock, desktop) = fixture(vec![Window::new(1, "firefox", "Firefox")]);
        let mut register = RegisterTable::new();

        assert_eq!(fire(&mut action, &mock, &desktop, &mut register), Outcome::Launched { raised: None });
        assert_eq!(mock.calls(), vec!["spawn:firefox"]);
    }

    #[test]
    fn launch_failure_is_reported_not_fatal() {
        let mut action = action("a:verbose, nosuchcmd, nosuch");
        let (mock, desktop) = fixture(vec![]);
        mock.set_fail_spawn(true);
        let mut register = RegisterTable::new();

        assert_eq!(fire(&mut action, &mock, &desktop, &mut register), Outcome::NoOp);
        assert!(mock.calls().iter().any(|c| c.starts_with("notify:Run-or-raise> Launch failed")));
    }

    #[test]
    fn focused_window_is_minimized() {
        let mut action = action("a:minimize-when-unfocused, term, term");
        let (mock, desktop) = fixture(vec![
            Window::new(1, "term", "bash").with_focus(true),
            Window::new(2, "editor", "code"),
        ]);
        let mut register = RegisterTable::new();

        assert_eq!(fire(&mut action, &mock, &desktop, &mut register), Outcome::Minimized(WindowId(1)));
        assert_eq!(mock.calls(), vec!["minimize:0x00000001"]);
    }

    #[test]
    fn switch_back_focuses_previous_window_on_same_monitor() {
        let mut action = action("a:switch-back-when-focused, term, term");
        let (mock, desktop) = fixture(vec![
            Window::new(1, "term", "bash").with_focus(true).with_monitor(0),
            Window::new(2, "editor", "code").with_monitor(1),
            Window::new(3, "browser", "web").with_monitor(0),
        ]);
        let mut register = RegisterTable::new();

        assert_eq!(fire(&mut action, &mock, &desktop, &mut register), Outcome::Focused(WindowId(3)));
    }

    #[test]
    fn focus_options_move_and_center_pointer() {
        let mut action = action(
            "a:center-mouse-to-focused-window:move-window-to-active-workspace, app, app",
        );
        let (mock, desktop) = fixture(vec![
            Window::new(1, "term", "bash").with_focus(true),
            Window::new(2, "app", "App")
                .with_workspace(Some(3))
                .with_geometry(crate::events::WindowGeometry::new(100, 100, 200, 100)),
        ]);
        let mut register = RegisterTable::new();

        assert_eq!(fire(&mut action, &mock, &desktop, &mut register), Outcome::Focused(WindowId(2)));
        assert_eq!(mock.calls(), vec!["focus:0x00000002", "warp:200,150"]);
        assert_eq!(mock.windows()[0].workspace, Some(0));
    }

    #[test]
    fn raise_or_register_cycle() {
        let mut action = action("a:raise-or-register, , , ");
        let (mock, desktop) = fixture(vec![
            Window::new(1, "term", "bash").with_focus(true),
            Window::new(2, "editor", "code"),
        ]);
        let mut register = RegisterTable::new();

        // Первое нажатие запоминает окно
        let outcome = fire(&mut action, &mock, &desktop, &mut register);
        assert_eq!(outcome, Outcome::Registered { slot: None, window: Some(WindowId(1)) });
        assert!(mock.calls().is_empty());

        // Окно живо: фокусируем
        mock.focus(&Window::new(2, "editor", "code"), false).unwrap();
        mock.clear_calls();
        assert_eq!(fire(&mut action, &mock, &desktop, &mut register), Outcome::Focused(WindowId(1)));

        // Окно закрыто: запоминаем заново
        mock.set_windows(vec![Window::new(2, "editor", "code").with_focus(true)]);
        let outcome = fire(&mut action, &mock, &desktop, &mut register);
        assert_eq!(outcome, Outcome::Registered { slot: None, window: Some(WindowId(2)) });
        assert_eq!(action.state().registered_window().map(|w| w.id), Some(WindowId(2)));
    }

    #[test]
    fn register_then_raise_through_shared_table() {
        let mut store = action("<Super>1:register(1), , , ");
        let mut raise = action("<Super>2:raise(1)");
        let (mock, desktop) = fixture(vec![
            Window::new(5, "term", "bash").with_focus(true),
            Window::new(6, "editor", "code"),
        ]);
        let mut register = RegisterTable::new();

        let outcome = fire(&mut store, &mock, &desktop, &mut register);
        assert_eq!(
            outcome,
            Outcome::Registered { slot: Some(Slot::new("1")), window: Some(WindowId(5)) }
        );

        mock.focus(&Window::new(6, "editor", "code"), false).unwrap();
        assert_eq!(fire(&mut raise, &mock, &desktop, &mut register), Outcome::Focused(WindowId(5)));

        // Окно закрыто: raise ничего не делает
        mock.set_windows(vec![Window::new(6, "editor", "code").with_focus(true)]);
        mock.clear_calls();
        assert_eq!(fire(&mut raise, &mock, &desktop, &mut register), Outcome::NoOp);
        assert!(mock.calls().is_empty());
    }

    #[test]
    fn raise_or_register_takes_first_conforming_window() {
        let mut action = action("a:raise-or-register, editor, editor");
        let (mock, desktop) = fixture(vec![
            Window::new(1, "term", "bash").with_focus(true),
            Window::new(2, "editor", "code"),
            Window::new(3, "editor", "notes"),
        ]);
        let mut register = RegisterTable::new();

        let outcome = fire(&mut action, &mock, &desktop, &mut register);
        assert_eq!(outcome, Outcome::Registered { slot: None, window: Some(WindowId(2)) });
    }

    #[test]
    fn raise_or_register_registers_again_when_focus_fails() {
        let mut action = action("a:raise-or-register, editor, editor");
        let (mock, desktop) = fixture(vec![
            Window::new(1, "term", "bash").with_focus(true),
            Window::new(2, "editor", "code"),
            Window::new(3, "editor", "notes"),
        ]);
        let mut register = RegisterTable::new();
        fire(&mut action, &mock, &desktop, &mut register);

        // Окно 2 живо, но активировать его нельзя
        mock.set_windows(vec![
            Window::new(1, "term", "bash").with_focus(true),
            Window::new(3, "editor", "notes"),
            Window::new(2, "editor", "code"),
        ]);
        mock.set_fail_focus(true);

        let outcome = fire(&mut action, &mock, &desktop, &mut register);
        assert_eq!(outcome, Outcome::Registered { slot: None, window: Some(WindowId(3)) });
        assert_eq!(action.state().registered_window().map(|w| w.id), Some(WindowId(3)));
        assert!(mock.calls().is_empty());
    }

    #[test]
    fn register_skips_nonconforming_windows() {
        let mut store = action("<Super>1:register(1), editor, editor");
        let mut raise = action("<Super>2:raise(1)");
        let (mock, desktop) = fixture(vec![
            Window::new(1, "term", "bash").with_focus(true),
            Window::new(2, "editor", "code"),
        ]);
        let mut register = RegisterTable::new();

        let outcome = fire(&mut store, &mock, &desktop, &mut register);
        assert_eq!(
            outcome,
            Outcome::Registered { slot: Some(Slot::new("1")), window: Some(WindowId(2)) }
        );

        mock.set_fail_focus(true);
        assert_eq!(fire(&mut raise, &mock, &desktop, &mut register), Outcome::NoOp);

        mock.set_fail_focus(false);
        assert_eq!(fire(&mut raise, &mock, &desktop, &mut register), Outcome::Focused(WindowId(2)));
    }

    #[test]
    fn failed_focus_is_noop_without_launch() {
        let mut action = action("a, app, app");
        let (mock, desktop) = fixture(vec![
            Window::new(1, "term", "bash").with_focus(true),
            Window::new(2, "app", "App"),
        ]);
        mock.set_fail_focus(true);
        let mut register = RegisterTable::new();

        assert_eq!(fire(&mut action, &mock, &desktop, &mut register), Outcome::NoOp);
        assert!(mock.calls().is_empty());
    }

    #[test]
    fn defaults_apply_unless_overridden() {
        let mut defaults = Behavior::new();
        defaults.set(Flag::AlwaysRun);
        let binding = Binding::parse("a:always-run(false), app, app").unwrap();
        let action = Action::new(binding, &defaults);
        assert!(!action.behavior().enabled(Flag::AlwaysRun));

        let action = Action::new(Binding::parse("a, app, app").unwrap(), &defaults);
        assert!(action.behavior().enabled(Flag::AlwaysRun));
    }
}
