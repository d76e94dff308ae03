use crate::events::{Window, WindowId};
use std::collections::HashMap;
use std::fmt;

/// Имя ячейки из `register(n)` / `raise(n)`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Slot(pub String);

impl Slot {
    /// Ячейка для флага без аргумента.
    pub const DEFAULT: &'static str = "default";

    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn from_arg(arg: Option<&str>) -> Self {
        match arg.map(str::trim) {
            Some(name) if !name.is_empty() => Self::new(name),
            _ => Self::new(Self::DEFAULT),
        }
    }
}

impl fmt::Display for Slot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Слабая ссылка на окно: идентичность и подписи для логов.
///
/// Перед любым действием окно ищется по `id` в свежем снимке.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WindowRef {
    pub id: WindowId,
    pub class_name: String,
    pub title: String,
}

impl WindowRef {
    /// Живое окно с тем же `id`, если оно ещё есть в снимке.
    pub fn resolve<'w>(&self, windows: &'w [Window]) -> Option<&'w Window> {
        windows.iter().find(|w| w.id == self.id)
    }
}

impl From<&Window> for WindowRef {
    fn from(window: &Window) -> Self {
        Self {
            id: window.id,
            class_name: window.class_name.clone(),
            title: window.title.clone(),
        }
    }
}

impl fmt::Display for WindowRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} \"{}\" ({})", self.id, self.title, self.class_name)
    }
}

/// Общая для всех биндингов таблица `register`/`raise`.
/// Запись перезаписывает ячейку, явного удаления нет.
#[derive(Debug, Default)]
pub struct RegisterTable {
    slots: HashMap<Slot, WindowRef>,
}

impl RegisterTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Записать окно в ячейку. `None` оставляет ячейку пустой.
    pub fn store(&mut self, slot: Slot, window: Option<WindowRef>) {
        match window {
            Some(window) => {
                self.slots.insert(slot, window);
            }
            None => {
                self.slots.remove(&slot);
            }
        }
    }

    pub fn get(&self, slot: &Slot) -> Option<&WindowRef> {
        self.slots.get(slot)
    }
}
