use serde::{Deserialize, Serialize};
use std::fmt;

/// Стабильный идентификатор окна (X11 window id).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct WindowId(pub u64);

impl WindowId {
    /// Разобрать `0x04400003` или `0x4400003`.
    pub fn from_hex(s: &str) -> Option<Self> {
        let digits = s.trim().trim_start_matches("0x").trim_start_matches("0X");
        u64::from_str_radix(digits, 16).ok().map(Self)
    }
}

impl fmt::Display for WindowId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{:08x}", self.0)
    }
}

/// Снимок окна на момент опроса оконного менеджера
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Window {
    pub id: WindowId,
    pub class_name: String,
    pub title: String,
    pub focused: bool,
    pub monitor: usize,
    /// `None` для окон, видимых на всех рабочих столах.
    pub workspace: Option<u32>,
    pub geometry: WindowGeometry,
}

impl Window {
    pub fn new(id: u64, class_name: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id: WindowId(id),
            class_name: class_name.into(),
            title: title.into(),
            focused: false,
            monitor: 0,
            workspace: Some(0),
            geometry: WindowGeometry::default(),
        }
    }

    pub fn with_focus(mut self, focused: bool) -> Self {
        self.focused = focused;
        self
    }

    pub fn with_monitor(mut self, monitor: usize) -> Self {
        self.monitor = monitor;
        self
    }

    pub fn with_workspace(mut self, workspace: Option<u32>) -> Self {
        self.workspace = workspace;
        self
    }

    pub fn with_geometry(mut self, geometry: WindowGeometry) -> Self {
        self.geometry = geometry;
        self
    }

    pub fn has_focus(&self) -> bool {
        self.focused
    }

    pub fn monitor_index(&self) -> usize {
        self.monitor
    }

    pub fn frame_rect(&self) -> WindowGeometry {
        self.geometry
    }
}

impl fmt::Display for Window {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.class_name.is_empty() {
            write!(f, "{} \"{}\"", self.id, self.title)
        } else {
            write!(f, "{} \"{}\" ({})", self.id, self.title, self.class_name)
        }
    }
}

/// Геометрия окна
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct WindowGeometry {
    pub x: i32,
    pub y: i32,
    pub width: u32,
    pub height: u32,
}

impl WindowGeometry {
    pub fn new(x: i32, y: i32, width: u32, height: u32) -> Self {
        Self { x, y, width, height }
    }

    pub fn center(&self) -> (i32, i32) {
        (
            self.x + (self.width / 2) as i32,
            self.y + (self.height / 2) as i32,
        )
    }

    pub fn contains(&self, (px, py): (i32, i32)) -> bool {
        px >= self.x
            && py >= self.y
            && px < self.x + self.width as i32
            && py < self.y + self.height as i32
    }
}
