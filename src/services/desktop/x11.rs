use super::r#trait::WindowManager;
use crate::error::Result;
use crate::events::{Window, WindowGeometry, WindowId};
use crate::{ror_error, trace_if_enabled};
use std::collections::HashMap;
use std::process::Command;
use tracing::{debug, warn};

/// Оконный менеджер X11 через `wmctrl`, `xprop`, `xrandr` и `xdotool`.
pub struct X11WindowManager;

/// Строка `wmctrl -lGx` до сборки в [`Window`].
#[derive(Debug, Clone, PartialEq, Eq)]
struct ListedWindow {
    id: WindowId,
    /// `-1` у wmctrl означает "на всех рабочих столах".
    workspace: Option<u32>,
    geometry: WindowGeometry,
    class_name: String,
    title: String,
}

impl X11WindowManager {
    pub fn new() -> Self {
        Self
    }

    pub fn test(&self) -> Result<()> {
        run_tool("wmctrl", &["-m"]).map(|_| ())
    }

    fn active_workspace(&self) -> Option<u32> {
        match run_tool("wmctrl", &["-d"]) {
            Ok(out) => parse_active_workspace(&out),
            Err(e) => {
                warn!("Не удалось получить список рабочих столов: {}", e);
                None
            }
        }
    }
}

impl Default for X11WindowManager {
    fn default() -> Self {
        Self::new()
    }
}

impl WindowManager for X11WindowManager {
    fn list_windows(&self, isolate_workspace: bool) -> Result<Vec<Window>> {
        let listed = parse_wmctrl_windows(&run_tool("wmctrl", &["-lGx"])?);
        let stacking = run_tool("xprop", &["-root", "_NET_CLIENT_LIST_STACKING"])
            .map(|out| parse_window_list(&out))
            .unwrap_or_default();
        let active = run_tool("xprop", &["-root", "_NET_ACTIVE_WINDOW"])
            .ok()
            .and_then(|out| parse_window_list(&out).into_iter().next());
        let monitors = run_tool("xrandr", &["--listactivemonitors"])
            .map(|out| parse_monitors(&out))
            .unwrap_or_default();
        let mut windows = assemble(listed, &stacking, active, &monitors);
        if isolate_workspace {
            windows = isolate_to_workspace(windows, self.active_workspace());
        }

        debug!("Получено {} окон (isolate: {})", windows.len(), isolate_workspace);
        Ok(windows)
    }

    fn focus(&self, window: &Window, move_to_active_workspace: bool) -> Result<()> {
        let id = window.id.to_string();
        // -R переносит окно на текущий стол, -a переключает на стол окна
        let mode = if move_to_active_workspace { "-R" } else { "-a" };
        run_tool("wmctrl", &["-i", mode, &id]).map(|_| ())
    }

    fn minimize(&self, window: &Window) -> Result<()> {
        run_tool("xdotool", &["windowminimize", &window.id.0.to_string()]).map(|_| ())
    }

    fn warp_pointer(&self, x: i32, y: i32) -> Result<()> {
        run_tool("xdotool", &["mousemove", &x.to_string(), &y.to_string()]).map(|_| ())
    }
}

fn run_tool(program: &str, args: &[&str]) -> Result<String> {
    let output = Command::new(program)
        .args(args)
        .output()
        .map_err(|e| ror_error!(command, "{} не найден: {}", program, e))?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(ror_error!(command, "{} {:?} вернул ошибку: {}", program, args, stderr.trim()));
    }

    let stdout = String::from_utf8_lossy(&output.stdout).into_owned();
    trace_if_enabled!("{} {:?} -> {}", program, args, stdout);
    Ok(stdout)
}

/// Оставить окна текущего стола и липкие окна. Без известного стола
/// фильтр не применяется.
fn isolate_to_workspace(windows: Vec<Window>, current: Option<u32>) -> Vec<Window> {
    let Some(current) = current else {
        warn!("Активный рабочий стол неизвестен, isolate-workspace не применяется");
        return windows;
    };
    windows
        .into_iter()
        .filter(|w| w.workspace.map_or(true, |own| own == current))
        .collect()
}

/// Окна в порядке MRU: сначала верх стека, окна вне стека в конце.
fn assemble(
    listed: Vec<ListedWindow>,
    stacking: &[WindowId],
    active: Option<WindowId>,
    monitors: &[WindowGeometry],
) -> Vec<Window> {
    let rank: HashMap<WindowId, usize> = stacking
        .iter()
        .rev()
        .enumerate()
        .map(|(i, id)| (*id, i))
        .collect();

    let mut windows: Vec<Window> = listed
        .into_iter()
        .map(|w| {
            let center = w.geometry.center();
            let monitor = monitors.iter().position(|m| m.contains(center)).unwrap_or(0);
            Window::new(w.id.0, w.class_name, w.title)
                .with_focus(Some(w.id) == active)
                .with_monitor(monitor)
                .with_workspace(w.workspace)
                .with_geometry(w.geometry)
        })
        .collect();

    windows.sort_by_key(|w| rank.get(&w.id).copied().unwrap_or(usize::MAX));
    windows
}

/// Отрезать `n` слов, вернуть их и остаток строки.
fn split_words(line: &str, n: usize) -> Option<(Vec<&str>, &str)> {
    let mut rest = line.trim_start();
    let mut words = Vec::with_capacity(n);
    for _ in 0..n {
        let end = rest.find(char::is_whitespace).unwrap_or(rest.len());
        if end == 0 {
            return None;
        }
        words.push(&rest[..end]);
        rest = rest[end..].trim_start();
    }
    Some((words, rest))
}

/// `0x04400003  0 1920 27 1920 1053 Navigator.firefox  host Mozilla Firefox`
fn parse_wmctrl_windows(output: &str) -> Vec<ListedWindow> {
    output
        .lines()
        .filter_map(|line| {
            let (words, title) = split_words(line, 8)?;
            let id = WindowId::from_hex(words[0])?;
            let workspace = words[1].parse::<i64>().ok()?;
            let geometry = WindowGeometry::new(
                words[2].parse().ok()?,
                words[3].parse().ok()?,
                words[4].parse().ok()?,
                words[5].parse().ok()?,
            );
            Some(ListedWindow {
                id,
                workspace: u32::try_from(workspace).ok(),
                geometry,
                class_name: class_from_wm_class(words[6]).to_string(),
                title: title.to_string(),
            })
        })
        .collect()
}

/// wmctrl склеивает instance и class через точку, а точки бывают в обоих.
fn class_from_wm_class(wm_class: &str) -> &str {
    for (at, _) in wm_class.match_indices('.') {
        let (instance, class) = (&wm_class[..at], &wm_class[at + 1..]);
        if instance.eq_ignore_ascii_case(class) {
            return class;
        }
    }
    wm_class.rsplit_once('.').map_or(wm_class, |(_, class)| class)
}

/// `_NET_CLIENT_LIST_STACKING(WINDOW): window id # 0x1e00003, 0x3a00003`
fn parse_window_list(output: &str) -> Vec<WindowId> {
    output
        .split_once('#')
        .map(|(_, ids)| ids.split(',').filter_map(WindowId::from_hex).collect())
        .unwrap_or_default()
}

/// `0  * DG: 1920x1080  VP: 0,0  WA: 0,27 1920x1053  Workspace 1`
fn parse_active_workspace(output: &str) -> Option<u32> {
    output.lines().find_map(|line| {
        let mut words = line.split_whitespace();
        let index = words.next()?.parse().ok()?;
        (words.next()? == "*").then_some(index)
    })
}

/// ` 0: +*DP-1 2560/597x1440/336+0+0  DP-1`
fn parse_monitors(output: &str) -> Vec<WindowGeometry> {
    output
        .lines()
        .filter_map(|line| {
            let geometry = line.split_whitespace().nth(2)?;
            let (size, offset) = geometry.split_once('+')?;
            let (x, y) = offset.split_once('+')?;
            let (width, height) = size.split_once('x')?;
            let width = width.split('/').next()?.parse().ok()?;
            let height = height.split('/').next()?.parse().ok()?;
            Some(WindowGeometry::new(x.parse().ok()?, y.parse().ok()?, width, height))
        })
        .collect()
}
