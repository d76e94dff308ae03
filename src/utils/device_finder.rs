use crate::error::{RorError, Result};
use evdev::{Device, KeyCode};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

const BY_ID_DIR: &str = "/dev/input/by-id";
const INPUT_DIR: &str = "/dev/input";

pub struct DeviceFinder;

impl DeviceFinder {
    /// Найти клавиатуру: явный путь из конфигурации или автопоиск при `auto`.
    pub fn find_keyboard_device(device_path: &str) -> Result<PathBuf> {
        if device_path != "auto" {
            let path = PathBuf::from(device_path);
            return if path.exists() {
                info!("Используется указанное устройство: {:?}", path);
                Ok(path)
            } else {
                RorError::device_not_found(format!("Указанное устройство не найдено: {:?}", path))
            };
        }

        info!("Автопоиск клавиатурного устройства...");
        let mut candidates = Self::by_id_candidates();
        candidates.extend(Self::event_candidates()?);
        candidates.sort_by(|a, b| b.1.cmp(&a.1));

        for (path, priority) in candidates {
            if Self::is_keyboard_device(&path) {
                info!("Выбрана клавиатура {:?} (приоритет: {})", path, priority);
                return Ok(path);
            }
        }

        RorError::device_not_found(
            "Не удалось найти доступное клавиатурное устройство. \
             Убедитесь, что пользователь добавлен в группу 'input'",
        )
    }

    /// Ссылки `/dev/input/by-id/*-event-kbd` и похожие, мыши отброшены.
    fn by_id_candidates() -> Vec<(PathBuf, u8)> {
        let Ok(entries) = fs::read_dir(BY_ID_DIR) else {
            debug!("Директория {} недоступна", BY_ID_DIR);
            return Vec::new();
        };

        entries
            .filter_map(|entry| entry.ok().map(|e| e.path()))
            .filter_map(|path| {
                let name = path.file_name()?.to_str()?.to_string();
                keyboard_priority(&name).map(|p| (path, p))
            })
            .collect()
    }

    /// Все `/dev/input/event*` с минимальным приоритетом, по номеру.
    fn event_candidates() -> Result<Vec<(PathBuf, u8)>> {
        let entries = fs::read_dir(INPUT_DIR)
            .map_err(|e| RorError::Permission(format!("Нет доступа к {}: {}", INPUT_DIR, e)))?;

        let mut devices: Vec<PathBuf> = entries
            .filter_map(|entry| entry.ok().map(|e| e.path()))
            .filter(|path| {
                path.file_name()
                    .and_then(|n| n.to_str())
                    .map_or(false, |n| n.starts_with("event"))
            })
            .collect();
        devices.sort();

        Ok(devices.into_iter().map(|path| (path, 0)).collect())
    }

    fn is_keyboard_device(device_path: &Path) -> bool {
        let device = match Device::open(device_path) {
            Ok(device) => device,
            Err(e) => {
                debug!("Не удалось открыть устройство {:?}: {}", device_path, e);
                return false;
            }
        };

        let device_name = device.name().unwrap_or("Unknown").to_lowercase();
        if is_pointer_name(&device_name) {
            debug!("Пропускаем мышь/тачпад: {:?} ({})", device_path, device_name);
            return false;
        }

        // У настоящей клавиатуры много клавиш
        device.supported_keys().map_or(false, |keys| {
            keys.contains(KeyCode::KEY_A)
                && keys.contains(KeyCode::KEY_SPACE)
                && keys.contains(KeyCode::KEY_ENTER)
                && keys.iter().count() > 20
        })
    }
}

fn is_pointer_name(name: &str) -> bool {
    let name = name.to_lowercase();
    ["mouse", "deathadder", "touchpad", "trackpoint"]
        .iter()
        .any(|m| name.contains(m))
}

/// Приоритет имени из by-id. `None` для не-клавиатур.
fn keyboard_priority(name: &str) -> Option<u8> {
    if !name.contains("event") || is_pointer_name(name) {
        return None;
    }
    if name.ends_with("event-kbd") {
        Some(100)
    } else if name.to_lowercase().contains("keyboard") {
        Some(50)
    } else if name.contains("kbd") {
        Some(10)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_find_keyboard_device_with_specific_path() {
        let result = DeviceFinder::find_keyboard_device("/non/existent/path");
        assert!(matches!(result, Err(RorError::DeviceNotFound(_))));
    }

    #[test]
    fn test_by_id_priorities() {
        assert_eq!(keyboard_priority("usb-Logitech_USB_Receiver-event-kbd"), Some(100));
        assert_eq!(keyboard_priority("usb-Some_Keyboard-if01-event-joystick"), Some(50));
        assert_eq!(keyboard_priority("usb-Razer_DeathAdder-event-kbd"), None);
        assert_eq!(keyboard_priority("usb-Logitech_USB_Receiver-event-mouse"), None);
        assert_eq!(keyboard_priority("usb-Logitech_USB_Receiver-kbd"), None);
    }
}
