use crate::binding::LockState;
use crate::config::Config;
use crate::error::{RorError, Result};
use crate::events::{KeyCode, KeyEvent, KeyState};
use crate::utils::DeviceFinder;
use evdev::{AttributeSetRef, Device, EventType, LedCode};
use std::path::Path;
use std::sync::Arc;
use tokio::sync::mpsc::UnboundedSender;
use tracing::{debug, error, info, warn};

use super::modifier_state::ModifierState;
use super::r#trait::KeyboardListenerTrait;

/// Читает клавиатуру без захвата: события продолжают доходить до сессии,
/// наружу уходят только нажатия не-модификаторов.
pub struct RealKeyboardListener {
    device: Device,
    device_name: String,
    events: UnboundedSender<KeyEvent>,
    modifier_state: ModifierState,
}

impl RealKeyboardListener {
    pub fn new(config: Arc<Config>, events: UnboundedSender<KeyEvent>) -> Result<Self> {
        info!("Инициализация RealKeyboardListener");

        let device_path = DeviceFinder::find_keyboard_device(&config.input.device_path)?;
        let device = Device::open(&device_path).map_err(|e| {
            Self::log_open_error(&device_path, &e);
            RorError::DeviceNotFound(format!(
                "Не удалось открыть устройство {:?}: {}",
                device_path, e
            ))
        })?;

        let device_name = device.name().unwrap_or("Unknown").to_string();
        info!("Устройство: {}", device_name);
        info!("Физический путь: {:?}", device.physical_path());

        Ok(Self {
            device,
            device_name,
            events,
            modifier_state: ModifierState::new(),
        })
    }

    /// Блокирующий цикл чтения, выполняется вне async рантайма.
    fn read_loop(mut self) -> Result<()> {
        info!("RealKeyboardListener запущен, начинаем чтение событий");

        loop {
            let events = match self.device.fetch_events() {
                Ok(events) => events.collect::<Vec<_>>(),
                Err(e) => {
                    error!("Ошибка чтения событий: {}", e);
                    return Err(RorError::Io(e));
                }
            };

            for event in events {
                if event.event_type() != EventType::KEY {
                    continue;
                }
                if let Some(key_event) = self.handle_key(event.code(), event.value()) {
                    debug!("Событие клавиши: {}", key_event);
                    if self.events.send(key_event).is_err() {
                        info!("Канал событий закрыт, RealKeyboardListener завершается");
                        return Ok(());
                    }
                }
            }
        }
    }

    fn handle_key(&mut self, code: u16, value: i32) -> Option<KeyEvent> {
        let state = match value {
            0 => KeyState::Released,
            1 => KeyState::Pressed,
            2 => KeyState::Repeat,
            _ => {
                debug!("Неизвестное значение события: {}", value);
                return None;
            }
        };

        let key = evdev::KeyCode::new(code);
        if state != KeyState::Repeat
            && self.modifier_state.update_key(key, state == KeyState::Pressed)
        {
            return None;
        }
        if state != KeyState::Pressed {
            return None;
        }

        Some(KeyEvent::new(
            KeyCode::from(key),
            state,
            self.modifier_state.to_modifiers(),
            self.lock_state(),
            self.device_name.clone(),
        ))
    }

    fn lock_state(&self) -> LockState {
        match self.device.get_led_state() {
            Ok(leds) => lock_state_from_leds(&leds),
            Err(e) => {
                warn!("Не удалось прочитать состояние индикаторов: {}", e);
                LockState::default()
            }
        }
    }

    fn log_open_error(device_path: &Path, e: &std::io::Error) {
        warn!("Не удалось открыть устройство {}: {}", device_path.display(), e);
        warn!("Добавьте пользователя в группу input: sudo usermod -a -G input $USER");
        warn!("и перезайдите в систему");
    }
}

fn lock_state_from_leds(leds: &AttributeSetRef<LedCode>) -> LockState {
    LockState::new(
        leds.contains(LedCode::LED_NUML),
        leds.contains(LedCode::LED_CAPSL),
        leds.contains(LedCode::LED_SCROLLL),
    )
}

#[async_trait::async_trait]
impl KeyboardListenerTrait for RealKeyboardListener {
    async fn run(self: Box<Self>) -> Result<()> {
        tokio::task::spawn_blocking(move || (*self).read_loop())
            .await
            .map_err(|e| RorError::Internal(format!("Поток чтения клавиатуры упал: {}", e)))?
    }
}
