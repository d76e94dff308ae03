use crate::binding::LockState;
use crate::error::Result;
use crate::events::{KeyEvent, KeyState};
use crate::mappings::Chord;
use tokio::sync::mpsc::UnboundedSender;
use tokio::time::{interval, Duration};
use tracing::{debug, info};

use super::r#trait::KeyboardListenerTrait;

const DRY_RUN_PRESS_INTERVAL: Duration = Duration::from_secs(5);

/// Эмулирует нажатия всех забинженных последовательностей по кругу.
/// Аккорды одной последовательности идут подряд.
pub struct DryRunKeyboardListener {
    events: UnboundedSender<KeyEvent>,
    sequences: Vec<Vec<Chord>>,
}

impl DryRunKeyboardListener {
    pub fn new(events: UnboundedSender<KeyEvent>, sequences: Vec<Vec<Chord>>) -> Self {
        info!("Инициализация DryRunKeyboardListener");
        Self { events, sequences }
    }

    async fn run_impl(self) -> Result<()> {
        info!(
            "Dry-run режим - эмулируем {} последовательностей каждые {:?}",
            self.sequences.len(),
            DRY_RUN_PRESS_INTERVAL
        );

        let mut ticker = interval(DRY_RUN_PRESS_INTERVAL);
        // Первый тик срабатывает сразу
        ticker.tick().await;

        for sequence in self.sequences.iter().cycle() {
            ticker.tick().await;

            for chord in sequence {
                debug!("Эмулируем нажатие {}", chord);
                let event = KeyEvent::new(
                    chord.key,
                    KeyState::Pressed,
                    chord.modifiers,
                    LockState::default(),
                    "dry-run".to_string(),
                );
                if self.events.send(event).is_err() {
                    info!("Канал событий закрыт, DryRunKeyboardListener завершается");
                    return Ok(());
                }
            }
        }

        Ok(())
    }
}

#[async_trait::async_trait]
impl KeyboardListenerTrait for DryRunKeyboardListener {
    async fn run(self: Box<Self>) -> Result<()> {
        (*self).run_impl().await
    }
}
