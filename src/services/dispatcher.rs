use crate::binding::{Behavior, Binding, Flag};
use crate::debug_if_enabled;
use crate::engine::{Action, Outcome, RegisterTable};
use crate::events::{KeyEvent, KeyState};
use crate::mappings::Chord;
use crate::services::desktop::Desktop;
use smallvec::SmallVec;
use tokio::sync::mpsc::UnboundedReceiver;
use tracing::{error, info, warn};

type Sequence = SmallVec<[Chord; 2]>;

/// Шорткат с разобранной последовательностью аккордов.
struct BoundAction {
    line: usize,
    sequence: Sequence,
    action: Action,
}

/// Сопоставляет нажатия с последовательностями шорткатов и вызывает движок.
pub struct Dispatcher {
    actions: Vec<BoundAction>,
    register: RegisterTable,
    desktop: Desktop,
    pending: Sequence,
}

impl Dispatcher {
    /// Биндинги с неизвестными клавишами пропускаются с предупреждением.
    pub fn new(bindings: Vec<(usize, Binding)>, defaults: &Behavior, desktop: Desktop) -> Self {
        let mut actions = Vec::with_capacity(bindings.len());

        for (line, binding) in bindings {
            let sequence: std::result::Result<Sequence, String> =
                binding.key_sequence().map(Chord::parse).collect();
            match sequence {
                Ok(sequence) => actions.push(BoundAction {
                    line,
                    sequence,
                    action: Action::new(binding, defaults),
                }),
                Err(e) => warn!("Строка {}: шорткат '{}' не назначен: {}", line, binding.shortcut, e),
            }
        }

        info!("Назначено {} шорткатов", actions.len());
        Self {
            actions,
            register: RegisterTable::new(),
            desktop,
            pending: Sequence::new(),
        }
    }

    /// Последовательности аккордов всех шорткатов без повторов, в порядке файла.
    pub fn sequences(&self) -> Vec<Vec<Chord>> {
        let mut sequences: Vec<Vec<Chord>> = Vec::new();
        for bound in &self.actions {
            if !sequences.iter().any(|s| s.as_slice() == bound.sequence.as_slice()) {
                sequences.push(bound.sequence.to_vec());
            }
        }
        sequences
    }

    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }

    /// Обработать нажатие. Возвращает исходы всех сработавших шорткатов.
    pub fn handle_key_event(&mut self, event: &KeyEvent) -> Vec<Outcome> {
        if event.state != KeyState::Pressed {
            return Vec::new();
        }

        let chord = Chord::new(event.modifiers, event.key_code);
        self.pending.push(chord);

        if !self.any_prefixed() {
            // Сбрасываем префикс и пробуем аккорд как первый
            let retry = self.pending.len() > 1;
            self.pending.clear();
            if !retry {
                return Vec::new();
            }
            self.pending.push(chord);
            if !self.any_prefixed() {
                self.pending.clear();
                return Vec::new();
            }
        }

        debug_if_enabled!("Префикс шорткатов: {:?}", self.pending);
        let outcomes = self.fire_exact(event);

        // Более длинные последовательности с тем же началом остаются достижимыми
        let longer = self.actions.iter().any(|bound| {
            bound.sequence.len() > self.pending.len() && bound.sequence.starts_with(&self.pending)
        });
        if !outcomes.is_empty() && !longer {
            self.pending.clear();
        }

        outcomes
    }

    fn any_prefixed(&self) -> bool {
        self.actions
            .iter()
            .any(|bound| bound.sequence.starts_with(&self.pending))
    }

    fn fire_exact(&mut self, event: &KeyEvent) -> Vec<Outcome> {
        let mut outcomes = Vec::new();

        for bound in self.actions.iter_mut() {
            if bound.sequence != self.pending || !bound.action.binding().locks.conforms(event.locks) {
                continue;
            }

            let isolate = bound.action.behavior().enabled(Flag::IsolateWorkspace);
            let windows = match self.desktop.windows.list_windows(isolate) {
                Ok(windows) => windows,
                Err(e) => {
                    error!("Строка {}: не удалось получить список окон: {}", bound.line, e);
                    continue;
                }
            };

            let outcome = bound
                .action
                .trigger(&self.desktop, &mut self.register, &windows, event.locks);
            info!("Строка {} ({}): {}", bound.line, bound.action.binding().shortcut, outcome);
            outcomes.push(outcome);
        }

        outcomes
    }

    /// Обрабатывать события, пока канал открыт. Вызывается из блокирующего потока.
    pub fn run_blocking(mut self, mut events: UnboundedReceiver<KeyEvent>) {
        info!("Dispatcher запущен");
        while let Some(event) = events.blocking_recv() {
            self.handle_key_event(&event);
        }
        info!("Канал событий закрыт, Dispatcher завершается");
    }
}
