use crate::config::Config;
use crate::error::Result;
use crate::events::KeyEvent;
use crate::mappings::Chord;
use std::sync::Arc;
use tokio::sync::mpsc::UnboundedSender;

/// Trait for keyboard listeners that can run in different modes
#[async_trait::async_trait]
pub trait KeyboardListenerTrait {
    /// Run the keyboard listener until the event channel closes
    async fn run(self: Box<Self>) -> Result<()>;
}

/// Factory function to create an appropriate keyboard listener based on the dry_run flag.
/// `sequences` are only used by the dry-run listener to emulate presses.
pub fn create_keyboard_listener(
    config: Arc<Config>,
    events: UnboundedSender<KeyEvent>,
    sequences: Vec<Vec<Chord>>,
    dry_run: bool,
) -> Result<Box<dyn KeyboardListenerTrait + Send>> {
    if dry_run {
        Ok(Box::new(super::dry_keyboard_listener::DryRunKeyboardListener::new(
            events, sequences,
        )))
    } else {
        Ok(Box::new(super::keyboard_listener::RealKeyboardListener::new(
            config, events,
        )?))
    }
}
