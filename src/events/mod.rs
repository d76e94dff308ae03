pub mod keyboard;
pub mod window;

pub use keyboard::{KeyCode, KeyEvent, KeyState, Modifiers};
pub use window::{Window, WindowGeometry, WindowId};
