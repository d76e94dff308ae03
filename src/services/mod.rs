pub mod desktop;
pub mod dispatcher;
pub mod keyboard_listener;

pub use desktop::create_desktop;
pub use dispatcher::Dispatcher;
pub use keyboard_listener::create_keyboard_listener;
