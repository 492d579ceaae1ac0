// Notifier plugin implementations
pub mod console;
pub mod email;

pub use console::ConsoleNotifier;
pub use email::EmailNotifier;
