pub mod clipboard;
pub mod connect;
pub mod deletion;
pub mod editor;
pub mod history;
pub mod parenting;
pub mod shortcuts;
pub mod store;

pub use clipboard::{Clipboard, ClipboardSnapshot};
pub use connect::{Connection, connect, is_valid_connection};
pub use deletion::{DeleteOutcome, GroupDeleteMode, delete_groups, delete_selection};
pub use editor::Editor;
pub use history::{DEFAULT_HISTORY_DEPTH, History};
pub use parenting::reparent_dropped;
pub use shortcuts::{ShortcutAction, ShortcutMap};
pub use store::GraphStore;
