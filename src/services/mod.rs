pub mod backends;
pub mod catalog;
pub mod editor;
pub mod notifications;

pub use backends::{ListBackend, LocalBackend, RemoteBackend};
pub use catalog::{CatalogProvider, SearchQuery};
pub use editor::{EditorStatus, ListEditor, SaveOutcome};
pub use notifications::{Notification, NotificationColor, NotificationQueue};
