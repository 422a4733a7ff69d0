// Optimistic state sync shared by every board: apply locally, persist,
// roll back to the snapshot and notify when the persistence call fails.
pub mod controller;
pub mod error;
pub mod notification;
pub mod reorder;
pub mod store;

pub use controller::SyncController;
pub use error::SyncError;
pub use notification::{
    Notification, NotificationLevel, Notifier, ToastLog,
    ROLLBACK_MESSAGE, SAVED_MESSAGE,
};
pub use reorder::move_item;
pub use store::{Applied, Store, SyncPhase};
