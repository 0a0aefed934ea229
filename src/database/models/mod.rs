pub mod account;
pub mod content;
pub mod submission;

pub use account::{Account, Role};
pub use content::{BlogPost, ContentStatus, Event, Ministry};
pub use submission::{ContactMessage, PrayerRequest};
