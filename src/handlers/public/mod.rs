pub mod auth;
pub mod blog;
pub mod events;
pub mod ministries;
pub mod submissions;
