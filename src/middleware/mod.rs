pub mod auth;
pub mod authorize;

pub use auth::{authenticate, CurrentUser};
pub use authorize::{authorize, require_admin, require_super_admin};
