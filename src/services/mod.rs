pub mod content;
pub mod session;

pub use content::{BrowseSection, ContentService, HomeContent};
pub use session::{AuthState, SessionService, StaticSession};
