pub mod auth;
pub mod extract;
pub mod filters;
pub mod gate;
pub mod loader;
pub mod settle;
pub mod writer;

pub use auth::{ask_credentials, open_grade_registry, open_login, submit_credentials, Credentials};
pub use extract::{build_gradebook, export_gradebook, extract_gradebook};
pub use filters::{configure_filters, Selection};
pub use gate::await_edit;
pub use loader::{load_edited, normalize_sheet, LoadStats};
pub use settle::{settle, SettleOutcome};
pub use writer::{write_back, WriteReport};
