mod chrome;
mod locator;
mod page;

pub use chrome::{ChromePage, Session};
pub use locator::Locator;
pub use page::{FieldState, Page, PageError, RawCell, RawInput, RawRow, SelectOption};
