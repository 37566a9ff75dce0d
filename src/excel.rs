mod cell;
mod sheet;
mod workbook;

pub use cell::{Cell, CellKind};
pub use sheet::Sheet;
pub use workbook::{backup_existing, format_number, open_first_sheet, write_sheet};
