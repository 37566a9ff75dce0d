mod edited;
mod naming;
mod types;

pub use edited::EditedSheet;
pub use naming::export_filename;
pub use types::{GradeCell, GradeEntry, Gradebook, StudentRow};
