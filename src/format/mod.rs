// Plan table rendering: alignment, compact mode, colors
pub mod highlight;
mod table;

pub use table::TableFormatter;
