pub mod sheet;
pub mod table;
