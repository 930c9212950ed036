pub mod colors;
pub mod date;
pub mod formatting;
pub mod normalize;
pub mod parse;
pub mod path;
pub mod table;
