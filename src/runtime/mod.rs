pub mod cursor;
pub mod input;
pub mod ticker;
