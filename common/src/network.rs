pub mod interface;
pub mod range;
pub mod result;
pub mod target;
