pub mod merge;
pub mod providers;
pub mod roots;
