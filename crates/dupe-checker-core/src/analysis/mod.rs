pub mod aliases;
pub mod matching;
pub mod relocation;
