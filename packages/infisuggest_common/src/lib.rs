pub mod debug;
pub mod dictionary;
pub mod index;
pub mod stats;
pub mod tokenize;
