pub mod ascii;
pub mod reverse;
pub mod shingle;
pub mod synonym;

#[macro_use]
extern crate lazy_static;
