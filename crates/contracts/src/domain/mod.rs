pub mod a001_memorial;
pub mod common;
