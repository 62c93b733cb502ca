pub mod a001_memorial;
