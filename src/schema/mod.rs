pub mod emotion;
pub mod line;
pub mod vocalization;
