//! bookmind: reorganize browser bookmark exports into a bounded topical tree
//! and export it as a FreeMind mind map.

pub mod application;
pub mod cli;
pub mod config;
pub mod domain;
pub mod exitcode;
pub mod infrastructure;
pub mod util;
