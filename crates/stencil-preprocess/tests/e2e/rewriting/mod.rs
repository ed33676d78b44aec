//! Worksheet rewriting tests

mod calc_chain;
mod merge_cells;
mod rows;
mod shared_strings;
mod tables;
