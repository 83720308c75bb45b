//! Cell-related types and utilities
//!
//! This module contains:
//! - [`StreamCell`] - A value plus an optional style, as passed to a row write
//! - [`CellValue`] - The typed value of a cell
//! - [`CellAddress`] - A cell's location (e.g., "A1")
//! - [`DateSystem`] - Serial date conversion

mod address;
mod date;
mod value;

pub use address::{CellAddress, CellRange};
pub use date::DateSystem;
pub use value::{CellType, CellValue, StreamCell};
