//! Domain services used by the HTTP and websocket routes.
//!
//! ARCHITECTURE
//! ============
//! `board` owns the board controller and the locking helpers around it;
//! `catalog` runs the network side effects board actions ask for. Route
//! handlers stay focused on protocol translation.

pub mod board;
pub mod catalog;
