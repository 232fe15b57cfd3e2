// src/lib.rs

pub mod cli;
pub mod config;
pub mod data_structures;
pub mod error;
pub mod format;
pub mod gpu;
pub mod history;
pub mod process_handler;
pub mod process_list;
pub mod sensors;
pub mod ui;
