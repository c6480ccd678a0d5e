//! Main module for ini2xml library functionality

pub mod ast;
pub mod config;
pub mod formats;
pub mod loader;
pub mod parsing;
