//! Main module for Agda highlighting and literate page processing

pub mod config;
pub mod error;
pub mod formats;
pub mod lexer;
pub mod literate;
pub mod processor;
