// src/lib.rs

//! Commercial register announcement crawler library.

pub mod error;
pub mod models;
pub mod output;
pub mod pipeline;
pub mod services;
pub mod storage;
pub mod utils;
