#![allow(dead_code)]

pub mod criterion_config;
pub mod matrix;
