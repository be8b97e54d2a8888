pub mod commands;
pub mod pipelines;
