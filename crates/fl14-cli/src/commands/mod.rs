pub mod config;
pub mod parse;
pub mod run;
pub mod show;
