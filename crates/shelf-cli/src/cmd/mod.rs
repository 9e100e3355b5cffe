pub mod add;
pub mod completions;
pub mod config;
pub mod genre;
pub mod list;
pub mod lookup;
pub mod remove;
pub mod search;
pub mod show;
