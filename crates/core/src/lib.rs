#![deny(rust_2018_idioms)]

//! Join and leave broadcasts, config reloading and the leave message patch
//! command, built on the `welcometale_text` formatter.

pub mod commands;
pub mod config;
pub mod events;
pub mod messages;
pub mod update;
