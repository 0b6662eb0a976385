#![forbid(rust_2018_idioms)]
#![warn(clippy::all, clippy::pedantic)]
#![allow(
    clippy::missing_errors_doc,
    clippy::module_name_repetitions,
    forbidden_lint_groups
)]

#[macro_use]
extern crate tracing;

pub mod consts;
pub mod event;
pub mod manager;
pub mod permission;
pub mod resolver;
pub mod set;
pub mod sniff;

pub use self::{
    manager::EmojiManager,
    permission::{Actor, Permission},
    resolver::ResolvedEmoji,
    set::EmojiSet,
    sniff::{ImageFormat, ImageInput, ValidatedImage},
};
