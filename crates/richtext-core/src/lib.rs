mod action;
mod attributed_string;
mod attributes;
mod buffer;
mod config;
mod context;
mod coordinator;
mod error;
mod format;
mod image;
mod insertion;
mod paragraph;
mod range;
mod reader;
mod rope_ext;
mod runs;
mod snapshot;
mod style;
mod undo;
mod view;
mod writer;

pub use crate::action::*;
pub use crate::attributed_string::*;
pub use crate::attributes::*;
pub use crate::buffer::*;
pub use crate::config::*;
pub use crate::context::*;
pub use crate::coordinator::*;
pub use crate::error::*;
pub use crate::format::*;
pub use crate::image::*;
pub use crate::insertion::*;
pub use crate::paragraph::*;
pub use crate::range::*;
pub use crate::reader::*;
pub use crate::rope_ext::*;
pub use crate::runs::AttributeRun;
pub use crate::snapshot::*;
pub use crate::style::*;
pub use crate::undo::*;
pub use crate::view::*;
pub use crate::writer::*;
