//! Row-to-record mapping: field tags, scan targets and the row scanner.

pub mod record;
pub mod scanner;
pub mod tags;
pub mod target;

pub use record::*;
pub use scanner::*;
pub use tags::*;
pub use target::*;
