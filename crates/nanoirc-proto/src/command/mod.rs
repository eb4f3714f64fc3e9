//! IRC commands: the owned outbound model and the borrowed inbound view.

mod parse;
mod serialize;
mod types;
pub(crate) mod util;

pub use self::types::{Command, CommandRef};
