use std::fmt::{Display, Formatter, Result as FmtResult};

use super::Message;

impl Display for Message {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        if let Some(prefix) = &self.prefix {
            write!(f, ":{prefix} ")?;
        }
        write!(f, "{}", self.command)
    }
}
