//! Wire-format helpers shared by the serializers.

use std::fmt::{self, Write};

use crate::error::MessageParseError;

/// Whether the final parameter must be sent with a `:` prefix.
#[inline]
pub fn needs_colon_prefix(s: &str) -> bool {
    s.is_empty() || s.contains(' ') || s.starts_with(':')
}

/// Reject parameters that would inject a line break or NUL.
pub fn check_param(param: &str) -> Result<(), MessageParseError> {
    if param.bytes().any(|b| b == b'\r' || b == b'\n' || b == 0) {
        return Err(MessageParseError::InvalidArgument(format!(
            "{param:?} contains a line break or NUL"
        )));
    }
    Ok(())
}

/// Reject a non-final parameter that could not be parsed back as one.
pub fn check_middle_param(param: &str) -> Result<(), MessageParseError> {
    check_param(param)?;
    if needs_colon_prefix(param) {
        return Err(MessageParseError::InvalidArgument(format!(
            "{param:?} cannot be a middle parameter"
        )));
    }
    Ok(())
}

/// Write `cmd` and its arguments, colon-prefixing the last one only when
/// needed.
pub fn write_cmd(f: &mut fmt::Formatter<'_>, cmd: &str, args: &[&str]) -> fmt::Result {
    f.write_str(cmd)?;
    let Some((trailing, middle)) = args.split_last() else {
        return Ok(());
    };
    for param in middle {
        f.write_char(' ')?;
        f.write_str(param)?;
    }
    f.write_char(' ')?;
    if needs_colon_prefix(trailing) {
        f.write_char(':')?;
    }
    f.write_str(trailing)
}

/// Write `cmd` with an always colon-prefixed (freeform) last argument.
pub fn write_cmd_freeform(f: &mut fmt::Formatter<'_>, cmd: &str, args: &[&str]) -> fmt::Result {
    f.write_str(cmd)?;
    let Some((trailing, middle)) = args.split_last() else {
        return Ok(());
    };
    for param in middle {
        f.write_char(' ')?;
        f.write_str(param)?;
    }
    f.write_str(" :")?;
    f.write_str(trailing)
}
