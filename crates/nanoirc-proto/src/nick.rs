//! Nickname validation and collision suffixing.
//!
//! # Reference
//! - RFC 2812 Section 2.3.1: Message format (nickname definition)

/// Default maximum nickname length.
pub const DEFAULT_NICK_MAX_LEN: usize = 30;

/// Character appended to a nickname after each collision.
pub const NICK_COLLISION_SUFFIX: char = '_';

/// Extension trait for checking if a string is a valid IRC nickname.
pub trait NickExt {
    /// Check if this string is a valid IRC nickname per RFC 2812.
    ///
    /// ```
    /// use nanoirc_proto::NickExt;
    ///
    /// assert!("nanobot".is_valid_nick());
    /// assert!("[cool]".is_valid_nick());
    /// assert!(!"123nick".is_valid_nick());
    /// assert!(!"nick name".is_valid_nick());
    /// ```
    fn is_valid_nick(&self) -> bool {
        self.is_valid_nick_len(DEFAULT_NICK_MAX_LEN)
    }

    /// Check validity against a custom maximum length.
    fn is_valid_nick_len(&self, max_len: usize) -> bool;
}

#[inline]
fn is_special(c: char) -> bool {
    matches!(c, '[' | ']' | '\\' | '`' | '_' | '^' | '{' | '|' | '}')
}

impl NickExt for str {
    fn is_valid_nick_len(&self, max_len: usize) -> bool {
        if self.is_empty() || self.len() > max_len {
            return false;
        }

        let mut chars = self.chars();
        match chars.next() {
            Some(first) if first.is_ascii_alphabetic() || is_special(first) => {}
            _ => return false,
        }

        chars.all(|c| c.is_ascii_alphanumeric() || is_special(c) || c == '-')
    }
}

impl NickExt for String {
    fn is_valid_nick_len(&self, max_len: usize) -> bool {
        self.as_str().is_valid_nick_len(max_len)
    }
}

/// The nickname to try after `attempt` collisions: one suffix character
/// per attempt, so the sequence is deterministic.
///
/// ```
/// use nanoirc_proto::nick::collision_nick;
///
/// assert_eq!(collision_nick("nanobot", 0), "nanobot");
/// assert_eq!(collision_nick("nanobot", 2), "nanobot__");
/// ```
pub fn collision_nick(base: &str, attempt: u8) -> String {
    let mut nick = String::with_capacity(base.len() + attempt as usize);
    nick.push_str(base);
    for _ in 0..attempt {
        nick.push(NICK_COLLISION_SUFFIX);
    }
    nick
}
