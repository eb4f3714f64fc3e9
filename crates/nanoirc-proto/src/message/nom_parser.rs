//! Nom-based IRC line parser.
//!
//! Zero-copy: every field borrows from the input line.

use nom::{
    bytes::complete::{take_until, take_while1},
    character::complete::{char, space0},
    combinator::opt,
    error::ErrorKind,
    sequence::preceded,
    IResult,
};
use smallvec::SmallVec;

/// RFC 2812 allows at most 15 parameters.
pub(crate) const MAX_PARAMS: usize = 15;

/// Tags are only sent after capability negotiation, which this client never
/// does; they are skipped but kept available.
fn parse_tags(input: &str) -> IResult<&str, &str> {
    preceded(char('@'), take_until(" "))(input)
}

fn parse_prefix(input: &str) -> IResult<&str, &str> {
    preceded(char(':'), take_while1(|c| c != ' '))(input)
}

/// `command = 1*letter / 3digit`
fn parse_command(input: &str) -> IResult<&str, &str> {
    let (rest, cmd) = take_while1(|c: char| c.is_ascii_alphanumeric())(input)?;

    let is_word = cmd.bytes().all(|b| b.is_ascii_alphabetic());
    let is_numeric = cmd.len() == 3 && cmd.bytes().all(|b| b.is_ascii_digit());

    if is_word || is_numeric {
        Ok((rest, cmd))
    } else {
        Err(nom::Err::Error(nom::error::Error::new(
            input,
            ErrorKind::AlphaNumeric,
        )))
    }
}

/// Split the parameter section. Runs of spaces separate parameters; a
/// parameter starting with `:` is the trailing one and runs to end of line.
fn parse_params(input: &str) -> (&str, SmallVec<[&str; MAX_PARAMS]>) {
    let mut params: SmallVec<[&str; MAX_PARAMS]> = SmallVec::new();
    let mut rest = input;

    while rest.starts_with(' ') {
        if params.len() >= MAX_PARAMS {
            break;
        }

        rest = rest.trim_start_matches(' ');
        if rest.is_empty() || rest.starts_with(['\r', '\n']) {
            break;
        }

        if let Some(trailing) = rest.strip_prefix(':') {
            let end = trailing.find(['\r', '\n']).unwrap_or(trailing.len());
            params.push(&trailing[..end]);
            rest = &trailing[end..];
            break;
        }

        let end = rest.find([' ', '\r', '\n']).unwrap_or(rest.len());
        params.push(&rest[..end]);
        rest = &rest[end..];
    }

    (rest, params)
}

/// `[@tags] [:prefix] <command> [params...] [:trailing]`
pub(crate) fn parse_message(input: &str) -> IResult<&str, ParsedMessage<'_>> {
    let (input, tags) = opt(parse_tags)(input)?;
    let (input, _) = space0(input)?;
    let (input, prefix) = opt(parse_prefix)(input)?;
    let (input, _) = space0(input)?;
    let (input, command) = parse_command(input)?;
    let (rest, params) = parse_params(input);

    Ok((
        rest,
        ParsedMessage {
            tags,
            prefix,
            command,
            params,
        },
    ))
}

/// Intermediate representation produced by the nom parser.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct ParsedMessage<'a> {
    pub tags: Option<&'a str>,
    pub prefix: Option<&'a str>,
    pub command: &'a str,
    pub params: SmallVec<[&'a str; MAX_PARAMS]>,
}

impl<'a> ParsedMessage<'a> {
    /// Parse a line, reporting the byte offset of any failure.
    pub fn parse(input: &'a str) -> Result<Self, (usize, ErrorKind)> {
        match parse_message(input) {
            Ok((_rest, msg)) => Ok(msg),
            Err(nom::Err::Error(e)) | Err(nom::Err::Failure(e)) => {
                Err((input.len() - e.input.len(), e.code))
            }
            Err(nom::Err::Incomplete(_)) => Err((input.len(), ErrorKind::Eof)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_simple_command() {
        let msg = ParsedMessage::parse("PING").unwrap();
        assert_eq!(msg.command, "PING");
        assert!(msg.prefix.is_none());
        assert!(msg.params.is_empty());
    }

    #[test]
    fn test_parse_with_prefix_and_trailing() {
        let msg = ParsedMessage::parse(":nick!user@host PRIVMSG #channel :Hello, world!").unwrap();
        assert_eq!(msg.prefix, Some("nick!user@host"));
        assert_eq!(msg.command, "PRIVMSG");
        assert_eq!(msg.params.as_slice(), &["#channel", "Hello, world!"]);
    }

    #[test]
    fn test_parse_skips_tags() {
        let msg = ParsedMessage::parse("@time=2023-01-01T00:00:00Z :nick PRIVMSG #ch :Hi").unwrap();
        assert_eq!(msg.tags, Some("time=2023-01-01T00:00:00Z"));
        assert_eq!(msg.prefix, Some("nick"));
        assert_eq!(msg.params.as_slice(), &["#ch", "Hi"]);
    }

    #[test]
    fn test_parse_numeric() {
        let msg = ParsedMessage::parse(":server 433 * nanobot :Nickname is already in use").unwrap();
        assert_eq!(msg.command, "433");
        assert_eq!(
            msg.params.as_slice(),
            &["*", "nanobot", "Nickname is already in use"]
        );
    }

    #[test]
    fn test_parse_collapses_spaces_and_empty_trailing() {
        let msg = ParsedMessage::parse("USER  guest   0 * :").unwrap();
        assert_eq!(msg.params.as_slice(), &["guest", "0", "*", ""]);
    }

    #[test]
    fn test_parse_command_validation() {
        assert!(ParsedMessage::parse("123").is_ok());
        assert!(ParsedMessage::parse("PING123").is_err());
        assert!(ParsedMessage::parse("12").is_err());
        assert!(ParsedMessage::parse("1234").is_err());
        assert_eq!(ParsedMessage::parse(":prefix-only").unwrap_err().0, 12);
    }

    #[test]
    fn test_parse_params_limit() {
        let raw = "CMD p1 p2 p3 p4 p5 p6 p7 p8 p9 p10 p11 p12 p13 p14 p15 p16";
        let msg = ParsedMessage::parse(raw).unwrap();
        assert_eq!(msg.params.len(), MAX_PARAMS);
        assert_eq!(msg.params[14], "p15");
    }
}
