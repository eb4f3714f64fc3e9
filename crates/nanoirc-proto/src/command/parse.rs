//! Building owned commands from a name and argument list.

use super::types::Command;
use crate::error::MessageParseError;

fn require(args: &[&str], expected: usize) -> Result<(), MessageParseError> {
    if args.len() < expected {
        Err(MessageParseError::NotEnoughArguments {
            expected,
            got: args.len(),
        })
    } else {
        Ok(())
    }
}

fn owned(args: Vec<&str>) -> Vec<String> {
    args.into_iter().map(str::to_owned).collect()
}

impl Command {
    /// Parse a command from its name and arguments.
    ///
    /// Names are matched case-insensitively. Unknown commands and numerics
    /// become [`Command::Raw`]; known commands with too few arguments are an
    /// error.
    #[must_use = "command parsing result should be handled"]
    pub fn new(cmd: &str, args: Vec<&str>) -> Result<Command, MessageParseError> {
        if cmd.is_empty() {
            return Err(MessageParseError::InvalidCommand);
        }

        let upper = cmd.to_ascii_uppercase();
        let command = match upper.as_str() {
            "PASS" => {
                require(&args, 1)?;
                Command::PASS(args[0].to_owned())
            }
            "NICK" => {
                require(&args, 1)?;
                Command::NICK(args[0].to_owned())
            }
            "USER" => {
                require(&args, 4)?;
                Command::USER(args[0].to_owned(), args[1].to_owned(), args[3].to_owned())
            }
            "JOIN" => {
                require(&args, 1)?;
                Command::JOIN(args[0].to_owned())
            }
            "PART" => {
                require(&args, 1)?;
                Command::PART(args[0].to_owned(), args.get(1).map(|s| (*s).to_owned()))
            }
            "QUIT" => Command::QUIT(args.first().map(|s| (*s).to_owned())),
            "PING" => {
                require(&args, 1)?;
                Command::PING(args[0].to_owned())
            }
            "PONG" => {
                require(&args, 1)?;
                // Servers answer `PONG <server> :<token>`; keep the token.
                Command::PONG(args[args.len() - 1].to_owned())
            }
            "PRIVMSG" => {
                require(&args, 2)?;
                Command::PRIVMSG(args[0].to_owned(), args[1].to_owned())
            }
            "NOTICE" => {
                require(&args, 2)?;
                Command::NOTICE(args[0].to_owned(), args[1].to_owned())
            }
            "KICK" => {
                require(&args, 2)?;
                Command::KICK(
                    args[0].to_owned(),
                    args[1].to_owned(),
                    args.get(2).map(|s| (*s).to_owned()),
                )
            }
            "ERROR" => Command::ERROR(args.first().copied().unwrap_or_default().to_owned()),
            _ => Command::Raw(cmd.to_owned(), owned(args)),
        };

        Ok(command)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_commands() {
        assert_eq!(
            Command::new("privmsg", vec!["#a", "hi there"]).unwrap(),
            Command::PRIVMSG("#a".into(), "hi there".into())
        );
        assert_eq!(
            Command::new("USER", vec!["bot", "8", "*", "Nano Bot"]).unwrap(),
            Command::USER("bot".into(), "8".into(), "Nano Bot".into())
        );
        assert_eq!(
            Command::new("PONG", vec!["irc.example.net", "abc"]).unwrap(),
            Command::PONG("abc".into())
        );
    }

    #[test]
    fn test_missing_arguments() {
        assert_eq!(
            Command::new("PRIVMSG", vec!["#a"]),
            Err(MessageParseError::NotEnoughArguments {
                expected: 2,
                got: 1
            })
        );
        assert_eq!(Command::new("", vec![]), Err(MessageParseError::InvalidCommand));
    }

    #[test]
    fn test_numeric_is_raw() {
        assert_eq!(
            Command::new("433", vec!["*", "nanobot", "Nickname is already in use"]).unwrap(),
            Command::Raw(
                "433".into(),
                vec![
                    "*".into(),
                    "nanobot".into(),
                    "Nickname is already in use".into()
                ]
            )
        );
    }
}
