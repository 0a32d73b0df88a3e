use std::fmt;

/// One line typed by the player.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// 1-based index into the presented choices.
    Choose(usize),
    Year(i32),
    Submit,
    Next,
    PlayAgain,
    History,
    Help,
    Quit,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandError {
    Empty,
    InvalidYear(String),
    Unknown(String),
}

impl fmt::Display for CommandError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CommandError::Empty => write!(f, "type a command, or ? for help"),
            CommandError::InvalidYear(raw) => write!(f, "not a year: {raw}"),
            CommandError::Unknown(raw) => write!(f, "unknown command: {raw} (? for help)"),
        }
    }
}

impl std::error::Error for CommandError {}

impl Command {
    pub fn parse(line: &str) -> Result<Self, CommandError> {
        let line = line.trim();
        let (head, rest) = line
            .split_once(char::is_whitespace)
            .map_or((line, ""), |(h, r)| (h, r.trim()));

        match head {
            "" => Err(CommandError::Empty),
            "y" | "year" => {
                parse_year(rest)
                    .map(Command::Year)
                    .ok_or_else(|| CommandError::InvalidYear(rest.to_owned()))
            }
            "s" | "submit" => Ok(Command::Submit),
            "n" | "next" => Ok(Command::Next),
            "a" | "again" => Ok(Command::PlayAgain),
            "h" | "history" => Ok(Command::History),
            "?" | "help" => Ok(Command::Help),
            "q" | "quit" => Ok(Command::Quit),
            other => match other.parse::<usize>() {
                Ok(index) if index > 0 && rest.is_empty() => Ok(Command::Choose(index)),
                _ => Err(CommandError::Unknown(line.to_owned())),
            },
        }
    }
}

/// Accepts plain integers and era suffixes: `-520`, `520 BCE`, `1450 CE`.
///
/// A year with an era suffix must be unsigned.
fn parse_year(raw: &str) -> Option<i32> {
    let upper = raw.trim().to_ascii_uppercase();

    if let Some(digits) = strip_era(&upper, &["BCE", "BC"]) {
        parse_unsigned(digits)?.checked_neg()
    } else if let Some(digits) = strip_era(&upper, &["CE", "AD"]) {
        parse_unsigned(digits)
    } else {
        upper.parse().ok()
    }
}

fn strip_era<'a>(year: &'a str, suffixes: &[&str]) -> Option<&'a str> {
    suffixes.iter().find_map(|suffix| year.strip_suffix(*suffix))
}

fn parse_unsigned(digits: &str) -> Option<i32> {
    let digits = digits.trim();
    if !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    digits.parse().ok()
}

pub fn print_help() {
    println!("Commands:");
    println!("  <n>          pick choice n");
    println!("  y <year>     set your year guess (e.g. y 1450, y 520 BCE)");
    println!("  s            submit");
    println!("  n            next round");
    println!("  a            play again after a session ends");
    println!("  h            recent session history");
    println!("  q            quit");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_commands() {
        assert_eq!(Command::parse("2"), Ok(Command::Choose(2)));
        assert_eq!(Command::parse(" s "), Ok(Command::Submit));
        assert_eq!(Command::parse("y 1450"), Ok(Command::Year(1450)));
        assert_eq!(Command::parse("y -300"), Ok(Command::Year(-300)));
        assert_eq!(Command::parse("year 520 BCE"), Ok(Command::Year(-520)));
        assert_eq!(Command::parse("y 1066 ad"), Ok(Command::Year(1066)));
        assert_eq!(Command::parse("q"), Ok(Command::Quit));
    }

    #[test]
    fn rejects_bad_lines() {
        assert_eq!(Command::parse("   "), Err(CommandError::Empty));
        assert_eq!(Command::parse("0"), Err(CommandError::Unknown("0".into())));
        assert_eq!(
            Command::parse("y soon"),
            Err(CommandError::InvalidYear("soon".into()))
        );
        assert!(matches!(Command::parse("dance"), Err(CommandError::Unknown(_))));
    }

    #[test]
    fn era_years_must_be_unsigned_and_in_range() {
        assert_eq!(
            Command::parse("y -2147483648 BCE"),
            Err(CommandError::InvalidYear("-2147483648 BCE".into()))
        );
        assert_eq!(
            Command::parse("y -520 BCE"),
            Err(CommandError::InvalidYear("-520 BCE".into()))
        );
        assert_eq!(
            Command::parse("y +1066 AD"),
            Err(CommandError::InvalidYear("+1066 AD".into()))
        );
        assert_eq!(
            Command::parse("y 2147483648 BCE"),
            Err(CommandError::InvalidYear("2147483648 BCE".into()))
        );
        assert_eq!(
            Command::parse("y 2147483647 BCE"),
            Ok(Command::Year(-2_147_483_647))
        );
        assert_eq!(
            Command::parse("y -2147483648"),
            Ok(Command::Year(i32::MIN))
        );
    }
}
