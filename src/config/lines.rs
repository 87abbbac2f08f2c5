//! Line parsing internals
// (c) 2024 Ross Younger

use std::str::FromStr as _;

use super::{ConfigError, Keyword};

#[derive(Debug, PartialEq)]
/// A parsed line we read from an ssh config file
pub(super) enum Line {
    Empty,
    Directive {
        keyword: Keyword,
        args: Vec<String>,
    },
    /// A keyword we don't handle. Its arguments are not even tokenized.
    Unknown {
        keyword: String,
    },
}

///////////////////////////////////////////////////////////////////////////////////////

/// Splits a line into its keyword and the remainder.
///
/// The keyword is a run of word characters, delimited from its arguments by whitespace (`Key Value`)
/// or by an equals sign with optional whitespace either side (`Key=Value`, `Key = Value`).
/// Returns None if the line has neither shape.
fn split_keyword(line: &str) -> Option<(&str, &str)> {
    let end = line
        .find(|c: char| !(c.is_ascii_alphanumeric() || c == '_'))
        .unwrap_or(line.len());
    if end == 0 {
        return None;
    }
    let (keyword, rest) = line.split_at(end);
    if rest.is_empty() {
        return Some((keyword, rest));
    }
    let trimmed = rest.trim_start();
    if let Some(value) = trimmed.strip_prefix('=') {
        Some((keyword, value.trim_start()))
    } else if trimmed.len() < rest.len() {
        Some((keyword, trimmed))
    } else {
        None
    }
}

/// Classifies a single line of input.
pub(super) fn parse_line(line: &str) -> Result<Line, ConfigError> {
    let line = line.trim();
    if line.is_empty() || line.starts_with('#') {
        return Ok(Line::Empty);
    }
    let (keyword, rest) =
        split_keyword(line).ok_or_else(|| ConfigError::syntax("Invalid syntax"))?;
    Ok(match Keyword::from_str(keyword) {
        Ok(keyword) => Line::Directive {
            keyword,
            args: split_args(rest)?,
        },
        Err(_) => Line::Unknown {
            keyword: keyword.to_lowercase(),
        },
    })
}

/// Splits a string into a list of arguments.
///
/// Arguments are delimited by whitespace. An argument may be enclosed in double quotes,
/// in which case it may contain whitespace and the escapes `\"` and `\\`.
/// A quote may only appear at the start of an argument, and a closing quote must be
/// followed by whitespace or the end of input.
pub(super) fn split_args(input: &str) -> Result<Vec<String>, ConfigError> {
    let mut output = Vec::<String>::new();
    let mut rest = input.trim();
    while !rest.is_empty() {
        let (token, remainder) = match rest.strip_prefix('"') {
            Some(quoted) => take_quoted(quoted)?,
            None => take_bare(rest)?,
        };
        output.push(token);
        rest = remainder.trim_start();
    }
    Ok(output)
}

/// Reads a quoted token; `input` starts just after the opening quote
fn take_quoted(input: &str) -> Result<(String, &str), ConfigError> {
    let mut token = String::new();
    let mut chars = input.char_indices().peekable();
    while let Some((i, ch)) = chars.next() {
        match ch {
            '\\' => match chars.next_if(|(_, c)| matches!(c, '"' | '\\')) {
                Some((_, escaped)) => token.push(escaped),
                None => token.push(ch), // not an escape we recognise
            },
            '"' => {
                let rest = &input[i + 1..];
                if rest.starts_with(|c: char| !c.is_whitespace()) {
                    return Err(ConfigError::syntax(
                        "End quote should be followed by whitespace/nothing",
                    ));
                }
                return Ok((token, rest));
            }
            c => token.push(c),
        }
    }
    Err(ConfigError::syntax("Unfinished quote"))
}

fn take_bare(input: &str) -> Result<(String, &str), ConfigError> {
    let end = input.find(char::is_whitespace).unwrap_or(input.len());
    let (token, rest) = input.split_at(end);
    if token.contains('"') {
        return Err(ConfigError::syntax(
            "Begin quote should be after whitespace/nothing",
        ));
    }
    Ok((token.to_owned(), rest))
}

///////////////////////////////////////////////////////////////////////////////////////

#[cfg(test)]
mod test {
    use anyhow::{anyhow, Context, Result};
    use assertables::{assert_contains_as_result, assert_eq_as_result};

    use super::{parse_line, split_args, split_keyword, Line};
    use crate::config::Keyword;

    #[test]
    fn arg_splitting() -> Result<()> {
        for (input, expected) in [
            ("", vec![]),
            ("a", vec!["a"]),
            ("   a    b   ", vec!["a", "b"]),
            ("a\tb", vec!["a", "b"]),
            (r#""a b" c"#, vec!["a b", "c"]),
            (r#"c "a b""#, vec!["c", "a b"]),
            (r#""22""#, vec!["22"]),
            (r#""""#, vec![""]),
            (r#""a \"b\" \\c""#, vec![r#"a "b" \c"#]),
            (r#""C:\Users\me""#, vec![r"C:\Users\me"]),
            (r"C:\Users\me\.ssh\id", vec![r"C:\Users\me\.ssh\id"]),
        ] {
            let msg = || format!("input \"{input}\" failed");
            assert_eq_as_result!(split_args(input).with_context(msg)?, expected)
                .map_err(|e| anyhow!(e))
                .with_context(msg)?;
        }
        for (input, expected_msg) in [
            ("a\"b", "Begin quote"),
            ("aaa\"", "Begin quote"),
            ("\"abc", "Unfinished quote"),
            ("\"", "Unfinished quote"),
            ("\"ab\"c", "End quote"),
            ("x \"a\\\"", "Unfinished quote"),
        ] {
            let err = split_args(input).unwrap_err();
            assert_contains_as_result!(err.to_string(), expected_msg)
                .map_err(|e| anyhow!(e))
                .with_context(|| format!("input \"{input}\" failed"))?;
        }
        Ok(())
    }

    #[test]
    fn keyword_splitting() {
        for (input, expected) in [
            ("Host", Some(("Host", ""))),
            ("Host foo", Some(("Host", "foo"))),
            ("Host\tfoo bar", Some(("Host", "foo bar"))),
            ("Host=foo", Some(("Host", "foo"))),
            ("Host = foo", Some(("Host", "foo"))),
            ("Host  =  foo", Some(("Host", "foo"))),
            ("Host=", Some(("Host", ""))),
            ("Some_Thing2 x", Some(("Some_Thing2", "x"))),
            ("-Host foo", None),
            ("Host-foo bar", None),
            ("=foo", None),
        ] {
            assert_eq!(split_keyword(input), expected, "input \"{input}\"");
        }
    }

    macro_rules! make_vec {
        ($v:expr) => {
            $v.into_iter().map(|s: &str| s.to_owned()).collect()
        };
    }

    fn directive_(keyword: Keyword, args: Vec<&str>) -> Line {
        Line::Directive {
            keyword,
            args: make_vec!(args),
        }
    }

    #[test]
    fn line_parsing() -> Result<()> {
        for (input, expected) in [
            ("", Line::Empty),
            ("   ", Line::Empty),
            (" # foo", Line::Empty),
            ("#Host foo", Line::Empty),
            ("Host a b", directive_(Keyword::Host, vec!["a", "b"])),
            ("hOsT=a", directive_(Keyword::Host, vec!["a"])),
            ("HOSTNAME x.y", directive_(Keyword::Hostname, vec!["x.y"])),
            ("Match all", directive_(Keyword::Match, vec!["all"])),
            ("iNcluDe c d", directive_(Keyword::Include, vec!["c", "d"])),
            (
                "IdentityFile \"my key\"",
                directive_(Keyword::IdentityFile, vec!["my key"]),
            ),
            ("Port", directive_(Keyword::Port, vec![])),
            (
                "ForwardAgent yes",
                Line::Unknown {
                    keyword: "forwardagent".into(),
                },
            ),
            // unknown keywords are not tokenized, so bad quoting there is not an error
            (
                "ProxyCommand a\"b",
                Line::Unknown {
                    keyword: "proxycommand".into(),
                },
            ),
        ] {
            let msg = || format!("input \"{input}\" failed");
            assert_eq_as_result!(parse_line(input).with_context(msg)?, expected)
                .map_err(|e| anyhow!(e))
                .with_context(msg)?;
        }
        for (input, expected_msg) in [
            ("User \"bob", "Unfinished quote"),
            ("-x", "Invalid syntax"),
            ("Foo-bar x", "Invalid syntax"),
        ] {
            let err = parse_line(input).unwrap_err();
            assert_contains_as_result!(err.to_string(), expected_msg)
                .map_err(|e| anyhow!(e))
                .with_context(|| format!("input \"{input}\" failed"))?;
        }
        Ok(())
    }
}
