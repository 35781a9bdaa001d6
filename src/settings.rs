//! `$` configuration lines: the bridge to the settings store.
//!
//! These lines never reach the G-code passes. A bare `$` dumps every numbered
//! parameter; `$<index>=<value>` with nothing trailing stores one. Anything
//! else is an unsupported statement.

use log::debug;

use crate::machine::SettingsStore;
use crate::words::parse_real_number;
use crate::Error;

#[derive(Debug, PartialEq)]
enum SettingsCommand {
    Dump,
    Store { index: u32, value: f64 },
}

/// Routes one `$`-prefixed line (the `$` included) to the settings store.
pub(crate) fn execute<P: SettingsStore>(store: &mut P, line: &str) -> Result<(), Error> {
    match parse(&line[1..])? {
        SettingsCommand::Dump => {
            debug!("dumping settings");
            store.dump();
        }
        SettingsCommand::Store { index, value } => {
            debug!("storing setting ${} = {}", index, value);
            store.store(index, value);
        }
    }
    Ok(())
}

fn parse(rest: &str) -> Result<SettingsCommand, Error> {
    if rest.is_empty() {
        return Ok(SettingsCommand::Dump);
    }
    let mut cursor = 0;
    let index = parse_index(rest.as_bytes(), &mut cursor)?;
    if rest.as_bytes().get(cursor) != Some(&b'=') {
        return Err(Error::UnsupportedStatement);
    }
    cursor += 1;
    let value = parse_real_number(rest, &mut cursor).map_err(|_| Error::UnsupportedStatement)?;
    if cursor != rest.len() {
        return Err(Error::UnsupportedStatement);
    }
    Ok(SettingsCommand::Store { index, value })
}

fn parse_index(bytes: &[u8], cursor: &mut usize) -> Result<u32, Error> {
    let start = *cursor;
    let mut index: u32 = 0;
    while let Some(&b) = bytes.get(*cursor) {
        if !b.is_ascii_digit() {
            break;
        }
        index = index
            .saturating_mul(10)
            .saturating_add(u32::from(b - b'0'));
        *cursor += 1;
    }
    if *cursor == start {
        return Err(Error::UnsupportedStatement);
    }
    Ok(index)
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn bare_dollar_is_a_dump() {
        assert_eq!(parse(""), Ok(SettingsCommand::Dump));
    }

    #[test]
    fn index_equals_value_is_a_store() {
        assert_eq!(
            parse("4=374.3"),
            Ok(SettingsCommand::Store {
                index: 4,
                value: 374.3
            })
        );
        assert_eq!(
            parse("10=-0.5"),
            Ok(SettingsCommand::Store {
                index: 10,
                value: -0.5
            })
        );
    }

    #[test]
    fn any_grammar_deviation_is_unsupported() {
        for line in ["X=1", "=1", "5", "5=", "5=X", "5=1X", "5=1=2", "-5=1", "5.0=1"] {
            assert_eq!(parse(line), Err(Error::UnsupportedStatement), "{:?}", line);
        }
    }
}
