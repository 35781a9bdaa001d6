//! Word scanning: splitting one sanitized line into `(letter, value)` pairs.
//!
//! ```ebnf
//! word        ::= [A-Z] real_number
//! real_number ::= ( '+' | '-' )?
//!                 ( [0-9]+ ( '.' [0-9]* )? | '.' [0-9]+ )
//!                 ( 'E' ( '+' | '-' )? [0-9]+ )?
//! ```
//!
//! The scanner is a plain cursor over the line's bytes. It owns no state
//! beyond that cursor, so the interpreter re-scans the same line from the
//! start for its second pass simply by constructing a fresh [`Words`].

use crate::Error;

/// One G-code word, produced lazily and never stored beyond the current line.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct Word {
    pub letter: char,
    pub value: f64,
}

/// A fused iterator over the words of a line, starting at a byte offset.
///
/// Yields `Err` once on the first malformed word and nothing afterwards.
pub(crate) struct Words<'a> {
    line: &'a str,
    cursor: usize,
    failed: bool,
}

impl<'a> Words<'a> {
    pub(crate) fn new(line: &'a str, cursor: usize) -> Self {
        Words {
            line,
            cursor,
            failed: false,
        }
    }
}

impl Iterator for Words<'_> {
    type Item = Result<Word, Error>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed {
            return None;
        }
        let letter = *self.line.as_bytes().get(self.cursor)?;
        if !letter.is_ascii_uppercase() {
            self.failed = true;
            return Some(Err(Error::ExpectedCommandLetter));
        }
        self.cursor += 1;
        Some(match parse_real_number(self.line, &mut self.cursor) {
            Ok(value) => Ok(Word {
                letter: letter as char,
                value,
            }),
            Err(e) => {
                self.failed = true;
                Err(e)
            }
        })
    }
}

/// Parses a signed real number at `*cursor`, consuming the longest valid
/// prefix and leaving the cursor on the first byte past it.
///
/// A dangling exponent marker is not consumed: `"1EX"` yields `1.0` with the
/// cursor left on the `E`, the same backtracking `strtod` performs. An empty
/// mantissa is a [`Error::BadNumberFormat`].
pub(crate) fn parse_real_number(line: &str, cursor: &mut usize) -> Result<f64, Error> {
    let bytes = line.as_bytes();
    let start = *cursor;
    let mut pos = start;

    if let Some(b'+' | b'-') = bytes.get(pos) {
        pos += 1;
    }
    let int_digits = eat_digits(bytes, &mut pos);
    let mut frac_digits = 0;
    if let Some(b'.') = bytes.get(pos) {
        pos += 1;
        frac_digits = eat_digits(bytes, &mut pos);
    }
    if int_digits == 0 && frac_digits == 0 {
        return Err(Error::BadNumberFormat);
    }
    if let Some(b'E') = bytes.get(pos) {
        let mut exp_end = pos + 1;
        if let Some(b'+' | b'-') = bytes.get(exp_end) {
            exp_end += 1;
        }
        if eat_digits(bytes, &mut exp_end) > 0 {
            pos = exp_end;
        }
    }

    // Every byte consumed so far is ASCII, so `start..pos` lies on char
    // boundaries even if the line carries stray non-ASCII bytes further on.
    let value = line[start..pos]
        .parse::<f64>()
        .map_err(|_| Error::BadNumberFormat)?;
    *cursor = pos;
    Ok(value)
}

fn eat_digits(bytes: &[u8], pos: &mut usize) -> usize {
    let start = *pos;
    while matches!(bytes.get(*pos), Some(b'0'..=b'9')) {
        *pos += 1;
    }
    *pos - start
}

#[cfg(test)]
mod test {
    use super::*;
    use proptest::prelude::*;

    fn scan(line: &str) -> Vec<Result<Word, Error>> {
        Words::new(line, 0).collect()
    }

    fn word(letter: char, value: f64) -> Result<Word, Error> {
        Ok(Word { letter, value })
    }

    #[test]
    fn splits_a_line_into_words() {
        assert_eq!(
            scan("G1X-10.5Z0.1F30"),
            vec![
                word('G', 1.0),
                word('X', -10.5),
                word('Z', 0.1),
                word('F', 30.0)
            ]
        );
    }

    #[test]
    fn accepts_leading_and_trailing_dot_forms() {
        assert_eq!(scan("X.5"), vec![word('X', 0.5)]);
        assert_eq!(scan("X5."), vec![word('X', 5.0)]);
        assert_eq!(scan("X+.25"), vec![word('X', 0.25)]);
    }

    #[test]
    fn parses_exponent_notation() {
        assert_eq!(scan("X1E2"), vec![word('X', 100.0)]);
        assert_eq!(scan("X-2.5E-1"), vec![word('X', -0.25)]);
    }

    #[test]
    fn dangling_exponent_is_left_for_the_next_word() {
        // "1E" parses as 1.0; the E then starts a word with no number.
        assert_eq!(
            scan("X1E"),
            vec![word('X', 1.0), Err(Error::BadNumberFormat)]
        );
        assert_eq!(
            scan("X1EZ2"),
            vec![word('X', 1.0), Err(Error::BadNumberFormat)]
        );
    }

    #[test]
    fn missing_number_is_bad_number_format() {
        assert_eq!(scan("G1X"), vec![word('G', 1.0), Err(Error::BadNumberFormat)]);
        assert_eq!(scan("X."), vec![Err(Error::BadNumberFormat)]);
        assert_eq!(scan("X-"), vec![Err(Error::BadNumberFormat)]);
    }

    #[test]
    fn non_letter_is_expected_command_letter() {
        assert_eq!(scan("#X1"), vec![Err(Error::ExpectedCommandLetter)]);
        assert_eq!(scan("g1"), vec![Err(Error::ExpectedCommandLetter)]);
        assert_eq!(
            scan("G1 X2"),
            vec![word('G', 1.0), Err(Error::ExpectedCommandLetter)]
        );
    }

    #[test]
    fn fuses_after_the_first_error() {
        let mut words = Words::new("X G1", 0);
        assert_eq!(words.next(), Some(Err(Error::BadNumberFormat)));
        assert_eq!(words.next(), None);
        assert_eq!(words.next(), None);
    }

    #[test]
    fn empty_line_has_no_words() {
        assert_eq!(scan(""), vec![]);
    }

    proptest! {
        #[test]
        fn never_panics_and_always_terminates(line in any::<String>()) {
            // At most one word per input byte, error included.
            let words: Vec<_> = Words::new(&line, 0).collect();
            prop_assert!(words.len() <= line.len());
        }

        #[test]
        fn round_trips_displayed_floats(value in -1.0e6..1.0e6f64) {
            let line = format!("X{}", value);
            let words: Vec<_> = Words::new(&line, 0).collect();
            prop_assert_eq!(words, vec![word('X', value)]);
        }
    }
}
