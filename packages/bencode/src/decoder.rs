//! Strict bencode decoder.
//!
//! The tracker itself only produces bencode; decoding is needed by the test
//! suites and by tooling that inspects responses. The decoder is therefore
//! strict rather than lenient: every deviation from the canonical form is an
//! error with the byte offset it was found at.
use std::collections::BTreeMap;

use crate::{Bencode, Error};

/// Decodes one complete value, requiring the whole input to be consumed.
///
/// # Errors
///
/// Will return an [`Error`] naming the malformation and its byte offset.
pub fn decode(bytes: &[u8]) -> Result<Bencode, Error> {
    let mut parser = Parser { bytes, pos: 0 };
    let value = parser.parse_value()?;

    if parser.pos != parser.bytes.len() {
        return Err(Error::TrailingData { pos: parser.pos });
    }

    Ok(value)
}

struct Parser<'a> {
    bytes: &'a [u8],
    pos: usize,
}

impl Parser<'_> {
    fn peek(&self) -> Option<u8> {
        self.bytes.get(self.pos).copied()
    }

    fn parse_value(&mut self) -> Result<Bencode, Error> {
        match self.peek() {
            None => Err(Error::Truncated { pos: self.pos }),
            Some(b'i') => self.parse_int(),
            Some(b'0'..=b'9') => self.parse_bytes(),
            Some(b'l') => self.parse_list(),
            Some(b'd') => self.parse_dict(),
            Some(_) => Err(Error::UnexpectedByte { pos: self.pos }),
        }
    }

    fn parse_int(&mut self) -> Result<Bencode, Error> {
        let start = self.pos;
        self.pos += 1; // consume 'i'

        let end = match self.bytes[self.pos..].iter().position(|&byte| byte == b'e') {
            Some(offset) => self.pos + offset,
            None => return Err(Error::Truncated { pos: self.bytes.len() }),
        };

        let digits = &self.bytes[self.pos..end];
        let value = parse_canonical_int(digits).ok_or(Error::InvalidInteger { pos: start })?;

        self.pos = end + 1;
        Ok(Bencode::Int(value))
    }

    fn parse_bytes(&mut self) -> Result<Bencode, Error> {
        let start = self.pos;

        let colon = match self.bytes[self.pos..].iter().position(|&byte| byte == b':') {
            Some(offset) => self.pos + offset,
            None => return Err(Error::InvalidLengthPrefix { pos: start }),
        };

        let len = parse_length_prefix(&self.bytes[self.pos..colon]).ok_or(Error::InvalidLengthPrefix { pos: start })?;

        let data_start = colon + 1;
        let data_end = data_start.checked_add(len).ok_or(Error::InvalidLengthPrefix { pos: start })?;

        if data_end > self.bytes.len() {
            return Err(Error::Truncated { pos: self.bytes.len() });
        }

        self.pos = data_end;
        Ok(Bencode::Bytes(self.bytes[data_start..data_end].to_vec()))
    }

    fn parse_list(&mut self) -> Result<Bencode, Error> {
        let start = self.pos;
        self.pos += 1; // consume 'l'

        let mut items = Vec::new();

        loop {
            match self.peek() {
                None => return Err(Error::UnterminatedContainer { pos: start }),
                Some(b'e') => {
                    self.pos += 1;
                    return Ok(Bencode::List(items));
                }
                Some(_) => items.push(self.parse_value()?),
            }
        }
    }

    fn parse_dict(&mut self) -> Result<Bencode, Error> {
        let start = self.pos;
        self.pos += 1; // consume 'd'

        let mut entries = BTreeMap::new();
        let mut last_key: Option<Vec<u8>> = None;

        loop {
            match self.peek() {
                None => return Err(Error::UnterminatedContainer { pos: start }),
                Some(b'e') => {
                    self.pos += 1;
                    return Ok(Bencode::Dict(entries));
                }
                Some(_) => {
                    let key_pos = self.pos;
                    let key = match self.parse_value()? {
                        Bencode::Bytes(key) => key,
                        _ => return Err(Error::InvalidDictKey { pos: key_pos }),
                    };

                    // Canonical form: strictly ascending keys, no duplicates.
                    if let Some(previous) = &last_key {
                        if *previous >= key {
                            return Err(Error::InvalidDictKey { pos: key_pos });
                        }
                    }

                    let value = self.parse_value()?;
                    last_key = Some(key.clone());
                    entries.insert(key, value);
                }
            }
        }
    }
}

/// Parses `i…e` digits: an optional sign followed by canonical decimal.
/// `-0` and leading zeros are rejected.
fn parse_canonical_int(digits: &[u8]) -> Option<i64> {
    let (negative, digits) = match digits.split_first()? {
        (b'-', rest) => (true, rest),
        _ => (false, digits),
    };

    if digits.is_empty() || !digits.iter().all(u8::is_ascii_digit) {
        return None;
    }
    if digits.len() > 1 && digits[0] == b'0' {
        return None;
    }
    if negative && digits == b"0" {
        return None;
    }

    let text = std::str::from_utf8(digits).ok()?;

    if negative {
        format!("-{text}").parse::<i64>().ok()
    } else {
        text.parse::<i64>().ok()
    }
}

/// Parses a byte string length prefix: canonical decimal, no sign, no
/// leading zeros.
fn parse_length_prefix(digits: &[u8]) -> Option<usize> {
    if digits.is_empty() || !digits.iter().all(u8::is_ascii_digit) {
        return None;
    }
    if digits.len() > 1 && digits[0] == b'0' {
        return None;
    }

    std::str::from_utf8(digits).ok()?.parse::<usize>().ok()
}

#[cfg(test)]
mod tests {
    use crate::{ben_bytes, ben_int, ben_list, ben_map, Bencode, Error};

    #[test]
    fn it_should_decode_each_of_the_four_types() {
        assert_eq!(Bencode::decode(b"i42e").unwrap(), ben_int!(42));
        assert_eq!(Bencode::decode(b"i-42e").unwrap(), ben_int!(-42));
        assert_eq!(Bencode::decode(b"4:spam").unwrap(), ben_bytes!("spam"));
        assert_eq!(Bencode::decode(b"le").unwrap(), ben_list!());
        assert_eq!(
            Bencode::decode(b"d3:foo3:bar5:helloi52ee").unwrap(),
            ben_map! {"foo" => ben_bytes!("bar"), "hello" => ben_int!(52)}
        );
    }

    #[test]
    fn it_should_reject_non_canonical_integers() {
        assert_eq!(Bencode::decode(b"i-0e").unwrap_err(), Error::InvalidInteger { pos: 0 });
        assert_eq!(Bencode::decode(b"i03e").unwrap_err(), Error::InvalidInteger { pos: 0 });
        assert_eq!(Bencode::decode(b"ie").unwrap_err(), Error::InvalidInteger { pos: 0 });
        assert_eq!(Bencode::decode(b"i4.2e").unwrap_err(), Error::InvalidInteger { pos: 0 });
    }

    #[test]
    fn it_should_reject_malformed_length_prefixes() {
        assert_eq!(Bencode::decode(b"4spam").unwrap_err(), Error::InvalidLengthPrefix { pos: 0 });
        assert_eq!(Bencode::decode(b"04:spam").unwrap_err(), Error::InvalidLengthPrefix { pos: 0 });
    }

    #[test]
    fn it_should_reject_truncated_payloads() {
        assert_eq!(Bencode::decode(b"5:spam").unwrap_err(), Error::Truncated { pos: 6 });
        assert_eq!(Bencode::decode(b"i42").unwrap_err(), Error::Truncated { pos: 3 });
        assert_eq!(Bencode::decode(b"").unwrap_err(), Error::Truncated { pos: 0 });
    }

    #[test]
    fn it_should_reject_unterminated_containers() {
        assert_eq!(Bencode::decode(b"l4:spam").unwrap_err(), Error::UnterminatedContainer { pos: 0 });
        assert_eq!(
            Bencode::decode(b"d3:fooi1e").unwrap_err(),
            Error::UnterminatedContainer { pos: 0 }
        );
    }

    #[test]
    fn it_should_reject_non_string_duplicated_or_unsorted_dict_keys() {
        assert_eq!(Bencode::decode(b"di1ei2ee").unwrap_err(), Error::InvalidDictKey { pos: 1 });
        assert_eq!(
            Bencode::decode(b"d3:fooi1e3:fooi2ee").unwrap_err(),
            Error::InvalidDictKey { pos: 9 }
        );
        assert_eq!(
            Bencode::decode(b"d3:zzzi1e3:aaai2ee").unwrap_err(),
            Error::InvalidDictKey { pos: 9 }
        );
    }

    #[test]
    fn it_should_reject_trailing_data_after_the_top_level_value() {
        assert_eq!(Bencode::decode(b"i42ei43e").unwrap_err(), Error::TrailingData { pos: 4 });
    }
}
