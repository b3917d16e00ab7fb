/*!
Input Scanning - line and integer parsing over any buffered reader

The stdin entry points in `io` are thin wrappers around these.
*/

use crate::error::{RuntimeError, RuntimeResult};
use crate::strings::MallocString;
use std::io::{self, BufRead};

/// How `read_line_from` treats the trailing newline
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NewlinePolicy {
    /// Strip the trailing `\n`, except when the line is nothing but `\n`:
    /// an empty line comes back as `"\n"`. Already-compiled programs
    /// depend on this, so the C export keeps it.
    #[default]
    Legacy,
    /// Always strip one trailing `\n`
    Strip,
}

/// Read through the next `\n` (or end of input) and return the line.
///
/// Only `\n` terminates a line; a `\r` before it is kept as content.
///
/// Running out of memory is reported as `AllocationFailed`. The chunk that
/// could not be stored stays in the reader; bytes already taken are lost.
pub fn read_line_from<R: BufRead + ?Sized>(
    reader: &mut R,
    policy: NewlinePolicy,
) -> RuntimeResult<MallocString> {
    let mut line: Vec<u8> = Vec::new();
    loop {
        let chunk = match reader.fill_buf() {
            Ok(chunk) => chunk,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e.into()),
        };
        if chunk.is_empty() {
            break;
        }

        let (take, found_newline) = match chunk.iter().position(|&b| b == b'\n') {
            Some(newline) => (newline + 1, true),
            None => (chunk.len(), false),
        };

        if line.try_reserve(take).is_err() {
            let size = line.len().saturating_add(take);
            tracing::debug!(size, "read_line: line buffer allocation failed");
            return Err(RuntimeError::AllocationFailed { size });
        }
        line.extend_from_slice(&chunk[..take]);
        reader.consume(take);

        if found_newline {
            break;
        }
    }

    if line.is_empty() {
        tracing::debug!("read_line: end of input");
        return Err(RuntimeError::EndOfInput);
    }

    let keep_newline = policy == NewlinePolicy::Legacy && line == b"\n";
    if !keep_newline && line.last() == Some(&b'\n') {
        line.pop();
    }

    MallocString::from_bytes(&line)
}

/// Scan one decimal `int` the way `scanf("%d")` followed by `getchar()` does.
///
/// Leading whitespace is skipped, then an optional sign and a run of digits
/// form the token. Exactly one byte after the token is consumed, whatever it
/// is; the rest of the line stays in the reader.
pub fn read_integer_from<R: BufRead + ?Sized>(reader: &mut R) -> RuntimeResult<i32> {
    loop {
        match peek(reader)? {
            None => {
                tracing::debug!("read_integer: end of input");
                return Err(RuntimeError::EndOfInput);
            }
            Some(b) if is_c_space(b) => reader.consume(1),
            Some(_) => break,
        }
    }

    let mut token = String::new();
    if let Some(sign @ (b'+' | b'-')) = peek(reader)? {
        token.push(char::from(sign));
        reader.consume(1);
    }
    let sign_len = token.len();
    while let Some(digit @ b'0'..=b'9') = peek(reader)? {
        token.push(char::from(digit));
        reader.consume(1);
    }

    if token.len() == sign_len {
        // Offending byte stays unread
        if let Some(found) = peek(reader)? {
            token.push(char::from(found));
        }
        return Err(RuntimeError::InvalidInteger { token });
    }

    let value = match token.parse::<i32>() {
        Ok(value) => value,
        Err(_) => return Err(RuntimeError::IntegerOutOfRange { token }),
    };

    if peek(reader)?.is_some() {
        reader.consume(1);
    }

    Ok(value)
}

/// Whitespace as C's `isspace` sees it in the "C" locale
fn is_c_space(b: u8) -> bool {
    matches!(b, b' ' | b'\t' | b'\n' | 0x0b | 0x0c | b'\r')
}

fn peek<R: BufRead + ?Sized>(reader: &mut R) -> io::Result<Option<u8>> {
    loop {
        match reader.fill_buf() {
            Ok(buf) => return Ok(buf.first().copied()),
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{Cursor, Read};

    fn rest(reader: &mut Cursor<&[u8]>) -> String {
        let mut rest = String::new();
        reader.read_to_string(&mut rest).unwrap();
        rest
    }

    #[test]
    fn test_read_line() {
        let mut input = Cursor::new(&b"hello\n"[..]);
        let line = read_line_from(&mut input, NewlinePolicy::Legacy).unwrap();
        assert_eq!(line.as_bytes(), b"hello");
        assert_eq!(rest(&mut input), "");
    }

    #[test]
    fn test_read_line_without_newline() {
        let mut input = Cursor::new(&b"hello"[..]);
        let line = read_line_from(&mut input, NewlinePolicy::Legacy).unwrap();
        assert_eq!(line.as_bytes(), b"hello");
    }

    #[test]
    fn test_read_line_end_of_input() {
        let mut input = Cursor::new(&b""[..]);
        let err = read_line_from(&mut input, NewlinePolicy::Legacy).unwrap_err();
        assert!(matches!(err, RuntimeError::EndOfInput));
    }

    #[test]
    fn test_read_line_empty_line_legacy_keeps_newline() {
        let mut input = Cursor::new(&b"\nnext\n"[..]);
        let line = read_line_from(&mut input, NewlinePolicy::Legacy).unwrap();
        assert_eq!(line.as_bytes(), b"\n");

        let line = read_line_from(&mut input, NewlinePolicy::Legacy).unwrap();
        assert_eq!(line.as_bytes(), b"next");
    }

    #[test]
    fn test_read_line_empty_line_strip() {
        let mut input = Cursor::new(&b"\n"[..]);
        let line = read_line_from(&mut input, NewlinePolicy::Strip).unwrap();
        assert!(line.is_empty());
    }

    #[test]
    fn test_read_line_keeps_carriage_return() {
        let mut input = Cursor::new(&b"dos\r\n"[..]);
        let line = read_line_from(&mut input, NewlinePolicy::Legacy).unwrap();
        assert_eq!(line.as_bytes(), b"dos\r");
    }

    #[test]
    fn test_read_line_consumes_one_line_at_a_time() {
        let mut input = Cursor::new(&b"one\ntwo\nthree"[..]);
        for expected in [&b"one"[..], &b"two"[..], &b"three"[..]] {
            let line = read_line_from(&mut input, NewlinePolicy::Legacy).unwrap();
            assert_eq!(line.as_bytes(), expected);
        }
        assert!(read_line_from(&mut input, NewlinePolicy::Legacy).is_err());
    }

    #[test]
    fn test_read_line_spanning_buffer_refills() {
        let text = b"a line longer than the reader's buffer\nnext\n";
        let mut input = io::BufReader::with_capacity(4, &text[..]);

        let line = read_line_from(&mut input, NewlinePolicy::Legacy).unwrap();
        assert_eq!(line.as_bytes(), b"a line longer than the reader's buffer");

        let line = read_line_from(&mut input, NewlinePolicy::Legacy).unwrap();
        assert_eq!(line.as_bytes(), b"next");
    }

    #[test]
    fn test_read_line_embedded_nul() {
        let mut input = Cursor::new(&b"ab\0cd\n"[..]);
        let line = read_line_from(&mut input, NewlinePolicy::Legacy).unwrap();
        assert_eq!(line.as_bytes(), b"ab");
        assert_eq!(rest(&mut input), "");
    }

    #[test]
    fn test_read_integer() {
        let mut input = Cursor::new(&b"42\n"[..]);
        assert_eq!(read_integer_from(&mut input).unwrap(), 42);
        assert_eq!(rest(&mut input), "");
    }

    #[test]
    fn test_read_integer_consumes_one_delimiter() {
        let mut input = Cursor::new(&b"-7 x\n"[..]);
        assert_eq!(read_integer_from(&mut input).unwrap(), -7);
        assert_eq!(rest(&mut input), "x\n");
    }

    #[test]
    fn test_read_integer_trailing_garbage_stays_on_line() {
        let mut input = Cursor::new(&b"12abc\n"[..]);
        assert_eq!(read_integer_from(&mut input).unwrap(), 12);
        assert_eq!(rest(&mut input), "bc\n");
    }

    #[test]
    fn test_read_integer_skips_whitespace() {
        let mut input = Cursor::new(&b"  \n\t\x0b\x0c\r 15\n"[..]);
        assert_eq!(read_integer_from(&mut input).unwrap(), 15);
    }

    #[test]
    fn test_read_integer_plus_sign() {
        let mut input = Cursor::new(&b"+3\n"[..]);
        assert_eq!(read_integer_from(&mut input).unwrap(), 3);
    }

    #[test]
    fn test_read_integer_at_end_of_input() {
        let mut input = Cursor::new(&b"99"[..]);
        assert_eq!(read_integer_from(&mut input).unwrap(), 99);
        assert_eq!(rest(&mut input), "");
    }

    #[test]
    fn test_read_integer_bounds() {
        let mut input = Cursor::new(&b"2147483647\n-2147483648\n"[..]);
        assert_eq!(read_integer_from(&mut input).unwrap(), i32::MAX);
        assert_eq!(read_integer_from(&mut input).unwrap(), i32::MIN);
    }

    #[test]
    fn test_read_integer_out_of_range() {
        let mut input = Cursor::new(&b"2147483648\n"[..]);
        match read_integer_from(&mut input).unwrap_err() {
            RuntimeError::IntegerOutOfRange { token } => assert_eq!(token, "2147483648"),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_read_integer_end_of_input() {
        let mut input = Cursor::new(&b""[..]);
        assert!(matches!(
            read_integer_from(&mut input).unwrap_err(),
            RuntimeError::EndOfInput
        ));

        let mut input = Cursor::new(&b"  \n\n"[..]);
        assert!(matches!(
            read_integer_from(&mut input).unwrap_err(),
            RuntimeError::EndOfInput
        ));
    }

    #[test]
    fn test_read_integer_malformed_leaves_input() {
        let mut input = Cursor::new(&b"abc\n"[..]);
        match read_integer_from(&mut input).unwrap_err() {
            RuntimeError::InvalidInteger { token } => assert_eq!(token, "a"),
            other => panic!("unexpected error: {other:?}"),
        }
        assert_eq!(rest(&mut input), "abc\n");
    }

    #[test]
    fn test_read_integer_lone_sign() {
        let mut input = Cursor::new(&b"- 5\n"[..]);
        match read_integer_from(&mut input).unwrap_err() {
            RuntimeError::InvalidInteger { token } => assert_eq!(token, "- "),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_integer_then_line() {
        let mut input = Cursor::new(&b"5\nhello\n"[..]);
        assert_eq!(read_integer_from(&mut input).unwrap(), 5);
        let line = read_line_from(&mut input, NewlinePolicy::Legacy).unwrap();
        assert_eq!(line.as_bytes(), b"hello");
    }

    #[test]
    fn test_repeated_reads_are_independent() {
        let mut input = Cursor::new(&b"1\n2\n3\n"[..]);
        let values: Vec<i32> = (0..3)
            .map(|_| read_integer_from(&mut input).unwrap())
            .collect();
        assert_eq!(values, vec![1, 2, 3]);
    }
}
