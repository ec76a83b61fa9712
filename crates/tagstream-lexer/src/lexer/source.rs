//! Character sources the lexer can read from.

use std::io::{self, BufRead, ErrorKind};
use std::str::Chars;

use utf8::{DecodeError, Incomplete};

/// A forward-only supply of already-decoded characters.
pub trait CharSource {
    /// Read the next character, or `None` at the end of input.
    ///
    /// # Errors
    ///
    /// Returns the underlying I/O error if the source cannot be read.
    fn next_char(&mut self) -> io::Result<Option<char>>;
}

impl CharSource for Chars<'_> {
    fn next_char(&mut self) -> io::Result<Option<char>> {
        Ok(self.next())
    }
}

impl<S: CharSource + ?Sized> CharSource for &mut S {
    fn next_char(&mut self) -> io::Result<Option<char>> {
        (**self).next_char()
    }
}

/// Adapts an iterator of fallible characters into a [`CharSource`].
#[derive(Debug, Clone)]
pub struct FallibleChars<I>(pub I);

impl<I> CharSource for FallibleChars<I>
where
    I: Iterator<Item = io::Result<char>>,
{
    fn next_char(&mut self) -> io::Result<Option<char>> {
        self.0.next().transpose()
    }
}

/// Decodes UTF-8 from a buffered byte reader, one buffer at a time.
///
/// Sequences split across buffer boundaries are carried over. Malformed or
/// truncated sequences are reported as [`ErrorKind::InvalidData`] errors,
/// after every character decoded before them.
#[derive(Debug)]
pub struct Utf8Reader<R> {
    inner: R,
    /// Characters decoded from the last buffer, not yet handed out.
    decoded: String,
    pos: usize,
    incomplete: Incomplete,
    pending_error: Option<io::Error>,
}

impl<R: BufRead> Utf8Reader<R> {
    /// Wrap a buffered reader.
    #[must_use]
    pub fn new(inner: R) -> Self {
        Self {
            inner,
            decoded: String::new(),
            pos: 0,
            incomplete: Incomplete::empty(),
            pending_error: None,
        }
    }

    /// Unwrap the reader. Bytes already consumed are not returned.
    #[must_use]
    pub fn into_inner(self) -> R {
        self.inner
    }

    /// Decode the next buffer. Returns false at the end of input.
    fn refill(&mut self) -> io::Result<bool> {
        self.decoded.clear();
        self.pos = 0;
        loop {
            let buf = match self.inner.fill_buf() {
                Ok(buf) => buf,
                Err(err) if err.kind() == ErrorKind::Interrupted => continue,
                Err(err) => return Err(err),
            };
            if buf.is_empty() {
                if self.incomplete.is_empty() {
                    return Ok(false);
                }
                self.incomplete = Incomplete::empty();
                return Err(invalid_data("truncated UTF-8 sequence at end of input"));
            }

            let consumed = decode_into(&mut self.incomplete, buf, &mut self.decoded);
            let (consumed, failed) = match consumed {
                Ok(consumed) => (consumed, false),
                Err(consumed) => (consumed, true),
            };
            self.inner.consume(consumed);
            if failed {
                self.pending_error = Some(invalid_data("invalid UTF-8 sequence"));
                return Ok(true);
            }
            if !self.decoded.is_empty() {
                return Ok(true);
            }
        }
    }
}

impl<R: BufRead> CharSource for Utf8Reader<R> {
    fn next_char(&mut self) -> io::Result<Option<char>> {
        loop {
            if let Some(c) = self.decoded.get(self.pos..).and_then(|rest| rest.chars().next()) {
                self.pos += c.len_utf8();
                return Ok(Some(c));
            }
            if let Some(err) = self.pending_error.take() {
                return Err(err);
            }
            if !self.refill()? {
                return Ok(None);
            }
        }
    }
}

/// Append the characters of `input` to `out`, completing or stashing a
/// sequence split at a buffer boundary in `incomplete`.
///
/// Returns the number of bytes used: `Ok` when all of `input` was taken,
/// `Err` when decoding stopped at an invalid sequence.
fn decode_into(
    incomplete: &mut Incomplete,
    input: &[u8],
    out: &mut String,
) -> Result<usize, usize> {
    let mut rest = input;
    if !incomplete.is_empty() {
        match incomplete.try_complete(rest) {
            None => return Ok(input.len()),
            Some((Ok(completed), remaining)) => {
                out.push_str(completed);
                rest = remaining;
            }
            Some((Err(_), remaining)) => {
                *incomplete = Incomplete::empty();
                return Err(input.len() - remaining.len());
            }
        }
    }

    match utf8::decode(rest) {
        Ok(valid) => {
            out.push_str(valid);
            Ok(input.len())
        }
        Err(DecodeError::Incomplete {
            valid_prefix,
            incomplete_suffix,
        }) => {
            out.push_str(valid_prefix);
            *incomplete = incomplete_suffix;
            Ok(input.len())
        }
        Err(DecodeError::Invalid {
            valid_prefix,
            remaining_input,
            ..
        }) => {
            out.push_str(valid_prefix);
            Err(input.len() - remaining_input.len())
        }
    }
}

fn invalid_data(message: &str) -> io::Error {
    io::Error::new(ErrorKind::InvalidData, message)
}
