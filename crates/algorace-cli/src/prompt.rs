//! Interactive dataset size prompt.

use std::io::{self, BufRead, Write};

use tracing::debug;

use algorace_core::constants::DEFAULT_SIZE;

/// Outcome of reading the dataset size.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SizeAnswer {
    /// The size to use.
    pub size: usize,
    /// Whether the default was substituted for invalid or empty input.
    pub defaulted: bool,
}

/// Parse one line of user input as a dataset size.
///
/// Anything that is not a positive integer falls back to [`DEFAULT_SIZE`].
#[must_use]
pub fn parse_size(line: &str) -> SizeAnswer {
    match line.trim().replace('_', "").parse::<usize>() {
        Ok(size) if size > 0 => SizeAnswer {
            size,
            defaulted: false,
        },
        _ => SizeAnswer {
            size: DEFAULT_SIZE,
            defaulted: true,
        },
    }
}

/// Prompt on `out` and read the size from `input`.
///
/// # Errors
///
/// Returns an I/O error if the prompt cannot be written or the input
/// cannot be read. End of input and non-UTF-8 bytes count as invalid input.
pub fn read_size<R: BufRead, W: Write>(input: &mut R, out: &mut W) -> io::Result<SizeAnswer> {
    write!(out, "Enter the array size [{DEFAULT_SIZE}]: ")?;
    out.flush()?;

    let mut raw = Vec::new();
    input.read_until(b'\n', &mut raw)?;
    let line = String::from_utf8_lossy(&raw);
    let answer = parse_size(&line);
    debug!(input = line.trim(), size = answer.size, defaulted = answer.defaulted, "size read");
    Ok(answer)
}
