use memchr::memmem::Finder;
use std::fmt;
use std::io::{self, Read};

use crate::errors::{ScanError, ScanResult};

/// Default chunk size for streamed searches
pub(crate) const CHUNK_SIZE: usize = 64 * 1024;

/// The literal byte sequence searched for during a run
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Pattern(Vec<u8>);

impl Pattern {
    /// Creates a pattern from raw bytes. An empty sequence would match every
    /// non-empty file, so it is rejected.
    pub fn new(bytes: impl Into<Vec<u8>>) -> ScanResult<Self> {
        let bytes = bytes.into();
        if bytes.is_empty() {
            return Err(ScanError::invalid_pattern("pattern must not be empty"));
        }
        Ok(Self(bytes))
    }

    /// Creates a pattern from an ASCII string
    pub fn from_ascii(text: &str) -> ScanResult<Self> {
        if !text.is_ascii() {
            return Err(ScanError::invalid_pattern(format!(
                "pattern must be ASCII: {:?}",
                text
            )));
        }
        Self::new(text.as_bytes())
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    #[allow(clippy::len_without_is_empty)]
    pub fn len(&self) -> usize {
        self.0.len()
    }
}

impl fmt::Display for Pattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.escape_ascii())
    }
}

/// Decides whether a pattern occurs in a file's content
#[derive(Debug, Clone)]
pub struct PatternMatcher {
    finder: Finder<'static>,
}

impl PatternMatcher {
    /// Creates a new PatternMatcher for the given pattern
    pub fn new(pattern: &Pattern) -> Self {
        Self {
            finder: Finder::new(pattern.as_bytes()).into_owned(),
        }
    }

    pub fn pattern_len(&self) -> usize {
        self.finder.needle().len()
    }

    /// Returns true if the pattern occurs anywhere in `haystack`
    pub fn is_match(&self, haystack: &[u8]) -> bool {
        self.finder.find(haystack).is_some()
    }

    /// Streams `reader` in fixed-size chunks and stops at the first occurrence
    pub fn is_match_reader<R: Read>(&self, reader: R) -> io::Result<bool> {
        self.is_match_chunked(reader, CHUNK_SIZE)
    }

    /// Streams `reader` in chunks of `chunk_size` bytes. The last
    /// `pattern_len() - 1` bytes of every window are carried into the next
    /// one so occurrences straddling a chunk boundary are still seen.
    pub fn is_match_chunked<R: Read>(&self, mut reader: R, chunk_size: usize) -> io::Result<bool> {
        let overlap = self.pattern_len() - 1;
        let mut window = vec![0u8; overlap + chunk_size.max(1)];
        let mut carried = 0;

        loop {
            let read = match reader.read(&mut window[carried..]) {
                Ok(0) => return Ok(false),
                Ok(n) => n,
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(e),
            };

            let filled = carried + read;
            if self.is_match(&window[..filled]) {
                return Ok(true);
            }

            carried = filled.min(overlap);
            window.copy_within(filled - carried..filled, 0);
        }
    }
}
