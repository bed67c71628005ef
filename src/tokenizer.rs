use std::io;
use std::io::Read;

/// Default number of bytes pulled from the source per read.
pub const DEFAULT_CHUNK_SIZE: usize = 8096;

/// A lowercase word together with its length in letters.
pub type Word = (String, usize);

/// Tokenize an in-memory string.
pub fn tokenize(text: &str) -> Tokenizer<&[u8]> {
    Tokenizer::new(text.as_bytes())
}

/// Streaming word reader.
///
/// Yields maximal runs of ASCII letters, lowercased. Every other byte,
/// including any byte of a multi-byte UTF-8 sequence, separates words, so
/// malformed input never stops the stream. The source is read in chunks of
/// at most `chunk_size` bytes, and a word crossing a chunk boundary is
/// carried over intact.
///
/// Interrupted reads are retried. Any other read error is yielded once,
/// after the word that was in progress when it happened, and ends the
/// stream.
pub struct Tokenizer<R> {
    source: R,
    chunk: Vec<u8>,
    position: usize,
    filled: usize,
    finished: bool,
    error: Option<io::Error>,
}

impl<R: Read> Tokenizer<R> {
    pub fn new(source: R) -> Self {
        Self::with_chunk_size(source, DEFAULT_CHUNK_SIZE)
    }

    pub fn with_chunk_size(source: R, chunk_size: usize) -> Self {
        Self {
            source,
            chunk: vec![0; chunk_size.max(1)],
            position: 0,
            filled: 0,
            finished: false,
            error: None,
        }
    }

    pub fn chunk_size(&self) -> usize {
        self.chunk.len()
    }

    /// Give back the underlying source, e.g. to rewind it.
    pub fn into_inner(self) -> R {
        self.source
    }

    fn refill(&mut self) -> io::Result<usize> {
        loop {
            match self.source.read(&mut self.chunk) {
                Ok(read) => {
                    self.position = 0;
                    self.filled = read;
                    return Ok(read);
                }
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(e),
            }
        }
    }
}

impl<R: Read> Iterator for Tokenizer<R> {
    type Item = io::Result<Word>;

    fn next(&mut self) -> Option<Self::Item> {
        if let Some(e) = self.error.take() {
            return Some(Err(e));
        }
        if self.finished {
            return None;
        }

        let mut word = String::new();

        loop {
            if self.position == self.filled {
                match self.refill() {
                    Ok(0) => {
                        self.finished = true;
                        break;
                    }
                    Ok(_) => {}
                    Err(e) => {
                        self.finished = true;
                        if word.is_empty() {
                            return Some(Err(e));
                        }
                        self.error = Some(e);
                        break;
                    }
                }
            }

            let byte = self.chunk[self.position];
            self.position += 1;

            match byte {
                b'A'..=b'Z' => word.push(byte.to_ascii_lowercase() as char),
                b'a'..=b'z' => word.push(byte as char),
                _ if !word.is_empty() => break,
                _ => {}
            }
        }

        if word.is_empty() {
            None
        } else {
            let length = word.len();
            Some(Ok((word, length)))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn collect(text: &str, chunk_size: usize) -> Vec<Word> {
        Tokenizer::with_chunk_size(text.as_bytes(), chunk_size)
            .collect::<io::Result<_>>()
            .unwrap()
    }

    #[test]
    fn splits_on_everything_but_letters() {
        let words = collect("Hello, World!  foo_bar123", DEFAULT_CHUNK_SIZE);
        assert_eq!(
            words,
            vec![
                ("hello".to_owned(), 5),
                ("world".to_owned(), 5),
                ("foo".to_owned(), 3),
                ("bar".to_owned(), 3),
            ]
        );
    }

    #[test]
    fn empty_and_separator_only_sources() {
        assert!(collect("", 16).is_empty());
        assert!(collect("  ,.;123 -- \n\t", 16).is_empty());
    }

    #[test]
    fn emits_trailing_word() {
        assert_eq!(collect("one two", 3), vec![("one".to_owned(), 3), ("two".to_owned(), 3)]);
    }

    #[test]
    fn chunk_size_does_not_change_output() {
        let text = "It was the best of times, it was the WORST of times; \
                    supercalifragilistic words straddle chunk boundaries.\n";
        let reference = collect(text, 8192);
        assert_eq!(collect(text, 4), reference);
        assert_eq!(collect(text, 64), reference);
        assert_eq!(collect(text, 1), reference);
    }

    #[test]
    fn tolerates_invalid_utf8() {
        let bytes: &[u8] = b"caf\xc3\xa9 \xff\xfeok";
        let words: Vec<Word> = Tokenizer::new(bytes).collect::<io::Result<_>>().unwrap();
        assert_eq!(words, vec![("caf".to_owned(), 3), ("ok".to_owned(), 2)]);
    }

    #[test]
    fn tokenize_wraps_strings() {
        let words: Vec<String> = tokenize("Don't stop")
            .map(|w| w.unwrap().0)
            .collect();
        assert_eq!(words, vec!["don", "t", "stop"]);
    }

    /// Hands out `data` in small pieces, interrupting the first read and
    /// failing once `fail_at` bytes have been served.
    struct FlakyReader {
        data: &'static [u8],
        served: usize,
        fail_at: usize,
        interrupted: bool,
    }

    impl FlakyReader {
        fn new(data: &'static [u8], fail_at: usize) -> Self {
            Self {
                data,
                served: 0,
                fail_at,
                interrupted: false,
            }
        }
    }

    impl Read for FlakyReader {
        fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
            if !self.interrupted {
                self.interrupted = true;
                return Err(io::Error::new(io::ErrorKind::Interrupted, "try again"));
            }
            if self.served >= self.fail_at {
                return Err(io::Error::new(io::ErrorKind::Other, "disk on fire"));
            }
            let end = (self.served + 3).min(self.fail_at).min(self.data.len());
            let read = end - self.served;
            buf[..read].copy_from_slice(&self.data[self.served..end]);
            self.served = end;
            Ok(read)
        }
    }

    #[test]
    fn retries_interrupted_reads() {
        let reader = FlakyReader::new(b"hello world", usize::MAX);
        let words: Vec<Word> = Tokenizer::with_chunk_size(reader, 4)
            .collect::<io::Result<_>>()
            .unwrap();
        assert_eq!(words, vec![("hello".to_owned(), 5), ("world".to_owned(), 5)]);
    }

    #[test]
    fn read_error_is_yielded_once_and_ends_the_stream() {
        let reader = FlakyReader::new(b"one two three", 6);
        let mut tokenizer = Tokenizer::with_chunk_size(reader, 4);

        assert_eq!(tokenizer.next().unwrap().unwrap(), ("one".to_owned(), 3));
        // the partial word is handed out before the error
        assert_eq!(tokenizer.next().unwrap().unwrap(), ("tw".to_owned(), 2));
        let error = tokenizer.next().unwrap().unwrap_err();
        assert_eq!(error.kind(), io::ErrorKind::Other);
        assert!(tokenizer.next().is_none());
        assert!(tokenizer.next().is_none());
    }

    #[test]
    fn read_error_between_words() {
        let reader = FlakyReader::new(b"one two", 4);
        let results: Vec<io::Result<Word>> = Tokenizer::with_chunk_size(reader, 8).collect();
        assert_eq!(results.len(), 2);
        assert_eq!(results[0].as_ref().unwrap(), &("one".to_owned(), 3));
        assert!(results[1].is_err());
    }

    #[test]
    fn source_can_be_recovered() {
        let tokenizer = Tokenizer::with_chunk_size(&b"abc"[..], 2);
        assert_eq!(tokenizer.chunk_size(), 2);
        assert_eq!(tokenizer.into_inner(), b"abc");
    }
}
