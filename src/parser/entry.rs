//! Streaming tokenizer for the section-oriented scene/resource text format.
//!
//! A file is a sequence of bracketed entries (`[section key=value ...]`),
//! optionally followed by `name = value` continuation lines carrying that
//! entry's properties. Between entries, `{`-delimited blocks (inline
//! dictionaries embedded in property values) are skipped opaquely.

/// Cursor over one file's text, shared between entry reads and
/// continuation-field reads so the two stay in step.
#[derive(Debug)]
pub struct EntryStream<'a> {
    src: &'a str,
    pos: usize,
}

impl<'a> EntryStream<'a> {
    pub fn new(src: &'a str) -> Self {
        Self { src, pos: 0 }
    }

    /// Advance to the next entry and return its raw text (the contents
    /// between `[` and the next `]`).
    ///
    /// Clean end-of-stream returns `None` and is not an error. End-of-stream
    /// inside an entry or an unclosed brace block fails only this read;
    /// previously returned entries stay valid. On success the cursor is left
    /// just past the newline following `]`, so continuation-field reads see
    /// the following raw lines verbatim.
    pub fn next_entry(&mut self) -> Option<&'a str> {
        let bytes = self.src.as_bytes();
        let mut i = self.pos;

        while i < bytes.len() && bytes[i] != b'[' {
            if bytes[i] == b'{' {
                let mut depth = 1usize;
                i += 1;
                while i < bytes.len() && depth > 0 {
                    match bytes[i] {
                        b'{' => depth += 1,
                        b'}' => depth -= 1,
                        _ => {}
                    }
                    i += 1;
                }
                if depth > 0 {
                    self.pos = bytes.len();
                    return None;
                }
            } else {
                i += 1;
            }
        }
        if i >= bytes.len() {
            self.pos = i;
            return None;
        }

        let start = i + 1;
        let mut end = start;
        while end < bytes.len() && bytes[end] != b']' {
            end += 1;
        }
        if end >= bytes.len() {
            self.pos = end;
            return None;
        }

        let mut after = end + 1;
        while after < bytes.len() && bytes[after] != b'\n' {
            after += 1;
        }
        self.pos = (after + 1).min(bytes.len());

        Some(&self.src[start..end])
    }

    /// Read one continuation field (`name = value`) following an entry.
    ///
    /// Splits on the first `=`, trimming exactly one wrapping character from
    /// each side (the spaces around `=` in the source convention). An empty
    /// line, a line without `=`, or the start of the next entry signals no
    /// more fields.
    pub fn next_continuation_field(&mut self) -> Option<(String, String)> {
        if self.pos >= self.src.len() {
            return None;
        }

        let rest = &self.src[self.pos..];
        let line_end = rest.find('\n').unwrap_or(rest.len());
        let line = rest[..line_end].trim_end_matches('\r');

        // Do not consume the next entry's header line.
        if line.starts_with('[') {
            return None;
        }

        self.pos += if line_end < rest.len() { line_end + 1 } else { line_end };

        if line.is_empty() {
            return None;
        }
        let eq = line.find('=')?;

        // Trim one character, not one byte, from each side of the `=`; the
        // source convention is a single space, but a line that deviates must
        // still decode without slicing inside a multibyte character.
        let mut name = line[..eq].chars();
        name.next_back()?;
        let mut value = line[eq + 1..].chars();
        value.next();

        Some((name.as_str().to_string(), value.as_str().to_string()))
    }
}
