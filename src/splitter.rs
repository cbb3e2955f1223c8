//! Splitting text into Telegram-sized messages.
//!
//! Lines are packed greedily into segments of at most `limit` characters.
//! A cut always happens at a line break unless a single line is longer than
//! the limit, in which case that line is cut at exact `limit`-character
//! boundaries and its remainder starts the next segment.
//!
//! Each [`Segment`] borrows its text from the source together with the
//! separator that followed it, so that concatenating
//! `leading + text + separator` for every segment gives back the original
//! input.

/// Maximum number of characters in one Telegram text message.
pub const TELEGRAM_MAX_LENGTH: usize = 4096;

/// One message-sized piece of the source text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Segment<'a> {
    /// Line breaks that open the source before the first segment.
    /// Empty for every later segment.
    pub leading: &'a str,

    /// Message body. Never empty and never starts with a line break.
    pub text: &'a str,

    /// Source text between this segment and the next one.
    ///
    /// One or more line breaks after a cut at a line boundary (blank lines
    /// at the cut are kept here). After a hard cut it holds the line breaks
    /// directly following the cut, usually none.
    pub separator: &'a str,
}

impl Segment<'_> {
    /// Returns the character count of the segment text.
    #[must_use]
    pub fn char_count(&self) -> usize {
        self.text.chars().count()
    }
}

/// Lazy iterator over the segments of a text.
///
/// Cloning the iterator restarts from the clone's position without
/// re-reading anything, so a fresh `split_message` call or a clone taken
/// before iteration can be walked any number of times.
#[derive(Debug, Clone)]
pub struct Segments<'a> {
    source: &'a str,
    pos: usize,
    limit: usize,
}

/// Splits `text` into segments of at most `limit` characters.
///
/// A `limit` of zero is treated as one.
#[must_use]
pub fn split_message(text: &str, limit: usize) -> Segments<'_> {
    Segments {
        source: text,
        pos: 0,
        limit: limit.max(1),
    }
}

/// Reassembles segments into the text they were split from.
pub fn join_segments<'a>(segments: impl IntoIterator<Item = Segment<'a>>) -> String {
    let mut out = String::new();
    for segment in segments {
        out.push_str(segment.leading);
        out.push_str(segment.text);
        out.push_str(segment.separator);
    }
    out
}

fn is_line_break(c: char) -> bool {
    c == '\n' || c == '\r'
}

/// Byte length of the line-break run at the start of `s`.
fn line_break_run(s: &str) -> usize {
    s.len() - s.trim_start_matches(is_line_break).len()
}

/// Returns `(content_len, terminator_len)` in bytes for the first line of `s`.
fn line_bounds(s: &str) -> (usize, usize) {
    match s.find('\n') {
        Some(i) if i > 0 && s.as_bytes()[i - 1] == b'\r' => (i - 1, 2),
        Some(i) => (i, 1),
        None => (s.len(), 0),
    }
}

impl<'a> Segments<'a> {
    /// Cuts the first `limit` characters of `body` into a segment.
    fn hard_cut(&mut self, leading: &'a str, body: &'a str) -> Segment<'a> {
        let cut = body
            .char_indices()
            .nth(self.limit)
            .map_or(body.len(), |(i, _)| i);
        let tail = &body[cut..];
        let separator = &tail[..line_break_run(tail)];
        self.pos += cut + separator.len();
        Segment {
            leading,
            text: &body[..cut],
            separator,
        }
    }
}

impl<'a> Iterator for Segments<'a> {
    type Item = Segment<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        let rest = &self.source[self.pos..];
        let leading = &rest[..line_break_run(rest)];
        let body = &rest[leading.len()..];
        if body.is_empty() {
            self.pos = self.source.len();
            return None;
        }
        self.pos += leading.len();

        // `end`: byte end of the last accepted line, `text_end`: of the last
        // non-blank one, `cursor`: start of the next line.
        let mut end = 0;
        let mut text_end = 0;
        let mut chars = 0;
        let mut cursor = 0;

        while cursor < body.len() {
            let line = &body[cursor..];
            let (content_len, terminator_len) = line_bounds(line);
            let line_chars = line[..content_len].chars().count();

            // Terminators are ASCII, so their byte length is their char count.
            let candidate = if cursor == 0 {
                line_chars
            } else {
                chars + (cursor - end) + line_chars
            };

            if candidate > self.limit {
                if text_end == 0 {
                    return Some(self.hard_cut(leading, body));
                }
                break;
            }

            end = cursor + content_len;
            if content_len > 0 {
                text_end = end;
            }
            chars = candidate;
            cursor = end + terminator_len;
        }

        let tail = &body[text_end..];
        let separator = &tail[..line_break_run(tail)];
        self.pos += text_end + separator.len();

        Some(Segment {
            leading,
            text: &body[..text_end],
            separator,
        })
    }
}
