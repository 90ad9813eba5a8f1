use std::ops::Range;

use ropey::Rope;

pub fn is_paragraph_separator(ch: char) -> bool {
    ch == '\n' || ch == '\r'
}

fn is_separator_byte(byte: u8) -> bool {
    byte == b'\n' || byte == b'\r'
}

/// Char-indexed access and paragraph lookup on top of the byte-indexed rope.
///
/// Paragraph separators are `\n`, `\r` and the `\r\n` pair, which counts as a
/// single separator. Both separators are ASCII, so scanning happens on bytes.
pub trait RopeExt {
    fn char_len(&self) -> usize;
    fn char_at(&self, index: usize) -> Option<char>;
    fn char_to_byte(&self, index: usize) -> usize;
    fn byte_range(&self, range: Range<usize>) -> Range<usize>;
    fn slice_chars(&self, range: Range<usize>) -> String;

    /// Index right after the nearest separator before `from`, or 0.
    fn current_paragraph_start(&self, from: usize) -> usize;
    /// Index right after the nearest separator at or after `from`, or `from`
    /// itself when no paragraph follows.
    fn next_paragraph_start(&self, from: usize) -> usize;
    /// The paragraph containing `at`, including its trailing separator.
    fn paragraph_range(&self, at: usize) -> Range<usize>;
    /// Every paragraph intersecting `range`, each including its separator.
    fn paragraph_ranges(&self, range: Range<usize>) -> Vec<Range<usize>>;
}

impl RopeExt for Rope {
    fn char_len(&self) -> usize {
        self.len_chars()
    }

    fn char_at(&self, index: usize) -> Option<char> {
        if index >= self.len_chars() {
            return None;
        }

        self.get_char(self.char_to_byte_idx(index)).ok()
    }

    fn char_to_byte(&self, index: usize) -> usize {
        if index >= self.len_chars() {
            return self.len();
        }

        self.char_to_byte_idx(index)
    }

    fn byte_range(&self, range: Range<usize>) -> Range<usize> {
        let start = self.char_to_byte(range.start);
        let end = self.char_to_byte(range.end.max(range.start));
        start..end
    }

    fn slice_chars(&self, range: Range<usize>) -> String {
        let bytes = self.byte_range(range);
        if bytes.is_empty() {
            return String::new();
        }
        self.slice(bytes).to_string()
    }

    fn current_paragraph_start(&self, from: usize) -> usize {
        let len = self.len();
        if len == 0 {
            return 0;
        }

        let mut byte = self.char_to_byte(from);
        // Between `\r` and `\n`: still the end of the previous paragraph.
        if byte > 0 && byte < len && self.byte(byte - 1) == b'\r' && self.byte(byte) == b'\n' {
            byte -= 1;
        }

        while byte > 0 {
            if is_separator_byte(self.byte(byte - 1)) {
                return self.byte_to_char_idx(byte);
            }
            byte -= 1;
        }
        0
    }

    fn next_paragraph_start(&self, from: usize) -> usize {
        let len = self.len();
        if len == 0 {
            return 0;
        }

        let from = from.min(self.len_chars());
        let mut byte = self.char_to_byte(from);
        while byte < len {
            match self.byte(byte) {
                b'\r' if byte + 1 < len && self.byte(byte + 1) == b'\n' => {
                    return self.byte_to_char_idx(byte + 2);
                }
                b'\r' | b'\n' => return self.byte_to_char_idx(byte + 1),
                _ => byte += 1,
            }
        }
        from
    }

    fn paragraph_range(&self, at: usize) -> Range<usize> {
        let start = self.current_paragraph_start(at);
        let next = self.next_paragraph_start(start);
        let end = if next > start { next } else { self.len_chars() };
        start..end
    }

    fn paragraph_ranges(&self, range: Range<usize>) -> Vec<Range<usize>> {
        let len = self.len_chars();
        let mut out = Vec::new();
        if len == 0 {
            return out;
        }

        let mut paragraph = self.paragraph_range(range.start.min(len));
        loop {
            let end = paragraph.end;
            out.push(paragraph);
            if end >= len || end >= range.end {
                break;
            }
            paragraph = self.paragraph_range(end);
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn char_access_uses_char_indices() {
        let rope = Rope::from_str("añb\n");
        assert_eq!(rope.char_len(), 4);
        assert_eq!(rope.char_at(1), Some('ñ'));
        assert_eq!(rope.char_at(2), Some('b'));
        assert_eq!(rope.char_at(4), None);
        assert_eq!(rope.slice_chars(1..3), "ñb");
    }

    #[test]
    fn paragraph_ranges_include_separators() {
        let rope = Rope::from_str("ab\r\ncd\nef");
        assert_eq!(rope.paragraph_range(0), 0..4);
        assert_eq!(rope.paragraph_range(3), 0..4);
        assert_eq!(rope.paragraph_range(5), 4..7);
        assert_eq!(rope.paragraph_range(9), 7..9);
        assert_eq!(rope.paragraph_ranges(1..5), vec![0..4, 4..7]);
        assert_eq!(rope.paragraph_ranges(0..9), vec![0..4, 4..7, 7..9]);
    }

    #[test]
    fn trailing_separator_leaves_empty_last_paragraph() {
        let rope = Rope::from_str("ab\n");
        assert_eq!(rope.current_paragraph_start(3), 3);
        assert_eq!(rope.next_paragraph_start(3), 3);
        assert_eq!(rope.paragraph_range(3), 3..3);
    }
}
