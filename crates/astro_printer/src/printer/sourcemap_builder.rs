//! Location mapping for Astro printing.
//!
//! [`LineIndex`] converts byte offsets in the original `.astro` source into
//! line/column pairs. [`LocationMapper`] records, while the printer appends
//! to its output buffer, which generated position corresponds to which
//! original offset, and finalizes into an `oxc_sourcemap::SourceMap`.

use crate::ast::Loc;

/// Line offset table for a source text.
pub struct LineIndex<'a> {
    source: &'a str,
    /// `line_starts[i]` is the byte offset of the first character on line `i`.
    line_starts: Vec<u32>,
}

impl<'a> LineIndex<'a> {
    pub fn new(source: &'a str) -> Self {
        Self {
            source,
            line_starts: Self::compute_line_starts(source),
        }
    }

    /// Convert a byte offset to `(line, column)`, both 0-indexed.
    /// Column is counted in UTF-16 code units (as source map columns are).
    /// Offsets past the end of the source are clamped.
    #[expect(clippy::cast_possible_truncation)]
    pub fn line_and_column(&self, byte_offset: u32) -> (u32, u32) {
        let byte_offset = byte_offset.min(self.source.len() as u32);
        let line = match self.line_starts.binary_search(&byte_offset) {
            Ok(exact) => exact,
            Err(insert_pos) => insert_pos.saturating_sub(1),
        };

        let line_start = self.line_starts[line];
        let segment = &self.source.as_bytes()[line_start as usize..byte_offset as usize];

        let column = if segment.is_ascii() {
            byte_offset - line_start
        } else {
            // The offset may land inside a multi-byte character; count up to
            // the last boundary before it.
            let mut end = byte_offset as usize;
            while !self.source.is_char_boundary(end) {
                end -= 1;
            }
            self.source[line_start as usize..end].encode_utf16().count() as u32
        };

        (line as u32, column)
    }

    /// Compute line start byte offsets for the source text.
    #[expect(clippy::cast_possible_truncation)]
    fn compute_line_starts(source: &str) -> Vec<u32> {
        let mut starts = vec![0u32];
        for (i, b) in source.bytes().enumerate() {
            if b == b'\n' {
                starts.push((i + 1) as u32);
            } else if b == b'\r' {
                if source.as_bytes().get(i + 1) == Some(&b'\n') {
                    // \r\n: the \n will push the line start
                    continue;
                }
                starts.push((i + 1) as u32);
            }
        }
        starts
    }
}

/// Incremental mapping table from generated output to the original source.
pub struct LocationMapper<'a> {
    source_id: u32,
    index: LineIndex<'a>,
    inner: oxc_sourcemap::SourceMapBuilder,

    /// Byte length of the output buffer at the last generated-position update.
    last_generated_update: usize,
    /// Current generated line (0-indexed).
    generated_line: u32,
    /// Current generated column (0-indexed, UTF-16 code units).
    generated_column: u32,
    /// Last original offset a mapping was emitted for (dedup).
    last_position: Option<u32>,
}

impl<'a> LocationMapper<'a> {
    /// `filename` is used in the sourcemap's `sources` array.
    pub fn new(filename: &str, source_text: &'a str) -> Self {
        let mut inner = oxc_sourcemap::SourceMapBuilder::default();
        let source_id = inner.set_source_and_content(filename, source_text);
        Self {
            source_id,
            index: LineIndex::new(source_text),
            inner,
            last_generated_update: 0,
            generated_line: 0,
            generated_column: 0,
            last_position: None,
        }
    }

    /// Map the current end of `output` to `loc` in the original source.
    ///
    /// A zero offset is the location of synthesized nodes and attributes;
    /// it starts a nil segment instead.
    pub fn add_mapping(&mut self, output: &[u8], loc: Loc) {
        if loc.start == 0 {
            self.add_nil_mapping(output);
            return;
        }
        // Consecutive mappings to the same original position are redundant.
        if self.last_position == Some(loc.start) {
            return;
        }

        let (original_line, original_column) = self.index.line_and_column(loc.start);
        self.update_generated_line_and_column(output);

        self.inner.add_token(
            self.generated_line,
            self.generated_column,
            original_line,
            original_column,
            Some(self.source_id),
            None,
        );

        self.last_position = Some(loc.start);
    }

    /// Mark the text printed from here on as synthetic: it gets a
    /// generated-only segment that maps to no original position.
    pub fn add_nil_mapping(&mut self, output: &[u8]) {
        // Already inside synthetic text (or nothing mapped yet).
        if self.last_position.is_none() {
            return;
        }
        self.update_generated_line_and_column(output);
        self.inner.add_token(
            self.generated_line,
            self.generated_column,
            0,
            0,
            None,
            None,
        );
        self.last_position = None;
    }

    /// Consume the mapper and produce the final `SourceMap`.
    pub fn into_sourcemap(self) -> oxc_sourcemap::SourceMap {
        self.inner.into_sourcemap()
    }

    /// Advance `generated_line` and `generated_column` over the bytes
    /// appended to `output` since the last update.
    #[expect(clippy::cast_possible_truncation)]
    fn update_generated_line_and_column(&mut self, output: &[u8]) {
        let start = self.last_generated_update;
        if start >= output.len() {
            self.last_generated_update = output.len();
            return;
        }

        let new_bytes = &output[start..];

        let mut last_newline_pos = None;
        let mut newline_count: u32 = 0;

        let mut i = 0;
        while i < new_bytes.len() {
            let b = new_bytes[i];
            if b == b'\n' {
                newline_count += 1;
                last_newline_pos = Some(i);
            } else if b == b'\r' {
                newline_count += 1;
                // \r\n counts once
                if new_bytes.get(i + 1) == Some(&b'\n') {
                    i += 1;
                }
                last_newline_pos = Some(i);
            }
            i += 1;
        }

        let utf16_len = |bytes: &[u8]| -> u32 {
            if bytes.is_ascii() {
                bytes.len() as u32
            } else {
                std::str::from_utf8(bytes)
                    .map_or(bytes.len(), |s| s.encode_utf16().count()) as u32
            }
        };

        if let Some(last_nl) = last_newline_pos {
            self.generated_line += newline_count;
            self.generated_column = utf16_len(&new_bytes[last_nl + 1..]);
        } else {
            self.generated_column += utf16_len(new_bytes);
        }

        self.last_generated_update = output.len();
    }
}
