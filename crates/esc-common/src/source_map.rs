//! Source map generation (SourceMap v3).
//!
//! The `mappings` field is a `;`-separated list of generated-line groups,
//! each a `,`-separated list of segments. A segment is 1, 4 or 5 VLQ-encoded
//! deltas: generated column (reset at the start of each group), source
//! index, source line, source column (all carried across groups), and an
//! optional name index.

use serde::Serialize;

/// Base64 VLQ encoding as used by SourceMap v3 `mappings`.
pub mod vlq {
    const BASE64_CHARS: &[u8; 64] =
        b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789+/";

    // Low bit of the first chunk is the sign; chunks carry 5 payload bits
    // with 0x20 as the continuation marker.
    const CONTINUATION_BIT: u32 = 0x20;

    /// Encode a signed integer as a base64 VLQ string.
    #[must_use]
    pub fn encode(value: i64) -> String {
        let mut out = String::new();
        encode_into(value, &mut out);
        out
    }

    /// Encode a signed integer, appending to `out`.
    pub fn encode_into(value: i64, out: &mut String) {
        let mut vlq: u64 = if value < 0 {
            ((-value as u64) << 1) | 1
        } else {
            (value as u64) << 1
        };

        loop {
            let mut digit = (vlq as u32) & 0x1f;
            vlq >>= 5;
            if vlq > 0 {
                digit |= CONTINUATION_BIT;
            }
            out.push(BASE64_CHARS[digit as usize] as char);
            if vlq == 0 {
                break;
            }
        }
    }

    /// Decode a base64 VLQ string into the sequence of integers it encodes.
    ///
    /// Reference decoder used by round-trip tests.
    #[must_use]
    pub fn decode(text: &str) -> Vec<i64> {
        let mut values = Vec::new();
        let mut value: u64 = 0;
        let mut shift = 0;

        for byte in text.bytes() {
            let digit = BASE64_CHARS
                .iter()
                .position(|&c| c == byte)
                .map(|p| p as u32)
                .unwrap_or(0);
            value |= u64::from(digit & 0x1f) << shift;
            if digit & CONTINUATION_BIT == 0 {
                let negative = value & 1 == 1;
                let magnitude = (value >> 1) as i64;
                values.push(if negative { -magnitude } else { magnitude });
                value = 0;
                shift = 0;
            } else {
                shift += 5;
            }
        }
        values
    }
}

/// One mapping in a generated line: generated column plus the source
/// position it came from. All fields are absolute; deltas are computed
/// during encoding. `name_index == -1` means no name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Segment {
    pub gen_col: i64,
    pub src_index: i64,
    pub src_line: i64,
    pub src_col: i64,
    pub name_index: i64,
}

impl Segment {
    #[must_use]
    pub fn new(gen_col: i64, src_index: i64, src_line: i64, src_col: i64) -> Self {
        Segment {
            gen_col,
            src_index,
            src_line,
            src_col,
            name_index: -1,
        }
    }

    #[must_use]
    pub fn with_name(mut self, name_index: i64) -> Self {
        self.name_index = name_index;
        self
    }
}

/// Encode per-line segment groups into a `mappings` string.
///
/// The previous generated column resets at each group; previous source
/// index/line/column (and name index) carry across groups.
#[must_use]
pub fn encode_segments(groups: &[Vec<Segment>]) -> String {
    let mut out = String::new();
    let mut prev_src_index = 0i64;
    let mut prev_src_line = 0i64;
    let mut prev_src_col = 0i64;
    let mut prev_name_index = 0i64;

    for (group_idx, group) in groups.iter().enumerate() {
        if group_idx > 0 {
            out.push(';');
        }
        let mut prev_gen_col = 0i64;
        for (seg_idx, seg) in group.iter().enumerate() {
            if seg_idx > 0 {
                out.push(',');
            }
            vlq::encode_into(seg.gen_col - prev_gen_col, &mut out);
            prev_gen_col = seg.gen_col;

            vlq::encode_into(seg.src_index - prev_src_index, &mut out);
            prev_src_index = seg.src_index;

            vlq::encode_into(seg.src_line - prev_src_line, &mut out);
            prev_src_line = seg.src_line;

            vlq::encode_into(seg.src_col - prev_src_col, &mut out);
            prev_src_col = seg.src_col;

            if seg.name_index >= 0 {
                vlq::encode_into(seg.name_index - prev_name_index, &mut out);
                prev_name_index = seg.name_index;
            }
        }
    }
    out
}

/// Decode a `mappings` string back into absolute segment groups.
///
/// Reference decoder used by round-trip tests.
#[must_use]
pub fn decode_segments(mappings: &str) -> Vec<Vec<Segment>> {
    let mut groups = Vec::new();
    let mut prev_src_index = 0i64;
    let mut prev_src_line = 0i64;
    let mut prev_src_col = 0i64;
    let mut prev_name_index = 0i64;

    for line in mappings.split(';') {
        let mut group = Vec::new();
        let mut prev_gen_col = 0i64;
        for seg_text in line.split(',') {
            if seg_text.is_empty() {
                continue;
            }
            let fields = vlq::decode(seg_text);
            if fields.len() < 4 {
                continue;
            }
            prev_gen_col += fields[0];
            prev_src_index += fields[1];
            prev_src_line += fields[2];
            prev_src_col += fields[3];
            let mut seg = Segment::new(prev_gen_col, prev_src_index, prev_src_line, prev_src_col);
            if fields.len() > 4 {
                prev_name_index += fields[4];
                seg.name_index = prev_name_index;
            }
            group.push(seg);
        }
        groups.push(group);
    }
    groups
}

/// A SourceMap v3 document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SourceMap {
    pub version: u32,
    pub file: String,
    pub sources: Vec<String>,
    #[serde(rename = "sourcesContent", skip_serializing_if = "Option::is_none")]
    pub sources_content: Option<Vec<String>>,
    pub names: Vec<String>,
    pub mappings: String,
}

/// Per-invocation source map builder.
///
/// Holds its own state so nothing about map generation is global.
#[derive(Debug, Default)]
pub struct SourceMapGenerator {
    file: String,
    sources: Vec<String>,
    sources_content: Vec<Option<String>>,
    names: Vec<String>,
    /// Segment groups keyed by generated line (0-based).
    groups: Vec<Vec<Segment>>,
}

impl SourceMapGenerator {
    #[must_use]
    pub fn new(file: String) -> Self {
        Self {
            file,
            ..Default::default()
        }
    }

    /// Register a source file, returning its index.
    pub fn add_source(&mut self, path: String) -> usize {
        self.sources.push(path);
        self.sources_content.push(None);
        self.sources.len() - 1
    }

    /// Register a source file with its contents, returning its index.
    pub fn add_source_with_content(&mut self, path: String, contents: String) -> usize {
        self.sources.push(path);
        self.sources_content.push(Some(contents));
        self.sources.len() - 1
    }

    /// Register a name, returning its index.
    pub fn add_name(&mut self, name: String) -> usize {
        if let Some(existing) = self.names.iter().position(|n| n == &name) {
            return existing;
        }
        self.names.push(name);
        self.names.len() - 1
    }

    /// Add a mapping with an optional name index. All positions 0-based.
    pub fn add_mapping(
        &mut self,
        gen_line: u32,
        gen_col: u32,
        src_index: u32,
        src_line: u32,
        src_col: u32,
        name_index: Option<usize>,
    ) {
        while self.groups.len() <= gen_line as usize {
            self.groups.push(Vec::new());
        }
        let mut seg = Segment::new(
            i64::from(gen_col),
            i64::from(src_index),
            i64::from(src_line),
            i64::from(src_col),
        );
        if let Some(name) = name_index {
            seg.name_index = name as i64;
        }
        self.groups[gen_line as usize].push(seg);
    }

    /// Add a mapping with no name.
    pub fn add_simple_mapping(
        &mut self,
        gen_line: u32,
        gen_col: u32,
        src_index: u32,
        src_line: u32,
        src_col: u32,
    ) {
        self.add_mapping(gen_line, gen_col, src_index, src_line, src_col, None);
    }

    /// Produce the SourceMap v3 document.
    ///
    /// Segments within a group are sorted by generated column; groups are
    /// already in generated-line order.
    #[must_use]
    pub fn generate(&self) -> SourceMap {
        let mut groups = self.groups.clone();
        for group in &mut groups {
            group.sort_by_key(|s| s.gen_col);
        }
        let sources_content = if self.sources_content.iter().any(|c| c.is_some()) {
            Some(
                self.sources_content
                    .iter()
                    .map(|c| c.clone().unwrap_or_default())
                    .collect(),
            )
        } else {
            None
        };
        SourceMap {
            version: 3,
            file: self.file.clone(),
            sources: self.sources.clone(),
            sources_content,
            names: self.names.clone(),
            mappings: encode_segments(&groups),
        }
    }

    /// Produce an inline `sourceMappingURL` comment with the map embedded
    /// as a base64 data URI.
    #[must_use]
    pub fn generate_inline(&self) -> String {
        let map = self.generate();
        let json = serde_json::to_string(&map).unwrap_or_default();
        format!(
            "//# sourceMappingURL=data:application/json;base64,{}",
            base64_encode(json.as_bytes())
        )
    }
}

/// Standard (non-URL-safe) base64 with padding, for the inline data URI.
fn base64_encode(input: &[u8]) -> String {
    const CHARS: &[u8; 64] =
        b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789+/";
    let mut out = String::with_capacity(input.len().div_ceil(3) * 4);
    for chunk in input.chunks(3) {
        let b0 = chunk[0] as u32;
        let b1 = chunk.get(1).copied().unwrap_or(0) as u32;
        let b2 = chunk.get(2).copied().unwrap_or(0) as u32;
        let triple = (b0 << 16) | (b1 << 8) | b2;
        out.push(CHARS[(triple >> 18) as usize & 0x3f] as char);
        out.push(CHARS[(triple >> 12) as usize & 0x3f] as char);
        if chunk.len() > 1 {
            out.push(CHARS[(triple >> 6) as usize & 0x3f] as char);
        } else {
            out.push('=');
        }
        if chunk.len() > 2 {
            out.push(CHARS[triple as usize & 0x3f] as char);
        } else {
            out.push('=');
        }
    }
    out
}

#[cfg(test)]
#[path = "../tests/source_map.rs"]
mod tests;
