//! Tag tokenizer for JSX-flavoured markup.
//!
//! Only tags are produced; text between them is skipped. Attribute strings
//! may contain quoted values and `{…}` expressions, so a `>` inside either
//! does not end the tag.

/// Kind of a tag token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TagKind {
    /// `<name …>` or `<name … />`
    Open { self_closing: bool },
    /// `</name>`
    Close,
}

/// A tag found in source text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Tag<'a> {
    pub kind: TagKind,
    pub name: &'a str,
    /// Raw attribute text, trimmed, without a trailing `/`.
    pub attributes: &'a str,
    /// Byte offset of the `<`.
    pub start: usize,
    /// Byte offset just past the `>`.
    pub end: usize,
}

/// Iterator over the tags of a source string.
#[derive(Debug, Clone)]
pub struct Tokenizer<'a> {
    src: &'a str,
    pos: usize,
}

impl<'a> Tokenizer<'a> {
    /// Tokenize `src` from the beginning.
    pub fn new(src: &'a str) -> Self {
        Self { src, pos: 0 }
    }

    fn name_end(&self, from: usize) -> usize {
        let bytes = self.src.as_bytes();
        let mut i = from;
        while i < bytes.len() && is_name_byte(bytes[i]) {
            i += 1;
        }
        i
    }

    /// Scan a closing tag whose `<` is at `start`.
    fn close_tag(&self, start: usize) -> Option<Tag<'a>> {
        let name_start = start + 2;
        let name_end = self.name_end(name_start);
        if name_end == name_start {
            return None;
        }

        let rest = &self.src[name_end..];
        let gt = rest.find(|c: char| !c.is_whitespace())?;
        if !rest[gt..].starts_with('>') {
            return None;
        }

        Some(Tag {
            kind: TagKind::Close,
            name: &self.src[name_start..name_end],
            attributes: "",
            start,
            end: name_end + gt + 1,
        })
    }

    /// Scan an opening tag whose `<` is at `start`.
    fn open_tag(&self, start: usize) -> Option<Tag<'a>> {
        let bytes = self.src.as_bytes();
        let name_start = start + 1;
        let name_end = self.name_end(name_start);
        if name_end == name_start {
            return None;
        }

        let mut quote: Option<u8> = None;
        let mut depth = 0usize;
        let mut i = name_end;

        while i < bytes.len() {
            let b = bytes[i];
            match quote {
                Some(q) if b == q => quote = None,
                Some(_) => {}
                None => match b {
                    b'"' | b'\'' | b'`' => quote = Some(b),
                    b'{' => depth += 1,
                    b'}' => depth = depth.saturating_sub(1),
                    // a bare `<` means this was not a tag (e.g. `a<b` in code)
                    b'<' if depth == 0 => return None,
                    b'>' if depth == 0 => break,
                    _ => {}
                },
            }
            i += 1;
        }

        if i >= bytes.len() {
            return None;
        }

        let raw = self.src[name_end..i].trim();
        let (attributes, self_closing) = match raw.strip_suffix('/') {
            Some(stripped) => (stripped.trim_end(), true),
            None => (raw, false),
        };

        Some(Tag {
            kind: TagKind::Open { self_closing },
            name: &self.src[name_start..name_end],
            attributes,
            start,
            end: i + 1,
        })
    }
}

impl<'a> Iterator for Tokenizer<'a> {
    type Item = Tag<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        let bytes = self.src.as_bytes();

        while let Some(offset) = self.src[self.pos..].find('<') {
            let start = self.pos + offset;
            let tag = match bytes.get(start + 1) {
                Some(b'/') => self.close_tag(start),
                Some(b) if b.is_ascii_alphabetic() => self.open_tag(start),
                _ => None,
            };

            match tag {
                Some(tag) => {
                    self.pos = tag.end;
                    return Some(tag);
                }
                None => self.pos = start + 1,
            }
        }

        self.pos = self.src.len();
        None
    }
}

fn is_name_byte(b: u8) -> bool {
    b.is_ascii_alphanumeric() || matches!(b, b'_' | b'-' | b'.' | b':')
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(src: &str) -> Vec<(TagKind, &str)> {
        Tokenizer::new(src).map(|t| (t.kind, t.name)).collect()
    }

    #[test]
    fn test_simple_tags() {
        let tags = names("<div class=\"a\"><p>Hi</p></div>");
        assert_eq!(
            tags,
            vec![
                (TagKind::Open { self_closing: false }, "div"),
                (TagKind::Open { self_closing: false }, "p"),
                (TagKind::Close, "p"),
                (TagKind::Close, "div"),
            ]
        );
    }

    #[test]
    fn test_self_closing_and_attributes() {
        let tag = Tokenizer::new(r#"<SEO metadata={metadata} />"#).next().unwrap();
        assert_eq!(tag.kind, TagKind::Open { self_closing: true });
        assert_eq!(tag.name, "SEO");
        assert_eq!(tag.attributes, "metadata={metadata}");
    }

    #[test]
    fn test_gt_inside_expression_and_quotes() {
        let src = r#"<button onClick={() => a > b} title="x > y">Go</button>"#;
        let tag = Tokenizer::new(src).next().unwrap();
        assert_eq!(tag.name, "button");
        assert_eq!(tag.attributes, r#"onClick={() => a > b} title="x > y""#);
        assert_eq!(&src[tag.end..tag.end + 2], "Go");
    }

    #[test]
    fn test_comparison_in_code_is_not_a_tag() {
        let src = "if (a<b) { return <Export>x</Export>; }";
        let tags = names(src);
        assert_eq!(
            tags,
            vec![
                (TagKind::Open { self_closing: false }, "Export"),
                (TagKind::Close, "Export"),
            ]
        );
    }

    #[test]
    fn test_fragments_and_unterminated_tags_are_skipped() {
        assert_eq!(names("<><p>a</p></>"), names("<p>a</p>"));
        assert!(names("<div class=\"never closed").is_empty());
    }

    #[test]
    fn test_multiline_tag() {
        let src = "<Export\n  filename=\"home\"\n  to=\"link\"\n>";
        let tag = Tokenizer::new(src).next().unwrap();
        assert_eq!(tag.name, "Export");
        assert!(tag.attributes.starts_with("filename"));
        assert!(tag.attributes.ends_with("\"link\""));
    }
}
