#![forbid(unsafe_code)]

//! Template IR: literal text, placeholder slots and one event binding site.
//!
//! A template is parsed once; every compile re-evaluates the segments against
//! the live data instead of re-scanning the source.
//!
//! # Syntax
//!
//! - `{{key}}`: placeholder. The key is the raw text between the braces,
//!   matched non-greedily on one line. `{{ name }}` looks up `" name "`.
//!   Nested braces and property paths are not supported.
//! - `@type="method"`: event binding attribute. Only the first one that sits
//!   inside a tag is recognised; later ones are left as plain text.

use std::sync::LazyLock;

use regex::Regex;

static PLACEHOLDER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\{\{(.*?)\}\}").expect("valid placeholder regex"));

static BINDING_ATTR: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"@([^\s="'<>/]+)="([^"]*)""#).expect("valid binding regex")
});

/// One piece of a parsed template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    /// Literal markup.
    Text(String),
    /// Placeholder key.
    Slot(String),
}

/// Where the event binding attribute sits and what it declares.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BindingSite {
    /// Index of the text segment holding the attribute.
    segment: usize,
    /// Byte offset just past the attribute's closing quote in that segment.
    end: usize,
    event_type: String,
    method: String,
}

impl BindingSite {
    #[must_use]
    pub fn event_type(&self) -> &str {
        &self.event_type
    }

    #[must_use]
    pub fn method(&self) -> &str {
        &self.method
    }
}

/// Parsed template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Template {
    source: String,
    segments: Vec<Segment>,
    binding: Option<BindingSite>,
}

impl Template {
    #[must_use]
    pub fn parse(source: impl Into<String>) -> Self {
        let source = source.into();
        let mut segments = Vec::new();
        let mut text_starts = Vec::new();
        let mut last = 0;

        for caps in PLACEHOLDER.captures_iter(&source) {
            let (Some(whole), Some(key)) = (caps.get(0), caps.get(1)) else {
                continue;
            };
            if whole.start() > last {
                text_starts.push((segments.len(), last));
                segments.push(Segment::Text(source[last..whole.start()].to_owned()));
            }
            segments.push(Segment::Slot(key.as_str().to_owned()));
            last = whole.end();
        }
        if last < source.len() {
            text_starts.push((segments.len(), last));
            segments.push(Segment::Text(source[last..].to_owned()));
        }

        let binding = find_binding(&source, &segments, &text_starts);
        Self {
            source,
            segments,
            binding,
        }
    }

    #[must_use]
    pub fn source(&self) -> &str {
        &self.source
    }

    #[must_use]
    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// Placeholder keys in order of appearance, repeats included.
    pub fn slots(&self) -> impl Iterator<Item = &str> {
        self.segments.iter().filter_map(|seg| match seg {
            Segment::Slot(key) => Some(key.as_str()),
            Segment::Text(_) => None,
        })
    }

    #[must_use]
    pub fn binding(&self) -> Option<&BindingSite> {
        self.binding.as_ref()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.source.is_empty()
    }

    /// Produce markup. `lookup` renders each slot; when `binding_id` is given
    /// and the template has a binding site, ` id=<binding_id>` is inserted
    /// right after the binding attribute.
    pub fn render(&self, mut lookup: impl FnMut(&str) -> String, binding_id: Option<&str>) -> String {
        let mut out = String::with_capacity(self.source.len() + 16);
        for (index, segment) in self.segments.iter().enumerate() {
            match segment {
                Segment::Text(text) => match (&self.binding, binding_id) {
                    (Some(site), Some(id)) if site.segment == index => {
                        out.push_str(&text[..site.end]);
                        out.push_str(" id=");
                        out.push_str(id);
                        out.push_str(&text[site.end..]);
                    }
                    _ => out.push_str(text),
                },
                Segment::Slot(key) => out.push_str(&lookup(key)),
            }
        }
        out
    }
}

fn find_binding(
    source: &str,
    segments: &[Segment],
    text_starts: &[(usize, usize)],
) -> Option<BindingSite> {
    for &(index, offset) in text_starts {
        let Segment::Text(text) = &segments[index] else {
            continue;
        };
        for caps in BINDING_ATTR.captures_iter(text) {
            let (Some(whole), Some(ty), Some(method)) = (caps.get(0), caps.get(1), caps.get(2))
            else {
                continue;
            };
            if inside_tag(source, offset + whole.start(), offset + whole.end()) {
                return Some(BindingSite {
                    segment: index,
                    end: whole.end(),
                    event_type: ty.as_str().to_owned(),
                    method: method.as_str().to_owned(),
                });
            }
        }
    }
    None
}

/// An unclosed `<` precedes `start` and a `>` follows `end`, across lines.
fn inside_tag(source: &str, start: usize, end: usize) -> bool {
    let before = &source[..start];
    let opened = match (before.rfind('<'), before.rfind('>')) {
        (Some(open), Some(close)) => open > close,
        (Some(_), None) => true,
        (None, _) => false,
    };
    opened && source[end..].contains('>')
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
