//! Search-match highlighting

use regex::RegexBuilder;

/// A run of text that either matches the keyword or does not
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Segment<'a> {
    pub text: &'a str,
    pub highlight: bool,
}

impl<'a> Segment<'a> {
    fn plain(text: &'a str) -> Self {
        Self {
            text,
            highlight: false,
        }
    }

    fn matched(text: &'a str) -> Self {
        Self {
            text,
            highlight: true,
        }
    }
}

/// Split `text` into ordered segments around case-insensitive, literal
/// occurrences of `keyword`. An empty keyword or text yields the whole text
/// as a single plain segment.
pub fn highlighted_parts<'a>(text: &'a str, keyword: &str) -> Vec<Segment<'a>> {
    if keyword.is_empty() || text.is_empty() {
        return vec![Segment::plain(text)];
    }

    let re = match RegexBuilder::new(&regex::escape(keyword))
        .case_insensitive(true)
        .build()
    {
        Ok(re) => re,
        Err(e) => {
            tracing::debug!("highlight pattern rejected: {e}");
            return vec![Segment::plain(text)];
        }
    };

    let mut parts = Vec::new();
    let mut last = 0;
    for m in re.find_iter(text) {
        if m.start() > last {
            parts.push(Segment::plain(&text[last..m.start()]));
        }
        parts.push(Segment::matched(m.as_str()));
        last = m.end();
    }
    if last < text.len() {
        parts.push(Segment::plain(&text[last..]));
    }

    parts
}

/// Join the segments of `text`, passing each match through `render`
pub fn highlight_text<F>(text: &str, keyword: &str, render: F) -> String
where
    F: Fn(&str) -> String,
{
    highlighted_parts(text, keyword)
        .into_iter()
        .map(|seg| {
            if seg.highlight {
                render(seg.text)
            } else {
                seg.text.to_string()
            }
        })
        .collect()
}
