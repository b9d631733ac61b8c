//! Song line templates.
//!
//! A template is plain text with `%tag%` placeholders and `[...]` groups.
//! Placeholders expand to the tag value or to nothing when the tag is
//! missing. A group is dropped entirely as soon as any placeholder directly
//! inside it expands empty, so `[%artist% - ]%title%` renders the separator
//! only for songs that actually carry an artist tag. Groups nest; a
//! suppressed inner group does not suppress its parent.

#[derive(Debug, Clone, PartialEq)]
enum Piece {
    Literal(String),
    Tag(String),
    Group(Vec<Piece>),
}

#[derive(Debug, Clone)]
pub struct Template {
    pieces: Vec<Piece>,
}

impl Template {
    /// Parse a template string. The parser is tolerant: a stray `]` is kept
    /// as literal text and an unclosed `[` opens a group that runs to the
    /// end of the template.
    pub fn parse(input: &str) -> Self {
        let mut stack: Vec<Vec<Piece>> = vec![Vec::new()];
        let mut literal = String::new();
        let mut chars = input.chars();

        while let Some(c) = chars.next() {
            match c {
                '%' => {
                    let mut name = String::new();
                    let mut closed = false;
                    for t in chars.by_ref() {
                        if t == '%' {
                            closed = true;
                            break;
                        }
                        name.push(t);
                    }
                    if closed {
                        flush_literal(&mut literal, &mut stack);
                        stack
                            .last_mut()
                            .expect("piece stack is never empty")
                            .push(Piece::Tag(name));
                    } else {
                        // No closing percent, keep the text as-is
                        literal.push('%');
                        literal.push_str(&name);
                    }
                }
                '[' => {
                    flush_literal(&mut literal, &mut stack);
                    stack.push(Vec::new());
                }
                ']' => {
                    if stack.len() > 1 {
                        flush_literal(&mut literal, &mut stack);
                        let group = stack.pop().expect("checked depth above");
                        stack
                            .last_mut()
                            .expect("piece stack is never empty")
                            .push(Piece::Group(group));
                    } else {
                        literal.push(']');
                    }
                }
                _ => literal.push(c),
            }
        }
        flush_literal(&mut literal, &mut stack);

        // Close any unterminated groups
        while stack.len() > 1 {
            let group = stack.pop().expect("checked depth above");
            stack
                .last_mut()
                .expect("piece stack is never empty")
                .push(Piece::Group(group));
        }

        Self {
            pieces: stack.pop().unwrap_or_default(),
        }
    }

    /// Render the template against a tag lookup. At the top level an empty
    /// tag simply expands to nothing; inside a group it suppresses the
    /// whole group.
    pub fn render(&self, lookup: &dyn Fn(&str) -> Option<String>) -> String {
        render_pieces(&self.pieces, lookup, false).unwrap_or_default()
    }
}

fn flush_literal(literal: &mut String, stack: &mut [Vec<Piece>]) {
    if !literal.is_empty() {
        stack
            .last_mut()
            .expect("piece stack is never empty")
            .push(Piece::Literal(std::mem::take(literal)));
    }
}

/// Returns `None` when a group must be suppressed. Only meaningful when
/// `in_group` is set; the top level always yields `Some`.
fn render_pieces(
    pieces: &[Piece],
    lookup: &dyn Fn(&str) -> Option<String>,
    in_group: bool,
) -> Option<String> {
    let mut out = String::new();
    for piece in pieces {
        match piece {
            Piece::Literal(text) => out.push_str(text),
            Piece::Tag(name) => match lookup(name) {
                Some(value) if !value.is_empty() => out.push_str(&value),
                _ if in_group => return None,
                _ => {}
            },
            Piece::Group(inner) => {
                if let Some(rendered) = render_pieces(inner, lookup, true) {
                    out.push_str(&rendered);
                }
            }
        }
    }
    Some(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lookup_from<'a>(pairs: &'a [(&'a str, &'a str)]) -> impl Fn(&str) -> Option<String> + 'a {
        move |name| {
            pairs
                .iter()
                .find(|(k, _)| *k == name)
                .map(|(_, v)| v.to_string())
        }
    }

    #[test]
    fn plain_placeholders_expand() {
        let t = Template::parse("%artist% - %title%");
        let out = t.render(&lookup_from(&[("artist", "Low"), ("title", "Monkey")]));
        assert_eq!(out, "Low - Monkey");
    }

    #[test]
    fn missing_tag_at_top_level_expands_empty() {
        let t = Template::parse("%artist% - %title%");
        let out = t.render(&lookup_from(&[("title", "Monkey")]));
        assert_eq!(out, " - Monkey");
    }

    #[test]
    fn group_with_empty_tag_is_suppressed() {
        let t = Template::parse("[%artist% - ]%title%");
        let out = t.render(&lookup_from(&[("title", "Monkey")]));
        assert_eq!(out, "Monkey");
    }

    #[test]
    fn group_with_all_tags_present_renders() {
        let t = Template::parse("[%artist% - ][%album% - ]%title%");
        let out = t.render(&lookup_from(&[
            ("artist", "Low"),
            ("album", "The Great Destroyer"),
            ("title", "Monkey"),
        ]));
        assert_eq!(out, "Low - The Great Destroyer - Monkey");
    }

    #[test]
    fn any_empty_tag_suppresses_the_group() {
        // Both tags sit in one group, so a single missing tag drops both
        let t = Template::parse("[%artist% - %album% - ]%title%");
        let out = t.render(&lookup_from(&[("artist", "Low"), ("title", "Monkey")]));
        assert_eq!(out, "Monkey");
    }

    #[test]
    fn suppressed_inner_group_keeps_outer() {
        let t = Template::parse("[%title%[ (%date%)]]");
        let out = t.render(&lookup_from(&[("title", "Monkey")]));
        assert_eq!(out, "Monkey");
        let out = t.render(&lookup_from(&[("title", "Monkey"), ("date", "2005")]));
        assert_eq!(out, "Monkey (2005)");
    }

    #[test]
    fn stray_bracket_and_unclosed_group_are_tolerated() {
        let t = Template::parse("a]b");
        assert_eq!(t.render(&lookup_from(&[])), "a]b");
        let t = Template::parse("[%title%");
        assert_eq!(t.render(&lookup_from(&[("title", "Monkey")])), "Monkey");
        assert_eq!(t.render(&lookup_from(&[])), "");
    }

    #[test]
    fn unknown_placeholder_is_empty() {
        let t = Template::parse("%nope%x");
        assert_eq!(t.render(&lookup_from(&[("title", "t")])), "x");
    }

    #[test]
    fn unterminated_placeholder_is_literal() {
        let t = Template::parse("100% pure");
        assert_eq!(t.render(&lookup_from(&[])), "100% pure");
    }
}
