//! Commit message templates with `{bucket}`, `{total}` and `{files}` fields.

use crate::error::TemplateError;

/// Default commit message.
pub const DEFAULT_TEMPLATE: &str = "Commiting bucket {bucket}/{total} with {files} files.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Field {
    Bucket,
    Total,
    Files,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Align {
    Left,
    Right,
    Center,
}

/// Integer format spec: `[[fill]align][0][width][d]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct FormatSpec {
    fill: char,
    align: Align,
    width: usize,
}

impl Default for FormatSpec {
    fn default() -> Self {
        Self {
            fill: ' ',
            align: Align::Right,
            width: 0,
        }
    }
}

impl FormatSpec {
    fn parse(spec: &str) -> Option<Self> {
        let mut out = Self::default();
        let chars: Vec<char> = spec.chars().collect();
        let align_of = |c: char| match c {
            '<' => Some(Align::Left),
            '>' => Some(Align::Right),
            '^' => Some(Align::Center),
            _ => None,
        };

        let mut rest = &chars[..];
        let mut explicit_fill = false;
        if let [fill, a, tail @ ..] = rest
            && let Some(align) = align_of(*a)
        {
            out.fill = *fill;
            out.align = align;
            explicit_fill = true;
            rest = tail;
        } else if let [a, tail @ ..] = rest
            && let Some(align) = align_of(*a)
        {
            out.align = align;
            rest = tail;
        }

        if rest.first() == Some(&'0') {
            if !explicit_fill {
                out.fill = '0';
            }
            rest = &rest[1..];
        }

        let digits: String = rest.iter().take_while(|c| c.is_ascii_digit()).collect();
        rest = &rest[digits.len()..];
        if !digits.is_empty() {
            out.width = digits.parse().ok()?;
        }

        match rest {
            [] | ['d'] => Some(out),
            _ => None,
        }
    }

    fn apply(&self, value: &str, out: &mut String) {
        let len = value.chars().count();
        let pad = self.width.saturating_sub(len);
        let (before, after) = match self.align {
            Align::Left => (0, pad),
            Align::Right => (pad, 0),
            Align::Center => (pad / 2, pad - pad / 2),
        };
        out.extend(std::iter::repeat_n(self.fill, before));
        out.push_str(value);
        out.extend(std::iter::repeat_n(self.fill, after));
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Literal(String),
    Field(Field, FormatSpec),
}

/// A validated commit message template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageTemplate {
    segments: Vec<Segment>,
}

impl MessageTemplate {
    /// Parse a template, rejecting unknown fields and stray braces.
    ///
    /// `{{` and `}}` produce literal braces. A field may carry an integer
    /// format spec such as `{bucket:03}` or `{files:>6d}`.
    pub fn parse(template: &str) -> Result<Self, TemplateError> {
        let mut segments = Vec::new();
        let mut literal = String::new();
        let mut chars = template.char_indices().peekable();

        while let Some((pos, c)) = chars.next() {
            match c {
                '{' if chars.peek().is_some_and(|&(_, n)| n == '{') => {
                    chars.next();
                    literal.push('{');
                }
                '}' if chars.peek().is_some_and(|&(_, n)| n == '}') => {
                    chars.next();
                    literal.push('}');
                }
                '{' => {
                    let mut name = String::new();
                    let mut closed = false;
                    for (_, n) in chars.by_ref() {
                        if n == '}' {
                            closed = true;
                            break;
                        }
                        name.push(n);
                    }
                    if !closed {
                        return Err(TemplateError::UnbalancedBrace(pos));
                    }

                    let (field_name, spec) = match name.split_once(':') {
                        Some((field_name, spec)) => (field_name, spec),
                        None => (name.as_str(), ""),
                    };
                    let field = match field_name {
                        "bucket" => Field::Bucket,
                        "total" => Field::Total,
                        "files" => Field::Files,
                        _ => return Err(TemplateError::UnknownField(field_name.to_string())),
                    };
                    let spec = FormatSpec::parse(spec)
                        .ok_or_else(|| TemplateError::UnsupportedSpec(spec.to_string()))?;
                    if !literal.is_empty() {
                        segments.push(Segment::Literal(std::mem::take(&mut literal)));
                    }
                    segments.push(Segment::Field(field, spec));
                }
                '}' => return Err(TemplateError::UnbalancedBrace(pos)),
                _ => literal.push(c),
            }
        }

        if !literal.is_empty() {
            segments.push(Segment::Literal(literal));
        }

        Ok(Self { segments })
    }

    /// Substitute the bucket number, bucket count and file count.
    pub fn render(&self, bucket: u32, total: usize, files: usize) -> String {
        let mut out = String::new();
        for segment in &self.segments {
            match segment {
                Segment::Literal(text) => out.push_str(text),
                Segment::Field(field, spec) => {
                    let value = match field {
                        Field::Bucket => bucket.to_string(),
                        Field::Total => total.to_string(),
                        Field::Files => files.to_string(),
                    };
                    spec.apply(&value, &mut out);
                }
            }
        }
        out
    }
}

impl Default for MessageTemplate {
    fn default() -> Self {
        Self {
            segments: vec![
                Segment::Literal("Commiting bucket ".into()),
                Segment::Field(Field::Bucket, FormatSpec::default()),
                Segment::Literal("/".into()),
                Segment::Field(Field::Total, FormatSpec::default()),
                Segment::Literal(" with ".into()),
                Segment::Field(Field::Files, FormatSpec::default()),
                Segment::Literal(" files.".into()),
            ],
        }
    }
}

impl std::str::FromStr for MessageTemplate {
    type Err = TemplateError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_template_renders() {
        let template = MessageTemplate::parse(DEFAULT_TEMPLATE).unwrap();
        assert_eq!(
            template.render(2, 5, 130),
            "Commiting bucket 2/5 with 130 files."
        );
        assert_eq!(template, MessageTemplate::default());
    }

    #[test]
    fn test_fields_can_repeat_and_reorder() {
        let template = MessageTemplate::parse("[{files}] {bucket} of {total} ({bucket})").unwrap();
        assert_eq!(template.render(1, 3, 10), "[10] 1 of 3 (1)");
    }

    #[test]
    fn test_escaped_braces_are_literal() {
        let template = MessageTemplate::parse("{{wip}} {bucket}}}").unwrap();
        assert_eq!(template.render(4, 4, 1), "{wip} 4}");
    }

    #[test]
    fn test_unknown_field_is_rejected() {
        assert_eq!(
            MessageTemplate::parse("bucket {number}"),
            Err(TemplateError::UnknownField("number".into()))
        );
        assert_eq!(
            MessageTemplate::parse("{}"),
            Err(TemplateError::UnknownField(String::new()))
        );
    }

    #[test]
    fn test_unbalanced_braces_are_rejected() {
        assert_eq!(
            MessageTemplate::parse("bucket {bucket"),
            Err(TemplateError::UnbalancedBrace(7))
        );
        assert_eq!(
            MessageTemplate::parse("done }"),
            Err(TemplateError::UnbalancedBrace(5))
        );
    }

    #[test]
    fn test_format_specs_pad_values() {
        let template =
            MessageTemplate::parse("bucket {bucket:03}/{total:03d} [{files:<4}] [{files:*^7}] [{total:>3}]")
                .unwrap();
        assert_eq!(
            template.render(7, 120, 42),
            "bucket 007/120 [42  ] [**42***] [120]"
        );
    }

    #[test]
    fn test_format_spec_narrower_than_value_is_ignored() {
        let template = MessageTemplate::parse("{files:2}").unwrap();
        assert_eq!(template.render(1, 1, 12345), "12345");
    }

    #[test]
    fn test_empty_spec_is_accepted() {
        let template = MessageTemplate::parse("{bucket:}").unwrap();
        assert_eq!(template.render(5, 9, 1), "5");
    }

    #[test]
    fn test_unsupported_spec_is_rejected() {
        assert_eq!(
            MessageTemplate::parse("{bucket:.2f}"),
            Err(TemplateError::UnsupportedSpec(".2f".into()))
        );
        assert_eq!(
            MessageTemplate::parse("{bucket:x}"),
            Err(TemplateError::UnsupportedSpec("x".into()))
        );
        assert_eq!(
            MessageTemplate::parse("{number:03}"),
            Err(TemplateError::UnknownField("number".into()))
        );
    }

    #[test]
    fn test_plain_text_template() {
        let template: MessageTemplate = "bulk import".parse().unwrap();
        assert_eq!(template.render(1, 1, 1), "bulk import");
    }
}
