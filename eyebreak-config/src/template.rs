use crate::error::{ConfigError, Result};

/// A template argument. Integers and text pad differently when no alignment
/// is given and accept different presentation types.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Arg<'a> {
    Int(u64),
    Text(&'a str),
}

impl Arg<'_> {
    fn default_align(&self) -> Align {
        match self {
            Arg::Int(_) => Align::Right,
            Arg::Text(_) => Align::Left,
        }
    }

    fn accepts(&self, ty: char) -> bool {
        matches!((self, ty), (Arg::Int(_), 'd') | (Arg::Text(_), 's'))
    }

    fn to_text(self) -> String {
        match self {
            Arg::Int(n) => n.to_string(),
            Arg::Text(s) => s.to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Align {
    Left,
    Right,
    Center,
}

impl Align {
    fn from_char(c: char) -> Option<Self> {
        match c {
            '<' => Some(Self::Left),
            '>' => Some(Self::Right),
            '^' => Some(Self::Center),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
struct FormatSpec {
    fill: Option<char>,
    align: Option<Align>,
    zero: bool,
    width: usize,
    ty: Option<char>,
}

impl FormatSpec {
    /// Parses `[[fill]align][0][width][type]` with type `d` or `s`.
    fn parse(spec: &str) -> Option<Self> {
        let chars: Vec<char> = spec.chars().collect();
        let mut out = Self::default();
        let mut i = 0;

        if let Some(align) = chars.get(1).and_then(|c| Align::from_char(*c)) {
            out.fill = Some(chars[0]);
            out.align = Some(align);
            i = 2;
        } else if let Some(align) = chars.first().and_then(|c| Align::from_char(*c)) {
            out.align = Some(align);
            i = 1;
        }

        if chars.get(i) == Some(&'0') {
            out.zero = true;
            i += 1;
        }

        let start = i;
        while chars.get(i).is_some_and(|c| c.is_ascii_digit()) {
            i += 1;
        }
        if i > start {
            let width: String = chars[start..i].iter().collect();
            out.width = width.parse().ok()?;
        }

        if let Some(&ty @ ('d' | 's')) = chars.get(i) {
            out.ty = Some(ty);
            i += 1;
        }

        (i == chars.len()).then_some(out)
    }

    fn apply(&self, arg: Arg) -> std::result::Result<String, String> {
        if let Some(ty) = self.ty {
            if !arg.accepts(ty) {
                return Err(format!("format code '{}' does not apply to {:?}", ty, arg));
            }
        }

        let value = arg.to_text();
        let len = value.chars().count();
        if len >= self.width {
            return Ok(value);
        }

        let fill = match self.fill {
            Some(fill) => fill,
            None if self.zero => '0',
            None => ' ',
        };
        let pad = self.width - len;
        let (left, right) = match self.align.unwrap_or_else(|| arg.default_align()) {
            Align::Left => (0, pad),
            Align::Right => (pad, 0),
            Align::Center => (pad / 2, pad - pad / 2),
        };
        let mut out = String::with_capacity(self.width);
        out.extend(std::iter::repeat(fill).take(left));
        out.push_str(&value);
        out.extend(std::iter::repeat(fill).take(right));
        Ok(out)
    }
}

/// Renders a text template with positional placeholders.
///
/// Supported forms are `{}` (next argument), `{N}` (argument N), either one
/// followed by `:[[fill]align][0][width][type]`, plus `{{` and `}}` for
/// literal braces. Without an explicit alignment integers pad on the left and
/// text on the right.
pub fn render(template: &str, args: &[Arg]) -> Result<String> {
    let error = |message: String| ConfigError::Template {
        template: template.to_string(),
        message,
    };

    let mut out = String::with_capacity(template.len());
    let mut chars = template.chars().peekable();
    let mut next_auto = 0usize;

    while let Some(c) = chars.next() {
        match c {
            '{' if chars.peek() == Some(&'{') => {
                chars.next();
                out.push('{');
            }
            '}' if chars.peek() == Some(&'}') => {
                chars.next();
                out.push('}');
            }
            '}' => return Err(error("unmatched '}'".to_string())),
            '{' => {
                let mut field = String::new();
                let mut closed = false;
                for c in chars.by_ref() {
                    if c == '}' {
                        closed = true;
                        break;
                    }
                    field.push(c);
                }
                if !closed {
                    return Err(error("unterminated placeholder".to_string()));
                }

                let (index, spec) = match field.split_once(':') {
                    Some((index, spec)) => (index, spec),
                    None => (field.as_str(), ""),
                };
                let index = if index.is_empty() {
                    next_auto += 1;
                    next_auto - 1
                } else {
                    index
                        .parse::<usize>()
                        .map_err(|_| error(format!("bad placeholder index {:?}", index)))?
                };
                let arg = args.get(index).ok_or_else(|| {
                    error(format!(
                        "placeholder {} out of range ({} arguments)",
                        index,
                        args.len()
                    ))
                })?;
                let spec = FormatSpec::parse(spec)
                    .ok_or_else(|| error(format!("bad format spec {:?}", spec)))?;
                out.push_str(&spec.apply(*arg).map_err(error)?);
            }
            c => out.push(c),
        }
    }

    Ok(out)
}
