use std::borrow::Cow;

use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

/// Display width of a string in terminal columns (CJK and emoji count 2).
pub fn display_width(s: &str) -> usize {
    UnicodeWidthStr::width(s)
}

const ELLIPSIS: &str = "...";
const ELLIPSIS_WIDTH: usize = 3;

/// Truncate `s` to at most `max_width` terminal columns.
///
/// Appends "..." when text is cut. Widths of 3 or less have no room for the
/// ellipsis, so the string is simply clipped. Returns `Cow::Borrowed` when the
/// string already fits.
///
/// ```
/// use blogdeck::util::truncate_to_width;
///
/// assert_eq!(truncate_to_width("Short", 10), "Short");
/// assert_eq!(truncate_to_width("Hello World", 8), "Hello...");
/// assert_eq!(truncate_to_width("Test", 2), "Te");
/// ```
pub fn truncate_to_width(s: &str, max_width: usize) -> Cow<'_, str> {
    if display_width(s) <= max_width {
        return Cow::Borrowed(s);
    }
    if max_width <= ELLIPSIS_WIDTH {
        return Cow::Owned(clip(s, max_width).to_string());
    }
    Cow::Owned(format!("{}{}", clip(s, max_width - ELLIPSIS_WIDTH), ELLIPSIS))
}

/// Longest prefix of `s` that fits in `width` columns.
fn clip(s: &str, width: usize) -> &str {
    let mut used = 0;
    for (idx, c) in s.char_indices() {
        let w = UnicodeWidthChar::width(c).unwrap_or(0);
        if used + w > width {
            return &s[..idx];
        }
        used += w;
    }
    s
}

fn is_unsafe_byte(b: u8) -> bool {
    b == 0x1b || b == 0x7f || (b < 0x20 && b != b'\t' && b != b'\n' && b != b'\r')
}

/// Remove terminal control characters and ANSI escape sequences.
///
/// Article bodies and comments are user-supplied and end up drawn straight
/// into the terminal. Tab, newline and carriage return are kept. CSI
/// sequences (`ESC [` .. final byte) and OSC sequences (`ESC ]` .. BEL or
/// `ESC \`) are dropped whole.
pub fn strip_control_chars(s: &str) -> Cow<'_, str> {
    if !s.bytes().any(is_unsafe_byte) {
        return Cow::Borrowed(s);
    }

    let bytes = s.as_bytes();
    let mut out = String::with_capacity(s.len());
    let mut i = 0;
    while i < bytes.len() {
        match bytes[i] {
            0x1b if bytes.get(i + 1) == Some(&b'[') => {
                i += 2;
                while i < bytes.len() {
                    i += 1;
                    if (0x40..=0x7e).contains(&bytes[i - 1]) {
                        break;
                    }
                }
            }
            0x1b if bytes.get(i + 1) == Some(&b']') => {
                i += 2;
                while i < bytes.len() {
                    if bytes[i] == 0x07 {
                        i += 1;
                        break;
                    }
                    if bytes[i] == 0x1b && bytes.get(i + 1) == Some(&b'\\') {
                        i += 2;
                        break;
                    }
                    i += 1;
                }
            }
            b if is_unsafe_byte(b) => i += 1,
            _ => {
                let start = i;
                while i < bytes.len() && !is_unsafe_byte(bytes[i]) {
                    i += 1;
                }
                // Only ASCII bytes end a run, so this is a char boundary.
                out.push_str(&s[start..i]);
            }
        }
    }
    Cow::Owned(out)
}

// ============================================================================
// HTML
// ============================================================================

/// Tags whose end starts a new paragraph.
const BLOCK_TAGS: [&str; 12] = [
    "p", "div", "br", "li", "ul", "ol", "h1", "h2", "h3", "h4", "blockquote", "pre",
];

fn decode_entity(entity: &str) -> Option<char> {
    match entity {
        "amp" => Some('&'),
        "lt" => Some('<'),
        "gt" => Some('>'),
        "quot" => Some('"'),
        "apos" => Some('\''),
        "nbsp" => Some(' '),
        _ => {
            let num = entity.strip_prefix('#')?;
            let hex = num.strip_prefix('x').or_else(|| num.strip_prefix('X'));
            let code = match hex {
                Some(hex) => u32::from_str_radix(hex, 16).ok()?,
                None => num.parse().ok()?,
            };
            char::from_u32(code)
        }
    }
}

/// Convert article HTML to plain-text paragraphs.
///
/// Tags are dropped, entities decoded, and whitespace inside a paragraph
/// collapsed to single spaces. Block-level tags (`<p>`, `<br>`, headings,
/// list items) separate paragraphs. Empty paragraphs are omitted.
pub fn html_to_paragraphs(html: &str) -> Vec<String> {
    let mut paragraphs = Vec::new();
    let mut current = String::new();
    let mut flush = |current: &mut String| {
        let collapsed = current.split_whitespace().collect::<Vec<_>>().join(" ");
        if !collapsed.is_empty() {
            paragraphs.push(strip_control_chars(&collapsed).into_owned());
        }
        current.clear();
    };

    let mut rest = html;
    while let Some(c) = rest.chars().next() {
        match c {
            '<' => match rest.find('>') {
                Some(end) => {
                    let name: String = rest[1..end]
                        .trim_start_matches('/')
                        .chars()
                        .take_while(|c| c.is_ascii_alphanumeric())
                        .collect::<String>()
                        .to_ascii_lowercase();
                    if BLOCK_TAGS.contains(&name.as_str()) {
                        flush(&mut current);
                    }
                    rest = &rest[end + 1..];
                }
                None => {
                    // Unterminated tag: treat the rest as text.
                    current.push_str(rest);
                    rest = "";
                }
            },
            '&' => {
                let decoded = rest
                    .find(';')
                    .filter(|&end| end <= 10)
                    .and_then(|end| decode_entity(&rest[1..end]).map(|ch| (ch, end)));
                match decoded {
                    Some((ch, end)) => {
                        current.push(ch);
                        rest = &rest[end + 1..];
                    }
                    None => {
                        current.push('&');
                        rest = &rest[1..];
                    }
                }
            }
            _ => {
                current.push(c);
                rest = &rest[c.len_utf8()..];
            }
        }
    }
    flush(&mut current);
    paragraphs
}

/// Plain text of an article body on a single line.
pub fn html_to_text(html: &str) -> String {
    html_to_paragraphs(html).join(" ")
}

/// Short preview of an article body for the list view.
///
/// The first `max_chars` characters of the plain text, always followed by
/// an ellipsis.
pub fn excerpt(html: &str, max_chars: usize) -> String {
    let text = html_to_text(html);
    let mut out: String = text.chars().take(max_chars).collect();
    out.push('…');
    out
}
