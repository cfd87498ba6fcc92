use std::borrow::Cow;

/// Character references unescaped before the description is parsed as HTML.
///
/// The feed double-encodes its embedded markup, so only the references the
/// dictionary actually emits are recognized. Anything else is left alone.
const ENTITIES: [(&str, char); 5] = [
    ("&lt;", '<'),
    ("&gt;", '>'),
    ("&quot;", '"'),
    ("&#39;", '\''),
    ("&amp;", '&'),
];

/// Decodes the five basic HTML character references in a single pass.
///
/// Replacement output is never rescanned: `&amp;lt;` becomes `&lt;`, not `<`.
/// Returns `Cow::Borrowed` when the input contains no `&`.
///
/// # Examples
///
/// ```
/// use palavra::feed::decode_entities;
///
/// assert_eq!(decode_entities("&lt;p&gt;ol&#39;a&lt;/p&gt;"), "<p>ol'a</p>");
/// assert_eq!(decode_entities("&amp;lt;"), "&lt;");
/// assert_eq!(decode_entities("&nbsp;"), "&nbsp;");
/// ```
pub fn decode_entities(text: &str) -> Cow<'_, str> {
    if !text.contains('&') {
        return Cow::Borrowed(text);
    }

    let mut out = String::with_capacity(text.len());
    let mut rest = text;

    while let Some(pos) = rest.find('&') {
        out.push_str(&rest[..pos]);
        let tail = &rest[pos..];

        match ENTITIES.iter().find(|(name, _)| tail.starts_with(name)) {
            Some((name, ch)) => {
                out.push(*ch);
                rest = &tail[name.len()..];
            }
            None => {
                out.push('&');
                rest = &tail[1..];
            }
        }
    }
    out.push_str(rest);

    Cow::Owned(out)
}
