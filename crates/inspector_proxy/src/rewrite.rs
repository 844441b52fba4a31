const BODY_CLOSE: &str = "</body";

/// Splices `script` in front of the last closing body tag, or appends it when
/// the document has none. Exactly one copy is inserted.
pub fn inject_instrumentation(html: &str, script: &str) -> String {
    let mut out = String::with_capacity(html.len() + script.len());
    match last_body_close(html) {
        Some(idx) => {
            out.push_str(&html[..idx]);
            out.push_str(script);
            out.push_str(&html[idx..]);
        }
        None => {
            out.push_str(html);
            out.push_str(script);
        }
    }
    out
}

/// Byte offset of the last `</body>` (any ASCII case, optional whitespace
/// before `>`).
fn last_body_close(html: &str) -> Option<usize> {
    // ASCII lowercasing keeps byte offsets and char boundaries intact.
    let lower = html.to_ascii_lowercase();
    lower
        .rmatch_indices(BODY_CLOSE)
        .map(|(idx, _)| idx)
        .find(|&idx| {
            lower[idx + BODY_CLOSE.len()..]
                .chars()
                .find(|c| !c.is_ascii_whitespace())
                .is_some_and(|c| c == '>')
        })
}
