/// Converts `string` into a heading anchor id.
///
/// Characters are folded to ASCII first. Anything that isn't alphanumeric,
/// `_`, `-`, or whitespace is dropped. Runs of whitespace and hyphens become a
/// single `-`, the result is lowercased, and leading and trailing hyphens are
/// stripped.
///
/// This differs from Python-Markdown's `toc` slugs in two ways: those keep
/// edge hyphens (`Title -` gives `title-`), and they drop letters with no
/// ASCII decomposition where this transliterates them (`Æ` gives `ae`).
pub fn slugify(string: &str) -> String {
    let mut output = String::with_capacity(string.len());

    let mut need_dash = false;
    for ch in string.chars() {
        for b in deunicode::deunicode_char(ch).unwrap_or("").bytes() {
            match b {
                b'a'..=b'z' | b'A'..=b'Z' | b'0'..=b'9' | b'_' => {
                    if need_dash {
                        output.push('-');
                        need_dash = false;
                    }

                    output.push(b.to_ascii_lowercase() as char);
                }
                b'-' | b' ' | b'\t' | b'\n' | b'\r' => need_dash = !output.is_empty(),
                _ => { /* dropped without separating */ }
            }
        }
    }

    output
}

/// Returns `id`, or `id` suffixed with `_1`, `_2`, ... so that it is unique
/// among `seen`. The returned id is recorded in `seen`.
pub fn unique_id(id: String, seen: &mut rustc_hash::FxHashSet<String>) -> String {
    if !id.is_empty() && seen.insert(id.clone()) {
        return id;
    }

    let parsed = id.rsplit_once('_')
        .filter(|(_, n)| !n.is_empty() && n.bytes().all(|b| b.is_ascii_digit()))
        .and_then(|(stem, n)| Some((stem.len(), n.parse::<usize>().ok()?)));

    let (mut stem, mut n) = match parsed {
        Some((len, n)) => (id[..len].to_string(), n),
        None => (id.clone(), 0),
    };

    loop {
        n = match n.checked_add(1) {
            Some(next) => next,
            None => {
                stem = id.clone();
                1
            }
        };

        let candidate = format!("{stem}_{n}");
        if seen.insert(candidate.clone()) {
            return candidate;
        }
    }
}

/// Converts `\r\n` and lone `\r` line endings to `\n`.
pub fn normalize_newlines(text: String) -> String {
    if memchr::memchr(b'\r', text.as_bytes()).is_none() {
        return text;
    }

    text.replace("\r\n", "\n").replace('\r', "\n")
}

/// Escapes `&`, `<`, `>`, and `"` so `string` can sit inside HTML text or a
/// double-quoted attribute.
pub fn escape_html(string: &str) -> std::borrow::Cow<'_, str> {
    let needs_escape = |b: &u8| matches!(b, b'&' | b'<' | b'>' | b'"');
    let Some(first) = string.bytes().position(|b| needs_escape(&b)) else {
        return string.into();
    };

    let mut output = String::with_capacity(string.len() + 8);
    output.push_str(&string[..first]);
    for ch in string[first..].chars() {
        match ch {
            '&' => output.push_str("&amp;"),
            '<' => output.push_str("&lt;"),
            '>' => output.push_str("&gt;"),
            '"' => output.push_str("&quot;"),
            _ => output.push(ch),
        }
    }

    output.into()
}
