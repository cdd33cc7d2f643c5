//! Plain-text message formatting

/// Remove the whitespace prefix shared by every non-blank line.
pub fn dedent(text: &str) -> String {
    let margin = text
        .lines()
        .filter(|line| !line.trim().is_empty())
        .map(|line| line.len() - line.trim_start().len())
        .min()
        .unwrap_or(0);

    text.lines()
        .map(|line| if line.trim().is_empty() { "" } else { line.get(margin..).unwrap_or_else(|| line.trim_start()) })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Greedily fill words into lines of at most `width` characters. Words
/// longer than `width` are split.
pub fn wrap(text: &str, width: usize) -> Vec<String> {
    let width = width.max(1);
    let mut lines = Vec::new();
    let mut current = String::new();

    for word in text.split_whitespace() {
        let mut word: Vec<char> = word.chars().collect();
        loop {
            let used = current.chars().count();
            let gap = usize::from(used > 0);
            if used + gap + word.len() <= width {
                if gap == 1 {
                    current.push(' ');
                }
                current.extend(word.iter());
                break;
            }
            if used > 0 {
                lines.push(std::mem::take(&mut current));
                continue;
            }
            // Alone on the line and still too long
            let rest = word.split_off(width);
            lines.push(word.into_iter().collect());
            word = rest;
        }
    }

    if !current.is_empty() {
        lines.push(current);
    }
    lines
}

/// Dedent `text`, then wrap each blank-line separated paragraph to `width`.
pub fn render_message(text: &str, width: usize) -> String {
    dedent(text)
        .trim()
        .split("\n\n")
        .map(|paragraph| wrap(paragraph.trim(), width).join("\n"))
        .collect::<Vec<_>>()
        .join("\n\n")
}
