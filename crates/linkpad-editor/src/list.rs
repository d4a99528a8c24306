//! List continuation on Enter.

use crate::buffer::EditBuffer;

/// Continues the list the cursor is on when Enter is pressed.
///
/// Bullet, numbered and task items each get a fresh marker on the next
/// line, with the indentation carried over and numbers incremented.
/// Pressing Enter on an item with no content removes the marker and
/// ends the list. Returns `false` when the current line is not a list
/// item, in which case the caller inserts a plain newline.
pub fn continue_list(buffer: &mut EditBuffer) -> bool {
    let line_start = buffer.line_start();
    let cursor = buffer.selection().start;
    let line = buffer.slice(line_start..cursor).to_owned();
    let trimmed = line.trim();

    // Task markers also parse as bullets, so they go first.
    if let Some(indent) = parse_task(&line) {
        if trimmed == "- [ ]" || trimmed == "- [x]" {
            terminate_item(buffer, line_start, cursor);
        } else {
            buffer.insert_at_cursor(&format!("\n{indent}- [ ] "));
        }
        return true;
    }

    if let Some((indent, marker)) = parse_bullet(&line) {
        if trimmed.len() == 1 && trimmed.starts_with(marker) {
            terminate_item(buffer, line_start, cursor);
        } else {
            buffer.insert_at_cursor(&format!("\n{indent}{marker} "));
        }
        return true;
    }

    if let Some((indent, digits)) = parse_ordered(&line) {
        if let Ok(number) = digits.parse::<usize>() {
            if trimmed.strip_prefix(digits).is_some_and(|rest| rest == ".") {
                terminate_item(buffer, line_start, cursor);
            } else {
                buffer.insert_at_cursor(&format!("\n{indent}{}. ", number + 1));
            }
            return true;
        }
    }

    false
}

/// Replaces the empty item with a plain newline.
fn terminate_item(buffer: &mut EditBuffer, line_start: usize, cursor: usize) {
    buffer.select(line_start..cursor);
    buffer.replace_selection("\n");
}

fn split_indent(line: &str) -> (&str, &str) {
    let content = line.trim_start();
    line.split_at(line.len() - content.len())
}

fn parse_bullet(line: &str) -> Option<(&str, char)> {
    let (indent, content) = split_indent(line);
    let mut chars = content.chars();
    let marker = chars.next().filter(|c| matches!(c, '-' | '*' | '+'))?;
    chars
        .next()
        .filter(|c| c.is_whitespace())
        .map(|_| (indent, marker))
}

fn parse_ordered(line: &str) -> Option<(&str, &str)> {
    let (indent, content) = split_indent(line);
    let digits_len = content
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(content.len());
    if digits_len == 0 {
        return None;
    }
    let rest = content[digits_len..].strip_prefix('.')?;
    rest.starts_with(char::is_whitespace)
        .then(|| (indent, &content[..digits_len]))
}

fn parse_task(line: &str) -> Option<&str> {
    let (indent, content) = split_indent(line);
    let rest = content.strip_prefix("- [")?;
    let rest = rest.strip_prefix(' ').or_else(|| rest.strip_prefix('x'))?;
    let rest = rest.strip_prefix(']')?;
    rest.starts_with(char::is_whitespace).then_some(indent)
}
