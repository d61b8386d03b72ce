//! Canonicalization of printed Go text.
//!
//! Input is the printer's output: one construct per line, no indentation,
//! alignment cells separated by [`CELL`]. Output is tab-indented by bracket
//! depth with aligned cells, sorted import blocks and tidy blank lines,
//! ending in exactly one newline.

use super::{RenderError, RenderResult, printer::CELL};

struct Line {
    depth: usize,
    text: String,
}

pub fn canonicalize(raw: &str) -> RenderResult<String> {
    let lines: Vec<String> = raw.lines().map(|l| l.trim().to_string()).collect();
    let lines = sort_import_blocks(lines);
    let mut lines = indent(lines)?;
    drop_blank_lines(&mut lines);
    align(&mut lines);

    let mut out = String::with_capacity(raw.len() + raw.len() / 4);
    for line in &lines {
        if !line.text.is_empty() {
            for _ in 0..line.depth {
                out.push('\t');
            }
            out.push_str(line.text.trim_end());
        }
        out.push('\n');
    }
    Ok(out)
}

// ── imports ──────────────────────────────────────────────────────────────────

fn sort_import_blocks(lines: Vec<String>) -> Vec<String> {
    let mut out = Vec::with_capacity(lines.len());
    let mut block: Option<Vec<String>> = None;

    for line in lines {
        match block.as_mut() {
            None if line == "import (" => {
                out.push(line);
                block = Some(Vec::new());
            }
            None => out.push(line),
            Some(specs) if line == ")" => {
                specs.sort_by(|a, b| import_path(a).cmp(import_path(b)).then_with(|| a.cmp(b)));
                specs.dedup();
                out.append(specs);
                out.push(line);
                block = None;
            }
            Some(specs) => {
                if !line.is_empty() {
                    specs.push(line);
                }
            }
        }
    }
    if let Some(mut specs) = block {
        out.append(&mut specs);
    }
    out
}

/// The quoted path of an import spec line, alias ignored.
fn import_path(spec: &str) -> &str {
    match (spec.find('"'), spec.rfind('"')) {
        (Some(start), Some(end)) if end > start => &spec[start + 1..end],
        _ => spec,
    }
}

// ── indentation ──────────────────────────────────────────────────────────────

/// Assigns each line its nesting depth.
///
/// The stack holds, per open level, how many brackets opened it. Closers at
/// the start of a line dedent that line itself.
fn indent(lines: Vec<String>) -> RenderResult<Vec<Line>> {
    let mut stack: Vec<usize> = Vec::new();
    let mut out = Vec::with_capacity(lines.len());

    for (n, text) in lines.into_iter().enumerate() {
        let line_no = n + 1;
        let brackets = brackets(&text);
        let leading = text.chars().take_while(|c| is_closer(*c)).count();

        let close = |stack: &mut Vec<usize>| -> RenderResult<()> {
            let top = stack
                .last_mut()
                .ok_or(RenderError::UnbalancedBrackets { line: line_no })?;
            *top -= 1;
            if *top == 0 {
                stack.pop();
            }
            Ok(())
        };

        for _ in 0..leading {
            close(&mut stack)?;
        }
        let depth = stack.len();

        let mut open = 0usize;
        for b in brackets.into_iter().skip(leading) {
            if is_closer(b) {
                if open > 0 {
                    open -= 1;
                } else {
                    close(&mut stack)?;
                }
            } else {
                open += 1;
            }
        }
        if open > 0 {
            stack.push(open);
        }

        out.push(Line { depth, text });
    }

    if !stack.is_empty() {
        return Err(RenderError::UnbalancedBrackets { line: out.len() });
    }
    Ok(out)
}

fn is_closer(c: char) -> bool {
    matches!(c, ')' | ']' | '}')
}

/// Brackets outside string, rune and raw literals and line comments.
fn brackets(line: &str) -> Vec<char> {
    let mut found = Vec::new();
    let mut chars = line.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '"' | '\'' => {
                while let Some(next) = chars.next() {
                    if next == '\\' {
                        chars.next();
                    } else if next == c {
                        break;
                    }
                }
            }
            '`' => {
                for next in chars.by_ref() {
                    if next == '`' {
                        break;
                    }
                }
            }
            '/' if chars.peek() == Some(&'/') => break,
            '(' | '[' | '{' | ')' | ']' | '}' => found.push(c),
            _ => {}
        }
    }
    found
}

// ── blank lines ──────────────────────────────────────────────────────────────

fn drop_blank_lines(lines: &mut Vec<Line>) {
    let mut kept: Vec<Line> = Vec::with_capacity(lines.len());

    for line in lines.drain(..) {
        if line.text.is_empty() {
            let after_open = match kept.last() {
                None => true,
                Some(prev) => prev.text.is_empty() || prev.text.ends_with(['{', '(']),
            };
            if after_open {
                continue;
            }
        } else if line.text.starts_with(['}', ')']) {
            while kept.last().is_some_and(|l| l.text.is_empty()) {
                kept.pop();
            }
        }
        kept.push(line);
    }

    while kept.last().is_some_and(|l| l.text.is_empty()) {
        kept.pop();
    }
    *lines = kept;
}

// ── alignment ────────────────────────────────────────────────────────────────

/// Aligns runs of consecutive cell lines at the same depth.
fn align(lines: &mut [Line]) {
    let mut i = 0;
    while i < lines.len() {
        if !lines[i].text.contains(CELL) {
            i += 1;
            continue;
        }

        let depth = lines[i].depth;
        let mut j = i;
        while j < lines.len() && lines[j].depth == depth && lines[j].text.contains(CELL) {
            j += 1;
        }
        align_run(&mut lines[i..j]);
        i = j;
    }
}

/// Pads every non-final cell to its column width plus one blank, like a
/// tabwriter: a column block is broken by any line lacking that column.
fn align_run(run: &mut [Line]) {
    let mut rows: Vec<Vec<String>> = run
        .iter()
        .map(|l| l.text.split(CELL).map(str::to_string).collect())
        .collect();
    let columns = rows.iter().map(Vec::len).max().unwrap_or(0).saturating_sub(1);

    for col in 0..columns {
        let mut start = 0;
        while start < rows.len() {
            if rows[start].len() <= col + 1 {
                start += 1;
                continue;
            }
            let mut end = start;
            while end < rows.len() && rows[end].len() > col + 1 {
                end += 1;
            }

            let width = rows[start..end]
                .iter()
                .map(|r| r[col].chars().count())
                .max()
                .unwrap_or(0);
            for row in &mut rows[start..end] {
                let pad = width + 1 - row[col].chars().count();
                row[col].push_str(&" ".repeat(pad));
            }
            start = end;
        }
    }

    for (line, row) in run.iter_mut().zip(rows) {
        line.text = row.concat();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn indents_by_bracket_depth() {
        let raw = "func f() {\nif x {\ny()\n}\n}\n";
        assert_eq!(
            canonicalize(raw).unwrap(),
            "func f() {\n\tif x {\n\t\ty()\n\t}\n}\n"
        );
    }

    #[test]
    fn several_openers_on_one_line_indent_once() {
        let raw = "f(g(T{\nA:\x0b1,\nBcd:\x0b2,\n}))\n";
        assert_eq!(
            canonicalize(raw).unwrap(),
            "f(g(T{\n\tA:   1,\n\tBcd: 2,\n}))\n"
        );
    }

    #[test]
    fn brackets_inside_literals_are_ignored() {
        let raw = "x := \"{(\"\ny := `}`\nz := '{' // }\n";
        assert_eq!(
            canonicalize(raw).unwrap(),
            "x := \"{(\"\ny := `}`\nz := '{' // }\n"
        );
    }

    #[test]
    fn unbalanced_input_is_an_error() {
        assert_eq!(
            canonicalize("}\n"),
            Err(RenderError::UnbalancedBrackets { line: 1 })
        );
        assert!(matches!(
            canonicalize("func f() {\n"),
            Err(RenderError::UnbalancedBrackets { .. })
        ));
    }

    #[test]
    fn import_blocks_are_sorted_and_deduplicated() {
        let raw = "import (\n\"net/http\"\nchi \"github.com/go-chi/chi/v5\"\n\"log\"\n\"log\"\n)\n";
        assert_eq!(
            canonicalize(raw).unwrap(),
            "import (\n\tchi \"github.com/go-chi/chi/v5\"\n\t\"log\"\n\t\"net/http\"\n)\n"
        );
    }

    #[test]
    fn struct_tags_break_type_column_blocks() {
        let raw = "type T struct {\nName\x0bstring\x0b`json:\"name\"`\nData\x0bjson.RawMessage\x0b`json:\"data\"`\nN\x0bint\n}\n";
        assert_eq!(
            canonicalize(raw).unwrap(),
            "type T struct {\n\tName string          `json:\"name\"`\n\tData json.RawMessage `json:\"data\"`\n\tN    int\n}\n"
        );
    }

    #[test]
    fn blank_lines_are_normalized() {
        let raw = "\n\npackage x\n\n\n\nfunc f() {\n\ny()\n\n}\n\n\n";
        assert_eq!(canonicalize(raw).unwrap(), "package x\n\nfunc f() {\n\ty()\n}\n");
    }
}
