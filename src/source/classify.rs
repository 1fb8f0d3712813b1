//! Heuristic executable-line classification for C-family script text.
//!
//! A host with real statement metadata should build a [`LineTable`] directly.
//! This classifier exists for sources that arrive as plain text: a line is
//! executable when, after comments are stripped, it holds something other than
//! structural punctuation or a hoisted function declaration header.
//!
//! [`LineTable`]: super::LineTable

const STRUCTURAL: &[char] = &['{', '}', '(', ')', '[', ']', ';', ','];

/// Lexical state that survives a line break.
#[derive(Debug, Default)]
struct ScanState {
    in_block_comment: bool,
    in_template: bool,
}

/// 1-based executable lines of `text`, in order.
pub fn executable_lines(text: &str) -> Vec<u32> {
    let mut state = ScanState::default();
    let mut lines = Vec::new();

    for (idx, raw) in text.lines().enumerate() {
        let code = strip_comments(raw, &mut state);
        if is_executable(&code) {
            lines.push(idx as u32 + 1);
        }
    }

    lines
}

/// 1-based lines holding a `debugger` statement.
pub fn debugger_statement_lines(text: &str) -> Vec<u32> {
    let mut state = ScanState::default();
    let mut lines = Vec::new();

    for (idx, raw) in text.lines().enumerate() {
        let code = strip_comments(raw, &mut state);
        let has_statement = code
            .split(';')
            .any(|statement| statement.trim() == "debugger");
        if has_statement {
            lines.push(idx as u32 + 1);
        }
    }

    lines
}

fn is_executable(code: &str) -> bool {
    let code = code.trim();
    if code.chars().all(|c| c.is_whitespace() || STRUCTURAL.contains(&c)) {
        return false;
    }
    !is_declaration_header(code)
}

/// `function name(args) {` headers are hoisted and carry no entry point of
/// their own.
fn is_declaration_header(code: &str) -> bool {
    let rest = code
        .strip_prefix("async ")
        .map(str::trim_start)
        .unwrap_or(code);
    let Some(rest) = rest.strip_prefix("function") else {
        return false;
    };
    let starts_name = rest
        .chars()
        .next()
        .map(|c| c.is_whitespace() || c == '*')
        .unwrap_or(false);
    starts_name && rest.trim_end().ends_with('{') && !rest.contains('=')
}

/// Remove `//`, `#!` and `/* */` comments, carrying block comment and
/// template literal state across lines. Quoted strings are skipped so `"//"`
/// inside a literal stays code; template literal bodies are dropped entirely,
/// so a line that only continues a template holds no code of its own.
fn strip_comments(line: &str, state: &mut ScanState) -> String {
    let mut code = String::with_capacity(line.len());
    let mut chars = line.chars().peekable();
    let mut quote: Option<char> = None;

    if !state.in_block_comment && !state.in_template && line.trim_start().starts_with("#!") {
        return code;
    }

    while let Some(ch) = chars.next() {
        if state.in_block_comment {
            if ch == '*' && chars.peek() == Some(&'/') {
                chars.next();
                state.in_block_comment = false;
            }
            continue;
        }

        if state.in_template {
            if ch == '\\' {
                chars.next();
            } else if ch == '`' {
                state.in_template = false;
                code.push(ch);
            }
            continue;
        }

        if let Some(q) = quote {
            code.push(ch);
            if ch == '\\' {
                if let Some(escaped) = chars.next() {
                    code.push(escaped);
                }
            } else if ch == q {
                quote = None;
            }
            continue;
        }

        match ch {
            '`' => {
                state.in_template = true;
                code.push(ch);
            }
            '"' | '\'' => {
                quote = Some(ch);
                code.push(ch);
            }
            '/' if chars.peek() == Some(&'/') => break,
            '/' if chars.peek() == Some(&'*') => {
                chars.next();
                state.in_block_comment = true;
            }
            _ => code.push(ch),
        }
    }

    code
}
