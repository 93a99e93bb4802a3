//! Splits raw source into `;`-terminated statements.
//!
//! Comments are blanked out with spaces (newlines kept) so every statement's
//! text still lines up with the original source. `;` and comment markers
//! inside double-quoted strings are left alone.

use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Statement {
    pub text: String,
    /// 1-based position of the statement's first character in the source.
    pub line: usize,
    pub column: usize,
}

pub fn split_statements(source: &str) -> Vec<Statement> {
    let mut splitter = Splitter::default();
    let chars: Vec<char> = source.chars().collect();
    let mut i = 0;

    while i < chars.len() {
        let c = chars[i];
        let next = chars.get(i + 1).copied();
        match (c, next) {
            ('"', _) => {
                splitter.push(c);
                i += 1;
                while i < chars.len() {
                    let s = chars[i];
                    splitter.push(s);
                    i += 1;
                    if s == '"' {
                        break;
                    }
                }
                continue;
            }
            ('/', Some('/')) => {
                while i < chars.len() && chars[i] != '\n' {
                    splitter.blank(chars[i]);
                    i += 1;
                }
                continue;
            }
            ('/', Some('*')) => {
                splitter.blank('/');
                splitter.blank('*');
                i += 2;
                while i < chars.len() {
                    if chars[i] == '*' && chars.get(i + 1) == Some(&'/') {
                        splitter.blank('*');
                        splitter.blank('/');
                        i += 2;
                        break;
                    }
                    splitter.blank(chars[i]);
                    i += 1;
                }
                continue;
            }
            (';', _) => {
                splitter.advance(c);
                splitter.flush();
            }
            _ => splitter.push(c),
        }
        i += 1;
    }
    splitter.flush();
    splitter.out
}

struct Splitter {
    out: Vec<Statement>,
    current: String,
    start: Option<(usize, usize)>,
    line: usize,
    col: usize,
}

impl Default for Splitter {
    fn default() -> Self {
        Self { out: Vec::new(), current: String::new(), start: None, line: 1, col: 1 }
    }
}

impl Splitter {
    /// Keep a character that belongs to the statement text.
    fn push(&mut self, c: char) {
        if self.start.is_none() && !c.is_whitespace() {
            self.start = Some((self.line, self.col));
        }
        self.current.push(c);
        self.advance(c);
    }

    /// Replace a comment character, preserving line breaks.
    fn blank(&mut self, c: char) {
        self.current.push(if c == '\n' { '\n' } else { ' ' });
        self.advance(c);
    }

    fn advance(&mut self, c: char) {
        if c == '\n' {
            self.line += 1;
            self.col = 1;
        } else {
            self.col += 1;
        }
    }

    fn flush(&mut self) {
        let text = self.current.trim();
        if let (false, Some((line, column))) = (text.is_empty(), self.start) {
            self.out.push(Statement { text: text.to_string(), line, column });
        }
        self.current.clear();
        self.start = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn texts(src: &str) -> Vec<String> {
        split_statements(src).into_iter().map(|s| s.text).collect()
    }

    #[test]
    fn splits_and_drops_empty_statements() {
        assert_eq!(texts("let int x = 1;; log(x);  ;\n"), vec!["let int x = 1", "log(x)"]);
        assert!(texts("   \n\t").is_empty());
    }

    #[test]
    fn keeps_unterminated_tail() {
        assert_eq!(texts("log(1); log(2)"), vec!["log(1)", "log(2)"]);
    }

    #[test]
    fn comments_are_blanked() {
        let stmts = split_statements("// header; not a statement\nlet /* a;b */ int x = 1;");
        assert_eq!(stmts.len(), 1);
        assert_eq!(stmts[0].text, format!("let{}int x = 1", " ".repeat(11)));
        assert_eq!((stmts[0].line, stmts[0].column), (2, 1));
    }

    #[test]
    fn strings_protect_separators() {
        assert_eq!(
            texts(r#"let string s = "a; // b"; log(s);"#),
            vec![r#"let string s = "a; // b""#, "log(s)"]
        );
    }

    #[test]
    fn records_start_positions() {
        let stmts = split_statements("let int a = 1;\n  log(a);\n/* c */ log(2);");
        let pos: Vec<(usize, usize)> = stmts.iter().map(|s| (s.line, s.column)).collect();
        assert_eq!(pos, vec![(1, 1), (2, 3), (3, 9)]);
    }

    #[test]
    fn multiline_block_comment_keeps_lines() {
        let stmts = split_statements("let int a =\n/* one\ntwo */ 5;");
        assert_eq!(stmts[0].text, format!("let int a =\n{}\n{}5", " ".repeat(6), " ".repeat(7)));
    }
}
