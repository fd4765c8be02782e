//! 行の解析
//!
//! バッファ内容を単語列に分解する。確定時には構文的に閉じているかを判定し、
//! 閉じていなければ複数行入力として継続させる。

use thiserror::Error;

/// 解析の目的
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParseContext {
    /// accept-line による確定
    AcceptLine,
    /// 補完のための解析（閉じていない引用符を許容する）
    Complete,
}

/// 解析エラー
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    /// 行が未完了（続きの入力が必要）
    #[error("Incomplete input: missing {missing}")]
    Incomplete { missing: String },

    #[error("Syntax error: {0}")]
    Syntax(String),
}

/// 解析済みの行
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ParsedLine {
    /// 元の行
    pub line: String,
    /// 行内のカーソル位置（文字単位）
    pub cursor: usize,
    /// 引用符を外した単語
    pub words: Vec<String>,
    /// 各単語の元の行での範囲（文字単位、引用符を含む）
    pub spans: Vec<(usize, usize)>,
    /// カーソルを含む単語
    pub word_index: usize,
    /// 単語内でのカーソル位置（引用符を外した文字数）
    pub word_cursor: usize,
}

impl ParsedLine {
    /// カーソルを含む単語
    pub fn word(&self) -> &str {
        self.words.get(self.word_index).map(String::as_str).unwrap_or("")
    }

    /// カーソルより前の部分
    pub fn word_prefix(&self) -> String {
        self.word().chars().take(self.word_cursor).collect()
    }

    /// カーソルを含む単語の行内範囲
    pub fn word_span(&self) -> (usize, usize) {
        self.spans.get(self.word_index).copied().unwrap_or((self.cursor, self.cursor))
    }
}

/// 行解析器
pub trait Parser {
    fn parse(&self, line: &str, cursor: usize, context: ParseContext) -> Result<ParsedLine, ParseError>;
}

/// 空白区切り、`'` `"` の引用符、`\` エスケープを解釈する解析器
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultParser;

struct RawWord {
    text: String,
    start: usize,
    end: usize,
    /// 各文字の元の位置
    positions: Vec<usize>,
}

impl Parser for DefaultParser {
    fn parse(&self, line: &str, cursor: usize, context: ParseContext) -> Result<ParsedLine, ParseError> {
        let chars: Vec<char> = line.chars().collect();
        let cursor = cursor.min(chars.len());
        let mut words: Vec<RawWord> = Vec::new();
        let mut current: Option<RawWord> = None;
        let mut quote: Option<char> = None;
        let mut i = 0;

        while i < chars.len() {
            let c = chars[i];
            match (quote, c) {
                (None, c) if c.is_whitespace() => {
                    if let Some(mut word) = current.take() {
                        word.end = i;
                        words.push(word);
                    }
                }
                (Some(q), c) if c == q => {
                    quote = None;
                }
                (None, '\'' | '"') => {
                    quote = Some(c);
                    current.get_or_insert_with(|| RawWord::new(i));
                }
                (q, '\\') if q != Some('\'') => {
                    let word = current.get_or_insert_with(|| RawWord::new(i));
                    match chars.get(i + 1) {
                        Some(&next) => {
                            word.text.push(next);
                            word.positions.push(i + 1);
                            i += 1;
                        }
                        None if context == ParseContext::AcceptLine => {
                            return Err(ParseError::Incomplete { missing: "escaped character".to_string() });
                        }
                        None => {}
                    }
                }
                (_, c) => {
                    let word = current.get_or_insert_with(|| RawWord::new(i));
                    word.text.push(c);
                    word.positions.push(i);
                }
            }
            i += 1;
        }

        if let Some(q) = quote {
            if context == ParseContext::AcceptLine {
                return Err(ParseError::Incomplete { missing: format!("closing {}", q) });
            }
        }
        if let Some(mut word) = current.take() {
            word.end = chars.len();
            words.push(word);
        }

        // カーソルを含む単語。空白上なら空の単語を差し込む
        let index = words.iter().position(|w| w.start <= cursor && cursor <= w.end);
        let (word_index, word_cursor) = match index {
            Some(idx) => {
                let cursor_in_word = words[idx].positions.iter().filter(|&&p| p < cursor).count();
                (idx, cursor_in_word)
            }
            None => {
                let idx = words.iter().position(|w| w.start > cursor).unwrap_or(words.len());
                words.insert(idx, RawWord::new(cursor));
                (idx, 0)
            }
        };

        Ok(ParsedLine {
            line: line.to_string(),
            cursor,
            spans: words.iter().map(|w| (w.start, w.end.max(w.start))).collect(),
            words: words.into_iter().map(|w| w.text).collect(),
            word_index,
            word_cursor,
        })
    }
}

impl RawWord {
    fn new(start: usize) -> Self {
        Self {
            text: String::new(),
            start,
            end: start,
            positions: Vec::new(),
        }
    }
}
