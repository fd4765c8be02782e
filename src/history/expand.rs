//! ヒストリ展開
//!
//! `!!` `!n` `!-n` `!$` `!#` `!prefix` `!?text?` と行頭の `^old^new` を展開する。
//! `\!` はそのまま `!` になる。

use super::History;
use thiserror::Error;

/// 展開エラー
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ExpandError {
    #[error("{0}: event not found")]
    EventNotFound(String),

    #[error("{0}: substitution failed")]
    SubstitutionFailed(String),
}

/// 行中のヒストリ参照を展開する
pub fn expand_events(line: &str, history: &dyn History) -> Result<String, ExpandError> {
    if let Some(rest) = line.strip_prefix('^') {
        return expand_quick_substitution(rest, history);
    }

    let chars: Vec<char> = line.chars().collect();
    let mut out = String::with_capacity(line.len());
    let mut i = 0;
    while i < chars.len() {
        let c = chars[i];
        match c {
            '\\' if chars.get(i + 1) == Some(&'!') => {
                out.push('!');
                i += 2;
            }
            '!' => {
                let (expanded, consumed) = expand_event(&chars[i + 1..], &out, history)?;
                out.push_str(&expanded);
                i += 1 + consumed;
            }
            _ => {
                out.push(c);
                i += 1;
            }
        }
    }
    Ok(out)
}

/// `!` の直後から1イベント分を展開し、(展開結果, 消費した文字数) を返す
fn expand_event(rest: &[char], so_far: &str, history: &dyn History) -> Result<(String, usize), ExpandError> {
    let last = || last_entry(history).ok_or_else(|| ExpandError::EventNotFound("!".to_string()));
    match rest.first() {
        None => Ok(("!".to_string(), 0)),
        Some(c) if c.is_whitespace() || *c == '=' || *c == '(' => Ok(("!".to_string(), 0)),
        Some('!') => Ok((last()?, 1)),
        Some('$') => {
            let entry = last()?;
            let word = entry.split_whitespace().last().unwrap_or("").to_string();
            Ok((word, 1))
        }
        Some('#') => Ok((so_far.to_string(), 1)),
        Some('?') => {
            let body: String = rest[1..].iter().take_while(|&&c| c != '?').collect();
            let closing = usize::from(rest.len() > body.chars().count() + 1);
            let found = (0..history.len())
                .rev()
                .filter_map(|i| history.get(i))
                .find(|entry| entry.contains(body.as_str()))
                .map(str::to_string)
                .ok_or_else(|| ExpandError::EventNotFound(format!("!?{}", body)))?;
            Ok((found, 1 + body.chars().count() + closing))
        }
        Some('-') if rest.get(1).is_some_and(|c| c.is_ascii_digit()) => {
            let digits: String = rest[1..].iter().take_while(|c| c.is_ascii_digit()).collect();
            let n: usize = digits.parse().unwrap_or(0);
            let found = history
                .len()
                .checked_sub(n)
                .filter(|_| n > 0)
                .and_then(|i| history.get(i))
                .map(str::to_string)
                .ok_or_else(|| ExpandError::EventNotFound(format!("!-{}", digits)))?;
            Ok((found, 1 + digits.len()))
        }
        Some(c) if c.is_ascii_digit() => {
            let digits: String = rest.iter().take_while(|c| c.is_ascii_digit()).collect();
            let n: usize = digits.parse().unwrap_or(0);
            let found = n
                .checked_sub(1)
                .and_then(|i| history.get(i))
                .map(str::to_string)
                .ok_or_else(|| ExpandError::EventNotFound(format!("!{}", digits)))?;
            Ok((found, digits.len()))
        }
        Some(_) => {
            let prefix: String = rest
                .iter()
                .take_while(|c| !c.is_whitespace() && !matches!(c, ':' | ';' | '|' | '&'))
                .collect();
            let found = (0..history.len())
                .rev()
                .filter_map(|i| history.get(i))
                .find(|entry| entry.starts_with(prefix.as_str()))
                .map(str::to_string)
                .ok_or_else(|| ExpandError::EventNotFound(format!("!{}", prefix)))?;
            Ok((found, prefix.chars().count()))
        }
    }
}

fn expand_quick_substitution(rest: &str, history: &dyn History) -> Result<String, ExpandError> {
    let mut parts = rest.splitn(3, '^');
    let old = parts.next().unwrap_or("");
    let new = parts.next().unwrap_or("");
    let tail = parts.next().unwrap_or("");
    let entry = last_entry(history).ok_or_else(|| ExpandError::EventNotFound("^".to_string()))?;
    if old.is_empty() || !entry.contains(old) {
        return Err(ExpandError::SubstitutionFailed(format!("^{}", old)));
    }
    let mut out = entry.replacen(old, new, 1);
    out.push_str(tail);
    Ok(out)
}

fn last_entry(history: &dyn History) -> Option<String> {
    history.len().checked_sub(1).and_then(|i| history.get(i)).map(str::to_string)
}
