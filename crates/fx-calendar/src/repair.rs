//! JSON 복구 엔진.
//!
//! 페이지에서 캡처한 JavaScript 객체 리터럴을 엄격한 JSON으로 재작성합니다.
//! 복구는 이름 있는 패스들의 고정된 순서로 수행됩니다. 뒤의 패스는 앞의
//! 패스가 입력을 정리했다고 가정하므로 순서를 바꾸면 안 됩니다.
//!
//! 정규식 대신 문자열 스캐너로 구현합니다. 모든 패스는 문자열 리터럴 내부를
//! 추적하여, 예를 들어 값 안의 `//`를 주석 시작으로 오인하지 않습니다.

use tracing::warn;

use crate::{CalendarError, CalendarResult};

/// JavaScript 객체 리터럴을 엄격한 JSON으로 복구.
///
/// 여는 중괄호 경계를 찾지 못하는 경우에만 실패합니다. 중괄호 개수
/// 불일치는 잘림의 신호일 뿐 그 자체로 실패가 아닙니다. 이후의 JSON
/// 파싱 단계가 최종 판정을 내립니다.
pub fn repair(raw: &str) -> CalendarResult<String> {
    let stripped = strip_statement(raw);
    let body = slice_from_first_brace(stripped)?;
    let body = strip_comments(body);
    let body = quote_bare_keys(&body);
    let body = quote_numeric_keys(&body);
    let body = rewrite_literals(&body);
    let body = requote_single_quoted(&body);
    let body = strip_trailing_commas(&body);
    let body = collapse_doubled_quotes(&body);
    check_brace_balance(&body);
    Ok(body)
}

/// 패스 1: 공백 제거, 마지막 문장 종결자 하나 제거.
fn strip_statement(raw: &str) -> &str {
    let trimmed = raw.trim();
    match trimmed.strip_suffix(';') {
        Some(stripped) => stripped.trim_end(),
        None => trimmed,
    }
}

/// 패스 2: 첫 `{` 앞의 접두부(할당 대상, 변수 선언) 제거.
fn slice_from_first_brace(s: &str) -> CalendarResult<&str> {
    s.find('{')
        .map(|idx| &s[idx..])
        .ok_or_else(|| CalendarError::Repair("여는 중괄호 경계 없음".to_string()))
}

/// 패스 3: 한 줄 주석과 블록 주석 제거.
///
/// 문자열 리터럴 내부를 추적하여 값 안의 `//`는 건드리지 않습니다.
fn strip_comments(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut chars = s.chars().peekable();
    let mut in_string: Option<char> = None;
    let mut escaped = false;

    while let Some(c) = chars.next() {
        if let Some(quote) = in_string {
            out.push(c);
            if escaped {
                escaped = false;
            } else if c == '\\' {
                escaped = true;
            } else if c == quote {
                in_string = None;
            }
            continue;
        }

        match c {
            '"' | '\'' => {
                in_string = Some(c);
                out.push(c);
            }
            '/' => match chars.peek() {
                Some('/') => {
                    // 줄 끝까지 제거, 개행은 유지
                    for next in chars.by_ref() {
                        if next == '\n' {
                            out.push('\n');
                            break;
                        }
                    }
                }
                Some('*') => {
                    chars.next();
                    let mut prev = '\0';
                    for next in chars.by_ref() {
                        if prev == '*' && next == '/' {
                            break;
                        }
                        prev = next;
                    }
                }
                _ => out.push(c),
            },
            _ => out.push(c),
        }
    }

    out
}

/// 식별자 시작 문자 여부.
fn is_ident_start(c: char) -> bool {
    c.is_ascii_alphabetic() || c == '_' || c == '$'
}

/// 식별자 구성 문자 여부.
fn is_ident_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_' || c == '$'
}

/// 패스 4: 따옴표 없는 식별자 키에 따옴표 추가.
///
/// 키 위치(`{` 또는 `,` 다음)의 식별자가 `:` 바로 앞에 있을 때만
/// 따옴표를 붙입니다.
fn quote_bare_keys(s: &str) -> String {
    quote_keys(s, is_ident_start, is_ident_char)
}

/// 패스 5: 순수 숫자 키에 따옴표 추가.
fn quote_numeric_keys(s: &str) -> String {
    quote_keys(s, |c| c.is_ascii_digit(), |c| c.is_ascii_digit())
}

/// 키 위치의 토큰에 따옴표를 붙이는 공통 스캐너.
fn quote_keys(s: &str, starts: fn(char) -> bool, continues: fn(char) -> bool) -> String {
    let chars: Vec<char> = s.chars().collect();
    let mut out = String::with_capacity(s.len() + 16);
    let mut in_string: Option<char> = None;
    let mut escaped = false;
    // 직전의 의미 있는(공백 아닌) 문자. 키 위치 판정에 사용
    let mut prev_significant: Option<char> = None;
    let mut i = 0;

    while i < chars.len() {
        let c = chars[i];

        if let Some(quote) = in_string {
            out.push(c);
            if escaped {
                escaped = false;
            } else if c == '\\' {
                escaped = true;
            } else if c == quote {
                in_string = None;
                prev_significant = Some(quote);
            }
            i += 1;
            continue;
        }

        if c == '"' || c == '\'' {
            in_string = Some(c);
            out.push(c);
            i += 1;
            continue;
        }

        if starts(c) && matches!(prev_significant, None | Some('{') | Some(',')) {
            let start = i;
            while i < chars.len() && continues(chars[i]) {
                i += 1;
            }
            // 토큰 바로 뒤가 `:`일 때만 키로 취급
            if i < chars.len() && chars[i] == ':' {
                out.push('"');
                out.extend(chars[start..i].iter());
                out.push('"');
            } else {
                out.extend(chars[start..i].iter());
            }
            prev_significant = Some(chars[i - 1]);
            continue;
        }

        out.push(c);
        if !c.is_whitespace() {
            prev_significant = Some(c);
        }
        i += 1;
    }

    out
}

/// 패스 6: JavaScript/비표준 리터럴을 JSON 리터럴로 변환.
///
/// `undefined` → `null`, `True` → `true`, `False` → `false`.
/// 원본 소스는 대소문자를 구분하는 리터럴 형태를 사용했습니다.
fn rewrite_literals(s: &str) -> String {
    let chars: Vec<char> = s.chars().collect();
    let mut out = String::with_capacity(s.len());
    let mut in_string: Option<char> = None;
    let mut escaped = false;
    let mut i = 0;

    while i < chars.len() {
        let c = chars[i];

        if let Some(quote) = in_string {
            out.push(c);
            if escaped {
                escaped = false;
            } else if c == '\\' {
                escaped = true;
            } else if c == quote {
                in_string = None;
            }
            i += 1;
            continue;
        }

        if c == '"' || c == '\'' {
            in_string = Some(c);
            out.push(c);
            i += 1;
            continue;
        }

        if is_ident_start(c) {
            let start = i;
            while i < chars.len() && is_ident_char(chars[i]) {
                i += 1;
            }
            let token: String = chars[start..i].iter().collect();
            match token.as_str() {
                "undefined" => out.push_str("null"),
                "True" => out.push_str("true"),
                "False" => out.push_str("false"),
                _ => out.push_str(&token),
            }
            continue;
        }

        out.push(c);
        i += 1;
    }

    out
}

/// 패스 7: 작은따옴표 문자열 값을 큰따옴표로 변환.
///
/// 값 안의 이스케이프된 작은따옴표(`\'`)는 일반 문자가 되고,
/// 값 안의 큰따옴표는 이스케이프됩니다.
fn requote_single_quoted(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut chars = s.chars();
    let mut in_double = false;
    let mut escaped = false;

    while let Some(c) = chars.next() {
        if in_double {
            out.push(c);
            if escaped {
                escaped = false;
            } else if c == '\\' {
                escaped = true;
            } else if c == '"' {
                in_double = false;
            }
            continue;
        }

        match c {
            '"' => {
                in_double = true;
                out.push(c);
            }
            '\'' => {
                out.push('"');
                let mut inner_escaped = false;
                for inner in chars.by_ref() {
                    if inner_escaped {
                        if inner == '\'' {
                            out.push('\'');
                        } else {
                            out.push('\\');
                            out.push(inner);
                        }
                        inner_escaped = false;
                    } else if inner == '\\' {
                        inner_escaped = true;
                    } else if inner == '\'' {
                        break;
                    } else if inner == '"' {
                        out.push('\\');
                        out.push('"');
                    } else {
                        out.push(inner);
                    }
                }
                out.push('"');
            }
            _ => out.push(c),
        }
    }

    out
}

/// 패스 8: 닫는 `}` 또는 `]` 앞의 후행 쉼표 제거.
fn strip_trailing_commas(s: &str) -> String {
    let chars: Vec<char> = s.chars().collect();
    let mut out = String::with_capacity(s.len());
    let mut in_string = false;
    let mut escaped = false;
    let mut i = 0;

    while i < chars.len() {
        let c = chars[i];

        if in_string {
            out.push(c);
            if escaped {
                escaped = false;
            } else if c == '\\' {
                escaped = true;
            } else if c == '"' {
                in_string = false;
            }
            i += 1;
            continue;
        }

        if c == '"' {
            in_string = true;
            out.push(c);
            i += 1;
            continue;
        }

        if c == ',' {
            let mut j = i + 1;
            while j < chars.len() && chars[j].is_whitespace() {
                j += 1;
            }
            if j < chars.len() && (chars[j] == '}' || chars[j] == ']') {
                i += 1;
                continue;
            }
        }

        out.push(c);
        i += 1;
    }

    out
}

/// 패스 9: 패스 7과 패스 4가 겹쳐 생긴 이중 따옴표 흔적 정리.
///
/// `""x""` → `"x"`. 정당한 빈 문자열(구분자 사이의 `""`)은 보존합니다.
fn collapse_doubled_quotes(s: &str) -> String {
    let chars: Vec<char> = s.chars().collect();
    let mut out = String::with_capacity(s.len());
    let mut i = 0;

    while i < chars.len() {
        if chars[i] == '"' && i + 1 < chars.len() && chars[i + 1] == '"' {
            let prev_is_content = out
                .chars()
                .last()
                .map(|p| !matches!(p, '{' | '[' | ',' | ':') && !p.is_whitespace())
                .unwrap_or(false);
            let next_is_content = chars
                .get(i + 2)
                .map(|n| !matches!(n, '}' | ']' | ',' | ':') && !n.is_whitespace())
                .unwrap_or(false);
            if prev_is_content || next_is_content {
                out.push('"');
                i += 2;
                continue;
            }
        }
        out.push(chars[i]);
        i += 1;
    }

    out
}

/// 사후 검증: 중괄호 개수 비교 (치명적이지 않음, 로그만).
fn check_brace_balance(s: &str) {
    let mut open = 0usize;
    let mut close = 0usize;
    let mut in_string = false;
    let mut escaped = false;

    for c in s.chars() {
        if in_string {
            if escaped {
                escaped = false;
            } else if c == '\\' {
                escaped = true;
            } else if c == '"' {
                in_string = false;
            }
            continue;
        }
        match c {
            '"' => in_string = true,
            '{' => open += 1,
            '}' => close += 1,
            _ => {}
        }
    }

    if open != close {
        warn!(
            open,
            close, "복구된 페이로드의 중괄호 개수 불일치. 잘림 가능성"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::Value;

    #[test]
    fn test_repair_is_idempotent_on_valid_json() {
        let json = r#"{"name":"CPI YoY","values":[1,2,3],"nested":{"a":"","b":"it's"}}"#;
        assert_eq!(repair(json).unwrap(), json);
    }

    #[test]
    fn test_repair_fails_without_opening_brace() {
        assert!(matches!(
            repair("var calendar = [];"),
            Err(CalendarError::Repair(_))
        ));
    }

    #[test]
    fn test_strip_statement_and_prefix() {
        let raw = "  window.calendarComponentStates[1] = {\"a\": 1};  ";
        assert_eq!(repair(raw).unwrap(), "{\"a\": 1}");
    }

    #[test]
    fn test_strip_comments_respects_strings() {
        let raw = r#"{url: 'http://example.com/x', // trailing comment
            note: "a // not a comment"}"#;
        let fixed = repair(raw).unwrap();
        let value: Value = serde_json::from_str(&fixed).unwrap();
        assert_eq!(value["url"], "http://example.com/x");
        assert_eq!(value["note"], "a // not a comment");
    }

    #[test]
    fn test_block_comments_removed() {
        let raw = "{a: 1, /* block\ncomment */ b: 2}";
        let fixed = repair(raw).unwrap();
        let value: Value = serde_json::from_str(&fixed).unwrap();
        assert_eq!(value["b"], 2);
    }

    #[test]
    fn test_quote_numeric_keys() {
        let raw = "{1: 'one', 22: 'two'}";
        let fixed = repair(raw).unwrap();
        let value: Value = serde_json::from_str(&fixed).unwrap();
        assert_eq!(value["1"], "one");
        assert_eq!(value["22"], "two");
    }

    #[test]
    fn test_rewrite_literals() {
        let raw = "{a: undefined, b: True, c: False}";
        let fixed = repair(raw).unwrap();
        let value: Value = serde_json::from_str(&fixed).unwrap();
        assert_eq!(value["a"], Value::Null);
        assert_eq!(value["b"], true);
        assert_eq!(value["c"], false);
    }

    #[test]
    fn test_escaped_single_quote_in_value() {
        let raw = r"{label: 'it\'s fine'}";
        let fixed = repair(raw).unwrap();
        let value: Value = serde_json::from_str(&fixed).unwrap();
        assert_eq!(value["label"], "it's fine");
    }

    #[test]
    fn test_full_javascript_literal_round_trip() {
        // 중첩 객체 + 따옴표 없는 키 + 작은따옴표 + 후행 쉼표 + undefined
        let raw = r#"var data = {
            days: [
                {
                    date: '2026-08-05',
                    events: [
                        {name: 'CPI YoY', currency: 'USD', impact: 'High', forecast: undefined, values: {nested: {deep: 1}}},
                    ],
                },
            ],
        };"#;
        let fixed = repair(raw).unwrap();
        let value: Value = serde_json::from_str(&fixed).unwrap();

        let expected: Value = serde_json::from_str(
            r#"{
            "days": [
                {
                    "date": "2026-08-05",
                    "events": [
                        {"name": "CPI YoY", "currency": "USD", "impact": "High", "forecast": null, "values": {"nested": {"deep": 1}}}
                    ]
                }
            ]
        }"#,
        )
        .unwrap();
        assert_eq!(value, expected);
    }

    #[test]
    fn test_collapse_doubled_quotes_keeps_empty_strings() {
        let raw = r#"{"a": "", "b": ""x""}"#;
        let fixed = repair(raw).unwrap();
        let value: Value = serde_json::from_str(&fixed).unwrap();
        assert_eq!(value["a"], "");
        assert_eq!(value["b"], "x");
    }

    #[test]
    fn test_brace_mismatch_is_not_fatal() {
        // 잘린 페이로드. 복구는 성공하고 파싱 단계가 실패를 판정
        let raw = "{a: 1, b: {c: 2}";
        let fixed = repair(raw).unwrap();
        assert!(serde_json::from_str::<Value>(&fixed).is_err());
    }
}
