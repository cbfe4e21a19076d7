//! Turning free-form generator output into validated questions.

use quiz_core::model::{Question, QuestionDraft};
use serde_json::Value;

use crate::error::{ParseError, SchemaViolation};

/// Locate the JSON document inside generated text.
///
/// A fenced code block whose body starts with `[` or `{` wins. Next comes the
/// whole trimmed text when it parses as JSON. Otherwise the text is scanned for
/// balanced arrays and objects (brackets inside string literals ignored) and
/// the first one that parses is returned, preferring an object or an array of
/// objects over bracketed asides like `[10]`.
#[must_use]
pub fn extract_json(text: &str) -> Option<&str> {
    fenced_block(text)
        .or_else(|| whole_text(text))
        .or_else(|| first_balanced(text))
}

fn whole_text(text: &str) -> Option<&str> {
    let trimmed = text.trim();
    if !trimmed.starts_with(['[', '{']) {
        return None;
    }
    serde_json::from_str::<Value>(trimmed).ok().map(|_| trimmed)
}

fn fenced_block(text: &str) -> Option<&str> {
    let mut rest = text;
    while let Some(open) = rest.find("```") {
        let after = &rest[open + 3..];
        let line_end = after.find('\n').unwrap_or(after.len());
        let body = if after[..line_end].trim_start().starts_with(['[', '{']) {
            after
        } else {
            &after[(line_end + 1).min(after.len())..]
        };

        let close = body.find("```")?;
        let candidate = body[..close].trim();
        if candidate.starts_with(['[', '{']) {
            return Some(candidate);
        }
        rest = &body[close + 3..];
    }
    None
}

fn first_balanced(text: &str) -> Option<&str> {
    let mut fallback = None;
    let starts = text
        .char_indices()
        .filter(|&(_, c)| matches!(c, '[' | '{'))
        .map(|(start, _)| start);

    for start in starts {
        let Some(candidate) = balanced_from(text, start) else {
            continue;
        };
        let Ok(value) = serde_json::from_str::<Value>(candidate) else {
            continue;
        };
        if looks_like_payload(&value) {
            return Some(candidate);
        }
        if fallback.is_none() {
            fallback = Some(candidate);
        }
    }
    fallback
}

fn looks_like_payload(value: &Value) -> bool {
    match value {
        Value::Object(_) => true,
        Value::Array(items) => !items.is_empty() && items.iter().all(Value::is_object),
        _ => false,
    }
}

fn balanced_from(text: &str, start: usize) -> Option<&str> {
    let mut closers: Vec<char> = Vec::new();
    let mut in_string = false;
    let mut escaped = false;

    for (offset, c) in text[start..].char_indices() {
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
            '[' => closers.push(']'),
            '{' => closers.push('}'),
            ']' | '}' => {
                if closers.pop() != Some(c) {
                    return None;
                }
                if closers.is_empty() {
                    let end = start + offset + c.len_utf8();
                    return Some(&text[start..end]);
                }
            }
            _ => {}
        }
    }
    None
}

/// Parse generator output into questions, dropping items that fail validation.
///
/// Accepts a top-level array of items or an object with a single key holding
/// that array (e.g. `{"questions": [...]}`). The result may be empty; deciding
/// whether that is an error is up to the caller.
///
/// # Errors
///
/// Returns `ParseError` when no JSON can be found, it does not parse, or its
/// shape is neither of the accepted forms.
pub fn parse_generated(text: &str) -> Result<Vec<Question>, ParseError> {
    let json = extract_json(text).ok_or(ParseError::NoJson)?;
    let value: Value = serde_json::from_str(json)?;
    let items = candidate_items(value)?;
    let offered = items.len();

    let questions: Vec<Question> = items
        .into_iter()
        .enumerate()
        .filter_map(|(index, item)| match validate_item(item) {
            Ok(question) => Some(question),
            Err(reason) => {
                tracing::debug!(index, %reason, "dropping generated question");
                None
            }
        })
        .collect();

    if questions.len() < offered {
        tracing::info!(
            offered,
            kept = questions.len(),
            "generated questions failed validation"
        );
    }

    Ok(questions)
}

/// Validate one generated item.
///
/// # Errors
///
/// Returns `SchemaViolation` when the item is not a question object or breaks
/// the question invariant.
pub fn validate_item(item: Value) -> Result<Question, SchemaViolation> {
    let draft: QuestionDraft = serde_json::from_value(item).map_err(SchemaViolation::Malformed)?;
    Ok(draft.validate()?)
}

fn candidate_items(value: Value) -> Result<Vec<Value>, ParseError> {
    match value {
        Value::Array(items) => Ok(items),
        Value::Object(map) if map.len() == 1 => match map.into_iter().next() {
            Some((_, Value::Array(items))) => Ok(items),
            _ => Err(ParseError::UnexpectedShape(
                "wrapper key does not hold an array",
            )),
        },
        Value::Object(_) => Err(ParseError::UnexpectedShape(
            "object must have exactly one key",
        )),
        _ => Err(ParseError::UnexpectedShape("expected an array or object")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quiz_core::model::QuestionError;

    const ITEM: &str = r#"{"question":"2+2?","options":["1","2","3","4"],"answer":"4","subject":"Maths"}"#;

    #[test]
    fn plain_array_is_returned_whole() {
        let text = format!("[{ITEM}]");
        assert_eq!(extract_json(&text), Some(text.as_str()));
    }

    #[test]
    fn fenced_json_block_is_preferred() {
        let text = format!("Sure! Here you go:\n```json\n[{ITEM}]\n```\nHave fun [really]!");
        assert_eq!(extract_json(&text), Some(format!("[{ITEM}]").as_str()));
    }

    #[test]
    fn fence_without_language_tag() {
        let text = "```\n{\"questions\": []}\n```";
        assert_eq!(extract_json(text), Some("{\"questions\": []}"));
    }

    #[test]
    fn fence_with_json_on_the_opening_line() {
        let text = "```[1, 2]```";
        assert_eq!(extract_json(text), Some("[1, 2]"));
    }

    #[test]
    fn non_json_fence_is_skipped() {
        let text = "```text\nnot json\n```\n```json\n[]\n```";
        assert_eq!(extract_json(text), Some("[]"));
    }

    #[test]
    fn unterminated_fence_falls_back_to_balanced_scan() {
        let text = "```json\n[1, [2, 3]] trailing";
        assert_eq!(extract_json(text), Some("[1, [2, 3]]"));
    }

    #[test]
    fn brackets_inside_strings_do_not_confuse_the_scan() {
        let text = r#"Answer: {"a": "close ] and } \" quote", "b": [1]} done"#;
        assert_eq!(
            extract_json(text),
            Some(r#"{"a": "close ] and } \" quote", "b": [1]}"#)
        );
    }

    #[test]
    fn bracketed_count_in_lead_in_is_skipped() {
        let text = format!("Here are your [10] questions:\n[{ITEM}]");
        assert_eq!(extract_json(&text), Some(format!("[{ITEM}]").as_str()));
        assert_eq!(parse_generated(&text).unwrap().len(), 1);
    }

    #[test]
    fn bracketed_words_that_are_not_json_are_skipped() {
        let text = format!("Quiz (see [below]):\n[{ITEM}, {ITEM}]");
        assert_eq!(extract_json(&text), Some(format!("[{ITEM}, {ITEM}]").as_str()));
        assert_eq!(parse_generated(&text).unwrap().len(), 2);
    }

    #[test]
    fn scalar_array_is_kept_when_nothing_better_follows() {
        assert_eq!(extract_json("Counts: [1, 2] and [3]"), Some("[1, 2]"));
    }

    #[test]
    fn whole_text_is_used_when_it_parses() {
        let text = format!("  \n[{ITEM}]\n  ");
        assert_eq!(extract_json(&text), Some(format!("[{ITEM}]").as_str()));
    }

    #[test]
    fn mismatched_brackets_yield_nothing() {
        assert_eq!(extract_json("[1, 2}"), None);
        assert_eq!(extract_json("no json here"), None);
    }

    #[test]
    fn parses_wrapped_object() {
        let text = format!(r#"{{"questions": [{ITEM}, {ITEM}]}}"#);
        let questions = parse_generated(&text).unwrap();
        assert_eq!(questions.len(), 2);
        assert_eq!(questions[0].correct_option(), "4");
    }

    #[test]
    fn drops_items_that_fail_validation() {
        let text = format!(
            r#"[
                {ITEM},
                {{"question":"no answer","options":["a","b","c","d"],"subject":"S"}},
                {{"question":"three","options":["a","b","c"],"answer":"a","subject":"S"}},
                {{"question":"typed","options":[1,2,3,4],"answer":"1","subject":"S"}},
                "just a string",
                {{"question":"Pick","options":["w","x","y","z"],"answer":"y","subject":"S","explanation":"why"}}
            ]"#
        );
        let questions = parse_generated(&text).unwrap();
        assert_eq!(questions.len(), 2);
        assert_eq!(questions[1].explanation(), Some("why"));
    }

    #[test]
    fn all_items_dropped_gives_empty_list() {
        let text = r#"[{"question":"Q","options":["a","a","b","c"],"answer":"a","subject":"S"}]"#;
        assert!(parse_generated(text).unwrap().is_empty());
    }

    #[test]
    fn parse_errors_are_classified() {
        assert!(matches!(parse_generated("nothing"), Err(ParseError::NoJson)));
        assert!(matches!(
            parse_generated("```json\n[1, 2,]\n```"),
            Err(ParseError::Json(_))
        ));
        assert!(matches!(parse_generated("[1, 2,]"), Err(ParseError::NoJson)));
        assert!(matches!(
            parse_generated(r#"{"a": [], "b": []}"#),
            Err(ParseError::UnexpectedShape(_))
        ));
        assert!(matches!(
            parse_generated(r#"{"questions": 3}"#),
            Err(ParseError::UnexpectedShape(_))
        ));
    }

    #[test]
    fn validate_item_reports_reason() {
        let item: Value = serde_json::from_str(
            r#"{"question":"Q","options":["a","b","c","d"],"answer":"e","subject":"S"}"#,
        )
        .unwrap();
        let err = validate_item(item).unwrap_err();
        assert!(matches!(
            err,
            SchemaViolation::Invalid(QuestionError::AnswerNotInOptions(_))
        ));

        let err = validate_item(Value::from(7)).unwrap_err();
        assert!(matches!(err, SchemaViolation::Malformed(_)));
    }
}
