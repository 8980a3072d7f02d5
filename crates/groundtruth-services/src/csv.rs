//! Training-file codec.
//!
//! A training file holds one text per record: the text in the first column
//! followed by zero or more class labels. Fields containing a comma, a
//! double quote or a line break are wrapped in double quotes, with embedded
//! quotes doubled. Blank records are skipped.
//!
//! ```text
//! How hot is it today?,temperature
//! "Is it windy, or calm?",conditions,wind
//! ```

use groundtruth_core::{Error, ImportedData, LabeledText, Result, TrainingSet};

/// Parse a training file into the classes and texts it contains.
///
/// Classes are listed once each, in order of first appearance.
pub fn parse_training_csv(content: &str) -> Result<ImportedData> {
    let mut data = ImportedData::default();

    for (line, fields) in parse_records(content)? {
        if fields.iter().all(Field::is_blank) {
            continue;
        }

        let text = &fields[0];
        if text.is_blank() {
            return Err(Error::Parse {
                line,
                message: "missing text in first column".to_string(),
            });
        }

        let classes: Vec<String> = fields[1..]
            .iter()
            .filter(|f| !f.is_blank())
            .map(|f| f.value().to_string())
            .collect();

        for class in &classes {
            if !data.classes.contains(class) {
                data.classes.push(class.clone());
            }
        }
        data.texts.push(LabeledText {
            text: text.value().to_string(),
            classes,
        });
    }

    Ok(data)
}

/// Render a training set as a training file.
pub fn render_training_csv(set: &TrainingSet) -> String {
    let mut out = String::new();
    for text in &set.texts {
        out.push_str(&escape_field(&text.text));
        for class in &text.classes {
            out.push(',');
            out.push_str(&escape_field(class));
        }
        out.push('\n');
    }
    out
}

fn escape_field(field: &str) -> String {
    let needs_quotes = field.contains([',', '"', '\n', '\r'])
        || field.starts_with(char::is_whitespace)
        || field.ends_with(char::is_whitespace);
    if needs_quotes {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}

/// One raw field. Quoted fields keep their surrounding whitespace.
#[derive(Debug, Default)]
struct Field {
    raw: String,
    quoted: bool,
}

impl Field {
    fn value(&self) -> &str {
        if self.quoted {
            &self.raw
        } else {
            self.raw.trim()
        }
    }

    fn is_blank(&self) -> bool {
        self.raw.trim().is_empty()
    }
}

/// Split content into records of raw fields, each tagged with the line it
/// starts on.
fn parse_records(content: &str) -> Result<Vec<(usize, Vec<Field>)>> {
    let mut records = Vec::new();
    let mut record = Vec::new();
    let mut field = Field::default();
    let mut in_quotes = false;
    let mut line = 1;
    let mut record_line = 1;

    let mut chars = content.chars().peekable();
    while let Some(c) = chars.next() {
        if in_quotes {
            match c {
                '"' if chars.peek() == Some(&'"') => {
                    chars.next();
                    field.raw.push('"');
                }
                '"' => in_quotes = false,
                '\n' => {
                    line += 1;
                    field.raw.push(c);
                }
                _ => field.raw.push(c),
            }
            continue;
        }

        match c {
            '"' if field.raw.is_empty() && !field.quoted => {
                in_quotes = true;
                field.quoted = true;
            }
            ',' => record.push(std::mem::take(&mut field)),
            '\r' if chars.peek() == Some(&'\n') => {}
            '\n' => {
                record.push(std::mem::take(&mut field));
                records.push((record_line, std::mem::take(&mut record)));
                line += 1;
                record_line = line;
            }
            _ => field.raw.push(c),
        }
    }

    if in_quotes {
        return Err(Error::Parse {
            line: record_line,
            message: "unterminated quoted field".to_string(),
        });
    }
    if field.quoted || !field.raw.is_empty() || !record.is_empty() {
        record.push(field);
        records.push((record_line, record));
    }

    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_simple_file() {
        let data = parse_training_csv("text,class\n").unwrap();

        assert_eq!(data.classes, vec!["class"]);
        assert_eq!(data.texts.len(), 1);
        assert_eq!(data.texts[0].text, "text");
        assert_eq!(data.texts[0].classes, vec!["class"]);
    }

    #[test]
    fn test_parse_multiple_classes_and_untagged() {
        let content = "is it hot,temperature,weather\nhello\nis it cold,temperature";
        let data = parse_training_csv(content).unwrap();

        assert_eq!(data.classes, vec!["temperature", "weather"]);
        assert_eq!(data.texts.len(), 3);
        assert!(data.texts[1].classes.is_empty());
        assert_eq!(data.texts[2].classes, vec!["temperature"]);
    }

    #[test]
    fn test_parse_quoted_fields() {
        let content = "\"Is it windy, or calm?\",wind\n\"She said \"\"hi\"\"\",greeting\r\n";
        let data = parse_training_csv(content).unwrap();

        assert_eq!(data.texts[0].text, "Is it windy, or calm?");
        assert_eq!(data.texts[1].text, "She said \"hi\"");
        assert_eq!(data.texts[1].classes, vec!["greeting"]);
    }

    #[test]
    fn test_parse_quoted_newline() {
        let data = parse_training_csv("\"line one\nline two\",multi\nnext,other\n").unwrap();

        assert_eq!(data.texts[0].text, "line one\nline two");
        assert_eq!(data.texts[1].text, "next");
    }

    #[test]
    fn test_parse_keeps_whitespace_inside_quotes() {
        let data = parse_training_csv("  bare  , x \n\"  padded text \", y\n").unwrap();

        assert_eq!(data.texts[0].text, "bare");
        assert_eq!(data.texts[0].classes, vec!["x"]);
        assert_eq!(data.texts[1].text, "  padded text ");
        assert_eq!(data.texts[1].classes, vec!["y"]);
    }

    #[test]
    fn test_parse_skips_blank_lines() {
        let data = parse_training_csv("\n\na,x\n ,\n").unwrap();
        assert_eq!(data.texts.len(), 1);
    }

    #[test]
    fn test_parse_unterminated_quote() {
        let err = parse_training_csv("ok,x\n\"broken,y\n").unwrap_err();
        match err {
            Error::Parse { line, .. } => assert_eq!(line, 2),
            other => panic!("Expected Parse error, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_missing_text() {
        let err = parse_training_csv("a,x\n,orphan\n").unwrap_err();
        assert!(matches!(err, Error::Parse { line: 2, .. }));
    }

    #[test]
    fn test_render_escapes_fields() {
        let set = TrainingSet {
            texts: vec![
                LabeledText {
                    text: "plain".into(),
                    classes: vec!["a".into(), "b".into()],
                },
                LabeledText {
                    text: "with, comma and \"quote\"".into(),
                    classes: vec![],
                },
            ],
        };

        assert_eq!(
            render_training_csv(&set),
            "plain,a,b\n\"with, comma and \"\"quote\"\"\"\n"
        );
    }

    #[test]
    fn test_rendered_file_parses_back() {
        let set = TrainingSet {
            texts: vec![
                LabeledText {
                    text: "multi\nline, text".into(),
                    classes: vec!["x".into()],
                },
                LabeledText {
                    text: "second".into(),
                    classes: vec!["y".into(), "x".into()],
                },
                LabeledText {
                    text: "  padded text ".into(),
                    classes: vec!["x".into()],
                },
            ],
        };

        let data = parse_training_csv(&render_training_csv(&set)).unwrap();
        assert_eq!(data.texts, set.texts);
        assert_eq!(data.classes, vec!["x", "y"]);
    }
}
