//! Small shared parsing helpers.

/// Splits one CSV line into fields.
///
/// Handles double-quoted fields with `""` escapes; does not handle embedded
/// newlines, which none of the consumed feeds contain. Fields are trimmed.
pub fn split_csv_line(line: &str) -> Vec<String> {
    let mut fields = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;
    let mut chars = line.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '"' if in_quotes => {
                if chars.peek() == Some(&'"') {
                    chars.next();
                    current.push('"');
                } else {
                    in_quotes = false;
                }
            }
            '"' => in_quotes = true,
            ',' if !in_quotes => {
                fields.push(current.trim().to_string());
                current.clear();
            }
            _ => current.push(c),
        }
    }
    fields.push(current.trim().to_string());

    fields
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_plain_fields() {
        assert_eq!(split_csv_line("a,b,c"), vec!["a", "b", "c"]);
        assert_eq!(split_csv_line(" a , b "), vec!["a", "b"]);
    }

    #[test]
    fn respects_quotes_and_escapes() {
        assert_eq!(split_csv_line(r#""a,b",c"#), vec!["a,b", "c"]);
        assert_eq!(split_csv_line(r#""say ""hi""",x"#), vec![r#"say "hi""#, "x"]);
    }

    #[test]
    fn keeps_empty_fields() {
        assert_eq!(split_csv_line("a,,c"), vec!["a", "", "c"]);
        assert_eq!(split_csv_line(""), vec![""]);
    }
}
