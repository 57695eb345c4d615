use std::{iter::Peekable, str::Chars};

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum OperationKind {
    Query,
    Mutation,
    Subscription,
    Fragment,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Definition {
    pub kind: OperationKind,
    pub name: Option<String>,
}

impl Definition {
    fn from_header(header: &[String]) -> Self {
        let kind = match header.first().map(String::as_str) {
            Some("mutation") => OperationKind::Mutation,
            Some("subscription") => OperationKind::Subscription,
            Some("fragment") => OperationKind::Fragment,
            _ => OperationKind::Query,
        };

        // `{ ... }` shorthand has no keyword and no name
        let name = match header.first().map(String::as_str) {
            Some("query" | "mutation" | "subscription" | "fragment") => header.get(1).cloned(),
            _ => None,
        };

        Definition { kind, name }
    }
}

fn skip_string(chars: &mut Peekable<Chars<'_>>) {
    if chars.peek() == Some(&'"') {
        chars.next();

        // `""` is an empty string, `"""` opens a block string
        if chars.peek() != Some(&'"') {
            return;
        }
        chars.next();

        let mut quotes = 0;
        while let Some(c) = chars.next() {
            match c {
                '"' => {
                    quotes += 1;
                    if quotes == 3 {
                        return;
                    }
                }
                '\\' => {
                    quotes = 0;
                    chars.next();
                }
                _ => quotes = 0,
            }
        }
        return;
    }

    while let Some(c) = chars.next() {
        match c {
            '\\' => {
                chars.next();
            }
            '"' => return,
            _ => {}
        }
    }
}

fn read_name(first: char, chars: &mut Peekable<Chars<'_>>) -> String {
    let mut name = first.to_string();

    while let Some(&c) = chars.peek() {
        if !(c.is_ascii_alphanumeric() || c == '_') {
            break;
        }
        name.push(c);
        chars.next();
    }

    name
}

/// Top level definitions of a document, in order. Only the headers are read, selection sets
/// are skipped, so a document juniper would reject may still yield definitions.
pub fn definitions(document: &str) -> Vec<Definition> {
    let mut definitions = vec![];
    let mut header: Vec<String> = vec![];
    let mut depth = 0usize;
    let mut chars = document.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '#' => {
                for c in chars.by_ref() {
                    if c == '\n' || c == '\r' {
                        break;
                    }
                }
            }
            '"' => skip_string(&mut chars),
            '{' | '(' | '[' => {
                if depth == 0 && c == '{' {
                    definitions.push(Definition::from_header(&header));
                    header.clear();
                }
                depth += 1;
            }
            '}' | ')' | ']' => depth = depth.saturating_sub(1),
            // Directive names are not part of the header
            '@' => {
                if let Some(first) = chars.next() {
                    read_name(first, &mut chars);
                }
            }
            c if depth == 0 && (c.is_ascii_alphabetic() || c == '_') => {
                header.push(read_name(c, &mut chars));
            }
            _ => {}
        }
    }

    definitions
}

/// Kind of the operation that executing `document` with `operation_name` would run, `None` when
/// the selection is ambiguous or names an unknown operation.
pub fn selected_operation(document: &str, operation_name: Option<&str>) -> Option<OperationKind> {
    let operations: Vec<Definition> = definitions(document)
        .into_iter()
        .filter(|d| d.kind != OperationKind::Fragment)
        .collect();

    match operation_name {
        Some(operation_name) => operations
            .iter()
            .find(|d| d.name.as_deref() == Some(operation_name))
            .map(|d| d.kind),
        None if operations.len() == 1 => Some(operations[0].kind),
        None => None,
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case("{ people { id } }", None, Some(OperationKind::Query))]
    #[case("query { people { id } }", None, Some(OperationKind::Query))]
    #[case("query List { people { id } }", None, Some(OperationKind::Query))]
    #[case(r#"mutation { people(firstName: "Eve") { id } }"#, None, Some(OperationKind::Mutation))]
    #[case("mutation Add($first: String = \"{\") { people(firstName: $first) { id } }", None, Some(OperationKind::Mutation))]
    #[case("mutation @cached { people { id } }", None, Some(OperationKind::Mutation))]
    #[case("# mutation\n{ people { id } }", None, Some(OperationKind::Query))]
    #[case(r#"{ peopleByName(firstName: "mutation { }") { id } }"#, None, Some(OperationKind::Query))]
    #[case(r#"{ peopleByName(firstName: """ } mutation { """) { id } }"#, None, Some(OperationKind::Query))]
    #[case("query A { people { id } } mutation B { people { id } }", Some("B"), Some(OperationKind::Mutation))]
    #[case("query A { people { id } } mutation B { people { id } }", Some("A"), Some(OperationKind::Query))]
    #[case("query A { people { id } } mutation B { people { id } }", None, None)]
    #[case("query A { people { id } }", Some("Missing"), None)]
    #[case("fragment F on Person { id } mutation { people { ...F } }", None, Some(OperationKind::Mutation))]
    fn finds_selected_operation(
        #[case] document: &str,
        #[case] operation_name: Option<&str>,
        #[case] expected: Option<OperationKind>,
    ) {
        assert_eq!(selected_operation(document, operation_name), expected);
    }

    #[test]
    fn lists_every_top_level_definition() {
        let found = definitions("query A { a } fragment F on Person { id } mutation { b }");

        assert_eq!(
            found,
            vec![
                Definition {
                    kind: OperationKind::Query,
                    name: Some("A".to_string())
                },
                Definition {
                    kind: OperationKind::Fragment,
                    name: Some("F".to_string())
                },
                Definition {
                    kind: OperationKind::Mutation,
                    name: None
                },
            ]
        );
    }
}
