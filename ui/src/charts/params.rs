//! Parameter string handling for the multi-parameter chart.
//!
//! Method parameters are command-line style strings such as `-k 3 --seed=42`.

/// An option name, value pair or a stray token.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Token<'a> {
    Option { name: &'a str, value: Option<&'a str> },
    Stray(&'a str),
}

fn is_option(token: &str) -> bool {
    let name = token.trim_start_matches('-');
    token.starts_with('-')
        && !name.is_empty()
        && !name.starts_with(|c: char| c.is_ascii_digit() || c == '.')
}

fn tokenize(parameters: &str) -> Vec<Token<'_>> {
    let words: Vec<&str> = parameters.split_whitespace().collect();
    let mut tokens = Vec::new();
    let mut i = 0;
    while i < words.len() {
        let word = words[i];
        if is_option(word) {
            let bare = word.trim_start_matches('-');
            if let Some((name, value)) = bare.split_once('=') {
                tokens.push(Token::Option {
                    name,
                    value: Some(value),
                });
            } else if i + 1 < words.len() && !is_option(words[i + 1]) {
                tokens.push(Token::Option {
                    name: bare,
                    value: Some(words[i + 1]),
                });
                i += 1;
            } else {
                tokens.push(Token::Option {
                    name: bare,
                    value: None,
                });
            }
        } else {
            tokens.push(Token::Stray(word));
        }
        i += 1;
    }
    tokens
}

/// Names of the options that carry a value, in order of appearance.
pub fn option_list(parameters: &str) -> Vec<String> {
    let mut names: Vec<String> = Vec::new();
    for token in tokenize(parameters) {
        if let Token::Option {
            name,
            value: Some(_),
        } = token
        {
            if !names.iter().any(|n| n == name) {
                names.push(name.to_string());
            }
        }
    }
    names
}

/// Value of `option`, or an empty string when it is absent.
pub fn option_value(parameters: &str, option: &str) -> String {
    tokenize(parameters)
        .into_iter()
        .find_map(|token| match token {
            Token::Option {
                name,
                value: Some(value),
            } if name == option => Some(value.to_string()),
            _ => None,
        })
        .unwrap_or_default()
}

/// The parameter string without `option` and its value.
pub fn remove_option(parameters: &str, option: &str) -> String {
    let words: Vec<&str> = parameters.split_whitespace().collect();
    let mut kept = Vec::new();
    let mut i = 0;
    while i < words.len() {
        let word = words[i];
        if is_option(word) {
            let bare = word.trim_start_matches('-');
            let (name, inline_value) = match bare.split_once('=') {
                Some((name, _)) => (name, true),
                None => (bare, false),
            };
            if name == option {
                if !inline_value && i + 1 < words.len() && !is_option(words[i + 1]) {
                    i += 1;
                }
                i += 1;
                continue;
            }
        }
        kept.push(word);
        i += 1;
    }
    kept.join(" ")
}

/// Parse every value as a number, or `None` if any of them is not one.
pub fn numeric_values(values: &[String]) -> Option<Vec<f64>> {
    values.iter().map(|v| v.trim().parse::<f64>().ok()).collect()
}
