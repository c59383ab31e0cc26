// src/lines/rules.rs
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Deserialize;
use std::path::Path;
use std::str::FromStr;

use crate::error::CompilationError;
use crate::filter::{field, Field, LogRule};
use crate::lines::Line;

static FIELD_NAME: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(?:\d+|[A-Za-z_][A-Za-z0-9_]*)$").unwrap());

const RULE_SEPARATOR: &str = "=>";

/// Uncompiled log rule for text lines.
///
/// `when` is a regex matched against the line. Each entry of `fields` names a
/// value for the message placeholders:
///
/// * `line` - the whole line
/// * `line_number` - 1-based line number
/// * `0`, `1`, ... - capture group of `when` (`0` is the whole match)
/// * any other identifier - named capture group of `when`
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RuleSpec {
    pub when: String,
    pub message: String,
    #[serde(default, deserialize_with = "deserialize_field_names")]
    pub fields: Vec<String>,
}

// YAML writes group indexes as bare integers
fn deserialize_field_names<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum FieldName {
        Index(usize),
        Name(String),
    }

    let names = Vec::<FieldName>::deserialize(deserializer)?;
    Ok(names
        .into_iter()
        .map(|name| match name {
            FieldName::Index(index) => index.to_string(),
            FieldName::Name(name) => name,
        })
        .collect())
}

impl RuleSpec {
    pub fn new(when: &str, message: &str, fields: &[&str]) -> Self {
        RuleSpec {
            when: when.to_string(),
            message: message.to_string(),
            fields: fields.iter().map(|f| f.to_string()).collect(),
        }
    }

    /// Compile into a rule over [`Line`]s
    pub fn compile(&self) -> Result<LogRule<Line>, CompilationError> {
        let regex = compile_regex(&self.when)?;

        let fields = self
            .fields
            .iter()
            .map(|name| self.compile_field(&regex, name))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(LogRule::new(
            move |line: &Line| regex.is_match(&line.text),
            self.message.clone(),
            fields,
        ))
    }

    fn compile_field(&self, regex: &Regex, name: &str) -> Result<Field<Line>, CompilationError> {
        let unknown = || CompilationError::UnknownField {
            rule: self.when.clone(),
            field: name.to_string(),
        };

        if !FIELD_NAME.is_match(name) {
            return Err(unknown());
        }

        match name {
            "line" => return Ok(field(|line: &Line| line.text.clone())),
            "line_number" => return Ok(field(|line: &Line| line.number)),
            _ => {}
        }

        let regex = regex.clone();
        if let Ok(index) = name.parse::<usize>() {
            if index >= regex.captures_len() {
                return Err(unknown());
            }
            return Ok(field(move |line: &Line| {
                regex
                    .captures(&line.text)
                    .and_then(|caps| caps.get(index))
                    .map(|m| m.as_str().to_string())
            }));
        }

        if !regex.capture_names().flatten().any(|n| n == name) {
            return Err(unknown());
        }
        let name = name.to_string();
        Ok(field(move |line: &Line| {
            regex
                .captures(&line.text)
                .and_then(|caps| caps.name(&name))
                .map(|m| m.as_str().to_string())
        }))
    }
}

/// Parses the command line form `REGEX => MESSAGE [=> FIELD,FIELD...]`
impl FromStr for RuleSpec {
    type Err = CompilationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let syntax = |message: &str| CompilationError::RuleSyntax {
            rule: s.to_string(),
            message: message.to_string(),
        };

        let mut parts = s.splitn(3, RULE_SEPARATOR).map(str::trim);
        let when = parts.next().unwrap_or_default();
        let message = parts
            .next()
            .ok_or_else(|| syntax("expected 'REGEX => MESSAGE'"))?;
        if when.is_empty() {
            return Err(syntax("empty condition regex"));
        }

        let fields = parts
            .next()
            .map(|list| {
                list.split(',')
                    .map(str::trim)
                    .filter(|f| !f.is_empty())
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default();

        Ok(RuleSpec {
            when: when.to_string(),
            message: message.to_string(),
            fields,
        })
    }
}

/// YAML rules file
///
/// ```yaml
/// keep: "ERROR|WARN"
/// invert: false
/// rules:
///   - when: 'took (\d+)ms'
///     message: "slow line {}: {}ms"
///     fields: [line_number, 1]
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RulesFile {
    #[serde(default)]
    pub keep: Option<String>,
    #[serde(default)]
    pub invert: bool,
    #[serde(default)]
    pub rules: Vec<RuleSpec>,
}

impl RulesFile {
    pub fn from_yaml(text: &str) -> Result<Self, CompilationError> {
        Ok(serde_yaml::from_str(text)?)
    }

    pub fn load(path: &Path) -> Result<Self, CompilationError> {
        let text = std::fs::read_to_string(path).map_err(|e| {
            CompilationError::FileNotFound(format!("{}: {}", path.display(), e))
        })?;
        Self::from_yaml(&text)
    }
}

pub(crate) fn compile_regex(pattern: &str) -> Result<Regex, CompilationError> {
    Regex::new(pattern).map_err(|source| CompilationError::InvalidRegex {
        pattern: pattern.to_string(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn line(number: usize, text: &str) -> Line {
        Line::new(number, text.to_string())
    }

    #[test]
    fn test_parse_rule_arg() {
        let spec: RuleSpec = r"took (\d+)ms => slow: {} => 1, line_number".parse().unwrap();
        assert_eq!(spec, RuleSpec::new(r"took (\d+)ms", "slow: {}", &["1", "line_number"]));

        let spec: RuleSpec = "panic => panic seen".parse().unwrap();
        assert!(spec.fields.is_empty());
    }

    #[test]
    fn test_parse_rule_arg_errors() {
        assert!(matches!(
            "no separator".parse::<RuleSpec>(),
            Err(CompilationError::RuleSyntax { .. })
        ));
        assert!(matches!(
            " => message".parse::<RuleSpec>(),
            Err(CompilationError::RuleSyntax { .. })
        ));
    }

    #[test]
    fn test_compiled_fields() {
        let rule = RuleSpec::new(
            r"user=(?P<user>\w+) took (\d+)ms",
            "{} {} {} {}",
            &["user", "2", "line_number", "line"],
        )
        .compile()
        .unwrap();

        let l = line(4, "user=bob took 250ms");
        assert!(rule.matches(&l));
        assert_eq!(
            rule.extract_values(&l),
            vec![json!("bob"), json!("250"), json!(4), json!("user=bob took 250ms")]
        );
    }

    #[test]
    fn test_unmatched_group_is_null() {
        let rule = RuleSpec::new(r"a(b)?", "{}", &["1"]).compile().unwrap();
        assert_eq!(rule.extract_values(&line(1, "a")), vec![json!(null)]);
        assert_eq!(rule.extract_values(&line(1, "xyz")), vec![json!(null)]);
    }

    #[test]
    fn test_compile_errors() {
        assert!(matches!(
            RuleSpec::new("(", "m", &[]).compile(),
            Err(CompilationError::InvalidRegex { .. })
        ));
        assert!(matches!(
            RuleSpec::new("(a)", "m", &["2"]).compile(),
            Err(CompilationError::UnknownField { .. })
        ));
        assert!(matches!(
            RuleSpec::new("a", "m", &["nope"]).compile(),
            Err(CompilationError::UnknownField { .. })
        ));
        assert!(matches!(
            RuleSpec::new("a", "m", &["bad-name"]).compile(),
            Err(CompilationError::UnknownField { .. })
        ));
    }

    #[test]
    fn test_rules_file_from_yaml() {
        let file = RulesFile::from_yaml(
            r#"
keep: "ERROR"
rules:
  - when: 'timeout after (\d+)s'
    message: "timeout at line {} after {}s"
    fields: [line_number, 1]
  - when: 'retry'
    message: "retry seen"
"#,
        )
        .unwrap();

        assert_eq!(file.keep.as_deref(), Some("ERROR"));
        assert!(!file.invert);
        assert_eq!(file.rules.len(), 2);
        assert_eq!(file.rules[0].fields, vec!["line_number", "1"]);
        assert!(file.rules[1].fields.is_empty());
    }

    #[test]
    fn test_rules_file_rejects_unknown_keys() {
        assert!(matches!(
            RulesFile::from_yaml("kep: x\n"),
            Err(CompilationError::ConfigError(_))
        ));
    }
}
