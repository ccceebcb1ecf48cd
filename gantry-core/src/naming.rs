//! Naming conversions for generated identifiers and file names.

use std::{fmt, str::FromStr};

/// Convert a string to PascalCase (e.g., "user_detail" -> "UserDetail").
pub fn to_pascal_case(s: &str) -> String {
    s.split(['_', '-'])
        .map(|part| {
            let mut chars = part.chars();
            match chars.next() {
                None => String::new(),
                Some(c) => c.to_uppercase().chain(chars).collect(),
            }
        })
        .collect()
}

/// Convert a string to snake_case (e.g., "UserDetail" -> "user_detail").
pub fn to_snake_case(s: &str) -> String {
    let mut result = String::new();
    for (i, c) in s.chars().enumerate() {
        if c.is_uppercase() && i > 0 {
            result.push('_');
        }
        result.extend(c.to_lowercase());
    }
    result.replace('-', "_")
}

/// Convert a string to lower camelCase (e.g., "user_detail" -> "userDetail").
pub fn to_camel_lower(s: &str) -> String {
    let pascal = to_pascal_case(s);
    let mut chars = pascal.chars();
    match chars.next() {
        None => String::new(),
        Some(c) => c.to_lowercase().chain(chars).collect(),
    }
}

/// Case convention for generated file names.
///
/// Mirrors the destination file-name cases accepted on the command line;
/// `Snake` is the default.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NameCase {
    Lower,
    Camel,
    CamelLower,
    #[default]
    Snake,
    SnakeScreaming,
    Kebab,
    KebabScreaming,
}

impl NameCase {
    /// Apply the case convention to an identifier.
    pub fn apply(&self, s: &str) -> String {
        match self {
            NameCase::Lower => to_pascal_case(s).to_lowercase(),
            NameCase::Camel => to_pascal_case(s),
            NameCase::CamelLower => to_camel_lower(s),
            NameCase::Snake => to_snake_case(s),
            NameCase::SnakeScreaming => to_snake_case(s).to_uppercase(),
            NameCase::Kebab => to_snake_case(s).replace('_', "-"),
            NameCase::KebabScreaming => to_snake_case(s).to_uppercase().replace('_', "-"),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            NameCase::Lower => "lower",
            NameCase::Camel => "camel",
            NameCase::CamelLower => "camel-lower",
            NameCase::Snake => "snake",
            NameCase::SnakeScreaming => "snake-screaming",
            NameCase::Kebab => "kebab",
            NameCase::KebabScreaming => "kebab-screaming",
        }
    }
}

impl fmt::Display for NameCase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for NameCase {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "lower" => Ok(NameCase::Lower),
            "camel" => Ok(NameCase::Camel),
            "camellower" | "camel-lower" => Ok(NameCase::CamelLower),
            "snake" => Ok(NameCase::Snake),
            "snakescreaming" | "snake-screaming" => Ok(NameCase::SnakeScreaming),
            "kebab" => Ok(NameCase::Kebab),
            "kebabscreaming" | "kebab-screaming" => Ok(NameCase::KebabScreaming),
            _ => Err(format!(
                "unknown file name case '{}', expected one of: lower, camel, camel-lower, snake, snake-screaming, kebab, kebab-screaming",
                s
            )),
        }
    }
}
