//! Analyzer options.
//!
//! The host reads these from its analyzer configuration (one key/value pair
//! per line in an editor config file) and hands them over as pairs. Only the
//! property naming rules are configurable.

use smol_str::SmolStr;

use crate::error::ConfigError;

const REMOVE_PREFIXES: &str = "propertychanged.remove_prefixes";
const REMOVE_SUFFIXES: &str = "propertychanged.remove_suffixes";
const ADD_PREFIX: &str = "propertychanged.add_prefix";
const ADD_SUFFIX: &str = "propertychanged.add_suffix";
const CAPITALIZATION: &str = "propertychanged.first_letter_capitalization";

/// How the first letter of an inferred property name is cased.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Default)]
pub enum Capitalization {
    #[default]
    UpperCase,
    LowerCase,
    None,
}

/// Rules for turning a backing field name into a property name.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct NamingOptions {
    /// Prefixes stripped from field names, first match wins.
    pub remove_prefixes: Vec<SmolStr>,
    /// Suffixes stripped from field names, first match wins.
    pub remove_suffixes: Vec<SmolStr>,
    pub add_prefix: SmolStr,
    pub add_suffix: SmolStr,
    pub capitalization: Capitalization,
}

impl Default for NamingOptions {
    fn default() -> Self {
        Self {
            remove_prefixes: vec![SmolStr::new_static("_"), SmolStr::new_static("m_")],
            remove_suffixes: Vec::new(),
            add_prefix: SmolStr::default(),
            add_suffix: SmolStr::default(),
            capitalization: Capitalization::UpperCase,
        }
    }
}

impl NamingOptions {
    /// Infer a property name from a field name.
    pub fn property_name(&self, field_name: &str) -> SmolStr {
        // Longest prefix first so that `m_` wins over `m` style entries.
        let mut prefixes: Vec<&SmolStr> = self.remove_prefixes.iter().collect();
        prefixes.sort_by_key(|p| std::cmp::Reverse(p.len()));

        let mut name = field_name;
        if let Some(stripped) = prefixes
            .iter()
            .filter(|p| !p.is_empty())
            .find_map(|p| name.strip_prefix(p.as_str()))
        {
            name = stripped;
        }
        if let Some(stripped) = self
            .remove_suffixes
            .iter()
            .filter(|s| !s.is_empty())
            .find_map(|s| name.strip_suffix(s.as_str()))
        {
            name = stripped;
        }

        let mut chars = name.chars();
        let cased: String = match (self.capitalization, chars.next()) {
            (_, None) => String::new(),
            (Capitalization::UpperCase, Some(first)) => first.to_uppercase().chain(chars).collect(),
            (Capitalization::LowerCase, Some(first)) => first.to_lowercase().chain(chars).collect(),
            (Capitalization::None, Some(_)) => name.to_owned(),
        };

        SmolStr::from(format!("{}{}{}", self.add_prefix, cased, self.add_suffix))
    }
}

/// All options the analyzer honours.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct AnalysisOptions {
    pub naming: NamingOptions,
}

impl AnalysisOptions {
    /// Parse options from host-supplied key/value pairs.
    ///
    /// Unknown keys are ignored. Later pairs override earlier ones.
    pub fn from_pairs<'a, I>(pairs: I) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        let mut options = Self::default();

        for (key, value) in pairs {
            let value = value.trim();
            match key.trim() {
                REMOVE_PREFIXES => options.naming.remove_prefixes = split_list(value),
                REMOVE_SUFFIXES => options.naming.remove_suffixes = split_list(value),
                ADD_PREFIX => options.naming.add_prefix = SmolStr::new(value),
                ADD_SUFFIX => options.naming.add_suffix = SmolStr::new(value),
                CAPITALIZATION => {
                    options.naming.capitalization = match value {
                        "upper_case" => Capitalization::UpperCase,
                        "lower_case" => Capitalization::LowerCase,
                        "none" => Capitalization::None,
                        _ => {
                            return Err(ConfigError {
                                key: CAPITALIZATION.to_owned(),
                                value: value.to_owned(),
                                expected: "one of `upper_case`, `lower_case`, `none`",
                            });
                        }
                    }
                }
                other => tracing::trace!(key = other, "ignoring unknown analyzer option"),
            }
        }

        Ok(options)
    }
}

fn split_list(value: &str) -> Vec<SmolStr> {
    value
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(SmolStr::new)
        .collect()
}
