use regex::Regex;

use crate::error::FilterError;

/// Include/exclude rules deciding which dependencies may be updated.
///
/// A pattern written as `/.../` is a regular expression, anything else is a
/// package name in which `*` matches any run of characters. Exclusion wins
/// over inclusion and an empty include list includes everything.
#[derive(Debug, Clone, Default)]
pub struct PackageFilter {
    include: Vec<Regex>,
    exclude: Vec<Regex>,
}

impl PackageFilter {
    pub fn new(include: &[String], exclude: &[String]) -> Result<Self, FilterError> {
        Ok(Self {
            include: compile_all(include)?,
            exclude: compile_all(exclude)?,
        })
    }

    pub fn matches(&self, name: &str) -> bool {
        if self.exclude.iter().any(|re| re.is_match(name)) {
            return false;
        }
        self.include.is_empty() || self.include.iter().any(|re| re.is_match(name))
    }
}

fn compile_all(patterns: &[String]) -> Result<Vec<Regex>, FilterError> {
    patterns.iter().map(|p| compile(p)).collect()
}

fn compile(pattern: &str) -> Result<Regex, FilterError> {
    let expr = match pattern
        .strip_prefix('/')
        .and_then(|rest| rest.strip_suffix('/'))
    {
        Some(re) => re.to_string(),
        None => {
            let parts: Vec<String> = pattern.split('*').map(regex::escape).collect();
            format!("^{}$", parts.join(".*"))
        }
    };
    Regex::new(&expr).map_err(|source| FilterError::Pattern {
        pattern: pattern.to_string(),
        source,
    })
}
