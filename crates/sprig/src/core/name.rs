use std::fmt;

use convert_case::{Case, Casing};

/// A widget name used in dumps and logs: lowercase ASCII alphanumerics plus
/// underscores.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct NodeName {
    /// Stored name.
    name: String,
}

impl NodeName {
    /// Munge an arbitrary string into a name: snake case, with anything
    /// outside `[a-z0-9_]` dropped. An empty result becomes `node`.
    pub fn convert(name: &str) -> Self {
        let name: String = name
            .to_case(Case::Snake)
            .chars()
            .filter(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || *c == '_')
            .collect();
        if name.is_empty() {
            return Self {
                name: "node".into(),
            };
        }
        Self { name }
    }

    /// Name derived from a Rust type path, e.g. `sprig::widgets::ListView`
    /// becomes `list_view`. Generic parameters are ignored.
    pub fn of_type(type_name: &str) -> Self {
        let base = type_name.split('<').next().unwrap_or(type_name);
        let short = base.rsplit("::").next().unwrap_or(base);
        Self::convert(short)
    }

    /// The name as a string slice.
    pub fn as_str(&self) -> &str {
        &self.name
    }
}

impl fmt::Display for NodeName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

impl PartialEq<&str> for NodeName {
    fn eq(&self, other: &&str) -> bool {
        self.name == *other
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn convert_munges() {
        assert_eq!(NodeName::convert("FooBar"), "foo_bar");
        assert_eq!(NodeName::convert("FooBar Voing"), "foo_bar_voing");
        assert_eq!(NodeName::convert("split-view 2"), "split_view_2");
        assert_eq!(NodeName::convert("!!!"), "node");
    }

    #[test]
    fn type_names() {
        assert_eq!(NodeName::of_type("sprig::widgets::ListView"), "list_view");
        assert_eq!(NodeName::of_type("a::Wrapper<b::Inner>"), "wrapper");
        assert_eq!(NodeName::of_type("Base"), "base");
    }
}
