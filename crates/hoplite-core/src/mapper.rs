//! Parameter name mappers.
//!
//! Record fields are declared in `snake_case`. Sources commonly spell keys
//! differently, so the structured decoder tries each mapper of the context
//! in turn and uses the first key that is present.

/// Maps a declared field name to the key looked up in a map node.
pub trait ParameterMapper: Send + Sync {
    fn map(&self, name: &str) -> String;
}

/// Uses the field name as is.
#[derive(Debug, Clone, Copy, Default)]
pub struct IdentityParamMapper;

impl ParameterMapper for IdentityParamMapper {
    fn map(&self, name: &str) -> String {
        name.to_string()
    }
}

/// `max_size` → `maxSize`.
#[derive(Debug, Clone, Copy, Default)]
pub struct CamelCaseParamMapper;

impl ParameterMapper for CamelCaseParamMapper {
    fn map(&self, name: &str) -> String {
        let mut out = String::with_capacity(name.len());
        let mut upper_next = false;
        for c in name.chars() {
            if c == '_' || c == '-' {
                upper_next = !out.is_empty();
            } else if upper_next {
                out.extend(c.to_uppercase());
                upper_next = false;
            } else {
                out.push(c);
            }
        }
        out
    }
}

/// `max_size` → `max-size`, `maxSize` → `max-size`.
#[derive(Debug, Clone, Copy, Default)]
pub struct KebabCaseParamMapper;

impl ParameterMapper for KebabCaseParamMapper {
    fn map(&self, name: &str) -> String {
        let mut out = String::with_capacity(name.len() + 4);
        for c in name.chars() {
            if c == '_' {
                out.push('-');
            } else if c.is_uppercase() {
                if !out.is_empty() && !out.ends_with('-') {
                    out.push('-');
                }
                out.extend(c.to_lowercase());
            } else {
                out.push(c);
            }
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_camel_case() {
        let m = CamelCaseParamMapper;
        assert_eq!(m.map("max_size"), "maxSize");
        assert_eq!(m.map("a_b_c"), "aBC");
        assert_eq!(m.map("host"), "host");
        assert_eq!(m.map("_private"), "private");
    }

    #[test]
    fn test_kebab_case() {
        let m = KebabCaseParamMapper;
        assert_eq!(m.map("max_size"), "max-size");
        assert_eq!(m.map("maxSize"), "max-size");
        assert_eq!(m.map("host"), "host");
    }
}
