use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    /// Normalized slug: lowercase alphanumeric segments joined by single hyphens
    /// - Valid: "web-development", "seo101", "a-b-c"
    /// - Invalid: "-seo", "seo-", "web--dev", "Web", "web_dev"
    pub static ref SLUG_REGEX: Regex = Regex::new(r"^[a-z0-9]+(?:-[a-z0-9]+)*$").unwrap();

    /// CSS hex color such as "#1a2b3c" or "#fff"
    pub static ref HEX_COLOR_REGEX: Regex =
        Regex::new(r"^#(?:[0-9a-fA-F]{3}|[0-9a-fA-F]{6})$").unwrap();

    /// Loose phone format: digits plus common separators, 6-50 characters
    pub static ref PHONE_REGEX: Regex = Regex::new(r"^\+?[0-9()\-. ]{6,50}$").unwrap();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slug_regex_valid() {
        assert!(SLUG_REGEX.is_match("web-development"));
        assert!(SLUG_REGEX.is_match("seo101"));
        assert!(SLUG_REGEX.is_match("a"));
        assert!(SLUG_REGEX.is_match("a-b-c"));
    }

    #[test]
    fn test_slug_regex_invalid() {
        assert!(!SLUG_REGEX.is_match("-seo")); // starts with hyphen
        assert!(!SLUG_REGEX.is_match("seo-")); // ends with hyphen
        assert!(!SLUG_REGEX.is_match("web--dev")); // double hyphen
        assert!(!SLUG_REGEX.is_match("Web")); // uppercase
        assert!(!SLUG_REGEX.is_match("web_dev")); // underscore
        assert!(!SLUG_REGEX.is_match("")); // empty
    }

    #[test]
    fn test_hex_color_regex() {
        assert!(HEX_COLOR_REGEX.is_match("#1a2b3c"));
        assert!(HEX_COLOR_REGEX.is_match("#FFF"));
        assert!(!HEX_COLOR_REGEX.is_match("1a2b3c"));
        assert!(!HEX_COLOR_REGEX.is_match("#12345"));
    }

    #[test]
    fn test_phone_regex() {
        assert!(PHONE_REGEX.is_match("+62 812-3456-7890"));
        assert!(PHONE_REGEX.is_match("(021) 555 0101"));
        assert!(!PHONE_REGEX.is_match("call me"));
        assert!(!PHONE_REGEX.is_match("123"));
    }
}
