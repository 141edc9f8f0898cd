//! Outbound query string construction.
//!
//! Encoding rule: every byte outside the unreserved set
//! (`A-Z a-z 0-9 - . _ *`) is percent-encoded, a space becomes `%20`, and
//! `+` is emitted as a literal `+`.
//!
//! The upstream decoder does not treat `+` as a space, so a plus sign sent
//! verbatim arrives as a plus sign. This keeps UTC offsets in date-times such
//! as `2025-09-12T12:44:00+05:30` intact without singling out any parameter
//! by name, while `,` `:` and spaces in every value are encoded normally.

use url::form_urlencoded::byte_serialize;

/// Encode one key or value under the rule above.
pub fn encode_component(raw: &str) -> String {
    // byte_serialize emits `+` only for spaces and `%2B` for literal plus signs
    byte_serialize(raw.as_bytes())
        .collect::<String>()
        .replace('+', "%20")
        .replace("%2B", "+")
}

/// Serialize ordered parameters into `k=v&k=v`, without a leading `?`.
pub fn encode_query<'a, I>(params: I) -> String
where
    I: IntoIterator<Item = &'a (String, String)>,
{
    params
        .into_iter()
        .map(|(k, v)| format!("{}={}", encode_component(k), encode_component(v)))
        .collect::<Vec<_>>()
        .join("&")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pairs(items: &[(&str, &str)]) -> Vec<(String, String)> {
        items
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_plus_in_datetime_survives() {
        let qs = encode_query(&pairs(&[("datetime", "2025-09-12T12:44:00+05:30")]));
        assert_eq!(qs, "datetime=2025-09-12T12%3A44%3A00+05%3A30");
    }

    #[test]
    fn test_comma_is_percent_encoded() {
        let qs = encode_query(&pairs(&[("coordinates", "12.9716,77.5946")]));
        assert_eq!(qs, "coordinates=12.9716%2C77.5946");
    }

    #[test]
    fn test_space_is_not_plus() {
        assert_eq!(encode_component("New Delhi"), "New%20Delhi");
        assert_eq!(encode_component("a + b"), "a%20+%20b");
    }

    #[test]
    fn test_rule_is_not_name_specific() {
        let qs = encode_query(&pairs(&[
            ("ayanamsa", "1"),
            ("note", "x+y"),
            ("la", "en"),
        ]));
        assert_eq!(qs, "ayanamsa=1&note=x+y&la=en");
    }

    #[test]
    fn test_reserved_and_unicode() {
        assert_eq!(encode_component("a&b=c/d?"), "a%26b%3Dc%2Fd%3F");
        assert_eq!(encode_component("é"), "%C3%A9");
        assert_eq!(encode_component("%2B"), "%252B");
    }

    #[test]
    fn test_empty_params() {
        assert_eq!(encode_query(&Vec::<(String, String)>::new()), "");
    }
}
