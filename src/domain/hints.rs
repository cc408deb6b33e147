use regex::Regex;
use rust_decimal::Decimal;
use serde::Serialize;
use std::sync::OnceLock;

/// Suggested values picked out of a vehicle listing.
///
/// Every field is low confidence and must be confirmed by the user before
/// it is used in a calculation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PartialVehicleHints {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub make: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub year: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub engine_liters: Option<Decimal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fob_usd: Option<Decimal>,
}

impl PartialVehicleHints {
    pub fn is_empty(&self) -> bool {
        *self == PartialVehicleHints::default()
    }
}

/// Somewhere vehicle hints can be fetched from, such as a dealer listing page
pub trait HintSource {
    fn fetch_hints(&self, url: &str) -> anyhow::Result<PartialVehicleHints>;
}

struct Patterns {
    tag: Regex,
    year: Regex,
    prices: [Regex; 3],
}

fn patterns() -> &'static Patterns {
    static PATTERNS: OnceLock<Patterns> = OnceLock::new();
    PATTERNS.get_or_init(|| Patterns {
        tag: Regex::new(r"(?s)<script.*?</script>|<style.*?</style>|<[^>]*>")
            .expect("tag pattern is valid"),
        year: Regex::new(r"(20[1-2][0-9])").expect("year pattern is valid"),
        prices: [
            Regex::new(r"\$[\d,]+").expect("price pattern is valid"),
            Regex::new(r"(?i)usd[\s:]*[\d,]+").expect("price pattern is valid"),
            Regex::new(r"(?i)fob[\s:]*[\d,]+").expect("price pattern is valid"),
        ],
    })
}

/// Drop script/style blocks and tags, leaving the visible text
pub fn strip_markup(html: &str) -> String {
    patterns().tag.replace_all(html, " ").into_owned()
}

/// Pull a make, manufacture year, FOB price and engine size out of listing text.
///
/// Takes the first of `known_makes` appearing as a whole word, the word after
/// it as the model, the first four digit year from 2010 to 2029 and the first
/// price written as `$N`, `USD N` or `FOB N`.
pub fn extract_hints(text: &str, known_makes: &[String]) -> PartialVehicleHints {
    let p = patterns();

    let words: Vec<String> = text
        .split(|c: char| !c.is_alphanumeric() && c != '-')
        .filter(|w| !w.is_empty())
        .map(str::to_uppercase)
        .collect();
    let make_idx = words.iter().position(|w| known_makes.contains(w));
    let make = make_idx.map(|idx| words[idx].clone());
    let model = make_idx
        .and_then(|idx| words.get(idx + 1))
        .filter(|w| w.chars().any(char::is_alphabetic))
        .cloned();

    let year = p.year.find(text).and_then(|m| m.as_str().parse().ok());

    let fob_usd = p.prices.iter().find_map(|pattern| {
        let found = pattern.find(text)?;
        let digits: String = found.as_str().chars().filter(char::is_ascii_digit).collect();
        digits.parse::<Decimal>().ok().filter(|v| *v > Decimal::ZERO)
    });

    PartialVehicleHints {
        make,
        model,
        year,
        fob_usd,
        engine_liters: crate::domain::reference::extract_engine_size(text),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn makes() -> Vec<String> {
        vec!["TOYOTA".to_string(), "NISSAN".to_string()]
    }

    fn extract(text: &str) -> PartialVehicleHints {
        extract_hints(text, &makes())
    }

    #[test]
    fn year_and_dollar_price() {
        let hints = extract("2019 Toyota Harrier 2.0 premium, price $15,400 negotiable");
        assert_eq!(hints.make.as_deref(), Some("TOYOTA"));
        assert_eq!(hints.year, Some(2019));
        assert_eq!(hints.fob_usd, Some(dec!(15400)));
        assert_eq!(hints.engine_liters, Some(dec!(2.0)));
        assert_eq!(hints.model.as_deref(), Some("HARRIER"));
    }

    #[test]
    fn make_must_be_a_whole_word() {
        assert_eq!(extract("TOYOTALIKE body kit").make, None);
        let hints = extract("used nissan x-trail");
        assert_eq!(hints.make.as_deref(), Some("NISSAN"));
        assert_eq!(hints.model.as_deref(), Some("X-TRAIL"));
    }

    #[test]
    fn model_needs_letters_after_the_make() {
        let hints = extract("Toyota 2019, price $9,000");
        assert_eq!(hints.make.as_deref(), Some("TOYOTA"));
        assert_eq!(hints.model, None);
        assert_eq!(extract("listing from nissan").model, None);
    }

    #[test]
    fn usd_and_fob_prefixes() {
        assert_eq!(extract("Price USD: 9,800").fob_usd, Some(dec!(9800)));
        assert_eq!(extract("fob 12000 yokohama").fob_usd, Some(dec!(12000)));
    }

    #[test]
    fn dollar_sign_preferred_over_fob() {
        let hints = extract("FOB 12000, total $14,100 CIF");
        assert_eq!(hints.fob_usd, Some(dec!(14100)));
    }

    #[test]
    fn nothing_found_is_empty() {
        let hints = extract("call for price");
        assert!(hints.is_empty());
    }

    #[test]
    fn years_outside_range_are_ignored() {
        assert_eq!(extract("built 2009, registered 1998").year, None);
    }

    #[test]
    fn markup_is_stripped() {
        let text = strip_markup(
            "<html><script>var year = 2024;</script><h1>Nissan X-Trail</h1><p>2018</p></html>",
        );
        assert!(!text.contains("2024"));
        assert!(text.contains("Nissan X-Trail"));
        assert_eq!(extract(&text).year, Some(2018));
        assert_eq!(extract(&text).make.as_deref(), Some("NISSAN"));
    }
}
