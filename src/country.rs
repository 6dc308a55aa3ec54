//! Country identity: turning the loosely labelled country fields of a report
//! (a localized name, sometimes an ISO alpha-2 code) into one canonical key
//! that both the geography and the price lists can be joined on.

use std::collections::HashMap;
use std::fmt;
use std::sync::LazyLock;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::iso;

/// Languages the name tables know about. Reports are written in Russian,
/// the world geometry carries English names.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Locale {
    Ru,
    En,
}

/// Canonical country identity.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum CountryKey {
    /// Uppercase ISO 3166-1 alpha-2 code.
    Iso(String),
    /// Folded name of a country no code could be found for.
    Name(String),
}

impl CountryKey {
    pub fn alpha2(&self) -> Option<&str> {
        match self {
            CountryKey::Iso(code) => Some(code),
            CountryKey::Name(_) => None,
        }
    }

    /// Numeric id used by the world geometry, if the code is a known one.
    pub fn numeric_id(&self) -> Option<u16> {
        self.alpha2().and_then(iso::alpha2_to_numeric)
    }
}

impl fmt::Display for CountryKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CountryKey::Iso(code) => f.write_str(code),
            CountryKey::Name(name) => write!(f, "~{name}"),
        }
    }
}

/// Which rule produced a key. Code-based keys win ties during matching.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ResolvedVia {
    Code,
    Locale(Locale),
    Override,
    Name,
}

impl fmt::Display for ResolvedVia {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResolvedVia::Code => f.write_str("code"),
            ResolvedVia::Locale(Locale::Ru) => f.write_str("name/ru"),
            ResolvedVia::Locale(Locale::En) => f.write_str("name/en"),
            ResolvedVia::Override => f.write_str("override"),
            ResolvedVia::Name => f.write_str("unresolved"),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Resolution {
    pub key: CountryKey,
    pub via: ResolvedVia,
}

impl Resolution {
    pub fn is_code_based(&self) -> bool {
        self.via == ResolvedVia::Code
    }
}

// Short and colloquial spellings the ISO name tables don't carry.
const NAME_OVERRIDES: &[(&str, &[&str])] = &[
    ("BY", &["Белоруссия", "Республика Беларусь"]),
    ("CN", &["КНР", "Китайская Народная Республика"]),
    ("US", &["США", "Соединенные Штаты", "USA"]),
    ("AE", &["ОАЭ", "UAE"]),
    ("KR", &["Южная Корея", "Корея", "Korea"]),
    ("GB", &["Англия", "UK"]),
    ("DE", &["ФРГ"]),
    ("RU", &["РФ"]),
    ("MD", &["Республика Молдова"]),
    ("VN", &["СРВ"]),
];

static OVERRIDES: LazyLock<HashMap<String, &'static str>> = LazyLock::new(|| {
    NAME_OVERRIDES
        .iter()
        .flat_map(|(code, names)| names.iter().map(move |n| (fold_name(n), *code)))
        .collect()
});

/// Case- and typography-insensitive form of a country name.
pub fn fold_name(name: &str) -> String {
    let mapped: String = name
        .chars()
        .flat_map(char::to_lowercase)
        .map(|c| match c {
            'ё' => 'е',
            '\u{2019}' | '\u{2018}' | '\u{02BC}' | '`' => '\'',
            '\u{2014}' | '\u{2013}' | '\u{2011}' => '-',
            c => c,
        })
        .collect();
    mapped.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Resolves report country labels to [`CountryKey`]s.
///
/// Order: a two-character code, the report locale's names, the override
/// table, the fallback locale's names, and finally the folded name itself.
/// Resolution never fails; an unknown country just keeps its name as key.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CountryResolver {
    primary: Locale,
    fallback: Locale,
}

impl Default for CountryResolver {
    fn default() -> Self {
        Self::new(Locale::Ru, Locale::En)
    }
}

impl CountryResolver {
    pub fn new(primary: Locale, fallback: Locale) -> Self {
        Self { primary, fallback }
    }

    pub fn resolve_detailed(&self, country: &str, country_code: Option<&str>) -> Resolution {
        if let Some(code) = country_code.map(str::trim) {
            if code.chars().count() == 2 {
                return Resolution { key: CountryKey::Iso(code.to_uppercase()), via: ResolvedVia::Code };
            }
        }

        if let Some(code) = iso::alpha2_by_name(country, self.primary) {
            return Resolution { key: iso_key(code), via: ResolvedVia::Locale(self.primary) };
        }

        if let Some(code) = OVERRIDES.get(&fold_name(country)) {
            return Resolution { key: iso_key(code), via: ResolvedVia::Override };
        }

        if self.fallback != self.primary {
            if let Some(code) = iso::alpha2_by_name(country, self.fallback) {
                return Resolution { key: iso_key(code), via: ResolvedVia::Locale(self.fallback) };
            }
        }

        debug!(country, "country not resolvable to an ISO code, keeping name");
        Resolution { key: CountryKey::Name(fold_name(country)), via: ResolvedVia::Name }
    }

    /// Name to show for a key in the report language.
    pub fn display_name(&self, key: &CountryKey) -> Option<&'static str> {
        key.alpha2().and_then(iso::by_alpha2).map(|c| c.display_name(self.primary))
    }
}

fn iso_key(code: &str) -> CountryKey {
    CountryKey::Iso(code.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn iso(code: &str) -> CountryKey {
        CountryKey::Iso(code.into())
    }

    fn resolve(r: &CountryResolver, country: &str, code: Option<&str>) -> CountryKey {
        r.resolve_detailed(country, code).key
    }

    #[test]
    fn code_wins_over_name() {
        let r = CountryResolver::default();
        assert_eq!(resolve(&r, "Германия", Some("cn")), iso("CN"));
        assert!(r.resolve_detailed("Германия", Some("CN")).is_code_based());
    }

    #[test]
    fn codes_of_other_lengths_are_ignored() {
        let r = CountryResolver::default();
        assert_eq!(resolve(&r, "Китай", Some("CHN")), iso("CN"));
        assert_eq!(resolve(&r, "Китай", Some("")), iso("CN"));
    }

    #[test]
    fn both_locales_resolve_to_one_key() {
        let r = CountryResolver::default();
        for (ru, en) in [("Китай", "China"), ("Беларусь", "Belarus"), ("Германия", "Germany"), ("Турция", "Turkey")] {
            assert_eq!(resolve(&r, ru, None), resolve(&r, en, None), "{ru} / {en}");
            assert!(matches!(resolve(&r, ru, None), CountryKey::Iso(_)));
        }
    }

    #[test]
    fn override_table_covers_short_forms() {
        let r = CountryResolver::default();
        let knr = r.resolve_detailed("КНР", None);
        assert_eq!(knr.key, iso("CN"));
        assert_eq!(knr.via, ResolvedVia::Override);
        assert_eq!(resolve(&r, "Белоруссия", None), iso("BY"));
        assert_eq!(resolve(&r, "  сша ", None), iso("US"));
    }

    #[test]
    fn override_is_consulted_before_fallback_locale() {
        // "Korea" is an override only; "Republic of Korea" is in the English table.
        let r = CountryResolver::default();
        assert_eq!(r.resolve_detailed("Korea", None).via, ResolvedVia::Override);
        assert_eq!(r.resolve_detailed("Republic of Korea", None).via, ResolvedVia::Locale(Locale::En));
    }

    #[test]
    fn overrides_do_not_repeat_table_names() {
        for (code, names) in NAME_OVERRIDES {
            for name in *names {
                for locale in [Locale::Ru, Locale::En] {
                    assert_eq!(iso::alpha2_by_name(name, locale), None, "{code}: {name} is already a {locale:?} name");
                }
            }
        }
    }

    #[test]
    fn full_names_resolve_through_the_locale_table() {
        let r = CountryResolver::default();
        assert_eq!(r.resolve_detailed("Беларусь", None).via, ResolvedVia::Locale(Locale::Ru));
        assert_eq!(r.resolve_detailed("Китай", None).via, ResolvedVia::Locale(Locale::Ru));
        let en = CountryResolver::new(Locale::En, Locale::Ru);
        assert_eq!(en.resolve_detailed("Беларусь", None).via, ResolvedVia::Locale(Locale::Ru));
    }

    #[test]
    fn unknown_names_fall_back_to_folded_name() {
        let r = CountryResolver::default();
        let res = r.resolve_detailed("  Атлантида  Новая ", None);
        assert_eq!(res.key, CountryKey::Name("атлантида новая".into()));
        assert_eq!(res.via, ResolvedVia::Name);
        assert_eq!(resolve(&r, "АТЛАНТИДА новая", None), res.key);
    }

    #[test]
    fn folding_handles_yo_and_typography() {
        assert_eq!(fold_name("Объединённые  Арабские Эмираты"), "объединенные арабские эмираты");
        assert_eq!(fold_name("Côte d\u{2019}Ivoire"), "côte d'ivoire");
        assert_eq!(fold_name("Папуа \u{2014} Новая Гвинея"), "папуа - новая гвинея");
    }

    #[test]
    fn english_primary_locale() {
        let r = CountryResolver::new(Locale::En, Locale::Ru);
        assert_eq!(r.resolve_detailed("China", None).via, ResolvedVia::Locale(Locale::En));
        assert_eq!(r.resolve_detailed("Китай", None).via, ResolvedVia::Locale(Locale::Ru));
        assert_eq!(r.display_name(&iso("CN")), Some("China"));
    }

    #[test]
    fn numeric_id_follows_alpha2() {
        assert_eq!(iso("BY").numeric_id(), Some(112));
        assert_eq!(iso("ZZ").numeric_id(), None);
        assert_eq!(CountryKey::Name("x".into()).numeric_id(), None);
    }

    proptest! {
        #[test]
        fn two_letter_code_is_the_key(name in "\\PC{0,24}", code in "[A-Za-z]{2}") {
            let r = CountryResolver::default();
            prop_assert_eq!(resolve(&r, &name, Some(&code)), CountryKey::Iso(code.to_uppercase()));
        }

        #[test]
        fn registered_names_agree_across_locales(idx in 0..iso::COUNTRIES.len()) {
            let c = &iso::COUNTRIES[idx];
            let r = CountryResolver::default();
            let by_ru = resolve(&r, c.display_name(Locale::Ru), None);
            let by_en = resolve(&r, c.display_name(Locale::En), None);
            prop_assert_eq!(&by_ru, &by_en);
            prop_assert_eq!(by_ru, CountryKey::Iso(c.alpha2.to_string()));
        }
    }
}
