//! The ordered pattern cascade run over free text.
//!
//! Each [`Rule`] names the fields it can fill and a matcher that proposes
//! values. A rule is skipped once every field it targets is filled, and the
//! engine only ever writes into absent fields, so earlier rules win.

use regex_lite::Regex;
use std::sync::LazyLock;
use tracing::{trace, warn};
use wayfinder_core::location::{LocationField, LocationRecord};

use super::gazetteer;
use super::title_case;

use LocationField::{City, Country, Name};

/// Values a matcher proposes, in fill order.
type Hits = Vec<(LocationField, String)>;

type Matcher = fn(&str, &LocationRecord) -> Option<Hits>;

/// One step of the cascade.
pub struct Rule {
    pub name: &'static str,
    pub targets: &'static [LocationField],
    matcher: Matcher,
}

impl Rule {
    fn applies_to(&self, record: &LocationRecord) -> bool {
        self.targets.iter().any(|f| !record.has(*f))
    }
}

pub static RULES: [Rule; 13] = [
    Rule {
        name: "labeled_fields",
        targets: &[Name, City, Country],
        matcher: labeled_fields,
    },
    Rule {
        name: "preposition_city_country",
        targets: &[City, Country],
        matcher: preposition_city_country,
    },
    Rule {
        name: "bare_city_country",
        targets: &[City, Country],
        matcher: bare_city_country,
    },
    Rule {
        name: "postal_code_city",
        targets: &[City],
        matcher: postal_code_city,
    },
    Rule {
        name: "label_name",
        targets: &[Name],
        matcher: label_name,
    },
    Rule {
        name: "leading_subject",
        targets: &[Name],
        matcher: leading_subject,
    },
    Rule {
        name: "definite_article_name",
        targets: &[Name],
        matcher: definite_article_name,
    },
    Rule {
        name: "leading_appositive",
        targets: &[Name],
        matcher: leading_appositive,
    },
    Rule {
        name: "alias",
        targets: &[Name],
        matcher: alias,
    },
    Rule {
        name: "terrain_feature",
        targets: &[Name],
        matcher: terrain_feature,
    },
    Rule {
        name: "preposition_city",
        targets: &[City],
        matcher: preposition_city,
    },
    Rule {
        name: "country_mention",
        targets: &[Country],
        matcher: country_mention,
    },
    Rule {
        name: "gazetteer",
        targets: &[City, Country],
        matcher: gazetteer_inference,
    },
];

/// Run the whole cascade over `text`, filling absent fields of `record`.
pub fn apply(text: &str, record: &mut LocationRecord) {
    for rule in &RULES {
        if !rule.applies_to(record) {
            continue;
        }
        let Some(hits) = (rule.matcher)(text, record) else {
            continue;
        };
        for (field, value) in hits {
            if rule.targets.contains(&field) && record.fill_missing(field, title_case(&value)) {
                trace!(rule = rule.name, field = %field, "Extraction rule filled field");
            }
        }
    }
}

// --- Patterns ---

/// A rule whose pattern fails to compile is skipped, never fatal.
fn pattern(source: &str) -> Option<Regex> {
    match Regex::new(source) {
        Ok(re) => Some(re),
        Err(e) => {
            warn!(pattern = source, error = %e, "Extraction pattern failed to compile");
            None
        }
    }
}

const PROPER_PHRASE: &str = r"[A-Z][a-z]+(?:\s+[A-Z][a-z]+)?";

static LABELS: LazyLock<[(LocationField, Option<Regex>); 3]> = LazyLock::new(|| {
    [
        (Name, pattern(r"(?i)name:\s*([A-Za-z][A-Za-z\s]{1,30}?)(?:,|\n|$)")),
        (City, pattern(r"(?i)city:\s*([A-Za-z][A-Za-z\s]{1,25}?)(?:,|\n|$)")),
        (Country, pattern(r"(?i)country:\s*([A-Za-z][A-Za-z\s]{1,20}?)(?:,|\n|$)")),
    ]
});

static CONNECTIVE: LazyLock<Option<Regex>> =
    LazyLock::new(|| pattern(r"\b(?:is|are|was|were|the|an|in|at|of|to|for)\b"));

static PREPOSITION_PAIR: LazyLock<Option<Regex>> = LazyLock::new(|| {
    pattern(&format!(
        r"\b(?:in|at|near)\s+({PROPER_PHRASE}),\s*({PROPER_PHRASE})(?:\.|,|$|\s)"
    ))
});

static BARE_PAIR: LazyLock<Option<Regex>> =
    LazyLock::new(|| pattern(&format!(r"\b({PROPER_PHRASE}),\s+({PROPER_PHRASE})\b")));

static POSTAL_CODE: LazyLock<Option<Regex>> =
    LazyLock::new(|| pattern(r"\d{4,5}\s+([A-Z][a-zA-Z]+)"));

static LABEL: LazyLock<Option<Regex>> =
    LazyLock::new(|| pattern(r"(?i)(?:location|address|place|landmark):\s*([^,\n]+)"));

static LEADING_SUBJECT: LazyLock<Option<Regex>> =
    LazyLock::new(|| pattern(&format!(r"^({PROPER_PHRASE})\s+(?:is|was)\b")));

static DEFINITE_ARTICLE: LazyLock<Option<Regex>> =
    LazyLock::new(|| pattern(r"The\s+([A-Z][a-zA-Z]+(?:\s+[A-Z][a-zA-Z]+)?)\s*[\(\[,]"));

static LEADING_APPOSITIVE: LazyLock<Option<Regex>> =
    LazyLock::new(|| pattern(r"^([A-Z][a-zA-Z]+(?:\s+[A-Z][a-zA-Z]+)?)\s*,"));

static ALIAS: LazyLock<Option<Regex>> = LazyLock::new(|| {
    pattern(r"(?i)(?:called|known as|named)\s+(?:the\s+)?([A-Z][a-zA-Z\s]+?)(?:\s+is|\s+in|\s+at|,|\.|$)")
});

static LEADING_PHRASE: LazyLock<Option<Regex>> =
    LazyLock::new(|| pattern(&format!(r"^({PROPER_PHRASE})\s+")));

static TERRAIN: LazyLock<Option<Regex>> = LazyLock::new(|| {
    pattern(
        r"\b(?:on|atop|at|near|up)\s+([A-Z][a-z]+(?:\s+[A-Z][a-z]+){0,2})\s+(?i:hills?|mountains?|mount|peak|volcano|island|lake|river|valley|beach|bay|cave|falls|waterfall)\b",
    )
});

static PREPOSITION_PLACE: LazyLock<Option<Regex>> =
    LazyLock::new(|| pattern(&format!(r"\b(?:in|near|at)\s+({PROPER_PHRASE})")));

/// Values that mean "nothing here".
const STOPLIST: &[&str] = &[
    "null", "none", "unknown", "n/a", "[name]", "[city]", "[country]", "",
];

/// Leading words that look like proper nouns but never name a place.
const NON_NAMES: &[&str] = &[
    "The", "A", "An", "It", "This", "That", "These", "Those", "There", "We", "I", "My", "Our",
];

/// Longest city or country candidate accepted from the pair rules.
const MAX_PAIR_LEN: usize = 20;

// --- Matchers ---

fn labeled_fields(text: &str, _: &LocationRecord) -> Option<Hits> {
    let hits: Hits = LABELS
        .iter()
        .filter_map(|(field, re)| {
            let value = re.as_ref()?.captures(text)?.get(1)?.as_str().trim();
            accept_labeled(*field, value).then(|| (*field, value.to_string()))
        })
        .collect();
    Some(hits)
}

fn accept_labeled(field: LocationField, value: &str) -> bool {
    let lower = value.to_ascii_lowercase();
    if STOPLIST.contains(&lower.as_str()) {
        return false;
    }
    field == Name || !CONNECTIVE.as_ref().is_some_and(|re| re.is_match(&lower))
}

fn city_country_pair(re: &Option<Regex>, text: &str) -> Option<Hits> {
    let caps = re.as_ref()?.captures(text)?;
    let city = caps.get(1)?.as_str().trim();
    let country = caps.get(2)?.as_str().trim();
    (city.len() <= MAX_PAIR_LEN && country.len() <= MAX_PAIR_LEN)
        .then(|| vec![(City, city.to_string()), (Country, country.to_string())])
}

fn preposition_city_country(text: &str, _: &LocationRecord) -> Option<Hits> {
    city_country_pair(&PREPOSITION_PAIR, text)
}

fn bare_city_country(text: &str, _: &LocationRecord) -> Option<Hits> {
    city_country_pair(&BARE_PAIR, text)
}

fn first_capture(re: &Option<Regex>, text: &str) -> Option<String> {
    let value = re.as_ref()?.captures(text)?.get(1)?.as_str().trim();
    (!value.is_empty()).then(|| value.to_string())
}

fn postal_code_city(text: &str, _: &LocationRecord) -> Option<Hits> {
    first_capture(&POSTAL_CODE, text).map(|city| vec![(City, city)])
}

fn label_name(text: &str, _: &LocationRecord) -> Option<Hits> {
    first_capture(&LABEL, text).map(|name| vec![(Name, name)])
}

/// A proper-noun phrase at the very start of the text, matched by `re`.
fn leading_name(re: &Option<Regex>, text: &str) -> Option<String> {
    first_capture(re, text).filter(|name| !NON_NAMES.contains(&name.as_str()))
}

fn leading_subject(text: &str, _: &LocationRecord) -> Option<Hits> {
    leading_name(&LEADING_SUBJECT, text).map(|name| vec![(Name, name)])
}

fn definite_article_name(text: &str, _: &LocationRecord) -> Option<Hits> {
    first_capture(&DEFINITE_ARTICLE, text).map(|name| vec![(Name, format!("The {name}"))])
}

fn leading_appositive(text: &str, _: &LocationRecord) -> Option<Hits> {
    leading_name(&LEADING_APPOSITIVE, text).map(|name| vec![(Name, name)])
}

fn alias(text: &str, _: &LocationRecord) -> Option<Hits> {
    let nickname = first_capture(&ALIAS, text)?;
    let name = leading_name(&LEADING_PHRASE, text).unwrap_or(nickname);
    Some(vec![(Name, name)])
}

fn terrain_feature(text: &str, _: &LocationRecord) -> Option<Hits> {
    first_capture(&TERRAIN, text).map(|name| vec![(Name, name)])
}

fn preposition_city(text: &str, record: &LocationRecord) -> Option<Hits> {
    let re = PREPOSITION_PLACE.as_ref()?;
    let city = re
        .captures_iter(text)
        .filter_map(|caps| caps.get(1).map(|m| m.as_str().trim().to_string()))
        .find(|candidate| {
            candidate.len() <= MAX_PAIR_LEN
                && !NON_NAMES.contains(&candidate.as_str())
                && !gazetteer::is_country(candidate)
                && record
                    .name
                    .as_deref()
                    .is_none_or(|name| !name.eq_ignore_ascii_case(candidate))
        })?;
    Some(vec![(City, city)])
}

fn country_mention(text: &str, _: &LocationRecord) -> Option<Hits> {
    gazetteer::COUNTRIES
        .iter()
        .filter_map(|country| find_word(text, country).map(|at| (at, *country)))
        .min_by_key(|(at, _)| *at)
        .map(|(_, country)| vec![(Country, country.to_string())])
}

/// Byte offset of the first whole-word occurrence of `word` in `text`.
fn find_word(text: &str, word: &str) -> Option<usize> {
    text.match_indices(word).map(|(at, _)| at).find(|&at| {
        let before = text[..at].chars().next_back();
        let after = text[at + word.len()..].chars().next();
        !before.is_some_and(char::is_alphanumeric) && !after.is_some_and(char::is_alphanumeric)
    })
}

fn gazetteer_inference(_: &str, record: &LocationRecord) -> Option<Hits> {
    let mut hits = Hits::new();

    let known = record.name.as_deref().and_then(|name| {
        gazetteer::landmark(name).or_else(|| gazetteer::landmark(name.strip_prefix("The ")?))
    });
    if let Some((city, country)) = known {
        hits.push((City, city.to_string()));
        hits.push((Country, country.to_string()));
    }

    let city = record
        .city
        .as_deref()
        .or_else(|| known.map(|(city, _)| city));
    if let Some(country) = city.and_then(gazetteer::country_of_city) {
        hits.push((Country, country.to_string()));
    }

    (!hits.is_empty()).then_some(hits)
}
