//! Store-link recognition rules.
//!
//! A [`RuleTable`] is an ordered list of [`ProvenanceRule`]s. Evaluation is
//! first-match: the earliest rule whose pattern matches anywhere in the text
//! decides the outcome, even when later rules would match as well.
//!
//! The built-in rules are plain data ([`BUILTIN_RULES`]); new providers are
//! added there or through the config file, never in the resolver.

use std::fmt;

use regex::Regex;

use crate::model::ProvenanceInfo;

/// Turns the matched substring into a canonical link.
#[derive(Clone)]
pub enum LinkTransform {
    /// The match is already canonical
    Verbatim,
    /// Pure function over the matched substring
    Rewrite(fn(&str) -> String),
    /// Regex replacement template (`$0`, `$1`, `${name}`) over the match
    Template(String),
}

impl fmt::Debug for LinkTransform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LinkTransform::Verbatim => f.write_str("Verbatim"),
            LinkTransform::Rewrite(_) => f.write_str("Rewrite(fn)"),
            LinkTransform::Template(template) => f.debug_tuple("Template").field(template).finish(),
        }
    }
}

/// One (pattern, provider, transform) triple.
#[derive(Debug, Clone)]
pub struct ProvenanceRule {
    pattern: Regex,
    provider: String,
    transform: LinkTransform,
}

impl ProvenanceRule {
    pub fn new(
        pattern: &str,
        provider: impl Into<String>,
        transform: LinkTransform,
    ) -> Result<Self, regex::Error> {
        Ok(Self {
            pattern: Regex::new(pattern)?,
            provider: provider.into(),
            transform,
        })
    }

    pub fn pattern(&self) -> &str {
        self.pattern.as_str()
    }

    pub fn provider(&self) -> &str {
        &self.provider
    }

    pub fn transform(&self) -> &LinkTransform {
        &self.transform
    }

    /// Apply the rule to free text. `None` if the pattern does not match.
    pub fn apply(&self, text: &str) -> Option<ProvenanceInfo> {
        let caps = self.pattern.captures(text)?;
        let matched = caps.get(0)?.as_str();
        let link = match &self.transform {
            LinkTransform::Verbatim => matched.to_string(),
            LinkTransform::Rewrite(rewrite) => rewrite(matched),
            LinkTransform::Template(template) => {
                // Expanded from the captures of the full-text match
                let mut link = String::new();
                caps.expand(template, &mut link);
                link
            }
        };
        Some(ProvenanceInfo::new(link, self.provider.clone()))
    }
}

/// Ordered, immutable set of rules. Order is priority.
#[derive(Debug, Clone, Default)]
pub struct RuleTable {
    rules: Vec<ProvenanceRule>,
}

impl RuleTable {
    pub fn new(rules: Vec<ProvenanceRule>) -> Self {
        Self { rules }
    }

    /// The built-in store rules.
    pub fn builtin() -> Self {
        Self::new(BUILTIN_RULES.iter().map(BuiltinRule::compile).collect())
    }

    /// A table whose rules come before `self`'s.
    pub fn preceded_by(self, rules: Vec<ProvenanceRule>) -> Self {
        let mut combined = rules;
        combined.extend(self.rules);
        Self::new(combined)
    }

    /// Result of the first rule that matches anywhere in `text`.
    pub fn first_match(&self, text: &str) -> Option<ProvenanceInfo> {
        self.rules.iter().find_map(|rule| rule.apply(text))
    }

    pub fn iter(&self) -> impl Iterator<Item = &ProvenanceRule> {
        self.rules.iter()
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

/// Static description of a built-in rule.
pub struct BuiltinRule {
    pub pattern: &'static str,
    pub provider: &'static str,
    pub rewrite: Option<fn(&str) -> String>,
}

impl BuiltinRule {
    fn compile(&self) -> ProvenanceRule {
        let transform = match self.rewrite {
            Some(rewrite) => LinkTransform::Rewrite(rewrite),
            None => LinkTransform::Verbatim,
        };
        // Patterns are constants covered by the tests below
        ProvenanceRule::new(self.pattern, self.provider, transform)
            .expect("built-in provenance pattern must compile")
    }
}

pub const BUILTIN_RULES: &[BuiltinRule] = &[
    BuiltinRule {
        pattern: r"https?://music\.apple\.com/[a-z]{2}/(?:album|song)/\S+",
        provider: "Apple Music",
        rewrite: None,
    },
    BuiltinRule {
        pattern: r"https?://itunes\.apple\.com/[a-z]{2}/album/\S+",
        provider: "Apple Music",
        rewrite: Some(itunes_to_music),
    },
    BuiltinRule {
        pattern: r"(?i)https?://[a-z0-9-]+\.bandcamp\.com/(?:track|album)/[a-z0-9-]+",
        provider: "Bandcamp",
        rewrite: Some(force_https),
    },
    BuiltinRule {
        pattern: r"https?://(?:www\.|m\.)?soundcloud\.com/[\w-]+/[\w-]+",
        provider: "SoundCloud",
        rewrite: Some(soundcloud),
    },
    BuiltinRule {
        pattern: r"https?://open\.spotify\.com/(?:intl-[a-z]+/)?track/[A-Za-z0-9]{22}",
        provider: "Spotify",
        rewrite: Some(spotify),
    },
    BuiltinRule {
        pattern: r"https?://(?:(?:www\.|music\.)?youtube\.com/watch\?v=|youtu\.be/)[\w-]{11}",
        provider: "YouTube",
        rewrite: Some(youtube),
    },
    BuiltinRule {
        pattern: r"https?://(?:[\w-]+\.)?booth\.pm/(?:[a-z]{2}/)?items/\d+",
        provider: "BOOTH",
        rewrite: Some(booth),
    },
];

fn force_https(link: &str) -> String {
    match link.strip_prefix("http://") {
        Some(rest) => format!("https://{rest}"),
        None => link.to_string(),
    }
}

fn after_host(link: &str) -> &str {
    let without_scheme = link.split_once("://").map_or(link, |(_, rest)| rest);
    without_scheme
        .split_once('/')
        .map_or("", |(_, path)| path)
}

fn last_segment(link: &str) -> &str {
    link.rsplit('/').next().unwrap_or(link)
}

fn itunes_to_music(link: &str) -> String {
    format!("https://music.apple.com/{}", after_host(link))
}

fn soundcloud(link: &str) -> String {
    format!("https://soundcloud.com/{}", after_host(link))
}

fn spotify(link: &str) -> String {
    format!("https://open.spotify.com/track/{}", last_segment(link))
}

fn youtube(link: &str) -> String {
    let id = link
        .split_once("v=")
        .map_or_else(|| last_segment(link), |(_, id)| id);
    format!("https://www.youtube.com/watch?v={id}")
}

fn booth(link: &str) -> String {
    format!("https://booth.pm/items/{}", last_segment(link))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn resolve(text: &str) -> Option<(String, String)> {
        RuleTable::builtin()
            .first_match(text)
            .map(|info| (info.provider().to_string(), info.link().to_string()))
    }

    #[test]
    fn test_builtin_rules_compile() {
        let table = RuleTable::builtin();
        assert_eq!(table.len(), BUILTIN_RULES.len());
    }

    #[test]
    fn test_apple_music_verbatim() {
        let url = "https://music.apple.com/us/album/arcahv/1523598787?i=1523598795";
        assert_eq!(
            resolve(url),
            Some(("Apple Music".to_string(), url.to_string()))
        );
    }

    #[test]
    fn test_apple_music_inside_text() {
        let text = "Purchased from https://music.apple.com/jp/album/x/1?i=2 on sale";
        let (provider, link) = resolve(text).unwrap();
        assert_eq!(provider, "Apple Music");
        assert_eq!(link, "https://music.apple.com/jp/album/x/1?i=2");
    }

    #[test]
    fn test_itunes_rewritten_to_music() {
        let (provider, link) =
            resolve("http://itunes.apple.com/us/album/genesong/1451411999?i=1451412277").unwrap();
        assert_eq!(provider, "Apple Music");
        assert_eq!(
            link,
            "https://music.apple.com/us/album/genesong/1451411999?i=1451412277"
        );
    }

    #[test]
    fn test_bandcamp_forced_https() {
        let (provider, link) = resolve("Visit http://lorn.bandcamp.com/track/acid-rain").unwrap();
        assert_eq!(provider, "Bandcamp");
        assert_eq!(link, "https://lorn.bandcamp.com/track/acid-rain");
    }

    #[test]
    fn test_soundcloud_canonical_host() {
        let (provider, link) = resolve("https://m.soundcloud.com/artist/some-track").unwrap();
        assert_eq!(provider, "SoundCloud");
        assert_eq!(link, "https://soundcloud.com/artist/some-track");
    }

    #[test]
    fn test_spotify_drops_locale() {
        let (provider, link) =
            resolve("https://open.spotify.com/intl-ja/track/4uLU6hMCjMI75M1A2tKUQC?si=abc")
                .unwrap();
        assert_eq!(provider, "Spotify");
        assert_eq!(link, "https://open.spotify.com/track/4uLU6hMCjMI75M1A2tKUQC");
    }

    #[test]
    fn test_youtube_short_and_long_forms() {
        let expected = "https://www.youtube.com/watch?v=dQw4w9WgXcQ";
        assert_eq!(resolve("https://youtu.be/dQw4w9WgXcQ").unwrap().1, expected);
        assert_eq!(
            resolve("https://music.youtube.com/watch?v=dQw4w9WgXcQ&list=x")
                .unwrap()
                .1,
            expected
        );
    }

    #[test]
    fn test_booth_shop_subdomain() {
        let (provider, link) = resolve("https://shop.booth.pm/ja/items/123456").unwrap();
        assert_eq!(provider, "BOOTH");
        assert_eq!(link, "https://booth.pm/items/123456");
    }

    #[test]
    fn test_no_rule_matches() {
        assert_eq!(resolve("Ripped from CD"), None);
        assert_eq!(resolve(""), None);
    }

    #[test]
    fn test_first_rule_in_table_order_wins() {
        // Text mentions a Bandcamp link before an Apple Music link, but the
        // Apple Music rule comes first in the table.
        let text = "https://a.bandcamp.com/track/b https://music.apple.com/us/album/c/1?i=2";
        let (provider, _) = resolve(text).unwrap();
        assert_eq!(provider, "Apple Music");
    }

    #[test]
    fn test_template_transform() {
        let rule = ProvenanceRule::new(
            r"mystore:(\d+)",
            "My Store",
            LinkTransform::Template("https://my.store/t/$1".to_string()),
        )
        .unwrap();

        let info = rule.apply("bought at mystore:42 yesterday").unwrap();
        assert_eq!(info.link(), "https://my.store/t/42");
        assert_eq!(info.provider(), "My Store");
    }

    #[test]
    fn test_template_uses_surrounding_context() {
        let rule = ProvenanceRule::new(
            r"\Bcat(\d+)",
            "Shop",
            LinkTransform::Template("https://shop/$1".to_string()),
        )
        .unwrap();

        let info = rule.apply("bobcat5").unwrap();
        assert_eq!(info.link(), "https://shop/5");

        let anchored = ProvenanceRule::new(
            r"^id:(\w+)",
            "Anchored",
            LinkTransform::Template("https://a.example/${1}".to_string()),
        )
        .unwrap();
        assert_eq!(
            anchored.apply("id:xyz and more").unwrap().link(),
            "https://a.example/xyz"
        );
        assert!(anchored.apply("see id:xyz").is_none());
    }

    #[test]
    fn test_preceded_by_takes_priority() {
        let custom = ProvenanceRule::new(
            r"https://music\.apple\.com/\S+",
            "Custom",
            LinkTransform::Verbatim,
        )
        .unwrap();
        let table = RuleTable::builtin().preceded_by(vec![custom]);

        let info = table
            .first_match("https://music.apple.com/us/album/x/1?i=2")
            .unwrap();
        assert_eq!(info.provider(), "Custom");
        assert_eq!(table.len(), BUILTIN_RULES.len() + 1);
    }

    #[test]
    fn test_empty_table_matches_nothing() {
        let table = RuleTable::default();
        assert!(table.is_empty());
        assert!(table.first_match("https://music.apple.com/us/album/x/1").is_none());
    }
}
