//! Keyword tables that turn the free-text aura description into target
//! classes and buffed stats.
//!
//! The wiki describes a T-Doll's formation buff in prose ("Increases
//! damage and rate of fire of SMGs by ..."). Both scans split the text on
//! single spaces and test every token against every rule, in table order.

/// One way a token can match a rule.
#[derive(Debug, Clone, Copy)]
enum Match {
    /// Lowercased token equals the pattern.
    LowerEq(&'static str),
    /// Lowercased token contains the pattern.
    LowerContains(&'static str),
    /// Token equals the pattern, case-sensitive.
    Eq(&'static str),
    /// Token contains the pattern, case-sensitive.
    Contains(&'static str),
}

impl Match {
    fn test(self, token: &str, lower: &str) -> bool {
        match self {
            Match::LowerEq(p) => lower == p,
            Match::LowerContains(p) => lower.contains(p),
            Match::Eq(p) => token == p,
            Match::Contains(p) => token.contains(p),
        }
    }
}

/// A class tag that stops a less specific rule from firing once a more
/// specific one has: "submachine" implies the later "machine" is not an MG,
/// "assault" implies the later "rifles" are not RFs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Suppress {
    Mg,
    Rf,
}

#[derive(Debug, Default)]
struct Suppressed {
    mg: bool,
    rf: bool,
}

impl Suppressed {
    fn get(&self, tag: Suppress) -> bool {
        match tag {
            Suppress::Mg => self.mg,
            Suppress::Rf => self.rf,
        }
    }

    fn set(&mut self, tag: Suppress) {
        match tag {
            Suppress::Mg => self.mg = true,
            Suppress::Rf => self.rf = true,
        }
    }
}

struct TargetRule {
    any_of: &'static [Match],
    emits: &'static [&'static str],
    /// Suppression raised when this rule fires.
    sets: Option<Suppress>,
    /// Rule is skipped while this suppression is raised.
    unless: Option<Suppress>,
}

const fn rule(any_of: &'static [Match], emits: &'static [&'static str]) -> TargetRule {
    TargetRule {
        any_of,
        emits,
        sets: None,
        unless: None,
    }
}

static TARGET_RULES: &[TargetRule] = &[
    rule(
        &[Match::LowerEq("all")],
        &["hg", "smg", "ar", "sg", "mg", "rf"],
    ),
    TargetRule {
        sets: Some(Suppress::Mg),
        ..rule(
            &[
                Match::LowerEq("submachine"),
                Match::LowerContains("sub"),
                Match::Contains("SMG"),
            ],
            &["smg"],
        )
    },
    TargetRule {
        sets: Some(Suppress::Rf),
        ..rule(&[Match::LowerEq("assault"), Match::Contains("AR")], &["ar"])
    },
    rule(
        &[
            Match::LowerEq("handguns"),
            Match::Eq("pistols"),
            Match::Contains("HG"),
        ],
        &["hg"],
    ),
    rule(&[Match::LowerEq("shotguns"), Match::Contains("SG")], &["sg"]),
    TargetRule {
        unless: Some(Suppress::Mg),
        ..rule(
            &[Match::LowerEq("machine"), Match::LowerEq("machineguns")],
            &["mg"],
        )
    },
    rule(&[Match::Eq("MG"), Match::Eq("MGs")], &["mg"]),
    TargetRule {
        unless: Some(Suppress::Rf),
        ..rule(&[Match::LowerEq("rifles"), Match::Contains("RF")], &["rf"])
    },
];

/// Weapon classes (lowercase codes) named by an aura target sentence.
///
/// Duplicates are kept: "SMGs and submachine guns" yields `smg` twice.
pub fn scan_targets(text: &str) -> Vec<String> {
    let mut suppressed = Suppressed::default();
    let mut targets = Vec::new();

    for token in text.split(' ') {
        let lower = token.to_lowercase();
        for rule in TARGET_RULES {
            if rule.unless.is_some_and(|tag| suppressed.get(tag)) {
                continue;
            }
            if !rule.any_of.iter().any(|m| m.test(token, &lower)) {
                continue;
            }
            targets.extend(rule.emits.iter().map(|tag| tag.to_string()));
            if let Some(tag) = rule.sets {
                suppressed.set(tag);
            }
        }
    }

    targets
}

static BUFF_RULES: &[(&[&str], &str)] = &[
    (&["damage", "firepower"], "damage"),
    (&["fire"], "rof"),
    (&["accuracy"], "accuracy"),
    (&["evasion"], "evasion"),
    (&["critical"], "crit_rate"),
    (&["skill"], "skill_cd"),
    (&["armor", "armour"], "armor"),
];

/// Stat identifiers named by the aura effect sentences, in reading order.
pub fn scan_buffs<'a>(texts: impl IntoIterator<Item = &'a str>) -> Vec<String> {
    let mut buffs = Vec::new();
    for text in texts {
        for token in text.split(' ') {
            let lower = token.to_lowercase();
            for (words, stat) in BUFF_RULES {
                if words.contains(&lower.as_str()) {
                    buffs.push(stat.to_string());
                }
            }
        }
    }
    buffs
}
