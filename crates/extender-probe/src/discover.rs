//! Discovery of collections encoded as numbered keys (`modem1`, `sim2`, ...).

use regex::Regex;
use serde_json::{Map, Value};

/// Matcher for `<prefix><1..=max_digits digits>` keys.
#[derive(Debug, Clone)]
pub struct SlotPattern {
    re: Regex,
}

impl SlotPattern {
    pub fn new(prefix: &str, max_digits: usize) -> Result<Self, regex::Error> {
        let re = Regex::new(&format!(
            "^{}[0-9]{{1,{}}}$",
            regex::escape(prefix),
            max_digits.max(1)
        ))?;
        Ok(Self { re })
    }

    pub fn matches(&self, key: &str) -> bool {
        self.re.is_match(key)
    }

    /// All matching keys of `map` whose value is an object, ordered by key.
    ///
    /// Matching keys holding anything else are skipped.
    pub fn discover<'a>(&self, map: &'a Map<String, Value>) -> Vec<(&'a str, &'a Map<String, Value>)> {
        let mut found: Vec<_> = map
            .iter()
            .filter(|(k, _)| self.matches(k))
            .filter_map(|(k, v)| match v.as_object() {
                Some(obj) => Some((k.as_str(), obj)),
                None => {
                    tracing::debug!(key = %k, "slot key does not hold an object, skipping");
                    None
                }
            })
            .collect();
        found.sort_by(|a, b| a.0.cmp(b.0));
        found
    }
}

/// The patterns used for extender payloads.
#[derive(Debug, Clone)]
pub struct SlotPatterns {
    pub modem: SlotPattern,
    pub sim: SlotPattern,
}

impl SlotPatterns {
    /// `modem1`..`modem99` and `sim1`..`sim99`.
    pub fn extender() -> Result<Self, regex::Error> {
        Ok(Self {
            modem: SlotPattern::new("modem", 2)?,
            sim: SlotPattern::new("sim", 2)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn matches_one_or_two_digits_only() -> anyhow::Result<()> {
        let p = SlotPattern::new("modem", 2)?;
        for k in ["modem1", "modem2", "modem10", "modem99", "modem0", "modem07"] {
            assert!(p.matches(k), "{k} should match");
        }
        for k in ["modem", "modemA", "modem100", "xmodem1", "modem1x", "Modem1", "sim1"] {
            assert!(!p.matches(k), "{k} should not match");
        }
        Ok(())
    }

    #[test]
    fn sim_pattern() -> anyhow::Result<()> {
        let p = SlotPatterns::extender()?.sim;
        assert!(p.matches("sim1"));
        assert!(p.matches("sim99"));
        assert!(!p.matches("sim"));
        assert!(!p.matches("sim100"));
        assert!(!p.matches("simA"));
        Ok(())
    }

    #[test]
    fn prefix_is_literal() -> anyhow::Result<()> {
        let p = SlotPattern::new("a.b", 1)?;
        assert!(p.matches("a.b1"));
        assert!(!p.matches("axb1"));
        Ok(())
    }

    #[test]
    fn discovers_objects_and_skips_scalars() -> anyhow::Result<()> {
        let p = SlotPattern::new("sim", 2)?;
        let v = json!({
            "sim2": {"imsi": "b"},
            "sim1": {"imsi": "a"},
            "sim3": "not-a-map",
            "sim_count": 3,
            "name": "x"
        });
        let map = v.as_object().cloned().unwrap_or_default();
        let found = p.discover(&map);
        let keys: Vec<&str> = found.iter().map(|(k, _)| *k).collect();
        assert_eq!(keys, vec!["sim1", "sim2"]);
        assert_eq!(found[0].1["imsi"], "a");
        Ok(())
    }

    #[test]
    fn zero_matches_is_empty() -> anyhow::Result<()> {
        let p = SlotPattern::new("modem", 2)?;
        let map = Map::new();
        assert!(p.discover(&map).is_empty());
        Ok(())
    }

    #[test]
    fn gaps_are_preserved() -> anyhow::Result<()> {
        let p = SlotPattern::new("modem", 2)?;
        let v = json!({"modem3": {}, "modem42": {}});
        let map = v.as_object().cloned().unwrap_or_default();
        let keys: Vec<&str> = p.discover(&map).iter().map(|(k, _)| *k).collect();
        assert_eq!(keys, vec!["modem3", "modem42"]);
        Ok(())
    }
}
