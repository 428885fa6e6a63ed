use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RouteType {
    IntraZone,
    HubToMunicipality,
    GenericOutside,
    DestinationSpecial,
}

/// A corridor definition. `None` on a zone means "any". Immutable during a
/// quote; administrators own the records.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RouteRule {
    pub id: String,
    pub origin_zone: Option<String>,
    pub destination_zone: Option<String>,
    pub route_type: RouteType,
    pub priority: i32,
    pub active: bool,
}

impl RouteRule {
    fn matches(&self, origin: Option<&str>, destination: Option<&str>) -> bool {
        if !self.active {
            return false;
        }

        let origin_ok = match &self.origin_zone {
            Some(zone) => origin == Some(zone.as_str()),
            None => true,
        };
        let destination_ok = match &self.destination_zone {
            Some(zone) => destination == Some(zone.as_str()),
            None => true,
        };

        origin_ok && destination_ok
    }

    /// Rules naming both zones beat any wildcard rule, regardless of priority.
    fn is_exact(&self) -> bool {
        self.origin_zone.is_some() && self.destination_zone.is_some()
    }
}

/// Picks the winning rule for a zone pair: exact match over wildcard, then
/// higher priority, then lexicographically smallest id. The id tie-break is
/// arbitrary but keeps selection deterministic across runs.
pub fn select_route_rule<'a>(
    rules: &'a [RouteRule],
    origin: Option<&str>,
    destination: Option<&str>,
) -> Option<&'a RouteRule> {
    rules
        .iter()
        .filter(|rule| rule.matches(origin, destination))
        .max_by(|a, b| {
            a.is_exact()
                .cmp(&b.is_exact())
                .then(a.priority.cmp(&b.priority))
                .then(b.id.cmp(&a.id))
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rule(
        id: &str,
        origin: Option<&str>,
        destination: Option<&str>,
        priority: i32,
    ) -> RouteRule {
        RouteRule {
            id: id.into(),
            origin_zone: origin.map(Into::into),
            destination_zone: destination.map(Into::into),
            route_type: RouteType::GenericOutside,
            priority,
            active: true,
        }
    }

    #[test]
    fn exact_match_beats_higher_priority_wildcard() {
        let rules = vec![
            rule("r-wild", Some("medellin"), None, 99),
            rule("r-exact", Some("medellin"), Some("oriente"), 1),
        ];

        let selected = select_route_rule(&rules, Some("medellin"), Some("oriente"));
        assert_eq!(selected.map(|r| r.id.as_str()), Some("r-exact"));
    }

    #[test]
    fn higher_priority_wins_among_wildcards() {
        let rules = vec![
            rule("r-low", Some("medellin"), None, 1),
            rule("r-high", None, Some("oriente"), 5),
        ];

        let selected = select_route_rule(&rules, Some("medellin"), Some("oriente"));
        assert_eq!(selected.map(|r| r.id.as_str()), Some("r-high"));
    }

    #[test]
    fn tie_breaks_on_smallest_id() {
        let rules = vec![
            rule("r-b", Some("medellin"), None, 3),
            rule("r-a", Some("medellin"), None, 3),
        ];

        let selected = select_route_rule(&rules, Some("medellin"), None);
        assert_eq!(selected.map(|r| r.id.as_str()), Some("r-a"));
    }

    #[test]
    fn inactive_rules_are_skipped() {
        let mut inactive = rule("r-1", Some("medellin"), Some("oriente"), 9);
        inactive.active = false;
        let rules = vec![inactive, rule("r-2", None, None, 0)];

        let selected = select_route_rule(&rules, Some("medellin"), Some("oriente"));
        assert_eq!(selected.map(|r| r.id.as_str()), Some("r-2"));
    }

    #[test]
    fn named_zone_does_not_match_a_different_pair() {
        let rules = vec![rule("r-1", Some("medellin"), Some("oriente"), 1)];

        assert!(select_route_rule(&rules, Some("medellin"), Some("norte")).is_none());
        assert!(select_route_rule(&rules, None, Some("oriente")).is_none());
    }
}
