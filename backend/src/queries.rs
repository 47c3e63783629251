//! The catalog of named analytical queries.
//!
//! Every entry is read-only and takes no parameters. The catalog is a plain
//! value: build it once with `QueryCatalog::new()` and hand a reference to
//! whatever runs the queries.

use crate::types::MatchFormat;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogQuery {
    pub name: &'static str,
    pub format: MatchFormat,
    pub description: &'static str,
    pub sql: &'static str,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryCatalog {
    queries: Vec<CatalogQuery>,
}

impl QueryCatalog {
    pub fn new() -> Self {
        QueryCatalog { queries: catalog_queries() }
    }

    pub fn get(&self, name: &str) -> Option<&CatalogQuery> {
        self.queries.iter().find(|q| q.name == name)
    }

    /// Entries in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = &CatalogQuery> {
        self.queries.iter()
    }

    pub fn names(&self) -> Vec<&'static str> {
        self.queries.iter().map(|q| q.name).collect()
    }

    pub fn for_format(&self, format: MatchFormat) -> Vec<&CatalogQuery> {
        self.queries.iter().filter(|q| q.format == format).collect()
    }

    pub fn len(&self) -> usize {
        self.queries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queries.is_empty()
    }
}

impl Default for QueryCatalog {
    fn default() -> Self {
        Self::new()
    }
}

fn catalog_queries() -> Vec<CatalogQuery> {
    vec![
        // Test matches
        CatalogQuery {
            name: "top_test_players",
            format: MatchFormat::Test,
            description: "Players with the most player-of-the-match awards in test matches",
            sql: r#"
                SELECT player_of_match, COUNT(*) AS awards_count
                FROM test_matches
                WHERE player_of_match IS NOT NULL
                GROUP BY player_of_match
                ORDER BY awards_count DESC
                LIMIT 10;
            "#,
        },
        CatalogQuery {
            name: "test_match_cities",
            format: MatchFormat::Test,
            description: "Cities hosting the most test matches",
            sql: r#"
                SELECT city, COUNT(*) AS match_count
                FROM test_matches
                WHERE city IS NOT NULL
                GROUP BY city
                ORDER BY match_count DESC
                LIMIT 10;
            "#,
        },
        CatalogQuery {
            name: "test_match_team_wins",
            format: MatchFormat::Test,
            description: "Teams with the most test match wins",
            sql: r#"
                SELECT outcome_winner, COUNT(*) AS win_count
                FROM test_matches
                WHERE outcome_winner IS NOT NULL
                GROUP BY outcome_winner
                ORDER BY win_count DESC
                LIMIT 10;
            "#,
        },

        // ODI matches
        CatalogQuery {
            name: "highest_run_victories_odi",
            format: MatchFormat::Odi,
            description: "Largest one-day victories by runs",
            sql: r#"
                SELECT outcome_by_runs, city, season
                FROM odi_matches
                WHERE outcome_by_runs IS NOT NULL
                ORDER BY outcome_by_runs DESC
                LIMIT 10;
            "#,
        },
        CatalogQuery {
            name: "overs_distribution_odi",
            format: MatchFormat::Odi,
            description: "One-day matches per scheduled overs",
            sql: r#"
                SELECT overs, COUNT(*) AS match_count
                FROM odi_matches
                WHERE overs IS NOT NULL
                GROUP BY overs
                ORDER BY match_count DESC;
            "#,
        },
        CatalogQuery {
            name: "frequent_venues_odi",
            format: MatchFormat::Odi,
            description: "Cities hosting the most one-day matches",
            sql: r#"
                SELECT city, COUNT(*) AS match_count
                FROM odi_matches
                WHERE city IS NOT NULL
                GROUP BY city
                ORDER BY match_count DESC
                LIMIT 10;
            "#,
        },

        // T20 matches
        CatalogQuery {
            name: "top_t20_players",
            format: MatchFormat::T20,
            description: "Players with the most player-of-the-match awards in T20 matches",
            sql: r#"
                SELECT player_of_match, COUNT(*) AS awards_count
                FROM t20_matches
                WHERE player_of_match IS NOT NULL
                GROUP BY player_of_match
                ORDER BY awards_count DESC
                LIMIT 10;
            "#,
        },
        CatalogQuery {
            name: "t20_team_wins",
            format: MatchFormat::T20,
            description: "Teams with the most T20 wins",
            sql: r#"
                SELECT outcome_winner, COUNT(*) AS win_count
                FROM t20_matches
                WHERE outcome_winner IS NOT NULL
                GROUP BY outcome_winner
                ORDER BY win_count DESC
                LIMIT 10;
            "#,
        },
        CatalogQuery {
            name: "smallest_margin_wickets_t20",
            format: MatchFormat::T20,
            description: "Narrowest T20 victories by wickets",
            sql: r#"
                SELECT match_id, outcome_by_wickets, season
                FROM t20_matches
                WHERE outcome_by_wickets IS NOT NULL
                ORDER BY outcome_by_wickets ASC
                LIMIT 10;
            "#,
        },
        CatalogQuery {
            name: "gender_distribution_t20",
            format: MatchFormat::T20,
            description: "T20 matches per gender",
            sql: r#"
                SELECT gender, COUNT(*) AS match_count
                FROM t20_matches
                GROUP BY gender
                ORDER BY match_count DESC;
            "#,
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_catalog_size_per_format() {
        let catalog = QueryCatalog::new();
        assert_eq!(catalog.len(), 10);
        assert_eq!(catalog.for_format(MatchFormat::Test).len(), 3);
        assert_eq!(catalog.for_format(MatchFormat::Odi).len(), 3);
        assert_eq!(catalog.for_format(MatchFormat::T20).len(), 4);
    }

    #[test]
    fn test_names_are_unique_and_ordered() {
        let catalog = QueryCatalog::new();
        let names = catalog.names();
        let unique: HashSet<&str> = names.iter().copied().collect();
        assert_eq!(unique.len(), names.len());
        assert_eq!(names.first(), Some(&"top_test_players"));
        assert_eq!(names.last(), Some(&"gender_distribution_t20"));
    }

    #[test]
    fn test_queries_read_their_format_table() {
        let catalog = QueryCatalog::new();
        for q in catalog.iter() {
            assert!(q.sql.contains(&format!("FROM {}", q.format.table_name())), "{}", q.name);
            assert!(q.sql.trim_start().starts_with("SELECT"), "{}", q.name);
            assert!(!q.sql.contains('?'), "{} takes parameters", q.name);
        }
    }

    #[test]
    fn test_get() {
        let catalog = QueryCatalog::new();
        assert_eq!(catalog.get("t20_team_wins").map(|q| q.format), Some(MatchFormat::T20));
        assert!(catalog.get("top_odi_players").is_none());
    }
}
