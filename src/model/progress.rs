use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::model::module::ModuleType;

/// Running aggregate for one (profile, module) pair. Created on the first
/// attempt, updated on every submission, never deleted individually.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProgressRecord {
    pub attempts: u32,
    /// Sum of per-attempt score percentages; divide by attempts for the mean.
    pub total_score: f64,
    pub best_score: f64,
    pub last_attempt: Option<DateTime<Utc>>,
}

/// All recorded progress, keyed by profile name then module.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProgressBook {
    records: HashMap<String, HashMap<ModuleType, ProgressRecord>>,
}

impl ProgressBook {
    pub fn record_attempt(
        &mut self,
        profile_name: &str,
        module: ModuleType,
        score: usize,
        total: usize,
    ) {
        if total == 0 {
            return;
        }
        let percent = score as f64 / total as f64 * 100.0;
        let record = self
            .records
            .entry(profile_name.to_string())
            .or_default()
            .entry(module)
            .or_default();
        record.attempts += 1;
        record.total_score += percent;
        record.best_score = record.best_score.max(percent);
        record.last_attempt = Some(Utc::now());
    }

    pub fn record(&self, profile_name: &str, module: ModuleType) -> Option<&ProgressRecord> {
        self.records.get(profile_name)?.get(&module)
    }

    /// Per-module stats for a profile, sorted by module label for display.
    /// Division by zero cannot happen: records only exist with attempts > 0.
    pub fn stats_for(&self, profile_name: &str) -> Vec<ModuleStats> {
        let Some(modules) = self.records.get(profile_name) else {
            return Vec::new();
        };
        let mut stats: Vec<ModuleStats> = modules
            .iter()
            .map(|(module, record)| ModuleStats {
                module: *module,
                average: (record.total_score / record.attempts as f64).round() as u32,
                best: record.best_score.round() as u32,
                attempts: record.attempts,
                last_attempt: record.last_attempt,
            })
            .collect();
        stats.sort_by_key(|s| s.module.label());
        stats
    }
}

#[derive(Debug, Clone, Copy)]
pub struct ModuleStats {
    pub module: ModuleType,
    pub average: u32,
    pub best: u32,
    pub attempts: u32,
    pub last_attempt: Option<DateTime<Utc>>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn aggregates_across_attempts() {
        let mut book = ProgressBook::default();
        book.record_attempt("Maya", ModuleType::Math, 3, 5);
        book.record_attempt("Maya", ModuleType::Math, 5, 5);

        let stats = book.stats_for("Maya");
        assert_eq!(stats.len(), 1);
        assert_eq!(stats[0].attempts, 2);
        assert_eq!(stats[0].best, 100);
        assert_eq!(stats[0].average, 80); // round((60 + 100) / 2)
        assert!(stats[0].last_attempt.is_some());
    }

    #[test]
    fn profiles_and_modules_are_tracked_separately() {
        let mut book = ProgressBook::default();
        book.record_attempt("Maya", ModuleType::Math, 1, 1);
        book.record_attempt("Maya", ModuleType::Logic, 0, 1);
        book.record_attempt("Ben", ModuleType::Math, 1, 2);

        assert_eq!(book.stats_for("Maya").len(), 2);
        assert_eq!(book.record("Ben", ModuleType::Math).unwrap().attempts, 1);
        assert!(book.record("Ben", ModuleType::Logic).is_none());
        assert!(book.stats_for("Nobody").is_empty());
    }

    #[test]
    fn zero_total_submissions_are_ignored() {
        let mut book = ProgressBook::default();
        book.record_attempt("Maya", ModuleType::Math, 0, 0);
        assert!(book.record("Maya", ModuleType::Math).is_none());
    }

    #[test]
    fn round_trips_through_json() {
        let mut book = ProgressBook::default();
        book.record_attempt("Maya", ModuleType::EmojiRiddles, 4, 5);
        let json = serde_json::to_string(&book).unwrap();
        let back: ProgressBook = serde_json::from_str(&json).unwrap();
        let record = back.record("Maya", ModuleType::EmojiRiddles).unwrap();
        assert_eq!(record.attempts, 1);
        assert_eq!(record.best_score, 80.0);
    }
}
