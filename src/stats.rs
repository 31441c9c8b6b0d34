//! Size statistics and the I18N score.

use serde::Serialize;

use crate::diagnostics::Diagnostic;
use crate::level::Severity;

/// Size of the linted material, accumulated file by file.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct FileStats {
    pub files: u64,
    pub lines: u64,
    pub bytes: u64,
    pub modules: u64,
    pub words: u64,
}

impl FileStats {
    pub fn for_file(lines: u64, bytes: u64) -> Self {
        Self {
            files: 1,
            lines,
            bytes,
            ..Self::default()
        }
    }

    pub fn add(&mut self, other: &FileStats) {
        self.files += other.files;
        self.lines += other.lines;
        self.bytes += other.bytes;
        self.modules += other.modules;
        self.words += other.words;
    }

    /// Normalisation base: the first non-zero of modules, lines, files, bytes.
    pub fn base(&self) -> u64 {
        [self.modules, self.lines, self.files, self.bytes]
            .into_iter()
            .find(|&n| n > 0)
            .unwrap_or(1)
    }
}

/// Counts of findings per severity.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ResultStats {
    pub errors: u64,
    pub warnings: u64,
    pub suggestions: u64,
}

impl ResultStats {
    pub fn from_results<'a>(results: impl IntoIterator<Item = &'a Diagnostic>) -> Self {
        let mut stats = Self::default();
        for result in results {
            match result.severity {
                Severity::Error => stats.errors += 1,
                Severity::Warning => stats.warnings += 1,
                Severity::Suggestion => stats.suggestions += 1,
            }
        }
        stats
    }

    pub fn total(&self) -> u64 {
        self.errors + self.warnings + self.suggestions
    }

    pub fn demerit_points(&self) -> u64 {
        self.errors * 5 + self.warnings * 3 + self.suggestions
    }
}

/// `100 / (1 + demerits / base)`: 100 when clean, approaching 0 as demerits grow.
pub fn score(results: &ResultStats, files: &FileStats) -> f64 {
    let base = files.base() as f64;
    100.0 / (1.0 + results.demerit_points() as f64 / base)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn results(errors: u64, warnings: u64, suggestions: u64) -> ResultStats {
        ResultStats {
            errors,
            warnings,
            suggestions,
        }
    }

    #[test]
    fn clean_run_scores_100() {
        assert_eq!(score(&ResultStats::default(), &FileStats::default()), 100.0);
    }

    #[test]
    fn base_prefers_modules_then_lines() {
        let mut stats = FileStats::for_file(40, 1000);
        assert_eq!(stats.base(), 40);
        stats.modules = 3;
        assert_eq!(stats.base(), 3);
        assert_eq!(FileStats::default().base(), 1);
    }

    #[test]
    fn demerits_weigh_errors_most() {
        let stats = FileStats::for_file(10, 100);
        // 1 error = 5 demerits over 10 lines
        assert!((score(&results(1, 0, 0), &stats) - 100.0 / 1.5).abs() < 1e-9);
        assert!(score(&results(1, 0, 0), &stats) < score(&results(0, 1, 0), &stats));
        assert!(score(&results(0, 1, 0), &stats) < score(&results(0, 0, 1), &stats));
    }

    #[test]
    fn score_never_increases_with_more_findings() {
        let stats = FileStats::for_file(25, 900);
        for n in 0..20 {
            for (a, b) in [
                (results(n, 2, 2), results(n + 1, 2, 2)),
                (results(2, n, 2), results(2, n + 1, 2)),
                (results(2, 2, n), results(2, 2, n + 1)),
            ] {
                assert!(score(&b, &stats) <= score(&a, &stats));
            }
        }
    }

    #[test]
    fn add_accumulates_every_field() {
        let mut total = FileStats::default();
        total.add(&FileStats::for_file(3, 30));
        total.add(&FileStats {
            files: 1,
            lines: 2,
            bytes: 20,
            modules: 1,
            words: 7,
        });
        assert_eq!(
            total,
            FileStats {
                files: 2,
                lines: 5,
                bytes: 50,
                modules: 1,
                words: 7
            }
        );
    }
}
