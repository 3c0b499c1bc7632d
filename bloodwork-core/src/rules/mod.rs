// Rules module - selects catalog analyses out of a parse tree
// - matching.rs: per-analysis lookup (exact, fuzzy, DFG preference, urine context)
// - engine.rs: RuleEngine, date bucketing and result normalization

pub mod engine;
pub mod matching;

pub use engine::{apply_rules, compare_report_dates, RuleEngine};
pub use matching::{find_analysis_in_sections, AnalysisMatch, CANONICAL_DFG_UNIT};
