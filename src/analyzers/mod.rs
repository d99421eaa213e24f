pub mod season_analyzer;

pub use season_analyzer::SeasonAnalyzer;
