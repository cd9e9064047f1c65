pub mod config;
pub mod faillog;
pub mod mods;
pub mod osu;
pub mod pipeline;
pub mod recalc;
pub mod report;
pub mod resolver;
pub mod testing;
pub mod title;

pub use config::{
    load_config, load_config_from_str, validate_config, Config, ConfigError, LogConfig,
    RedditConfig, ResolverConfig,
};
pub use faillog::{FailureLog, FileFailureLog};
pub use mods::{classify, code_for_bit, ModClass, ModSet, KNOWN_MODS};
pub use osu::{Beatmap, OsuApi, OsuApiClient, OsuApiConfig, OsuApiError, RecentPlay, UserEvent};
pub use pipeline::{IncomingPost, Pipeline, PipelineOutcome};
pub use recalc::{
    AnalyzerError, DiffValues, DifficultyAnalyzer, DifficultyProfile, DifficultyRecalculator,
    OppaiAnalyzer, OppaiConfig, RecalcConfig, RecalcError,
};
pub use report::{compose, format_timestamp, format_value, ReportConfig};
pub use resolver::{BeatmapResolver, ResolveError};
pub use title::{parse_title, ScorePostTitle, TitleError};
