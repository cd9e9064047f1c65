//! Comment composition.
//!
//! Renders a resolved beatmap and its difficulty profile into the final
//! markdown comment: a link line, a stats line, the nomod attribute line
//! and, when a qualifying modifier set was applied, a second attribute
//! line labelled with the mod string. A fixed attribution footer is
//! always appended.

use serde::{Deserialize, Serialize};

use crate::mods::ModSet;
use crate::osu::Beatmap;
use crate::recalc::{DiffValues, DifficultyProfile};

/// Link targets used in rendered comments.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportConfig {
    /// Base URL for beatmap and profile links (default: https://osu.ppy.sh).
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Source-repository link for the footer.
    #[serde(default = "default_source_url")]
    pub source_url: String,
    /// Developer profile link for the footer.
    #[serde(default = "default_developer_url")]
    pub developer_url: String,
}

fn default_base_url() -> String {
    "https://osu.ppy.sh".to_string()
}

fn default_source_url() -> String {
    "https://github.com/lelloman/maplink".to_string()
}

fn default_developer_url() -> String {
    "https://reddit.com/u/maplink-bot".to_string()
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            source_url: default_source_url(),
            developer_url: default_developer_url(),
        }
    }
}

/// Renders the full comment text.
pub fn compose(
    map: &Beatmap,
    profile: &DifficultyProfile,
    mods: &ModSet,
    config: &ReportConfig,
) -> String {
    let mut text = String::new();

    text.push_str(&format!(
        "Beatmap: [{}]({}/b/{}) by [{}]({}/u/{})\n\n",
        map.display_name(),
        config.base_url,
        map.beatmap_id,
        map.creator,
        config.base_url,
        urlencoding::encode(&map.creator),
    ));
    text.push_str(&format!(
        "Length: {} - BPM: {} - Plays: {}\n\n",
        format_timestamp(map.total_length),
        format_value(map.bpm),
        map.playcount,
    ));
    text.push_str(&attr_line(&profile.nomod));
    text.push_str("\n\n");

    if let Some(ref modded) = profile.modded {
        text.push_str(&format!("{}:\n\n", mods.label()));
        text.push_str(&attr_line(modded));
        text.push_str("\n\n");
    }

    text.push_str("***\n\n");
    text.push_str(&format!(
        "^(I'm a bot. )[^Source]({})^( | )[^Developer]({})",
        config.source_url, config.developer_url,
    ));

    text
}

fn attr_line(values: &DiffValues) -> String {
    format!(
        "CS: {} - AR: {} - OD: {} - HP: {} - SR: {}",
        format_value(values.cs),
        format_value(values.ar),
        format_value(values.od),
        format_value(values.hp),
        format_value(values.sr),
    )
}

/// Converts a length in seconds to an `m:ss` timestamp. There is no hour
/// component; minutes keep counting past 59.
pub fn format_timestamp(seconds: u32) -> String {
    format!("{}:{:02}", seconds / 60, seconds % 60)
}

/// Renders a difficulty value as an integer when it has no fractional
/// part, otherwise as a decimal with up to two places.
pub fn format_value(value: f64) -> String {
    let rounded = (value * 100.0).round() / 100.0;
    if rounded == rounded.trunc() {
        format!("{}", rounded as i64)
    } else {
        let text = format!("{:.2}", rounded);
        text.trim_end_matches('0').trim_end_matches('.').to_string()
    }
}
