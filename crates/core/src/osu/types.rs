//! Domain types for the osu! API, converted from the v1 wire format.
//!
//! The v1 API serializes every number as a JSON string, so responses are
//! deserialized into private all-strings wire structs and then converted
//! into the typed public structs below.

use serde::Deserialize;

use super::OsuApiError;

/// One entry of a player's profile event feed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserEvent {
    /// Rendered description of the event; embeds the displayed map name.
    pub display_html: String,
    /// Beatmap the event refers to.
    pub beatmap_id: u64,
}

/// One entry of a player's recent-plays list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecentPlay {
    pub beatmap_id: u64,
}

/// A single playable chart in the catalog.
#[derive(Debug, Clone, PartialEq)]
pub struct Beatmap {
    pub beatmap_id: u64,
    pub artist: String,
    pub title: String,
    /// Difficulty name.
    pub version: String,
    pub creator: String,
    /// Star rating.
    pub stars: f64,
    pub approach_rate: f64,
    pub circle_size: f64,
    pub overall_difficulty: f64,
    pub hp_drain: f64,
    /// Length in seconds.
    pub total_length: u32,
    pub bpm: f64,
    pub playcount: u64,
}

impl Beatmap {
    /// The displayed map name: `Artist - Title [Version]`.
    pub fn display_name(&self) -> String {
        format!("{} - {} [{}]", self.artist, self.title, self.version)
    }

    /// The case-folded comparison form of the map name, with `&` escaped
    /// the way event descriptions render it.
    pub fn identity(&self) -> String {
        self.display_name().replace('&', "&amp;").to_lowercase()
    }
}

// ============================================================================
// v1 wire format (private)
// ============================================================================

#[derive(Debug, Deserialize)]
pub(super) struct RawUser {
    #[serde(default)]
    pub events: Vec<RawEvent>,
}

#[derive(Debug, Deserialize)]
pub(super) struct RawEvent {
    #[serde(default)]
    pub display_html: Option<String>,
    #[serde(default)]
    pub beatmap_id: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(super) struct RawRecent {
    pub beatmap_id: String,
}

#[derive(Debug, Deserialize)]
pub(super) struct RawBeatmap {
    pub beatmap_id: String,
    pub artist: String,
    pub title: String,
    pub version: String,
    pub creator: String,
    pub difficultyrating: String,
    pub diff_approach: String,
    pub diff_size: String,
    pub diff_overall: String,
    pub diff_drain: String,
    pub total_length: String,
    pub bpm: String,
    pub playcount: String,
}

fn parse_num<T: std::str::FromStr>(value: &str, field: &str) -> Result<T, OsuApiError> {
    value
        .parse()
        .map_err(|_| OsuApiError::Parse(format!("bad {} value: {:?}", field, value)))
}

impl RawEvent {
    /// Events without a rendered description or a beatmap id (supporter
    /// gifts, name changes) can never match a map and are dropped.
    pub(super) fn into_event(self) -> Option<UserEvent> {
        let display_html = self.display_html?;
        let beatmap_id = self.beatmap_id?.parse().ok()?;
        Some(UserEvent {
            display_html,
            beatmap_id,
        })
    }
}

impl TryFrom<RawRecent> for RecentPlay {
    type Error = OsuApiError;

    fn try_from(raw: RawRecent) -> Result<Self, OsuApiError> {
        Ok(RecentPlay {
            beatmap_id: parse_num(&raw.beatmap_id, "beatmap_id")?,
        })
    }
}

impl TryFrom<RawBeatmap> for Beatmap {
    type Error = OsuApiError;

    fn try_from(raw: RawBeatmap) -> Result<Self, OsuApiError> {
        Ok(Beatmap {
            beatmap_id: parse_num(&raw.beatmap_id, "beatmap_id")?,
            stars: parse_num(&raw.difficultyrating, "difficultyrating")?,
            approach_rate: parse_num(&raw.diff_approach, "diff_approach")?,
            circle_size: parse_num(&raw.diff_size, "diff_size")?,
            overall_difficulty: parse_num(&raw.diff_overall, "diff_overall")?,
            hp_drain: parse_num(&raw.diff_drain, "diff_drain")?,
            total_length: parse_num(&raw.total_length, "total_length")?,
            bpm: parse_num(&raw.bpm, "bpm")?,
            playcount: parse_num(&raw.playcount, "playcount")?,
            artist: raw.artist,
            title: raw.title,
            version: raw.version,
            creator: raw.creator,
        })
    }
}
