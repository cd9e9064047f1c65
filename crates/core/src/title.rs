//! Score-post title grammar.
//!
//! A candidate score post title has the shape
//! `<player> | <artist - title> [<difficulty>]`, optionally followed by a
//! `+`-prefixed modifier run somewhere after the closing bracket. The
//! parser is an explicit scanner so the not-applicable vs malformed
//! distinction and the "first `+` after the bracket" rule are testable
//! rules rather than artifacts of regex scan order.

use thiserror::Error;

use crate::mods::ModSet;

/// Reasons a title fails the score-post shape test.
///
/// None of these are faults: a failed parse marks the post as not
/// applicable and the pipeline skips it silently.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TitleError {
    #[error("no pipe separator")]
    MissingPipe,

    #[error("no player name before the pipe")]
    MissingPlayer,

    #[error("no bracketed difficulty name")]
    MissingBrackets,

    #[error("no song text before the bracket")]
    MissingSong,

    #[error("song segment has no artist/title hyphen")]
    MissingHyphen,
}

/// The parsed identity of a score post.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScorePostTitle {
    /// Trimmed player name, as written.
    pub player: String,
    /// Trimmed `Artist - Title` segment, as written.
    pub song: String,
    /// Bracket-inclusive difficulty name, e.g. `[Insane]`.
    pub difficulty: String,
    /// Case-folded `artist - title [difficulty]` with `&` escaped to
    /// `&amp;`, the form event descriptions are compared against.
    pub identity: String,
    /// Modifier codes from the first `+` run after the closing bracket.
    pub mods: ModSet,
}

/// Parses a raw post title into its score-post parts.
pub fn parse_title(title: &str) -> Result<ScorePostTitle, TitleError> {
    let pipe = title.find('|').ok_or(TitleError::MissingPipe)?;
    let player = title[..pipe].trim();
    if player.is_empty() {
        return Err(TitleError::MissingPlayer);
    }

    let map_text = &title[pipe + 1..];
    let open = map_text.find('[').ok_or(TitleError::MissingBrackets)?;
    let close = map_text.find(']').ok_or(TitleError::MissingBrackets)?;
    if close < open {
        return Err(TitleError::MissingBrackets);
    }

    let song = map_text[..open].trim();
    if song.is_empty() {
        return Err(TitleError::MissingSong);
    }
    if !song.contains('-') {
        return Err(TitleError::MissingHyphen);
    }

    let difficulty = &map_text[open..=close];
    let identity = format!("{} {}", song, difficulty)
        .replace('&', "&amp;")
        .to_lowercase();

    let mods = mod_fragment(&map_text[close + 1..])
        .map(ModSet::parse)
        .unwrap_or_default();

    Ok(ScorePostTitle {
        player: player.to_string(),
        song: song.to_string(),
        difficulty: difficulty.to_string(),
        identity,
        mods,
    })
}

/// Finds the first `+` run after the closing bracket: the `+` itself
/// followed by uppercase letters and commas.
fn mod_fragment(after_bracket: &str) -> Option<&str> {
    let start = after_bracket.find('+')?;
    let run = &after_bracket[start..];
    let end = run
        .char_indices()
        .skip(1)
        .find(|(_, c)| !c.is_ascii_uppercase() && *c != ',')
        .map(|(i, _)| i)
        .unwrap_or(run.len());
    Some(&run[..end])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_basic_title() {
        let parsed = parse_title("PlayerX | Artist - Song [Hard]").unwrap();
        assert_eq!(parsed.player, "PlayerX");
        assert_eq!(parsed.song, "Artist - Song");
        assert_eq!(parsed.difficulty, "[Hard]");
        assert_eq!(parsed.identity, "artist - song [hard]");
        assert!(parsed.mods.is_empty());
    }

    #[test]
    fn test_parse_title_with_mods() {
        let parsed = parse_title("PlayerX | Artist - Song [Hard]+HDDT").unwrap();
        assert_eq!(parsed.mods.codes(), ["HD", "DT"]);
    }

    #[test]
    fn test_parse_title_with_spaced_comma_mods() {
        let parsed = parse_title("p | a - b [x] 99.2% +HD,HR wow").unwrap();
        assert_eq!(parsed.mods.codes(), ["HD", "HR"]);
    }

    #[test]
    fn test_plus_before_bracket_is_not_a_mod_run() {
        // The + in the song segment must not be picked up.
        let parsed = parse_title("p | a+b - c [x] nice").unwrap();
        assert!(parsed.mods.is_empty());
    }

    #[test]
    fn test_first_plus_after_bracket_wins() {
        let parsed = parse_title("p | a - b [x] +HD and later +HR").unwrap();
        assert_eq!(parsed.mods.codes(), ["HD"]);
    }

    #[test]
    fn test_mod_run_stops_at_lowercase() {
        let parsed = parse_title("p | a - b [x] +HDfirst try").unwrap();
        assert_eq!(parsed.mods.codes(), ["HD"]);
    }

    #[test]
    fn test_identity_escapes_ampersand_and_folds_case() {
        let parsed = parse_title("p | Panic! - This & That [MAX]").unwrap();
        assert_eq!(parsed.identity, "panic! - this &amp; that [max]");
    }

    #[test]
    fn test_missing_pipe() {
        assert_eq!(
            parse_title("PlayerX Artist - Song [Hard]"),
            Err(TitleError::MissingPipe)
        );
    }

    #[test]
    fn test_missing_brackets() {
        assert_eq!(
            parse_title("PlayerX | Artist - Song"),
            Err(TitleError::MissingBrackets)
        );
        assert_eq!(
            parse_title("PlayerX | Artist - Song ] oops ["),
            Err(TitleError::MissingBrackets)
        );
    }

    #[test]
    fn test_missing_player() {
        assert_eq!(
            parse_title(" | Artist - Song [Hard]"),
            Err(TitleError::MissingPlayer)
        );
    }

    #[test]
    fn test_missing_hyphen() {
        assert_eq!(
            parse_title("PlayerX | SongWithoutArtist [Hard]"),
            Err(TitleError::MissingHyphen)
        );
    }

    #[test]
    fn test_missing_song() {
        assert_eq!(parse_title("PlayerX | [Hard]"), Err(TitleError::MissingSong));
    }

    #[test]
    fn test_first_bracket_pair_wins() {
        let parsed = parse_title("p | a - b [One] [Two]").unwrap();
        assert_eq!(parsed.difficulty, "[One]");
    }

    #[test]
    fn test_unicode_title_does_not_panic() {
        let parsed = parse_title("名前 | アーティスト - 曲 [むずかしい]+DT").unwrap();
        assert_eq!(parsed.player, "名前");
        assert_eq!(parsed.mods.codes(), ["DT"]);
    }
}
