//! Shed resolution
//!
//! For every warp thread and weft shot, decide which thread lies on top.
//! The shot's treadling picks a treadle, the tie-up lists the harnesses that
//! treadle raises, and a warp thread is raised when its threading harness is
//! in that set. A raised warp shows the warp color; otherwise the weft shows.

use crate::color::parse_rgb;
use crate::document::{Section, WeaveDocument};
use crate::error::{Result, WeaveError};
use crate::weave::{
    SECTION_COLOR_TABLE, SECTION_THREADING, SECTION_TIEUP, SECTION_TREADLING,
    SECTION_WARP_COLORS, SECTION_WEFT_COLORS,
};
use image::Rgba;
use std::collections::BTreeSet;

/// Which thread is visible at an intersection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shed {
    /// Warp thread lifted: the warp color shows
    Raised,
    /// Warp thread down: the weft color shows
    Lowered,
}

/// Parse a tie-up entry such as `"1"` or `"1,3"` into a set of harnesses.
///
/// An empty entry ties up nothing.
pub fn parse_treadles(s: &str) -> std::result::Result<BTreeSet<u32>, String> {
    s.split(',')
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .map(|part| part.parse::<u32>().map_err(|_| format!("invalid harness number '{}'", part)))
        .collect()
}

/// Resolves sheds and colors against a built document.
///
/// Holds only borrowed sections; every lookup is checked and a missing key
/// is reported as [`WeaveError::MissingReference`].
#[derive(Debug, Clone, Copy)]
pub struct ShedResolver<'a> {
    threading: &'a Section,
    treadling: &'a Section,
    tieup: &'a Section,
    color_table: &'a Section,
    warp_colors: &'a Section,
    weft_colors: &'a Section,
}

impl<'a> ShedResolver<'a> {
    pub fn new(doc: &'a WeaveDocument) -> Result<Self> {
        let section = |name: &str| doc.section(name).ok_or_else(|| WeaveError::missing(name, ""));
        Ok(Self {
            threading: section(SECTION_THREADING)?,
            treadling: section(SECTION_TREADLING)?,
            tieup: section(SECTION_TIEUP)?,
            color_table: section(SECTION_COLOR_TABLE)?,
            warp_colors: section(SECTION_WARP_COLORS)?,
            weft_colors: section(SECTION_WEFT_COLORS)?,
        })
    }

    /// Treadles tied to the harness a shot is treadled on.
    pub fn treadles(&self, shot: &str) -> Result<BTreeSet<u32>> {
        let harness = lookup(self.treadling, SECTION_TREADLING, shot)?;
        let tied = lookup(self.tieup, SECTION_TIEUP, harness)?;
        parse_treadles(tied).map_err(|_| WeaveError::missing(SECTION_TIEUP, harness))
    }

    /// Decide the shed for one warp thread and weft shot (both 1-based keys).
    pub fn shed(&self, thread: &str, shot: &str) -> Result<Shed> {
        let treadles = self.treadles(shot)?;
        let harness = lookup(self.threading, SECTION_THREADING, thread)?;
        let harness: u32 =
            harness.trim().parse().map_err(|_| WeaveError::missing(SECTION_THREADING, thread))?;

        Ok(if treadles.contains(&harness) { Shed::Raised } else { Shed::Lowered })
    }

    /// Color table key visible at an intersection.
    pub fn color_key(&self, thread: &str, shot: &str) -> Result<&'a str> {
        match self.shed(thread, shot)? {
            Shed::Raised => lookup(self.warp_colors, SECTION_WARP_COLORS, thread),
            Shed::Lowered => lookup(self.weft_colors, SECTION_WEFT_COLORS, shot),
        }
    }

    /// Color string stored under a color table key.
    pub fn color_value(&self, key: &str) -> Result<&'a str> {
        lookup(self.color_table, SECTION_COLOR_TABLE, key)
    }

    /// Parsed color of a color table entry.
    pub fn parse_color(&self, key: &str) -> Result<Rgba<u8>> {
        let value = self.color_value(key)?;
        parse_rgb(value).map_err(|source| WeaveError::MalformedColor {
            key: key.to_string(),
            value: value.to_string(),
            source,
        })
    }

    /// Visible color at an intersection.
    pub fn color(&self, thread: &str, shot: &str) -> Result<Rgba<u8>> {
        let key = self.color_key(thread, shot)?;
        self.parse_color(key)
    }
}

fn lookup<'a>(section: &'a Section, name: &str, key: &str) -> Result<&'a str> {
    section.get(key).map(String::as_str).ok_or_else(|| WeaveError::missing(name, key))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::Palette;
    use crate::options::Options;
    use crate::weave::build;

    fn doc_for(pattern: &str, options: &Options) -> WeaveDocument {
        build(&pattern.parse().unwrap(), options).unwrap().document
    }

    #[test]
    fn test_parse_treadles() {
        assert_eq!(parse_treadles("1"), Ok(BTreeSet::from([1])));
        assert_eq!(parse_treadles("1,3"), Ok(BTreeSet::from([1, 3])));
        assert_eq!(parse_treadles(" 2 , 4 "), Ok(BTreeSet::from([2, 4])));
        assert_eq!(parse_treadles(""), Ok(BTreeSet::new()));
        assert!(parse_treadles("1;system").is_err());
    }

    #[test]
    fn test_plain_weave_alternates() {
        let doc = doc_for("1-2", &Options::default());
        let resolver = ShedResolver::new(&doc).unwrap();
        assert_eq!(resolver.shed("1", "1").unwrap(), Shed::Raised);
        assert_eq!(resolver.shed("2", "1").unwrap(), Shed::Lowered);
        assert_eq!(resolver.shed("1", "2").unwrap(), Shed::Lowered);
        assert_eq!(resolver.shed("2", "2").unwrap(), Shed::Raised);
    }

    #[test]
    fn test_raised_shows_warp_lowered_shows_weft() {
        let doc = doc_for("1-2", &Options::default().with_reverse(true));
        let resolver = ShedResolver::new(&doc).unwrap();
        // Thread 1 is raised on shot 1 and shows its warp color
        assert_eq!(resolver.color_key("1", "1").unwrap(), "1");
        // Thread 2 is lowered; shot 1 in the reversed weft is color "2"
        assert_eq!(resolver.color_key("2", "1").unwrap(), "2");
        assert_eq!(resolver.color("2", "1").unwrap(), Rgba([0, 0, 0, 255]));
        assert_eq!(resolver.color("1", "1").unwrap(), Rgba([0, 0, 128, 255]));
    }

    #[test]
    fn test_multi_harness_tieup() {
        let mut doc = doc_for("1-1", &Options::default());
        doc.set(SECTION_TIEUP, "2", "1,2");
        let resolver = ShedResolver::new(&doc).unwrap();
        // Shot 1 is treadled on harness 2, which now raises both harnesses
        assert_eq!(resolver.treadles("1").unwrap(), BTreeSet::from([1, 2]));
        assert_eq!(resolver.shed("1", "1").unwrap(), Shed::Raised);
        assert_eq!(resolver.shed("2", "1").unwrap(), Shed::Raised);
    }

    #[test]
    fn test_missing_reference_is_reported() {
        let mut doc = doc_for("1-2", &Options::default());
        doc.set_section(SECTION_TIEUP, Section::new());
        let resolver = ShedResolver::new(&doc).unwrap();
        let err = resolver.shed("1", "1").unwrap_err();
        assert!(matches!(
            err,
            WeaveError::MissingReference { ref section, ref key } if section == "TIEUP" && key == "2"
        ));

        let err = resolver.shed("1", "999").unwrap_err();
        assert!(matches!(err, WeaveError::MissingReference { .. }));
    }

    #[test]
    fn test_missing_section_is_reported() {
        let doc = WeaveDocument::new();
        assert!(matches!(ShedResolver::new(&doc), Err(WeaveError::MissingReference { .. })));
    }

    #[test]
    fn test_malformed_color_is_reported() {
        let colors = Palette::from_colors(["256,0,0", "0,0"]);
        let doc = doc_for("1-2", &Options::default().with_colors(colors));
        let resolver = ShedResolver::new(&doc).unwrap();
        let err = resolver.color("1", "1").unwrap_err();
        assert!(matches!(err, WeaveError::MalformedColor { ref value, .. } if value == "256,0,0"));
        let err = resolver.parse_color("2").unwrap_err();
        assert!(matches!(err, WeaveError::MalformedColor { ref value, .. } if value == "0,0"));
    }
}
