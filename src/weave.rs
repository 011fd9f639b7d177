//! Weave document assembly
//!
//! Turns a [`Pattern`] and [`Options`] into a fully populated
//! [`WeaveDocument`]: fixed WIF metadata, the harness rotation used for
//! threading and treadling, and the warp/weft color assignments derived from
//! the pattern space.

use crate::document::{Section, WeaveDocument};
use crate::error::{Result, WeaveError};
use crate::options::Options;
use crate::output;
use crate::pattern::{normalize_size, pattern_space, repeat_unit, Pattern};
use crate::renderer;
use std::path::PathBuf;
use tracing::{debug, info};

pub const SECTION_WIF: &str = "WIF";
pub const SECTION_CONTENTS: &str = "CONTENTS";
pub const SECTION_COLOR_PALETTE: &str = "COLOR PALETTE";
pub const SECTION_WEAVING: &str = "WEAVING";
pub const SECTION_WARP: &str = "WARP";
pub const SECTION_WEFT: &str = "WEFT";
pub const SECTION_TIEUP: &str = "TIEUP";
pub const SECTION_COLOR_TABLE: &str = "COLOR TABLE";
pub const SECTION_THREADING: &str = "THREADING";
pub const SECTION_WARP_COLORS: &str = "WARP COLORS";
pub const SECTION_TREADLING: &str = "TREADLING";
pub const SECTION_WEFT_COLORS: &str = "WEFT COLORS";
pub const SECTION_NOTES: &str = "NOTES";
pub const SECTION_TEXT: &str = "TEXT";

/// Name written to `WIF.Source Program`.
pub const SOURCE_PROGRAM: &str = "plainweave";

/// Thread spacing and thickness, one twelfth of an inch.
const THREAD_SPACING: &str = "0.08333333";
const THREAD_THICKNESS: &str = "0.08333334";

/// A built weave: the document plus the geometry the renderer needs.
#[derive(Debug, Clone)]
pub struct Weave {
    pub pattern: Pattern,
    pub document: WeaveDocument,
    /// Threads in both warp and weft
    pub size: usize,
    /// One expanded repeat of 1-based color indices
    pub repeat_unit: Vec<u32>,
    pub grid_size: u32,
}

impl Weave {
    /// Side length of the rendered square canvas, in pixels.
    pub fn canvas_side(&self) -> Result<u32> {
        renderer::canvas_side(self.size, self.grid_size)
    }
}

/// Paths written by [`make`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Outputs {
    pub wif: PathBuf,
    pub png: Option<PathBuf>,
}

impl WeaveDocument {
    /// Fresh document holding the fixed WIF metadata and empty derived
    /// sections, in the order they are written.
    pub fn template() -> Self {
        let mut doc = WeaveDocument::new();

        doc.set(SECTION_WIF, "Version", "1.1");
        doc.set(SECTION_WIF, "Date", "April 20, 1997");
        doc.set(SECTION_WIF, "Developers", "");
        doc.set(SECTION_WIF, "Source Program", SOURCE_PROGRAM);
        doc.set(SECTION_WIF, "Source Version", env!("CARGO_PKG_VERSION"));

        for name in [
            SECTION_COLOR_PALETTE,
            SECTION_WEAVING,
            SECTION_WARP,
            SECTION_WEFT,
            SECTION_TIEUP,
            SECTION_COLOR_TABLE,
            SECTION_THREADING,
            SECTION_WARP_COLORS,
            SECTION_TREADLING,
            SECTION_WEFT_COLORS,
        ] {
            doc.set(SECTION_CONTENTS, name, "yes");
        }

        doc.set(SECTION_COLOR_PALETTE, "Entries", 2);
        doc.set(SECTION_COLOR_PALETTE, "Range", "0,255");

        doc.set(SECTION_WEAVING, "Shafts", 2);
        doc.set(SECTION_WEAVING, "Treadles", 2);
        doc.set(SECTION_WEAVING, "Rising Shed", "no");

        for name in [SECTION_WARP, SECTION_WEFT] {
            doc.set(name, "Threads", 50);
            doc.set(name, "Units", "Inches");
            doc.set(name, "Spacing", THREAD_SPACING);
            doc.set(name, "Thickness", THREAD_THICKNESS);
        }

        doc.set(SECTION_TIEUP, "1", "1");
        doc.set(SECTION_TIEUP, "2", "2");
        doc.set(SECTION_COLOR_TABLE, "1", "0,0,128");
        doc.set(SECTION_COLOR_TABLE, "2", "0,0,0");

        for name in
            [SECTION_THREADING, SECTION_WARP_COLORS, SECTION_TREADLING, SECTION_WEFT_COLORS]
        {
            doc.ensure_section(name);
        }

        doc
    }
}

/// Build the weave document for one pattern.
///
/// # Examples
///
/// ```
/// use plainweave::options::Options;
/// use plainweave::pattern::Pattern;
/// use plainweave::weave::build;
///
/// let pattern: Pattern = "1-2".parse().unwrap();
/// let weave = build(&pattern, &Options::default()).unwrap();
/// assert_eq!(weave.size, 48);
/// assert_eq!(weave.document.get("WARP", "Threads"), Some("48"));
/// assert_eq!(weave.canvas_side().unwrap(), 432);
/// ```
#[tracing::instrument(skip(pattern, options), fields(pattern = %pattern, reverse = options.reverse))]
pub fn build(pattern: &Pattern, options: &Options) -> Result<Weave> {
    options.validate()?;

    let unit = repeat_unit(pattern, options.colors.len())?;
    let size = normalize_size(unit.len(), options.size, options.max_size);
    let space = pattern_space(&unit, size);
    debug!(unit_len = unit.len(), size, "normalized thread count");

    let mut doc = WeaveDocument::template();

    if let Some(email) = &options.email {
        doc.set(SECTION_WIF, "Developers", email);
    }

    doc.set(SECTION_WARP, "Threads", size);
    doc.set(SECTION_WEFT, "Threads", size);

    let mut table = Section::new();
    for (key, color) in options.colors.iter() {
        table.insert(key.to_string(), color.to_string());
    }
    doc.set_section(SECTION_COLOR_TABLE, table);
    doc.set(SECTION_COLOR_PALETTE, "Entries", options.colors.len());

    populate_loom(&mut doc, options.harnesses, size);
    populate_colors(&mut doc, options, &space)?;
    populate_notes(&mut doc, pattern, options, &unit);
    populate_text(&mut doc, pattern, options);

    Ok(Weave {
        pattern: pattern.clone(),
        document: doc,
        size,
        repeat_unit: unit,
        grid_size: options.grid_size,
    })
}

/// Shafts, treadles, straight tie-up, and the harness rotation.
fn populate_loom(doc: &mut WeaveDocument, harnesses: u32, size: usize) {
    doc.set(SECTION_WEAVING, "Shafts", harnesses);
    doc.set(SECTION_WEAVING, "Treadles", harnesses);

    let mut tieup = Section::new();
    for h in 1..=harnesses {
        tieup.insert(h.to_string(), h.to_string());
    }
    doc.set_section(SECTION_TIEUP, tieup);

    let mut threading = Section::new();
    for n in 1..=size {
        threading.insert(n.to_string(), harness_for(n, harnesses).to_string());
    }
    doc.set_section(SECTION_TREADLING, threading.clone());
    doc.set_section(SECTION_THREADING, threading);
}

/// Harness for a 1-based thread or shot index.
pub fn harness_for(index: usize, harnesses: u32) -> u32 {
    (index % harnesses as usize) as u32 + 1
}

fn populate_colors(doc: &mut WeaveDocument, options: &Options, space: &[u32]) -> Result<()> {
    let mut keys = options.colors.sorted_keys();
    doc.set_section(SECTION_WARP_COLORS, color_map(&keys, space)?);

    if options.reverse {
        keys.reverse();
    }
    doc.set_section(SECTION_WEFT_COLORS, color_map(&keys, space)?);
    Ok(())
}

/// Map each thread to the color table key its pattern-space index selects.
fn color_map(keys: &[String], space: &[u32]) -> Result<Section> {
    let mut map = Section::new();
    for (i, &color) in space.iter().enumerate() {
        let key = (color as usize)
            .checked_sub(1)
            .and_then(|idx| keys.get(idx))
            .ok_or_else(|| WeaveError::missing(SECTION_COLOR_TABLE, color.to_string()))?;
        map.insert((i + 1).to_string(), key.clone());
    }
    Ok(map)
}

fn populate_notes(doc: &mut WeaveDocument, pattern: &Pattern, options: &Options, unit: &[u32]) {
    doc.set(SECTION_CONTENTS, SECTION_NOTES, "yes");

    let text = match &options.notes {
        Some(notes) => notes.clone(),
        None => describe(pattern, options, unit),
    };

    let mut lines: Vec<&str> = text.split('\n').collect();
    while lines.last().is_some_and(|l| l.is_empty()) {
        lines.pop();
    }

    let mut notes = Section::new();
    for (i, line) in lines.iter().enumerate() {
        notes.insert((i + 1).to_string(), line.trim_end_matches('\r').to_string());
    }
    doc.set_section(SECTION_NOTES, notes);
}

/// Generated description of the color sequence.
fn describe(pattern: &Pattern, options: &Options, unit: &[u32]) -> String {
    let mut text = String::new();
    text.push_str("This plainweave pattern is formed from a repeating pattern of colored threads.\n");
    text.push_str("The pattern is formed as follows:\n");
    for (i, &color) in unit.iter().enumerate() {
        text.push_str(&format!(
            "  {} is the {} color.\n",
            ordinal(i as u64 + 1),
            ordinal(u64::from(color))
        ));
    }
    text.push('\n');
    text.push_str("This pattern repeats in the warp.\n");
    text.push_str(if options.reverse {
        "This pattern is reversed in the weft.\n"
    } else {
        "This pattern repeats in the weft.\n"
    });
    text.push('\n');
    if let Some(nickname) = &options.nickname {
        text.push_str(&format!("It is also known as {}\n", nickname));
    } else {
        text.push('\n');
    }
    text.push('\n');
    text.push_str(&format!(
        "Pattern {} was created by {} {}.\n",
        pattern,
        SOURCE_PROGRAM,
        env!("CARGO_PKG_VERSION")
    ));
    text
}

fn populate_text(doc: &mut WeaveDocument, pattern: &Pattern, options: &Options) {
    doc.set(SECTION_CONTENTS, SECTION_TEXT, "yes");

    let mut title = format!("Plainweave {}", pattern);
    if let Some(nickname) = &options.nickname {
        title.push_str(&format!(" ({})", nickname));
    }
    if options.reverse {
        title.push_str(" Reversed");
    }

    let mut text = Section::new();
    text.insert("Title".to_string(), title.trim().to_string());
    text.insert("Author".to_string(), options.author.clone().unwrap_or_default());
    text.insert("EMail".to_string(), options.email.clone().unwrap_or_default());
    doc.set_section(SECTION_TEXT, text);
}

/// English ordinal: 1st, 2nd, 3rd, 4th, 11th, 12th, 13th, 21st...
pub fn ordinal(n: u64) -> String {
    let suffix = match (n % 10, n % 100) {
        (_, 11..=13) => "th",
        (1, _) => "st",
        (2, _) => "nd",
        (3, _) => "rd",
        _ => "th",
    };
    format!("{}{}", n, suffix)
}

/// WIF text of a document as bytes.
pub fn serialize_document(document: &WeaveDocument) -> Vec<u8> {
    document.to_wif_string().into_bytes()
}

/// Write the `.wif` file for a built weave into `options.dir`.
pub fn write_document(weave: &Weave, options: &Options) -> Result<PathBuf> {
    let path = output::output_path(&weave.pattern, options, "wif");
    output::write_bytes(&path, &serialize_document(&weave.document))?;
    info!(path = %path.display(), "wrote weave document");
    Ok(path)
}

/// Render and write the `.png` file for a built weave into `options.dir`.
pub fn write_image(weave: &Weave, options: &Options) -> Result<PathBuf> {
    let bytes = renderer::render_image(&weave.document, options)?;
    let path = output::output_path(&weave.pattern, options, "png");
    output::write_bytes(&path, &bytes)?;
    info!(path = %path.display(), "wrote weave image");
    Ok(path)
}

/// Build a pattern and write both its document and its image.
///
/// The document is written first; a malformed color fails only the image.
#[tracing::instrument(skip(pattern, options), fields(pattern = %pattern, reverse = options.reverse))]
pub fn make(pattern: &Pattern, options: &Options) -> Result<Outputs> {
    let weave = build(pattern, options)?;
    let wif = write_document(&weave, options)?;
    let png = write_image(&weave, options)?;
    Ok(Outputs { wif, png: Some(png) })
}
