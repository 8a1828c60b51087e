//! Configuration record: feed selection, aspect band, crop focus, flags.
//!
//! Built via a fluent builder and validated exactly once, in
//! [`ConfigBuilder::build`]. Once built, a [`Configuration`] is immutable —
//! there is no in-place mutation after validation, matching
//! [`crate`]-level "no global mutable state" design notes.

use core::fmt;

/// The upload destination class. Selects the legal aspect band and, for
/// stories, the "ideal" 9:16 target ratio.
///
/// Closed sum — never smuggle this as a string past the crate boundary.
#[non_exhaustive]
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum TargetFeed {
    /// General feed: legal band `[0.8, 1.91]`.
    General,
    /// Story feed: legal band depends on [`Configuration::use_best_story_ratio`].
    Story,
}

/// Whether mismatched aspect ratio cuts pixels or adds letterbox/pillarbox
/// bars.
///
/// Closed sum — never smuggle this as a string past the crate boundary.
#[non_exhaustive]
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Operation {
    /// Mismatched aspect ratio cuts pixels.
    Crop,
    /// Mismatched aspect ratio adds a solid-color border.
    Expand,
}

/// General feed legal aspect band.
pub const GENERAL_BAND: (f64, f64) = (0.8, 1.91);
/// Story feed legal aspect band when [`Configuration::use_best_story_ratio`]
/// is `false` (the wider, community-derived band).
pub const STORY_WIDE_BAND: (f64, f64) = (0.56, 0.67);
/// Story feed legal aspect band when [`Configuration::use_best_story_ratio`]
/// is `true` (a tight neighborhood of the ideal ratio).
pub const STORY_TIGHT_BAND: (f64, f64) = (0.56, 0.565);
/// Story feed's ideal ratio: exactly 9:16.
pub const STORY_IDEAL_RATIO: f64 = 0.5625;

impl TargetFeed {
    /// The feed's declared legal band, honoring `use_best_story_ratio` for
    /// [`TargetFeed::Story`].
    pub fn band(&self, use_best_story_ratio: bool) -> (f64, f64) {
        match self {
            Self::General => GENERAL_BAND,
            Self::Story if use_best_story_ratio => STORY_TIGHT_BAND,
            Self::Story => STORY_WIDE_BAND,
        }
    }

    /// The feed's "ideal" target ratio used when Stage A must pick a
    /// replacement aspect ratio. Stories always target the 9:16 ideal;
    /// general feeds target whichever band bound was violated (the caller
    /// supplies that bound directly — see [`crate::canvas`] Stage A).
    pub fn ideal_ratio(&self) -> Option<f64> {
        match self {
            Self::Story => Some(STORY_IDEAL_RATIO),
            Self::General => None,
        }
    }
}

/// Which axis a crop-focus validation error refers to.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum FocusAxis {
    Horizontal,
    Vertical,
}

impl fmt::Display for FocusAxis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Horizontal => f.write_str("horizontal"),
            Self::Vertical => f.write_str("vertical"),
        }
    }
}

/// Configuration validation failure, surfaced to the caller before the
/// canvas calculator ever runs.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "std", derive(thiserror::Error))]
pub enum ConfigError {
    /// `hor_crop_focus`/`ver_crop_focus` not in `[-50, 50]`.
    #[cfg_attr(
        feature = "std",
        error("{axis} crop focus {value} is outside the legal range [-50, 50]")
    )]
    CropFocusOutOfRange { axis: FocusAxis, value: i32 },

    /// `min_aspect_ratio` or `max_aspect_ratio` outside the feed's declared
    /// band.
    #[cfg_attr(
        feature = "std",
        error(
            "aspect ratio bound {value} is outside the {feed_kind} feed band [{band_min}, {band_max}]"
        )
    )]
    AspectRatioOutsideFeedBand {
        feed_kind: &'static str,
        value: f64,
        band_min: f64,
        band_max: f64,
    },

    /// `min_aspect_ratio > max_aspect_ratio`.
    #[cfg_attr(
        feature = "std",
        error("min_aspect_ratio {min} is greater than max_aspect_ratio {max}")
    )]
    MinExceedsMax { min: f64, max: f64 },
}

#[cfg(not(feature = "std"))]
impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::CropFocusOutOfRange { axis, value } => {
                write!(f, "{axis} crop focus {value} is outside [-50, 50]")
            }
            Self::AspectRatioOutsideFeedBand {
                feed_kind,
                value,
                band_min,
                band_max,
            } => write!(
                f,
                "aspect ratio bound {value} is outside the {feed_kind} feed band [{band_min}, {band_max}]"
            ),
            Self::MinExceedsMax { min, max } => {
                write!(f, "min_aspect_ratio {min} is greater than max_aspect_ratio {max}")
            }
        }
    }
}

/// Resolved crop-focus bias for one axis, in `[-50, 50]`.
///
/// Defaults: horizontal `0` (center), vertical `-50` (top) — per spec.
fn default_hor_focus() -> i32 {
    0
}
fn default_ver_focus() -> i32 {
    -50
}

/// A validated configuration for one `calculate_canvas`/`plan` invocation.
///
/// Constructed via [`ConfigBuilder`]; there is no public constructor that
/// skips validation.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Configuration {
    pub target_feed: TargetFeed,
    pub operation: Operation,
    pub min_aspect_ratio: Option<f64>,
    pub max_aspect_ratio: Option<f64>,
    pub hor_crop_focus: i32,
    pub ver_crop_focus: i32,
    pub use_best_story_ratio: bool,
    pub allow_new_aspect_deviation: bool,
    pub bg_color: (u8, u8, u8),
}

/// Fluent builder for [`Configuration`]. Mirrors the teacher crate's
/// `Constraint::new().gravity(..).canvas_color(..)` chain style.
#[derive(Copy, Clone, Debug)]
pub struct ConfigBuilder {
    target_feed: TargetFeed,
    operation: Operation,
    min_aspect_ratio: Option<f64>,
    max_aspect_ratio: Option<f64>,
    hor_crop_focus: Option<i32>,
    ver_crop_focus: Option<i32>,
    use_best_story_ratio: bool,
    allow_new_aspect_deviation: bool,
    bg_color: (u8, u8, u8),
}

impl ConfigBuilder {
    /// Start a builder for the given feed and operation. Aspect-ratio
    /// bounds default to the feed's declared band; crop focus defaults to
    /// center/top; `use_best_story_ratio` and
    /// `allow_new_aspect_deviation` default to `false`.
    pub fn new(target_feed: TargetFeed, operation: Operation) -> Self {
        Self {
            target_feed,
            operation,
            min_aspect_ratio: None,
            max_aspect_ratio: None,
            hor_crop_focus: None,
            ver_crop_focus: None,
            use_best_story_ratio: false,
            allow_new_aspect_deviation: false,
            bg_color: (0, 0, 0),
        }
    }

    /// Override the legal minimum aspect ratio (must stay within the feed
    /// band and `<= max_aspect_ratio`).
    pub fn min_aspect_ratio(mut self, value: f64) -> Self {
        self.min_aspect_ratio = Some(value);
        self
    }

    /// Override the legal maximum aspect ratio (must stay within the feed
    /// band and `>= min_aspect_ratio`).
    pub fn max_aspect_ratio(mut self, value: f64) -> Self {
        self.max_aspect_ratio = Some(value);
        self
    }

    /// Horizontal crop-focus bias, `[-50, 50]`.
    pub fn hor_crop_focus(mut self, value: i32) -> Self {
        self.hor_crop_focus = Some(value);
        self
    }

    /// Vertical crop-focus bias, `[-50, 50]`.
    pub fn ver_crop_focus(mut self, value: i32) -> Self {
        self.ver_crop_focus = Some(value);
        self
    }

    /// For story feeds, narrow the legal band to a tight neighborhood of
    /// the 9:16 ideal instead of the wider community-derived band.
    pub fn use_best_story_ratio(mut self, value: bool) -> Self {
        self.use_best_story_ratio = value;
        self
    }

    /// Accept a canvas whose final aspect ratio falls outside the declared
    /// band when no legal Mod2 canvas exists, instead of rejecting it.
    pub fn allow_new_aspect_deviation(mut self, value: bool) -> Self {
        self.allow_new_aspect_deviation = value;
        self
    }

    /// Solid background color used by the external renderer for expand
    /// (letterbox/pillarbox) bars.
    pub fn bg_color(mut self, r: u8, g: u8, b: u8) -> Self {
        self.bg_color = (r, g, b);
        self
    }

    /// Validate and produce a [`Configuration`].
    pub fn build(self) -> Result<Configuration, ConfigError> {
        if let Some(v) = self.hor_crop_focus
            && !(-50..=50).contains(&v)
        {
            return Err(ConfigError::CropFocusOutOfRange {
                axis: FocusAxis::Horizontal,
                value: v,
            });
        }
        if let Some(v) = self.ver_crop_focus
            && !(-50..=50).contains(&v)
        {
            return Err(ConfigError::CropFocusOutOfRange {
                axis: FocusAxis::Vertical,
                value: v,
            });
        }

        let feed_kind = match self.target_feed {
            TargetFeed::General => "general",
            TargetFeed::Story => "story",
        };
        let (band_min, band_max) = self.target_feed.band(self.use_best_story_ratio);

        let min_ar = self.min_aspect_ratio.unwrap_or(band_min);
        let max_ar = self.max_aspect_ratio.unwrap_or(band_max);

        if min_ar < band_min || min_ar > band_max {
            return Err(ConfigError::AspectRatioOutsideFeedBand {
                feed_kind,
                value: min_ar,
                band_min,
                band_max,
            });
        }
        if max_ar < band_min || max_ar > band_max {
            return Err(ConfigError::AspectRatioOutsideFeedBand {
                feed_kind,
                value: max_ar,
                band_min,
                band_max,
            });
        }
        if min_ar > max_ar {
            return Err(ConfigError::MinExceedsMax {
                min: min_ar,
                max: max_ar,
            });
        }

        Ok(Configuration {
            target_feed: self.target_feed,
            operation: self.operation,
            min_aspect_ratio: Some(min_ar),
            max_aspect_ratio: Some(max_ar),
            hor_crop_focus: self.hor_crop_focus.unwrap_or_else(default_hor_focus),
            ver_crop_focus: self.ver_crop_focus.unwrap_or_else(default_ver_focus),
            use_best_story_ratio: self.use_best_story_ratio,
            allow_new_aspect_deviation: self.allow_new_aspect_deviation,
            bg_color: self.bg_color,
        })
    }
}
