//! The `Resizer` collaborator (§6): the abstract capability interface the
//! core consumes for everything it deliberately stays blind to — image
//! decode/encode, video transcoding, temp-file lifecycle, subprocess
//! invocation. The core never touches `std::fs`; `Resizer::resize` returns
//! an owned path it produced itself.
//!
//! Requires `std` because [`Resizer::resize`] deals in filesystem paths.

use std::path::PathBuf;

use crate::config::Configuration;
use crate::geometry::{Dimensions, Rectangle};

/// Capability interface for the external image/video renderer.
///
/// No inheritance in this crate: concrete photo/video/thumbnail renderers
/// implement this one trait and are handed to [`should_process`] and the
/// caller's own orchestration as strategy objects. No virtual dispatch
/// appears inside [`crate::canvas`] or [`crate::placement`].
pub trait Resizer {
    /// Error type returned by [`Resizer::resize`]. The core contributes
    /// nothing to its content — see [`crate::error::Error::Renderer`].
    type Error: core::fmt::Debug + core::fmt::Display;

    /// Logical upright dimensions of the input, after any implicit axis
    /// swap the decoder already applied.
    fn input_dimensions(&self) -> Dimensions;

    /// Minimum legal canvas width for this renderer (feed- and
    /// media-type-specific — e.g. video is `480..=720` regardless of
    /// feed).
    fn min_width(&self) -> i64;

    /// Maximum legal canvas width for this renderer.
    fn max_width(&self) -> i64;

    /// Whether both canvas dimensions must be even (true for video —
    /// H.264 requires Mod2 dimensions).
    fn is_mod2_canvas_required(&self) -> bool;

    /// Independent trigger to force processing even when the input
    /// already satisfies the width and aspect bands (e.g. the input needs
    /// transcoding regardless of geometry).
    fn is_processing_required(&self) -> bool;

    /// Whether the input is stored horizontally flipped.
    fn is_hor_flipped(&self) -> bool;

    /// Whether the input is stored vertically flipped.
    fn is_ver_flipped(&self) -> bool;

    /// Whether the input's pixels are stored with width/height swapped
    /// relative to [`Resizer::input_dimensions`] (e.g. a decoder that
    /// defers an EXIF-driven 90°/270° rotation to the renderer instead of
    /// applying it itself). When true, [`crate::conform`] swaps the axes of
    /// the planner's output via [`crate::placement::swap_axes`] before
    /// calling [`Resizer::resize`], so `src`/`dst` line up with the
    /// rotated storage the renderer actually reads/writes.
    fn is_axis_swapped(&self) -> bool;

    /// Render `src` from the input onto `dst` within `canvas`, returning
    /// the output path. May fail with a renderer-specific error.
    fn resize(&self, src: Rectangle, dst: Rectangle, canvas: Dimensions) -> Result<PathBuf, Self::Error>;
}

/// Should the input even be processed?
///
/// Returns `false` — leave the input untouched — iff the input already
/// satisfies the width and aspect bands *and* the resizer reports no
/// independent processing need. Returns `true` otherwise.
pub fn should_process<R: Resizer>(resizer: &R, config: &Configuration) -> bool {
    let input = resizer.input_dimensions();
    let min_w = resizer.min_width();
    let max_w = resizer.max_width();

    let width_ok = input.width >= min_w && input.width <= max_w;
    let ar = input.aspect();
    let ar_ok = config.min_aspect_ratio.is_none_or(|m| ar >= m)
        && config.max_aspect_ratio.is_none_or(|m| ar <= m);

    let already_acceptable = width_ok && ar_ok && !resizer.is_processing_required();

    tracing::debug!(
        target: "feedcanvas::resizer",
        already_acceptable,
        width_ok,
        ar_ok,
        processing_required = resizer.is_processing_required(),
        "evaluated should_process guard"
    );

    !already_acceptable
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{ConfigBuilder, Operation, TargetFeed};

    struct FakeResizer {
        dims: Dimensions,
        min_w: i64,
        max_w: i64,
        processing_required: bool,
    }

    impl Resizer for FakeResizer {
        type Error = core::convert::Infallible;

        fn input_dimensions(&self) -> Dimensions {
            self.dims
        }
        fn min_width(&self) -> i64 {
            self.min_w
        }
        fn max_width(&self) -> i64 {
            self.max_w
        }
        fn is_mod2_canvas_required(&self) -> bool {
            false
        }
        fn is_processing_required(&self) -> bool {
            self.processing_required
        }
        fn is_hor_flipped(&self) -> bool {
            false
        }
        fn is_ver_flipped(&self) -> bool {
            false
        }
        fn is_axis_swapped(&self) -> bool {
            false
        }
        fn resize(&self, _src: Rectangle, _dst: Rectangle, _canvas: Dimensions) -> Result<PathBuf, Self::Error> {
            Ok(PathBuf::from("/tmp/out"))
        }
    }

    #[test]
    fn already_legal_input_does_not_need_processing() {
        let resizer = FakeResizer {
            dims: Dimensions::new(1080, 1080),
            min_w: 320,
            max_w: 1080,
            processing_required: false,
        };
        let config = ConfigBuilder::new(TargetFeed::General, Operation::Crop)
            .min_aspect_ratio(1.0)
            .max_aspect_ratio(1.0)
            .build()
            .unwrap();
        assert!(!should_process(&resizer, &config));
    }

    #[test]
    fn out_of_band_input_needs_processing() {
        let resizer = FakeResizer {
            dims: Dimensions::new(100, 1080),
            min_w: 320,
            max_w: 1080,
            processing_required: false,
        };
        let config = ConfigBuilder::new(TargetFeed::General, Operation::Crop)
            .build()
            .unwrap();
        assert!(should_process(&resizer, &config));
    }

    #[test]
    fn independent_trigger_forces_processing() {
        let resizer = FakeResizer {
            dims: Dimensions::new(1080, 1080),
            min_w: 320,
            max_w: 1080,
            processing_required: true,
        };
        let config = ConfigBuilder::new(TargetFeed::General, Operation::Crop)
            .min_aspect_ratio(1.0)
            .max_aspect_ratio(1.0)
            .build()
            .unwrap();
        assert!(should_process(&resizer, &config));
    }
}
