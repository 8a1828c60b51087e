//! Canvas and crop/pad placement computation for conforming a photo or
//! video to a set of dimension and aspect-ratio constraints imposed by an
//! upload target (a social-media feed or story feed).
//!
//! Pure geometry — no pixel operations, no image/video codec work, no
//! subprocess invocation. Those are modeled as the external
//! [`resizer::Resizer`] collaborator, consumed only through its trait
//! methods.
//!
//! # Modules
//!
//! - [`geometry`] — dimension and rectangle value types (C1)
//! - [`config`] — feed/operation selection and the validated configuration record
//! - [`canvas`] — the canvas calculator: derives a legal output canvas (C2)
//! - [`placement`] — the placement planner: source/destination rectangles (C3)
//! - [`resizer`] — the `Resizer` collaborator and the `should_process` guard (`std` only)
//! - [`error`] — the unified pipeline error type (`std` only)

#![cfg_attr(not(feature = "std"), no_std)]
#![forbid(unsafe_code)]

pub mod canvas;
pub mod config;
pub mod geometry;
pub mod placement;

#[cfg(feature = "std")]
pub mod error;
#[cfg(feature = "std")]
pub mod resizer;

pub use canvas::{CanvasError, CanvasResult, calculate_canvas};
pub use config::{
    ConfigBuilder, ConfigError, Configuration, FocusAxis, GENERAL_BAND, Operation,
    STORY_IDEAL_RATIO, STORY_TIGHT_BAND, STORY_WIDE_BAND, TargetFeed,
};
pub use geometry::{Dimensions, Rectangle, RoundingMode};
pub use placement::{CropFocus, FlipState, Plan, plan, plan_crop, plan_expand, swap_axes};

#[cfg(feature = "std")]
pub use error::Error;
#[cfg(feature = "std")]
pub use resizer::{Resizer, should_process};

/// Outcome of [`conform`]: either the input was already acceptable and is
/// left untouched, or it was processed and the renderer's output path is
/// returned.
#[cfg(feature = "std")]
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ConformOutcome {
    /// The input already satisfied the bounds; nothing was rendered.
    Unchanged,
    /// The input was resized/padded; this is the renderer's output path.
    Processed(std::path::PathBuf),
}

/// Run the whole pipeline: guard, calculate canvas, plan placement, swap
/// axes if the input is stored rotated, invoke the renderer.
///
/// This is the one entry point that ties together §4.4 (the processing
/// guard), C2 (`calculate_canvas`), and C3 (`plan`/`swap_axes`) in the
/// order §2's data flow diagram describes.
#[cfg(feature = "std")]
pub fn conform<R: resizer::Resizer>(
    resizer: &R,
    config: &config::Configuration,
) -> Result<ConformOutcome, Error<R::Error>> {
    if !resizer::should_process(resizer, config) {
        return Ok(ConformOutcome::Unchanged);
    }

    let input = resizer.input_dimensions();
    let canvas_result = calculate_canvas(
        config.target_feed,
        config.operation,
        input,
        resizer.is_mod2_canvas_required(),
        resizer.min_width(),
        resizer.max_width(),
        config.min_aspect_ratio,
        config.max_aspect_ratio,
        config.allow_new_aspect_deviation,
    )?;

    if config.allow_new_aspect_deviation {
        let achieved = canvas_result.canvas.aspect();
        let within_min = config.min_aspect_ratio.is_none_or(|m| achieved >= m);
        let within_max = config.max_aspect_ratio.is_none_or(|m| achieved <= m);
        if !(within_min && within_max) {
            tracing::warn!(
                target: "feedcanvas",
                achieved,
                min = ?config.min_aspect_ratio,
                max = ?config.max_aspect_ratio,
                "canvas aspect ratio deviates from the declared band; allow_new_aspect_deviation is in effect"
            );
        }
    }

    let focus = placement::CropFocus {
        horizontal: config.hor_crop_focus,
        vertical: config.ver_crop_focus,
    };
    let flip = placement::FlipState {
        horizontal: resizer.is_hor_flipped(),
        vertical: resizer.is_ver_flipped(),
    };
    let plan = placement::plan(config.operation, &canvas_result, input, focus, flip);
    let plan = if resizer.is_axis_swapped() {
        placement::swap_axes(&plan)
    } else {
        plan
    };

    let path = resizer
        .resize(plan.src_rect, plan.dst_rect, plan.canvas)
        .map_err(Error::Renderer)?;

    Ok(ConformOutcome::Processed(path))
}
