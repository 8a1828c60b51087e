//! Placement planner (C3): given the canvas from [`crate::canvas`], the
//! input dimensions, the operation, and flip flags, computes the source
//! rectangle to sample and the destination rectangle to place it into.
//!
//! Pure function of its inputs — never fails on its own; all validation
//! happens upstream in [`crate::canvas`]. Outputs are guaranteed to satisfy
//! `src_rect ⊆ input` and `dst_rect ⊆ canvas`.

use crate::canvas::CanvasResult;
use crate::config::Operation;
use crate::geometry::{Dimensions, Rectangle, RoundingMode};

/// Source rectangle, destination rectangle, and canvas for one placement.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Plan {
    /// Region of the input to sample.
    pub src_rect: Rectangle,
    /// Region of the canvas to place the sample into.
    pub dst_rect: Rectangle,
    /// Final canvas dimensions.
    pub canvas: Dimensions,
}

/// Crop-focus bias, resolved per axis (a default is supplied by
/// [`crate::config::Configuration`] — `0` horizontal, `-50` vertical).
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct CropFocus {
    pub horizontal: i32,
    pub vertical: i32,
}

/// Flip state, as reported by the [`crate::resizer::Resizer`] collaborator.
/// Inverts the sign of the corresponding crop-focus axis.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct FlipState {
    pub horizontal: bool,
    pub vertical: bool,
}

/// Dispatch to [`plan_crop`] or [`plan_expand`] per `operation`.
pub fn plan(
    operation: Operation,
    canvas_result: &CanvasResult,
    input: Dimensions,
    focus: CropFocus,
    flip: FlipState,
) -> Plan {
    match operation {
        Operation::Crop => plan_crop(canvas_result, input, focus, flip),
        Operation::Expand => plan_expand(canvas_result.canvas, input),
    }
}

/// CROP mode: compute the source rectangle to cut from `input`, biased by
/// `focus`, and the identity destination rectangle covering the whole
/// canvas.
pub fn plan_crop(canvas_result: &CanvasResult, input: Dimensions, focus: CropFocus, flip: FlipState) -> Plan {
    let canvas = canvas_result.canvas;

    // Step 1: the canvas that would have existed without Mod2 adjustment.
    let ideal_w = canvas.width - canvas_result.mod2_width_diff;
    let ideal_h = canvas.height - canvas_result.mod2_height_diff;

    // Step 2: scales from input space to ideal-canvas space.
    let sw = ideal_w as f64 / input.width as f64;
    let sh = ideal_h as f64 / input.height as f64;

    // Step 3: which dimension was cropped?
    let ideal_ar = ideal_w as f64 / ideal_h as f64;
    let input_ar = input.aspect();
    let overall_rescale = if ideal_ar == input_ar {
        sw
    } else if ideal_ar < input_ar {
        sh // width was cropped; rescale by the unaffected (height) axis.
    } else {
        sw // height was cropped; rescale by the unaffected (width) axis.
    };

    // Step 4: rescale the ideal canvas back into input space.
    let mut cropped_w = round_i64(ideal_w as f64 / overall_rescale);
    let mut cropped_h = round_i64(ideal_h as f64 / overall_rescale);

    // Step 5: rescale the Mod2 deltas into input space and add them in.
    cropped_w += round_i64(canvas_result.mod2_width_diff as f64 / overall_rescale);
    cropped_h += round_i64(canvas_result.mod2_height_diff as f64 / overall_rescale);

    // Step 6: clamp to the full input.
    cropped_w = cropped_w.min(input.width);
    cropped_h = cropped_h.min(input.height);

    // Step 7: diffs vs. full input (both ≤ 0 after clamping); apply focus.
    let diff_w = cropped_w - input.width;
    let diff_h = cropped_h - input.height;

    let (x1, x2) = if diff_w < 0 {
        let removed = -diff_w;
        let hor_focus = if flip.horizontal { -focus.horizontal } else { focus.horizontal };
        let x1 = floor_i64(removed as f64 * (50 + hor_focus) as f64 / 100.0);
        let x2 = input.width - (removed - x1);
        (x1, x2)
    } else {
        (0, input.width)
    };

    let (y1, y2) = if diff_h < 0 {
        let removed = -diff_h;
        let ver_focus = if flip.vertical { -focus.vertical } else { focus.vertical };
        let y1 = floor_i64(removed as f64 * (50 + ver_focus) as f64 / 100.0);
        let y2 = input.height - (removed - y1);
        (y1, y2)
    } else {
        (0, input.height)
    };

    // Step 8.
    let src_rect = Rectangle::new(x1, y1, x2 - x1, y2 - y1);
    let dst_rect = Rectangle::new(0, 0, canvas.width, canvas.height);

    Plan {
        src_rect,
        dst_rect,
        canvas,
    }
}

/// EXPAND mode: the whole input is sampled, centered on the canvas with
/// letterbox/pillarbox bars filling the remainder.
pub fn plan_expand(canvas: Dimensions, input: Dimensions) -> Plan {
    let src_rect = Rectangle::new(0, 0, input.width, input.height);

    let scale_w = canvas.width as f64 / input.width as f64;
    let scale_h = canvas.height as f64 / input.height as f64;
    let scale = scale_w.min(scale_h);

    let scaled = src_rect.with_rescaling(scale, RoundingMode::Ceil);
    let dst_x = floor_i64((canvas.width - scaled.width) as f64 / 2.0);
    let dst_y = floor_i64((canvas.height - scaled.height) as f64 / 2.0);

    let dst_rect = Rectangle::new(dst_x, dst_y, scaled.width, scaled.height);

    Plan {
        src_rect,
        dst_rect,
        canvas,
    }
}

/// Swap axes on every member of a [`Plan`] — used when the
/// [`crate::resizer::Resizer`] reports that input pixels are stored
/// rotated. The planner itself always operates in logical (upright)
/// space; this adapter is applied at the boundary, just before handing
/// rectangles to the renderer.
pub fn swap_axes(plan: &Plan) -> Plan {
    Plan {
        src_rect: swap_rect_axes(plan.src_rect),
        dst_rect: swap_rect_axes(plan.dst_rect),
        canvas: plan.canvas.swap_axes(),
    }
}

fn swap_rect_axes(r: Rectangle) -> Rectangle {
    Rectangle::new(r.y, r.x, r.height, r.width)
}

fn floor_i64(v: f64) -> i64 {
    v.floor() as i64
}

fn round_i64(v: f64) -> i64 {
    v.round() as i64
}
