use crate::mat::MatValue;
use crate::movie_info::MOVIE_INFO_FIELDS;

use super::{ValidationCheck, ValidationReport};

/// Cap on the number of offending frames quoted in a message
const MAX_REPORTED_FRAMES: usize = 5;

/// Step 2: per-frame content of a `movieInfo` struct array.
pub(crate) fn check_frames(movie_info: &MatValue, report: &mut ValidationReport) {
    let frames = movie_info.numel();
    let mut bad_shape = Vec::new();
    let mut mismatched = Vec::new();
    let mut non_finite = Vec::new();
    let mut detections = 0usize;

    for frame in 0..frames {
        let mut counts = Vec::with_capacity(MOVIE_INFO_FIELDS.len());
        for field in MOVIE_INFO_FIELDS {
            match movie_info.field(frame, field).and_then(MatValue::as_pairs) {
                Some(pairs) => {
                    if pairs.iter().flatten().any(|v| !v.is_finite()) {
                        non_finite.push(frame);
                    }
                    counts.push(pairs.len());
                }
                None => bad_shape.push(frame),
            }
        }
        if counts.len() == MOVIE_INFO_FIELDS.len() {
            if counts.windows(2).all(|w| w[0] == w[1]) {
                detections += counts[0];
            } else {
                mismatched.push(frame);
            }
        }
    }
    bad_shape.dedup();
    non_finite.dedup();

    push_frame_check(
        report,
        "Fields are N x 2 doubles or empty",
        &bad_shape,
        |frames| ValidationCheck::failed("Fields are N x 2 doubles or empty", frames),
    );
    push_frame_check(
        report,
        "Fields have matching lengths",
        &mismatched,
        |frames| ValidationCheck::failed("Fields have matching lengths", frames),
    );
    // Amplitudes are copied from the input unchecked
    push_frame_check(report, "Finite values", &non_finite, |frames| {
        ValidationCheck::warning("Finite values", frames)
    });

    let first_populated = (0..frames).find(|&frame| {
        movie_info
            .field(frame, "xCoord")
            .is_some_and(|v| !v.is_empty())
    });
    match first_populated {
        Some(0) => report.add_check(ValidationCheck::ok("Frame 0 populated")),
        Some(first) => report.add_check(ValidationCheck::warning(
            "Frame 0 populated",
            format!(
                "First detection in frame {}; input may count frames from 1",
                first
            ),
        )),
        None => {}
    }

    if detections > 0 {
        report.add_check(ValidationCheck::ok(format!(
            "Detections present ({} in {} frames)",
            detections, frames
        )));
    } else {
        report.add_check(ValidationCheck::failed(
            "Detections present",
            format!("No detections in {} frames", frames),
        ));
    }
}

fn push_frame_check(
    report: &mut ValidationReport,
    name: &str,
    frames: &[usize],
    on_failure: impl FnOnce(String) -> ValidationCheck,
) {
    if frames.is_empty() {
        report.add_check(ValidationCheck::ok(name));
        return;
    }
    let shown: Vec<String> = frames
        .iter()
        .take(MAX_REPORTED_FRAMES)
        .map(|f| f.to_string())
        .collect();
    let more = if frames.len() > MAX_REPORTED_FRAMES {
        format!(" and {} more", frames.len() - MAX_REPORTED_FRAMES)
    } else {
        String::new()
    };
    report.add_check(on_failure(format!(
        "{} frame(s): {}{}",
        frames.len(),
        shown.join(", "),
        more
    )));
}
