use crate::models::video_format::{CaptureRequest, FormatDescriptor};

/// Pick the best advertised capability for a request.
///
/// A candidate survives when the requested width and height fall inside
/// its bounds and the requested frame rate fits with one unit of slack
/// (see [`FormatDescriptor::admits`]). Among survivors the highest
/// [`VideoFormatKind::rank`](crate::models::video_format::VideoFormatKind::rank)
/// wins; rank −1 candidates are never selectable. Ties resolve to the
/// first candidate in input order, so selection is deterministic for a
/// fixed capability list.
///
/// `None` is a normal outcome the caller branches on, not an error.
pub fn select_best_format<'a>(
    candidates: &'a [FormatDescriptor],
    request: &CaptureRequest,
) -> Option<&'a FormatDescriptor> {
    let mut best: Option<(&'a FormatDescriptor, i32)> = None;

    for candidate in candidates {
        if !candidate.admits(request) {
            continue;
        }

        let rank = candidate.kind.rank();
        if rank < 0 {
            continue;
        }

        match best {
            // Strictly-greater only: an equal rank keeps the earlier hit.
            Some((_, best_rank)) if rank <= best_rank => {}
            _ => best = Some((candidate, rank)),
        }
    }

    best.map(|(candidate, _)| candidate)
}
