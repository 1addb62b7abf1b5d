use std::fmt;

/// Two-level row coordinate: the acquisition frame and the zero-based
/// position of the row within that frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FrameIndex {
    /// Frame number as it appears in the source file
    pub frame: u32,
    /// Position within the run of rows sharing `frame`
    pub sequence: usize,
}

impl FrameIndex {
    /// Level-one label of the index, e.g. `frame_12`
    pub fn label(&self) -> String {
        format!("frame_{}", self.frame)
    }
}

impl fmt::Display for FrameIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "frame_{}[{}]", self.frame, self.sequence)
    }
}

/// Assign `(frame, sequence)` coordinates to a sequence of frame values.
///
/// The sequence counter restarts at 0 whenever a frame value differs from
/// the one immediately before it. This is a linear scan over contiguous runs,
/// not a group-by: the input is expected to be sorted so that every frame
/// forms a single run.
///
/// Known limitation: if a frame value appears in two disjoint runs, the
/// second run restarts its counter at 0 and duplicates coordinates of the
/// first. Callers sort before indexing (see [`super::LocalisationTable::new`]).
pub fn frame_index<I>(frames: I) -> Vec<FrameIndex>
where
    I: IntoIterator<Item = u32>,
{
    frames
        .into_iter()
        .scan(None::<(u32, usize)>, |state, frame| {
            let sequence = match *state {
                Some((current, counter)) if current == frame => counter + 1,
                _ => 0,
            };
            *state = Some((frame, sequence));
            Some(FrameIndex { frame, sequence })
        })
        .collect()
}
