use std::fmt;

/// Pipeline stage of a recording session, inferred from which files exist.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SessionStatus {
    ToPreprocess,
    ToSpikeSort,
    ToPostProcess,
    Ready,
}

impl SessionStatus {
    /// Exact strings written to the board's "Status" select property.
    pub fn as_str(&self) -> &'static str {
        match self {
            SessionStatus::ToPreprocess => "sessions to be preprocessed",
            SessionStatus::ToSpikeSort => "sessions to spike sort",
            SessionStatus::ToPostProcess => "sessions to post-process",
            SessionStatus::Ready => "ready for analysis",
        }
    }
}

impl fmt::Display for SessionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One classified session directory, as produced by the scanner.
/// (animal_id, session_name) identifies the session across scans.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionRecord {
    pub animal_id: String,
    pub session_name: String,
    pub status: SessionStatus,
    pub path: String,
    /// Missing required filenames when status is ToPostProcess, else empty.
    pub comment: String,
}

/// Per-status session counts over one scan.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StatusTally {
    pub to_preprocess: usize,
    pub to_spike_sort: usize,
    pub to_post_process: usize,
    pub ready: usize,
}

impl StatusTally {
    pub fn count(records: &[SessionRecord]) -> StatusTally {
        let mut tally = StatusTally::default();
        for record in records {
            match record.status {
                SessionStatus::ToPreprocess => tally.to_preprocess += 1,
                SessionStatus::ToSpikeSort => tally.to_spike_sort += 1,
                SessionStatus::ToPostProcess => tally.to_post_process += 1,
                SessionStatus::Ready => tally.ready += 1,
            }
        }
        tally
    }
}
