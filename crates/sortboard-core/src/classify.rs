use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::model::SessionStatus;

/// Spike-sorter output folders are recognized by this name prefix.
pub const SORTER_DIR_PREFIX: &str = "Kilosort";

/// Hidden folder phy leaves inside the sorter output once manual curation ran.
pub const CURATION_MARKER: &str = ".phy";

/// Filenames post-processing must leave directly in the session directory.
pub fn required_files(session_name: &str) -> [String; 5] {
    [
        format!("{session_name}.animal.behavior.mat"),
        "anatomical_map.csv".to_string(),
        format!("{session_name}.cell_metrics.cellinfo.mat"),
        format!("{session_name}.ripples.events.mat"),
        format!("{session_name}.spikes.cellinfo.mat"),
    ]
}

/// What the classifier observes about one session directory.
#[derive(Debug, Clone, Default)]
pub struct SessionLayout {
    /// Chosen sorter-output subdirectory, if any exists.
    pub sorter_output: Option<PathBuf>,
    /// Whether the curation marker exists inside the sorter output.
    pub curated: bool,
    /// Required filenames absent from the session directory, in template order.
    pub missing_files: Vec<String>,
}

impl SessionLayout {
    /// Inspect a session directory. Only names and existence are read, never
    /// file contents.
    pub fn read(session_path: &Path, session_name: &str) -> io::Result<SessionLayout> {
        let mut entry_names: Vec<String> = Vec::new();
        let mut sorter_dirs: Vec<PathBuf> = Vec::new();

        for entry in fs::read_dir(session_path)? {
            let entry = entry?;
            let name = entry.file_name().to_string_lossy().into_owned();
            if entry.path().is_dir() && name.starts_with(SORTER_DIR_PREFIX) {
                sorter_dirs.push(entry.path());
            }
            entry_names.push(name);
        }

        // Directory-listing order is not stable across filesystems; take the
        // lexicographically smallest candidate so reruns agree.
        sorter_dirs.sort();
        let sorter_output = sorter_dirs.into_iter().next();

        let curated = sorter_output
            .as_deref()
            .map(|dir| dir.join(CURATION_MARKER).exists())
            .unwrap_or(false);

        let missing_files = required_files(session_name)
            .into_iter()
            .filter(|file| !entry_names.iter().any(|have| have == file))
            .collect();

        Ok(SessionLayout {
            sorter_output,
            curated,
            missing_files,
        })
    }
}

/// One step of the decision list: the first rule whose predicate holds
/// decides the session's status.
pub struct Rule {
    pub status: SessionStatus,
    pub applies: fn(&SessionLayout) -> bool,
}

fn no_sorter_output(layout: &SessionLayout) -> bool {
    layout.sorter_output.is_none()
}

fn not_curated(layout: &SessionLayout) -> bool {
    !layout.curated
}

fn required_files_missing(layout: &SessionLayout) -> bool {
    !layout.missing_files.is_empty()
}

fn always(_layout: &SessionLayout) -> bool {
    true
}

/// Decision list, evaluated top to bottom. Order is the precedence: a session
/// with no sorter output is "to preprocess" no matter what else is missing.
pub static RULES: &[Rule] = &[
    Rule {
        status: SessionStatus::ToPreprocess,
        applies: no_sorter_output,
    },
    Rule {
        status: SessionStatus::ToSpikeSort,
        applies: not_curated,
    },
    Rule {
        status: SessionStatus::ToPostProcess,
        applies: required_files_missing,
    },
    Rule {
        status: SessionStatus::Ready,
        applies: always,
    },
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Classification {
    pub status: SessionStatus,
    /// Missing required filenames, comma-joined, when status is ToPostProcess.
    pub comment: String,
}

pub fn classify(layout: &SessionLayout) -> Classification {
    let status = RULES
        .iter()
        .find(|rule| (rule.applies)(layout))
        .map(|rule| rule.status)
        .unwrap_or(SessionStatus::Ready);

    let comment = match status {
        SessionStatus::ToPostProcess => layout.missing_files.join(", "),
        _ => String::new(),
    };

    Classification { status, comment }
}
