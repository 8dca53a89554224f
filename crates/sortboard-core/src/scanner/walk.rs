use std::fs;
use std::io;
use std::path::Path;

use tracing::debug;

use crate::classify::{classify, SessionLayout};
use crate::model::SessionRecord;

/// Walk the two-level tree root → animal → session and classify every session
/// directory found. Non-directory entries are skipped at both levels, as are
/// excluded animal names. No recursion below the session level. The result is
/// sorted by (animal_id, session_name) so repeated scans agree.
pub fn scan_sessions(root: &Path, exclude_animals: &[String]) -> io::Result<Vec<SessionRecord>> {
    let mut records: Vec<SessionRecord> = Vec::new();

    for entry in fs::read_dir(root)? {
        let entry = entry?;
        let animal_id = entry.file_name().to_string_lossy().into_owned();
        let animal_path = entry.path();

        if !animal_path.is_dir() || exclude_animals.iter().any(|name| *name == animal_id) {
            continue;
        }

        scan_animal(&animal_path, &animal_id, &mut records)?;
    }

    records.sort_by(|a, b| {
        (a.animal_id.as_str(), a.session_name.as_str())
            .cmp(&(b.animal_id.as_str(), b.session_name.as_str()))
    });

    Ok(records)
}

fn scan_animal(
    animal_path: &Path,
    animal_id: &str,
    records: &mut Vec<SessionRecord>,
) -> io::Result<()> {
    for entry in fs::read_dir(animal_path)? {
        let entry = entry?;
        let session_path = entry.path();
        if !session_path.is_dir() {
            continue;
        }

        let session_name = entry.file_name().to_string_lossy().into_owned();
        let layout = SessionLayout::read(&session_path, &session_name)?;
        let classification = classify(&layout);

        debug!("{}/{}: {}", animal_id, session_name, classification.status);

        records.push(SessionRecord {
            animal_id: animal_id.to_string(),
            session_name,
            status: classification.status,
            path: session_path.to_string_lossy().into_owned(),
            comment: classification.comment,
        });
    }

    Ok(())
}
