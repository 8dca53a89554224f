use std::collections::HashMap;

use crate::error::Error;
use crate::model::SessionRecord;

/// Lookup from (animal_id, session_name) to the remote entry id.
pub type IdentityIndex = HashMap<(String, String), String>;

/// A remote database entry reduced to its id and identity pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteEntry {
    pub id: String,
    pub animal_id: String,
    pub session_name: String,
}

/// Remote store holding one entry per scanned session.
///
/// `NotionClient` is the production implementation; tests inject in-memory
/// fakes. All calls are blocking and any failure aborts the run.
pub trait SessionStore {
    fn fetch_entries(&self) -> Result<Vec<RemoteEntry>, Error>;
    fn create_entry(&self, record: &SessionRecord) -> Result<(), Error>;
    fn update_entry(&self, entry_id: &str, record: &SessionRecord) -> Result<(), Error>;
}

#[derive(Debug, Default, PartialEq, Eq)]
pub struct SyncOutcome {
    pub created: usize,
    pub updated: usize,
}

/// Index fetched entries by identity. Duplicate identities keep the first
/// entry fetched; later pages with the same pair are left untouched.
pub fn build_identity_index(entries: Vec<RemoteEntry>) -> IdentityIndex {
    let mut index = IdentityIndex::with_capacity(entries.len());
    for entry in entries {
        index
            .entry((entry.animal_id, entry.session_name))
            .or_insert(entry.id);
    }
    index
}

/// Upsert one remote entry per record, in record order. Records whose
/// identity appears in the index update the existing entry, everything else
/// creates a new one. `on_progress` is called after each record with
/// (records done, total records).
pub fn sync_records<S, F>(
    store: &S,
    index: &IdentityIndex,
    records: &[SessionRecord],
    mut on_progress: F,
) -> Result<SyncOutcome, Error>
where
    S: SessionStore + ?Sized,
    F: FnMut(usize, usize),
{
    let total = records.len();
    let mut outcome = SyncOutcome::default();

    for (position, record) in records.iter().enumerate() {
        let identity = (record.animal_id.clone(), record.session_name.clone());
        match index.get(&identity) {
            Some(entry_id) => {
                store.update_entry(entry_id, record)?;
                outcome.updated += 1;
            }
            None => {
                store.create_entry(record)?;
                outcome.created += 1;
            }
        }
        on_progress(position + 1, total);
    }

    Ok(outcome)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::SessionStatus;
    use std::cell::RefCell;

    #[derive(Default)]
    struct RecordingStore {
        created: RefCell<Vec<String>>,
        updated: RefCell<Vec<(String, String)>>,
    }

    impl SessionStore for RecordingStore {
        fn fetch_entries(&self) -> Result<Vec<RemoteEntry>, Error> {
            Ok(Vec::new())
        }

        fn create_entry(&self, record: &SessionRecord) -> Result<(), Error> {
            self.created
                .borrow_mut()
                .push(format!("{}/{}", record.animal_id, record.session_name));
            Ok(())
        }

        fn update_entry(&self, entry_id: &str, record: &SessionRecord) -> Result<(), Error> {
            self.updated.borrow_mut().push((
                entry_id.to_string(),
                format!("{}/{}", record.animal_id, record.session_name),
            ));
            Ok(())
        }
    }

    fn entry(id: &str, animal: &str, session: &str) -> RemoteEntry {
        RemoteEntry {
            id: id.to_string(),
            animal_id: animal.to_string(),
            session_name: session.to_string(),
        }
    }

    fn record(animal: &str, session: &str) -> SessionRecord {
        SessionRecord {
            animal_id: animal.to_string(),
            session_name: session.to_string(),
            status: SessionStatus::Ready,
            path: format!("/data/{animal}/{session}"),
            comment: String::new(),
        }
    }

    #[test]
    fn test_index_keys_by_animal_and_session() {
        let index = build_identity_index(vec![
            entry("p1", "M1", "S1"),
            entry("p2", "M1", "S2"),
            entry("p3", "M2", "S1"),
        ]);

        assert_eq!(index.len(), 3);
        assert_eq!(index[&("M1".to_string(), "S2".to_string())], "p2");
    }

    #[test]
    fn test_index_keeps_first_duplicate_identity() {
        let index =
            build_identity_index(vec![entry("p1", "M1", "S1"), entry("p2", "M1", "S1")]);

        assert_eq!(index.len(), 1);
        assert_eq!(index[&("M1".to_string(), "S1".to_string())], "p1");
    }

    #[test]
    fn test_sync_creates_missing_and_updates_known() {
        let store = RecordingStore::default();
        let index = build_identity_index(vec![entry("p1", "M1", "S1")]);
        let records = vec![record("M1", "S1"), record("M1", "S2")];

        let outcome = sync_records(&store, &index, &records, |_, _| {}).unwrap();

        assert_eq!(
            outcome,
            SyncOutcome {
                created: 1,
                updated: 1
            }
        );
        assert_eq!(*store.created.borrow(), vec!["M1/S2".to_string()]);
        assert_eq!(
            *store.updated.borrow(),
            vec![("p1".to_string(), "M1/S1".to_string())]
        );
    }

    #[test]
    fn test_sync_reports_progress_per_record() {
        let store = RecordingStore::default();
        let index = IdentityIndex::new();
        let records = vec![record("M1", "S1"), record("M1", "S2"), record("M2", "S1")];

        let mut seen: Vec<(usize, usize)> = Vec::new();
        sync_records(&store, &index, &records, |done, total| {
            seen.push((done, total));
        })
        .unwrap();

        assert_eq!(seen, vec![(1, 3), (2, 3), (3, 3)]);
    }
}
