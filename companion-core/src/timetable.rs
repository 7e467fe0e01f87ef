//! The signed-in user's class list: a local working copy mutated
//! optimistically and reconciled with the document store.

use crate::auth::{SessionContext, SubscriptionId};
use crate::filters::sort_classes;
use crate::models::{timetable_path, ClassDraft, ClassEntry, ClassId, UserId};
use crate::overlap::find_conflict;
use crate::store::{Document, DocumentStore};
use crate::CoreError;
use parking_lot::{Mutex, RwLock};
use std::collections::HashSet;
use std::sync::Arc;
use tracing::{debug, info, warn};

pub enum Mutation {
    Insert(ClassEntry),
    Remove(ClassId),
}

/// Inverse of an applied [`Mutation`].
#[derive(Debug)]
pub enum Undo {
    Remove(ClassId),
    Restore(ClassEntry),
    Nothing,
}

/// Sorted in-memory class set.
#[derive(Clone, Debug, Default)]
pub struct Timetable {
    classes: Vec<ClassEntry>,
}

impl Timetable {
    pub fn from_entries(mut classes: Vec<ClassEntry>) -> Self {
        sort_classes(&mut classes);
        Self { classes }
    }

    pub fn classes(&self) -> &[ClassEntry] {
        &self.classes
    }

    pub fn get(&self, id: &str) -> Option<&ClassEntry> {
        self.classes.iter().find(|c| c.id == id)
    }

    pub fn apply(&mut self, mutation: Mutation) -> Undo {
        match mutation {
            Mutation::Insert(entry) => {
                let id = entry.id.clone();
                self.classes.push(entry);
                sort_classes(&mut self.classes);
                Undo::Remove(id)
            }
            Mutation::Remove(id) => match self.classes.iter().position(|c| c.id == id) {
                Some(pos) => Undo::Restore(self.classes.remove(pos)),
                None => Undo::Nothing,
            },
        }
    }

    pub fn revert(&mut self, undo: Undo) {
        match undo {
            Undo::Remove(id) => self.classes.retain(|c| c.id != id),
            Undo::Restore(entry) => {
                self.classes.push(entry);
                sort_classes(&mut self.classes);
            }
            Undo::Nothing => {}
        }
    }

    pub fn clear(&mut self) {
        self.classes.clear();
    }
}

fn entry_from_document(doc: Document) -> Result<ClassEntry, serde_json::Error> {
    let mut entry: ClassEntry = serde_json::from_value(doc.payload)?;
    entry.id = doc.id;
    Ok(entry)
}

pub struct TimetableService {
    store: Arc<dyn DocumentStore>,
    user: RwLock<Option<UserId>>,
    timetable: Mutex<Timetable>,
    in_flight: Mutex<HashSet<ClassId>>,
}

/// Marks one class id busy until dropped.
struct InFlight<'a> {
    set: &'a Mutex<HashSet<ClassId>>,
    id: ClassId,
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.set.lock().remove(&self.id);
    }
}

impl TimetableService {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self {
            store,
            user: RwLock::new(None),
            timetable: Mutex::new(Timetable::default()),
            in_flight: Mutex::new(HashSet::new()),
        }
    }

    /// Fetches the user's classes, replacing the working copy.
    /// On failure the copy is left empty.
    pub async fn load(&self, user_id: &str) -> Result<usize, CoreError> {
        *self.user.write() = Some(user_id.to_string());
        self.timetable.lock().clear();
        let docs = self.store.list(&timetable_path(user_id)).await?;
        let mut entries = Vec::with_capacity(docs.len());
        for doc in docs {
            let id = doc.id.clone();
            match entry_from_document(doc) {
                Ok(e) => entries.push(e),
                Err(err) => warn!(class = %id, error = %err, "skipping unreadable class"),
            }
        }
        let n = entries.len();
        *self.timetable.lock() = Timetable::from_entries(entries);
        info!(user = %user_id, classes = n, "timetable loaded");
        Ok(n)
    }

    /// Drops the working copy and forgets the user.
    pub fn reset(&self) {
        *self.user.write() = None;
        self.timetable.lock().clear();
    }

    /// Resets the working copy whenever the signed-in user goes away or changes.
    pub fn follow(self: &Arc<Self>, ctx: &SessionContext) -> SubscriptionId {
        let this = Arc::downgrade(self);
        ctx.subscribe(move |session| {
            let Some(svc) = this.upgrade() else {
                return;
            };
            let loaded = svc.user();
            if session.map(|s| &s.user_id) != loaded.as_ref() {
                svc.reset();
            }
        })
    }

    pub fn snapshot(&self) -> Vec<ClassEntry> {
        self.timetable.lock().classes().to_vec()
    }

    pub fn user(&self) -> Option<UserId> {
        self.user.read().clone()
    }

    /// Validates, gates on overlap, inserts locally, then persists.
    /// A failed write removes the class again.
    pub async fn add(&self, draft: ClassDraft) -> Result<ClassEntry, CoreError> {
        let draft = draft.validate()?;
        let user = self.require_user()?;
        let (entry, payload, undo, _busy) = {
            let mut tt = self.timetable.lock();
            if let Some(existing) = find_conflict(&draft, tt.classes()) {
                debug!(existing = %existing.name, "overlap rejected");
                return Err(CoreError::Conflict(
                    "class overlaps an existing class on the same day",
                ));
            }
            let entry = draft.into_entry(&mut rand::thread_rng());
            let payload =
                serde_json::to_value(&entry).map_err(|_| CoreError::Storage("encode class"))?;
            let busy = self.begin(&entry.id)?;
            let undo = tt.apply(Mutation::Insert(entry.clone()));
            (entry, payload, undo, busy)
        };
        match self.store.put(&timetable_path(&user), &entry.id, &payload).await {
            Ok(()) => {
                info!(class = %entry.id, name = %entry.name, "class added");
                Ok(entry)
            }
            Err(e) => {
                warn!(class = %entry.id, error = %e, "add failed, rolling back");
                self.timetable.lock().revert(undo);
                Err(e)
            }
        }
    }

    /// Removes locally, then deletes remotely; restores the entry on failure.
    pub async fn delete(&self, id: &str) -> Result<ClassEntry, CoreError> {
        let user = self.require_user()?;
        let _busy = self.begin(id)?;
        let removed = match self.timetable.lock().apply(Mutation::Remove(id.to_string())) {
            Undo::Restore(entry) => entry,
            _ => return Err(CoreError::NotFound("class")),
        };
        match self.store.delete(&timetable_path(&user), id).await {
            Ok(()) => {
                info!(class = %id, name = %removed.name, "class removed");
                Ok(removed)
            }
            Err(e) => {
                warn!(class = %id, error = %e, "delete failed, restoring");
                self.timetable.lock().revert(Undo::Restore(removed));
                Err(e)
            }
        }
    }

    fn require_user(&self) -> Result<UserId, CoreError> {
        self.user().ok_or(CoreError::Invalid("you must be signed in"))
    }

    fn begin(&self, id: &str) -> Result<InFlight<'_>, CoreError> {
        if !self.in_flight.lock().insert(id.to_string()) {
            return Err(CoreError::Busy("a request for this class is still pending"));
        }
        Ok(InFlight {
            set: &self.in_flight,
            id: id.to_string(),
        })
    }
}
