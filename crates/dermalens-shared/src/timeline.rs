//! In-memory photo timeline grouped into per-day buckets.
//!
//! The timeline is the client's primary view model. Every staged photo lives
//! in exactly one [`DateBucket`], buckets are ordered newest day first, and a
//! bucket that loses its last photo is pruned immediately so the UI never
//! renders an empty day.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::types::{Photo, PhotoId};

/// One day's worth of photos.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DateBucket {
    pub date: NaiveDate,
    /// Photos for this day, newest upload first.
    pub items: Vec<Photo>,
    /// Cached item count, kept equal to `items.len()` after every mutation.
    pub count: usize,
}

impl DateBucket {
    fn new(date: NaiveDate) -> Self {
        Self {
            date,
            items: Vec::new(),
            count: 0,
        }
    }

    /// Restore bucket invariants after a mutation: item order and count.
    fn resync(&mut self) {
        self.items.sort_by(|a, b| b.uploaded_at.cmp(&a.uploaded_at));
        self.count = self.items.len();
    }
}

/// Date-descending sequence of [`DateBucket`]s.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Timeline {
    buckets: Vec<DateBucket>,
}

impl Timeline {
    pub fn new() -> Self {
        Self::default()
    }

    /// All buckets, newest date first.
    pub fn buckets(&self) -> &[DateBucket] {
        &self.buckets
    }

    /// Insert a photo into the bucket matching its `creation_date`, creating
    /// the bucket if needed. Inserting an id already present in the bucket is
    /// a no-op, so the operation is idempotent.
    pub fn add_photo(&mut self, photo: Photo) {
        let date = photo.creation_date;
        if !self.buckets.iter().any(|b| b.date == date) {
            self.buckets.push(DateBucket::new(date));
            self.buckets.sort_by(|a, b| b.date.cmp(&a.date));
        }
        if let Some(bucket) = self.buckets.iter_mut().find(|b| b.date == date) {
            if !bucket.items.iter().any(|p| p.id == photo.id) {
                bucket.items.push(photo);
            }
            bucket.resync();
        }
    }

    /// Remove a photo by id, pruning buckets left empty. Every bucket is
    /// swept, so a snapshot that duplicated an id across dates loses all
    /// copies. Returns the first removed photo.
    pub fn remove_photo(&mut self, id: PhotoId) -> Option<Photo> {
        let mut removed = None;
        for bucket in &mut self.buckets {
            if let Some(pos) = bucket.items.iter().position(|p| p.id == id) {
                let photo = bucket.items.remove(pos);
                if removed.is_none() {
                    removed = Some(photo);
                }
                bucket.resync();
            }
        }
        self.buckets.retain(|b| b.count > 0);
        removed
    }

    /// Move a photo to a new calendar day. Returns `false` when the photo is
    /// unknown; a same-day edit leaves the timeline untouched.
    pub fn change_date(&mut self, id: PhotoId, new_date: NaiveDate) -> bool {
        let current = match self.find_photo(id) {
            Some(photo) => photo.creation_date,
            None => return false,
        };
        if current == new_date {
            return true;
        }
        match self.remove_photo(id) {
            Some(mut photo) => {
                photo.creation_date = new_date;
                self.add_photo(photo);
                true
            }
            None => false,
        }
    }

    /// Flattened view: bucket order (newest day first), then item order
    /// (newest upload first). This is the canonical all-photos sequence used
    /// for duplicate checks and batch analysis targeting.
    pub fn photos(&self) -> impl Iterator<Item = &Photo> {
        self.buckets.iter().flat_map(|b| b.items.iter())
    }

    pub fn find_photo(&self, id: PhotoId) -> Option<&Photo> {
        self.photos().find(|p| p.id == id)
    }

    /// Duplicate test used at ingestion: both filename and size must match.
    /// Content is deliberately not hashed; this is a session-local heuristic.
    pub fn contains_duplicate(&self, filename: &str, size: u64) -> bool {
        self.photos()
            .any(|p| p.filename == filename && p.size == size)
    }

    /// Total number of photos across all buckets.
    pub fn len(&self) -> usize {
        self.buckets.iter().map(|b| b.count).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.buckets.is_empty()
    }

    pub fn clear(&mut self) {
        self.buckets.clear();
    }
}

// -----------------------------------------------------------------------------
// Tests
// -----------------------------------------------------------------------------
