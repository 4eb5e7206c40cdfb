use super::types::MediaResource;

/// The set of materialized media resources, one per rendered track.
///
/// The render layer inserts resources as tracks unlock; the controller only
/// looks them up by file id.
pub struct Deck<R> {
    resources: Vec<R>,
}

impl<R> Default for Deck<R> {
    fn default() -> Self {
        Self {
            resources: Vec::new(),
        }
    }
}

impl<R: MediaResource> Deck<R> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, file_id: &str) -> bool {
        self.resources.iter().any(|r| r.file_id() == file_id)
    }

    /// Add `resource` unless one for the same file id already exists.
    pub fn insert(&mut self, resource: R) -> bool {
        if self.contains(resource.file_id()) {
            return false;
        }
        self.resources.push(resource);
        true
    }

    pub fn get(&self, file_id: &str) -> Option<&R> {
        self.resources.iter().find(|r| r.file_id() == file_id)
    }

    pub fn get_mut(&mut self, file_id: &str) -> Option<&mut R> {
        self.resources.iter_mut().find(|r| r.file_id() == file_id)
    }

    /// Pause everything except `keep`.
    pub fn stop_all_except(&mut self, keep: Option<&str>) {
        for r in self.resources.iter_mut() {
            if Some(r.file_id()) != keep && r.is_playing() {
                r.pause();
            }
        }
    }

    pub fn playing_count(&self) -> usize {
        self.resources.iter().filter(|r| r.is_playing()).count()
    }

    /// File ids of resources that finished since the last call.
    pub fn drain_ended(&mut self) -> Vec<String> {
        self.resources
            .iter_mut()
            .filter_map(|r| r.take_ended().then(|| r.file_id().to_string()))
            .collect()
    }
}
