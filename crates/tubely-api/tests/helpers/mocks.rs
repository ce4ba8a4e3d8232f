#![allow(dead_code)]

use async_trait::async_trait;
use chrono::Utc;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use tempfile::TempPath;
use tubely_core::{
    AppError, CreateVideoParams, Dimensions, ObjectLocation, ThumbnailRef, VideoRecord,
};
use tubely_db::VideoRepository;
use tubely_processing::{ContentInspector, ProcessingError, StreamOptimizer};
use uuid::Uuid;

use super::fixtures::{faststart_mp4, mp4_box};

/// Metadata store kept in a map, with injectable update failures.
#[derive(Default)]
pub struct InMemoryVideoRepository {
    records: Arc<Mutex<HashMap<Uuid, VideoRecord>>>,
    fail_updates: AtomicBool,
}

impl InMemoryVideoRepository {
    pub fn fail_updates(&self, fail: bool) {
        self.fail_updates.store(fail, Ordering::SeqCst);
    }

    pub fn stored(&self, id: Uuid) -> Option<VideoRecord> {
        self.records.lock().unwrap().get(&id).cloned()
    }

    pub fn insert(&self, record: VideoRecord) {
        self.records.lock().unwrap().insert(record.id, record);
    }

    fn modify(
        &self,
        id: Uuid,
        change: impl FnOnce(&mut VideoRecord),
    ) -> Result<VideoRecord, AppError> {
        if self.fail_updates.load(Ordering::SeqCst) {
            return Err(AppError::Database(sqlx::Error::PoolTimedOut));
        }
        let mut records = self.records.lock().unwrap();
        let existing = records
            .get_mut(&id)
            .ok_or_else(|| AppError::NotFound("Video not found".to_string()))?;
        change(existing);
        existing.updated_at = Utc::now();
        Ok(existing.clone())
    }
}

#[async_trait]
impl VideoRepository for InMemoryVideoRepository {
    async fn create(&self, params: CreateVideoParams) -> Result<VideoRecord, AppError> {
        let record = VideoRecord::new(params);
        self.insert(record.clone());
        Ok(record)
    }

    async fn get(&self, id: Uuid) -> Result<Option<VideoRecord>, AppError> {
        Ok(self.stored(id))
    }

    async fn update(&self, record: &VideoRecord) -> Result<VideoRecord, AppError> {
        self.modify(record.id, |existing| {
            *existing = record.clone();
        })
    }

    async fn set_video_location(
        &self,
        id: Uuid,
        location: &ObjectLocation,
    ) -> Result<VideoRecord, AppError> {
        self.modify(id, |existing| existing.video = Some(location.clone()))
    }

    async fn set_thumbnail(
        &self,
        id: Uuid,
        thumbnail: &ThumbnailRef,
    ) -> Result<VideoRecord, AppError> {
        self.modify(id, |existing| existing.thumbnail = Some(thumbnail.clone()))
    }

    async fn delete(&self, id: Uuid) -> Result<bool, AppError> {
        Ok(self.records.lock().unwrap().remove(&id).is_some())
    }

    async fn list_by_owner(&self, user_id: Uuid) -> Result<Vec<VideoRecord>, AppError> {
        let mut records: Vec<VideoRecord> = self
            .records
            .lock()
            .unwrap()
            .values()
            .filter(|r| r.user_id == user_id)
            .cloned()
            .collect();
        records.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(a.id.cmp(&b.id)));
        Ok(records)
    }

    async fn health_check(&self) -> Result<(), AppError> {
        Ok(())
    }
}

/// Reports fixed dimensions for every file.
pub struct FixedInspector {
    pub dimensions: Dimensions,
    pub inspected: Mutex<Vec<PathBuf>>,
}

impl FixedInspector {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            dimensions: Dimensions::new(width, height),
            inspected: Mutex::new(Vec::new()),
        }
    }
}

#[async_trait]
impl ContentInspector for FixedInspector {
    async fn inspect(&self, path: &Path) -> Result<Dimensions, ProcessingError> {
        self.inspected.lock().unwrap().push(path.to_path_buf());
        Ok(self.dimensions)
    }
}

/// Writes a fast-start file next to the input, or fails like a crashed tool.
pub struct FakeOptimizer {
    pub fail: bool,
    pub inputs: Mutex<Vec<PathBuf>>,
    pub outputs: Mutex<Vec<PathBuf>>,
    /// Runs once while the upload is mid-flight
    pub during_optimize: Mutex<Option<Box<dyn FnOnce() + Send>>>,
}

impl FakeOptimizer {
    pub fn working() -> Self {
        Self {
            fail: false,
            inputs: Mutex::new(Vec::new()),
            outputs: Mutex::new(Vec::new()),
            during_optimize: Mutex::new(None),
        }
    }

    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::working()
        }
    }

    pub fn seen_paths(&self) -> Vec<PathBuf> {
        let mut paths = self.inputs.lock().unwrap().clone();
        paths.extend(self.outputs.lock().unwrap().iter().cloned());
        paths
    }

    pub fn run_during_optimize(&self, hook: impl FnOnce() + Send + 'static) {
        *self.during_optimize.lock().unwrap() = Some(Box::new(hook));
    }
}

#[async_trait]
impl StreamOptimizer for FakeOptimizer {
    async fn optimize(&self, input: &Path) -> Result<TempPath, ProcessingError> {
        self.inputs.lock().unwrap().push(input.to_path_buf());
        let hook = self.during_optimize.lock().unwrap().take();
        if let Some(hook) = hook {
            hook();
        }
        if self.fail {
            return Err(ProcessingError::ToolFailed {
                tool: "ffmpeg",
                status: "exit status: 1".to_string(),
                stderr: "moov atom not found".to_string(),
            });
        }

        let source = tokio::fs::read(input).await?;
        let payload = mp4_box(b"free", &source);

        let dir = input.parent().unwrap_or_else(|| Path::new("."));
        let output = tempfile::Builder::new()
            .prefix("tubely-test-faststart-")
            .suffix(".mp4")
            .tempfile_in(dir)?
            .into_temp_path();
        tokio::fs::write(&output, faststart_mp4(&payload)).await?;

        self.outputs.lock().unwrap().push(output.to_path_buf());
        Ok(output)
    }
}
