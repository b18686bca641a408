use std::collections::HashMap;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use pretty_assertions::assert_eq;
use services::{AppServices, Clock, ImageSource, ProgressService, ResetConfirmation};
use storage::repository::{InMemoryRepository, ProgressSlotRepository, Storage};
use tokio::sync::{mpsc, oneshot};
use workbook_core::model::{Catalog, ComponentId, FieldUpdate, ImageData, SystemId, TextField};
use workbook_core::snapshot::{self, EXPORT_FILE_NAME, PROGRESS_SLOT};
use workbook_core::time::fixed_now;

fn brake_disc() -> ComponentId {
    ComponentId::new("brake-disc")
}

/// Reports each read as it starts and holds reads of chosen paths until released.
struct HeldImages {
    started: mpsc::UnboundedSender<PathBuf>,
    held: Mutex<HashMap<PathBuf, oneshot::Receiver<()>>>,
}

#[async_trait]
impl ImageSource for HeldImages {
    async fn read(&self, path: &Path) -> io::Result<Vec<u8>> {
        let _ = self.started.send(path.to_path_buf());
        let release = self.held.lock().unwrap().remove(path);
        if let Some(release) = release {
            let _ = release.await;
        }
        tokio::fs::read(path).await
    }
}

async fn in_memory_service(repo: &InMemoryRepository) -> ProgressService {
    ProgressService::load(
        Clock::fixed(fixed_now()),
        Catalog::builtin(),
        Arc::new(repo.clone()),
    )
    .await
    .expect("load")
}

#[tokio::test]
async fn learner_completes_then_auto_fills_brake_disc() {
    let repo = InMemoryRepository::new();
    let svc = in_memory_service(&repo).await;

    svc.update(
        SystemId::Disc,
        &brake_disc(),
        FieldUpdate::Image(Some(
            ImageData::from_data_url("data:image/png;base64,iVBORw0KGgo=").unwrap(),
        )),
    )
    .await
    .unwrap();
    svc.set_text(
        SystemId::Disc,
        &brake_disc(),
        TextField::Function,
        "it stops the car",
    )
    .await
    .unwrap();

    let record = svc.get(SystemId::Disc, &brake_disc()).await;
    assert!(record.completed());
    assert_eq!(record.user_visual_description(), "");
    assert!(!record.auto_filled());

    let record = svc.auto_fill(SystemId::Disc, &brake_disc()).await.unwrap();
    let def = svc
        .catalog()
        .definition(SystemId::Disc, &brake_disc())
        .unwrap();
    assert_eq!(record.user_visual_description(), def.visual_description);
    assert_eq!(record.user_operation(), def.operation);
    assert_eq!(record.user_function(), "it stops the car");
    assert!(record.auto_filled());
    assert!(svc.is_complete(SystemId::Disc, &brake_disc()).await);
}

#[tokio::test]
async fn completing_every_disc_component_reaches_hundred_percent() {
    let repo = InMemoryRepository::new();
    let svc = in_memory_service(&repo).await;
    assert_eq!(svc.progress(SystemId::Disc).await.percent, 0);

    let ids: Vec<ComponentId> = svc
        .catalog()
        .components(SystemId::Disc)
        .iter()
        .map(|def| def.component_id())
        .collect();
    assert_eq!(ids.len(), 6);

    let mut last = 0;
    for id in &ids {
        svc.update(
            SystemId::Disc,
            id,
            FieldUpdate::Image(Some(ImageData::encode("image/jpeg", b"jpg"))),
        )
        .await
        .unwrap();
        svc.auto_fill(SystemId::Disc, id).await.unwrap();
        let now = svc.progress(SystemId::Disc).await.percent;
        assert!(now >= last);
        last = now;
    }

    let disc = svc.progress(SystemId::Disc).await;
    assert_eq!(disc.percent, 100);
    assert!(disc.is_finished());
    assert_eq!(svc.progress(SystemId::Drum).await.percent, 0);
}

#[tokio::test]
async fn progress_survives_reload_from_sqlite() {
    let url = "sqlite:file:memdb_workbook_reload?mode=memory&cache=shared";
    let storage = Storage::sqlite(url).await.expect("storage");
    let clock = Clock::fixed(fixed_now());

    let first = ProgressService::load(clock, Catalog::builtin(), Arc::clone(&storage.slots))
        .await
        .unwrap();
    first
        .update(
            SystemId::Drum,
            &ComponentId::new("wheel-cylinder"),
            FieldUpdate::Image(Some(ImageData::encode("image/png", &[1, 2, 3]))),
        )
        .await
        .unwrap();
    first
        .set_text(
            SystemId::Drum,
            &ComponentId::new("wheel-cylinder"),
            TextField::Operation,
            "pushes both shoes",
        )
        .await
        .unwrap();

    let second = ProgressService::load(clock, Catalog::builtin(), Arc::clone(&storage.slots))
        .await
        .unwrap();
    assert_eq!(second.snapshot().await, first.snapshot().await);
    assert_eq!(second.progress(SystemId::Drum).await.completed, 1);
}

#[tokio::test]
async fn attach_image_file_embeds_data_url() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("caliper.png");
    std::fs::write(&path, b"abc").unwrap();

    let repo = InMemoryRepository::new();
    let svc = in_memory_service(&repo).await;
    let record = svc
        .attach_image_file(SystemId::Disc, &ComponentId::new("brake-caliper"), &path)
        .await
        .unwrap();

    let image = record.image().expect("image attached");
    assert_eq!(image.as_str(), "data:image/png;base64,YWJj");
    assert!(!record.completed());
}

#[tokio::test]
async fn concurrent_image_reads_apply_in_call_order() {
    let dir = tempfile::tempdir().unwrap();
    let first = dir.path().join("first.png");
    let second = dir.path().join("second.jpg");
    std::fs::write(&first, b"first").unwrap();
    std::fs::write(&second, b"second").unwrap();

    let (started_tx, mut started) = mpsc::unbounded_channel();
    let (release_first, hold_first) = oneshot::channel();
    let images = HeldImages {
        started: started_tx,
        held: Mutex::new(HashMap::from([(first.clone(), hold_first)])),
    };

    let repo = InMemoryRepository::new();
    let svc = Arc::new(
        in_memory_service(&repo)
            .await
            .with_image_source(Arc::new(images)),
    );
    let pads = ComponentId::new("brake-pads");
    let old = svc
        .update(
            SystemId::Disc,
            &pads,
            FieldUpdate::Image(Some(ImageData::encode("image/gif", b"old"))),
        )
        .await
        .unwrap();

    let a = {
        let svc = Arc::clone(&svc);
        let pads = pads.clone();
        let first = first.clone();
        tokio::spawn(async move { svc.attach_image_file(SystemId::Disc, &pads, &first).await })
    };
    assert_eq!(started.recv().await, Some(first.clone()));
    let during = svc.get(SystemId::Disc, &pads).await;
    assert_eq!(during.image(), old.image());

    let b = {
        let svc = Arc::clone(&svc);
        let pads = pads.clone();
        let second = second.clone();
        tokio::spawn(async move { svc.attach_image_file(SystemId::Disc, &pads, &second).await })
    };
    tokio::time::sleep(Duration::from_millis(50)).await;
    assert!(started.try_recv().is_err(), "second read started before the first finished");
    let during = svc.get(SystemId::Disc, &pads).await;
    assert_eq!(during.image(), old.image());

    release_first.send(()).unwrap();
    a.await.unwrap().unwrap();
    b.await.unwrap().unwrap();
    assert_eq!(started.recv().await, Some(second));

    let record = svc.get(SystemId::Disc, &pads).await;
    assert_eq!(record.image().and_then(|i| i.media_type()), Some("image/jpeg"));
}

#[tokio::test]
async fn export_writes_pretty_document_without_mutating() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join(EXPORT_FILE_NAME);

    let repo = InMemoryRepository::new();
    let svc = in_memory_service(&repo).await;
    svc.set_text(
        SystemId::Drum,
        &ComponentId::new("return-springs"),
        TextField::Function,
        "pull shoes back",
    )
    .await
    .unwrap();
    let before = svc.snapshot().await;

    svc.export_to_file(&path).await.unwrap();

    let written = std::fs::read_to_string(&path).unwrap();
    assert_eq!(written, svc.export_snapshot().await.unwrap());
    assert!(written.contains("\"drum-return-springs\""));
    assert_eq!(snapshot::decode(&written).unwrap(), before);
    assert_eq!(svc.snapshot().await, before);
}

#[tokio::test]
async fn reset_zeroes_progress_and_clears_slot() {
    let services = AppServices::new_in_memory(Clock::fixed(fixed_now()))
        .await
        .unwrap();
    let svc = services.progress();
    svc.update(
        SystemId::Disc,
        &brake_disc(),
        FieldUpdate::Image(Some(ImageData::encode("image/png", b"x"))),
    )
    .await
    .unwrap();
    svc.auto_fill(SystemId::Disc, &brake_disc()).await.unwrap();
    assert!(svc.progress(SystemId::Disc).await.percent > 0);

    let confirmed = ResetConfirmation::from_answer("yes").expect("confirmed");
    svc.reset(confirmed).await.unwrap();

    for row in svc.overview().await {
        assert_eq!(row.percent, 0);
    }
    assert!(svc.snapshot().await.is_empty());
}

#[tokio::test]
async fn reset_removes_persisted_slot() {
    let repo = InMemoryRepository::new();
    let svc = in_memory_service(&repo).await;
    svc.set_text(SystemId::Disc, &brake_disc(), TextField::Function, "x")
        .await
        .unwrap();
    assert!(repo.read_slot(PROGRESS_SLOT).await.unwrap().is_some());

    svc.reset(ResetConfirmation::assume_yes()).await.unwrap();
    assert!(repo.read_slot(PROGRESS_SLOT).await.unwrap().is_none());

    let reloaded = in_memory_service(&repo).await;
    assert!(reloaded.snapshot().await.is_empty());
}
