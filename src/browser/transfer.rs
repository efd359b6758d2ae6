use anyhow::{Context, Result};
use std::fs::{self, File};
use std::path::{Path, PathBuf};
use zip::ZipArchive;

use crate::api::DiskApi;
use crate::models::DownloadTask;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct BatchReport {
    pub total: usize,
    pub succeeded: usize,
    pub extracted: usize,
    /// (remote path, reason)
    pub failures: Vec<(String, String)>,
}

pub fn is_zip_archive(path: &Path) -> bool {
    path.file_name()
        .and_then(|n| n.to_str())
        .map(|n| n.to_lowercase().ends_with(".zip"))
        .unwrap_or(false)
}

/// `dir/name.zip` unpacks into `dir/name`.
pub fn extraction_dir(archive: &Path) -> Option<PathBuf> {
    let stem = archive.file_stem()?;
    Some(match archive.parent() {
        Some(parent) => parent.join(stem),
        None => PathBuf::from(stem),
    })
}

/// Downloads every task in order. A failing item is logged and skipped;
/// `on_progress(done, total)` fires after each item whatever its outcome.
pub async fn run_download_batch<F>(
    api: &dyn DiskApi,
    tasks: Vec<DownloadTask>,
    mut on_progress: F,
) -> BatchReport
where
    F: FnMut(usize, usize),
{
    let mut report = BatchReport {
        total: tasks.len(),
        ..Default::default()
    };
    tracing::info!("Starting download batch of {} items", report.total);

    for (i, task) in tasks.into_iter().enumerate() {
        match api.download_file(&task.remote_path, &task.local_path).await {
            Ok(()) => {
                report.succeeded += 1;
                if task.decompress && is_zip_archive(&task.local_path) {
                    match extract_zip(task.local_path.clone()).await {
                        Ok(dir) => {
                            tracing::info!("Extracted {:?} into {:?}", task.local_path, dir);
                            report.extracted += 1;
                        }
                        Err(e) => {
                            tracing::error!("Failed to extract {:?}: {:#}", task.local_path, e);
                        }
                    }
                }
            }
            Err(e) => {
                tracing::error!("Failed to download {}: {}", task.remote_path, e);
                report.failures.push((task.remote_path.clone(), e.to_string()));
            }
        }
        on_progress(i + 1, report.total);
    }

    tracing::info!(
        "Download batch finished: {} of {} succeeded",
        report.succeeded,
        report.total
    );
    report
}

/// Unpacks `archive` next to itself on the blocking pool; returns the target directory.
pub async fn extract_zip(archive: PathBuf) -> Result<PathBuf> {
    tokio::task::spawn_blocking(move || {
        let destination = extraction_dir(&archive)
            .with_context(|| format!("No file name in {:?}", archive))?;
        extract_zip_into(&archive, &destination)?;
        Ok(destination)
    })
    .await
    .context("Extraction task panicked")?
}

fn extract_zip_into(archive_path: &Path, destination: &Path) -> Result<()> {
    let file = File::open(archive_path)
        .with_context(|| format!("Failed to open archive {:?}", archive_path))?;
    let mut archive = ZipArchive::new(file).context("Failed to read zip archive")?;
    fs::create_dir_all(destination).context("Failed to create extraction directory")?;

    for i in 0..archive.len() {
        let mut entry = archive.by_index(i)?;
        // Entries escaping the destination (`../`, absolute) are skipped
        let outpath = match entry.enclosed_name() {
            Some(path) => destination.join(path),
            None => {
                tracing::warn!("Skipping unsafe zip entry {}", entry.name());
                continue;
            }
        };

        if entry.is_dir() {
            fs::create_dir_all(&outpath)?;
        } else {
            if let Some(parent) = outpath.parent() {
                fs::create_dir_all(parent)?;
            }
            let mut outfile = File::create(&outpath)
                .with_context(|| format!("Failed to create {:?}", outpath))?;
            std::io::copy(&mut entry, &mut outfile)?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::fake::{dir, file, FakeDisk};
    use crate::browser::BrowserSession;
    use crate::models::DirectoryListing;
    use std::io::Write;
    use zip::write::SimpleFileOptions;

    fn zip_bytes(entries: &[(&str, &str)]) -> Vec<u8> {
        let mut cursor = std::io::Cursor::new(Vec::new());
        {
            let mut writer = zip::ZipWriter::new(&mut cursor);
            for (name, body) in entries {
                writer.start_file(*name, SimpleFileOptions::default()).unwrap();
                writer.write_all(body.as_bytes()).unwrap();
            }
            writer.finish().unwrap();
        }
        cursor.into_inner()
    }

    fn task(remote: &str, local: PathBuf, decompress: bool) -> DownloadTask {
        DownloadTask {
            remote_path: remote.to_string(),
            local_path: local,
            decompress,
        }
    }

    #[test]
    fn zip_detection_ignores_case() {
        assert!(is_zip_archive(Path::new("/tmp/Scans.ZIP")));
        assert!(!is_zip_archive(Path::new("/tmp/scans.zip.txt")));
        assert_eq!(
            extraction_dir(Path::new("/tmp/scans.zip")),
            Some(PathBuf::from("/tmp/scans"))
        );
    }

    #[tokio::test]
    async fn downloads_only_selected_files() {
        let entries = vec![file("a.txt", 1), file("b.txt", 1), dir("Photos")];
        let disk = FakeDisk::new()
            .with_listing("/", entries.clone())
            .with_file("disk:/a.txt", b"a")
            .with_file("disk:/b.txt", b"b");

        let mut session = BrowserSession::new("/");
        session.apply_listing(DirectoryListing {
            path: "/".into(),
            items: entries,
            ..Default::default()
        });
        session.toggle_cursor();
        session.select_next();
        session.toggle_cursor();

        let out = tempfile::tempdir().unwrap();
        let tasks = session.download_tasks(out.path(), false);
        let mut steps = Vec::new();
        let report = run_download_batch(&disk, tasks, |done, total| steps.push((done, total))).await;

        assert_eq!(disk.download_calls(), 2);
        assert_eq!(report.succeeded, 2);
        assert_eq!(steps, vec![(1, 2), (2, 2)]);
        assert_eq!(fs::read_to_string(out.path().join("b.txt")).unwrap(), "b");
    }

    #[tokio::test]
    async fn failed_item_does_not_abort_batch() {
        let disk = FakeDisk::new().with_file("disk:/ok.txt", b"ok");
        let out = tempfile::tempdir().unwrap();
        let tasks = vec![
            task("disk:/gone.txt", out.path().join("gone.txt"), false),
            task("disk:/ok.txt", out.path().join("ok.txt"), false),
        ];

        let report = run_download_batch(&disk, tasks, |_, _| {}).await;

        assert_eq!(report.total, 2);
        assert_eq!(report.succeeded, 1);
        assert_eq!(report.failures.len(), 1);
        assert_eq!(report.failures[0].0, "disk:/gone.txt");
        assert!(out.path().join("ok.txt").exists());
    }

    #[tokio::test]
    async fn zip_is_kept_and_extracted_next_to_it() {
        let archive = zip_bytes(&[("readme.txt", "hello"), ("nested/data.csv", "1,2")]);
        let disk = FakeDisk::new().with_file("disk:/bundle.zip", &archive);
        let out = tempfile::tempdir().unwrap();
        let local = out.path().join("bundle.zip");

        let report = run_download_batch(&disk, vec![task("disk:/bundle.zip", local.clone(), true)], |_, _| {}).await;

        assert_eq!(report.succeeded, 1);
        assert_eq!(report.extracted, 1);
        assert!(local.is_file());
        let extracted = out.path().join("bundle");
        assert!(extracted.is_dir());
        assert_eq!(fs::read_to_string(extracted.join("readme.txt")).unwrap(), "hello");
        assert_eq!(fs::read_to_string(extracted.join("nested/data.csv")).unwrap(), "1,2");
    }

    #[tokio::test]
    async fn zip_left_alone_without_decompress() {
        let archive = zip_bytes(&[("readme.txt", "hello")]);
        let disk = FakeDisk::new().with_file("disk:/bundle.zip", &archive);
        let out = tempfile::tempdir().unwrap();

        let report = run_download_batch(
            &disk,
            vec![task("disk:/bundle.zip", out.path().join("bundle.zip"), false)],
            |_, _| {},
        )
        .await;

        assert_eq!(report.extracted, 0);
        assert!(!out.path().join("bundle").exists());
    }

    #[tokio::test]
    async fn corrupt_zip_still_counts_as_downloaded() {
        let disk = FakeDisk::new().with_file("disk:/broken.zip", b"not a zip");
        let out = tempfile::tempdir().unwrap();

        let report = run_download_batch(
            &disk,
            vec![task("disk:/broken.zip", out.path().join("broken.zip"), true)],
            |_, _| {},
        )
        .await;

        assert_eq!(report.succeeded, 1);
        assert_eq!(report.extracted, 0);
        assert!(out.path().join("broken.zip").exists());
    }
}
