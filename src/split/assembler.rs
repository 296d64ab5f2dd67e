//! Result Assembler
//!
//! Turns the ordered artifact list into the response payload: the file
//! itself for one artifact, a zip of all artifacts for more.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

use super::types::{Artifact, SplitError, SplitPayload, ARCHIVE_FILE_NAME};
use super::workspace::Workspace;

/// Build the payload. All bytes are read into memory here, so the workspace
/// can be released as soon as this returns.
pub async fn assemble(workspace: &Workspace, artifacts: &[Artifact]) -> Result<SplitPayload, SplitError> {
    match artifacts {
        [] => Err(SplitError::NoPagesExtracted),
        [single] => {
            let data = tokio::fs::read(&single.path).await?;
            Ok(SplitPayload::Single {
                file_name: single.file_name.clone(),
                data,
            })
        }
        many => {
            let archive_path = workspace.archive_path();
            let entries: Vec<(String, PathBuf)> = many
                .iter()
                .map(|a| (a.file_name.clone(), a.path.clone()))
                .collect();

            let target = archive_path.clone();
            tokio::task::spawn_blocking(move || write_archive(&target, &entries)).await??;

            let data = tokio::fs::read(&archive_path).await?;
            tracing::debug!(
                workspace = %workspace.id(),
                entries = many.len(),
                bytes = data.len(),
                "Archive built"
            );

            Ok(SplitPayload::Archive {
                file_name: ARCHIVE_FILE_NAME.to_string(),
                data,
                entries: many.len(),
            })
        }
    }
}

/// Write a zip holding exactly `entries` (archive name, source path), flat, in order
fn write_archive(target: &Path, entries: &[(String, PathBuf)]) -> Result<(), SplitError> {
    let file = File::create(target)?;
    let mut zip = ZipWriter::new(BufWriter::new(file));
    let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);

    for (name, path) in entries {
        zip.start_file(name.as_str(), options)?;
        let mut source = File::open(path)?;
        std::io::copy(&mut source, &mut zip)?;
    }

    let mut writer = zip.finish()?;
    writer.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{Cursor, Read};
    use tempfile::TempDir;

    async fn artifact(workspace: &Workspace, name: &str, body: &[u8]) -> Artifact {
        let path = workspace.output_dir().join(name);
        tokio::fs::write(&path, body).await.unwrap();
        Artifact {
            range: name.to_string(),
            file_name: name.to_string(),
            path,
            size: body.len() as u64,
        }
    }

    #[tokio::test]
    async fn test_no_artifacts() {
        let temp_dir = TempDir::new().unwrap();
        let workspace = Workspace::acquire(temp_dir.path()).await.unwrap();

        let result = assemble(&workspace, &[]).await;
        assert!(matches!(result, Err(SplitError::NoPagesExtracted)));

        workspace.release().await;
    }

    #[tokio::test]
    async fn test_single_artifact_returned_directly() {
        let temp_dir = TempDir::new().unwrap();
        let workspace = Workspace::acquire(temp_dir.path()).await.unwrap();
        let a = artifact(&workspace, "pages_2_4.pdf", b"%PDF-1.4 two to four").await;

        let payload = assemble(&workspace, &[a]).await.unwrap();
        assert!(matches!(payload, SplitPayload::Single { .. }));
        assert_eq!(payload.file_name(), "pages_2_4.pdf");
        assert_eq!(payload.data(), b"%PDF-1.4 two to four");
        assert!(!workspace.archive_path().exists());

        workspace.release().await;
    }

    #[tokio::test]
    async fn test_many_artifacts_zipped() {
        let temp_dir = TempDir::new().unwrap();
        let workspace = Workspace::acquire(temp_dir.path()).await.unwrap();
        workspace.save_upload("source.pdf", b"%PDF-1.4 original").await.unwrap();

        let artifacts = vec![
            artifact(&workspace, "pages_1_3.pdf", b"one").await,
            artifact(&workspace, "pages_5.pdf", b"five").await,
            artifact(&workspace, "pages_7_10.pdf", b"seven").await,
        ];

        let payload = assemble(&workspace, &artifacts).await.unwrap();
        let entries = match &payload {
            SplitPayload::Archive { entries, .. } => *entries,
            other => panic!("expected archive, got {:?}", other),
        };
        assert_eq!(entries, 3);
        assert_eq!(payload.file_name(), ARCHIVE_FILE_NAME);

        let mut archive = zip::ZipArchive::new(Cursor::new(payload.into_data())).unwrap();
        assert_eq!(archive.len(), 3);

        let names: Vec<String> = (0..archive.len())
            .map(|i| archive.by_index(i).unwrap().name().to_string())
            .collect();
        assert_eq!(names, vec!["pages_1_3.pdf", "pages_5.pdf", "pages_7_10.pdf"]);

        let mut five = String::new();
        archive
            .by_name("pages_5.pdf")
            .unwrap()
            .read_to_string(&mut five)
            .unwrap();
        assert_eq!(five, "five");

        workspace.release().await;
    }
}
