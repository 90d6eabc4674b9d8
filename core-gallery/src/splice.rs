//! Document splicer: replaces a style's gallery region inside the index
//! document.
//!
//! The region's opening is located by a structural pattern keyed on the
//! style name: the style's page container, its hero section, and the
//! opening of the masonry grid. Its end is the grid's own closing tag,
//! found by div-depth counting so that nested items already present in the
//! region can never be mistaken for the region boundary. Only the grid's
//! inner content is replaced; surrounding markup is preserved byte for
//! byte. A pattern miss is a no-op, never an error.

use crate::error::{GalleryError, Result};
use crate::render::render_style_items;
use chrono::Local;
use core_sync::StyleManifest;
use regex::Regex;
use std::path::PathBuf;
use tracing::{debug, info, instrument, warn};

/// Result of splicing one style's fragment into a document.
#[derive(Debug, PartialEq, Eq)]
pub enum SpliceOutcome {
    /// Region found and content differs; carries the new document
    Updated(String),
    /// Region found but the content is already identical
    Unchanged,
    /// No region for this style exists in the document
    NoMatch,
}

/// Replace the inner gallery content of `style`'s region in `document`.
pub fn splice(document: &str, style: &str, fragment: &str) -> Result<SpliceOutcome> {
    let pattern = format!(
        r#"(?s)<div id="{style}" class="page">\s*.*?<section class="fineline-hero">.*?</section>\s*<div class="fineline-gallery">\s*<div class="gallery-masonry">"#,
        style = regex::escape(style)
    );
    let re = Regex::new(&pattern).map_err(|e| GalleryError::Pattern(e.to_string()))?;

    let Some(opening) = re.find(document) else {
        return Ok(SpliceOutcome::NoMatch);
    };

    let inner_start = opening.end();
    let Some(inner_len) = region_inner_len(&document[inner_start..]) else {
        // Unclosed masonry container; treat like a structural mismatch.
        return Ok(SpliceOutcome::NoMatch);
    };

    let mut updated = String::with_capacity(document.len() + fragment.len());
    updated.push_str(&document[..inner_start]);
    updated.push_str(fragment);
    updated.push_str(&document[inner_start + inner_len..]);

    if updated == document {
        Ok(SpliceOutcome::Unchanged)
    } else {
        Ok(SpliceOutcome::Updated(updated))
    }
}

/// Length of the masonry container's inner content: everything up to the
/// `</div>` that closes the container itself, tracked by div nesting depth
/// so item markup inside the region never terminates the scan early.
fn region_inner_len(html: &str) -> Option<usize> {
    let mut depth = 1usize;
    let mut pos = 0;

    while let Some(offset) = html[pos..].find('<') {
        let at = pos + offset;
        let tail = &html[at..];
        if tail.starts_with("</div") {
            depth -= 1;
            if depth == 0 {
                return Some(at);
            }
            pos = at + "</div".len();
        } else if tail.starts_with("<div")
            && matches!(
                tail.as_bytes().get("<div".len()),
                Some(b' ' | b'>' | b'\t' | b'\r' | b'\n')
            )
        {
            depth += 1;
            pos = at + "<div".len();
        } else {
            pos = at + 1;
        }
    }

    None
}

/// Applies every style's rendered fragment to the index document.
///
/// The document is read once, spliced in memory, and written back at most
/// once per run. A timestamped backup copy is written before any splice is
/// attempted; backup failure is logged and the run continues.
pub struct DocumentUpdater {
    index_path: PathBuf,
}

impl DocumentUpdater {
    pub fn new<P: Into<PathBuf>>(index_path: P) -> Self {
        Self {
            index_path: index_path.into(),
        }
    }

    /// Update every non-empty style's gallery region, returning the styles
    /// whose region actually changed.
    #[instrument(skip_all)]
    pub async fn update_all(&self, images: &StyleManifest) -> Result<Vec<String>> {
        let content = tokio::fs::read_to_string(&self.index_path)
            .await
            .map_err(|e| GalleryError::Io(format!("read {}: {}", self.index_path.display(), e)))?;

        self.write_backup(&content).await;

        let mut current = content;
        let mut updated_styles = Vec::new();

        for (style, records) in images {
            if records.is_empty() {
                continue;
            }
            let fragment = render_style_items(style, records);
            match splice(&current, style, &fragment)? {
                SpliceOutcome::Updated(next) => {
                    info!(style, "Updated gallery section");
                    current = next;
                    updated_styles.push(style.clone());
                }
                SpliceOutcome::Unchanged => debug!(style, "Gallery section already current"),
                SpliceOutcome::NoMatch => warn!(style, "No gallery section found in document"),
            }
        }

        if !updated_styles.is_empty() {
            tokio::fs::write(&self.index_path, &current).await.map_err(|e| {
                GalleryError::Io(format!("write {}: {}", self.index_path.display(), e))
            })?;
        }

        Ok(updated_styles)
    }

    async fn write_backup(&self, content: &str) {
        let stamp = Local::now().format("%Y%m%d_%H%M%S");
        let backup_path = self
            .index_path
            .with_file_name(format!("index_backup_{}.html", stamp));

        match tokio::fs::write(&backup_path, content).await {
            Ok(()) => info!(path = %backup_path.display(), "Created index backup"),
            Err(e) => warn!(path = %backup_path.display(), error = %e, "Backup failed"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn sample_record(id: &str, name: &str) -> core_sync::ImageRecord {
        core_sync::ImageRecord {
            id: id.to_string(),
            name: name.to_string(),
            local_path: format!("images/STYLES/blackwork/{}", name),
            hash: "h".to_string(),
            created_time: String::new(),
            modified_time: String::new(),
            size: 10,
            sync_time: chrono::Utc::now(),
        }
    }

    fn sample_document(style: &str) -> String {
        format!(
            r#"<html>
<body>
<div class="wrapper">
<div id="{style}" class="page">
<section class="fineline-hero">
<h1>Estilo</h1>
</section>
<div class="fineline-gallery">
<div class="gallery-masonry">
PLACEHOLDER
</div>
</div>
</div>
</div>
</body>
</html>"#
        )
    }

    #[test]
    fn test_splice_replaces_inner_content_only() {
        let doc = sample_document("blackwork");
        let outcome = splice(&doc, "blackwork", "NEW CONTENT").unwrap();

        let SpliceOutcome::Updated(updated) = outcome else {
            panic!("expected update");
        };
        assert!(updated.contains(r#"<div class="gallery-masonry">NEW CONTENT</div>"#));
        assert!(!updated.contains("PLACEHOLDER"));
        // Surrounding markup preserved
        assert!(updated.contains("<h1>Estilo</h1>"));
        assert!(updated.contains(r#"<div id="blackwork" class="page">"#));
    }

    #[test]
    fn test_splice_missing_style_is_no_match() {
        let doc = sample_document("blackwork");
        assert_eq!(
            splice(&doc, "anime", "NEW").unwrap(),
            SpliceOutcome::NoMatch
        );
    }

    #[test]
    fn test_splice_empty_fragment_empties_but_keeps_container() {
        let doc = sample_document("fineline");
        let SpliceOutcome::Updated(updated) = splice(&doc, "fineline", "").unwrap() else {
            panic!("expected update");
        };
        assert!(updated.contains(r#"<div class="gallery-masonry"></div>"#));
        assert!(updated.contains(r#"<div class="fineline-gallery">"#));
    }

    #[test]
    fn test_splice_identical_content_is_unchanged() {
        let doc = sample_document("anime");
        let SpliceOutcome::Updated(updated) = splice(&doc, "anime", "STABLE").unwrap() else {
            panic!("expected update");
        };
        assert_eq!(
            splice(&updated, "anime", "STABLE").unwrap(),
            SpliceOutcome::Unchanged
        );
    }

    #[test]
    fn test_resplice_over_populated_region_stays_balanced() {
        // The full record list is rendered every run, so the second run
        // splices over a region already holding item markup. The item's own
        // nested closing divs must not be taken for the region boundary.
        let doc = sample_document("blackwork");

        let one = render_style_items("blackwork", &[sample_record("a", "dragon.jpg")]);
        let SpliceOutcome::Updated(first) = splice(&doc, "blackwork", &one).unwrap() else {
            panic!("expected update");
        };
        assert_eq!(first.matches("masonry-item").count(), 1);
        assert_eq!(
            first.matches("<div").count(),
            first.matches("</div>").count()
        );

        let two = render_style_items(
            "blackwork",
            &[
                sample_record("a", "dragon.jpg"),
                sample_record("b", "rose.jpg"),
            ],
        );
        let SpliceOutcome::Updated(second) = splice(&first, "blackwork", &two).unwrap() else {
            panic!("expected update");
        };
        assert_eq!(second.matches("masonry-item").count(), 2);
        assert_eq!(
            second.matches("<div").count(),
            second.matches("</div>").count()
        );
        // Region and page closers survive intact after the grid content
        assert!(second.contains("</div>\n</div>\n</div>\n</div>"));
        assert!(second.ends_with("</body>\n</html>"));

        // Re-splicing the identical fragment is a no-op
        assert_eq!(
            splice(&second, "blackwork", &two).unwrap(),
            SpliceOutcome::Unchanged
        );
    }

    #[test]
    fn test_splice_unclosed_region_is_no_match() {
        let doc = r#"<div id="anime" class="page">
<section class="fineline-hero"></section>
<div class="fineline-gallery">
<div class="gallery-masonry">
never closed"#;
        assert_eq!(splice(doc, "anime", "X").unwrap(), SpliceOutcome::NoMatch);
    }

    #[test]
    fn test_splice_only_touches_named_style() {
        let doc = format!(
            "{}\n{}",
            sample_document("blackwork"),
            sample_document("anime")
        );
        let SpliceOutcome::Updated(updated) = splice(&doc, "anime", "ANIME ITEMS").unwrap() else {
            panic!("expected update");
        };
        assert!(updated.contains("ANIME ITEMS"));
        // The blackwork region is untouched
        assert_eq!(updated.matches("PLACEHOLDER").count(), 1);
    }

    #[tokio::test]
    async fn test_update_all_writes_backup_and_document_once() {
        let dir = tempdir().unwrap();
        let index_path = dir.path().join("index.html");
        tokio::fs::write(&index_path, sample_document("blackwork"))
            .await
            .unwrap();

        let mut images = StyleManifest::new();
        images.insert(
            "blackwork".to_string(),
            vec![core_sync::ImageRecord {
                id: "a".to_string(),
                name: "dragon.jpg".to_string(),
                local_path: "images/STYLES/blackwork/dragon.jpg".to_string(),
                hash: "h".to_string(),
                created_time: String::new(),
                modified_time: String::new(),
                size: 10,
                sync_time: chrono::Utc::now(),
            }],
        );

        let updated = DocumentUpdater::new(&index_path)
            .update_all(&images)
            .await
            .unwrap();
        assert_eq!(updated, vec!["blackwork".to_string()]);

        let written = tokio::fs::read_to_string(&index_path).await.unwrap();
        assert!(written.contains(r#"data-aos-delay="100""#));
        assert!(written.contains("dragon.jpg"));

        // Exactly one timestamped backup with the original content
        let mut backups = Vec::new();
        let mut entries = tokio::fs::read_dir(dir.path()).await.unwrap();
        while let Some(entry) = entries.next_entry().await.unwrap() {
            let name = entry.file_name().to_string_lossy().into_owned();
            if name.starts_with("index_backup_") {
                backups.push(entry.path());
            }
        }
        assert_eq!(backups.len(), 1);
        let backup = tokio::fs::read_to_string(&backups[0]).await.unwrap();
        assert!(backup.contains("PLACEHOLDER"));
    }

    #[tokio::test]
    async fn test_update_all_empty_styles_are_skipped() {
        let dir = tempdir().unwrap();
        let index_path = dir.path().join("index.html");
        let doc = sample_document("anime");
        tokio::fs::write(&index_path, &doc).await.unwrap();

        let mut images = StyleManifest::new();
        images.insert("anime".to_string(), Vec::new());

        let updated = DocumentUpdater::new(&index_path)
            .update_all(&images)
            .await
            .unwrap();
        assert!(updated.is_empty());
        // Document untouched
        assert_eq!(tokio::fs::read_to_string(&index_path).await.unwrap(), doc);
    }
}
