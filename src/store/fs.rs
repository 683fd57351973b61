use crate::store::StoreResult;
use std::path::{Path, PathBuf};

/// Name of the per-city directory holding raw search pages
const PAGES_DIR: &str = "pages";

/// Name of the per-city directory holding raw listing details
const LISTINGS_DIR: &str = "annonces";

/// Idempotent filesystem store for raw scrape artifacts
///
/// Layout: `<root>/<city_slug>/pages/page_<n>.json` and
/// `<root>/<city_slug>/annonces/<listing_id>.json`. Listing files are
/// write-once; page files are the per-page completion checkpoint.
#[derive(Debug, Clone)]
pub struct ListingStore {
    root: PathBuf,
}

impl ListingStore {
    /// Creates a store rooted at `root` (not created until first write)
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Root directory of the store
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn pages_dir(&self, slug: &str) -> PathBuf {
        self.root.join(slug).join(PAGES_DIR)
    }

    fn listings_dir(&self, slug: &str) -> PathBuf {
        self.root.join(slug).join(LISTINGS_DIR)
    }

    fn listing_path(&self, slug: &str, id: &str) -> PathBuf {
        self.listings_dir(slug).join(format!("{}.json", id))
    }

    /// Creates the per-city directory pair
    pub fn ensure_city(&self, slug: &str) -> StoreResult<()> {
        std::fs::create_dir_all(self.pages_dir(slug))?;
        std::fs::create_dir_all(self.listings_dir(slug))?;
        Ok(())
    }

    /// Whether a listing detail document is already persisted
    pub fn has_listing(&self, slug: &str, id: &str) -> bool {
        self.listing_path(slug, id).exists()
    }

    /// Persists one raw listing detail document
    ///
    /// Callers check `has_listing` first; ids already present are never
    /// fetched again, so this path never overwrites.
    pub fn save_listing(&self, slug: &str, id: &str, body: &str) -> StoreResult<()> {
        let path = self.listing_path(slug, id);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, body)?;
        Ok(())
    }

    /// Persists one raw search page document
    ///
    /// Presence of `page_<n>.json` marks page `n` complete; it is the
    /// checkpoint `last_saved_page` resumes from.
    pub fn save_page(&self, slug: &str, page: u32, body: &str) -> StoreResult<()> {
        let dir = self.pages_dir(slug);
        std::fs::create_dir_all(&dir)?;
        std::fs::write(dir.join(format!("page_{}.json", page)), body)?;
        Ok(())
    }

    /// Highest page number persisted for a city, 0 if none
    ///
    /// Files not matching `page_<n>.json` are ignored.
    pub fn last_saved_page(&self, slug: &str) -> StoreResult<u32> {
        let dir = self.pages_dir(slug);
        let entries = match std::fs::read_dir(&dir) {
            Ok(entries) => entries,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(0),
            Err(e) => return Err(e.into()),
        };

        let mut last = 0;
        for entry in entries {
            let entry = entry?;
            if let Some(page) = parse_page_number(&entry.file_name().to_string_lossy()) {
                last = last.max(page);
            }
        }
        Ok(last)
    }

    /// Number of persisted listing documents for a city
    pub fn count_listings(&self, slug: &str) -> StoreResult<usize> {
        count_json_files(&self.listings_dir(slug))
    }

    /// Number of persisted page documents for a city
    pub fn count_pages(&self, slug: &str) -> StoreResult<usize> {
        count_json_files(&self.pages_dir(slug))
    }

    /// Paths of all persisted listing documents for a city
    pub fn listing_paths(&self, slug: &str) -> StoreResult<Vec<PathBuf>> {
        let dir = self.listings_dir(slug);
        let entries = match std::fs::read_dir(&dir) {
            Ok(entries) => entries,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };

        let mut paths = Vec::new();
        for entry in entries {
            let path = entry?.path();
            if path.extension().map_or(false, |ext| ext == "json") {
                paths.push(path);
            }
        }
        paths.sort();
        Ok(paths)
    }

    /// Slugs of every city with a directory in the store, sorted
    pub fn city_slugs(&self) -> StoreResult<Vec<String>> {
        let entries = match std::fs::read_dir(&self.root) {
            Ok(entries) => entries,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };

        let mut slugs = Vec::new();
        for entry in entries {
            let entry = entry?;
            if entry.file_type()?.is_dir() {
                slugs.push(entry.file_name().to_string_lossy().into_owned());
            }
        }
        slugs.sort();
        Ok(slugs)
    }
}

/// Extracts `n` from a `page_<n>.json` filename
fn parse_page_number(file_name: &str) -> Option<u32> {
    file_name
        .strip_prefix("page_")?
        .strip_suffix(".json")?
        .parse()
        .ok()
}

fn count_json_files(dir: &Path) -> StoreResult<usize> {
    let entries = match std::fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(0),
        Err(e) => return Err(e.into()),
    };

    let mut count = 0;
    for entry in entries {
        let path = entry?.path();
        if path.extension().map_or(false, |ext| ext == "json") {
            count += 1;
        }
    }
    Ok(count)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn store() -> (TempDir, ListingStore) {
        let dir = TempDir::new().unwrap();
        let store = ListingStore::new(dir.path());
        (dir, store)
    }

    #[test]
    fn test_last_saved_page_empty() {
        let (_dir, store) = store();
        assert_eq!(store.last_saved_page("lyon").unwrap(), 0);
    }

    #[test]
    fn test_last_saved_page_returns_max() {
        let (_dir, store) = store();
        store.save_page("lyon", 1, "{}").unwrap();
        store.save_page("lyon", 3, "{}").unwrap();
        store.save_page("lyon", 2, "{}").unwrap();
        assert_eq!(store.last_saved_page("lyon").unwrap(), 3);
    }

    #[test]
    fn test_last_saved_page_ignores_foreign_files() {
        let (_dir, store) = store();
        store.save_page("lyon", 4, "{}").unwrap();
        let pages = store.pages_dir("lyon");
        std::fs::write(pages.join("page_broken.json"), "{}").unwrap();
        std::fs::write(pages.join("notes.txt"), "x").unwrap();
        assert_eq!(store.last_saved_page("lyon").unwrap(), 4);
    }

    #[test]
    fn test_listing_roundtrip() {
        let (_dir, store) = store();
        assert!(!store.has_listing("lyon", "123"));
        store.save_listing("lyon", "123", r#"{"id": 123}"#).unwrap();
        assert!(store.has_listing("lyon", "123"));
        assert_eq!(store.count_listings("lyon").unwrap(), 1);
    }

    #[test]
    fn test_cities_are_isolated() {
        let (_dir, store) = store();
        store.save_listing("lyon", "1", "{}").unwrap();
        store.save_page("paris", 1, "{}").unwrap();

        assert!(!store.has_listing("paris", "1"));
        assert_eq!(store.last_saved_page("lyon").unwrap(), 0);
        assert_eq!(store.city_slugs().unwrap(), vec!["lyon", "paris"]);
    }

    #[test]
    fn test_listing_paths_sorted_json_only() {
        let (_dir, store) = store();
        store.save_listing("lyon", "b", "{}").unwrap();
        store.save_listing("lyon", "a", "{}").unwrap();
        std::fs::write(store.listings_dir("lyon").join("junk.tmp"), "x").unwrap();

        let paths = store.listing_paths("lyon").unwrap();
        let names: Vec<_> = paths
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, vec!["a.json", "b.json"]);
    }
}
