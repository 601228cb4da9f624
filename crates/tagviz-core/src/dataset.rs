//! Loading of the artist/tag dataset.
//!
//! Three tab-separated files with a header row make up the dataset:
//!
//! ```text
//! artists.dat             id  name  url  pictureURL
//! tags.dat                tagID  tagValue              (Latin-1)
//! user_taggedartists.dat  userID  artistID  tagID  day  month  year
//! ```
//!
//! Only the columns shown first are read; trailing columns are ignored.

use std::collections::HashMap;
use std::io::Read;
use std::path::Path;

use crate::TagvizConfig;

/// In-memory index over the dataset, built once at startup and shared read-only.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    /// Artist names in order of first appearance, without duplicates.
    artist_names: Vec<String>,
    /// Name to id. On duplicate names the last row wins.
    artist_ids: HashMap<String, u32>,
    tag_values: HashMap<u32, String>,
    /// Tag ids per artist, one entry per tagging event, in file order.
    artist_tags: HashMap<u32, Vec<u32>>,
}

impl Catalog {
    /// Load the dataset files named by the config.
    pub fn load(config: &TagvizConfig) -> crate::Result<Self> {
        let artists_path = config.artists_path();
        let tags_path = config.tags_path();
        let tagged_path = config.tagged_artists_path();

        let catalog = Self::from_readers(
            (open(&artists_path)?, artists_path.as_path()),
            (open(&tags_path)?, tags_path.as_path()),
            (open(&tagged_path)?, tagged_path.as_path()),
        )?;

        tracing::info!(
            artists = catalog.artist_names.len(),
            tags = catalog.tag_values.len(),
            tagged_artists = catalog.artist_tags.len(),
            data_dir = %config.data_dir().display(),
            "dataset loaded"
        );
        Ok(catalog)
    }

    /// Build a catalog from already-open readers. Each reader is paired with
    /// the path reported in errors.
    pub fn from_readers<A: Read, T: Read, G: Read>(
        artists: (csv::Reader<A>, &Path),
        tags: (csv::Reader<T>, &Path),
        tagged: (csv::Reader<G>, &Path),
    ) -> crate::Result<Self> {
        let mut catalog = Self::default();
        catalog.read_artists(artists.0, artists.1)?;
        catalog.read_tags(tags.0, tags.1)?;
        catalog.read_tagged_artists(tagged.0, tagged.1)?;
        Ok(catalog)
    }

    fn read_artists<R: Read>(&mut self, mut reader: csv::Reader<R>, path: &Path) -> crate::Result<()> {
        let mut record = csv::ByteRecord::new();
        while read_record(&mut reader, &mut record, path)? {
            let id = parse_id(&record, 0, path)?;
            let name = String::from_utf8_lossy(field(&record, 1, path)?).into_owned();
            if self.artist_ids.insert(name.clone(), id).is_none() {
                self.artist_names.push(name);
            }
        }
        Ok(())
    }

    fn read_tags<R: Read>(&mut self, mut reader: csv::Reader<R>, path: &Path) -> crate::Result<()> {
        let mut record = csv::ByteRecord::new();
        while read_record(&mut reader, &mut record, path)? {
            let id = parse_id(&record, 0, path)?;
            let value = decode_latin1(field(&record, 1, path)?);
            self.tag_values.insert(id, value);
        }
        Ok(())
    }

    fn read_tagged_artists<R: Read>(
        &mut self,
        mut reader: csv::Reader<R>,
        path: &Path,
    ) -> crate::Result<()> {
        let mut record = csv::ByteRecord::new();
        while read_record(&mut reader, &mut record, path)? {
            let artist_id = parse_id(&record, 1, path)?;
            let tag_id = parse_id(&record, 2, path)?;
            self.artist_tags.entry(artist_id).or_default().push(tag_id);
        }
        Ok(())
    }

    /// Every artist name, in dataset order.
    pub fn artist_names(&self) -> &[String] {
        &self.artist_names
    }

    pub fn artist_id(&self, name: &str) -> Option<u32> {
        self.artist_ids.get(name).copied()
    }

    pub fn contains_artist(&self, name: &str) -> bool {
        self.artist_ids.contains_key(name)
    }

    pub fn tag_value(&self, tag_id: u32) -> Option<&str> {
        self.tag_values.get(&tag_id).map(String::as_str)
    }

    /// Tag ids applied to an artist, one per tagging event.
    pub fn tags_for_artist(&self, artist_id: u32) -> &[u32] {
        self.artist_tags
            .get(&artist_id)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }
}

/// Reader configuration shared by every dataset file.
pub fn reader_builder() -> csv::ReaderBuilder {
    let mut builder = csv::ReaderBuilder::new();
    builder
        .delimiter(b'\t')
        .has_headers(true)
        .flexible(true)
        .quoting(false);
    builder
}

fn open(path: &Path) -> crate::Result<csv::Reader<std::fs::File>> {
    reader_builder()
        .from_path(path)
        .map_err(|e| crate::Error::DatasetOpen {
            path: path.to_path_buf(),
            source: e,
        })
}

fn read_record<R: Read>(
    reader: &mut csv::Reader<R>,
    record: &mut csv::ByteRecord,
    path: &Path,
) -> crate::Result<bool> {
    reader
        .read_byte_record(record)
        .map_err(|e| crate::Error::DatasetRecord {
            path: path.to_path_buf(),
            line: e.position().map(|p| p.line()).unwrap_or(0),
            detail: e.to_string(),
        })
}

fn field<'r>(record: &'r csv::ByteRecord, index: usize, path: &Path) -> crate::Result<&'r [u8]> {
    record.get(index).ok_or_else(|| crate::Error::DatasetRecord {
        path: path.to_path_buf(),
        line: line_of(record),
        detail: format!("missing column {index}"),
    })
}

fn parse_id(record: &csv::ByteRecord, index: usize, path: &Path) -> crate::Result<u32> {
    let raw = field(record, index, path)?;
    std::str::from_utf8(raw)
        .ok()
        .and_then(|s| s.trim().parse().ok())
        .ok_or_else(|| crate::Error::DatasetRecord {
            path: path.to_path_buf(),
            line: line_of(record),
            detail: format!(
                "column {index} is not an id: {:?}",
                String::from_utf8_lossy(raw)
            ),
        })
}

fn line_of(record: &csv::ByteRecord) -> u64 {
    record.position().map(|p| p.line()).unwrap_or(0)
}

/// Latin-1 maps every byte to the code point of the same value.
fn decode_latin1(bytes: &[u8]) -> String {
    bytes.iter().map(|&b| char::from(b)).collect()
}
