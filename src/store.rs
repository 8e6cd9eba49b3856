//! The store module
//! Provide insertion, ingestion and nearest-neighbor lookup

use crate::error::{Result, VectorError};
use crate::ingest::parse_delimited;
use crate::search::{self, CandidateSource, Neighbor};
use crate::vector::VectorRecord;
use log::debug;

/// Append-only, in-memory collection of vectors.
///
/// Records keep their insertion order, which is both the scan order and the
/// tie-break order of every query. A record is identified by its insertion
/// index.
///
/// The store does not require all records to share one dimension. Queries
/// only compare against records of the query's own dimension; the others are
/// skipped with a warning in the log. Callers that need homogeneous data must
/// check dimensions themselves.
#[derive(Debug, Default)]
pub struct VectorStore {
    records: Vec<VectorRecord>,
}

impl VectorStore {
    /// Creates a new empty store.
    ///
    /// # Examples
    ///
    /// ```
    /// use vecstore::VectorStore;
    ///
    /// let store = VectorStore::new();
    /// assert_eq!(store.len(), 0);
    /// ```
    pub fn new() -> VectorStore {
        VectorStore { records: Vec::new() }
    }

    /// Appends a record, taking ownership of it.
    ///
    /// # Returns
    ///
    /// * `Ok(())` - The record is stored at index `len() - 1`
    /// * `Err(VectorError::AllocationFailure)` - The store could not grow
    pub fn insert(&mut self, vector: VectorRecord) -> Result<()> {
        self.records.try_reserve(1)
            .map_err(|_| VectorError::AllocationFailure)?;
        self.records.push(vector);
        Ok(())
    }

    /// Returns the stored record closest to `query`.
    ///
    /// `None` means there was nothing to compare against: the store is empty,
    /// or no record has the query's dimension. Among equally close records the
    /// earliest inserted wins.
    ///
    /// # Examples
    ///
    /// ```
    /// use vecstore::{VectorRecord, VectorStore};
    ///
    /// let mut store = VectorStore::new();
    /// assert!(store.nearest_neighbor(&VectorRecord::new(2)).is_none());
    ///
    /// store.insert(VectorRecord::from_values(vec![0.0, 0.0])).unwrap();
    /// store.insert(VectorRecord::from_values(vec![3.0, 4.0])).unwrap();
    /// store.insert(VectorRecord::from_values(vec![10.0, 10.0])).unwrap();
    ///
    /// let query = VectorRecord::from_values(vec![3.0, 4.0]);
    /// assert_eq!(store.nearest_neighbor(&query), Some(&query));
    /// ```
    pub fn nearest_neighbor(&self, query: &VectorRecord) -> Option<&VectorRecord> {
        self.nearest(query).map(|n| n.record)
    }

    /// Like [`nearest_neighbor`](VectorStore::nearest_neighbor), but also
    /// reports the index and distance of the hit.
    pub fn nearest(&self, query: &VectorRecord) -> Option<Neighbor<'_>> {
        let hit = search::nearest(self, query);
        debug!(
            "nearest over {} vectors (query dimension {}): {:?}",
            self.records.len(),
            query.dimension(),
            hit.map(|n| (n.index, n.distance))
        );
        hit
    }

    /// Searches for the `top_k` records closest to `query`.
    ///
    /// Results are in ascending order of distance, earlier insertions first
    /// among equals. Records of another dimension are skipped, so fewer than
    /// `top_k` results can come back even when the store is larger.
    ///
    /// # Examples
    ///
    /// ```
    /// use vecstore::{VectorRecord, VectorStore};
    ///
    /// let mut store = VectorStore::new();
    /// store.ingest_delimited(["1,0", "0,1", "0.7,0.7"], ',').unwrap();
    ///
    /// let results = store.search(&VectorRecord::from_values(vec![1.0, 0.0]), 2);
    /// assert_eq!(results.len(), 2);
    /// assert_eq!(results[0].index, 0);
    /// assert_eq!(results[0].distance, 0.0);
    /// ```
    pub fn search(&self, query: &VectorRecord, top_k: usize) -> Vec<Neighbor<'_>> {
        let hits = search::k_nearest(self, query, top_k);
        debug!("search top {} over {} vectors: {} hits", top_k, self.records.len(), hits.len());
        hits
    }

    /// Parses delimited lines and inserts one record per non-blank line.
    ///
    /// Lines are numbered from 1. The batch is all-or-nothing: every line is
    /// parsed before any record is inserted, so a malformed field leaves the
    /// store exactly as it was.
    ///
    /// # Returns
    ///
    /// * `Ok(usize)` - Number of records inserted
    /// * `Err(VectorError::Parse)` - Line number and text of the first bad field
    ///
    /// # Examples
    ///
    /// ```
    /// use vecstore::{VectorError, VectorStore};
    ///
    /// let mut store = VectorStore::new();
    /// assert_eq!(store.ingest_delimited("1,2,3\n4,5,6\n".lines(), ',').unwrap(), 2);
    ///
    /// let err = store.ingest_delimited("7,8,9\n1,x,3\n".lines(), ',').unwrap_err();
    /// assert_eq!(err, VectorError::Parse { line: 2, token: "x".to_string() });
    /// assert_eq!(store.len(), 2);
    /// ```
    pub fn ingest_delimited<I, S>(&mut self, lines: I, delimiter: char) -> Result<usize>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let parsed = parse_delimited(lines, delimiter)?;
        let count = parsed.len();

        self.records.try_reserve(count)
            .map_err(|_| VectorError::AllocationFailure)?;
        self.records.extend(parsed);

        debug!("ingested {} vectors, store now holds {}", count, self.records.len());
        Ok(count)
    }

    /// Retrieves a record by insertion index.
    pub fn get(&self, index: usize) -> Option<&VectorRecord> {
        self.records.get(index)
    }

    /// Returns all records in insertion order.
    pub fn records(&self) -> &[VectorRecord] {
        &self.records
    }

    /// Returns the number of records in the store.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

// Linear scan: every record, in insertion order.
impl CandidateSource for VectorStore {
    fn candidates(&self) -> impl Iterator<Item = (usize, &VectorRecord)> {
        self.records.iter().enumerate()
    }
}
