//! Approximate k-nearest-neighbor classification over product-quantized records.
//!
//! [`PqKnn`] owns the whole model: it trains one codebook per sub-vector
//! position, replaces every training vector with its codes, and answers
//! queries by summing distance-table lookups instead of computing full
//! distances.
//!
//! # Example
//!
//! ```ignore
//! use pqknn::{PqKnn, PqKnnConfig};
//!
//! let mut model = PqKnn::new(PqKnnConfig::new(30, 8))?;
//! model.train(&train_vectors, &train_labels)?;
//!
//! let label = model.predict(&query, 100)?;
//! ```

mod select;
mod vote;

use std::time::Instant;

use rayon::prelude::*;
use tracing::{debug, info, trace};

use crate::error::{PqError, Result};
use crate::quantization::{
    Clusterer, Codebook, DistanceTable, KMeansClusterer, PqKnnConfig, SubvectorLayout,
};

pub use select::Neighbor;
pub use vote::majority_label;

/// Integer class label attached to every training vector.
pub type Label = i32;

/// Classification accuracy over a labelled query set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Evaluation {
    /// Number of queries classified.
    pub total: usize,
    /// Number of queries whose predicted label matched.
    pub correct: usize,
}

impl Evaluation {
    /// Fraction of correct predictions in `[0, 1]`; 0 for an empty query set.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn accuracy(&self) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            self.correct as f64 / self.total as f64
        }
    }
}

/// State that exists only after a successful [`PqKnn::train`].
#[derive(Debug, Clone)]
struct TrainedModel {
    layout: SubvectorLayout,
    codebooks: Vec<Codebook>,
    /// Record-major codes: `codes[record * n + position]`.
    codes: Vec<u16>,
    labels: Vec<Label>,
}

impl TrainedModel {
    fn num_records(&self) -> usize {
        self.labels.len()
    }

    fn record_codes(&self, record: usize) -> Option<&[u16]> {
        let n = self.layout.num_subvectors();
        self.codes.get(record * n..(record + 1) * n)
    }

    fn distance_table(&self, query: &[u32]) -> Result<DistanceTable> {
        let subvectors = self.layout.split(query)?;
        Ok(DistanceTable::build(&subvectors, &self.codebooks))
    }
}

/// Product-quantization k-nearest-neighbor classifier.
///
/// Generic over the [`Clusterer`] used to learn codebooks; defaults to k-means.
#[derive(Debug, Clone)]
pub struct PqKnn<C: Clusterer = KMeansClusterer> {
    config: PqKnnConfig,
    clusterer: C,
    trained: Option<TrainedModel>,
}

impl PqKnn<KMeansClusterer> {
    /// Create an untrained model that learns codebooks with k-means.
    ///
    /// # Errors
    ///
    /// Returns [`PqError::InvalidConfiguration`] if the configuration is invalid.
    pub fn new(config: PqKnnConfig) -> Result<Self> {
        let clusterer = KMeansClusterer::new(config.max_iterations, config.convergence_threshold);
        Self::with_clusterer(config, clusterer)
    }
}

impl<C: Clusterer> PqKnn<C> {
    /// Create an untrained model with a custom clustering algorithm.
    ///
    /// # Errors
    ///
    /// Returns [`PqError::InvalidConfiguration`] if the configuration is invalid.
    pub fn with_clusterer(config: PqKnnConfig, clusterer: C) -> Result<Self> {
        config.validate()?;
        Ok(Self { config, clusterer, trained: None })
    }

    /// Get the configuration.
    #[must_use]
    pub fn config(&self) -> &PqKnnConfig {
        &self.config
    }

    /// Whether [`train`](Self::train) has completed successfully.
    #[must_use]
    pub fn is_trained(&self) -> bool {
        self.trained.is_some()
    }

    /// Dimension `D` of the training vectors, once trained.
    #[must_use]
    pub fn dimension(&self) -> Option<usize> {
        self.trained.as_ref().map(|t| t.layout.dimension())
    }

    /// Number of compressed training records (0 before training).
    #[must_use]
    pub fn num_records(&self) -> usize {
        self.trained.as_ref().map_or(0, TrainedModel::num_records)
    }

    /// The learned codebooks, one per sub-vector position (empty before training).
    #[must_use]
    pub fn codebooks(&self) -> &[Codebook] {
        self.trained.as_ref().map_or(&[], |t| t.codebooks.as_slice())
    }

    /// Codes of one training record.
    #[must_use]
    pub fn codes(&self, record: usize) -> Option<&[u16]> {
        self.trained.as_ref()?.record_codes(record)
    }

    /// Training labels, aligned with record indices (empty before training).
    #[must_use]
    pub fn labels(&self) -> &[Label] {
        self.trained.as_ref().map_or(&[], |t| t.labels.as_slice())
    }

    /// Compress a labelled training set into codebooks and codes.
    ///
    /// Replaces any previously trained state. If training fails the previous
    /// state is kept.
    ///
    /// # Errors
    ///
    /// - [`PqError::LengthMismatch`] if `vectors` and `labels` differ in length
    /// - [`PqError::EmptyTrainingSet`] if there are no vectors
    /// - [`PqError::InvalidConfiguration`] if `n` exceeds the vector dimension
    /// - [`PqError::TrainingDimensionMismatch`] if a vector's length differs from
    ///   the first's
    /// - [`PqError::Clustering`] if the clusterer fails or returns malformed output;
    ///   the default k-means clusterer fails when there are fewer vectors than `k`
    pub fn train<V>(&mut self, vectors: &[V], labels: &[Label]) -> Result<()>
    where
        V: AsRef<[u32]>,
    {
        if vectors.len() != labels.len() {
            return Err(PqError::LengthMismatch { vectors: vectors.len(), labels: labels.len() });
        }
        if vectors.is_empty() {
            return Err(PqError::EmptyTrainingSet);
        }

        let dimension = vectors[0].as_ref().len();
        let layout = SubvectorLayout::new(dimension, self.config.num_subvectors)?;
        let k = self.config.num_clusters();

        let started = Instant::now();
        info!(
            records = vectors.len(),
            dimension,
            num_subvectors = layout.num_subvectors(),
            num_clusters = k,
            "training PQ-kNN model"
        );

        let by_position = group_by_position(vectors, &layout)?;

        let trained_positions: Vec<(Codebook, Vec<u16>)> = if self.config.parallel {
            by_position
                .par_iter()
                .enumerate()
                .map(|(position, samples)| self.train_position(position, samples, &layout))
                .collect::<Result<_>>()?
        } else {
            by_position
                .iter()
                .enumerate()
                .map(|(position, samples)| self.train_position(position, samples, &layout))
                .collect::<Result<_>>()?
        };

        let n = layout.num_subvectors();
        let mut codes = vec![0u16; vectors.len() * n];
        let mut codebooks = Vec::with_capacity(n);
        for (position, (codebook, position_codes)) in trained_positions.into_iter().enumerate() {
            for (record, code) in position_codes.into_iter().enumerate() {
                codes[record * n + position] = code;
            }
            codebooks.push(codebook);
        }

        self.trained = Some(TrainedModel { layout, codebooks, codes, labels: labels.to_vec() });

        info!(
            records = vectors.len(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "PQ-kNN training complete"
        );
        Ok(())
    }

    /// Cluster one position's samples and encode every sample against the result.
    fn train_position(
        &self,
        position: usize,
        samples: &[f32],
        layout: &SubvectorLayout,
    ) -> Result<(Codebook, Vec<u16>)> {
        let k = self.config.num_clusters();
        let subvector_len = layout.subvector_len();
        let sample_refs: Vec<&[f32]> = samples.chunks_exact(subvector_len).collect();

        let centroids =
            self.clusterer.fit(&sample_refs, k, self.config.position_seed(position))?;

        if centroids.len() != k {
            return Err(PqError::Clustering(format!(
                "position {position}: expected {k} centroids, got {}",
                centroids.len()
            )));
        }
        if let Some(bad) = centroids.iter().find(|c| c.len() != subvector_len) {
            return Err(PqError::Clustering(format!(
                "position {position}: centroid has {} dimensions, expected {subvector_len}",
                bad.len()
            )));
        }

        let codes = sample_refs
            .iter()
            .map(|sample| {
                let code = self.clusterer.predict(sample, &centroids)?;
                if code >= k {
                    return Err(PqError::Clustering(format!(
                        "position {position}: code {code} out of range for {k} centroids"
                    )));
                }
                u16::try_from(code).map_err(|_| {
                    PqError::Clustering(format!("position {position}: code {code} exceeds u16"))
                })
            })
            .collect::<Result<Vec<u16>>>()?;

        debug!(position, samples = sample_refs.len(), "trained codebook");
        Ok((Codebook::new(centroids), codes))
    }

    /// Build the `k × n` distance table for `query`.
    ///
    /// # Errors
    ///
    /// - [`PqError::NotTrained`] before training
    /// - [`PqError::DimensionMismatch`] if `query` does not have dimension `D`
    pub fn distance_table(&self, query: &[u32]) -> Result<DistanceTable> {
        self.trained()?.distance_table(query)
    }

    /// The `m` training records nearest to `query` by approximate distance,
    /// ascending. Equal distances are ordered by record index.
    ///
    /// # Errors
    ///
    /// - [`PqError::NotTrained`] before training
    /// - [`PqError::InvalidNeighborCount`] if `m` is not in `[1, num_records]`
    /// - [`PqError::DimensionMismatch`] if `query` does not have dimension `D`
    pub fn neighbors(&self, query: &[u32], m: usize) -> Result<Vec<Neighbor>> {
        let model = self.trained()?;
        let available = model.num_records();
        if m == 0 || m > available {
            return Err(PqError::InvalidNeighborCount { requested: m, available });
        }

        let table = model.distance_table(query)?;
        let n = model.layout.num_subvectors();
        let distances = model
            .codes
            .chunks_exact(n)
            .enumerate()
            .map(|(record, codes)| (record, table.approximate_distance(codes)));

        let neighbors = select::select_nearest(distances, m)
            .into_iter()
            .map(|(index, distance)| Neighbor { index, label: model.labels[index], distance })
            .collect();

        Ok(neighbors)
    }

    /// Classify `query` by majority vote among its `m` nearest records.
    ///
    /// Vote ties resolve to the smallest label.
    ///
    /// # Errors
    ///
    /// Same as [`neighbors`](Self::neighbors).
    pub fn predict(&self, query: &[u32], m: usize) -> Result<Label> {
        self.classify(query, m).map(|(label, _)| label)
    }

    /// Classify `query` and also return the neighbors that voted, nearest first.
    ///
    /// # Errors
    ///
    /// Same as [`neighbors`](Self::neighbors).
    pub fn classify(&self, query: &[u32], m: usize) -> Result<(Label, Vec<Neighbor>)> {
        let neighbors = self.neighbors(query, m)?;
        trace!(m, nearest_distance = neighbors.first().map(|n| n.distance), "predicted");

        let label = majority_label(neighbors.iter().map(|n| n.label)).ok_or_else(|| {
            PqError::InvalidNeighborCount { requested: m, available: self.num_records() }
        })?;
        Ok((label, neighbors))
    }

    /// Classify many queries, in parallel when the configuration allows.
    ///
    /// # Errors
    ///
    /// Fails on the first query that [`predict`](Self::predict) rejects.
    pub fn predict_batch<V>(&self, queries: &[V], m: usize) -> Result<Vec<Label>>
    where
        V: AsRef<[u32]> + Sync,
    {
        if self.config.parallel {
            queries.par_iter().map(|q| self.predict(q.as_ref(), m)).collect()
        } else {
            queries.iter().map(|q| self.predict(q.as_ref(), m)).collect()
        }
    }

    /// Classify `queries` and compare against `labels`.
    ///
    /// # Errors
    ///
    /// - [`PqError::LengthMismatch`] if `queries` and `labels` differ in length
    /// - anything [`predict_batch`](Self::predict_batch) returns
    pub fn evaluate<V>(&self, queries: &[V], labels: &[Label], m: usize) -> Result<Evaluation>
    where
        V: AsRef<[u32]> + Sync,
    {
        if queries.len() != labels.len() {
            return Err(PqError::LengthMismatch { vectors: queries.len(), labels: labels.len() });
        }

        let predictions = self.predict_batch(queries, m)?;
        let correct = predictions.iter().zip(labels.iter()).filter(|(p, l)| p == l).count();

        Ok(Evaluation { total: labels.len(), correct })
    }

    /// Approximate reconstruction of a training record from its codes.
    ///
    /// Concatenates the record's centroids and drops the zero-padding tail, so
    /// the result has dimension `D`.
    #[must_use]
    pub fn reconstruct(&self, record: usize) -> Option<Vec<f32>> {
        let model = self.trained.as_ref()?;
        let codes = model.record_codes(record)?;

        let layout = &model.layout;
        let mut vector = Vec::with_capacity(layout.num_subvectors() * layout.subvector_len());
        for (codebook, &code) in model.codebooks.iter().zip(codes.iter()) {
            vector.extend_from_slice(codebook.centroid(usize::from(code))?);
        }
        vector.truncate(layout.dimension());
        Some(vector)
    }

    /// Bytes held by the compressed representation: codes, codebooks and labels.
    #[must_use]
    pub fn compressed_size_bytes(&self) -> usize {
        self.trained.as_ref().map_or(0, |t| {
            let codebook_floats: usize =
                t.codebooks.iter().flat_map(|c| c.centroids().iter()).map(Vec::len).sum();
            t.codes.len() * std::mem::size_of::<u16>()
                + codebook_floats * std::mem::size_of::<f32>()
                + t.labels.len() * std::mem::size_of::<Label>()
        })
    }

    /// Raw training-set size (`u32` features plus labels) divided by
    /// [`compressed_size_bytes`](Self::compressed_size_bytes).
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn compression_ratio(&self) -> Option<f64> {
        let model = self.trained.as_ref()?;
        let raw = model.num_records()
            * (model.layout.dimension() * std::mem::size_of::<u32>()
                + std::mem::size_of::<Label>());
        Some(raw as f64 / self.compressed_size_bytes() as f64)
    }

    fn trained(&self) -> Result<&TrainedModel> {
        self.trained.as_ref().ok_or(PqError::NotTrained)
    }
}

/// Split every vector and gather the sub-vectors position by position.
///
/// Returns one flat buffer per position holding `len(vectors)` consecutive
/// sub-vectors of `layout.subvector_len()` values.
fn group_by_position<V>(vectors: &[V], layout: &SubvectorLayout) -> Result<Vec<Vec<f32>>>
where
    V: AsRef<[u32]>,
{
    let capacity = vectors.len() * layout.subvector_len();
    let mut by_position: Vec<Vec<f32>> =
        (0..layout.num_subvectors()).map(|_| Vec::with_capacity(capacity)).collect();

    for (record, vector) in vectors.iter().enumerate() {
        let vector = vector.as_ref();
        if vector.len() != layout.dimension() {
            return Err(PqError::TrainingDimensionMismatch {
                record,
                expected: layout.dimension(),
                actual: vector.len(),
            });
        }

        for (buffer, block) in by_position.iter_mut().zip(layout.split(vector)?) {
            buffer.extend_from_slice(&block);
        }
    }

    Ok(by_position)
}
