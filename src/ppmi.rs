
// imports
use crate::config::{files_handling, Params};
use crate::cooccurrence::CoocEdge;
use crate::error::Result;

use log::{info, warn};
use ndarray::Array2;
use ndarray_stats::QuantileExt;
use serde::{Serialize, Serializer};
use std::collections::{BTreeSet, HashMap};
use std::path::Path;


/// A co-occurrence edge as read back from an edge list; counts may be fractional.
#[derive(Clone, Debug, PartialEq)]
pub struct WeightedEdge {
    pub word1: String,
    pub word2: String,
    pub weight: f64,
}

impl From<CoocEdge> for WeightedEdge {
    fn from(edge: CoocEdge) -> Self {
        WeightedEdge { word1: edge.word1, word2: edge.word2, weight: edge.count as f64 }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct PpmiEdge {
    pub word1: String,
    pub word2: String,
    #[serde(serialize_with = "six_decimals")]
    pub ppmi: f64,
}

fn six_decimals<S: Serializer>(value: &f64, serializer: S) -> std::result::Result<S::Ok, S::Error> {
    serializer.serialize_str(&format!("{:.6}", value))
}


/// Per-word sums of edge weights and the grand total N.
///
/// Each edge adds its weight to both endpoints but only once to N, so the
/// marginals together hold twice the mass of N.
pub struct Marginals {
    counts: HashMap<String, f64>,
    total: f64,
}

impl Marginals {

    pub fn from_edges(edges: &[WeightedEdge]) -> Marginals {
        let mut counts: HashMap<String, f64> = HashMap::new();
        let mut total = 0.0;
        for edge in edges {
            *counts.entry(edge.word1.to_owned()).or_insert(0.0) += edge.weight;
            *counts.entry(edge.word2.to_owned()).or_insert(0.0) += edge.weight;
            total += edge.weight;
        }
        Self { counts, total }
    }

    pub fn get(&self, word: &str) -> f64 {
        self.counts.get(word).copied().unwrap_or(0.0)
    }

    pub fn total(&self) -> f64 {
        self.total
    }
}


/// PPMI of every edge, dropping the ones that are not strictly positive.
/// Sorted by PPMI, descending; ties keep their input order.
pub fn compute_ppmi(edges: &[WeightedEdge]) -> Vec<PpmiEdge> {

    let marginals = Marginals::from_edges(edges);
    let total = marginals.total();
    if total == 0.0 {
        return Vec::new();
    }

    let mut ppmi_edges = Vec::new();
    for edge in edges {
        let p_ij = edge.weight / total;
        let p_i = marginals.get(&edge.word1) / total;
        let p_j = marginals.get(&edge.word2) / total;

        if p_i <= 0.0 || p_j <= 0.0 || p_ij <= 0.0 {
            continue;
        }

        let pmi = (p_ij / (p_i * p_j)).log2();
        let ppmi = pmi.max(0.0);
        if ppmi > 0.0 {
            ppmi_edges.push(PpmiEdge { word1: edge.word1.to_owned(), word2: edge.word2.to_owned(), ppmi });
        }
    }

    ppmi_edges.sort_by(|a, b| b.ppmi.total_cmp(&a.ppmi));
    ppmi_edges
}


/// Symmetric word by word PPMI matrix, rows in lexicographic word order.
pub struct DenseMatrix {
    pub words: Vec<String>,
    pub values: Array2<f32>,
}

impl DenseMatrix {

    pub fn from_edges(edges: &[PpmiEdge]) -> DenseMatrix {

        let words: Vec<String> = edges
            .iter()
            .flat_map(|e| [e.word1.to_owned(), e.word2.to_owned()])
            .collect::<BTreeSet<String>>()
            .into_iter()
            .collect();
        let t2i: HashMap<&str, usize> = words.iter().enumerate().map(|(i, w)| (w.as_str(), i)).collect();

        let mut values: Array2<f32> = Array2::zeros((words.len(), words.len()));
        for edge in edges {
            let (i, j) = (t2i[edge.word1.as_str()], t2i[edge.word2.as_str()]);
            values[[i, j]] = edge.ppmi as f32;
            values[[j, i]] = edge.ppmi as f32;
        }

        Self { words, values }
    }

    pub fn max_value(&self) -> Option<f32> {
        self.values.max().ok().copied()
    }
}


pub struct Ppmi {}

impl Ppmi {

    pub fn run(params: &Params, edges: Option<Vec<WeightedEdge>>) -> Result<Vec<PpmiEdge>> {

        // runs the transformer stage, on the builder's edges when handed over in memory,
        // otherwise on the edge list saved at `output_path`.

        let edges = match edges {
            Some(edges) => edges,
            None => {
                info!("loading co-occurrence edge list from {}", params.output_path);
                files_handling::read_input::<Vec<WeightedEdge>>(Path::new(&params.output_path))?
            }
        };
        info!("number of co-occurrence edges: {}", edges.len());

        info!("computing PPMI values...");
        let ppmi_edges = compute_ppmi(&edges);
        info!("number of PPMI edges (PPMI > 0): {}", ppmi_edges.len());
        if ppmi_edges.is_empty() {
            warn!("no edge has a positive PPMI");
        }

        info!("saving PPMI matrix to {}", params.ppmi_output_path);
        files_handling::save_output(Path::new(&params.ppmi_output_path), &ppmi_edges)?;

        if let Some(matrix_dir) = &params.matrix_output_dir {
            let matrix = DenseMatrix::from_edges(&ppmi_edges);
            info!("saving {} x {} dense matrix to {}, max PPMI {:?}",
                matrix.words.len(), matrix.words.len(), matrix_dir, matrix.max_value());
            files_handling::save_output(Path::new(matrix_dir), &matrix)?;
        }

        Ok(ppmi_edges)
    }
}
