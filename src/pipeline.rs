
// imports
use crate::config::Params;
use crate::cooccurrence::Counts;
use crate::error::Result;
use crate::ppmi::{Ppmi, WeightedEdge};

use clap::ValueEnum;
use log::info;
use std::time::Instant;


#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum Stage {
    /// Count co-occurrences, then compute PPMI from them
    All,
    /// Only count co-occurrences
    Cooccur,
    /// Only compute PPMI, reading the saved co-occurrence edge list
    Ppmi,
}

pub struct Pipeline {}

impl Pipeline {

    // runs the requested stages in order. When both run, the co-occurrence edges are
    // handed to the PPMI stage in memory; the intermediate file is written either way.

    pub fn run(params: &Params, stage: Stage) -> Result<()> {

        info!("{}", params);

        let mut counted: Option<Vec<WeightedEdge>> = None;

        if stage != Stage::Ppmi {
            let timer = Instant::now();
            info!("starting co-occurrence counting...");
            let edges = Counts::run(params)?;
            info!("finished co-occurrence counting, took {} seconds ...", timer.elapsed().as_secs());
            counted = Some(edges.into_iter().map(WeightedEdge::from).collect());
        }

        if stage != Stage::Cooccur {
            let timer = Instant::now();
            info!("starting PPMI part...");
            Ppmi::run(params, counted)?;
            info!("finished PPMI, took {} seconds ...", timer.elapsed().as_secs());
        }

        Ok(())
    }
}


#[cfg(test)]
mod tests {

    use super::*;
    use std::fs;
    use std::path::Path;
    use tempfile::tempdir;

    fn setup(dir: &Path) -> Params {
        let corpus_dir = dir.join("corpus");
        fs::create_dir(&corpus_dir).unwrap();
        fs::write(corpus_dir.join("01.txt"), "语言 文化 语言 文化\n历史 社会 历史 社会").unwrap();
        fs::write(corpus_dir.join("02.txt"), "的 语言 文化").unwrap();
        fs::write(dir.join("stopwords_list.txt"), "的\n").unwrap();
        fs::write(dir.join("S3_HighFrequencyWords.csv"), "word,freq\n语言,3\n文化,3\n历史,2\n社会,2\n").unwrap();

        let path = |name: &str| dir.join(name).display().to_string();
        let mut params = Params::new(
            &path("corpus"),
            &path("S3_HighFrequencyWords.csv"),
            &path("stopwords_list.txt"),
            &path("S4_Cooccurrence_Matrix.csv"),
            &path("S6_PPMI_Matrix.csv"),
        );
        params.pre_segmented = true;
        params.window_size = 2;
        params.min_count = 1;
        params
    }

    #[test]
    fn file_handoff_matches_in_memory_handoff() {
        let dir = tempdir().unwrap();
        let params = setup(dir.path());

        Pipeline::run(&params, Stage::All).unwrap();
        let in_memory = fs::read_to_string(&params.ppmi_output_path).unwrap();

        fs::remove_file(&params.ppmi_output_path).unwrap();
        Pipeline::run(&params, Stage::Ppmi).unwrap();
        let from_file = fs::read_to_string(&params.ppmi_output_path).unwrap();

        assert_eq!(in_memory, from_file);
        assert!(in_memory.starts_with("word1,word2,ppmi\n"));
    }

    #[test]
    fn cooccur_stage_stops_early() {
        let dir = tempdir().unwrap();
        let params = setup(dir.path());

        Pipeline::run(&params, Stage::Cooccur).unwrap();
        assert!(Path::new(&params.output_path).exists());
        assert!(!Path::new(&params.ppmi_output_path).exists());
    }

    #[test]
    fn ppmi_stage_needs_the_edge_list() {
        let dir = tempdir().unwrap();
        let params = setup(dir.path());
        assert!(Pipeline::run(&params, Stage::Ppmi).is_err());
    }
}
