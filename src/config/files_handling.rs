
// imports
use crate::cooccurrence::{CoocEdge, Corpus, Document};
use crate::error::{Error, Result};
use crate::ppmi::{DenseMatrix, PpmiEdge, WeightedEdge};
use crate::tokenizer::{StopWords, Vocabulary};

use flate2::{Compression, read::GzDecoder, write::GzEncoder};
use log::debug;
use ndarray_npy::write_npy;
use std::fs::{self, File};
use std::io::{self, BufRead, BufReader, BufWriter, Read, Write};
use std::path::Path;


pub fn read_input<R: ReadFile>(file_path: &Path) -> Result<R> {
    R::read_file(file_path)
}

pub fn save_output<S: SaveFile>(file_path: &Path, item: &S) -> Result<()> {

    // create output folder
    if let Some(parent) = file_path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }

    item.save_file(file_path)
}

pub trait ReadFile: Sized {
    fn read_file(file_path: &Path) -> Result<Self>;
}

pub trait SaveFile {
    fn save_file(&self, file_path: &Path) -> Result<()>;
}


fn is_gz(file_path: &Path) -> bool {
    file_path.extension().map_or(false, |ext| ext == "gz")
}

// a buffered reader, gzip-decoded when the path ends with .gz
fn open_input(what: &'static str, file_path: &Path) -> Result<Box<dyn BufRead>> {
    let f = File::open(file_path).map_err(|e| Error::missing(what, file_path, e))?;
    if is_gz(file_path) {
        Ok(Box::new(BufReader::new(GzDecoder::new(BufReader::new(f)))))
    } else {
        Ok(Box::new(BufReader::new(f)))
    }
}

enum OutputFile {
    Plain(BufWriter<File>),
    Gz(GzEncoder<BufWriter<File>>),
}

impl OutputFile {

    fn create(file_path: &Path) -> Result<OutputFile> {
        let f = BufWriter::new(File::create(file_path)?);
        if is_gz(file_path) {
            Ok(OutputFile::Gz(GzEncoder::new(f, Compression::default())))
        } else {
            Ok(OutputFile::Plain(f))
        }
    }

    fn finish(self) -> io::Result<()> {
        match self {
            OutputFile::Plain(mut f) => f.flush(),
            OutputFile::Gz(encoder) => encoder.finish()?.flush(),
        }
    }
}

impl Write for OutputFile {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        match self {
            OutputFile::Plain(f) => f.write(buf),
            OutputFile::Gz(f) => f.write(buf),
        }
    }
    fn flush(&mut self) -> io::Result<()> {
        match self {
            OutputFile::Plain(f) => f.flush(),
            OutputFile::Gz(f) => f.flush(),
        }
    }
}

// the header is written even when there are no records
fn write_records<T: serde::Serialize>(file_path: &Path, header: &[&str], records: &[T]) -> Result<()> {
    let mut wrt = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(OutputFile::create(file_path)?);
    wrt.write_record(header)?;
    for record in records {
        wrt.serialize(record)?;
    }
    let out = wrt.into_inner().map_err(|e| Error::IO(e.into_error()))?;
    out.finish()?;
    Ok(())
}


impl ReadFile for StopWords {
    // one word per line, blank lines ignored
    fn read_file(file_path: &Path) -> Result<Self> {
        let reader = open_input("stopword list", file_path)?;
        let mut stopwords = StopWords::default();
        for line in reader.lines() {
            let line = line?;
            let w = line.trim();
            if !w.is_empty() {
                stopwords.0.insert(w.to_string());
            }
        }
        Ok(stopwords)
    }
}

impl ReadFile for Vocabulary {
    // csv with a header row, the word is the first column
    fn read_file(file_path: &Path) -> Result<Self> {
        let reader = open_input("vocabulary file", file_path)?;
        let mut rdr = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .from_reader(reader);

        let mut vocabulary = Vocabulary::default();
        for record in rdr.records() {
            let record = record?;
            if let Some(w) = record.get(0).map(str::trim) {
                if !w.is_empty() {
                    vocabulary.0.insert(w.to_string());
                }
            }
        }
        Ok(vocabulary)
    }
}

impl ReadFile for Corpus {
    // every *.txt directly inside the directory, in file name order
    fn read_file(file_path: &Path) -> Result<Self> {
        let entries = fs::read_dir(file_path).map_err(|e| Error::missing("corpus directory", file_path, e))?;

        let mut paths = Vec::new();
        for entry in entries {
            let path = entry?.path();
            if path.is_file() && path.extension().map_or(false, |ext| ext == "txt") {
                paths.push(path);
            }
        }
        paths.sort();

        let mut documents = Vec::with_capacity(paths.len());
        for path in paths {
            let mut bytes = Vec::new();
            File::open(&path)
                .map_err(|e| Error::missing("corpus document", &path, e))?
                .read_to_end(&mut bytes)?;

            // undecodable bytes are dropped
            let text: String = bytes.utf8_chunks().map(|chunk| chunk.valid()).collect();
            debug!("read {:?}, {} chars", path, text.chars().count());
            documents.push(Document { path, text });
        }

        Ok(Corpus { documents })
    }
}

impl ReadFile for Vec<WeightedEdge> {
    // best effort: short rows, empty words and unusable counts are skipped
    fn read_file(file_path: &Path) -> Result<Self> {
        let reader = open_input("co-occurrence edge list", file_path)?;
        let mut rdr = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .from_reader(reader);

        let mut edges = Vec::new();
        let mut skipped = 0usize;
        for record in rdr.records() {
            let record = match record {
                Ok(record) => record,
                Err(_) => { skipped += 1; continue }
            };
            match parse_edge(&record) {
                Some(edge) => edges.push(edge),
                None => skipped += 1,
            }
        }

        if skipped > 0 {
            debug!("skipped {} malformed rows in {:?}", skipped, file_path);
        }
        Ok(edges)
    }
}

fn parse_edge(record: &csv::StringRecord) -> Option<WeightedEdge> {
    if record.len() < 3 {
        return None;
    }
    let w1 = record.get(0)?.trim();
    let w2 = record.get(1)?.trim();
    let weight: f64 = record.get(2)?.trim().parse().ok()?;
    if w1.is_empty() || w2.is_empty() || !weight.is_finite() || weight <= 0.0 {
        return None;
    }
    Some(WeightedEdge { word1: w1.to_string(), word2: w2.to_string(), weight })
}


impl SaveFile for Vec<CoocEdge> {
    fn save_file(&self, file_path: &Path) -> Result<()> {
        write_records(file_path, &["word1", "word2", "count"], self)
    }
}

impl SaveFile for Vec<PpmiEdge> {
    fn save_file(&self, file_path: &Path) -> Result<()> {
        write_records(file_path, &["word1", "word2", "ppmi"], self)
    }
}

impl SaveFile for DenseMatrix {
    // `file_path` is a directory: ppmi.npy plus words.json for the row order
    fn save_file(&self, file_path: &Path) -> Result<()> {
        fs::create_dir_all(file_path)?;
        write_npy(file_path.join("ppmi.npy"), &self.values)?;

        let mut f = BufWriter::new(File::create(file_path.join("words.json"))?);
        serde_json::to_writer(&mut f, &self.words)?;
        f.flush()?;
        Ok(())
    }
}
