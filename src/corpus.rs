use include_dir::{include_dir, Dir};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use serde::Deserialize;

use crate::error::CorpusError;

static CORPUS_DIR: Dir = include_dir!("$CARGO_MANIFEST_DIR/src/corpus");

/// Corpus shipped with the binary.
pub const DEFAULT_CORPUS: &str = "quotes";

/// A named list of passages.
#[derive(Deserialize, Clone, Debug)]
pub struct Corpus {
    pub name: String,
    pub passages: Vec<String>,
}

impl Corpus {
    pub fn load(name: &str) -> Result<Self, CorpusError> {
        let file_name = format!("{name}.json");
        let file = CORPUS_DIR
            .get_file(&file_name)
            .ok_or_else(|| CorpusError::NotFound(file_name.clone()))?;

        let contents = file.contents_utf8().ok_or_else(|| CorpusError::Invalid {
            name: name.to_string(),
            reason: "not utf-8".to_string(),
        })?;

        let corpus: Corpus =
            serde_json::from_str(contents).map_err(|e| CorpusError::Invalid {
                name: name.to_string(),
                reason: e.to_string(),
            })?;

        if corpus.passages.iter().all(|p| p.is_empty()) {
            return Err(CorpusError::Empty(name.to_string()));
        }

        Ok(corpus)
    }

    pub fn builtin() -> Result<Self, CorpusError> {
        Self::load(DEFAULT_CORPUS)
    }
}

/// Hands out the passage for each new session.
pub trait PassageProvider {
    fn select_passage(&mut self) -> String;
}

/// Uniformly random pick from a corpus.
#[derive(Debug)]
pub struct RandomPassages {
    passages: Vec<String>,
    rng: StdRng,
}

impl RandomPassages {
    pub fn new(corpus: Corpus) -> Self {
        Self::with_rng(corpus, StdRng::from_entropy())
    }

    pub fn seeded(corpus: Corpus, seed: u64) -> Self {
        Self::with_rng(corpus, StdRng::seed_from_u64(seed))
    }

    fn with_rng(corpus: Corpus, rng: StdRng) -> Self {
        let passages = corpus
            .passages
            .into_iter()
            .filter(|p| !p.is_empty())
            .collect();
        Self { passages, rng }
    }

    pub fn passages(&self) -> &[String] {
        &self.passages
    }
}

impl PassageProvider for RandomPassages {
    fn select_passage(&mut self) -> String {
        self.passages
            .choose(&mut self.rng)
            .cloned()
            .unwrap_or_default()
    }
}

/// Always the same passage (`--prompt`).
#[derive(Debug, Clone)]
pub struct FixedPassage(pub String);

impl PassageProvider for FixedPassage {
    fn select_passage(&mut self) -> String {
        self.0.clone()
    }
}
