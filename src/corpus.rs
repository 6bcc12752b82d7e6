//! Line-oriented language corpora and the train/evaluate harness.
//!
//! A corpus is a directory of UTF-8 files named `<Language>.txt`, one sample per line. The
//! first `train_lines` lines of each file build that language's profile; the following
//! `valid_lines` lines are classified against all profiles to measure accuracy. Lines are
//! split on `\n` only, so CRLF files keep their `\r` as a final character.
//!
//! Both passes run one rayon task per language. Each task owns its vector and its projection
//! cache; only the read-only [`Builder`] and [`Profiles`] are shared.

use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::PathBuf;
use std::time::{Duration, Instant};

use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::builder::Builder;
use crate::cache::CachedVectorizer;
use crate::classify::Profiles;
use crate::config::BuilderConfig;
use crate::error::Error;

/// Errors from the corpus harness.
#[derive(Debug, thiserror::Error)]
pub enum CorpusError {
    /// No data file for a requested language.
    #[error("no corpus file for language {language:?} (looked for {path})")]
    MissingLanguage {
        /// Requested language.
        language: String,
        /// Path that was tried.
        path: PathBuf,
    },
    /// Reading a corpus file failed.
    #[error("failed to read {path}")]
    Io {
        /// File being read.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: io::Error,
    },
    /// A vector operation failed.
    #[error(transparent)]
    Vector(#[from] Error),
}

/// A directory of `<Language>.txt` files.
#[derive(Debug, Clone)]
pub struct Corpus {
    dir: PathBuf,
}

impl Corpus {
    /// Open a corpus rooted at `dir`. Files are only touched when read.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Data file for `language`.
    pub fn path(&self, language: &str) -> PathBuf {
        self.dir.join(format!("{language}.txt"))
    }

    /// Read lines `start..start + count` of `language`.
    ///
    /// Only the trailing `\n` is removed; a `\r` before it is kept as text. Returns fewer
    /// lines if the file is shorter.
    pub fn lines(
        &self,
        language: &str,
        start: usize,
        count: usize,
    ) -> Result<Vec<String>, CorpusError> {
        let path = self.path(language);
        let file = File::open(&path).map_err(|e| match e.kind() {
            io::ErrorKind::NotFound => CorpusError::MissingLanguage {
                language: language.to_string(),
                path: path.clone(),
            },
            _ => CorpusError::Io {
                path: path.clone(),
                source: e,
            },
        })?;
        let mut reader = BufReader::new(file);
        let mut lines = Vec::with_capacity(count.min(1 << 16));
        let mut buf = String::new();
        let mut index = 0;
        while lines.len() < count {
            buf.clear();
            let n = reader
                .read_line(&mut buf)
                .map_err(|source| CorpusError::Io {
                    path: path.clone(),
                    source,
                })?;
            if n == 0 {
                break;
            }
            if index >= start {
                if buf.ends_with('\n') {
                    buf.pop();
                }
                lines.push(buf.clone());
            }
            index += 1;
        }
        if lines.len() < count {
            warn!(
                language,
                requested = count,
                got = lines.len(),
                "corpus shorter than requested"
            );
        }
        Ok(lines)
    }
}

/// Harness configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EvalConfig {
    /// Projection parameters.
    pub builder: BuilderConfig,
    /// Languages to train and evaluate, by file stem.
    pub languages: Vec<String>,
    /// Lines per language used to build profiles.
    pub train_lines: usize,
    /// Lines per language classified after the training lines.
    pub valid_lines: usize,
}

impl Default for EvalConfig {
    fn default() -> Self {
        Self {
            builder: BuilderConfig::default(),
            languages: ["English", "French", "German", "Italian", "Latin", "Vietnamese"]
                .into_iter()
                .map(String::from)
                .collect(),
            train_lines: 1000,
            valid_lines: 1000,
        }
    }
}

/// Throughput of one training pass over a language.
#[derive(Debug, Clone)]
pub struct TrainStats {
    /// Language.
    pub language: String,
    /// Lines folded into the profile.
    pub lines: usize,
    /// Characters processed.
    pub chars: usize,
    /// Wall time.
    pub elapsed: Duration,
}

impl TrainStats {
    /// Characters per second.
    pub fn chars_per_sec(&self) -> f64 {
        rate(self.chars, self.elapsed)
    }
}

/// A validation line assigned to the wrong language.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Misclassified {
    /// The line.
    pub text: String,
    /// The label chosen instead, if any.
    pub predicted: Option<String>,
}

/// Classification results for one language.
#[derive(Debug, Clone)]
pub struct LanguageReport {
    /// True language of the lines.
    pub language: String,
    /// Lines classified.
    pub lines: usize,
    /// Lines classified correctly.
    pub correct: usize,
    /// Characters processed.
    pub chars: usize,
    /// Wall time.
    pub elapsed: Duration,
    /// Every wrongly classified line.
    pub failures: Vec<Misclassified>,
}

impl LanguageReport {
    /// Fraction of lines classified correctly (0 when no lines).
    pub fn accuracy(&self) -> f64 {
        if self.lines == 0 {
            0.0
        } else {
            self.correct as f64 / self.lines as f64
        }
    }

    /// Characters per second.
    pub fn chars_per_sec(&self) -> f64 {
        rate(self.chars, self.elapsed)
    }
}

fn rate(chars: usize, elapsed: Duration) -> f64 {
    let secs = elapsed.as_secs_f64();
    if secs == 0.0 {
        0.0
    } else {
        chars as f64 / secs
    }
}

/// Build one profile per language from its first `train_lines` lines, in parallel.
pub fn train_profiles(
    builder: &Builder,
    corpus: &Corpus,
    languages: &[String],
    train_lines: usize,
) -> Result<(Profiles, Vec<TrainStats>), CorpusError> {
    let built = languages
        .par_iter()
        .map(|language| -> Result<_, CorpusError> {
            let lines = corpus.lines(language, 0, train_lines)?;
            let start = Instant::now();
            let mut vectorizer = CachedVectorizer::new(builder);
            let mut profile = builder.zeros();
            let mut chars = 0;
            for line in &lines {
                profile.merge(&vectorizer.build(line))?;
                chars += line.chars().count();
            }
            let stats = TrainStats {
                language: language.clone(),
                lines: lines.len(),
                chars,
                elapsed: start.elapsed(),
            };
            info!(
                language = %language,
                lines = stats.lines,
                chars_per_sec = stats.chars_per_sec(),
                "built profile"
            );
            Ok((profile, stats))
        })
        .collect::<Result<Vec<_>, _>>()?;

    let mut profiles = Profiles::new(builder.clone());
    let mut stats = Vec::with_capacity(built.len());
    for (profile, s) in built {
        profiles.insert(&s.language, &profile)?;
        stats.push(s);
    }
    Ok((profiles, stats))
}

/// Classify lines `start..start + count` of each language against `profiles`, in parallel.
pub fn evaluate(
    profiles: &Profiles,
    corpus: &Corpus,
    languages: &[String],
    start: usize,
    count: usize,
) -> Result<Vec<LanguageReport>, CorpusError> {
    languages
        .par_iter()
        .map(|language| -> Result<LanguageReport, CorpusError> {
            let lines = corpus.lines(language, start, count)?;
            let t0 = Instant::now();
            let mut vectorizer = CachedVectorizer::new(profiles.builder());
            let mut report = LanguageReport {
                language: language.clone(),
                lines: lines.len(),
                correct: 0,
                chars: 0,
                elapsed: Duration::ZERO,
                failures: Vec::new(),
            };
            for line in lines {
                report.chars += line.chars().count();
                let predicted = profiles.classify_vector(&vectorizer.build(&line))?;
                if predicted == Some(language.as_str()) {
                    report.correct += 1;
                } else {
                    report.failures.push(Misclassified {
                        predicted: predicted.map(String::from),
                        text: line,
                    });
                }
            }
            report.elapsed = t0.elapsed();
            info!(
                language = %language,
                accuracy = report.accuracy(),
                chars_per_sec = report.chars_per_sec(),
                "classified"
            );
            Ok(report)
        })
        .collect()
}

/// Results of a full train-then-evaluate run.
#[derive(Debug)]
pub struct Evaluation {
    /// Trained profiles.
    pub profiles: Profiles,
    /// Per-language training throughput.
    pub training: Vec<TrainStats>,
    /// Per-language classification results.
    pub reports: Vec<LanguageReport>,
}

impl Evaluation {
    /// Accuracy over all validation lines.
    pub fn overall_accuracy(&self) -> f64 {
        let lines: usize = self.reports.iter().map(|r| r.lines).sum();
        let correct: usize = self.reports.iter().map(|r| r.correct).sum();
        if lines == 0 {
            0.0
        } else {
            correct as f64 / lines as f64
        }
    }
}

/// Train on the head of each file, then classify the lines that follow.
pub fn run(config: &EvalConfig, corpus: &Corpus) -> Result<Evaluation, CorpusError> {
    let builder = Builder::new(config.builder)?;
    let (profiles, training) =
        train_profiles(&builder, corpus, &config.languages, config.train_lines)?;
    let reports = evaluate(
        &profiles,
        corpus,
        &config.languages,
        config.train_lines,
        config.valid_lines,
    )?;
    Ok(Evaluation {
        profiles,
        training,
        reports,
    })
}
