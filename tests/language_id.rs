use std::fs;
use std::path::Path;

use langrv::corpus::{self, Corpus, EvalConfig};
use langrv::{Builder, BuilderConfig, CorpusError};

const ENGLISH: [&str; 12] = [
    "the", "house", "and", "with", "which", "there", "through", "would", "should", "thought",
    "where", "people",
];
const FRENCH: [&str; 12] = [
    "le", "maison", "avec", "une", "est", "pour", "dans", "qui", "nous", "vous", "leurs",
    "beaucoup",
];
const GERMAN: [&str; 12] = [
    "der", "die", "und", "nicht", "mit", "sich", "auch", "schon", "noch", "werden", "zwischen",
    "möchte",
];

fn sentence(words: &[&str], i: usize) -> String {
    (0..6)
        .map(|j| words[(i * 7 + j * 5 + j * j) % words.len()])
        .collect::<Vec<_>>()
        .join(" ")
}

fn write_corpus(dir: &Path, lines: usize) {
    for (name, words) in [("English", ENGLISH), ("French", FRENCH), ("German", GERMAN)] {
        let text: Vec<String> = (0..lines).map(|i| sentence(&words, i)).collect();
        fs::write(dir.join(format!("{name}.txt")), text.join("\n") + "\n").unwrap();
    }
}

fn config(train_lines: usize, valid_lines: usize) -> EvalConfig {
    EvalConfig {
        builder: BuilderConfig::new(3, 10_000, 42),
        languages: vec!["English".into(), "French".into(), "German".into()],
        train_lines,
        valid_lines,
    }
}

#[test]
fn train_then_evaluate_identifies_languages() {
    let dir = tempfile::tempdir().unwrap();
    write_corpus(dir.path(), 40);
    let corpus = Corpus::new(dir.path());

    let eval = corpus::run(&config(30, 10), &corpus).unwrap();

    assert_eq!(eval.training.len(), 3);
    assert!(eval.training.iter().all(|t| t.lines == 30 && t.chars > 0));
    assert_eq!(
        eval.reports
            .iter()
            .map(|r| r.language.as_str())
            .collect::<Vec<_>>(),
        vec!["English", "French", "German"]
    );
    for r in &eval.reports {
        assert_eq!(r.lines, 10);
        assert_eq!(r.correct + r.failures.len(), r.lines);
    }
    assert!(
        eval.overall_accuracy() >= 0.9,
        "accuracy {}",
        eval.overall_accuracy()
    );
    assert_eq!(eval.profiles.len(), 3);
}

#[test]
fn parallel_training_matches_sequential_profiles() {
    let dir = tempfile::tempdir().unwrap();
    write_corpus(dir.path(), 20);
    let corpus = Corpus::new(dir.path());
    let builder = Builder::new(BuilderConfig::new(3, 4_096, 9)).unwrap();
    let languages = config(0, 0).languages;

    let (profiles, _) = corpus::train_profiles(&builder, &corpus, &languages, 20).unwrap();

    for language in &languages {
        let mut expected = builder.zeros();
        for line in corpus.lines(language, 0, 20).unwrap() {
            langrv::merge(&mut expected, &builder.build(&line)).unwrap();
        }
        assert_eq!(profiles.get(language), Some(&expected));
    }
}

#[test]
fn short_files_yield_fewer_lines() {
    let dir = tempfile::tempdir().unwrap();
    write_corpus(dir.path(), 5);
    let corpus = Corpus::new(dir.path());
    assert_eq!(corpus.lines("French", 3, 100).unwrap().len(), 2);
    assert!(corpus.lines("French", 10, 5).unwrap().is_empty());
}

#[test]
fn missing_language_file_fails_the_run() {
    let dir = tempfile::tempdir().unwrap();
    write_corpus(dir.path(), 5);
    let mut cfg = config(3, 2);
    cfg.languages.push("Latin".into());
    let err = corpus::run(&cfg, &Corpus::new(dir.path())).unwrap_err();
    assert!(
        matches!(err, CorpusError::MissingLanguage { ref language, .. } if language == "Latin")
    );
}

#[test]
fn invalid_builder_config_fails_the_run() {
    let dir = tempfile::tempdir().unwrap();
    let mut cfg = config(1, 1);
    cfg.builder.dimension = 2;
    let err = corpus::run(&cfg, &Corpus::new(dir.path())).unwrap_err();
    assert!(matches!(err, CorpusError::Vector(_)));
}
