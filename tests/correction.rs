use std::fs;

use kgram_speller::{
    edits1, Correction, Corrector, MarkovGraph, ModelTrainer, Segmenter, TextCorrector,
    TrainingConfig, WordBag,
};
use tempfile::TempDir;

const CORPUS: &str = "\
The quick brown fox jumps over the lazy dog. The dog sleeps while the fox \
runs through the quiet forest. Every morning the brown fox returns to the \
river to drink, and the lazy dog watches the water from the bank.";

fn train(orders: Vec<usize>) -> (MarkovGraph, WordBag) {
    let mut trainer = ModelTrainer::new(&TrainingConfig {
        orders,
        ..TrainingConfig::default()
    })
    .unwrap();
    trainer.add_source(CORPUS.as_bytes()).unwrap();
    trainer.into_model()
}

#[test]
fn corrects_text_from_a_small_corpus() {
    let (graph, bag) = train(vec![3]);
    let mut checker = TextCorrector::new(&graph, &bag);

    assert_eq!(checker.check_text("Teh dog"), "The dog");
    assert_eq!(checker.check_text("TEH FOX!"), "THE FOX!");
}

#[test]
fn known_words_survive_unchanged() {
    let (graph, bag) = train(vec![2, 3]);
    let mut checker = TextCorrector::new(&graph, &bag);

    let sentence = "The brown fox watches the river.";
    assert_eq!(checker.check_text(sentence), sentence);
}

#[test]
fn two_word_model() {
    let bag: WordBag = vec![("the", 1000), ("quick", 500)].into_iter().collect();
    let mut graph = MarkovGraph::new(&[3]).unwrap();
    graph.feed("the quick".as_bytes()).unwrap();

    let mut segmenter = Segmenter::new(&bag);
    assert_eq!(segmenter.segment("thequick"), vec!["the", "quick"]);

    let mut corrector = Corrector::new(&graph, &bag);
    assert_eq!(corrector.correct("teh"), "the");

    let mut checker = TextCorrector::new(&graph, &bag);
    assert_eq!(checker.check_text("TEH"), "THE");
    assert_eq!(checker.check_text("Teh"), "The");
}

#[test]
fn plausibility_gate_keeps_frequent_words() {
    // "quiet" is one edit away from the much more frequent "quit"
    let bag: WordBag = vec![("quiet", 50), ("quit", 5000)].into_iter().collect();
    let mut graph = MarkovGraph::new(&[3]).unwrap();
    graph.feed("quiet quiet quit".as_bytes()).unwrap();

    let mut corrector = Corrector::new(&graph, &bag);
    assert!(corrector.looks_like_word("quiet"));
    assert!(matches!(corrector.suggest("quiet"), Correction::Plausible { .. }));
    assert_eq!(corrector.correct("quiet"), "quiet");
}

#[test]
fn edits1_of_short_word() {
    let edits = edits1("ab");
    assert!(edits.contains("b"));
    assert!(edits.contains("a"));
    assert!(edits.contains("ba"));
}

#[test]
fn trains_on_every_file_of_a_directory() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("a.txt"), "quick quick").unwrap();
    fs::write(dir.path().join("b.txt"), "quack").unwrap();
    fs::create_dir(dir.path().join("nested")).unwrap();
    fs::write(dir.path().join("nested").join("c.txt"), "quick").unwrap();

    let mut trainer = ModelTrainer::new(&TrainingConfig::default()).unwrap();
    assert_eq!(trainer.add_directory(dir.path()).unwrap(), 2);

    let (graph, bag) = trainer.into_model();
    assert_eq!(bag.count("quick"), 2);
    assert_eq!(bag.count("quack"), 1);
    // "qui" from both quicks, "qua" from quack
    assert_eq!(graph.total("qui"), 2);
    assert_eq!(graph.total("qua"), 1);
}

#[test]
fn cache_is_scoped_to_the_corrector() {
    let (graph, bag) = train(vec![3]);

    let mut first = Corrector::new(&graph, &bag);
    first.correct("thedog");
    assert!(first.cache_len() > 0);

    let second = Corrector::new(&graph, &bag);
    assert_eq!(second.cache_len(), 0);

    first.clear_cache();
    assert_eq!(first.cache_len(), 0);
}
