//! Feature-table persistence tests.
//!
//! The table is a per-corpus artifact that travels with a trained model:
//! a snapshot written during training must restore to an identical table at
//! inference time, or every one-hot position downstream shifts.

use anaphora::{
    AnnotatedDocument, CorefAnnotations, FeatureTable, MentionCandidate, ParsedDocument, Token,
};

fn corpus() -> Vec<AnnotatedDocument> {
    let doc = ParsedDocument::new(vec![
        Token::new("Maria", "NNP")
            .with_morph("Number=Sing")
            .with_ent_type("PERSON")
            .with_dep("nsubj", 1),
        Token::new("paints", "VBZ").with_morph("Tense=Pres"),
        Token::new(".", ".").with_dep("punct", 1),
        Token::new("She", "PRP")
            .with_morph("Case=Nom|Gender=Fem")
            .with_dep("nsubj", 4),
        Token::new("smiles", "VBZ").with_morph("Tense=Pres"),
        Token::new(".", ".").with_dep("punct", 4),
    ])
    .unwrap();

    let mut coref = CorefAnnotations::new(doc.len());
    coref.mark_independent_noun(0);
    coref.mark_potential_anaphor(3);
    coref.add_candidate(3, MentionCandidate::new(vec![0]));
    vec![AnnotatedDocument::new(doc, coref).unwrap()]
}

#[test]
fn test_save_load_round_trip() {
    let corpus = corpus();
    let table = FeatureTable::build(&corpus).unwrap();

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("feature_table.json");
    table.save(&path).unwrap();

    let restored = FeatureTable::load(&path).unwrap();
    assert_eq!(restored, table);
    assert_eq!(restored.len(), table.len());

    // The restored table encodes identically.
    let doc = &corpus[0].doc;
    assert_eq!(restored.token_features(doc, 3), table.token_features(doc, 3));
}

#[test]
fn test_load_missing_file_is_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let result = FeatureTable::load(dir.path().join("absent.json"));
    assert!(matches!(result, Err(anaphora::Error::Io(_))));
}

#[test]
fn test_load_garbage_is_serialization_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("garbage.json");
    std::fs::write(&path, "not json at all").unwrap();
    let result = FeatureTable::load(&path);
    assert!(matches!(result, Err(anaphora::Error::Serialization(_))));
}
