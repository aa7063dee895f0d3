//! Benchmarks for feature-table building and pair construction.

use anaphora::{
    AnnotatedDocument, CorefAnnotations, DocumentPairInfo, FeatureTable, MentionCandidate,
    ParsedDocument, Token,
};
use criterion::{black_box, criterion_group, criterion_main, Criterion};

/// Synthesize a document of `sentences` three-word sentences, each noun a
/// mention and each third sentence closing with a pronoun pointing back at
/// every earlier noun.
fn synthetic_doc(sentences: usize) -> AnnotatedDocument {
    let tags = ["NNP", "VBD", "NN"];
    let deps = ["nsubj", "ROOT", "dobj"];
    let mut tokens = Vec::with_capacity(sentences * 3);
    for s in 0..sentences {
        let root = s * 3 + 1;
        for w in 0..3 {
            let index = s * 3 + w;
            let mut token = Token::new(format!("w{index}"), tags[w])
                .with_vector(vec![index as f32, 1.0, 0.5, 2.0]);
            if w != 1 {
                token = token.with_dep(deps[w], root);
            }
            if w == 0 {
                token = token.with_morph("Number=Sing").with_ent_type("PERSON");
            }
            tokens.push(token);
        }
    }

    let doc = ParsedDocument::new(tokens).unwrap();
    let mut coref = CorefAnnotations::new(doc.len());
    let mut nouns = Vec::new();
    for s in 0..sentences {
        let subject = s * 3;
        let object = s * 3 + 2;
        coref.mark_independent_noun(subject);
        nouns.push(subject);
        if s % 3 == 2 {
            coref.mark_potential_anaphor(object);
            for &noun in &nouns {
                coref.add_candidate(object, MentionCandidate::new(vec![noun]));
            }
        } else {
            coref.mark_independent_noun(object);
            nouns.push(object);
        }
    }
    AnnotatedDocument::new(doc, coref).unwrap()
}

fn bench_feature_table(c: &mut Criterion) {
    let corpus: Vec<AnnotatedDocument> = (0..16).map(|_| synthetic_doc(30)).collect();
    c.bench_function("feature_table_build_16x30", |b| {
        b.iter(|| FeatureTable::build(black_box(&corpus)).unwrap())
    });
}

fn bench_pair_info(c: &mut Criterion) {
    let mut annotated = synthetic_doc(60);
    let table = FeatureTable::build(std::slice::from_ref(&annotated)).unwrap();
    annotated.encode(&table);
    c.bench_function("pair_info_build_60_sentences", |b| {
        b.iter(|| DocumentPairInfo::build(black_box(&annotated), black_box(&table), false).unwrap())
    });
}

criterion_group!(benches, bench_feature_table, bench_pair_info);
criterion_main!(benches);
