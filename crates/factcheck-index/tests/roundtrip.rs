//! Build, persist, reload and query the index through the public API.

use std::fs;
use std::sync::Arc;

use factcheck_index::{
    ingest_csv, EmbeddingIndex, HashingEmbedder, IndexError, IndexPaths, SearchHit,
};
use pretty_assertions::assert_eq;

const FACTS_CSV: &str = "\
statement,source
The Eiffel Tower is located in Paris.,wiki
Mount Everest is the highest mountain on Earth.,wiki
\"India's Renewable Energy Dev. Agency sanctioned Rs. 2005 crores\",PIB
The Reserve Bank of India raised the repo rate by 25 basis points.,PIB
,empty
Water boils at 100 degrees Celsius at sea level.,wiki
";

fn built_index(dir: &std::path::Path) -> (EmbeddingIndex, Vec<String>) {
    let csv_path = dir.join("trusted_facts.csv");
    fs::write(&csv_path, FACTS_CSV).unwrap();
    let statements = ingest_csv(&csv_path).unwrap();

    let index = EmbeddingIndex::new(
        IndexPaths::in_dir(dir.join("data")),
        Arc::new(HashingEmbedder::default()),
    );
    assert_eq!(index.build(&statements).unwrap(), 5);
    (index, statements)
}

fn fresh(dir: &std::path::Path) -> EmbeddingIndex {
    EmbeddingIndex::new(
        IndexPaths::in_dir(dir.join("data")),
        Arc::new(HashingEmbedder::default()),
    )
}

#[test]
fn verbatim_statement_ranks_first_after_reload() {
    let dir = tempfile::tempdir().unwrap();
    let (_, statements) = built_index(dir.path());

    let index = fresh(dir.path());
    for (id, statement) in statements.iter().enumerate() {
        let hits = index.search(statement, 3).unwrap();
        assert_eq!(hits[0].id, id);
        assert_eq!(&hits[0].statement, statement);
        assert!(hits[0].similarity > 0.99, "{statement}: {:?}", hits[0]);
    }
}

#[test]
fn results_are_ordered_and_bounded() {
    let dir = tempfile::tempdir().unwrap();
    let (index, _) = built_index(dir.path());

    let hits: Vec<SearchHit> = index.search("Is the Eiffel Tower in Berlin?", 3).unwrap();
    assert_eq!(hits.len(), 3);
    assert_eq!(hits[0].statement, "The Eiffel Tower is located in Paris.");
    for pair in hits.windows(2) {
        assert!(pair[0].similarity >= pair[1].similarity);
    }
    for hit in &hits {
        assert!(hit.similarity > 0.0 && hit.similarity <= 1.0);
    }

    assert_eq!(index.search("anything", 50).unwrap().len(), 5);
}

#[test]
fn rebuild_overwrites_artifacts() {
    let dir = tempfile::tempdir().unwrap();
    let (index, _) = built_index(dir.path());
    index
        .build(&["Only one fact remains.".to_string()])
        .unwrap();

    let reloaded = fresh(dir.path());
    assert_eq!(reloaded.len().unwrap(), 1);
    assert_eq!(
        reloaded.search("Only one fact remains.", 3).unwrap()[0].statement,
        "Only one fact remains."
    );
}

#[test]
fn missing_artifacts_are_reported() {
    let dir = tempfile::tempdir().unwrap();
    let index = fresh(dir.path());
    assert!(matches!(index.load(), Err(IndexError::NotFound(_))));

    let (_, _) = built_index(dir.path());
    fs::remove_file(dir.path().join("data").join("statements.csv")).unwrap();
    assert!(matches!(fresh(dir.path()).load(), Err(IndexError::NotFound(_))));
}

#[test]
fn corrupt_vector_file_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    built_index(dir.path());
    fs::write(dir.path().join("data").join("facts.index"), b"FCTIDX01\x01").unwrap();
    assert!(matches!(
        fresh(dir.path()).load(),
        Err(IndexError::Corrupt { .. })
    ));
}
