use bow_sentiment::{
    BagOfWordsVectorizer, DataPoint, Dataset, DatasetLoader, CleaningOptions, FeatureMatrix, SentimentTag, Vocabulary,
};
use criterion::{black_box, criterion_group, criterion_main, Criterion};

const WORDS: &[&str] = &[
    "good", "bad", "not", "movie", "great", "awful", "day", "love", "hate", "really", "the", "a", "it", "was",
    "fun", "boring", "show", "game", "team", "win",
];

/// Deterministic synthetic tweets
fn synthetic_dataset(points: usize, len: usize) -> Dataset {
    (0..points)
        .map(|i| {
            let tokens: Vec<&str> = (0..len).map(|j| WORDS[(i * 7 + j * 13) % WORDS.len()]).collect();
            DataPoint::new(SentimentTag::ALL[i % 3], &tokens)
        })
        .collect()
}

fn synthetic_file(points: usize) -> String {
    (0..points)
        .map(|i| {
            format!(
                "{i} {} \"@user {} not {}! see http://www.example.com/x #tag\"\n",
                SentimentTag::ALL[i % 3],
                WORDS[i % WORDS.len()],
                WORDS[(i * 3) % WORDS.len()]
            )
        })
        .collect()
}

fn vectorize_benchmark(c: &mut Criterion) {
    let dataset = synthetic_dataset(5_000, 24);
    let vocabulary = Vocabulary::build(&dataset);

    c.bench_function("build_vocabulary", |b| {
        b.iter(|| Vocabulary::build(black_box(&dataset)))
    });

    c.bench_function("vectorize", |b| {
        let vectorizer = BagOfWordsVectorizer::new(&vocabulary);
        b.iter(|| {
            let matrix: FeatureMatrix = vectorizer.transform(black_box(&dataset));
            matrix
        })
    });

    c.bench_function("vectorize_clamped", |b| {
        let vectorizer = BagOfWordsVectorizer::new(&vocabulary).clamp_non_negative(true);
        b.iter(|| {
            let matrix: FeatureMatrix<i16> = vectorizer.transform(black_box(&dataset));
            matrix
        })
    });
}

fn load_benchmark(c: &mut Criterion) {
    let content = synthetic_file(5_000);
    let loader = DatasetLoader::new("english", CleaningOptions::default()).unwrap();

    c.bench_function("load_and_clean", |b| {
        b.iter(|| loader.load_str(black_box(&content)).unwrap())
    });
}

criterion_group!(benches, vectorize_benchmark, load_benchmark);
criterion_main!(benches);
