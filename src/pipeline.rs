//! End-to-end training and inference
//!
//! load → clean → tokenize → preprocess → vocabulary (train split only)
//! → vectorize → random forest

use std::{collections::HashSet, fs, path::Path};

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::{
    classifier::{forest::RandomForest, metrics::ClassificationReport, Classifier},
    config::PipelineConfig,
    dataset::{loader::DatasetLoader, sentiment::SentimentTag, Dataset},
    error::{Error, Result},
    text::{
        preprocess::Preprocessor,
        stopwords::{StaticStopwords, StopWords},
        StopwordSource,
    },
    vectorizer::{vocabulary::Vocabulary, BagOfWordsVectorizer, FeatureMatrix},
};

/// Loader and preprocessor built from one [`PipelineConfig`]
///
/// All collaborators are built in `from_config`, so a bad locale, stemmer
/// or forest setting fails before any file is read.
#[derive(Debug)]
pub struct SentimentPipeline {
    config: PipelineConfig,
    loader: DatasetLoader,
    preprocessor: Preprocessor,
}

impl SentimentPipeline {
    /// Build with stopwords from the `stop-words` lists
    pub fn from_config(config: PipelineConfig) -> Result<Self> {
        Self::with_stopwords(config, &StopWords)
    }

    /// Build with a custom stopword source
    pub fn with_stopwords(config: PipelineConfig, stopwords: &dyn StopwordSource) -> Result<Self> {
        config.forest.validate()?;
        let loader = DatasetLoader::new(config.locale.clone(), config.cleaning)?;
        let preprocessor = Preprocessor::from_options(&config.preprocess, &config.locale, stopwords)?;
        Ok(Self {
            config,
            loader,
            preprocessor,
        })
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    pub fn preprocessor(&self) -> &Preprocessor {
        &self.preprocessor
    }

    /// Load and preprocess a dataset file
    pub fn load(&self, path: impl AsRef<Path>) -> Result<Dataset> {
        let mut dataset = self.loader.load(path)?;
        self.preprocessor.apply(&mut dataset);
        Ok(dataset)
    }

    /// Same as [`SentimentPipeline::load`] for in-memory content
    pub fn load_str(&self, content: &str) -> Result<Dataset> {
        let mut dataset = self.loader.load_str(content)?;
        self.preprocessor.apply(&mut dataset);
        Ok(dataset)
    }

    /// Clean, tokenize and preprocess free text the way records are
    pub fn prepare_text(&self, text: &str) -> Vec<String> {
        self.preprocessor.process_tokens(self.loader.tokenize_text(text))
    }

    /// Train on a dataset file
    pub fn train(self, path: impl AsRef<Path>) -> Result<SentimentModel> {
        let dataset = self.load(path)?;
        self.train_dataset(&dataset)
    }

    /// Train on an already preprocessed dataset
    ///
    /// The vocabulary is built from `dataset` alone; later splits are
    /// vectorized against it and their unseen tokens dropped.
    pub fn train_dataset(self, dataset: &Dataset) -> Result<SentimentModel> {
        let vocabulary = Vocabulary::build(dataset);
        info!(points = dataset.len(), vocabulary = vocabulary.len(), "training");

        let features: FeatureMatrix = BagOfWordsVectorizer::new(&vocabulary)
            .clamp_non_negative(self.config.clamp_non_negative)
            .transform(dataset);
        let mut forest = RandomForest::new(self.config.forest.clone());
        forest.fit(&features, &dataset.labels())?;

        Ok(SentimentModel {
            pipeline: self,
            vocabulary,
            forest,
        })
    }
}

/// On-disk model layout
///
/// `stopwords` is the set resolved at training time, so a model trained
/// with a custom [`StopwordSource`] preprocesses the same way after loading.
#[derive(Serialize)]
struct ModelFileRef<'a> {
    config: &'a PipelineConfig,
    stopwords: Option<&'a HashSet<String>>,
    vocabulary: &'a Vocabulary,
    forest: &'a RandomForest,
}

#[derive(Deserialize)]
struct ModelFile {
    config: PipelineConfig,
    #[serde(default)]
    stopwords: Option<HashSet<String>>,
    vocabulary: Vocabulary,
    forest: RandomForest,
}

/// Trained vocabulary and forest, plus the pipeline that feeds them
#[derive(Debug)]
pub struct SentimentModel {
    pipeline: SentimentPipeline,
    vocabulary: Vocabulary,
    forest: RandomForest,
}

impl SentimentModel {
    pub fn config(&self) -> &PipelineConfig {
        self.pipeline.config()
    }

    pub fn pipeline(&self) -> &SentimentPipeline {
        &self.pipeline
    }

    pub fn vocabulary(&self) -> &Vocabulary {
        &self.vocabulary
    }

    pub fn forest(&self) -> &RandomForest {
        &self.forest
    }

    fn vectorizer(&self) -> BagOfWordsVectorizer<'_> {
        BagOfWordsVectorizer::new(&self.vocabulary).clamp_non_negative(self.config().clamp_non_negative)
    }

    fn tags_from_labels(labels: Vec<u8>) -> Result<Vec<SentimentTag>> {
        labels
            .into_iter()
            .map(|l| SentimentTag::from_label(l).ok_or_else(|| Error::classifier(format!("unknown label {l}"))))
            .collect()
    }

    /// Classify one preprocessed token sequence
    pub fn predict_tokens<T>(&self, tokens: &[T]) -> Result<SentimentTag>
    where
        T: AsRef<str>,
    {
        let row: Vec<i32> = self.vectorizer().vectorize_tokens(tokens);
        let features = FeatureMatrix::from_rows(vec![row], self.vocabulary.len())
            .ok_or_else(|| Error::classifier("row width differs from vocabulary size"))?;
        let labels = self.forest.predict(&features)?;
        Self::tags_from_labels(labels)?
            .pop()
            .ok_or_else(|| Error::classifier("no prediction returned"))
    }

    /// Classify raw tweet text
    pub fn predict_text(&self, text: &str) -> Result<SentimentTag> {
        self.predict_tokens(&self.pipeline.prepare_text(text))
    }

    /// One tag per data point of an already preprocessed dataset
    pub fn predict_dataset(&self, dataset: &Dataset) -> Result<Vec<SentimentTag>> {
        let features: FeatureMatrix = self.vectorizer().transform(dataset);
        Self::tags_from_labels(self.forest.predict(&features)?)
    }

    pub fn evaluate_dataset(&self, dataset: &Dataset) -> Result<ClassificationReport> {
        let features: FeatureMatrix = self.vectorizer().transform(dataset);
        let predicted = self.forest.predict(&features)?;
        let report = ClassificationReport::from_labels(&dataset.labels(), &predicted);
        info!(points = dataset.len(), accuracy = report.accuracy, "evaluated");
        Ok(report)
    }

    /// Load a held-out split with the training pipeline and score it
    pub fn evaluate(&self, path: impl AsRef<Path>) -> Result<ClassificationReport> {
        let dataset = self.pipeline.load(path)?;
        self.evaluate_dataset(&dataset)
    }

    pub fn to_cbor(&self) -> Result<Vec<u8>> {
        Ok(serde_cbor::to_vec(&ModelFileRef {
            config: self.config(),
            stopwords: self.pipeline.preprocessor().stopwords(),
            vocabulary: &self.vocabulary,
            forest: &self.forest,
        })?)
    }

    /// Rebuild a model; the pipeline is reconstructed from the stored config
    /// and stopword set
    pub fn from_cbor(bytes: &[u8]) -> Result<Self> {
        let file: ModelFile = serde_cbor::from_slice(bytes)?;
        if file.forest.is_fitted() && file.forest.n_features() != file.vocabulary.len() {
            return Err(Error::classifier(format!(
                "model forest expects {} features but vocabulary has {}",
                file.forest.n_features(),
                file.vocabulary.len()
            )));
        }
        let pipeline = match file.stopwords {
            Some(words) => SentimentPipeline::with_stopwords(file.config, &StaticStopwords::from(words))?,
            None => SentimentPipeline::from_config(file.config)?,
        };
        Ok(Self {
            pipeline,
            vocabulary: file.vocabulary,
            forest: file.forest,
        })
    }

    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        fs::write(path, self.to_cbor()?)?;
        info!(path = %path.display(), "saved model");
        Ok(())
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        Self::from_cbor(&fs::read(path)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{classifier::forest::ForestConfig, text::{normalizer::StemmerSpec, stopwords::StaticStopwords}};

    const TRAIN: &str = "\
1 positive \"I love this, great day!\"
2 positive \"love love the great weather\"
3 positive \"such a great game\"
4 negative \"I hate this awful day\"
5 negative \"awful weather, hate it\"
6 negative \"did not like the game\"
7 neutral \"the meeting is at noon\"
8 neutral \"train leaves at noon today\"
9 neutral \"meeting moved to today\"
";

    fn config() -> PipelineConfig {
        let mut config = PipelineConfig::default();
        config.preprocess.normalize = true;
        config.preprocess.lowercase = true;
        config.forest = ForestConfig {
            n_trees: 9,
            bootstrap: false,
            max_features: Some(1000),
            ..Default::default()
        };
        config
    }

    fn trained() -> SentimentModel {
        let pipeline = SentimentPipeline::from_config(config()).unwrap();
        let dataset = pipeline.load_str(TRAIN).unwrap();
        pipeline.train_dataset(&dataset).unwrap()
    }

    #[test]
    fn fits_its_training_split() {
        let model = trained();
        let dataset = model.pipeline().load_str(TRAIN).unwrap();
        let report = model.evaluate_dataset(&dataset).unwrap();
        assert_eq!(report.accuracy, 1.0);
        assert_eq!(model.predict_text("I hate this awful day").unwrap(), SentimentTag::Negative);
        assert_eq!(model.predict_text("the meeting is at noon").unwrap(), SentimentTag::Neutral);
    }

    #[test]
    fn prepare_text_matches_record_processing() {
        let pipeline = SentimentPipeline::from_config(config()).unwrap();
        assert_eq!(pipeline.prepare_text("Did NOT like it!"), vec!["did", "not", "like", "it"]);
        let dataset = pipeline.load_str("1 negative \"Did NOT like it!\"").unwrap();
        assert_eq!(dataset.points[0].tokens, pipeline.prepare_text("Did NOT like it!"));
    }

    #[test]
    fn vocabulary_comes_from_training_split_only() {
        let model = trained();
        assert!(model.vocabulary().contains("love"));
        assert!(!model.vocabulary().contains("zebra"));
        // unseen tokens are dropped, prediction still works
        assert!(model.predict_text("zebra zebra zebra").is_ok());
        assert!(model.predict_tokens(&[] as &[&str]).is_ok());
    }

    #[test]
    fn model_survives_cbor() {
        let model = trained();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("model.cbor");
        model.save(&path).unwrap();

        let loaded = SentimentModel::load(&path).unwrap();
        assert_eq!(loaded.config(), model.config());
        assert_eq!(loaded.vocabulary(), model.vocabulary());
        let dataset = model.pipeline().load_str(TRAIN).unwrap();
        assert_eq!(loaded.predict_dataset(&dataset).unwrap(), model.predict_dataset(&dataset).unwrap());
    }

    #[test]
    fn setup_errors_surface_before_loading() {
        let mut config = config();
        config.preprocess.stemmer = Some(StemmerSpec { algorithm: "klingon".into() });
        assert!(matches!(SentimentPipeline::from_config(config), Err(Error::Config(_))));

        let mut config = self::config();
        config.preprocess.remove_stopwords = true;
        config.locale = "klingon".into();
        assert!(matches!(SentimentPipeline::from_config(config), Err(Error::Config(_))));

        let mut config = self::config();
        config.forest.n_trees = 0;
        assert!(matches!(SentimentPipeline::from_config(config), Err(Error::Config(_))));
    }

    #[test]
    fn custom_stopwords_apply_before_lowercasing() {
        let mut config = config();
        config.preprocess.remove_stopwords = true;
        let pipeline = SentimentPipeline::with_stopwords(config, &StaticStopwords::new(&["the"])).unwrap();
        assert_eq!(pipeline.prepare_text("The cat and the dog"), vec!["the", "cat", "and", "dog"]);
    }

    #[test]
    fn custom_stopwords_survive_cbor() {
        let mut config = config();
        config.locale = "klingon".into();
        config.preprocess.remove_stopwords = true;
        let pipeline = SentimentPipeline::with_stopwords(config, &StaticStopwords::new(&["zebra"])).unwrap();
        let dataset = pipeline.load_str(TRAIN).unwrap();
        let model = pipeline.train_dataset(&dataset).unwrap();
        assert_eq!(model.pipeline().prepare_text("zebra the cat"), vec!["the", "cat"]);

        let loaded = SentimentModel::from_cbor(&model.to_cbor().unwrap()).unwrap();
        assert_eq!(loaded.pipeline().prepare_text("zebra the cat"), vec!["the", "cat"]);
        assert_eq!(
            loaded.pipeline().preprocessor().stopwords(),
            model.pipeline().preprocessor().stopwords()
        );
    }

    #[test]
    fn empty_training_split_is_rejected() {
        let pipeline = SentimentPipeline::from_config(config()).unwrap();
        let err = pipeline.train_dataset(&Dataset::new()).unwrap_err();
        assert!(matches!(err, Error::Classifier(_)));
    }
}
