pub mod sentiment;
pub mod loader;

use serde::{Deserialize, Serialize};

use crate::dataset::sentiment::SentimentTag;

/// One labeled tweet
/// `tokens` is replaced wholesale by each preprocessing stage, `tag` never changes
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DataPoint {
    pub tag: SentimentTag,
    pub tokens: Vec<String>,
}

impl DataPoint {
    pub fn new<T>(tag: SentimentTag, tokens: &[T]) -> Self
    where
        T: AsRef<str>,
    {
        Self {
            tag,
            tokens: tokens.iter().map(|t| t.as_ref().to_string()).collect(),
        }
    }
}

/// Ordered collection of data points, usually one split of a dataset
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dataset {
    pub points: Vec<DataPoint>,
}

impl Dataset {
    pub fn new() -> Self {
        Self { points: Vec::new() }
    }

    pub fn push(&mut self, point: DataPoint) {
        self.points.push(point);
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, DataPoint> {
        self.points.iter()
    }

    pub fn iter_mut(&mut self) -> std::slice::IterMut<'_, DataPoint> {
        self.points.iter_mut()
    }

    /// Integer label vector, index-aligned with the data points
    pub fn labels(&self) -> Vec<u8> {
        self.points.iter().map(|p| p.tag.label()).collect()
    }

    /// Number of data points per tag, in label order
    ///
    /// # Returns
    /// * `[usize; 3]` - counts indexed by `SentimentTag::label`
    pub fn tag_counts(&self) -> [usize; 3] {
        let mut counts = [0usize; 3];
        for point in &self.points {
            counts[point.tag.label() as usize] += 1;
        }
        counts
    }

    /// Total number of tokens over all data points
    pub fn token_sum(&self) -> usize {
        self.points.iter().map(|p| p.tokens.len()).sum()
    }
}

impl From<Vec<DataPoint>> for Dataset {
    fn from(points: Vec<DataPoint>) -> Self {
        Self { points }
    }
}

impl FromIterator<DataPoint> for Dataset {
    fn from_iter<I: IntoIterator<Item = DataPoint>>(iter: I) -> Self {
        Self { points: iter.into_iter().collect() }
    }
}

impl IntoIterator for Dataset {
    type Item = DataPoint;
    type IntoIter = std::vec::IntoIter<DataPoint>;

    fn into_iter(self) -> Self::IntoIter {
        self.points.into_iter()
    }
}

impl<'a> IntoIterator for &'a Dataset {
    type Item = &'a DataPoint;
    type IntoIter = std::slice::Iter<'a, DataPoint>;

    fn into_iter(self) -> Self::IntoIter {
        self.points.iter()
    }
}
