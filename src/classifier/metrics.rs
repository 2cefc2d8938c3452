use std::fmt;

use serde::{Deserialize, Serialize};

use crate::dataset::sentiment::SentimentTag;

const N_TAGS: usize = SentimentTag::ALL.len();

#[inline]
fn ratio(num: usize, den: usize) -> f64 {
    if den == 0 {
        0.0
    } else {
        num as f64 / den as f64
    }
}

/// Confusion matrix over the three sentiment tags
///
/// `counts[actual][predicted]`, both indexed by `SentimentTag::label`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfusionMatrix {
    counts: [[usize; N_TAGS]; N_TAGS],
}

impl ConfusionMatrix {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from index-aligned label vectors.
    /// Labels outside the tag range are ignored.
    pub fn from_labels(actual: &[u8], predicted: &[u8]) -> Self {
        let mut matrix = Self::new();
        for (&a, &p) in actual.iter().zip(predicted) {
            if let (Some(a), Some(p)) = (SentimentTag::from_label(a), SentimentTag::from_label(p)) {
                matrix.add(a, p);
            }
        }
        matrix
    }

    pub fn from_tags(actual: &[SentimentTag], predicted: &[SentimentTag]) -> Self {
        let mut matrix = Self::new();
        for (&a, &p) in actual.iter().zip(predicted) {
            matrix.add(a, p);
        }
        matrix
    }

    pub fn add(&mut self, actual: SentimentTag, predicted: SentimentTag) {
        self.counts[actual.label() as usize][predicted.label() as usize] += 1;
    }

    pub fn get(&self, actual: SentimentTag, predicted: SentimentTag) -> usize {
        self.counts[actual.label() as usize][predicted.label() as usize]
    }

    pub fn total(&self) -> usize {
        self.counts.iter().flatten().sum()
    }

    fn true_positives(&self, tag: SentimentTag) -> usize {
        self.get(tag, tag)
    }

    fn predicted_as(&self, tag: SentimentTag) -> usize {
        let col = tag.label() as usize;
        self.counts.iter().map(|row| row[col]).sum()
    }

    /// Number of samples whose actual tag is `tag`
    pub fn support(&self, tag: SentimentTag) -> usize {
        self.counts[tag.label() as usize].iter().sum()
    }

    pub fn precision(&self, tag: SentimentTag) -> f64 {
        ratio(self.true_positives(tag), self.predicted_as(tag))
    }

    pub fn recall(&self, tag: SentimentTag) -> f64 {
        ratio(self.true_positives(tag), self.support(tag))
    }

    pub fn f1(&self, tag: SentimentTag) -> f64 {
        let (p, r) = (self.precision(tag), self.recall(tag));
        if p + r == 0.0 {
            0.0
        } else {
            2.0 * p * r / (p + r)
        }
    }

    pub fn accuracy(&self) -> f64 {
        let correct: usize = SentimentTag::ALL.iter().map(|&t| self.true_positives(t)).sum();
        ratio(correct, self.total())
    }
}

/// Precision / recall / F1 for one tag or one average
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ClassScores {
    pub precision: f64,
    pub recall: f64,
    pub f1: f64,
    pub support: usize,
}

/// Per-tag scores with macro and weighted averages
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassificationReport {
    pub matrix: ConfusionMatrix,
    pub per_class: [ClassScores; N_TAGS],
    pub accuracy: f64,
    pub macro_avg: ClassScores,
    pub weighted_avg: ClassScores,
}

impl ClassificationReport {
    pub fn new(matrix: ConfusionMatrix) -> Self {
        let per_class = SentimentTag::ALL.map(|tag| ClassScores {
            precision: matrix.precision(tag),
            recall: matrix.recall(tag),
            f1: matrix.f1(tag),
            support: matrix.support(tag),
        });
        let total = matrix.total();

        let mean = |f: fn(&ClassScores) -> f64| per_class.iter().map(f).sum::<f64>() / N_TAGS as f64;
        let weighted = |f: fn(&ClassScores) -> f64| {
            if total == 0 {
                0.0
            } else {
                per_class.iter().map(|s| f(s) * s.support as f64).sum::<f64>() / total as f64
            }
        };

        Self {
            matrix,
            accuracy: matrix.accuracy(),
            macro_avg: ClassScores {
                precision: mean(|s| s.precision),
                recall: mean(|s| s.recall),
                f1: mean(|s| s.f1),
                support: total,
            },
            weighted_avg: ClassScores {
                precision: weighted(|s| s.precision),
                recall: weighted(|s| s.recall),
                f1: weighted(|s| s.f1),
                support: total,
            },
            per_class,
        }
    }

    pub fn from_labels(actual: &[u8], predicted: &[u8]) -> Self {
        Self::new(ConfusionMatrix::from_labels(actual, predicted))
    }

    pub fn scores(&self, tag: SentimentTag) -> ClassScores {
        self.per_class[tag.label() as usize]
    }
}

fn write_row(f: &mut fmt::Formatter<'_>, name: &str, s: &ClassScores) -> fmt::Result {
    writeln!(
        f,
        "{name:>12} {:>9.4} {:>9.4} {:>9.4} {:>9}",
        s.precision, s.recall, s.f1, s.support
    )
}

impl fmt::Display for ClassificationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{:>12} {:>9} {:>9} {:>9} {:>9}", "", "precision", "recall", "f1-score", "support")?;
        writeln!(f)?;
        for (tag, scores) in SentimentTag::ALL.iter().zip(&self.per_class) {
            write_row(f, tag.as_str(), scores)?;
        }
        writeln!(f)?;
        writeln!(
            f,
            "{:>12} {:>9} {:>9} {:>9.4} {:>9}",
            "accuracy",
            "",
            "",
            self.accuracy,
            self.macro_avg.support
        )?;
        write_row(f, "macro avg", &self.macro_avg)?;
        write_row(f, "weighted avg", &self.weighted_avg)
    }
}
