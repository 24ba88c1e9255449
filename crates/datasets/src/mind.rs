//! Microsoft News Dataset (MIND) loader.
//!
//! Parses the headerless tab-separated `news.tsv` / `behaviors.tsv` pair
//! into simulation-ready rounds. Each behaviors row is one user visit: the
//! impressions column holds space-separated `articleid-label` pairs, label
//! 1 for a click and 0 otherwise.
//!
//! Feature construction follows the subcategory one-hot scheme: the top 30
//! most frequent subcategories (plus an `_other` bucket) index a one-hot
//! vector per article, and a user profile is the normalized subcategory
//! frequency over the user's click history. A candidate's context is the
//! concatenation of the two, so every context in a dataset shares one
//! length.

use std::collections::HashMap;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};

use bandit_core::error::{BanditError, BanditResult};
use bandit_core::types::{Round, RoundContext, RoundSource};
use ndarray::Array1;
use tracing::info;

/// Subcategories kept as distinct feature dimensions; rarer ones share the
/// `_other` bucket.
const TOP_SUBCATEGORIES: usize = 30;

/// One row of news.tsv (metadata columns beyond the subcategory are parsed
/// but not used for features).
#[derive(Debug, Clone)]
pub struct Article {
    pub article_id: String,
    pub category: String,
    pub subcategory: String,
}

/// MIND dataset parsed into replayable impression rounds.
pub struct MindDataset {
    articles: Vec<Article>,
    feature_labels: Vec<String>,
    article_features: HashMap<String, Array1<f64>>,
    rounds: Vec<Round>,
}

impl MindDataset {
    /// Read `news.tsv` and `behaviors.tsv` from `data_dir`.
    ///
    /// `max_impressions` caps the number of behaviors rows read, for
    /// sampling large datasets without parsing the whole file.
    pub fn load(
        data_dir: impl AsRef<Path>,
        max_impressions: Option<usize>,
    ) -> BanditResult<Self> {
        let data_dir = data_dir.as_ref();
        if !data_dir.is_dir() {
            return Err(BanditError::Dataset(format!(
                "data directory not found: {}",
                data_dir.display()
            )));
        }

        let news_path = existing_file(data_dir.join("news.tsv"))?;
        let behaviors_path = existing_file(data_dir.join("behaviors.tsv"))?;

        let articles = load_news(&news_path)?;
        let (feature_labels, article_features) = build_article_features(&articles);
        let rounds = parse_behaviors(
            &behaviors_path,
            max_impressions,
            &feature_labels,
            &article_features,
        )?;

        info!(
            articles = articles.len(),
            rounds = rounds.len(),
            feature_dim = feature_labels.len() * 2,
            data_dir = %data_dir.display(),
            "MIND dataset loaded"
        );

        Ok(Self {
            articles,
            feature_labels,
            article_features,
            rounds,
        })
    }

    /// Parsed article metadata, in file order.
    pub fn articles(&self) -> &[Article] {
        &self.articles
    }

    /// Names of the article-feature dimensions (top subcategories plus
    /// `_other`); the full context is user profile then article one-hot.
    pub fn feature_labels(&self) -> &[String] {
        &self.feature_labels
    }

    /// Per-article one-hot subcategory vectors.
    pub fn article_features(&self) -> &HashMap<String, Array1<f64>> {
        &self.article_features
    }
}

impl RoundSource for MindDataset {
    fn rounds(&self) -> &[Round] {
        &self.rounds
    }
}

fn existing_file(path: PathBuf) -> BanditResult<PathBuf> {
    if !path.is_file() {
        return Err(BanditError::Dataset(format!(
            "required file not found: {}",
            path.display()
        )));
    }
    Ok(path)
}

fn load_news(path: &Path) -> BanditResult<Vec<Article>> {
    let reader = BufReader::new(File::open(path)?);
    let mut articles = Vec::new();

    for (line_no, line) in reader.lines().enumerate() {
        let line = line?;
        if line.is_empty() {
            continue;
        }
        let mut fields = line.split('\t');
        let (article_id, category, subcategory) =
            match (fields.next(), fields.next(), fields.next()) {
                (Some(id), Some(cat), Some(subcat)) => (id, cat, subcat),
                _ => {
                    return Err(BanditError::Dataset(format!(
                        "news.tsv line {}: expected at least 3 tab-separated columns",
                        line_no + 1
                    )))
                }
            };
        articles.push(Article {
            article_id: article_id.to_string(),
            category: category.to_string(),
            subcategory: subcategory.to_string(),
        });
    }

    Ok(articles)
}

/// One-hot subcategory features over the most frequent subcategories, with
/// everything else mapped to a shared trailing `_other` dimension.
fn build_article_features(
    articles: &[Article],
) -> (Vec<String>, HashMap<String, Array1<f64>>) {
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for article in articles {
        *counts.entry(article.subcategory.as_str()).or_insert(0) += 1;
    }

    let mut ranked: Vec<(&str, usize)> = counts.into_iter().collect();
    // Count descending, name ascending for a stable ordering.
    ranked.sort_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(b.0)));
    ranked.truncate(TOP_SUBCATEGORIES);

    let mut feature_labels: Vec<String> =
        ranked.iter().map(|(name, _)| name.to_string()).collect();
    feature_labels.push("_other".to_string());

    let index_of: HashMap<&str, usize> = ranked
        .iter()
        .enumerate()
        .map(|(i, (name, _))| (*name, i))
        .collect();
    let other_index = feature_labels.len() - 1;
    let d = feature_labels.len();

    let mut features = HashMap::new();
    for article in articles {
        let mut vec = Array1::zeros(d);
        let idx = index_of
            .get(article.subcategory.as_str())
            .copied()
            .unwrap_or(other_index);
        vec[idx] = 1.0;
        features.insert(article.article_id.clone(), vec);
    }

    (feature_labels, features)
}

/// Normalized subcategory-frequency vector over the user's click history;
/// zero vector when the history is empty or entirely unknown.
fn build_user_profile(
    click_history: &str,
    d: usize,
    article_features: &HashMap<String, Array1<f64>>,
) -> Array1<f64> {
    let mut profile = Array1::zeros(d);
    for article_id in click_history.split_whitespace() {
        if let Some(features) = article_features.get(article_id) {
            profile += features;
        }
    }
    let total = profile.sum();
    if total > 0.0 {
        profile /= total;
    }
    profile
}

fn parse_behaviors(
    path: &Path,
    max_impressions: Option<usize>,
    feature_labels: &[String],
    article_features: &HashMap<String, Array1<f64>>,
) -> BanditResult<Vec<Round>> {
    let reader = BufReader::new(File::open(path)?);
    let d = feature_labels.len();
    let mut rounds = Vec::new();

    for (line_no, line) in reader.lines().enumerate() {
        if let Some(max) = max_impressions {
            if rounds.len() >= max {
                break;
            }
        }
        let line = line?;
        if line.is_empty() {
            continue;
        }

        let fields: Vec<&str> = line.split('\t').collect();
        if fields.len() != 5 {
            return Err(BanditError::Dataset(format!(
                "behaviors.tsv line {}: expected 5 tab-separated columns, got {}",
                line_no + 1,
                fields.len()
            )));
        }
        let user_id = fields[1];
        let click_history = fields[3];
        let impressions = fields[4];

        let mut candidates = Vec::new();
        let mut rewards = HashMap::new();
        for pair in impressions.split_whitespace() {
            let (article_id, label) = pair.rsplit_once('-').ok_or_else(|| {
                BanditError::Dataset(format!(
                    "behaviors.tsv line {}: malformed impression pair {pair:?}",
                    line_no + 1
                ))
            })?;
            let label: f64 = label.parse().map_err(|_| {
                BanditError::Dataset(format!(
                    "behaviors.tsv line {}: non-numeric click label in {pair:?}",
                    line_no + 1
                ))
            })?;
            candidates.push(article_id.to_string());
            rewards.insert(article_id.to_string(), label);
        }
        if candidates.is_empty() {
            return Err(BanditError::Dataset(format!(
                "behaviors.tsv line {}: impression list is empty",
                line_no + 1
            )));
        }

        let user_profile = build_user_profile(click_history, d, article_features);
        let mut contexts = RoundContext::new();
        for article_id in &candidates {
            // Articles missing from news.tsv get a zero article half so the
            // context mapping still covers every candidate.
            let mut context = Array1::zeros(2 * d);
            context.slice_mut(ndarray::s![..d]).assign(&user_profile);
            if let Some(features) = article_features.get(article_id) {
                context.slice_mut(ndarray::s![d..]).assign(features);
            }
            contexts.insert(article_id.clone(), context);
        }

        rounds.push(Round {
            user_id: user_id.to_string(),
            candidates,
            rewards,
            contexts: Some(contexts),
        });
    }

    Ok(rounds)
}
