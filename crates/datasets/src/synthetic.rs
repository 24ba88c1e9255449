//! Synthetic MIND-format dataset generator.
//!
//! Writes a `news.tsv` / `behaviors.tsv` pair with the real dataset's
//! schema so the whole pipeline (loader, feature building, simulation) can
//! run without downloading MIND. Every generated impression has exactly one
//! clicked candidate.

use std::fs;
use std::io::Write;
use std::path::Path;

use bandit_core::error::BanditResult;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use tracing::info;

const CATEGORIES: [(&str, &[&str]); 10] = [
    ("news", &["usanews", "worldnews", "politicsandelections"]),
    ("sports", &["football", "basketball", "baseball", "soccer"]),
    ("entertainment", &["movies", "tv", "music", "celebrity"]),
    ("finance", &["markets", "personalfinance", "realestate"]),
    ("lifestyle", &["fashion", "wellness", "relationships"]),
    ("health", &["medical", "nutrition", "mentalhealth"]),
    ("autos", &["autoreviews", "autonews", "electric"]),
    ("travel", &["destinations", "tips", "airlines"]),
    ("foodanddrink", &["recipes", "restaurants", "wine"]),
    ("weather", &["forecast", "severeweather", "climate"]),
];

const TITLE_WORDS: [&str; 20] = [
    "breaking", "new", "top", "big", "latest", "update", "report", "analysis", "review", "guide",
    "how", "why", "what", "best", "worst", "first", "last", "major", "key", "critical",
];

const NOUNS: [&str; 20] = [
    "market", "team", "player", "movie", "stock", "deal", "policy", "study", "election",
    "company", "event", "game", "show", "trend", "discovery", "breakthrough", "crisis",
    "reform", "debate", "plan",
];

/// Shape of the generated dataset.
#[derive(Debug, Clone)]
pub struct SyntheticConfig {
    pub num_articles: usize,
    pub num_users: usize,
    pub num_impressions: usize,
    pub seed: u64,
}

impl Default for SyntheticConfig {
    fn default() -> Self {
        Self {
            num_articles: 200,
            num_users: 50,
            num_impressions: 500,
            seed: 42,
        }
    }
}

impl SyntheticConfig {
    /// Write `news.tsv` and `behaviors.tsv` into `dir` (created if absent).
    pub fn write_mind_files(&self, dir: impl AsRef<Path>) -> BanditResult<()> {
        let dir = dir.as_ref();
        fs::create_dir_all(dir)?;
        let mut rng = StdRng::seed_from_u64(self.seed);

        let article_ids = self.write_news(&mut rng, &dir.join("news.tsv"))?;
        self.write_behaviors(&mut rng, &dir.join("behaviors.tsv"), &article_ids)?;

        info!(
            articles = self.num_articles,
            impressions = self.num_impressions,
            dir = %dir.display(),
            "Synthetic MIND dataset written"
        );
        Ok(())
    }

    fn write_news(&self, rng: &mut StdRng, path: &Path) -> BanditResult<Vec<String>> {
        let mut file = fs::File::create(path)?;
        let mut article_ids = Vec::with_capacity(self.num_articles);

        for i in 0..self.num_articles {
            let article_id = format!("N{:05}", i + 1);
            let (category, subcategories) = CATEGORIES[rng.gen_range(0..CATEGORIES.len())];
            let subcategory = subcategories[rng.gen_range(0..subcategories.len())];
            let title = generate_title(rng);
            writeln!(
                file,
                "{article_id}\t{category}\t{subcategory}\t{title}\tAbstract for article \
                 {article_id}.\thttps://example.com/{article_id}\t[]\t[]"
            )?;
            article_ids.push(article_id);
        }
        Ok(article_ids)
    }

    fn write_behaviors(
        &self,
        rng: &mut StdRng,
        path: &Path,
        article_ids: &[String],
    ) -> BanditResult<()> {
        let mut file = fs::File::create(path)?;

        for impression_idx in 0..self.num_impressions {
            let user_id = format!("U{:05}", rng.gen_range(1..=self.num_users));
            let time_str = format!(
                "11/15/2019 {}:{:02}:00 AM",
                rng.gen_range(0..24),
                rng.gen_range(0..60)
            );

            let history_size = rng.gen_range(3..=15).min(article_ids.len());
            let history: Vec<&str> = article_ids
                .choose_multiple(rng, history_size)
                .map(|s| s.as_str())
                .collect();

            let num_candidates = rng.gen_range(3..=10).min(article_ids.len());
            let candidates: Vec<&str> = article_ids
                .choose_multiple(rng, num_candidates)
                .map(|s| s.as_str())
                .collect();

            // Exactly one clicked candidate per impression.
            let clicked_idx = rng.gen_range(0..candidates.len());
            let impressions: Vec<String> = candidates
                .iter()
                .enumerate()
                .map(|(j, id)| format!("{id}-{}", u8::from(j == clicked_idx)))
                .collect();

            writeln!(
                file,
                "{}\t{user_id}\t{time_str}\t{}\t{}",
                impression_idx + 1,
                history.join(" "),
                impressions.join(" ")
            )?;
        }
        Ok(())
    }
}

fn generate_title(rng: &mut StdRng) -> String {
    let num_words = rng.gen_range(4..=8);
    let words: Vec<&str> = (0..num_words)
        .map(|_| {
            if rng.gen::<bool>() {
                TITLE_WORDS[rng.gen_range(0..TITLE_WORDS.len())]
            } else {
                NOUNS[rng.gen_range(0..NOUNS.len())]
            }
        })
        .collect();
    let mut title = words.join(" ");
    if let Some(first) = title.get_mut(0..1) {
        first.make_ascii_uppercase();
    }
    title
}
