//! On-page SEO scoring for resources.
//!
//! The score is additive and capped at 100:
//!
//! | criterion | points |
//! |---|---|
//! | title 30-60 chars, otherwise non-empty | 15 / 5 |
//! | meta title up to 60 chars, longer | 10 / 5 |
//! | meta description 120-160 chars, otherwise non-empty | 20 / 10 |
//! | excerpt present | 10 |
//! | content of 300+ words, 100+ words | 20 / 10 |
//! | featured image | 10 |
//! | category assigned | 5 |
//! | gallery image with alt text | 5 |
//! | slug up to 60 chars | 5 |

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::features::resources::models::ResourceFields;

const WORDS_PER_MINUTE: usize = 200;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum SeoGrade {
    Good,
    Fair,
    Poor,
}

fn present(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

fn char_len(value: &str) -> usize {
    value.chars().count()
}

/// Drop anything between `<` and `>` so markup does not inflate word counts.
fn strip_tags(content: &str) -> String {
    let mut text = String::with_capacity(content.len());
    let mut in_tag = false;
    for c in content.chars() {
        match c {
            '<' => in_tag = true,
            '>' if in_tag => {
                in_tag = false;
                text.push(' ');
            }
            _ if !in_tag => text.push(c),
            _ => {}
        }
    }
    text
}

pub fn word_count(content: &str) -> usize {
    strip_tags(content).split_whitespace().count()
}

/// Estimated reading time at 200 words per minute, never less than one minute.
pub fn reading_time_minutes(content: &str) -> u32 {
    let minutes = word_count(content).div_ceil(WORDS_PER_MINUTE);
    minutes.max(1) as u32
}

pub fn seo_score(fields: &ResourceFields) -> i32 {
    let mut score = 0;

    if let Some(title) = present(Some(&fields.title)) {
        score += if (30..=60).contains(&char_len(title)) { 15 } else { 5 };
    }

    if let Some(meta_title) = present(fields.meta_title.as_deref()) {
        score += if char_len(meta_title) <= 60 { 10 } else { 5 };
    }

    if let Some(description) = present(fields.meta_description.as_deref()) {
        score += if (120..=160).contains(&char_len(description)) {
            20
        } else {
            10
        };
    }

    if present(fields.excerpt.as_deref()).is_some() {
        score += 10;
    }

    score += match word_count(&fields.content) {
        n if n >= 300 => 20,
        n if n >= 100 => 10,
        _ => 0,
    };

    if present(fields.featured_image_url.as_deref()).is_some() {
        score += 10;
    }

    if fields.category_id.is_some() {
        score += 5;
    }

    if fields.gallery.iter().any(|item| item.has_alt_text()) {
        score += 5;
    }

    if !fields.slug.is_empty() && fields.slug.len() <= 60 {
        score += 5;
    }

    score.min(100)
}

pub fn seo_grade(score: i32) -> SeoGrade {
    match score {
        s if s >= 80 => SeoGrade::Good,
        s if s >= 50 => SeoGrade::Fair,
        _ => SeoGrade::Poor,
    }
}
