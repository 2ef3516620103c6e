//! URL slug normalization and collision suffixing.
//!
//! Every slugged table (resource categories, resources, FAQ categories) goes
//! through the same two steps: [`slugify`] turns free text into a normalized
//! base, then the owning store counts rows that already use the base or a
//! numbered variant of it (`base`, `base-1`, `base-2`, ...) and
//! [`resolve_collisions`] picks the final value from that single query.

use sqlx::PgConnection;
use uuid::Uuid;

use crate::core::error::{field_error, handle_db_error, Result};
use crate::shared::constants::MAX_SLUG_LENGTH;

/// Fold common Latin diacritics to their ASCII base letter.
fn fold_diacritic(c: char) -> Option<&'static str> {
    let folded = match c {
        'à' | 'á' | 'â' | 'ã' | 'ä' | 'å' | 'ā' | 'ă' | 'ą' => "a",
        'æ' => "ae",
        'ç' | 'ć' | 'č' => "c",
        'ď' | 'đ' => "d",
        'è' | 'é' | 'ê' | 'ë' | 'ē' | 'ė' | 'ę' | 'ě' => "e",
        'ğ' => "g",
        'ì' | 'í' | 'î' | 'ï' | 'ī' | 'į' | 'ı' => "i",
        'ł' | 'ľ' => "l",
        'ñ' | 'ń' | 'ň' => "n",
        'ò' | 'ó' | 'ô' | 'õ' | 'ö' | 'ø' | 'ō' | 'ő' => "o",
        'œ' => "oe",
        'ř' => "r",
        'ś' | 'š' | 'ş' => "s",
        'ß' => "ss",
        'ť' | 'ţ' => "t",
        'ù' | 'ú' | 'û' | 'ü' | 'ū' | 'ů' | 'ű' | 'ų' => "u",
        'ý' | 'ÿ' => "y",
        'ź' | 'ż' | 'ž' => "z",
        _ => return None,
    };
    Some(folded)
}

/// Normalize free text into a slug: lowercase ASCII letters, digits and single hyphens.
///
/// Anything else acts as a separator; runs of separators collapse to one
/// hyphen and leading/trailing hyphens are dropped. The result may be empty.
pub fn slugify(text: &str) -> String {
    let mut slug = String::with_capacity(text.len());
    let mut pending_hyphen = false;

    for c in text.chars().flat_map(char::to_lowercase) {
        let piece: Option<std::borrow::Cow<'static, str>> = if c.is_ascii_alphanumeric() {
            Some(c.to_string().into())
        } else {
            fold_diacritic(c).map(Into::into)
        };

        match piece {
            Some(piece) => {
                if pending_hyphen && !slug.is_empty() {
                    slug.push('-');
                }
                pending_hyphen = false;
                slug.push_str(&piece);
            }
            None => pending_hyphen = true,
        }
    }

    truncate_slug(slug)
}

/// Cut an over-long slug on a hyphen boundary when possible.
fn truncate_slug(slug: String) -> String {
    // Leave room for a numeric suffix
    let limit = MAX_SLUG_LENGTH - 12;
    if slug.len() <= limit {
        return slug;
    }

    let cut = &slug[..limit];
    match cut.rfind('-') {
        Some(idx) if idx > 0 => cut[..idx].to_string(),
        _ => cut.trim_end_matches('-').to_string(),
    }
}

/// Pick the normalized base slug: explicit value first, fallback text second.
///
/// Returns `None` when neither normalizes to a non-empty slug.
pub fn base_slug(explicit: Option<&str>, fallback: &str) -> Option<String> {
    explicit
        .map(slugify)
        .filter(|s| !s.is_empty())
        .or_else(|| Some(slugify(fallback)).filter(|s| !s.is_empty()))
}

/// [`base_slug`], reported as a `slug` field error when nothing usable is left.
pub fn require_base_slug(explicit: Option<&str>, fallback: &str) -> Result<String> {
    base_slug(explicit, fallback).ok_or_else(|| {
        field_error(
            "slug",
            "empty_slug",
            "Slug cannot be generated: provide a slug or a name or title containing letters or digits",
        )
    })
}

/// Numeric suffix of a `base-<digits>` variant. `None` for the base itself or other slugs.
#[cfg_attr(not(test), allow(dead_code))]
pub fn suffix_of(slug: &str, base: &str) -> Option<i64> {
    let digits = slug.strip_prefix(base)?.strip_prefix('-')?;
    if digits.is_empty()
        || digits.len() > MAX_SUFFIX_DIGITS
        || !digits.bytes().all(|b| b.is_ascii_digit())
    {
        return None;
    }
    digits.parse().ok()
}

/// True if `slug` is `base` itself or `base-<digits>`.
#[cfg_attr(not(test), allow(dead_code))]
pub fn is_variant_of(slug: &str, base: &str) -> bool {
    match slug.strip_prefix(base) {
        Some("") => true,
        Some(rest) => rest
            .strip_prefix('-')
            .is_some_and(|n| !n.is_empty() && n.bytes().all(|b| b.is_ascii_digit())),
        None => false,
    }
}

/// PostgreSQL regular expression matching the same rows as [`is_variant_of`].
///
/// Slugs only contain `[a-z0-9-]`, so the base needs no escaping.
pub fn variant_pattern(base: &str) -> String {
    format!("^{}(-[0-9]+)?$", base)
}

/// Suffixes longer than this are ignored so they always fit in an `i64`.
const MAX_SUFFIX_DIGITS: usize = 18;

/// Collision summary for a base slug, as counted by a store.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, sqlx::FromRow)]
pub struct SlugCollisions {
    /// Some other row already uses exactly the base slug
    pub exact: bool,
    /// Rows using the base or any numbered variant of it
    pub variants: i64,
    /// Highest numeric suffix in use, 0 when there is none
    pub max_suffix: i64,
}

/// Collision summary over an in-memory set of live slugs.
#[cfg_attr(not(test), allow(dead_code))]
pub fn tally_collisions<'a>(
    slugs: impl IntoIterator<Item = &'a str>,
    base: &str,
) -> SlugCollisions {
    let mut collisions = SlugCollisions::default();
    for slug in slugs {
        if !is_variant_of(slug, base) {
            continue;
        }
        collisions.variants += 1;
        collisions.exact |= slug == base;
        if let Some(suffix) = suffix_of(slug, base) {
            collisions.max_suffix = collisions.max_suffix.max(suffix);
        }
    }
    collisions
}

/// Final slug from the collision summary: the base when free, `base-n` otherwise.
///
/// `n` is one past the highest suffix in use and never less than the number
/// of existing variants, so creating the same name twice yields `name` then
/// `name-1`, and a gap left by a deleted row is never reused.
pub fn resolve_collisions(base: &str, collisions: SlugCollisions) -> String {
    if !collisions.exact || collisions.variants == 0 {
        base.to_string()
    } else {
        let n = collisions.variants.max(collisions.max_suffix + 1);
        format!("{}-{}", base, n)
    }
}

/// Tables whose rows carry a unique slug.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlugTable {
    ResourceCategories,
    Resources,
    FaqCategories,
}

impl SlugTable {
    fn name(self) -> &'static str {
        match self {
            SlugTable::ResourceCategories => "resource_categories",
            SlugTable::Resources => "resources",
            SlugTable::FaqCategories => "faq_categories",
        }
    }

    /// Soft-deleted rows release their slug (the unique index is partial).
    fn live_rows(self) -> &'static str {
        match self {
            SlugTable::ResourceCategories | SlugTable::Resources => "deleted_at IS NULL",
            SlugTable::FaqCategories => "TRUE",
        }
    }
}

/// Collision query for one table: `$1` base, `$2` variant pattern, `$3` id to ignore.
///
/// The suffix is parsed only for variants short enough to fit in an `i64`.
fn collision_query(table: SlugTable) -> String {
    format!(
        r#"
        SELECT COALESCE(BOOL_OR(slug = $1), FALSE) AS exact,
               COUNT(*) AS variants,
               COALESCE(MAX(
                   CASE WHEN slug <> $1 AND CHAR_LENGTH(slug) - CHAR_LENGTH($1) <= {}
                        THEN SUBSTRING(slug FROM CHAR_LENGTH($1) + 2)::BIGINT
                   END
               ), 0) AS max_suffix
        FROM {}
        WHERE {}
          AND slug ~ $2
          AND ($3::uuid IS NULL OR id <> $3)
        "#,
        MAX_SUFFIX_DIGITS + 1,
        table.name(),
        table.live_rows()
    )
}

/// Count the live rows of `table` using `base` or a numbered variant, ignoring `exclude_id`.
pub async fn slug_collisions(
    conn: &mut PgConnection,
    table: SlugTable,
    base: &str,
    exclude_id: Option<Uuid>,
) -> Result<SlugCollisions> {
    sqlx::query_as::<_, SlugCollisions>(&collision_query(table))
        .bind(base)
        .bind(variant_pattern(base))
        .bind(exclude_id)
        .fetch_one(conn)
        .await
        .map_err(handle_db_error)
}

/// Normalize, count collisions once and suffix: the whole slug assignment for one table.
pub async fn assign_unique_slug(
    conn: &mut PgConnection,
    table: SlugTable,
    explicit: Option<&str>,
    fallback: &str,
    current_id: Option<Uuid>,
) -> Result<String> {
    let base = require_base_slug(explicit, fallback)?;
    let collisions = slug_collisions(conn, table, &base, current_id).await?;
    Ok(resolve_collisions(&base, collisions))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::error::AppError;
    use crate::shared::validation::SLUG_REGEX;
    use fake::faker::lorem::en::Words;
    use fake::Fake;

    #[test]
    fn test_slugify_basic() {
        assert_eq!(slugify("Web Development"), "web-development");
        assert_eq!(slugify("  SEO & Content -- Strategy!  "), "seo-content-strategy");
        assert_eq!(slugify("Top 10 Tips"), "top-10-tips");
        assert_eq!(slugify("already-a-slug"), "already-a-slug");
    }

    #[test]
    fn test_slugify_folds_diacritics() {
        assert_eq!(slugify("Café Crème"), "cafe-creme");
        assert_eq!(slugify("Straße"), "strasse");
    }

    #[test]
    fn test_slugify_empty_results() {
        assert_eq!(slugify(""), "");
        assert_eq!(slugify("!!! ---"), "");
        assert_eq!(slugify("日本語"), "");
    }

    #[test]
    fn test_slugify_truncates_on_boundary() {
        let long = "word ".repeat(100);
        let slug = slugify(&long);
        assert!(slug.len() <= MAX_SLUG_LENGTH - 12);
        assert!(SLUG_REGEX.is_match(&slug));
    }

    #[test]
    fn test_slugify_output_always_matches_regex() {
        for _ in 0..50 {
            let words: Vec<String> = Words(1..6).fake();
            let slug = slugify(&words.join(" "));
            assert!(SLUG_REGEX.is_match(&slug), "bad slug: {:?}", slug);
        }
    }

    #[test]
    fn test_base_slug_falls_back_to_name() {
        assert_eq!(
            base_slug(Some("Custom Slug"), "Ignored"),
            Some("custom-slug".to_string())
        );
        assert_eq!(base_slug(Some("###"), "Guides"), Some("guides".to_string()));
        assert_eq!(base_slug(None, "Guides"), Some("guides".to_string()));
        assert_eq!(base_slug(Some("  "), "***"), None);
    }

    #[test]
    fn test_is_variant_of() {
        assert!(is_variant_of("web-development", "web-development"));
        assert!(is_variant_of("web-development-1", "web-development"));
        assert!(is_variant_of("web-development-12", "web-development"));
        assert!(!is_variant_of("web-development-tools", "web-development"));
        assert!(!is_variant_of("web-development-", "web-development"));
        assert!(!is_variant_of("web", "web-development"));
    }

    #[test]
    fn test_resolve_collisions() {
        let free = SlugCollisions::default();
        assert_eq!(resolve_collisions("guides", free), "guides");

        let once = SlugCollisions {
            exact: true,
            variants: 1,
            max_suffix: 0,
        };
        assert_eq!(resolve_collisions("guides", once), "guides-1");

        let twice = SlugCollisions {
            exact: true,
            variants: 2,
            max_suffix: 1,
        };
        assert_eq!(resolve_collisions("guides", twice), "guides-2");

        // base was freed by a soft delete; only a numbered variant remains
        let base_free = SlugCollisions {
            exact: false,
            variants: 1,
            max_suffix: 1,
        };
        assert_eq!(resolve_collisions("guides", base_free), "guides");
    }

    #[test]
    fn test_resolve_collisions_skips_past_gaps() {
        // guides, guides-2 remain after guides-1 was deleted
        let gap = tally_collisions(["guides", "guides-2"], "guides");
        assert_eq!(gap.variants, 2);
        assert_eq!(gap.max_suffix, 2);
        assert_eq!(resolve_collisions("guides", gap), "guides-3");

        // only a high explicit variant besides the base
        let sparse = tally_collisions(["guides", "guides-7"], "guides");
        assert_eq!(resolve_collisions("guides", sparse), "guides-8");
    }

    #[test]
    fn test_tally_collisions_ignores_other_slugs() {
        let tally = tally_collisions(
            ["web", "web-1", "web-development", "web-", "webinar-3"],
            "web",
        );
        assert_eq!(
            tally,
            SlugCollisions {
                exact: true,
                variants: 2,
                max_suffix: 1,
            }
        );
    }

    #[test]
    fn test_suffix_of() {
        assert_eq!(suffix_of("guides-12", "guides"), Some(12));
        assert_eq!(suffix_of("guides", "guides"), None);
        assert_eq!(suffix_of("guides-tools", "guides"), None);
        assert_eq!(suffix_of(&format!("guides-{}", "9".repeat(30)), "guides"), None);
    }

    #[test]
    fn test_require_base_slug_reports_slug_field() {
        match require_base_slug(Some("***"), "!!!") {
            Err(AppError::InvalidFields(errors)) => assert_eq!(
                AppError::field_messages(&errors),
                vec![
                    "slug: Slug cannot be generated: provide a slug or a name or title containing letters or digits"
                        .to_string()
                ]
            ),
            other => panic!("expected a slug field error, got {:?}", other),
        }
        assert_eq!(require_base_slug(None, "Case Studies").unwrap(), "case-studies");
    }

    #[test]
    fn test_slug_table_filters_live_rows() {
        assert_eq!(SlugTable::Resources.name(), "resources");
        assert_eq!(SlugTable::ResourceCategories.live_rows(), "deleted_at IS NULL");
        assert_eq!(SlugTable::FaqCategories.live_rows(), "TRUE");
    }

    #[test]
    fn test_variant_pattern() {
        assert_eq!(variant_pattern("guides"), "^guides(-[0-9]+)?$");
    }

    #[test]
    fn test_variant_pattern_agrees_with_in_memory_matching() {
        let base = "seo-basics";
        let pattern = regex::Regex::new(&variant_pattern(base)).unwrap();
        for slug in [
            "seo-basics",
            "seo-basics-1",
            "seo-basics-42",
            "seo-basics-",
            "seo-basics-x",
            "seo-basics-2-draft",
            "seo-basic",
            "old-seo-basics",
        ] {
            assert_eq!(pattern.is_match(slug), is_variant_of(slug, base), "{}", slug);
        }
    }

    #[test]
    fn test_collision_query_per_table() {
        let categories = collision_query(SlugTable::ResourceCategories);
        assert!(categories.contains("FROM resource_categories"));
        assert!(categories.contains("WHERE deleted_at IS NULL"));
        assert!(categories.contains("AS max_suffix"));
        assert!(categories.contains(&format!("<= {}", MAX_SUFFIX_DIGITS + 1)));

        let resources = collision_query(SlugTable::Resources);
        assert!(resources.contains("FROM resources"));
        assert!(resources.contains("WHERE deleted_at IS NULL"));

        // FAQ categories are hard-deleted, so every row holds its slug
        let faq = collision_query(SlugTable::FaqCategories);
        assert!(faq.contains("FROM faq_categories"));
        assert!(!faq.contains("deleted_at"));
    }
}
