use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

use crate::features::faqs::models::{Faq, FaqCategory};
use crate::shared::types::double_option;

#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
pub struct CreateFaqCategoryDto {
    #[validate(length(min = 1, max = 255, message = "Name must be 1-255 characters"))]
    pub name: String,

    #[validate(length(max = 255, message = "Slug must not exceed 255 characters"))]
    pub slug: Option<String>,

    #[validate(length(max = 2000, message = "Description must not exceed 2000 characters"))]
    pub description: Option<String>,

    pub sort_order: Option<i32>,

    pub is_active: Option<bool>,
}

#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
pub struct UpdateFaqCategoryDto {
    #[validate(length(min = 1, max = 255, message = "Name must be 1-255 characters"))]
    pub name: Option<String>,

    #[validate(length(max = 255, message = "Slug must not exceed 255 characters"))]
    pub slug: Option<String>,

    #[validate(length(max = 2000, message = "Description must not exceed 2000 characters"))]
    pub description: Option<String>,

    pub sort_order: Option<i32>,

    pub is_active: Option<bool>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct FaqCategoryResponseDto {
    pub id: Uuid,
    pub name: String,
    pub slug: String,
    pub description: Option<String>,
    pub sort_order: i32,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<FaqCategory> for FaqCategoryResponseDto {
    fn from(c: FaqCategory) -> Self {
        Self {
            id: c.id,
            name: c.name,
            slug: c.slug,
            description: c.description,
            sort_order: c.sort_order,
            is_active: c.is_active,
            created_at: c.created_at,
            updated_at: c.updated_at,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
pub struct CreateFaqDto {
    pub faq_category_id: Option<Uuid>,

    #[validate(length(min = 5, max = 1000, message = "Question must be 5-1000 characters"))]
    pub question: String,

    #[validate(length(min = 1, max = 10000, message = "Answer must be 1-10000 characters"))]
    pub answer: String,

    /// Defaults to one past the highest sort order in the same category
    pub sort_order: Option<i32>,

    pub is_active: Option<bool>,

    pub is_featured: Option<bool>,
}

#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
pub struct UpdateFaqDto {
    /// `null` moves the FAQ out of its category
    #[serde(default, deserialize_with = "double_option")]
    #[schema(value_type = Option<Uuid>)]
    pub faq_category_id: Option<Option<Uuid>>,

    #[validate(length(min = 5, max = 1000, message = "Question must be 5-1000 characters"))]
    pub question: Option<String>,

    #[validate(length(min = 1, max = 10000, message = "Answer must be 1-10000 characters"))]
    pub answer: Option<String>,

    pub sort_order: Option<i32>,

    pub is_active: Option<bool>,

    pub is_featured: Option<bool>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct FaqResponseDto {
    pub id: Uuid,
    pub faq_category_id: Option<Uuid>,
    pub question: String,
    pub answer: String,
    pub sort_order: i32,
    pub is_active: bool,
    pub is_featured: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Faq> for FaqResponseDto {
    fn from(f: Faq) -> Self {
        Self {
            id: f.id,
            faq_category_id: f.faq_category_id,
            question: f.question,
            answer: f.answer,
            sort_order: f.sort_order,
            is_active: f.is_active,
            is_featured: f.is_featured,
            created_at: f.created_at,
            updated_at: f.updated_at,
        }
    }
}

/// Query params for the public FAQ listing
#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
pub struct FaqQueryParams {
    /// Only featured entries
    #[serde(default)]
    pub featured: bool,
}

/// One section of the public FAQ page. `category` is `None` for the uncategorized group.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct FaqGroupDto {
    pub category: Option<FaqCategoryResponseDto>,
    pub faqs: Vec<FaqResponseDto>,
}

/// Group active FAQs under their active categories, preserving input order.
///
/// Categories come first in the given order, followed by an uncategorized
/// group. FAQs whose category is inactive or missing are left out, and empty
/// groups are dropped.
pub fn group_faqs(categories: Vec<FaqCategory>, faqs: Vec<Faq>) -> Vec<FaqGroupDto> {
    let mut by_category: HashMap<Uuid, Vec<FaqResponseDto>> = HashMap::new();
    let mut uncategorized: Vec<FaqResponseDto> = Vec::new();

    for faq in faqs.into_iter().filter(|f| f.is_active) {
        match faq.faq_category_id {
            Some(category_id) => by_category.entry(category_id).or_default().push(faq.into()),
            None => uncategorized.push(faq.into()),
        }
    }

    let mut groups: Vec<FaqGroupDto> = categories
        .into_iter()
        .filter(|c| c.is_active)
        .filter_map(|c| {
            let faqs = by_category.remove(&c.id)?;
            Some(FaqGroupDto {
                category: Some(c.into()),
                faqs,
            })
        })
        .collect();

    if !uncategorized.is_empty() {
        groups.push(FaqGroupDto {
            category: None,
            faqs: uncategorized,
        });
    }
    groups
}

#[cfg(test)]
mod tests {
    use super::*;

    fn category(name: &str, is_active: bool) -> FaqCategory {
        FaqCategory {
            id: Uuid::new_v4(),
            name: name.to_string(),
            slug: name.to_lowercase(),
            description: None,
            sort_order: 0,
            is_active,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn faq(question: &str, category_id: Option<Uuid>) -> Faq {
        Faq {
            id: Uuid::new_v4(),
            faq_category_id: category_id,
            question: question.to_string(),
            answer: "Answer".to_string(),
            sort_order: 0,
            is_active: true,
            is_featured: false,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_groups_follow_category_order_with_uncategorized_last() {
        let billing = category("Billing", true);
        let support = category("Support", true);
        let empty = category("Empty", true);
        let faqs = vec![
            faq("How do I get help?", Some(support.id)),
            faq("Can I pay by invoice?", Some(billing.id)),
            faq("Who are you?", None),
            faq("Do you offer refunds?", Some(billing.id)),
        ];

        let groups = group_faqs(vec![billing.clone(), support.clone(), empty], faqs);

        assert_eq!(groups.len(), 3);
        assert_eq!(groups[0].category.as_ref().unwrap().id, billing.id);
        let billing_questions: Vec<&str> =
            groups[0].faqs.iter().map(|f| f.question.as_str()).collect();
        assert_eq!(
            billing_questions,
            vec!["Can I pay by invoice?", "Do you offer refunds?"]
        );
        assert_eq!(groups[1].category.as_ref().unwrap().id, support.id);
        assert!(groups[2].category.is_none());
    }

    #[test]
    fn test_inactive_entries_are_hidden() {
        let hidden = category("Hidden", false);
        let mut inactive = faq("Old question?", None);
        inactive.is_active = false;
        let faqs = vec![faq("Hidden question?", Some(hidden.id)), inactive];

        assert!(group_faqs(vec![hidden], faqs).is_empty());
    }

    #[test]
    fn test_question_length_is_validated() {
        let dto = CreateFaqDto {
            question: "Hi".to_string(),
            answer: String::new(),
            ..Default::default()
        };
        let errors = dto.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("question"));
        assert!(errors.field_errors().contains_key("answer"));
    }
}
