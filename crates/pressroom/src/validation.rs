//! Form-level validation shared by the view layer.
//!
//! Limits mirror what the admin panel accepts; failures collect every
//! violated rule into one `Validation` error so a form can show all of them
//! at once.

use pressroom_api::ApiError;

pub const CATEGORY_NAME_MIN: usize = 2;
pub const CATEGORY_NAME_MAX: usize = 100;
pub const SLUG_MIN: usize = 2;
pub const SLUG_MAX: usize = 100;
pub const DESCRIPTION_MAX: usize = 500;
pub const TITLE_MIN: usize = 3;
pub const TITLE_MAX: usize = 200;
pub const CONTENT_MIN: usize = 10;
pub const EXCERPT_MAX: usize = 300;
pub const REPLY_MIN: usize = 1;
pub const REPLY_MAX: usize = 5000;

fn collect(errors: Vec<String>) -> Result<(), ApiError> {
    if errors.is_empty() {
        Ok(())
    } else {
        Err(ApiError::validation(errors.join(", ")))
    }
}

fn is_valid_slug(slug: &str) -> bool {
    !slug.is_empty()
        && slug
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-')
}

pub fn validate_slug(slug: &str) -> Result<(), ApiError> {
    let mut errors = Vec::new();
    push_slug_errors(slug, &mut errors);
    collect(errors)
}

fn push_slug_errors(slug: &str, errors: &mut Vec<String>) {
    if slug.chars().count() < SLUG_MIN || slug.chars().count() > SLUG_MAX {
        errors.push(format!(
            "slug must be between {SLUG_MIN} and {SLUG_MAX} characters"
        ));
    }
    if !is_valid_slug(slug) {
        errors.push("slug may only contain lowercase letters, digits and hyphens".to_string());
    }
}

pub fn validate_category(
    name: &str,
    slug: &str,
    description: Option<&str>,
) -> Result<(), ApiError> {
    let mut errors = Vec::new();
    let name_len = name.trim().chars().count();
    if name_len < CATEGORY_NAME_MIN || name_len > CATEGORY_NAME_MAX {
        errors.push(format!(
            "name must be between {CATEGORY_NAME_MIN} and {CATEGORY_NAME_MAX} characters"
        ));
    }
    push_slug_errors(slug, &mut errors);
    if let Some(description) = description {
        if description.chars().count() > DESCRIPTION_MAX {
            errors.push(format!(
                "description must be at most {DESCRIPTION_MAX} characters"
            ));
        }
    }
    collect(errors)
}

/// News and posts share the same article limits.
pub fn validate_article(
    title: &str,
    content: &str,
    excerpt: Option<&str>,
) -> Result<(), ApiError> {
    let mut errors = Vec::new();
    let title_len = title.trim().chars().count();
    if title_len < TITLE_MIN || title_len > TITLE_MAX {
        errors.push(format!(
            "title must be between {TITLE_MIN} and {TITLE_MAX} characters"
        ));
    }
    if content.trim().chars().count() < CONTENT_MIN {
        errors.push(format!("content must be at least {CONTENT_MIN} characters"));
    }
    if let Some(excerpt) = excerpt {
        if excerpt.chars().count() > EXCERPT_MAX {
            errors.push(format!("excerpt must be at most {EXCERPT_MAX} characters"));
        }
    }
    collect(errors)
}

pub fn validate_reply(content: &str) -> Result<(), ApiError> {
    let len = content.trim().chars().count();
    if len < REPLY_MIN || len > REPLY_MAX {
        return Err(ApiError::validation(format!(
            "reply must be between {REPLY_MIN} and {REPLY_MAX} characters"
        )));
    }
    Ok(())
}

/// Derive a URL slug from free-form text: lowercase, non-alphanumerics
/// squashed into single hyphens, trimmed at both ends.
pub fn generate_slug(text: &str) -> String {
    let mut slug = String::with_capacity(text.len());
    let mut pending_hyphen = false;
    for c in text.chars() {
        if c.is_ascii_alphanumeric() {
            if pending_hyphen && !slug.is_empty() {
                slug.push('-');
            }
            pending_hyphen = false;
            slug.push(c.to_ascii_lowercase());
        } else {
            pending_hyphen = true;
        }
    }
    slug
}
