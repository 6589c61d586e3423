//! The post form shared by the create and edit pages.

use serde::Serialize;

use crate::domain::{Group, Post, PostChanges};

pub const REQUIRED_MESSAGE: &str = "This field is required.";
pub const INVALID_CHOICE_MESSAGE: &str =
    "Select a valid choice. That choice is not one of the available choices.";

/// Label of the "no group" option.
pub const EMPTY_CHOICE_LABEL: &str = "---------";

/// Raw form submission, exactly as posted.
#[derive(Debug, Clone, Default)]
pub struct PostFormInput {
    pub text: String,
    pub group: String,
}

impl PostFormInput {
    pub fn new(text: impl Into<String>, group: Option<i64>) -> Self {
        Self {
            text: text.into(),
            group: group.map(|id| id.to_string()).unwrap_or_default(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldKind {
    /// Free text.
    Char,
    /// One value out of a fixed set of options.
    Choice,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Choice {
    pub value: String,
    pub label: String,
    pub selected: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct FormField {
    pub name: &'static str,
    pub label: &'static str,
    pub help_text: &'static str,
    pub kind: FieldKind,
    pub widget: &'static str,
    pub required: bool,
    pub value: String,
    pub choices: Vec<Choice>,
    pub errors: Vec<String>,
}

impl FormField {
    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct PostFormFields {
    pub text: FormField,
    pub group: FormField,
}

/// Form description handed to the templates, optionally bound to a
/// submission.
#[derive(Debug, Clone, Serialize)]
pub struct PostForm {
    pub fields: PostFormFields,
    pub is_bound: bool,
    #[serde(skip)]
    cleaned: Option<PostChanges>,
}

impl PostForm {
    /// Unbound form for a new post.
    pub fn blank(groups: &[Group]) -> Self {
        Self::with_values("", "", groups)
    }

    /// Unbound form pre-filled from an existing post.
    pub fn for_post(post: &Post, groups: &[Group]) -> Self {
        let group = post.group_id.map(|id| id.to_string()).unwrap_or_default();
        Self::with_values(&post.text, &group, groups)
    }

    /// Bind a submission and validate it against the existing groups.
    pub fn bind(input: PostFormInput, groups: &[Group]) -> Self {
        let mut form = Self::with_values(&input.text, input.group.trim(), groups);
        form.is_bound = true;

        let text = input.text.trim();
        if text.is_empty() {
            form.fields.text.errors.push(REQUIRED_MESSAGE.to_string());
        }

        let group_id = match input.group.trim() {
            "" => Some(None),
            raw => raw
                .parse::<i64>()
                .ok()
                .filter(|id| groups.iter().any(|g| g.id == *id))
                .map(Some),
        };
        if group_id.is_none() {
            form.fields.group.errors.push(INVALID_CHOICE_MESSAGE.to_string());
        }

        if let (false, Some(group_id)) = (text.is_empty(), group_id) {
            form.cleaned = Some(PostChanges {
                text: text.to_string(),
                group_id,
            });
        }

        form
    }

    pub fn is_valid(&self) -> bool {
        self.cleaned.is_some()
    }

    /// Validated values; `None` for unbound or invalid forms.
    pub fn cleaned(&self) -> Option<&PostChanges> {
        self.cleaned.as_ref()
    }

    pub fn fields(&self) -> [&FormField; 2] {
        [&self.fields.text, &self.fields.group]
    }

    fn with_values(text: &str, group: &str, groups: &[Group]) -> Self {
        let mut choices = vec![Choice {
            value: String::new(),
            label: EMPTY_CHOICE_LABEL.to_string(),
            selected: group.is_empty(),
        }];
        choices.extend(groups.iter().map(|g| {
            let value = g.id.to_string();
            Choice {
                selected: value == group,
                value,
                label: g.title.clone(),
            }
        }));

        Self {
            fields: PostFormFields {
                text: FormField {
                    name: "text",
                    label: "Post text",
                    help_text: "Text of the new post",
                    kind: FieldKind::Char,
                    widget: "textarea",
                    required: true,
                    value: text.to_string(),
                    choices: Vec::new(),
                    errors: Vec::new(),
                },
                group: FormField {
                    name: "group",
                    label: "Group",
                    help_text: "Group the post will belong to",
                    kind: FieldKind::Choice,
                    widget: "select",
                    required: false,
                    value: group.to_string(),
                    choices,
                    errors: Vec::new(),
                },
            },
            is_bound: false,
            cleaned: None,
        }
    }
}
