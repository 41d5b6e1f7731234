//! Askama templates for the web frontend.

use askama::Template;

use crate::registry::Registry;

/// Landing page describing the API.
#[derive(Template)]
#[template(path = "index.html")]
pub struct IndexTemplate {
    pub stations: Vec<OptionView>,
    pub traffic_types: Vec<OptionView>,
}

/// A selectable value with its label.
#[derive(Debug, Clone)]
pub struct OptionView {
    pub value: String,
    pub label: String,
}

impl IndexTemplate {
    pub fn from_registry(registry: &Registry) -> Self {
        Self {
            stations: registry
                .stations()
                .map(|s| OptionView {
                    value: s.code.clone(),
                    label: s.display_name().to_string(),
                })
                .collect(),
            traffic_types: registry
                .traffic_types()
                .map(|t| OptionView {
                    value: t.key.clone(),
                    label: t.name.clone(),
                })
                .collect(),
        }
    }
}
